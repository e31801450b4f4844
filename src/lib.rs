//! # petalcart
//!
//! Browser session and network runtime for the PetalCart flower shop
//! storefront. Every REST call flows through a credential-injecting
//! dispatcher that watches responses for session expiry; an idempotent
//! session guard owns the teardown-and-redirect flow; a single-slot toast
//! dispatcher carries notifications to whichever UI layer is mounted.
//!
//! Browser-facing code (localStorage, `window.location`, real HTTP) is
//! gated behind the `hydrate` feature with inert stubs elsewhere, so the
//! decision logic runs under plain `cargo test` without a browser.

pub mod net;
pub mod state;
pub mod util;

/// Install the browser logging stack: panic hook plus `console_log` at
/// `Info`. Safe to call more than once; a repeat init is ignored.
#[cfg(feature = "hydrate")]
pub fn init_browser_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}
