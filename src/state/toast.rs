//! Process-wide toast dispatch with a single receiver slot.
//!
//! DESIGN
//! ======
//! Delivery is a direct call into whichever sink is currently registered,
//! not a queue: a later toast simply supersedes whatever the UI is showing,
//! and emits with no sink registered are dropped silently.

#[cfg(test)]
#[path = "toast_test.rs"]
mod toast_test;

use std::cell::RefCell;

use serde::{Deserialize, Serialize};

/// Severity of a toast notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Info,
    Loading,
}

/// A notification handed to the registered sink.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

thread_local! {
    static SINK: RefCell<Option<Box<dyn Fn(Toast)>>> = const { RefCell::new(None) };
}

/// Install `sink` as the sole receiver, replacing any previous one.
pub fn register_sink<F>(sink: F)
where
    F: Fn(Toast) + 'static,
{
    SINK.with(|slot| *slot.borrow_mut() = Some(Box::new(sink)));
}

/// Remove the current receiver; subsequent toasts are dropped.
pub fn clear_sink() {
    SINK.with(|slot| *slot.borrow_mut() = None);
}

fn emit(kind: ToastKind, message: &str) {
    SINK.with(|slot| {
        if let Some(sink) = slot.borrow().as_ref() {
            sink(Toast {
                kind,
                message: message.to_owned(),
            });
        }
    });
}

/// Show a success toast.
pub fn success(message: &str) {
    emit(ToastKind::Success, message);
}

/// Show an error toast.
pub fn error(message: &str) {
    emit(ToastKind::Error, message);
}

/// Show an info toast.
pub fn info(message: &str) {
    emit(ToastKind::Info, message);
}

/// Show a loading toast.
pub fn loading(message: &str) {
    emit(ToastKind::Loading, message);
}
