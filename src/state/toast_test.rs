use std::cell::RefCell;
use std::rc::Rc;

use super::*;

fn capture_sink() -> Rc<RefCell<Vec<Toast>>> {
    let received = Rc::new(RefCell::new(Vec::new()));
    let sink_copy = Rc::clone(&received);
    register_sink(move |toast| sink_copy.borrow_mut().push(toast));
    received
}

#[test]
fn emit_without_sink_is_dropped_silently() {
    clear_sink();
    error("no one is listening");
}

#[test]
fn registered_sink_receives_the_toast() {
    let received = capture_sink();
    success("y");
    assert_eq!(
        *received.borrow(),
        vec![Toast {
            kind: ToastKind::Success,
            message: "y".to_owned(),
        }]
    );
}

#[test]
fn each_emitter_maps_to_its_kind() {
    let received = capture_sink();
    success("a");
    error("b");
    info("c");
    loading("d");
    let kinds: Vec<ToastKind> = received.borrow().iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ToastKind::Success,
            ToastKind::Error,
            ToastKind::Info,
            ToastKind::Loading,
        ]
    );
}

#[test]
fn newer_sink_replaces_older() {
    let first = capture_sink();
    let second = capture_sink();
    info("only the latest hears this");
    assert!(first.borrow().is_empty());
    assert_eq!(second.borrow().len(), 1);
}

#[test]
fn cleared_sink_stops_delivery() {
    let received = capture_sink();
    clear_sink();
    info("dropped");
    assert!(received.borrow().is_empty());
}

#[test]
fn kind_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&ToastKind::Success).unwrap(), r#""success""#);
    assert_eq!(serde_json::to_string(&ToastKind::Loading).unwrap(), r#""loading""#);
}
