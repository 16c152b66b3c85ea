//! Raw browser events as delivered by the host

use crate::dom::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// DOM event names the pipeline listens for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    PointerDown,
    Submit,
    MouseOver,
    MouseUp,
    Drop,
    Scroll,
    Paste,
    Change,
    KeyUp,
    BeforeUnload,
}

impl EventKind {
    pub fn dom_name(&self) -> &'static str {
        match self {
            EventKind::PointerDown => "pointerdown",
            EventKind::Submit => "submit",
            EventKind::MouseOver => "mouseover",
            EventKind::MouseUp => "mouseup",
            EventKind::Drop => "drop",
            EventKind::Scroll => "scroll",
            EventKind::Paste => "paste",
            EventKind::Change => "change",
            EventKind::KeyUp => "keyup",
            EventKind::BeforeUnload => "beforeunload",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dom_name())
    }
}

/// Where an event was dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    Node(NodeId),
    Window,
}

impl EventTarget {
    pub fn node(&self) -> Option<NodeId> {
        match self {
            EventTarget::Node(id) => Some(*id),
            EventTarget::Window => None,
        }
    }
}

/// Physical key code and logical key of a keyboard event
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyInfo {
    pub code: String,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawEvent {
    pub kind: EventKind,
    pub target: EventTarget,
    /// Event time in milliseconds since page load
    pub time_stamp: f64,
    /// `(clientX, clientY)` for pointer-family events
    pub pointer: Option<(f64, f64)>,
    pub keys: Option<KeyInfo>,
    /// Submitting control of a `submit` event
    pub submitter: Option<NodeId>,
}

impl RawEvent {
    pub fn new(kind: EventKind, target: EventTarget, time_stamp: f64) -> Self {
        Self {
            kind,
            target,
            time_stamp,
            pointer: None,
            keys: None,
            submitter: None,
        }
    }

    pub fn on_node(kind: EventKind, node: NodeId, time_stamp: f64) -> Self {
        Self::new(kind, EventTarget::Node(node), time_stamp)
    }

    pub fn on_window(kind: EventKind, time_stamp: f64) -> Self {
        Self::new(kind, EventTarget::Window, time_stamp)
    }

    pub fn pointer(kind: EventKind, node: NodeId, time_stamp: f64, x: f64, y: f64) -> Self {
        Self {
            pointer: Some((x, y)),
            ..Self::on_node(kind, node, time_stamp)
        }
    }

    pub fn key_up(node: NodeId, time_stamp: f64, code: &str, key: &str) -> Self {
        Self {
            keys: Some(KeyInfo {
                code: code.to_string(),
                key: key.to_string(),
            }),
            ..Self::on_node(EventKind::KeyUp, node, time_stamp)
        }
    }

    pub fn submit(form: NodeId, submitter: Option<NodeId>, time_stamp: f64) -> Self {
        Self {
            submitter,
            ..Self::on_node(EventKind::Submit, form, time_stamp)
        }
    }
}
