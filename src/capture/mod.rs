//! Interaction capture
//!
//! This module provides the listener registry, target shape resolution, the
//! per-family classifiers and the tracer that ties them together.

pub mod classify;
pub mod event;
pub mod flag;
pub mod listener;
pub mod shape;
pub mod tracer;

// Re-export event types
pub use event::{EventKind, EventTarget, KeyInfo, RawEvent};

// Re-export listener lifecycle
pub use listener::{EventHub, Handler, ListenerTarget, Subscription, SubscriptionSet};

pub use flag::CaptureFlag;
pub use shape::TargetShape;
pub use tracer::{TraceContext, Tracer};
