//! Page lifecycle records

use super::Scope;
use crate::capture::event::RawEvent;
use crate::trace::record::{EventFamily, EventSource, TraceRecord};

pub fn classify_beforeunload(scope: &Scope<'_>, _event: &RawEvent) -> TraceRecord {
    scope
        .record(EventFamily::Beforeunload, "CLOSE")
        .source(EventSource::ResourcePage)
        .build()
}

/// Synthetic record announcing a page navigation
pub fn navigate_record(scope: &Scope<'_>) -> TraceRecord {
    scope
        .record(EventFamily::Navigate, "Navigate")
        .source(EventSource::ResourcePage)
        .build()
}
