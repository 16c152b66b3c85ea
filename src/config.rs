//! Capture configuration
//!
//! Supplied by the host (or a replay scenario). The pipeline never loads or
//! persists it on its own.

use serde::{Deserialize, Serialize};

/// Default elapsed time, in event time units, between emitted scroll samples
pub const DEFAULT_SCROLL_THRESHOLD_MS: f64 = 20.0;

/// Default `messageType` tag on every record
pub const TRACE_MESSAGE_TYPE: &str = "TraceData";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TraceConfig {
    /// Tag identifying the payload as trace data
    pub message_type: String,
    /// A scroll record is emitted only when more than this much time has
    /// passed since the previous sample
    pub scroll_threshold_ms: f64,
    /// Initial value of the shared capture flag
    pub enable_capture: bool,
    /// Name reported for an unlabelled textarea
    pub textarea_default_name: String,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            message_type: TRACE_MESSAGE_TYPE.to_string(),
            scroll_threshold_ms: DEFAULT_SCROLL_THRESHOLD_MS,
            enable_capture: false,
            textarea_default_name: "Textarea".to_string(),
        }
    }
}
