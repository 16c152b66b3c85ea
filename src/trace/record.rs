//! Trace record shape and builder
//!
//! Every emission is a `TraceRecord`. Serialized keys are camelCase, except
//! inside `interactionContext`, which keeps the collector's snake_case
//! field names.

use crate::adapters::KnowledgeTag;
use crate::dom::Viewport;
use crate::trace::state::ScrollDelta;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Event family reported in the record's `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventFamily {
    Click,
    Submit,
    Mouseover,
    Select,
    Drop,
    Scroll,
    Paste,
    Change,
    Keyup,
    Beforeunload,
    Navigate,
}

impl fmt::Display for EventFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventFamily::Click => "click",
            EventFamily::Submit => "submit",
            EventFamily::Mouseover => "mouseover",
            EventFamily::Select => "select",
            EventFamily::Drop => "drop",
            EventFamily::Scroll => "scroll",
            EventFamily::Paste => "paste",
            EventFamily::Change => "change",
            EventFamily::Keyup => "keyup",
            EventFamily::Beforeunload => "beforeunload",
            EventFamily::Navigate => "navigate",
        };
        write!(f, "{}", name)
    }
}

/// Coarse input channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventSource {
    #[serde(rename = "MOUSE")]
    Mouse,
    #[serde(rename = "KEYBOARD")]
    Keyboard,
    #[serde(rename = "RESOURCE PAGE")]
    ResourcePage,
}

/// A textual value, or the checked state of a checkbox
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextValue {
    Flag(bool),
    Text(String),
}

impl Default for TextValue {
    fn default() -> Self {
        TextValue::Text(String::new())
    }
}

impl From<String> for TextValue {
    fn from(value: String) -> Self {
        TextValue::Text(value)
    }
}

impl From<&str> for TextValue {
    fn from(value: &str) -> Self {
        TextValue::Text(value.to_string())
    }
}

impl From<bool> for TextValue {
    fn from(value: bool) -> Self {
        TextValue::Flag(value)
    }
}

/// Semantic fields extracted from the event target.
///
/// Absent fields are left out of the serialized mapping. `name` is the
/// exception: families that always carry it report a missing one as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionContext {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// `Some(None)` is a name the family always reports but the target
    /// lacks; it serializes as `null`
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<TextValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Tag of the element whose click fell back to a container
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<KnowledgeTag>,
    #[serde(rename = "diffX", default, skip_serializing_if = "Option::is_none")]
    pub diff_x: Option<f64>,
    #[serde(rename = "diffY", default, skip_serializing_if = "Option::is_none")]
    pub diff_y: Option<f64>,
    #[serde(rename = "diffTimeStamp", default, skip_serializing_if = "Option::is_none")]
    pub diff_time_stamp: Option<f64>,
}

/// Keeps an explicit `null` apart from a missing key
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl InteractionContext {
    pub fn name(&self) -> Option<&str> {
        self.name.as_ref().and_then(|name| name.as_deref())
    }

    /// Parse a serialized context back; `None` for the empty-string sentinel
    pub fn parse(serialized: &str) -> Option<Self> {
        if serialized.is_empty() {
            return None;
        }
        serde_json::from_str(serialized).ok()
    }
}

/// One structured description of a user interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceRecord {
    pub message_type: String,
    #[serde(rename = "type")]
    pub event_type: EventFamily,
    pub tag_name: String,
    pub text_content: TextValue,
    /// Serialized `InteractionContext`, or the empty string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interaction_context: Option<String>,
    pub xpath: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_source: Option<EventSource>,
    pub width: u32,
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_capture: Option<bool>,

    #[serde(rename = "clientX", skip_serializing_if = "Option::is_none")]
    pub client_x: Option<f64>,
    #[serde(rename = "clientY", skip_serializing_if = "Option::is_none")]
    pub client_y: Option<f64>,

    #[serde(rename = "diffX", skip_serializing_if = "Option::is_none")]
    pub diff_x: Option<f64>,
    #[serde(rename = "diffY", skip_serializing_if = "Option::is_none")]
    pub diff_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_time_stamp: Option<f64>,
    #[serde(rename = "scrollX", skip_serializing_if = "Option::is_none")]
    pub scroll_x: Option<f64>,
    #[serde(rename = "scrollY", skip_serializing_if = "Option::is_none")]
    pub scroll_y: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub should_capture: Option<bool>,
}

impl TraceRecord {
    /// Deserialized `interactionContext`, if the record carries one
    pub fn context(&self) -> Option<InteractionContext> {
        self.interaction_context
            .as_deref()
            .and_then(InteractionContext::parse)
    }
}

/// Emission-time values shared by every record of one handler invocation
#[derive(Debug, Clone, PartialEq)]
pub struct RecordStamp {
    pub message_type: String,
    pub width: u32,
    pub height: u32,
    pub enable_capture: bool,
}

impl RecordStamp {
    pub fn new(message_type: &str, viewport: &Viewport, enable_capture: bool) -> Self {
        Self {
            message_type: message_type.to_string(),
            width: viewport.inner_width,
            height: viewport.inner_height,
            enable_capture,
        }
    }

    /// Start a record with the uniform fields filled in: mouse source,
    /// empty context, empty locator
    pub fn record(&self, family: EventFamily, tag_name: impl Into<String>) -> RecordBuilder {
        RecordBuilder {
            record: TraceRecord {
                message_type: self.message_type.clone(),
                event_type: family,
                tag_name: tag_name.into(),
                text_content: TextValue::default(),
                interaction_context: Some(String::new()),
                xpath: String::new(),
                event_source: Some(EventSource::Mouse),
                width: self.width,
                height: self.height,
                enable_capture: Some(self.enable_capture),
                client_x: None,
                client_y: None,
                diff_x: None,
                diff_y: None,
                diff_time_stamp: None,
                scroll_x: None,
                scroll_y: None,
                code: None,
                key: None,
                should_capture: None,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordBuilder {
    record: TraceRecord,
}

impl RecordBuilder {
    pub fn text(mut self, text: impl Into<TextValue>) -> Self {
        self.record.text_content = text.into();
        self
    }

    pub fn context(mut self, context: &InteractionContext) -> Self {
        self.record.interaction_context = match serde_json::to_string(context) {
            Ok(serialized) => Some(serialized),
            Err(e) => {
                tracing::warn!("Failed to serialize interaction context: {}", e);
                Some(String::new())
            }
        };
        self
    }

    pub fn xpath(mut self, xpath: impl Into<String>) -> Self {
        self.record.xpath = xpath.into();
        self
    }

    pub fn source(mut self, source: EventSource) -> Self {
        self.record.event_source = Some(source);
        self
    }

    pub fn pointer(mut self, position: Option<(f64, f64)>) -> Self {
        if let Some((x, y)) = position {
            self.record.client_x = Some(x);
            self.record.client_y = Some(y);
        }
        self
    }

    pub fn scroll(mut self, delta: &ScrollDelta) -> Self {
        self.record.diff_x = Some(delta.diff_x);
        self.record.diff_y = Some(delta.diff_y);
        self.record.diff_time_stamp = Some(delta.diff_time_stamp);
        self.record.scroll_x = Some(delta.scroll_x);
        self.record.scroll_y = Some(delta.scroll_y);
        self
    }

    pub fn keys(mut self, code: &str, key: &str) -> Self {
        self.record.code = Some(code.to_string());
        self.record.key = Some(key.to_string());
        self
    }

    pub fn should_capture(mut self, should_capture: bool) -> Self {
        self.record.should_capture = Some(should_capture);
        self
    }

    /// Minimal record for unclassified targets: no context, no source and
    /// no capture flag
    pub fn degraded(mut self) -> Self {
        self.record.interaction_context = None;
        self.record.event_source = None;
        self.record.enable_capture = None;
        self
    }

    pub fn build(self) -> TraceRecord {
        self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamp() -> RecordStamp {
        let viewport = Viewport {
            inner_width: 800,
            inner_height: 600,
            ..Viewport::default()
        };
        RecordStamp::new("TraceData", &viewport, true)
    }

    #[test]
    fn test_record_serializes_collector_keys() {
        let context = InteractionContext {
            kind: Some("text".to_string()),
            name: Some(Some("Email".to_string())),
            inner_text: Some(String::new()),
            ..Default::default()
        };
        let record = stamp()
            .record(EventFamily::Click, "INPUT")
            .pointer(Some((10.0, 20.0)))
            .context(&context)
            .xpath("/html/body/input")
            .build();

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["messageType"], "TraceData");
        assert_eq!(json["type"], "click");
        assert_eq!(json["tagName"], "INPUT");
        assert_eq!(json["eventSource"], "MOUSE");
        assert_eq!(json["clientX"], 10.0);
        assert_eq!(json["width"], 800);
        assert_eq!(json["enableCapture"], true);
        assert!(json.get("diffX").is_none());

        let context: serde_json::Value =
            serde_json::from_str(json["interactionContext"].as_str().unwrap()).unwrap();
        assert_eq!(context["type"], "text");
        assert_eq!(context["inner_text"], "");
        assert!(context.get("placeholder").is_none());
    }

    #[test]
    fn test_null_name_survives_round_trip() {
        let context = InteractionContext {
            name: Some(None),
            value: Some("x".into()),
            ..Default::default()
        };
        let serialized = serde_json::to_string(&context).unwrap();
        assert_eq!(serialized, r#"{"name":null,"value":"x"}"#);

        let parsed = InteractionContext::parse(&serialized).unwrap();
        assert_eq!(parsed.name, Some(None));
        assert_eq!(parsed.name(), None);
        assert_eq!(InteractionContext::parse(r#"{"value":"x"}"#).unwrap().name, None);
    }

    #[test]
    fn test_degraded_record_drops_optional_fields() {
        let record = stamp().record(EventFamily::Drop, "#text").degraded().build();
        let json = serde_json::to_value(&record).unwrap();

        assert!(json.get("interactionContext").is_none());
        assert!(json.get("eventSource").is_none());
        assert!(json.get("enableCapture").is_none());
        assert_eq!(json["xpath"], "");
        assert_eq!(json["height"], 600);
    }

    #[test]
    fn test_checkbox_text_serializes_as_bool() {
        let record = stamp()
            .record(EventFamily::Change, "INPUT")
            .text(true)
            .build();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["textContent"], true);
        assert_eq!(record.context(), None);
    }

    #[test]
    fn test_family_display_matches_serde() {
        let json = serde_json::to_value(EventFamily::Beforeunload).unwrap();
        assert_eq!(json, EventFamily::Beforeunload.to_string());
        assert_eq!(
            serde_json::to_value(EventSource::ResourcePage).unwrap(),
            "RESOURCE PAGE"
        );
    }
}
