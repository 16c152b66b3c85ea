//! Replay scenarios
//!
//! A scenario is a JSON file describing a page and a sequence of events
//! against it. Replaying installs a tracer on a fresh `EventHub`, applies
//! each event's page updates and dispatches it, so the records a real
//! session would produce can be reproduced outside a browser.

use crate::capture::{EventHub, EventKind, EventTarget, KeyInfo, RawEvent, TraceContext, Tracer};
use crate::config::TraceConfig;
use crate::dom::{Document, NodeId, NodeSpec, Page, Viewport};
use crate::trace::{TraceError, TraceResult, Transport};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    #[serde(default)]
    pub config: TraceConfig,
    #[serde(default)]
    pub viewport: Viewport,
    /// Children of `<body>`
    #[serde(default)]
    pub document: Vec<NodeSpec>,
    #[serde(default)]
    pub events: Vec<ScenarioEvent>,
}

/// One event plus the page changes that precede it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// `window`, `body` or `#id`
    #[serde(default = "default_target")]
    pub target: String,
    #[serde(default)]
    pub time_stamp: f64,
    #[serde(rename = "clientX", default)]
    pub client_x: Option<f64>,
    #[serde(rename = "clientY", default)]
    pub client_y: Option<f64>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    /// `#id` of the submitting control
    #[serde(default)]
    pub submitter: Option<String>,

    #[serde(rename = "scrollX", default)]
    pub scroll_x: Option<f64>,
    #[serde(rename = "scrollY", default)]
    pub scroll_y: Option<f64>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    /// Live selection before the event; an empty string clears it
    #[serde(default)]
    pub selection: Option<String>,
    /// New value of the target control
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub checked: Option<bool>,
    #[serde(default)]
    pub selected_index: Option<usize>,
}

fn default_target() -> String {
    "body".to_string()
}

impl Scenario {
    pub fn from_path(path: impl AsRef<Path>) -> TraceResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let scenario: Scenario = serde_json::from_str(&content)
            .map_err(|e| TraceError::InvalidScenario(format!("{}: {}", path.display(), e)))?;
        tracing::info!(
            "Loaded scenario {} ({} events)",
            path.display(),
            scenario.events.len()
        );
        Ok(scenario)
    }

    pub fn build_page(&self) -> Page {
        Page::new(Document::from_body_spec(&self.document), self.viewport)
    }
}

fn resolve_node(doc: &Document, selector: &str) -> TraceResult<NodeId> {
    if selector == "body" {
        return Ok(doc.body());
    }
    selector
        .strip_prefix('#')
        .and_then(|id| doc.get_element_by_id(id))
        .ok_or_else(|| TraceError::UnknownTarget(selector.to_string()))
}

pub fn resolve_target(doc: &Document, selector: &str) -> TraceResult<EventTarget> {
    if selector == "window" {
        return Ok(EventTarget::Window);
    }
    resolve_node(doc, selector).map(EventTarget::Node)
}

impl ScenarioEvent {
    /// Apply the page changes carried by this event
    fn prepare(&self, page: &mut Page, target: EventTarget) {
        if self.scroll_x.is_some() || self.scroll_y.is_some() {
            let x = self.scroll_x.unwrap_or(page.viewport.scroll_x);
            let y = self.scroll_y.unwrap_or(page.viewport.scroll_y);
            page.scroll_to(x, y);
        }
        if self.width.is_some() || self.height.is_some() {
            let width = self.width.unwrap_or(page.viewport.inner_width);
            let height = self.height.unwrap_or(page.viewport.inner_height);
            page.resize(width, height);
        }
        match self.selection.as_deref() {
            Some("") => page.clear_selection(),
            Some(text) => page.select_text(text),
            None => {}
        }

        let Some(node) = target.node() else {
            return;
        };
        if let Some(value) = &self.value {
            page.document.set_value(node, value);
        }
        if let Some(checked) = self.checked {
            page.document.set_checked(node, checked);
        }
        if let Some(index) = self.selected_index {
            page.document.select_option(node, index);
        }
    }

    fn to_raw(&self, doc: &Document, target: EventTarget) -> TraceResult<RawEvent> {
        let mut event = RawEvent::new(self.kind, target, self.time_stamp);
        if let (Some(x), Some(y)) = (self.client_x, self.client_y) {
            event.pointer = Some((x, y));
        }
        if self.code.is_some() || self.key.is_some() {
            event.keys = Some(KeyInfo {
                code: self.code.clone().unwrap_or_default(),
                key: self.key.clone().unwrap_or_default(),
            });
        }
        if let Some(submitter) = &self.submitter {
            event.submitter = Some(resolve_node(doc, submitter)?);
        }
        Ok(event)
    }
}

/// Replay `scenario` into `transport`. Returns the number of dispatched
/// events.
pub fn replay(
    scenario: &Scenario,
    transport: Arc<dyn Transport>,
    navigate: bool,
) -> TraceResult<usize> {
    let mut page = scenario.build_page();
    let hub = EventHub::new();
    let mut tracer = Tracer::new(TraceContext::new(scenario.config.clone(), transport));
    tracer.register_listeners(&hub);

    if navigate {
        tracer.navigate(&page);
    }

    for (index, scenario_event) in scenario.events.iter().enumerate() {
        let target = resolve_target(&page.document, &scenario_event.target)?;
        scenario_event.prepare(&mut page, target);
        let event = scenario_event.to_raw(&page.document, target)?;
        let invoked = hub.dispatch(&page, &event);
        tracing::debug!(
            "Event {} ({}) reached {} handlers",
            index,
            scenario_event.kind,
            invoked
        );
    }

    tracer.release_all();
    Ok(scenario.events.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::{EventFamily, MemoryTransport, TextValue};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SCENARIO: &str = r##"{
        "config": {"enableCapture": true},
        "viewport": {"innerWidth": 800, "innerHeight": 600},
        "document": [
            {"tag": "label", "attrs": {"for": "c"}, "children": ["Comment"]},
            {"tag": "textarea", "attrs": {"id": "c"}},
            {"tag": "p", "attrs": {"id": "intro"}, "children": ["Read this first"]}
        ],
        "events": [
            {"type": "paste", "target": "#c", "timeStamp": 10, "value": "hello"},
            {"type": "mouseup", "target": "#intro", "timeStamp": 20,
             "clientX": 4, "clientY": 5, "selection": "this"},
            {"type": "mouseup", "target": "#intro", "timeStamp": 30, "clientX": 4, "clientY": 5},
            {"type": "scroll", "target": "window", "timeStamp": 40},
            {"type": "scroll", "target": "window", "timeStamp": 65, "scrollX": 30, "scrollY": 50},
            {"type": "beforeunload", "target": "window", "timeStamp": 90}
        ]
    }"##;

    fn write_scenario(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_replay_from_file() {
        let file = write_scenario(SCENARIO);
        let scenario = Scenario::from_path(file.path()).unwrap();
        let transport = MemoryTransport::new();

        let dispatched = replay(&scenario, Arc::new(transport.clone()), true).unwrap();
        assert_eq!(dispatched, 6);

        let records = transport.records();
        let families: Vec<EventFamily> = records.iter().map(|r| r.event_type).collect();
        assert_eq!(
            families,
            vec![
                EventFamily::Navigate,
                EventFamily::Paste,
                EventFamily::Select,
                EventFamily::Scroll,
                EventFamily::Beforeunload,
            ]
        );

        let paste = records[1].context().unwrap();
        assert_eq!(paste.name(), Some("Comment"));
        assert_eq!(paste.value, Some(TextValue::from("hello")));
        assert_eq!(records[2].text_content, TextValue::from("this"));
        assert_eq!(
            records[3].text_content,
            TextValue::from("SCROLL DOWN:SCROLL RIGHT")
        );
        assert!(records.iter().all(|r| r.width == 800 && r.enable_capture == Some(true)));
    }

    #[test]
    fn test_unknown_target_is_an_error() {
        let scenario: Scenario = serde_json::from_str(
            r##"{"events": [{"type": "pointerdown", "target": "#missing"}]}"##,
        )
        .unwrap();
        let result = replay(&scenario, Arc::new(MemoryTransport::new()), false);
        assert!(matches!(result, Err(TraceError::UnknownTarget(t)) if t == "#missing"));
    }

    #[test]
    fn test_malformed_file_is_invalid_scenario() {
        let file = write_scenario("{\"events\": [{\"type\": \"hover\"}]}");
        assert!(matches!(
            Scenario::from_path(file.path()),
            Err(TraceError::InvalidScenario(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Scenario::from_path(dir.path().join("absent.json"));
        assert!(matches!(result, Err(TraceError::IoError(_))));
    }

    #[test]
    fn test_submit_resolves_submitter() {
        let scenario: Scenario = serde_json::from_str(
            r##"{
                "document": [{"tag": "form", "attrs": {"id": "f"}, "children": [
                    {"tag": "input", "attrs": {"id": "go", "type": "submit", "name": "go", "value": "Go"}}
                ]}],
                "events": [{"type": "submit", "target": "#f", "submitter": "#go"}]
            }"##,
        )
        .unwrap();
        let transport = MemoryTransport::new();
        replay(&scenario, Arc::new(transport.clone()), false).unwrap();

        let records = transport.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].event_type, EventFamily::Submit);
        assert_eq!(records[0].xpath, "/html/body/form/input");
    }
}
