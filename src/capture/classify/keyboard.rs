//! Key-up classification

use super::Scope;
use crate::capture::event::{KeyInfo, RawEvent};
use crate::capture::shape::TargetShape;
use crate::trace::record::{EventFamily, EventSource, InteractionContext, TraceRecord};
use crate::trace::state::LastEvent;

/// Every key-up inside the body is reported; the record's text is the key
/// code. Also refreshes `last` with the keyboard fields.
pub fn classify_keyup(
    scope: &Scope<'_>,
    last: &mut LastEvent,
    event: &RawEvent,
) -> Option<TraceRecord> {
    let node = event.target.node()?;
    let doc = scope.doc();
    let KeyInfo { code, key } = event.keys.clone().unwrap_or_default();

    let (name, value) = match TargetShape::of_node(doc, node) {
        TargetShape::Input(input) => (Some(input.name), input.value),
        TargetShape::TextArea(_) | TargetShape::Div(_) => (None, scope.inner_text(node)),
        _ => (Some(doc.node_name(node)), scope.inner_text(node)),
    };

    let tag_name = doc.node_name(node);
    let xpath = scope.xpath(node);
    let context = InteractionContext {
        code: Some(code.clone()),
        key: Some(key.clone()),
        name: Some(name.clone()),
        value: Some(value.clone().into()),
        ..Default::default()
    };
    let record = scope
        .record(EventFamily::Keyup, tag_name.clone())
        .keys(&code, &key)
        .text(code.clone())
        .context(&context)
        .source(EventSource::Keyboard)
        .xpath(xpath.clone())
        .build();

    *last = LastEvent {
        tag_name: Some(tag_name),
        xpath: Some(xpath),
        name,
        value: Some(value),
        code: Some(code),
        key: Some(key),
        ..LastEvent::basic("keyup", event.time_stamp)
    };
    Some(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::classify::fixture;
    use crate::config::TraceConfig;
    use crate::trace::record::TextValue;

    #[test]
    fn test_keyup_on_input_reports_name_and_value() {
        let mut page = fixture::page();
        let body = page.document.body();
        let input = page
            .document
            .append_element(body, "input", &[("name", "email"), ("value", "ab")]);

        let config = TraceConfig::default();
        let mut last = LastEvent::default();
        let record = classify_keyup(
            &fixture::scope(&page, &config),
            &mut last,
            &RawEvent::key_up(input, 12.0, "KeyB", "b"),
        )
        .unwrap();

        assert_eq!(record.tag_name, "INPUT");
        assert_eq!(record.text_content, TextValue::from("KeyB"));
        assert_eq!(record.code.as_deref(), Some("KeyB"));
        assert_eq!(record.key.as_deref(), Some("b"));
        assert_eq!(record.event_source, Some(EventSource::Keyboard));
        let context = record.context().unwrap();
        assert_eq!(context.name(), Some("email"));
        assert_eq!(context.value, Some(TextValue::from("ab")));

        assert_eq!(last.event_type, "keyup");
        assert_eq!(last.time_stamp, 12.0);
        assert_eq!(last.code.as_deref(), Some("KeyB"));
        assert_eq!(last.xpath.as_deref(), Some("/html/body/input"));
    }

    #[test]
    fn test_keyup_on_editable_div_has_null_name() {
        let mut page = fixture::page();
        let body = page.document.body();
        let div = page.document.append_element(body, "div", &[("contenteditable", "")]);
        page.document.append_text(div, "draft");

        let config = TraceConfig::default();
        let mut last = LastEvent::default();
        let record = classify_keyup(
            &fixture::scope(&page, &config),
            &mut last,
            &RawEvent::key_up(div, 1.0, "Enter", "Enter"),
        )
        .unwrap();

        let json: serde_json::Value =
            serde_json::from_str(record.interaction_context.as_deref().unwrap()).unwrap();
        assert!(json["name"].is_null());
        assert!(json.as_object().unwrap().contains_key("name"));
        assert_eq!(json["value"], "draft");
        assert_eq!(last.name, None);
    }

    #[test]
    fn test_keyup_elsewhere_uses_node_name() {
        let mut page = fixture::page();
        let body = page.document.body();
        let paragraph = page.document.append_element(body, "p", &[]);
        page.document.append_text(paragraph, "hi");

        let config = TraceConfig::default();
        let mut last = LastEvent::default();
        let record = classify_keyup(
            &fixture::scope(&page, &config),
            &mut last,
            &RawEvent::key_up(paragraph, 1.0, "Escape", "Escape"),
        )
        .unwrap();
        let context = record.context().unwrap();
        assert_eq!(context.name(), Some("P"));
        assert_eq!(context.value, Some(TextValue::from("hi")));
    }
}
