//! Form families: submit, paste and change

use super::{label_or, Scope};
use crate::capture::event::RawEvent;
use crate::capture::shape::TargetShape;
use crate::trace::record::{EventFamily, InteractionContext, TextValue, TraceRecord};

/// Only submissions triggered by an `<input>` submitter are reported
pub fn classify_submit(scope: &Scope<'_>, event: &RawEvent) -> Option<TraceRecord> {
    let submitter = event.submitter?;
    let TargetShape::Input(input) = TargetShape::of_node(scope.doc(), submitter) else {
        return None;
    };
    let context = InteractionContext {
        name: Some(Some(input.name)),
        value: Some(input.value.clone().into()),
        ..Default::default()
    };
    Some(
        scope
            .record(EventFamily::Submit, scope.tag_name(submitter))
            .text(input.value)
            .context(&context)
            .xpath(scope.xpath(submitter))
            .build(),
    )
}

/// Pastes into a textarea or an input; other targets are ignored
pub fn classify_paste(scope: &Scope<'_>, event: &RawEvent) -> Option<TraceRecord> {
    let node = event.target.node()?;
    let (tag_name, kind, name, value) = match TargetShape::of_node(scope.doc(), node) {
        TargetShape::TextArea(area) => (
            "TEXTAREA",
            "textarea".to_string(),
            label_or(&area.label, &scope.config.textarea_default_name),
            area.value,
        ),
        TargetShape::Input(input) => (
            "INPUT",
            input.input_type,
            label_or(&input.label, &input.name),
            input.value,
        ),
        _ => return None,
    };

    let context = InteractionContext {
        kind: Some(kind),
        name: Some(Some(name)),
        value: Some(value.clone().into()),
        ..Default::default()
    };
    Some(
        scope
            .record(EventFamily::Paste, tag_name)
            .text(value)
            .context(&context)
            .xpath(scope.xpath(node))
            .build(),
    )
}

/// Committed value changes of inputs, selects and textareas.
///
/// Checkboxes report their checked state as a boolean. A select without a
/// label is reported without a name. Textarea records carry
/// `shouldCapture`.
pub fn classify_change(scope: &Scope<'_>, event: &RawEvent) -> Option<TraceRecord> {
    let node = event.target.node()?;
    let doc = scope.doc();

    let record = match TargetShape::of_node(doc, node) {
        TargetShape::Input(input) => {
            let value: TextValue = if input.input_type == "checkbox" {
                input.checked.into()
            } else {
                input.value.clone().into()
            };
            let context = InteractionContext {
                name: Some(Some(label_or(&input.label, &input.name))),
                kind: Some(input.input_type),
                value: Some(value.clone()),
                ..Default::default()
            };
            scope
                .record(EventFamily::Change, "INPUT")
                .text(value)
                .context(&context)
        }
        TargetShape::Select(select) => {
            if select.label.is_none() {
                tracing::debug!("Change on unlabelled select at {}", scope.xpath(node));
            }
            let context = InteractionContext {
                kind: Some(select.select_type.clone()),
                name: Some(select.label.clone()),
                value: Some(select.selected_text().into()),
                ..Default::default()
            };
            scope
                .record(EventFamily::Change, "SELECT")
                .text(doc.select_value(node))
                .context(&context)
        }
        TargetShape::TextArea(area) => {
            let context = InteractionContext {
                kind: Some("textarea".to_string()),
                name: Some(Some(label_or(
                    &area.label,
                    &scope.config.textarea_default_name,
                ))),
                value: Some(area.value.clone().into()),
                ..Default::default()
            };
            scope
                .record(EventFamily::Change, "TEXTAREA")
                .text(area.value)
                .context(&context)
                .should_capture(true)
        }
        _ => return None,
    };

    Some(record.xpath(scope.xpath(node)).build())
}
