//! Pointer families other than click: hover over annotated content, text
//! selection on mouse-up, and drops

use super::{label_or, Scope};
use crate::capture::event::RawEvent;
use crate::capture::shape::TargetShape;
use crate::trace::record::{EventFamily, InteractionContext, TraceRecord};
use crate::trace::state::SelectionDedup;

/// One `ADDTIONAL_KNOWLEDGE` record per knowledge tag covering the target
pub fn classify_mouseover(scope: &Scope<'_>, event: &RawEvent) -> Vec<TraceRecord> {
    let Some(node) = event.target.node() else {
        return Vec::new();
    };
    let tags = scope.annotations.tags_for(scope.doc(), node);
    if tags.is_empty() {
        return Vec::new();
    }

    let text = scope.text_content(node);
    let inner_text = scope.inner_text(node);
    let xpath = scope.xpath(node);
    tags.into_iter()
        .map(|tag| {
            let context = InteractionContext {
                inner_text: Some(inner_text.clone()),
                tag: Some(tag),
                ..Default::default()
            };
            scope
                .record(EventFamily::Mouseover, "ADDTIONAL_KNOWLEDGE")
                .pointer(event.pointer)
                .text(text.clone())
                .context(&context)
                .xpath(xpath.clone())
                .build()
        })
        .collect()
}

/// Report the live selection when it changed since the last report
pub fn classify_selection(
    scope: &Scope<'_>,
    dedup: &mut SelectionDedup,
    event: &RawEvent,
) -> Option<TraceRecord> {
    let selection = scope.page.selection.as_deref();
    if dedup.accept(selection).is_none() {
        tracing::debug!("Selection unchanged or empty, skipping");
        return None;
    }

    let (tag_name, xpath) = match event.target.node() {
        Some(node) => (scope.tag_name(node), scope.xpath(node)),
        None => (String::new(), String::new()),
    };
    Some(
        scope
            .record(EventFamily::Select, tag_name)
            .pointer(event.pointer)
            .text(selection.unwrap_or_default())
            .xpath(xpath)
            .build(),
    )
}

/// Drops onto an input, onto a `<div>` (reported as a click on the
/// container), or anywhere else as a degraded record
pub fn classify_drop(scope: &Scope<'_>, event: &RawEvent) -> Option<TraceRecord> {
    let node = event.target.node()?;
    let doc = scope.doc();

    match TargetShape::of_node(doc, node) {
        TargetShape::Input(input) => {
            let context = InteractionContext {
                name: Some(Some(label_or(&input.label, &input.name))),
                kind: Some(input.input_type),
                value: Some(input.value.clone().into()),
                inner_text: Some(scope.inner_text(node)),
                ..Default::default()
            };
            Some(
                scope
                    .record(EventFamily::Drop, "INPUT")
                    .text(input.value)
                    .context(&context)
                    .xpath(scope.xpath(node))
                    .build(),
            )
        }
        TargetShape::Div(div) => {
            Some(scope.container_record(EventFamily::Click, event, &div, None))
        }
        _ => {
            let text = match doc.text(node) {
                Some(data) => data.to_string(),
                None => doc.outer_html(node),
            };
            Some(
                scope
                    .record(EventFamily::Drop, scope.tag_name(node))
                    .pointer(event.pointer)
                    .text(text)
                    .xpath(scope.xpath(node))
                    .degraded()
                    .build(),
            )
        }
    }
}
