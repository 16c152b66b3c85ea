//! Pointer-down ("click") classification
//!
//! Besides the primary record for the target, a click on an SVG icon or on
//! an element without any text falls back to an enclosing `<div>`, which is
//! reported as a second, independent record.

use super::{label_or, Scope};
use crate::capture::event::RawEvent;
use crate::capture::shape::{nearest_div, DivTarget, SelectTarget, TargetShape};
use crate::dom::{Document, NodeId};
use crate::trace::record::{EventFamily, InteractionContext, TraceRecord};

pub fn classify_click(scope: &Scope<'_>, event: &RawEvent) -> Vec<TraceRecord> {
    let Some(node) = event.target.node() else {
        return Vec::new();
    };
    let doc = scope.doc();
    let mut records = Vec::new();
    // Container to report in addition, with the tag that led to it
    let mut fallback: Option<(DivTarget, String)> = None;

    match TargetShape::of_node(doc, node) {
        TargetShape::Input(input) => {
            let inner = scope.inner_text(node);
            let text = scope.text_content(node);
            let mut name = label_or(&input.label, &inner);
            if name.is_empty() && !text.is_empty() {
                name = text.clone();
            }
            let context = InteractionContext {
                kind: Some(input.input_type),
                name: Some(Some(name)),
                value: Some(input.value.into()),
                inner_text: Some(inner),
                placeholder: Some(input.placeholder),
                ..Default::default()
            };
            records.push(primary(scope, event, node, text, &context));
        }
        TargetShape::Span(span) => {
            let text = scope.text_content(span);
            let context = InteractionContext {
                name: Some(Some(text.clone())),
                inner_text: Some(scope.inner_text(span)),
                ..Default::default()
            };
            records.push(primary(scope, event, span, text, &context));
        }
        TargetShape::Select(select) => {
            if let Some(record) = select_click(scope, event, &select) {
                records.push(record);
            }
        }
        TargetShape::Anchor(anchor) => {
            let inner = scope.inner_text(node);
            let context = InteractionContext {
                kind: Some(anchor.link_type),
                name: Some(Some(inner.clone())),
                value: Some(anchor.href.into()),
                inner_text: Some(inner.clone()),
                text_content: Some(scope.text_content(node)),
                ..Default::default()
            };
            records.push(primary(scope, event, node, inner, &context));
        }
        TargetShape::Button(button) => {
            let text = scope.text_content(node);
            let inner = scope.inner_text(node);
            let context = InteractionContext {
                kind: Some(button.button_type),
                name: Some(Some(text.clone())),
                value: Some(inner.clone().into()),
                inner_text: Some(inner),
                ..Default::default()
            };
            records.push(primary(scope, event, node, text, &context));
        }
        TargetShape::Svg(svg) => {
            fallback = svg_fallback(doc, svg)
                .and_then(|div| DivTarget::of_node(doc, div))
                .map(|div| (div, "svg".to_string()));
            if fallback.is_none() {
                tracing::debug!("No text-bearing container for svg click, skipping");
            }
        }
        TargetShape::TextArea(_) | TargetShape::Div(_) | TargetShape::Element(_) => {
            let inner = scope.inner_text(node);
            let text = scope.text_content(node);
            if !inner.is_empty() || !text.is_empty() {
                let context = InteractionContext {
                    name: Some(Some(text.clone())),
                    value: Some(inner.clone().into()),
                    inner_text: Some(inner),
                    ..Default::default()
                };
                records.push(primary(scope, event, node, text, &context));
            } else {
                fallback = nearest_div(doc, Some(node))
                    .and_then(|div| DivTarget::of_node(doc, div))
                    .map(|div| (div, scope.tag_name(node)));
            }
        }
        TargetShape::Text(_) | TargetShape::Other => {}
    }

    if let Some((div, origin)) = fallback {
        records.push(scope.container_record(EventFamily::Click, event, &div, Some(origin)));
    }
    records
}

fn primary(
    scope: &Scope<'_>,
    event: &RawEvent,
    node: NodeId,
    text: String,
    context: &InteractionContext,
) -> TraceRecord {
    scope
        .record(EventFamily::Click, scope.tag_name(node))
        .pointer(event.pointer)
        .text(text)
        .context(context)
        .xpath(scope.xpath(node))
        .build()
}

/// Labelled selects are named by their label, unlabelled ones by their
/// first option; a select with neither is not reported
fn select_click(scope: &Scope<'_>, event: &RawEvent, select: &SelectTarget) -> Option<TraceRecord> {
    let name = match (&select.label, select.options.first()) {
        (Some(label), _) => label.clone(),
        (None, Some(first)) => first.clone(),
        (None, None) => return None,
    };
    let context = InteractionContext {
        kind: Some(select.select_type.clone()),
        name: Some(Some(name)),
        value: Some(select.selected_text().into()),
        inner_text: Some(scope.inner_text(select.node)),
        ..Default::default()
    };
    Some(primary(
        scope,
        event,
        select.node,
        scope.text_content(select.node),
        &context,
    ))
}

fn is_div_with_text(doc: &Document, node: NodeId) -> bool {
    doc.element(node).map(|e| e.is("div")).unwrap_or(false) && !doc.inner_text(node).is_empty()
}

/// Enclosing `<div>` of an SVG element, or the nearest sibling `<div>` with
/// text when the enclosing one has none (forward first, then backward)
fn svg_fallback(doc: &Document, svg: NodeId) -> Option<NodeId> {
    let container = nearest_div(doc, doc.parent_element(svg))?;
    if !doc.inner_text(container).is_empty() {
        return Some(container);
    }

    let mut next = doc.next_element_sibling(container);
    while let Some(sibling) = next {
        if is_div_with_text(doc, sibling) {
            return Some(sibling);
        }
        next = doc.next_element_sibling(sibling);
    }

    let mut previous = doc.previous_element_sibling(container);
    while let Some(sibling) = previous {
        if is_div_with_text(doc, sibling) {
            return Some(sibling);
        }
        previous = doc.previous_element_sibling(sibling);
    }
    None
}
