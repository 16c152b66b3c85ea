//! Target shape resolution
//!
//! An event target is resolved once into a closed set of element kinds.
//! Checks run from the most specific kind to the most generic so that a
//! generic element never shadows a form control.

use crate::dom::{Document, Namespace, NodeData, NodeId};

#[derive(Debug, Clone, PartialEq)]
pub struct InputTarget {
    pub node: NodeId,
    /// Lowercased `type` attribute, `text` when missing
    pub input_type: String,
    /// `name` attribute, empty when missing
    pub name: String,
    pub value: String,
    pub checked: bool,
    pub placeholder: String,
    /// Rendered text of the first associated label
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectTarget {
    pub node: NodeId,
    /// `select-one` or `select-multiple`
    pub select_type: String,
    pub label: Option<String>,
    /// Rendered text of every option, in order
    pub options: Vec<String>,
    pub selected_index: Option<usize>,
}

impl SelectTarget {
    pub fn selected_text(&self) -> String {
        self.selected_index
            .and_then(|i| self.options.get(i))
            .cloned()
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnchorTarget {
    pub node: NodeId,
    /// Raw `href` attribute, not resolved against the document URL
    pub href: String,
    pub link_type: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ButtonTarget {
    pub node: NodeId,
    /// `type` attribute, `submit` when missing
    pub button_type: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextAreaTarget {
    pub node: NodeId,
    pub value: String,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DivTarget {
    pub node: NodeId,
    pub title: String,
    /// ARIA `role` attribute
    pub role: Option<String>,
}

impl DivTarget {
    /// `None` unless `node` is an HTML `<div>`
    pub fn of_node(doc: &Document, node: NodeId) -> Option<Self> {
        let element = doc.element(node).filter(|e| e.is("div"))?;
        Some(Self {
            node,
            title: element.attr("title").unwrap_or_default().to_string(),
            role: element.attr("role").map(str::to_string),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TargetShape {
    Input(InputTarget),
    Span(NodeId),
    Select(SelectTarget),
    Anchor(AnchorTarget),
    Button(ButtonTarget),
    /// Any element in the SVG namespace
    Svg(NodeId),
    TextArea(TextAreaTarget),
    Div(DivTarget),
    /// Any other HTML element
    Element(NodeId),
    Text(NodeId),
    /// Document node or a dangling id
    Other,
}

fn first_label(doc: &Document, control: NodeId) -> Option<String> {
    doc.labels(control)
        .first()
        .map(|label| doc.inner_text(*label))
}

impl TargetShape {
    pub fn of_node(doc: &Document, node: NodeId) -> Self {
        let element = match doc.node(node).map(|n| &n.data) {
            Some(NodeData::Element(element)) => element,
            Some(NodeData::Text(_)) => return TargetShape::Text(node),
            _ => return TargetShape::Other,
        };
        if element.namespace == Namespace::Svg {
            return TargetShape::Svg(node);
        }

        match element.local_name.as_str() {
            "input" => TargetShape::Input(InputTarget {
                node,
                input_type: element
                    .attr("type")
                    .map(str::to_ascii_lowercase)
                    .unwrap_or_else(|| "text".to_string()),
                name: element.attr("name").unwrap_or_default().to_string(),
                value: element.value.clone(),
                checked: element.checked,
                placeholder: element.attr("placeholder").unwrap_or_default().to_string(),
                label: first_label(doc, node),
            }),
            "span" => TargetShape::Span(node),
            "select" => TargetShape::Select(SelectTarget {
                node,
                select_type: if element.has_attr("multiple") {
                    "select-multiple".to_string()
                } else {
                    "select-one".to_string()
                },
                label: first_label(doc, node),
                options: doc
                    .options(node)
                    .into_iter()
                    .map(|option| doc.inner_text(option))
                    .collect(),
                selected_index: doc.selected_index(node),
            }),
            "a" => TargetShape::Anchor(AnchorTarget {
                node,
                href: element.attr("href").unwrap_or_default().to_string(),
                link_type: element.attr("type").unwrap_or_default().to_string(),
            }),
            "button" => TargetShape::Button(ButtonTarget {
                node,
                button_type: element
                    .attr("type")
                    .map(str::to_ascii_lowercase)
                    .unwrap_or_else(|| "submit".to_string()),
            }),
            "textarea" => TargetShape::TextArea(TextAreaTarget {
                node,
                value: element.value.clone(),
                label: first_label(doc, node),
            }),
            "div" => match DivTarget::of_node(doc, node) {
                Some(div) => TargetShape::Div(div),
                None => TargetShape::Element(node),
            },
            _ => TargetShape::Element(node),
        }
    }
}

/// Nearest `<div>` starting at `start` itself and walking up
pub fn nearest_div(doc: &Document, start: Option<NodeId>) -> Option<NodeId> {
    let start = start?;
    std::iter::once(start)
        .chain(doc.ancestors(start))
        .find(|n| doc.element(*n).map(|e| e.is("div")).unwrap_or(false))
}
