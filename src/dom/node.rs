//! Arena-backed document tree
//!
//! Nodes live in a flat `Vec` and reference each other by `NodeId`. The tree
//! only models what trace classification needs: element kinds, attributes,
//! live form state and text.

use serde::{Deserialize, Serialize};

/// Index of a node inside its `Document`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Element namespace; SVG elements are reported with their verbatim tag name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Html,
    Svg,
}

#[derive(Debug, Clone)]
pub struct Element {
    /// Lowercase local name (`div`, `input`, `path`)
    pub local_name: String,
    pub namespace: Namespace,
    attrs: Vec<(String, String)>,
    /// Live value of form controls (input, textarea)
    pub value: String,
    /// Live checkedness of checkbox/radio inputs
    pub checked: bool,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|(key, _)| key == name)
    }

    pub fn attrs(&self) -> &[(String, String)] {
        &self.attrs
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.attrs.push((name.to_string(), value.to_string())),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|(key, _)| key != name);
    }

    pub fn is(&self, local_name: &str) -> bool {
        self.namespace == Namespace::Html && self.local_name == local_name
    }
}

#[derive(Debug, Clone)]
pub enum NodeData {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub data: NodeData,
}

/// A document with `<html>` and `<body>` already in place
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    html: NodeId,
    body: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                data: NodeData::Document,
            }],
            root: NodeId(0),
            html: NodeId(0),
            body: NodeId(0),
        };
        doc.html = doc.append_element(doc.root, "html", &[]);
        doc.body = doc.append_element(doc.html, "body", &[]);
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push_node(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: Some(parent),
            children: Vec::new(),
            data,
        });
        if let Some(parent) = self.nodes.get_mut(parent.0) {
            parent.children.push(id);
        }
        id
    }

    /// Append an element under `parent`. Elements below an `<svg>` (and the
    /// `<svg>` itself) land in the SVG namespace.
    pub fn append_element(&mut self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let local_name = tag.to_ascii_lowercase();
        let parent_is_svg = self
            .element(parent)
            .map(|e| e.namespace == Namespace::Svg)
            .unwrap_or(false);
        let namespace = if parent_is_svg || local_name == "svg" {
            Namespace::Svg
        } else {
            Namespace::Html
        };

        let attrs: Vec<(String, String)> = attrs
            .iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
            .collect();
        let value = attrs
            .iter()
            .find(|(k, _)| k == "value")
            .map(|(_, v)| v.clone())
            .unwrap_or_default();
        let checked = attrs.iter().any(|(k, _)| k == "checked");

        self.push_node(
            parent,
            NodeData::Element(Element {
                local_name,
                namespace,
                attrs,
                value,
                checked,
            }),
        )
    }

    /// Append a text node. Text appended directly to a `<textarea>` also
    /// becomes its value, mirroring default-value parsing.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let id = self.push_node(parent, NodeData::Text(text.to_string()));
        if let Some(element) = self.element_mut(parent) {
            if element.is("textarea") {
                element.value.push_str(text);
            }
        }
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes.get(id.0)?.data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(id.0)?.data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes.get(id.0)?.data {
            NodeData::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attr(name)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|p| self.element(*p).is_some())
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Proper ancestors, nearest first
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: self.parent(id),
        }
    }

    /// Descendants in tree order, excluding `id` itself
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        ancestor == node || self.ancestors(node).any(|a| a == ancestor)
    }

    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(id)?);
        let pos = siblings.iter().position(|s| *s == id)?;
        siblings[pos + 1..]
            .iter()
            .copied()
            .find(|s| self.element(*s).is_some())
    }

    pub fn previous_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(id)?);
        let pos = siblings.iter().position(|s| *s == id)?;
        siblings[..pos]
            .iter()
            .rev()
            .copied()
            .find(|s| self.element(*s).is_some())
    }

    pub fn get_element_by_id(&self, element_id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|id| self.attr(*id, "id") == Some(element_id))
    }

    /// `tagName`: upper-case for HTML elements, verbatim for SVG
    pub fn tag_name(&self, id: NodeId) -> Option<String> {
        let element = self.element(id)?;
        Some(match element.namespace {
            Namespace::Html => element.local_name.to_ascii_uppercase(),
            Namespace::Svg => element.local_name.clone(),
        })
    }

    /// `nodeName`: the tag name for elements, `#text` / `#document` otherwise
    pub fn node_name(&self, id: NodeId) -> String {
        match self.node(id).map(|n| &n.data) {
            Some(NodeData::Element(_)) => self.tag_name(id).unwrap_or_default(),
            Some(NodeData::Text(_)) => "#text".to_string(),
            Some(NodeData::Document) => "#document".to_string(),
            None => String::new(),
        }
    }

    /// Label elements associated with a form control, in tree order
    pub fn labels(&self, control: NodeId) -> Vec<NodeId> {
        let own_id = self.attr(control, "id");
        self.descendants(self.root)
            .into_iter()
            .filter(|candidate| {
                let Some(label) = self.element(*candidate) else {
                    return false;
                };
                if !label.is("label") {
                    return false;
                }
                match label.attr("for") {
                    Some(target) => Some(target) == own_id,
                    None => self.contains(*candidate, control) && *candidate != control,
                }
            })
            .collect()
    }

    /// `<option>` descendants of a select, in tree order
    pub fn options(&self, select: NodeId) -> Vec<NodeId> {
        self.descendants(select)
            .into_iter()
            .filter(|id| self.element(*id).map(|e| e.is("option")).unwrap_or(false))
            .collect()
    }

    /// Index of the selected option: the last option carrying `selected`,
    /// otherwise the first option. `None` for an empty select.
    pub fn selected_index(&self, select: NodeId) -> Option<usize> {
        let options = self.options(select);
        if options.is_empty() {
            return None;
        }
        let selected = options
            .iter()
            .rposition(|id| self.element(*id).map(|e| e.has_attr("selected")).unwrap_or(false));
        Some(selected.unwrap_or(0))
    }

    /// Value of a select: the selected option's `value` attribute, falling
    /// back to its text content
    pub fn select_value(&self, select: NodeId) -> String {
        let options = self.options(select);
        self.selected_index(select)
            .and_then(|i| options.get(i).copied())
            .map(|option| match self.attr(option, "value") {
                Some(value) => value.to_string(),
                None => self.text_content(option).trim().to_string(),
            })
            .unwrap_or_default()
    }

    pub fn set_value(&mut self, id: NodeId, value: &str) {
        if let Some(element) = self.element_mut(id) {
            element.value = value.to_string();
        }
    }

    pub fn set_checked(&mut self, id: NodeId, checked: bool) {
        if let Some(element) = self.element_mut(id) {
            element.checked = checked;
        }
    }

    /// Mark option `index` of a select as the selected one
    pub fn select_option(&mut self, select: NodeId, index: usize) {
        for (i, option) in self.options(select).into_iter().enumerate() {
            if let Some(element) = self.element_mut(option) {
                if i == index {
                    element.set_attr("selected", "");
                } else {
                    element.remove_attr("selected");
                }
            }
        }
    }
}

pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.doc.parent(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_has_body() {
        let doc = Document::new();
        assert_eq!(doc.tag_name(doc.body()).as_deref(), Some("BODY"));
        assert_eq!(doc.node_name(doc.root()), "#document");
    }

    #[test]
    fn test_svg_namespace_is_inherited() {
        let mut doc = Document::new();
        let body = doc.body();
        let svg = doc.append_element(body, "svg", &[]);
        let path = doc.append_element(svg, "path", &[]);

        assert_eq!(doc.element(path).unwrap().namespace, Namespace::Svg);
        assert_eq!(doc.tag_name(path).as_deref(), Some("path"));
        assert_eq!(doc.tag_name(svg).as_deref(), Some("svg"));
    }

    #[test]
    fn test_labels_by_for_and_ancestor() {
        let mut doc = Document::new();
        let body = doc.body();
        let wrapper = doc.append_element(body, "label", &[]);
        let nested = doc.append_element(wrapper, "input", &[("id", "email")]);
        let by_for = doc.append_element(body, "label", &[("for", "email")]);
        let other = doc.append_element(body, "input", &[("id", "other")]);

        assert_eq!(doc.labels(nested), vec![wrapper, by_for]);
        assert!(doc.labels(other).is_empty());
    }

    #[test]
    fn test_element_siblings_skip_text() {
        let mut doc = Document::new();
        let body = doc.body();
        let a = doc.append_element(body, "div", &[]);
        doc.append_text(body, "gap");
        let b = doc.append_element(body, "div", &[]);

        assert_eq!(doc.next_element_sibling(a), Some(b));
        assert_eq!(doc.previous_element_sibling(b), Some(a));
        assert_eq!(doc.previous_element_sibling(a), None);
    }

    #[test]
    fn test_selected_index_defaults_to_first() {
        let mut doc = Document::new();
        let body = doc.body();
        let select = doc.append_element(body, "select", &[]);
        assert_eq!(doc.selected_index(select), None);

        let first = doc.append_element(select, "option", &[("value", "a")]);
        doc.append_text(first, "Alpha");
        let second = doc.append_element(select, "option", &[]);
        doc.append_text(second, "Beta");
        assert_eq!(doc.selected_index(select), Some(0));
        assert_eq!(doc.select_value(select), "a");

        doc.select_option(select, 1);
        assert_eq!(doc.selected_index(select), Some(1));
        assert_eq!(doc.select_value(select), "Beta");
    }

    #[test]
    fn test_textarea_text_becomes_value() {
        let mut doc = Document::new();
        let body = doc.body();
        let area = doc.append_element(body, "textarea", &[]);
        doc.append_text(area, "draft");
        assert_eq!(doc.element(area).unwrap().value, "draft");
    }
}
