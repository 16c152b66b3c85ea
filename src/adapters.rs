//! Locator and annotation adapters
//!
//! The pipeline treats both as external collaborators. Hosts plug in their
//! own implementations; the defaults here work over the crate's document
//! model.

use crate::dom::{Document, NodeData, NodeId};
use serde::{Deserialize, Serialize};

/// Resolves a stable structural path for a node
pub trait Locator: Send + Sync {
    fn locate(&self, doc: &Document, node: NodeId) -> String;
}

impl<F> Locator for F
where
    F: Fn(&Document, NodeId) -> String + Send + Sync,
{
    fn locate(&self, doc: &Document, node: NodeId) -> String {
        self(doc, node)
    }
}

/// Externally defined annotation attached to a node or one of its ancestors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeTag {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Looks up the knowledge tags covering a node
pub trait AnnotationSource: Send + Sync {
    fn tags_for(&self, doc: &Document, node: NodeId) -> Vec<KnowledgeTag>;
}

/// Absolute, index-qualified path such as `/html/body/div[2]/span`.
///
/// A step carries an index only when the parent has more than one child of
/// the same name.
#[derive(Debug, Clone, Copy, Default)]
pub struct XPathLocator;

impl XPathLocator {
    fn step_name(doc: &Document, node: NodeId) -> Option<String> {
        match &doc.node(node)?.data {
            NodeData::Element(element) => Some(element.local_name.clone()),
            NodeData::Text(_) => Some("text()".to_string()),
            NodeData::Document => None,
        }
    }

    fn step(doc: &Document, node: NodeId) -> Option<String> {
        let name = Self::step_name(doc, node)?;
        let Some(parent) = doc.parent(node) else {
            return Some(name);
        };
        let peers: Vec<NodeId> = doc
            .children(parent)
            .iter()
            .copied()
            .filter(|c| Self::step_name(doc, *c).as_deref() == Some(name.as_str()))
            .collect();
        if peers.len() > 1 {
            let position = peers.iter().position(|p| *p == node).unwrap_or(0) + 1;
            Some(format!("{}[{}]", name, position))
        } else {
            Some(name)
        }
    }
}

impl Locator for XPathLocator {
    fn locate(&self, doc: &Document, node: NodeId) -> String {
        let mut steps: Vec<String> = std::iter::once(node)
            .chain(doc.ancestors(node))
            .filter_map(|n| Self::step(doc, n))
            .collect();
        if steps.is_empty() {
            return String::new();
        }
        steps.reverse();
        format!("/{}", steps.join("/"))
    }
}

/// Reads tags from `data-knowledge` attributes (comma-separated ids) on the
/// node and its ancestors, nearest first. `data-knowledge-label` on the same
/// element supplies the label.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeAnnotations;

impl AnnotationSource for AttributeAnnotations {
    fn tags_for(&self, doc: &Document, node: NodeId) -> Vec<KnowledgeTag> {
        std::iter::once(node)
            .chain(doc.ancestors(node))
            .filter_map(|n| doc.element(n))
            .flat_map(|element| {
                let label = element.attr("data-knowledge-label").map(str::to_string);
                element
                    .attr("data-knowledge")
                    .unwrap_or_default()
                    .split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(move |id| KnowledgeTag {
                        id: id.to_string(),
                        label: label.clone(),
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

/// Annotation source for pages without knowledge tags
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAnnotations;

impl AnnotationSource for NoAnnotations {
    fn tags_for(&self, _doc: &Document, _node: NodeId) -> Vec<KnowledgeTag> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xpath_indexes_only_ambiguous_steps() {
        let mut doc = Document::new();
        let body = doc.body();
        doc.append_element(body, "div", &[]);
        let second = doc.append_element(body, "div", &[]);
        let span = doc.append_element(second, "span", &[]);

        assert_eq!(XPathLocator.locate(&doc, span), "/html/body/div[2]/span");
        assert_eq!(XPathLocator.locate(&doc, body), "/html/body");
        assert_eq!(XPathLocator.locate(&doc, doc.root()), "");
    }

    #[test]
    fn test_xpath_for_text_nodes() {
        let mut doc = Document::new();
        let body = doc.body();
        let p = doc.append_element(body, "p", &[]);
        doc.append_text(p, "a");
        doc.append_element(p, "br", &[]);
        let second = doc.append_text(p, "b");

        assert_eq!(XPathLocator.locate(&doc, second), "/html/body/p/text()[2]");
    }

    #[test]
    fn test_closure_locator() {
        let doc = Document::new();
        let locator = |_: &Document, node: NodeId| format!("node-{}", node.index());
        assert_eq!(locator.locate(&doc, doc.body()), "node-2");
    }

    #[test]
    fn test_attribute_annotations_walk_ancestors() {
        let mut doc = Document::new();
        let body = doc.body();
        let section = doc.append_element(
            body,
            "section",
            &[("data-knowledge", "k1, k2"), ("data-knowledge-label", "Glossary")],
        );
        let em = doc.append_element(section, "em", &[("data-knowledge", "k3")]);

        let tags = AttributeAnnotations.tags_for(&doc, em);
        let ids: Vec<&str> = tags.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["k3", "k1", "k2"]);
        assert_eq!(tags[1].label.as_deref(), Some("Glossary"));
        assert!(NoAnnotations.tags_for(&doc, em).is_empty());
    }
}
