//! Declarative document description used by replay scenarios

use super::node::{Document, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One node of a document description.
///
/// A bare JSON string is a text node; an object is an element:
/// `{"tag": "label", "attrs": {"for": "q"}, "children": ["Query"]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeSpec {
    Text(String),
    Element {
        tag: String,
        #[serde(default)]
        attrs: BTreeMap<String, String>,
        #[serde(default)]
        children: Vec<NodeSpec>,
    },
}

impl Document {
    /// Build a document whose `<body>` holds the described nodes
    pub fn from_body_spec(body: &[NodeSpec]) -> Self {
        let mut doc = Document::new();
        let root = doc.body();
        for spec in body {
            doc.append_spec(root, spec);
        }
        doc
    }

    pub fn append_spec(&mut self, parent: NodeId, spec: &NodeSpec) -> NodeId {
        match spec {
            NodeSpec::Text(text) => self.append_text(parent, text),
            NodeSpec::Element {
                tag,
                attrs,
                children,
            } => {
                let pairs: Vec<(&str, &str)> = attrs
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str()))
                    .collect();
                let id = self.append_element(parent, tag, &pairs);
                for child in children {
                    self.append_spec(id, child);
                }
                id
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_from_json_spec() {
        let json = r#"[
            {"tag": "label", "attrs": {"for": "q"}, "children": ["Query"]},
            {"tag": "input", "attrs": {"id": "q", "value": "rust"}}
        ]"#;
        let spec: Vec<NodeSpec> = serde_json::from_str(json).unwrap();
        let doc = Document::from_body_spec(&spec);

        let input = doc.get_element_by_id("q").unwrap();
        assert_eq!(doc.element(input).unwrap().value, "rust");
        let labels = doc.labels(input);
        assert_eq!(labels.len(), 1);
        assert_eq!(doc.inner_text(labels[0]), "Query");
    }
}
