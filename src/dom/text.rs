//! Text extraction: raw text content, rendered text and markup

use super::node::{Document, Element, NodeData, NodeId};

const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "details", "dialog", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "li", "main", "nav", "ol", "option", "p", "pre", "section", "summary",
    "table", "tr", "ul",
];

const NEVER_RENDERED: &[&str] = &["head", "noscript", "script", "style", "template"];

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

fn is_hidden(element: &Element) -> bool {
    if element.has_attr("hidden") || NEVER_RENDERED.contains(&element.local_name.as_str()) {
        return true;
    }
    element
        .attr("style")
        .map(|style| {
            style
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_ascii_lowercase()
                .contains("display:none")
        })
        .unwrap_or(false)
}

fn push_collapsed(out: &mut String, text: &str) {
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
}

fn normalize_lines(raw: &str) -> String {
    raw.split('\n')
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape(text: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

impl Document {
    /// Concatenated data of every descendant text node
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.text(id) {
            return text.to_string();
        }
        self.descendants(id)
            .into_iter()
            .filter_map(|d| self.text(d))
            .collect()
    }

    /// Rendered text: hidden subtrees are skipped, whitespace is collapsed
    /// and block-level elements start on their own line
    pub fn inner_text(&self, id: NodeId) -> String {
        match self.node(id).map(|n| &n.data) {
            Some(NodeData::Text(text)) => normalize_lines(text),
            Some(NodeData::Element(element)) if is_hidden(element) => String::new(),
            Some(_) => {
                let mut raw = String::new();
                self.render_into(id, &mut raw);
                normalize_lines(&raw)
            }
            None => String::new(),
        }
    }

    fn render_into(&self, id: NodeId, out: &mut String) {
        for child in self.children(id) {
            match self.node(*child).map(|n| &n.data) {
                Some(NodeData::Text(text)) => push_collapsed(out, text),
                Some(NodeData::Element(element)) => {
                    if is_hidden(element) {
                        continue;
                    }
                    if element.local_name == "br" {
                        out.push('\n');
                        continue;
                    }
                    let block = BLOCK_ELEMENTS.contains(&element.local_name.as_str());
                    if block {
                        out.push('\n');
                    }
                    self.render_into(*child, out);
                    if block {
                        out.push('\n');
                    }
                }
                _ => {}
            }
        }
    }

    /// Serialized markup of a node and its subtree
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.serialize_into(id, &mut out);
        out
    }

    fn serialize_into(&self, id: NodeId, out: &mut String) {
        match self.node(id).map(|n| &n.data) {
            Some(NodeData::Text(text)) => out.push_str(&escape(text, false)),
            Some(NodeData::Element(element)) => {
                out.push('<');
                out.push_str(&element.local_name);
                for (name, value) in element.attrs() {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape(value, true));
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&element.local_name.as_str()) {
                    return;
                }
                for child in self.children(id) {
                    self.serialize_into(*child, out);
                }
                out.push_str("</");
                out.push_str(&element.local_name);
                out.push('>');
            }
            Some(NodeData::Document) => {
                for child in self.children(id) {
                    self.serialize_into(*child, out);
                }
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_content_includes_hidden_text() {
        let mut doc = Document::new();
        let body = doc.body();
        let div = doc.append_element(body, "div", &[]);
        doc.append_text(div, "Visible ");
        let hidden = doc.append_element(div, "span", &[("hidden", "")]);
        doc.append_text(hidden, "secret");

        assert_eq!(doc.text_content(div), "Visible secret");
        assert_eq!(doc.inner_text(div), "Visible");
    }

    #[test]
    fn test_inner_text_breaks_blocks_and_collapses_space() {
        let mut doc = Document::new();
        let body = doc.body();
        let list = doc.append_element(body, "ul", &[]);
        let first = doc.append_element(list, "li", &[]);
        doc.append_text(first, "  one \n  item ");
        let second = doc.append_element(list, "li", &[]);
        doc.append_text(second, "two");

        assert_eq!(doc.inner_text(list), "one item\ntwo");
    }

    #[test]
    fn test_inner_text_respects_display_none() {
        let mut doc = Document::new();
        let body = doc.body();
        let div = doc.append_element(body, "div", &[("style", "display: none")]);
        doc.append_text(div, "gone");
        assert_eq!(doc.inner_text(div), "");
    }

    #[test]
    fn test_outer_html_escapes_and_skips_void_close() {
        let mut doc = Document::new();
        let body = doc.body();
        let p = doc.append_element(body, "p", &[("title", "a \"quote\"")]);
        doc.append_text(p, "1 < 2");
        doc.append_element(p, "br", &[]);

        assert_eq!(
            doc.outer_html(p),
            "<p title=\"a &quot;quote&quot;\">1 &lt; 2<br></p>"
        );
    }
}
