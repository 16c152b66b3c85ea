//! Event classification
//!
//! One function per event family. Each inspects the target's shape and
//! returns the records to emit (possibly none); retained state is passed in
//! explicitly by the caller.

pub mod click;
pub mod form;
pub mod keyboard;
pub mod page;
pub mod pointer;
pub mod scroll;

pub use click::classify_click;
pub use form::{classify_change, classify_paste, classify_submit};
pub use keyboard::classify_keyup;
pub use page::{classify_beforeunload, navigate_record};
pub use pointer::{classify_drop, classify_mouseover, classify_selection};
pub use scroll::classify_scroll;

use crate::adapters::{AnnotationSource, Locator};
use crate::capture::event::RawEvent;
use crate::capture::shape::DivTarget;
use crate::config::TraceConfig;
use crate::dom::{Document, NodeId, Page};
use crate::trace::record::{
    EventFamily, InteractionContext, RecordBuilder, RecordStamp, TraceRecord,
};

/// Everything a classifier reads for one handler invocation
pub struct Scope<'a> {
    pub page: &'a Page,
    pub config: &'a TraceConfig,
    pub locator: &'a dyn Locator,
    pub annotations: &'a dyn AnnotationSource,
    pub stamp: RecordStamp,
}

impl<'a> Scope<'a> {
    pub fn doc(&self) -> &'a Document {
        &self.page.document
    }

    pub fn xpath(&self, node: NodeId) -> String {
        self.locator.locate(self.doc(), node)
    }

    pub fn record(&self, family: EventFamily, tag_name: impl Into<String>) -> RecordBuilder {
        self.stamp.record(family, tag_name)
    }

    /// `tagName ?? nodeName`
    pub fn tag_name(&self, node: NodeId) -> String {
        self.doc()
            .tag_name(node)
            .unwrap_or_else(|| self.doc().node_name(node))
    }

    pub fn text_content(&self, node: NodeId) -> String {
        self.doc().text_content(node)
    }

    pub fn inner_text(&self, node: NodeId) -> String {
        self.doc().inner_text(node)
    }

    /// Record describing a `<div>` container: title, ARIA role as name and
    /// full text as value
    pub fn container_record(
        &self,
        family: EventFamily,
        event: &RawEvent,
        div: &DivTarget,
        origin: Option<String>,
    ) -> TraceRecord {
        let text = self.text_content(div.node);
        let context = InteractionContext {
            title: Some(div.title.clone()),
            name: Some(div.role.clone()),
            value: Some(text.clone().into()),
            inner_text: Some(self.inner_text(div.node)),
            origin,
            ..Default::default()
        };
        self.record(family, self.tag_name(div.node))
            .pointer(event.pointer)
            .text(text)
            .context(&context)
            .xpath(self.xpath(div.node))
            .build()
    }
}

/// Name of a labelled control: label text when present, otherwise the
/// fallback
pub(crate) fn label_or(label: &Option<String>, fallback: &str) -> String {
    label.clone().unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
pub(crate) mod fixture {
    use super::*;
    use crate::adapters::{AttributeAnnotations, XPathLocator};
    use crate::dom::Viewport;

    pub fn viewport() -> Viewport {
        Viewport {
            inner_width: 1024,
            inner_height: 768,
            ..Viewport::default()
        }
    }

    pub fn page() -> Page {
        Page::new(Document::new(), viewport())
    }

    pub fn scope<'a>(page: &'a Page, config: &'a TraceConfig) -> Scope<'a> {
        Scope {
            page,
            config,
            locator: &XPathLocator,
            annotations: &AttributeAnnotations,
            stamp: RecordStamp::new(&config.message_type, &page.viewport, true),
        }
    }
}
