//! Page-level state read at emission time

use super::node::Document;
use serde::{Deserialize, Serialize};

/// Window metrics (`innerWidth`, `innerHeight`, `scrollX`, `scrollY`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub inner_width: u32,
    pub inner_height: u32,
    #[serde(default)]
    pub scroll_x: f64,
    #[serde(default)]
    pub scroll_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            inner_width: 1280,
            inner_height: 720,
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }
}

/// A loaded page: the document, the window metrics and the live selection
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub document: Document,
    pub viewport: Viewport,
    /// `document.getSelection().toString()`; `None` when nothing is selected
    pub selection: Option<String>,
}

impl Page {
    pub fn new(document: Document, viewport: Viewport) -> Self {
        Self {
            document,
            viewport,
            selection: None,
        }
    }

    pub fn scroll_to(&mut self, x: f64, y: f64) {
        self.viewport.scroll_x = x;
        self.viewport.scroll_y = y;
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport.inner_width = width;
        self.viewport.inner_height = height;
    }

    pub fn select_text(&mut self, text: impl Into<String>) {
        self.selection = Some(text.into());
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }
}
