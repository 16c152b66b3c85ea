//! Minimal document model
//!
//! Trace classification inspects element kinds, labels, form state and
//! rendered text. This module provides exactly that over an arena tree,
//! plus the page-level viewport and selection state.

pub mod builder;
pub mod node;
pub mod page;
pub mod text;

pub use builder::NodeSpec;
pub use node::{Document, Element, Namespace, NodeData, NodeId};
pub use page::{Page, Viewport};
