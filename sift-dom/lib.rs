//! A small in-memory element tree.
//!
//! Just enough of a document to host a widget without a rendering surface:
//! elements with attributes and classes, text, live form state (field values,
//! checked radios), focus with a text selection, and compound selectors with
//! the descendant combinator.

pub mod document;
pub mod selector;

pub use document::{
  Document,
  NodeId,
};
pub use selector::{
  Selector,
  SelectorError,
};
