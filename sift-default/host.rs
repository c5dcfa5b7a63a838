//! The document operations the widget needs from its host.

use std::fmt;

use sift_dom::{
  Document,
  NodeId,
  SelectorError,
};

/// A mutable element tree the widget can be attached to.
///
/// Nodes are cheap handles; the host owns the elements behind them. Selector
/// syntax is whatever the host understands, the widget itself only uses tag,
/// attribute and descendant selectors.
pub trait Host {
  type Node: Copy + Eq + fmt::Debug;
  type Error: fmt::Display;

  fn document_root(&self) -> Self::Node;

  /// Elements below `scope` matching `selector`, in document order.
  fn query_all(&self, scope: Self::Node, selector: &str) -> Result<Vec<Self::Node>, Self::Error>;
  /// `node` itself or its nearest ancestor matching `selector`.
  fn closest(&self, node: Self::Node, selector: &str) -> Result<Option<Self::Node>, Self::Error>;
  fn parent(&self, node: Self::Node) -> Option<Self::Node>;
  fn children(&self, node: Self::Node) -> Vec<Self::Node>;
  fn element_by_id(&self, id: &str) -> Option<Self::Node>;

  fn attr(&self, node: Self::Node, name: &str) -> Option<String>;
  fn set_attr(&mut self, node: Self::Node, name: &str, value: &str);
  fn remove_attr(&mut self, node: Self::Node, name: &str);
  fn add_class(&mut self, node: Self::Node, class: &str);

  fn text_content(&self, node: Self::Node) -> String;
  fn value(&self, node: Self::Node) -> String;
  fn set_value(&mut self, node: Self::Node, value: &str);
  fn is_checked(&self, node: Self::Node) -> bool;
  fn set_checked(&mut self, node: Self::Node, checked: bool);
  fn set_hidden(&mut self, node: Self::Node, hidden: bool);
  /// Focus a text field and select all of its text.
  fn focus_and_select(&mut self, node: Self::Node);

  fn create_element(&mut self, tag: &str) -> Self::Node;
  fn append_child(&mut self, parent: Self::Node, child: Self::Node);
  fn append_text(&mut self, parent: Self::Node, text: &str);
  fn insert_after(&mut self, reference: Self::Node, node: Self::Node);
  fn remove(&mut self, node: Self::Node);

  /// Short human-readable description of `node` for diagnostics.
  fn describe(&self, node: Self::Node) -> String;
}

impl Host for Document {
  type Node = NodeId;
  type Error = SelectorError;

  fn document_root(&self) -> NodeId {
    self.root()
  }

  fn query_all(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
    Document::query_all(self, scope, selector)
  }

  fn closest(&self, node: NodeId, selector: &str) -> Result<Option<NodeId>, SelectorError> {
    Document::closest(self, node, selector)
  }

  fn parent(&self, node: NodeId) -> Option<NodeId> {
    Document::parent(self, node)
  }

  fn children(&self, node: NodeId) -> Vec<NodeId> {
    Document::children(self, node).to_vec()
  }

  fn element_by_id(&self, id: &str) -> Option<NodeId> {
    Document::element_by_id(self, id)
  }

  fn attr(&self, node: NodeId, name: &str) -> Option<String> {
    Document::attr(self, node, name).map(str::to_string)
  }

  fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
    Document::set_attr(self, node, name, value);
  }

  fn remove_attr(&mut self, node: NodeId, name: &str) {
    Document::remove_attr(self, node, name);
  }

  fn add_class(&mut self, node: NodeId, class: &str) {
    Document::add_class(self, node, class);
  }

  fn text_content(&self, node: NodeId) -> String {
    Document::text_content(self, node)
  }

  fn value(&self, node: NodeId) -> String {
    Document::value(self, node)
  }

  fn set_value(&mut self, node: NodeId, value: &str) {
    Document::set_value(self, node, value);
  }

  fn is_checked(&self, node: NodeId) -> bool {
    Document::is_checked(self, node)
  }

  fn set_checked(&mut self, node: NodeId, checked: bool) {
    Document::set_checked(self, node, checked);
  }

  fn set_hidden(&mut self, node: NodeId, hidden: bool) {
    Document::set_hidden(self, node, hidden);
  }

  fn focus_and_select(&mut self, node: NodeId) {
    self.select_all(node);
  }

  fn create_element(&mut self, tag: &str) -> NodeId {
    Document::create_element(self, tag)
  }

  fn append_child(&mut self, parent: NodeId, child: NodeId) {
    Document::append_child(self, parent, child);
  }

  fn append_text(&mut self, parent: NodeId, text: &str) {
    self.text(parent, text);
  }

  fn insert_after(&mut self, reference: NodeId, node: NodeId) {
    Document::insert_after(self, reference, node);
  }

  fn remove(&mut self, node: NodeId) {
    Document::remove(self, node);
  }

  fn describe(&self, node: NodeId) -> String {
    Document::describe(self, node)
  }
}
