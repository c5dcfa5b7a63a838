//! Arena-backed element tree.
//!
//! Nodes live in a single `Vec` and refer to each other by [`NodeId`].
//! Removing a node only detaches it from its parent; ids stay valid for the
//! lifetime of the document, so a detached subtree can be re-inserted.

use std::{
  fmt::Write as _,
  ops::Range,
};

use crate::selector::{
  Selector,
  SelectorError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
  #[inline]
  pub fn index(self) -> usize {
    self.0 as usize
  }
}

#[derive(Debug, Clone)]
struct ElementData {
  /// Lowercase tag name.
  tag:     String,
  attrs:   Vec<(String, String)>,
  /// Live field value; falls back to the `value` attribute until written.
  value:   Option<String>,
  /// Live checkedness; falls back to the `checked` attribute until written.
  checked: Option<bool>,
}

#[derive(Debug, Clone)]
enum NodeData {
  Document,
  Element(ElementData),
  Text(String),
}

#[derive(Debug, Clone)]
struct Node {
  parent:   Option<NodeId>,
  children: Vec<NodeId>,
  data:     NodeData,
}

impl Node {
  fn new(data: NodeData) -> Self {
    Self {
      parent: None,
      children: Vec::new(),
      data,
    }
  }
}

#[derive(Debug, Clone)]
pub struct Document {
  nodes:     Vec<Node>,
  root:      NodeId,
  focused:   Option<NodeId>,
  /// Character range selected in the focused field.
  selection: Option<Range<usize>>,
}

impl Default for Document {
  fn default() -> Self {
    Self::new()
  }
}

impl Document {
  pub fn new() -> Self {
    Self {
      nodes:     vec![Node::new(NodeData::Document)],
      root:      NodeId(0),
      focused:   None,
      selection: None,
    }
  }

  /// The document node. It is not an element and never matches a selector.
  pub fn root(&self) -> NodeId {
    self.root
  }

  fn push(&mut self, data: NodeData) -> NodeId {
    let id = NodeId(self.nodes.len() as u32);
    self.nodes.push(Node::new(data));
    id
  }

  fn node(&self, id: NodeId) -> &Node {
    &self.nodes[id.index()]
  }

  fn element_data(&self, id: NodeId) -> Option<&ElementData> {
    match &self.node(id).data {
      NodeData::Element(data) => Some(data),
      _ => None,
    }
  }

  fn element_data_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
    match &mut self.nodes[id.index()].data {
      NodeData::Element(data) => Some(data),
      _ => None,
    }
  }

  /// Create a detached element.
  pub fn create_element(&mut self, tag: &str) -> NodeId {
    self.push(NodeData::Element(ElementData {
      tag:     tag.to_ascii_lowercase(),
      attrs:   Vec::new(),
      value:   None,
      checked: None,
    }))
  }

  /// Create a detached text node.
  pub fn create_text(&mut self, text: &str) -> NodeId {
    self.push(NodeData::Text(text.to_string()))
  }

  /// Create an element with `attrs` and append it to `parent`.
  pub fn element(&mut self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
    let id = self.create_element(tag);
    for (name, value) in attrs {
      self.set_attr(id, name, value);
    }
    self.append_child(parent, id);
    id
  }

  /// Append a text node to `parent`.
  pub fn text(&mut self, parent: NodeId, text: &str) -> NodeId {
    let id = self.create_text(text);
    self.append_child(parent, id);
    id
  }

  pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
    self.detach(child);
    self.nodes[child.index()].parent = Some(parent);
    self.nodes[parent.index()].children.push(child);
  }

  /// Insert `node` as the next sibling of `reference`. A `reference` without a
  /// parent leaves `node` where it is.
  pub fn insert_after(&mut self, reference: NodeId, node: NodeId) {
    let Some(parent) = self.parent(reference) else {
      tracing::warn!(reference = reference.index(), "insert after a detached node");
      return;
    };
    self.detach(node);
    let siblings = &mut self.nodes[parent.index()].children;
    let position = siblings
      .iter()
      .position(|&sibling| sibling == reference)
      .map_or(siblings.len(), |position| position + 1);
    siblings.insert(position, node);
    self.nodes[node.index()].parent = Some(parent);
  }

  /// Detach `node` (and its subtree) from the document.
  pub fn remove(&mut self, node: NodeId) {
    self.detach(node);
    if self
      .focused
      .is_some_and(|focused| !self.is_connected(focused))
    {
      self.focused = None;
      self.selection = None;
    }
  }

  fn detach(&mut self, node: NodeId) {
    if let Some(parent) = self.nodes[node.index()].parent.take() {
      self.nodes[parent.index()]
        .children
        .retain(|&child| child != node);
    }
  }

  pub fn parent(&self, node: NodeId) -> Option<NodeId> {
    self.node(node).parent
  }

  pub fn children(&self, node: NodeId) -> &[NodeId] {
    &self.node(node).children
  }

  /// Whether `node` is reachable from the document root.
  pub fn is_connected(&self, node: NodeId) -> bool {
    let mut current = Some(node);
    while let Some(id) = current {
      if id == self.root {
        return true;
      }
      current = self.parent(id);
    }
    false
  }

  /// Descendants of `node` in document order, excluding `node` itself.
  pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
    while let Some(id) = stack.pop() {
      out.push(id);
      stack.extend(self.children(id).iter().rev().copied());
    }
    out
  }

  /// Lowercase tag name, `None` for text and the document node.
  pub fn tag(&self, node: NodeId) -> Option<&str> {
    self.element_data(node).map(|data| data.tag.as_str())
  }

  pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
    self
      .element_data(node)?
      .attrs
      .iter()
      .find(|(key, _)| key == name)
      .map(|(_, value)| value.as_str())
  }

  pub fn has_attr(&self, node: NodeId, name: &str) -> bool {
    self.attr(node, name).is_some()
  }

  /// Set an attribute, keeping its position when it already exists. Text
  /// nodes are left untouched.
  pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
    let Some(data) = self.element_data_mut(node) else {
      return;
    };
    match data.attrs.iter().position(|(key, _)| key == name) {
      Some(position) => data.attrs[position].1 = value.to_string(),
      None => data.attrs.push((name.to_string(), value.to_string())),
    }
  }

  pub fn remove_attr(&mut self, node: NodeId, name: &str) {
    if let Some(data) = self.element_data_mut(node) {
      data.attrs.retain(|(key, _)| key != name);
    }
  }

  pub fn has_class(&self, node: NodeId, class: &str) -> bool {
    self
      .attr(node, "class")
      .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class))
  }

  pub fn add_class(&mut self, node: NodeId, class: &str) {
    if self.has_class(node, class) {
      return;
    }
    let classes = match self.attr(node, "class") {
      Some(existing) if !existing.trim().is_empty() => format!("{} {class}", existing.trim()),
      _ => class.to_string(),
    };
    self.set_attr(node, "class", &classes);
  }

  pub fn remove_class(&mut self, node: NodeId, class: &str) {
    let Some(existing) = self.attr(node, "class") else {
      return;
    };
    let classes = existing
      .split_ascii_whitespace()
      .filter(|c| *c != class)
      .collect::<Vec<_>>()
      .join(" ");
    self.set_attr(node, "class", &classes);
  }

  pub fn is_hidden(&self, node: NodeId) -> bool {
    self.has_attr(node, "hidden")
  }

  pub fn set_hidden(&mut self, node: NodeId, hidden: bool) {
    if hidden {
      self.set_attr(node, "hidden", "");
    } else {
      self.remove_attr(node, "hidden");
    }
  }

  /// Concatenated text of all text nodes below (and including) `node`.
  pub fn text_content(&self, node: NodeId) -> String {
    let mut out = String::new();
    if let NodeData::Text(text) = &self.node(node).data {
      out.push_str(text);
    }
    for id in self.descendants(node) {
      if let NodeData::Text(text) = &self.node(id).data {
        out.push_str(text);
      }
    }
    out
  }

  pub fn value(&self, node: NodeId) -> String {
    let Some(data) = self.element_data(node) else {
      return String::new();
    };
    match &data.value {
      Some(value) => value.clone(),
      None => self.attr(node, "value").unwrap_or_default().to_string(),
    }
  }

  /// Write the live value of a field. Any selection in it is dropped.
  pub fn set_value(&mut self, node: NodeId, value: &str) {
    if let Some(data) = self.element_data_mut(node) {
      data.value = Some(value.to_string());
    }
    if self.focused == Some(node) {
      self.selection = None;
    }
  }

  pub fn is_checked(&self, node: NodeId) -> bool {
    self
      .element_data(node)
      .and_then(|data| data.checked)
      .unwrap_or_else(|| self.has_attr(node, "checked"))
  }

  /// Set the live checkedness. Checking a named radio unchecks every other
  /// connected radio of the same name.
  pub fn set_checked(&mut self, node: NodeId, checked: bool) {
    if checked && self.attr(node, "type") == Some("radio") {
      if let Some(name) = self.attr(node, "name").map(str::to_string) {
        let group: Vec<NodeId> = self
          .descendants(self.root)
          .into_iter()
          .filter(|&other| {
            other != node
              && self.tag(other) == Some("input")
              && self.attr(other, "type") == Some("radio")
              && self.attr(other, "name") == Some(name.as_str())
          })
          .collect();
        for other in group {
          if let Some(data) = self.element_data_mut(other) {
            data.checked = Some(false);
          }
        }
      }
    }
    if let Some(data) = self.element_data_mut(node) {
      data.checked = Some(checked);
    }
  }

  pub fn focus(&mut self, node: NodeId) {
    if self.focused != Some(node) {
      self.selection = None;
    }
    self.focused = Some(node);
  }

  pub fn focused(&self) -> Option<NodeId> {
    self.focused
  }

  /// Focus `node` and select its whole value.
  pub fn select_all(&mut self, node: NodeId) {
    self.focus(node);
    self.selection = Some(0..self.value(node).chars().count());
  }

  pub fn selection(&self) -> Option<Range<usize>> {
    self.selection.clone()
  }

  /// Text currently selected in the focused field.
  pub fn selected_text(&self) -> Option<String> {
    let focused = self.focused?;
    let range = self.selection.clone()?;
    Some(
      self
        .value(focused)
        .chars()
        .skip(range.start)
        .take(range.len())
        .collect(),
    )
  }

  /// First connected element with the given `id` attribute, in document
  /// order.
  pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
    self
      .descendants(self.root)
      .into_iter()
      .find(|&node| self.attr(node, "id") == Some(id))
  }

  /// Elements below `scope` matching `selector`, in document order.
  pub fn query_all(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
    let selector = Selector::parse(selector)?;
    Ok(
      self
        .descendants(scope)
        .into_iter()
        .filter(|&node| selector.matches(self, node))
        .collect(),
    )
  }

  /// `node` itself or its nearest ancestor matching `selector`.
  pub fn closest(&self, node: NodeId, selector: &str) -> Result<Option<NodeId>, SelectorError> {
    let selector = Selector::parse(selector)?;
    let mut current = Some(node);
    while let Some(id) = current {
      if selector.matches(self, id) {
        return Ok(Some(id));
      }
      current = self.parent(id);
    }
    Ok(None)
  }

  /// Short description for diagnostics, e.g. `<input type="radio" id="a">`.
  pub fn describe(&self, node: NodeId) -> String {
    match &self.node(node).data {
      NodeData::Document => "#document".to_string(),
      NodeData::Text(text) => format!("#text {text:?}"),
      NodeData::Element(data) => {
        let mut out = format!("<{}", data.tag);
        for (name, value) in &data.attrs {
          if value.is_empty() {
            let _ = write!(out, " {name}");
          } else {
            let _ = write!(out, " {name}={value:?}");
          }
        }
        out.push('>');
        out
      },
    }
  }
}
