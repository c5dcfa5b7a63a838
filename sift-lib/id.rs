//! Generated element identifiers.

/// Source of unique ids for elements the widget creates in the host document.
pub trait IdGenerator {
  fn next_id(&mut self, name: &str) -> String;
}

/// Per-instance counter producing `{prefix}-{name}-{n}`, starting at 1.
#[derive(Debug, Clone)]
pub struct SequentialIds {
  prefix: String,
  next:   u64,
}

impl SequentialIds {
  pub fn new(prefix: impl Into<String>) -> Self {
    Self {
      prefix: prefix.into(),
      next:   1,
    }
  }
}

impl Default for SequentialIds {
  fn default() -> Self {
    Self::new("sift")
  }
}

impl IdGenerator for SequentialIds {
  fn next_id(&mut self, name: &str) -> String {
    let id = format!("{}-{}-{}", self.prefix, name, self.next);
    self.next = self.next.saturating_add(1);
    id
  }
}

impl<F> IdGenerator for F
where
  F: FnMut(&str) -> String,
{
  fn next_id(&mut self, name: &str) -> String {
    (*self)(name)
  }
}
