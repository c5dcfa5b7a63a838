//! The fixed, ordered set of options behind a filter field.
//!
//! Options are registered once, in document order, and never reordered.
//! Filtering only flips each option's `visible` flag; navigation works on the
//! visible subsequence.

use std::fmt;

/// Stable identifier of an option, unique within its registry.
///
/// Ids are handed out in registration order, so `OptionId::index` doubles as
/// the option's position in the full (unfiltered) list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OptionId(usize);

impl OptionId {
  #[must_use]
  pub const fn index(self) -> usize {
    self.0
  }
}

impl fmt::Display for OptionId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "option#{}", self.0)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
  id:      OptionId,
  label:   String,
  value:   String,
  visible: bool,
}

impl Entry {
  pub fn id(&self) -> OptionId {
    self.id
  }

  /// Display text, trimmed of surrounding whitespace.
  pub fn label(&self) -> &str {
    &self.label
  }

  pub fn value(&self) -> &str {
    &self.value
  }

  pub fn is_visible(&self) -> bool {
    self.visible
  }
}

#[derive(Debug, Clone, Default)]
pub struct OptionRegistry {
  entries: Vec<Entry>,
}

impl OptionRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register an option and return its id. New options start visible.
  pub fn push(&mut self, label: impl AsRef<str>, value: impl Into<String>) -> OptionId {
    let id = OptionId(self.entries.len());
    self.entries.push(Entry {
      id,
      label: label.as_ref().trim().to_string(),
      value: value.into(),
      visible: true,
    });
    id
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn get(&self, id: OptionId) -> Option<&Entry> {
    self.entries.get(id.0)
  }

  pub fn label(&self, id: OptionId) -> Option<&str> {
    self.get(id).map(Entry::label)
  }

  pub fn iter(&self) -> impl Iterator<Item = &Entry> {
    self.entries.iter()
  }

  pub fn find_by_value(&self, value: &str) -> Option<OptionId> {
    self
      .entries
      .iter()
      .find(|entry| entry.value == value)
      .map(|entry| entry.id)
  }

  /// Recompute every option's visibility and return how many are visible.
  pub fn apply_visibility<F>(&mut self, mut predicate: F) -> usize
  where
    F: FnMut(&str) -> bool,
  {
    let mut visible = 0;
    for entry in &mut self.entries {
      entry.visible = predicate(&entry.label);
      if entry.visible {
        visible += 1;
      }
    }
    visible
  }

  /// Visible options, in registration order.
  pub fn visible_options(&self) -> impl Iterator<Item = &Entry> {
    self.entries.iter().filter(|entry| entry.visible)
  }

  pub fn visible_count(&self) -> usize {
    self.visible_options().count()
  }

  pub fn nth_visible(&self, n: usize) -> Option<&Entry> {
    self.visible_options().nth(n)
  }

  /// Position of `checked` among the visible options.
  ///
  /// Returns `None` when nothing is checked or when the checked option is
  /// currently filtered out.
  pub fn index_of_checked(&self, checked: Option<OptionId>) -> Option<usize> {
    let checked = checked?;
    self
      .visible_options()
      .position(|entry| entry.id == checked)
  }
}

#[cfg(test)]
mod tests {
  use quickcheck::quickcheck;

  use super::*;
  use crate::fuzzy;

  fn fruit() -> OptionRegistry {
    let mut registry = OptionRegistry::new();
    registry.push("Apple", "apple");
    registry.push("Apricot", "apricot");
    registry.push("Banana", "banana");
    registry
  }

  fn visible_labels(registry: &OptionRegistry) -> Vec<&str> {
    registry.visible_options().map(Entry::label).collect()
  }

  quickcheck! {
    fn filtering_preserves_order(labels: Vec<String>, query: String) -> bool {
      let mut registry = OptionRegistry::new();
      for label in &labels {
        registry.push(label, label.clone());
      }
      let before: Vec<OptionId> = registry.iter().map(Entry::id).collect();
      let predicate = fuzzy::compile(&query);
      let count = registry.apply_visibility(|label| predicate.matches(label));
      let after: Vec<OptionId> = registry.iter().map(Entry::id).collect();
      let visible: Vec<OptionId> = registry.visible_options().map(Entry::id).collect();

      let is_ordered_subsequence = visible.windows(2).all(|pair| pair[0] < pair[1]);
      before == after && count == visible.len() && is_ordered_subsequence
    }
  }

  #[test]
  fn labels_are_trimmed() {
    let mut registry = OptionRegistry::new();
    let id = registry.push("  Apple \n", "apple");
    assert_eq!(registry.label(id), Some("Apple"));
  }

  #[test]
  fn apply_visibility_counts_matches() {
    let mut registry = fruit();
    let predicate = fuzzy::compile("ap");
    assert_eq!(registry.apply_visibility(|l| predicate.matches(l)), 2);
    assert_eq!(visible_labels(&registry), ["Apple", "Apricot"]);

    assert_eq!(registry.apply_visibility(|_| true), 3);
    assert_eq!(visible_labels(&registry), ["Apple", "Apricot", "Banana"]);

    assert_eq!(registry.apply_visibility(|_| false), 0);
    assert!(visible_labels(&registry).is_empty());
  }

  #[test]
  fn index_of_checked_is_relative_to_visible() {
    let mut registry = fruit();
    let banana = OptionId(2);
    assert_eq!(registry.index_of_checked(Some(banana)), Some(2));

    registry.apply_visibility(|label| label != "Apricot");
    assert_eq!(registry.index_of_checked(Some(banana)), Some(1));

    registry.apply_visibility(|label| label != "Banana");
    assert_eq!(registry.index_of_checked(Some(banana)), None);
    assert_eq!(registry.index_of_checked(None), None);
  }

  #[test]
  fn nth_visible_skips_hidden() {
    let mut registry = fruit();
    registry.apply_visibility(|label| label.starts_with('B'));
    assert_eq!(registry.nth_visible(0).map(Entry::label), Some("Banana"));
    assert!(registry.nth_visible(1).is_none());
  }

  #[test]
  fn find_by_value() {
    let registry = fruit();
    assert_eq!(registry.find_by_value("banana"), Some(OptionId(2)));
    assert_eq!(registry.find_by_value("cherry"), None);
  }

  #[test]
  fn empty_registry() {
    let mut registry = OptionRegistry::new();
    assert!(registry.is_empty());
    assert_eq!(registry.apply_visibility(|_| true), 0);
    assert_eq!(registry.visible_count(), 0);
  }
}
