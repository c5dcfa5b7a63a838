//! Fuzzy subsequence matching for option labels.
//!
//! A query matches a label when every character of the query occurs in the
//! label, in order, ignoring case, with any number of other characters in
//! between. `"ae"` matches `"Apple"`, `"pa"` does not.
//!
//! Matching is powered by the [`nucleo`] fuzzy matcher, fed one `char` at a
//! time. Labels are never folded into grapheme clusters or normalized, so a
//! combining mark is a character of its own and characters like `.`, `(`,
//! `^` or `!` are always matched literally.
//!
//! # Examples
//!
//! ```ignore
//! use sift_lib::fuzzy::compile;
//!
//! let predicate = compile("ap");
//! assert!(predicate.matches("Apple"));
//! assert!(predicate.matches("Grape")); // g-r-A-P-e
//! assert!(!predicate.matches("Banana"));
//! ```
//!
//! # Thread-Local Matcher
//!
//! [`Predicate::matches`] uses a thread-local matcher and label buffer to
//! avoid allocating per label. For explicit control over their lifetime, use
//! [`Predicate::matches_with`].

use std::cell::RefCell;

use nucleo::{
  Config,
  Matcher,
  Utf32Str,
};

thread_local! {
  static MATCHER: RefCell<Matcher> = RefCell::new(Matcher::default());
  static HAYSTACK: RefCell<Vec<char>> = const { RefCell::new(Vec::new()) };
}

/// Compiled form of a filter query.
///
/// The empty query compiles to a predicate that accepts every label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
  /// Lowercased query characters.
  needle: Vec<char>,
}

/// Compile `query` into a case-insensitive subsequence predicate.
pub fn compile(query: &str) -> Predicate {
  Predicate {
    needle: query.chars().flat_map(char::to_lowercase).collect(),
  }
}

impl Predicate {
  /// Returns true when this predicate accepts every label.
  pub fn is_match_all(&self) -> bool {
    self.needle.is_empty()
  }

  pub fn matches(&self, label: &str) -> bool {
    if self.is_match_all() {
      return true;
    }
    MATCHER.with_borrow_mut(|matcher| {
      HAYSTACK.with_borrow_mut(|haystack| self.matches_with(matcher, haystack, label))
    })
  }

  /// Match using a caller-provided matcher and label buffer.
  pub fn matches_with(&self, matcher: &mut Matcher, haystack: &mut Vec<char>, label: &str) -> bool {
    if self.is_match_all() {
      return true;
    }

    matcher.config = Config::DEFAULT;
    matcher.config.ignore_case = true;
    matcher.config.normalize = false;

    haystack.clear();
    haystack.extend(label.chars());
    matcher
      .fuzzy_match(
        Utf32Str::Unicode(haystack.as_slice()),
        Utf32Str::Unicode(&self.needle),
      )
      .is_some()
  }
}
