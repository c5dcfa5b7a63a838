//! Key input types and the widget keymap.

use sift_lib::{
  Direction,
  Event,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
  bits: u8,
}

impl Modifiers {
  pub const CTRL: u8 = 0b0000_0001;
  pub const ALT: u8 = 0b0000_0010;
  pub const SHIFT: u8 = 0b0000_0100;

  #[must_use]
  pub const fn empty() -> Self {
    Self { bits: 0 }
  }

  #[must_use]
  pub const fn is_empty(self) -> bool {
    self.bits == 0
  }

  #[must_use]
  pub const fn ctrl(self) -> bool {
    (self.bits & Self::CTRL) != 0
  }

  #[must_use]
  pub const fn alt(self) -> bool {
    (self.bits & Self::ALT) != 0
  }

  #[must_use]
  pub const fn shift(self) -> bool {
    (self.bits & Self::SHIFT) != 0
  }

  pub fn insert(&mut self, bits: u8) {
    self.bits |= bits;
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
  Char(char),
  Enter,
  NumpadEnter,
  Escape,
  Backspace,
  Tab,
  Left,
  Up,
  Down,
  Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
  pub key:       Key,
  pub modifiers: Modifiers,
}

impl KeyEvent {
  #[must_use]
  pub const fn new(key: Key) -> Self {
    Self {
      key,
      modifiers: Modifiers::empty(),
    }
  }

  #[must_use]
  pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
    self.modifiers = modifiers;
    self
  }

  /// The controller event this key stands for, if any.
  ///
  /// Chords with Ctrl or Alt belong to the host. Shift is ignored, so
  /// Shift+Tab advances focus backwards through the same event.
  pub fn to_event(self) -> Option<Event> {
    if self.modifiers.ctrl() || self.modifiers.alt() {
      return None;
    }
    match self.key {
      Key::Up => Some(Event::NavigateRequested(Direction::Up)),
      Key::Down => Some(Event::NavigateRequested(Direction::Down)),
      Key::Enter | Key::NumpadEnter => Some(Event::CommitRequested),
      Key::Escape => Some(Event::DismissRequested),
      Key::Tab => Some(Event::AdvanceFocusRequested),
      _ => None,
    }
  }
}

impl From<Key> for KeyEvent {
  fn from(key: Key) -> Self {
    Self::new(key)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyOutcome {
  /// Let the host run its default action for the key.
  #[default]
  Continue,
  /// Suppress the host's default action.
  Handled,
}

impl KeyOutcome {
  #[must_use]
  pub const fn handled(self) -> bool {
    matches!(self, Self::Handled)
  }

  #[must_use]
  pub const fn from_handled(handled: bool) -> Self {
    if handled { Self::Handled } else { Self::Continue }
  }
}
