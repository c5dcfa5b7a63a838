//! The selection state machine behind a filter field.
//!
//! [`SelectionController`] owns the option registry and the announcer and
//! consumes [`Event`]s through a single entry point,
//! [`SelectionController::handle`]. It never touches a document: everything
//! the host has to do in response (show the list, rewrite the field, move the
//! selected marker, replace the live announcement) comes back as an ordered
//! list of [`Effect`]s.
//!
//! # States
//!
//! The list is either closed or open. Filtering and navigation open it;
//! commit, dismiss, focus advance and pointer activation close it. At most one
//! option is checked at any time, and the checked option stays checked when a
//! later filter hides it. Hidden options are skipped by navigation, so moving
//! from a filtered-out checked option starts over at the first (down) or last
//! (up) visible option.
//!
//! # Effect order
//!
//! Within one [`Outcome`] effects follow the order selection update, registry
//! recompute, announcement, and finally focus or list visibility.

use smallvec::SmallVec;

use crate::{
  announce::{
    Announcement,
    Announcer,
  },
  fuzzy,
  registry::{
    OptionId,
    OptionRegistry,
  },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
  Up,
  Down,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
  /// The user edited the field; carries the full field text.
  FilterTextChanged(String),
  /// The field was activated (clicked).
  ToggleRequested,
  NavigateRequested(Direction),
  /// An option became checked outside of keyboard navigation.
  OptionChecked(OptionId),
  /// Confirm key.
  CommitRequested,
  /// Cancel key.
  DismissRequested,
  /// Tab-like focus advance. Never suppresses the host's own handling.
  AdvanceFocusRequested,
  OptionActivatedByPointer(OptionId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
  /// The checked option changed; hosts mirror it onto their option inputs.
  Checked(Option<OptionId>),
  SetFieldText(String),
  /// Move the selected marker from `previous` to `current`.
  MarkSelected {
    previous: Option<OptionId>,
    current:  Option<OptionId>,
  },
  /// Option visibility was recomputed; see [`OptionRegistry::visible_options`].
  VisibilityChanged,
  /// Replace the live region's content with this announcement.
  Announce(Announcement),
  /// Focus the field and select all of its text.
  FocusField,
  ShowOptions,
  HideOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
  /// Whether the host should suppress the default action of the input that
  /// produced the event.
  pub handled: bool,
  pub effects: SmallVec<[Effect; 4]>,
}

impl Outcome {
  fn consumed() -> Self {
    Self {
      handled: true,
      effects: SmallVec::new(),
    }
  }

  fn ignored() -> Self {
    Self::default()
  }

  pub fn is_empty(&self) -> bool {
    self.effects.is_empty()
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
  pub is_open: bool,
  pub checked: Option<OptionId>,
  /// Filter currently applied to the registry.
  pub query:   String,
}

#[derive(Debug, Clone)]
pub struct SelectionController {
  registry:   OptionRegistry,
  announcer:  Announcer,
  state:      SelectionState,
  /// Option currently carrying the selected marker.
  marked:     Option<OptionId>,
  field_text: String,
}

impl SelectionController {
  /// Create a closed controller with every option visible.
  ///
  /// `checked` is the option the host declared as pre-checked, if any; ids
  /// unknown to `registry` are ignored. The unfiltered total is announced
  /// right away.
  pub fn new(registry: OptionRegistry, announcer: Announcer, checked: Option<OptionId>) -> Self {
    let checked = checked.filter(|id| registry.get(*id).is_some());
    let mut controller = Self {
      registry,
      announcer,
      state: SelectionState {
        is_open: false,
        checked,
        query: String::new(),
      },
      marked: None,
      field_text: String::new(),
    };

    let mut effects = SmallVec::new();
    controller.sync_field(&mut effects);
    controller.refilter(&mut effects);
    controller
  }

  pub fn registry(&self) -> &OptionRegistry {
    &self.registry
  }

  pub fn state(&self) -> &SelectionState {
    &self.state
  }

  pub fn is_open(&self) -> bool {
    self.state.is_open
  }

  pub fn checked(&self) -> Option<OptionId> {
    self.state.checked
  }

  pub fn query(&self) -> &str {
    &self.state.query
  }

  /// Text the field is expected to display.
  pub fn field_text(&self) -> &str {
    &self.field_text
  }

  pub fn marked(&self) -> Option<OptionId> {
    self.marked
  }

  pub fn live_announcement(&self) -> Option<&Announcement> {
    self.announcer.live()
  }

  /// Effects that bring a freshly attached host in line with the current
  /// state, without changing anything.
  pub fn sync_effects(&self) -> Outcome {
    let mut outcome = Outcome::ignored();
    let effects = &mut outcome.effects;
    effects.push(Effect::Checked(self.state.checked));
    effects.push(Effect::SetFieldText(self.field_text.clone()));
    effects.push(Effect::MarkSelected {
      previous: None,
      current:  self.marked,
    });
    effects.push(Effect::VisibilityChanged);
    if let Some(announcement) = self.announcer.live() {
      effects.push(Effect::Announce(announcement.clone()));
    }
    effects.push(if self.state.is_open {
      Effect::ShowOptions
    } else {
      Effect::HideOptions
    });
    outcome
  }

  pub fn handle(&mut self, event: Event) -> Outcome {
    tracing::trace!(?event, is_open = self.state.is_open, "selection event");
    match event {
      Event::FilterTextChanged(text) => self.filter_changed(text),
      Event::ToggleRequested => self.toggle(),
      Event::NavigateRequested(direction) => self.navigate(direction),
      Event::OptionChecked(id) => {
        let mut outcome = Outcome::consumed();
        self.check(id, &mut outcome.effects);
        outcome
      },
      Event::CommitRequested => self.commit_if_open(true),
      Event::DismissRequested => self.dismiss(),
      Event::AdvanceFocusRequested => self.commit_if_open(false),
      Event::OptionActivatedByPointer(id) => {
        let mut outcome = Outcome::consumed();
        if self.check(id, &mut outcome.effects) {
          self.close(&mut outcome.effects);
        }
        outcome
      },
    }
  }

  fn filter_changed(&mut self, text: String) -> Outcome {
    let mut outcome = Outcome::consumed();
    self.field_text.clone_from(&text);
    self.state.query = text;
    self.refilter(&mut outcome.effects);
    self.open(&mut outcome.effects);
    outcome
  }

  fn toggle(&mut self) -> Outcome {
    let mut outcome = Outcome::consumed();
    if self.state.is_open {
      self.close(&mut outcome.effects);
    } else {
      self.open(&mut outcome.effects);
    }
    outcome
  }

  fn navigate(&mut self, direction: Direction) -> Outcome {
    let mut outcome = Outcome::consumed();
    if !self.state.is_open {
      self.open(&mut outcome.effects);
      return outcome;
    }

    let count = self.registry.visible_count();
    if count == 0 {
      return outcome;
    }

    let current = self.registry.index_of_checked(self.state.checked);
    let next = next_index(current, count, direction);
    if let Some(id) = self.registry.nth_visible(next).map(|entry| entry.id()) {
      self.check(id, &mut outcome.effects);
    }
    outcome
  }

  fn dismiss(&mut self) -> Outcome {
    if self.state.checked.is_none() && !self.state.is_open {
      return Outcome::ignored();
    }

    let mut outcome = Outcome::consumed();
    if self.state.checked.take().is_some() {
      outcome.effects.push(Effect::Checked(None));
    }
    self.commit(&mut outcome.effects);
    outcome
  }

  fn commit_if_open(&mut self, handled: bool) -> Outcome {
    if !self.state.is_open {
      return Outcome::ignored();
    }
    let mut outcome = Outcome {
      handled,
      effects: SmallVec::new(),
    };
    self.commit(&mut outcome.effects);
    outcome
  }

  /// Settle the field on the checked option, close the list and drop the
  /// filter so the next opening starts from the full list.
  fn commit(&mut self, effects: &mut SmallVec<[Effect; 4]>) {
    self.sync_field(effects);
    self.state.query.clear();
    self.refilter(effects);
    self.close(effects);
  }

  /// Check `id`. Returns false (and does nothing) for unknown ids.
  fn check(&mut self, id: OptionId, effects: &mut SmallVec<[Effect; 4]>) -> bool {
    if self.registry.get(id).is_none() {
      tracing::warn!(%id, "ignoring check of unknown option");
      return false;
    }
    self.state.checked = Some(id);
    effects.push(Effect::Checked(Some(id)));
    self.sync_field(effects);
    effects.push(Effect::FocusField);
    true
  }

  fn sync_field(&mut self, effects: &mut SmallVec<[Effect; 4]>) {
    self.field_text = self
      .state
      .checked
      .and_then(|id| self.registry.label(id))
      .unwrap_or_default()
      .to_string();
    effects.push(Effect::SetFieldText(self.field_text.clone()));

    let previous = std::mem::replace(&mut self.marked, self.state.checked);
    effects.push(Effect::MarkSelected {
      previous,
      current: self.marked,
    });
  }

  fn refilter(&mut self, effects: &mut SmallVec<[Effect; 4]>) {
    let predicate = fuzzy::compile(&self.state.query);
    let visible = self
      .registry
      .apply_visibility(|label| predicate.matches(label));
    let total = self.registry.len();
    tracing::debug!(query = %self.state.query, visible, total, "filtered options");
    effects.push(Effect::VisibilityChanged);

    let announcement = self
      .announcer
      .announce(&self.state.query, visible, total)
      .clone();
    effects.push(Effect::Announce(announcement));
  }

  fn open(&mut self, effects: &mut SmallVec<[Effect; 4]>) {
    if !self.state.is_open {
      self.state.is_open = true;
      effects.push(Effect::ShowOptions);
    }
  }

  fn close(&mut self, effects: &mut SmallVec<[Effect; 4]>) {
    if self.state.is_open {
      self.state.is_open = false;
      effects.push(Effect::HideOptions);
    }
  }
}

/// Next position among `count > 0` visible options, wrapping at both ends.
fn next_index(current: Option<usize>, count: usize, direction: Direction) -> usize {
  let last = count - 1;
  match (direction, current) {
    (Direction::Up, None | Some(0)) => last,
    (Direction::Up, Some(current)) => current - 1,
    (Direction::Down, Some(current)) if current >= last => 0,
    (Direction::Down, Some(current)) => current + 1,
    (Direction::Down, None) => 0,
  }
}
