//! Core of the sift filterable single-select.
//!
//! Everything here operates on plain strings and ids: matching, option
//! visibility, live-region announcements and the keyboard state machine. Host
//! documents (and whatever renders them) live on the other side of
//! [`controller::Effect`].

pub mod announce;
pub mod config;
pub mod controller;
pub mod fuzzy;
pub mod id;
pub mod registry;

pub use announce::{
  Announcement,
  Announcer,
};
pub use config::Config;
pub use controller::{
  Direction,
  Effect,
  Event,
  Outcome,
  SelectionController,
};
pub use registry::{
  OptionId,
  OptionRegistry,
};
