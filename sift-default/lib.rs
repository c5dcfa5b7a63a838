//! Binds the selection core to a host document.
//!
//! [`Autosuggest`] discovers the widget's elements through a [`Host`], turns
//! key, pointer and input events into controller events and writes the
//! resulting effects back to the host.

pub mod autosuggest;
pub mod error;
pub mod host;
pub mod input;

pub use autosuggest::{
  Autosuggest,
  OptionNodes,
  attach_all,
};
pub use error::{
  DiscoveryError,
  Error,
  Result,
};
pub use host::Host;
pub use input::{
  Key,
  KeyEvent,
  KeyOutcome,
  Modifiers,
};
