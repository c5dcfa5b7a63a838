use sift_lib::config::ConfigError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// The host document does not have the structure the widget needs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
  #[error("no element found for `{selector}`")]
  Missing { selector: String },
  #[error(
    "more than one element found for `{selector}`: {}",
    .candidates.join(", ")
  )]
  Ambiguous {
    selector:   String,
    /// Description of every matching element.
    candidates: Vec<String>,
  },
  #[error("no label found for option {option}")]
  MissingLabel { option: String },
  #[error("no unused id for `{name}` after {attempts} attempts")]
  IdsExhausted { name: String, attempts: usize },
  #[error("invalid selector `{selector}`: {reason}")]
  InvalidSelector { selector: String, reason: String },
}

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Discovery(#[from] DiscoveryError),
  #[error(transparent)]
  Config(#[from] ConfigError),
}
