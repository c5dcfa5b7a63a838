//! Per-instance widget configuration.
//!
//! A [`Config`] is resolved once when a widget is attached, by merging three
//! tiers onto each other:
//!
//! 1. the built-in defaults ([`Config::default`]),
//! 2. overrides supplied by the caller,
//! 3. overrides declared by the host document (a JSON object).
//!
//! Later tiers win. The result is an owned value; the defaults are rebuilt for
//! every resolution and never shared or mutated.

use serde::{
  Deserialize,
  Serialize,
};
use serde_json::Value;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to parse declared configuration: {0}")]
  Parse(#[source] serde_json::Error),
  #[error("configuration overrides must be a JSON object, got `{0}`")]
  NotAnObject(Value),
  #[error("invalid configuration: {0}")]
  Invalid(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
  /// Selector of the element holding the option inputs.
  pub options_container_selector:       String,
  /// Selector of the options container's label.
  pub options_container_label_selector: String,
  /// Class marking elements as visually hidden (but still accessible).
  pub hidden_marker_class:              String,
  /// Base name for the generated id of the announcements region.
  pub alerts_container_id_prefix:       String,
  pub number_in_total_template:         String,
  pub number_filtered_template:         String,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      options_container_selector:       "fieldset".to_string(),
      options_container_label_selector: "legend".to_string(),
      hidden_marker_class:              "sift-visually-hidden".to_string(),
      alerts_container_id_prefix:       "alerts".to_string(),
      number_in_total_template:         "[number] options in total".to_string(),
      number_filtered_template:         "[number] of [total] options for [filter]".to_string(),
    }
  }
}

impl Config {
  /// Merge `tiers` onto the defaults, in order, and deserialize the result.
  pub fn resolve<I>(tiers: I) -> Result<Self>
  where
    I: IntoIterator<Item = Value>,
  {
    let mut merged = serde_json::to_value(Self::default())?;
    for tier in tiers {
      if !tier.is_object() {
        return Err(ConfigError::NotAnObject(tier));
      }
      merged = merge_json_values(merged, tier, 1);
    }
    Ok(serde_json::from_value(merged)?)
  }

  /// Resolve from optional caller overrides and the raw document-declared
  /// JSON (as found on the widget root).
  pub fn from_tiers(caller: Option<Value>, declared: Option<&str>) -> Result<Self> {
    let declared = declared.map(parse_declared).transpose()?.flatten();
    Self::resolve(caller.into_iter().chain(declared))
  }
}

/// Parse document-declared overrides. Blank input declares nothing.
pub fn parse_declared(raw: &str) -> Result<Option<Value>> {
  if raw.trim().is_empty() {
    return Ok(None);
  }
  let value: Value = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
  if !value.is_object() {
    return Err(ConfigError::NotAnObject(value));
  }
  Ok(Some(value))
}

/// Merge two JSON values, merging values from `right` onto `left`.
///
/// `merge_depth` sets the nesting depth up to which objects are merged key by
/// key instead of replaced. Everything that is not an object pair is taken
/// from `right`.
pub fn merge_json_values(left: Value, right: Value, merge_depth: usize) -> Value {
  match (left, right) {
    (Value::Object(mut left_map), Value::Object(right_map)) => {
      if merge_depth > 0 {
        for (rname, rvalue) in right_map {
          match left_map.remove(&rname) {
            Some(lvalue) => {
              let merged_value = merge_json_values(lvalue, rvalue, merge_depth - 1);
              left_map.insert(rname, merged_value);
            },
            None => {
              left_map.insert(rname, rvalue);
            },
          }
        }
        Value::Object(left_map)
      } else {
        Value::Object(right_map)
      }
    },
    (_, value) => value,
  }
}
