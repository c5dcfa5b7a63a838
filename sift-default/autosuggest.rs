//! A filter field bound to a list of radio options in a host document.
//!
//! Expected markup below the widget root:
//!
//! ```text
//! <div data-sift>
//!   <input type="text">
//!   <fieldset>
//!     <legend>Fruit</legend>
//!     <div><input type="radio" id="apple" value="apple"><label for="apple">Apple</label></div>
//!     ...
//!   </fieldset>
//! </div>
//! ```
//!
//! The container and its label are found with the configured selectors. The
//! root's `data-sift` attribute may carry JSON configuration overrides.

use serde_json::Value;
use sift_lib::{
  Announcer,
  Config,
  Effect,
  Event,
  OptionId,
  OptionRegistry,
  Outcome,
  SelectionController,
  announce::Segment,
  id::IdGenerator,
};

use crate::{
  error::{
    DiscoveryError,
    Result,
  },
  host::Host,
  input::{
    KeyEvent,
    KeyOutcome,
  },
};

pub const ROOT_ATTR: &str = "data-sift";
pub const FILTER_ATTR: &str = "data-sift-filter";
pub const OPTIONS_ATTR: &str = "data-sift-options";
pub const OPTION_ATTR: &str = "data-sift-option";
pub const OPTION_SELECTED_ATTR: &str = "data-sift-option-selected";
pub const ALERTS_ATTR: &str = "data-sift-alerts";

const FIELD_SELECTOR: &str = r#"input[type="text"]"#;
const OPTION_SELECTOR: &str = r#"input[type="radio"]"#;
const MAX_ID_ATTEMPTS: usize = 64;

/// Host elements of one option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionNodes<N> {
  pub input:   N,
  pub label:   N,
  /// Element shown and hidden with the option; `None` when the input sits
  /// directly in the options container.
  pub wrapper: Option<N>,
}

pub struct Autosuggest<H: Host> {
  root:            H::Node,
  field:           H::Node,
  container:       H::Node,
  container_label: H::Node,
  alerts:          H::Node,
  /// Indexed by [`OptionId::index`].
  options:         Vec<OptionNodes<H::Node>>,
  config:          Config,
  controller:      SelectionController,
}

impl<H: Host> Autosuggest<H> {
  /// Discover the widget below `root`, wire up its markup and bring the host
  /// in line with the initial state.
  ///
  /// Fails without touching the host when the configuration is invalid or
  /// the markup is incomplete.
  pub fn attach(
    host: &mut H,
    root: H::Node,
    overrides: Option<Value>,
    ids: &mut dyn IdGenerator,
  ) -> Result<Self> {
    let declared = host.attr(root, ROOT_ATTR);
    let config = Config::from_tiers(overrides, declared.as_deref())?;

    let field = find_one(host, root, FIELD_SELECTOR)?;
    let container = find_one(host, root, &config.options_container_selector)?;
    let container_label = find_one(host, root, &config.options_container_label_selector)?;

    let mut registry = OptionRegistry::new();
    let mut options = Vec::new();
    let mut prechecked = None;
    for input in query(host, container, OPTION_SELECTOR)? {
      let label = label_of(host, root, input)?;
      let wrapper = host.parent(input).filter(|&parent| parent != container);
      let id = registry.push(host.text_content(label), host.value(input));
      if prechecked.is_none() && host.is_checked(input) {
        prechecked = Some(id);
      }
      options.push(OptionNodes {
        input,
        label,
        wrapper,
      });
    }

    let alerts_id = unique_id(host, ids, &config.alerts_container_id_prefix)?;
    let alerts = host.create_element("div");
    host.set_attr(alerts, "id", &alerts_id);
    host.set_attr(alerts, ALERTS_ATTR, "");
    host.insert_after(container_label, alerts);
    let described_by = match host.attr(field, "aria-describedby") {
      Some(existing) => format!("{existing} {alerts_id}").trim().to_string(),
      None => alerts_id.clone(),
    };
    host.set_attr(field, "aria-describedby", &described_by);

    host.set_attr(field, FILTER_ATTR, "");
    host.set_attr(field, "autocomplete", "off");
    host.set_attr(field, "aria-expanded", "false");
    host.set_attr(container, OPTIONS_ATTR, "");
    host.add_class(container_label, &config.hidden_marker_class);
    for option in &options {
      host.set_attr(option.label, OPTION_ATTR, "");
      host.add_class(option.input, &config.hidden_marker_class);
    }

    let controller =
      SelectionController::new(registry, Announcer::from_config(&config), prechecked);
    let widget = Self {
      root,
      field,
      container,
      container_label,
      alerts,
      options,
      config,
      controller,
    };
    widget.apply(host, &widget.controller.sync_effects().effects);

    tracing::debug!(
      root = ?root,
      options = widget.options.len(),
      alerts = %alerts_id,
      "attached autosuggest"
    );
    Ok(widget)
  }

  pub fn root(&self) -> H::Node {
    self.root
  }

  pub fn field(&self) -> H::Node {
    self.field
  }

  pub fn container(&self) -> H::Node {
    self.container
  }

  pub fn container_label(&self) -> H::Node {
    self.container_label
  }

  pub fn alerts(&self) -> H::Node {
    self.alerts
  }

  pub fn options(&self) -> &[OptionNodes<H::Node>] {
    &self.options
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn controller(&self) -> &SelectionController {
    &self.controller
  }

  /// Value of the checked option.
  pub fn checked_value(&self) -> Option<&str> {
    let id = self.controller.checked()?;
    self.controller.registry().get(id).map(|entry| entry.value())
  }

  /// The option an input element belongs to.
  pub fn option_of(&self, input: H::Node) -> Option<OptionId> {
    self
      .options
      .iter()
      .position(|option| option.input == input)
      .and_then(|index| self.controller.registry().iter().nth(index))
      .map(|entry| entry.id())
  }

  /// Keydown on the field.
  pub fn handle_key(&mut self, host: &mut H, key: KeyEvent) -> KeyOutcome {
    let Some(event) = key.to_event() else {
      tracing::trace!(?key, "key passed through");
      return KeyOutcome::Continue;
    };
    let outcome = self.dispatch(host, event);
    tracing::trace!(?key, handled = outcome.handled, "key handled");
    KeyOutcome::from_handled(outcome.handled)
  }

  /// The field's text was edited (typed, pasted or deleted).
  pub fn handle_input(&mut self, host: &mut H) -> Outcome {
    let text = host.value(self.field);
    self.dispatch(host, Event::FilterTextChanged(text))
  }

  pub fn handle_field_click(&mut self, host: &mut H) -> Outcome {
    self.dispatch(host, Event::ToggleRequested)
  }

  /// An option input changed. Inputs that are not (or no longer) checked
  /// are ignored.
  pub fn handle_option_change(&mut self, host: &mut H, input: H::Node) -> Outcome {
    match self.option_of(input) {
      Some(id) if host.is_checked(input) => self.dispatch(host, Event::OptionChecked(id)),
      _ => Outcome::default(),
    }
  }

  pub fn handle_option_click(&mut self, host: &mut H, input: H::Node) -> Outcome {
    match self.option_of(input) {
      Some(id) => self.dispatch(host, Event::OptionActivatedByPointer(id)),
      None => Outcome::default(),
    }
  }

  /// Feed `event` to the controller and apply its effects to `host`.
  pub fn dispatch(&mut self, host: &mut H, event: Event) -> Outcome {
    let outcome = self.controller.handle(event);
    self.apply(host, &outcome.effects);
    outcome
  }

  fn apply(&self, host: &mut H, effects: &[Effect]) {
    for effect in effects {
      match effect {
        Effect::Checked(checked) => {
          for (index, option) in self.options.iter().enumerate() {
            let is_checked = checked.is_some_and(|id| id.index() == index);
            if host.is_checked(option.input) != is_checked {
              host.set_checked(option.input, is_checked);
            }
          }
        },
        Effect::SetFieldText(text) => host.set_value(self.field, text),
        Effect::MarkSelected { previous, current } => {
          if let Some(option) = previous.and_then(|id| self.options.get(id.index())) {
            host.remove_attr(option.label, OPTION_SELECTED_ATTR);
          }
          if let Some(option) = current.and_then(|id| self.options.get(id.index())) {
            host.set_attr(option.label, OPTION_SELECTED_ATTR, "");
          }
        },
        Effect::VisibilityChanged => {
          for (option, entry) in self.options.iter().zip(self.controller.registry().iter()) {
            let hidden = !entry.is_visible();
            match option.wrapper {
              Some(wrapper) => host.set_hidden(wrapper, hidden),
              None => {
                host.set_hidden(option.input, hidden);
                host.set_hidden(option.label, hidden);
              },
            }
          }
        },
        Effect::Announce(announcement) => {
          for child in host.children(self.alerts) {
            host.remove(child);
          }
          let paragraph = host.create_element("p");
          host.set_attr(paragraph, "role", "alert");
          for segment in announcement.segments() {
            match segment {
              Segment::Text(text) => host.append_text(paragraph, text),
              Segment::Emphasis(text) => {
                let kbd = host.create_element("kbd");
                host.append_text(kbd, text);
                host.append_child(paragraph, kbd);
              },
            }
          }
          host.append_child(self.alerts, paragraph);
        },
        Effect::FocusField => host.focus_and_select(self.field),
        Effect::ShowOptions => {
          host.set_hidden(self.container, false);
          host.set_attr(self.field, "aria-expanded", "true");
        },
        Effect::HideOptions => {
          host.set_hidden(self.container, true);
          host.set_attr(self.field, "aria-expanded", "false");
        },
      }
    }
  }
}

/// Attach a widget to every element carrying `data-sift`, in document order.
///
/// Stops at the first widget that fails to attach; widgets attached before it
/// stay attached in the host.
pub fn attach_all<H: Host>(host: &mut H, ids: &mut dyn IdGenerator) -> Result<Vec<Autosuggest<H>>> {
  let document = host.document_root();
  let selector = format!("[{ROOT_ATTR}]");
  let roots = query(host, document, &selector)?;
  let mut widgets = Vec::with_capacity(roots.len());
  for root in roots {
    widgets.push(Autosuggest::attach(host, root, None, ids)?);
  }
  Ok(widgets)
}

fn query<H: Host>(host: &H, scope: H::Node, selector: &str) -> Result<Vec<H::Node>> {
  host.query_all(scope, selector).map_err(|err| {
    DiscoveryError::InvalidSelector {
      selector: selector.to_string(),
      reason:   err.to_string(),
    }
    .into()
  })
}

/// The single element below `scope` matching `selector`.
fn find_one<H: Host>(host: &H, scope: H::Node, selector: &str) -> Result<H::Node> {
  let mut found = query(host, scope, selector)?;
  match found.len() {
    0 => {
      Err(
        DiscoveryError::Missing {
          selector: selector.to_string(),
        }
        .into(),
      )
    },
    1 => Ok(found.remove(0)),
    _ => {
      Err(
        DiscoveryError::Ambiguous {
          selector:   selector.to_string(),
          candidates: found.into_iter().map(|node| host.describe(node)).collect(),
        }
        .into(),
      )
    },
  }
}

/// `label[for=<id>]` below `root`, or the label enclosing `input`.
fn label_of<H: Host>(host: &H, root: H::Node, input: H::Node) -> Result<H::Node> {
  match host.attr(input, "id").filter(|id| !id.is_empty()) {
    Some(id) => {
      let mut labels: Vec<H::Node> = query(host, root, "label")?
        .into_iter()
        .filter(|&label| host.attr(label, "for").as_deref() == Some(id.as_str()))
        .collect();
      match labels.len() {
        0 => {},
        1 => return Ok(labels.remove(0)),
        _ => {
          return Err(
            DiscoveryError::Ambiguous {
              selector:   format!("label[for=\"{id}\"]"),
              candidates: labels.into_iter().map(|node| host.describe(node)).collect(),
            }
            .into(),
          );
        },
      }
    },
    None => {
      tracing::warn!(option = %host.describe(input), "option input without id");
    },
  }

  let enclosing = host.closest(input, "label").map_err(|err| {
    DiscoveryError::InvalidSelector {
      selector: "label".to_string(),
      reason:   err.to_string(),
    }
  })?;
  enclosing.ok_or_else(|| {
    DiscoveryError::MissingLabel {
      option: host.describe(input),
    }
    .into()
  })
}

/// An id from `ids` that no element in `host` carries yet.
fn unique_id<H: Host>(host: &H, ids: &mut dyn IdGenerator, name: &str) -> Result<String> {
  for _ in 0..MAX_ID_ATTEMPTS {
    let id = ids.next_id(name);
    if host.element_by_id(&id).is_none() {
      return Ok(id);
    }
    tracing::trace!(%id, "generated id already taken");
  }
  Err(
    DiscoveryError::IdsExhausted {
      name:     name.to_string(),
      attempts: MAX_ID_ATTEMPTS,
    }
    .into(),
  )
}
