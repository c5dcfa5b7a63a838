use serde_json::json;
use sift_default::{
  Autosuggest,
  DiscoveryError,
  Error,
  attach_all,
};
use sift_dom::{
  Document,
  NodeId,
};
use sift_lib::{
  config::ConfigError,
  id::SequentialIds,
};

/// A widget root with a filter field, returned as `(root, field)`.
fn widget(doc: &mut Document, declared: Option<&str>) -> (NodeId, NodeId) {
  let parent = doc.root();
  let root = doc.element(parent, "div", &[("data-sift", declared.unwrap_or(""))]);
  let field = doc.element(root, "input", &[("type", "text")]);
  (root, field)
}

fn options(doc: &mut Document, parent: NodeId, container: &str, labels: &[&str]) -> NodeId {
  let container = doc.element(parent, container, &[]);
  let legend = doc.element(container, "legend", &[]);
  doc.text(legend, "Pick one");
  for label in labels {
    let wrapper = doc.element(container, "p", &[]);
    doc.element(wrapper, "input", &[("type", "radio"), ("name", "pick"), ("id", *label)]);
    let label_node = doc.element(wrapper, "label", &[("for", *label)]);
    doc.text(label_node, label);
  }
  container
}

fn attach(doc: &mut Document, root: NodeId) -> Result<Autosuggest<Document>, Error> {
  Autosuggest::attach(doc, root, None, &mut SequentialIds::default())
}

#[test]
fn test_missing_field() {
  let mut doc = Document::new();
  let parent = doc.root();
  let root = doc.element(parent, "div", &[("data-sift", "")]);
  options(&mut doc, root, "fieldset", &["a"]);

  let err = attach(&mut doc, root).err().unwrap();
  assert!(matches!(
    err,
    Error::Discovery(DiscoveryError::Missing { ref selector }) if selector == r#"input[type="text"]"#
  ));
}

#[test]
fn test_ambiguous_container_lists_candidates() {
  let mut doc = Document::new();
  let (root, _) = widget(&mut doc, None);
  options(&mut doc, root, "fieldset", &["a"]);
  options(&mut doc, root, "fieldset", &["b"]);

  match attach(&mut doc, root) {
    Err(Error::Discovery(DiscoveryError::Ambiguous {
      selector,
      candidates,
    })) => {
      assert_eq!(selector, "fieldset");
      assert_eq!(candidates, ["<fieldset>", "<fieldset>"]);
    },
    other => panic!("expected ambiguity, got {:?}", other.err()),
  }
}

#[test]
fn test_failed_attach_leaves_document_untouched() {
  let mut doc = Document::new();
  let (root, field) = widget(&mut doc, None);
  options(&mut doc, root, "fieldset", &["a"]);
  doc.element(root, "input", &[("type", "text")]);

  assert!(attach(&mut doc, root).is_err());
  assert!(!doc.has_attr(field, "data-sift-filter"));
  assert!(doc.query_all(root, "[data-sift-alerts]").unwrap().is_empty());
}

#[test]
fn test_missing_label() {
  let mut doc = Document::new();
  let (root, _) = widget(&mut doc, None);
  let fieldset = options(&mut doc, root, "fieldset", &["a"]);
  doc.element(fieldset, "input", &[("type", "radio"), ("id", "orphan")]);

  let err = attach(&mut doc, root).err().unwrap();
  assert_eq!(
    err.to_string(),
    r#"no label found for option <input type="radio" id="orphan">"#
  );
}

#[test]
fn test_duplicate_label_for_is_ambiguous() {
  let mut doc = Document::new();
  let (root, _) = widget(&mut doc, None);
  options(&mut doc, root, "fieldset", &["a"]);
  let extra = doc.element(root, "label", &[("for", "a")]);
  doc.text(extra, "again");

  let err = attach(&mut doc, root).err().unwrap();
  assert!(matches!(
    err,
    Error::Discovery(DiscoveryError::Ambiguous { ref candidates, .. }) if candidates.len() == 2
  ));
}

#[test]
fn test_enclosing_label_fallback() {
  let mut doc = Document::new();
  let (root, _) = widget(&mut doc, None);
  let fieldset = options(&mut doc, root, "fieldset", &[]);
  let label = doc.element(fieldset, "label", &[]);
  let radio = doc.element(label, "input", &[("type", "radio"), ("value", "x")]);
  doc.text(label, " Xylophone ");

  let widget = attach(&mut doc, root).unwrap();
  assert_eq!(widget.options()[0].label, label);
  assert_eq!(widget.options()[0].input, radio);
  assert_eq!(widget.controller().registry().label(widget.option_of(radio).unwrap()), Some("Xylophone"));
}

#[test]
fn test_declared_configuration() {
  let mut doc = Document::new();
  let declared = r#"{
    "options-container-selector": ".choices",
    "options-container-label-selector": "h2",
    "number-in-total-template": "[number] fruits"
  }"#;
  let (root, _) = widget(&mut doc, Some(declared));
  let container = doc.element(root, "div", &[("class", "choices")]);
  let heading = doc.element(root, "h2", &[]);
  doc.text(heading, "Fruit");
  for value in ["kiwi", "lime"] {
    let wrapper = doc.element(container, "div", &[]);
    doc.element(wrapper, "input", &[("type", "radio"), ("id", value)]);
    let label = doc.element(wrapper, "label", &[("for", value)]);
    doc.text(label, value);
  }

  let widget = attach(&mut doc, root).unwrap();
  assert_eq!(widget.container(), container);
  assert_eq!(widget.container_label(), heading);
  assert!(doc.has_class(heading, "sift-visually-hidden"));
  let alert = doc.children(widget.alerts())[0];
  assert_eq!(doc.text_content(alert), "2 fruits");
}

#[test]
fn test_declared_configuration_wins_over_caller() {
  let mut doc = Document::new();
  let (root, _) = widget(&mut doc, Some(r#"{ "hidden-marker-class": "from-doc" }"#));
  options(&mut doc, root, "fieldset", &["a"]);

  let caller = json!({
    "hidden-marker-class": "from-caller",
    "alerts-container-id-prefix": "status",
  });
  let widget = Autosuggest::attach(&mut doc, root, Some(caller), &mut SequentialIds::default()).unwrap();
  assert_eq!(widget.config().hidden_marker_class, "from-doc");
  assert_eq!(doc.attr(widget.alerts(), "id"), Some("sift-status-1"));
}

#[test]
fn test_invalid_declared_configuration() {
  let mut doc = Document::new();
  let (root, _) = widget(&mut doc, Some("{ not json"));
  options(&mut doc, root, "fieldset", &["a"]);
  let err = attach(&mut doc, root).err().unwrap();
  assert!(matches!(err, Error::Config(ConfigError::Parse(_))));

  let mut doc = Document::new();
  let (root, _) = widget(&mut doc, Some(r#"{ "colour": "red" }"#));
  options(&mut doc, root, "fieldset", &["a"]);
  let err = attach(&mut doc, root).err().unwrap();
  assert!(matches!(err, Error::Config(ConfigError::Invalid(_))));
}

#[test]
fn test_invalid_selector_is_reported() {
  let mut doc = Document::new();
  let (root, _) = widget(&mut doc, Some(r#"{ "options-container-selector": "div >" }"#));
  options(&mut doc, root, "fieldset", &["a"]);
  let err = attach(&mut doc, root).err().unwrap();
  assert!(matches!(
    err,
    Error::Discovery(DiscoveryError::InvalidSelector { ref selector, .. }) if selector == "div >"
  ));
}

#[test]
fn test_existing_describedby_is_kept() {
  let mut doc = Document::new();
  let (root, field) = widget(&mut doc, None);
  doc.set_attr(field, "aria-describedby", "hint");
  options(&mut doc, root, "fieldset", &["a"]);

  attach(&mut doc, root).unwrap();
  assert_eq!(doc.attr(field, "aria-describedby"), Some("hint sift-alerts-1"));
}

#[test]
fn test_generated_ids_skip_taken_ones() {
  let mut doc = Document::new();
  let parent = doc.root();
  doc.element(parent, "span", &[("id", "sift-alerts-1")]);
  let (root, _) = widget(&mut doc, None);
  options(&mut doc, root, "fieldset", &["a"]);

  let widget = attach(&mut doc, root).unwrap();
  assert_eq!(doc.attr(widget.alerts(), "id"), Some("sift-alerts-2"));
}

#[test]
fn test_attach_all_shares_id_generator() {
  let mut doc = Document::new();
  for name in ["first", "second"] {
    let (root, _) = widget(&mut doc, None);
    options(&mut doc, root, "fieldset", &[name]);
  }
  doc.element(doc.root(), "div", &[("class", "not-a-widget")]);

  let widgets = attach_all(&mut doc, &mut SequentialIds::default()).unwrap();
  assert_eq!(widgets.len(), 2);
  let ids: Vec<_> = widgets
    .iter()
    .map(|widget| doc.attr(widget.alerts(), "id").unwrap_or_default().to_string())
    .collect();
  assert_eq!(ids, ["sift-alerts-1", "sift-alerts-2"]);
}

#[test]
fn test_attach_all_stops_at_first_error() {
  let mut doc = Document::new();
  let (root, _) = widget(&mut doc, None);
  options(&mut doc, root, "fieldset", &["a"]);
  let parent = doc.root();
  doc.element(parent, "div", &[("data-sift", "")]);

  assert!(matches!(
    attach_all(&mut doc, &mut SequentialIds::default()),
    Err(Error::Discovery(DiscoveryError::Missing { .. }))
  ));
}

#[test]
fn test_custom_id_generator() {
  let mut doc = Document::new();
  let (root, _) = widget(&mut doc, None);
  options(&mut doc, root, "fieldset", &["a"]);

  let mut ids = |name: &str| format!("page-{name}");
  let widget = Autosuggest::attach(&mut doc, root, None, &mut ids).unwrap();
  assert_eq!(doc.attr(widget.alerts(), "id"), Some("page-alerts"));
}

#[test]
fn test_exhausted_id_generator_fails_cleanly() {
  let mut doc = Document::new();
  let parent = doc.root();
  doc.element(parent, "span", &[("id", "page-alerts")]);
  let (root, field) = widget(&mut doc, None);
  options(&mut doc, root, "fieldset", &["a"]);

  let mut calls = 0;
  let mut ids = |name: &str| {
    calls += 1;
    format!("page-{name}")
  };
  let err = Autosuggest::attach(&mut doc, root, None, &mut ids).err().unwrap();
  assert!(matches!(
    err,
    Error::Discovery(DiscoveryError::IdsExhausted { ref name, attempts: 64 }) if name == "alerts"
  ));
  assert_eq!(calls, 64);
  assert!(!doc.has_attr(field, "data-sift-filter"));
  assert!(doc.query_all(root, "[data-sift-alerts]").unwrap().is_empty());
}
