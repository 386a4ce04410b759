//! Public form model
//!
//! Headless state behind the public modal: which control each field renders
//! as, which fields are currently shown, and what a submit would send.

use crate::config::{FormConfiguration, FormKey};
use crate::defaults::default_configuration;
use crate::field::{FieldSchema, FieldType};
use crate::submission::filter_visible;
use crate::visibility::{is_visible, SubmissionValue, SubmissionValues};
use serde::Serialize;
use tracing::debug;

const TEXTAREA_ROWS: u32 = 4;

/// The input widget a field renders as.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "control", rename_all = "snake_case")]
pub enum Control {
    /// Plain `<input>`; `kind` is the HTML input type.
    Input { kind: &'static str },
    TextArea { rows: u32 },
    Select { options: Vec<String> },
    MultiSelect { options: Vec<String>, size: usize },
    RadioPills { options: Vec<String> },
    Checkbox,
    CheckboxPills { options: Vec<String> },
    Number { min: Option<f64>, max: Option<f64>, step: Option<f64> },
    File { accept: Option<String>, multiple: bool },
}

impl Control {
    pub fn for_field(field: &FieldSchema) -> Self {
        let options = || field.options().to_vec();
        match field.field_type {
            FieldType::Text => Control::Input { kind: "text" },
            FieldType::Email => Control::Input { kind: "email" },
            FieldType::Tel => Control::Input { kind: "tel" },
            FieldType::Url => Control::Input { kind: "url" },
            FieldType::Date => Control::Input { kind: "date" },
            FieldType::Time => Control::Input { kind: "time" },
            FieldType::DateTime => Control::Input { kind: "datetime-local" },
            FieldType::Textarea => Control::TextArea { rows: TEXTAREA_ROWS },
            FieldType::Select => Control::Select { options: options() },
            FieldType::MultiSelect => Control::MultiSelect {
                size: field.options().len().clamp(3, 6),
                options: options(),
            },
            FieldType::Radio => Control::RadioPills { options: options() },
            FieldType::Checkbox => Control::Checkbox,
            FieldType::CheckboxGroup => Control::CheckboxPills { options: options() },
            FieldType::Number => Control::Number { min: field.min, max: field.max, step: field.step },
            FieldType::File => Control::File {
                accept: field.accept.clone(),
                multiple: field.multiple_files.unwrap_or(false),
            },
        }
    }

    /// Date and time inputs open the native picker on press.
    pub fn opens_picker(&self) -> bool {
        matches!(self, Control::Input { kind: "date" | "time" | "datetime-local" })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedField<'a> {
    pub dom_id: String,
    pub field: &'a FieldSchema,
    #[serde(flatten)]
    pub control: Control,
}

/// One visitor's pass through a form.
///
/// Opens on the built-in configuration so the modal can show immediately,
/// then switches to the fetched one via [`FormSession::apply_remote`].
/// Values survive the switch and survive a field being hidden.
#[derive(Clone, Debug)]
pub struct FormSession {
    key: FormKey,
    dom_prefix: String,
    config: FormConfiguration,
    values: SubmissionValues,
    refreshed: bool,
}

impl FormSession {
    pub fn new(key: FormKey, dom_prefix: impl Into<String>) -> Self {
        Self {
            key,
            dom_prefix: dom_prefix.into(),
            config: default_configuration(key),
            values: SubmissionValues::new(),
            refreshed: false,
        }
    }

    pub fn key(&self) -> FormKey {
        self.key
    }

    pub fn config(&self) -> &FormConfiguration {
        &self.config
    }

    /// Whether the fetched configuration has replaced the built-in one.
    pub fn is_refreshed(&self) -> bool {
        self.refreshed
    }

    pub fn apply_remote(&mut self, config: FormConfiguration) {
        debug!(form = %self.key, fields = config.fields.len(), "form config refreshed");
        self.config = config;
        self.refreshed = true;
    }

    pub fn value(&self, name: &str) -> Option<&SubmissionValue> {
        self.values.get(name)
    }

    pub fn set_value(&mut self, name: &str, value: impl Into<SubmissionValue>) {
        self.values.insert(name.to_string(), value.into());
    }

    /// Add or remove `option` from a multi-valued field's selection.
    pub fn toggle_option(&mut self, name: &str, option: &str) {
        let entry = self
            .values
            .entry(name.to_string())
            .or_insert_with(|| SubmissionValue::Multi(Vec::new()));
        if let SubmissionValue::Single(s) = &mut *entry {
            let previous = std::mem::take(s);
            *entry = SubmissionValue::Multi(if previous.is_empty() { vec![] } else { vec![previous] });
        }
        if let SubmissionValue::Multi(items) = entry {
            match items.iter().position(|s| s == option) {
                Some(pos) => {
                    items.remove(pos);
                }
                None => items.push(option.to_string()),
            }
        }
    }

    /// Single checkboxes submit the strings `"true"` / `"false"`.
    pub fn set_checked(&mut self, name: &str, checked: bool) {
        self.set_value(name, if checked { "true" } else { "false" });
    }

    pub fn rendered_fields(&self) -> Vec<RenderedField<'_>> {
        self.config
            .fields
            .iter()
            .filter(|f| is_visible(f, &self.values))
            .map(|field| RenderedField {
                dom_id: format!("{}-{}", self.dom_prefix, field.id),
                field,
                control: Control::for_field(field),
            })
            .collect()
    }

    /// What a submit would send: values of visible fields only.
    pub fn payload(&self) -> SubmissionValues {
        filter_visible(&self.config.fields, &self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_per_type() {
        let f = |t| FieldSchema::new("x", "x", "X", t);
        assert_eq!(Control::for_field(&f(FieldType::DateTime)), Control::Input { kind: "datetime-local" });
        assert_eq!(Control::for_field(&f(FieldType::Textarea)), Control::TextArea { rows: 4 });
        assert_eq!(Control::for_field(&f(FieldType::Checkbox)), Control::Checkbox);
        assert_eq!(
            Control::for_field(&f(FieldType::File)),
            Control::File { accept: None, multiple: false }
        );
        assert!(Control::for_field(&f(FieldType::Time)).opens_picker());
        assert!(!Control::for_field(&f(FieldType::Email)).opens_picker());
    }

    #[test]
    fn test_multiselect_size_is_clamped() {
        let size = |n: usize| {
            let field = FieldSchema::new("x", "x", "X", FieldType::MultiSelect)
                .with_options((0..n).map(|i| format!("o{i}")));
            match Control::for_field(&field) {
                Control::MultiSelect { size, .. } => size,
                other => panic!("unexpected control {other:?}"),
            }
        };
        assert_eq!(size(1), 3);
        assert_eq!(size(4), 4);
        assert_eq!(size(10), 6);
    }

    #[test]
    fn test_session_starts_on_defaults() {
        let session = FormSession::new(FormKey::Join, "join");
        assert!(!session.is_refreshed());
        assert_eq!(session.config(), &default_configuration(FormKey::Join));
        let ids: Vec<_> = session.rendered_fields().iter().map(|r| r.dom_id.clone()).collect();
        assert_eq!(ids[0], "join-role");
        // instrument is hidden until role = Musician
        assert!(!ids.contains(&"join-instrument".to_string()));
    }

    #[test]
    fn test_hidden_value_is_kept_but_not_sent() {
        let mut session = FormSession::new(FormKey::Join, "join");
        session.set_value("role", "Musician");
        session.set_value("instrument", "Saxophone");
        assert!(session.rendered_fields().iter().any(|r| r.field.name == "instrument"));

        session.set_value("role", "DJ");
        assert!(!session.payload().contains_key("instrument"));
        assert_eq!(session.value("instrument"), Some(&SubmissionValue::from("Saxophone")));

        session.set_value("role", "Musician");
        assert_eq!(session.payload()["instrument"], SubmissionValue::from("Saxophone"));
    }

    #[test]
    fn test_toggle_and_check() {
        let mut config = default_configuration(FormKey::Contact);
        config.fields = vec![
            FieldSchema::new("contact_genres", "genres", "Genres", FieldType::CheckboxGroup)
                .with_options(["House", "Disco"]),
            FieldSchema::new("contact_optin", "optin", "Keep me posted", FieldType::Checkbox),
        ];
        let mut session = FormSession::new(FormKey::Contact, "contact");
        session.apply_remote(config);
        assert!(session.is_refreshed());

        session.toggle_option("genres", "House");
        session.toggle_option("genres", "Disco");
        session.toggle_option("genres", "House");
        session.set_checked("optin", true);

        let payload = session.payload();
        assert_eq!(payload["genres"], SubmissionValue::Multi(vec!["Disco".into()]));
        assert_eq!(payload["optin"], SubmissionValue::from("true"));
    }
}
