//! Field schema model

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Closed set of input types a form field can take.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Textarea,
    Email,
    Tel,
    Url,
    Number,
    Date,
    Time,
    DateTime,
    Select,
    MultiSelect,
    Radio,
    Checkbox,
    #[serde(alias = "checkboxes")]
    CheckboxGroup,
    File,
}

impl FieldType {
    pub const ALL: [FieldType; 15] = [
        FieldType::Text,
        FieldType::Textarea,
        FieldType::Email,
        FieldType::Tel,
        FieldType::Url,
        FieldType::Number,
        FieldType::Date,
        FieldType::Time,
        FieldType::DateTime,
        FieldType::Select,
        FieldType::MultiSelect,
        FieldType::Radio,
        FieldType::Checkbox,
        FieldType::CheckboxGroup,
        FieldType::File,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Email => "email",
            FieldType::Tel => "tel",
            FieldType::Url => "url",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::DateTime => "datetime",
            FieldType::Select => "select",
            FieldType::MultiSelect => "multiselect",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
            FieldType::CheckboxGroup => "checkboxgroup",
            FieldType::File => "file",
        }
    }

    /// Parse the wire name. `checkboxes` is the legacy spelling of `checkboxgroup`.
    pub fn parse(raw: &str) -> Option<FieldType> {
        match raw {
            "checkboxes" => Some(FieldType::CheckboxGroup),
            other => Self::ALL.into_iter().find(|t| t.as_str() == other),
        }
    }

    /// Selectable types must carry at least one option.
    pub fn requires_options(&self) -> bool {
        matches!(
            self,
            FieldType::Select | FieldType::MultiSelect | FieldType::Radio | FieldType::CheckboxGroup
        )
    }

    /// Types whose submission value is an array of strings.
    pub fn is_multi_valued(&self) -> bool {
        matches!(self, FieldType::MultiSelect | FieldType::CheckboxGroup)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conditional display rule: the field is shown only while the field named
/// `field` holds `equals`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowIf {
    pub field: String,
    pub equals: String,
}

/// One configurable input of a lead form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    pub id: String,
    pub name: String,
    pub label: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,

    /// select, multiselect, radio, checkboxgroup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,

    /// number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,

    /// file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accept: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple_files: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_if: Option<ShowIf>,
}

impl FieldSchema {
    /// Bare field of the given type with every optional attribute unset.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        label: impl Into<String>,
        field_type: FieldType,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            label: label.into(),
            field_type,
            required: false,
            placeholder: None,
            help_text: None,
            options: None,
            min: None,
            max: None,
            step: None,
            accept: None,
            multiple_files: None,
            show_if: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn shown_if(mut self, field: impl Into<String>, equals: impl Into<String>) -> Self {
        self.show_if = Some(ShowIf { field: field.into(), equals: equals.into() });
        self
    }

    pub fn options(&self) -> &[String] {
        self.options.as_deref().unwrap_or_default()
    }
}

fn field_name_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").ok())
        .as_ref()
}

/// Submission keys start with a letter and continue with letters, digits or `_`.
pub fn is_valid_field_name(name: &str) -> bool {
    field_name_pattern().is_some_and(|p| p.is_match(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_wire_names() {
        for t in FieldType::ALL {
            assert_eq!(FieldType::parse(t.as_str()), Some(t));
            let json = serde_json::to_value(t).unwrap();
            assert_eq!(json, serde_json::json!(t.as_str()));
        }
        assert_eq!(FieldType::parse("checkboxes"), Some(FieldType::CheckboxGroup));
        assert_eq!(FieldType::parse("slider"), None);
    }

    #[test]
    fn test_legacy_checkboxes_alias() {
        let t: FieldType = serde_json::from_str("\"checkboxes\"").unwrap();
        assert_eq!(t, FieldType::CheckboxGroup);
    }

    #[test]
    fn test_field_name_format() {
        assert!(is_valid_field_name("role"));
        assert!(is_valid_field_name("event_date2"));
        assert!(!is_valid_field_name("2nd"));
        assert!(!is_valid_field_name("_hidden"));
        assert!(!is_valid_field_name("full name"));
        assert!(!is_valid_field_name(""));
    }

    #[test]
    fn test_serialization_omits_unset_attributes() {
        let field = FieldSchema::new("join_role", "role", "Role", FieldType::Radio)
            .required()
            .with_options(["DJ", "Musician"]);
        let json = serde_json::to_value(&field).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj["type"], "radio");
        assert!(!obj.contains_key("min"));
        assert!(!obj.contains_key("showIf"));
        assert!(!obj.contains_key("helpText"));
    }
}
