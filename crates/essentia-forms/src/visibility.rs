//! Conditional visibility

use crate::field::{FieldSchema, ShowIf};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A value entered for one field: a scalar, or a list for multi-valued types.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubmissionValue {
    Single(String),
    Multi(Vec<String>),
}

impl SubmissionValue {
    pub fn is_empty(&self) -> bool {
        match self {
            SubmissionValue::Single(s) => s.trim().is_empty(),
            SubmissionValue::Multi(items) => items.iter().all(|s| s.trim().is_empty()),
        }
    }

    /// Whether this value selects `expected`: exact membership for lists,
    /// exact equality for scalars.
    pub fn matches(&self, expected: &str) -> bool {
        match self {
            SubmissionValue::Single(s) => s == expected,
            SubmissionValue::Multi(items) => items.iter().any(|s| s == expected),
        }
    }
}

impl From<&str> for SubmissionValue {
    fn from(s: &str) -> Self {
        SubmissionValue::Single(s.to_string())
    }
}

impl From<String> for SubmissionValue {
    fn from(s: String) -> Self {
        SubmissionValue::Single(s)
    }
}

impl From<Vec<String>> for SubmissionValue {
    fn from(items: Vec<String>) -> Self {
        SubmissionValue::Multi(items)
    }
}

/// Field name to entered value.
pub type SubmissionValues = BTreeMap<String, SubmissionValue>;

/// A display rule evaluated against the values entered so far.
pub trait Condition {
    fn holds(&self, values: &SubmissionValues) -> bool;
}

impl Condition for ShowIf {
    fn holds(&self, values: &SubmissionValues) -> bool {
        match values.get(&self.field) {
            Some(value) => value.matches(&self.equals),
            // absent reads as the empty string
            None => self.equals.is_empty(),
        }
    }
}

/// Fields without a rule are always shown. A rule pointing at an unknown
/// field never matches, so the field stays hidden.
pub fn is_visible(field: &FieldSchema, values: &SubmissionValues) -> bool {
    field.show_if.as_ref().map_or(true, |rule| rule.holds(values))
}

pub fn visible_fields<'a>(
    fields: &'a [FieldSchema],
    values: &'a SubmissionValues,
) -> impl Iterator<Item = &'a FieldSchema> + 'a {
    fields.iter().filter(move |f| is_visible(f, values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldType;

    fn instrument() -> FieldSchema {
        FieldSchema::new("join_instrument", "instrument", "Instrument", FieldType::Text)
            .shown_if("role", "Musician")
    }

    fn values(pairs: &[(&str, SubmissionValue)]) -> SubmissionValues {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn test_no_rule_is_always_visible() {
        let field = FieldSchema::new("a", "a", "A", FieldType::Text);
        assert!(is_visible(&field, &SubmissionValues::new()));
    }

    #[test]
    fn test_scalar_match() {
        let field = instrument();
        assert!(is_visible(&field, &values(&[("role", "Musician".into())])));
        assert!(!is_visible(&field, &values(&[("role", "DJ".into())])));
        assert!(!is_visible(&field, &values(&[("role", "musician".into())])));
        assert!(!is_visible(&field, &values(&[("role", " Musician".into())])));
        assert!(!is_visible(&field, &SubmissionValues::new()));
    }

    #[test]
    fn test_array_membership() {
        let field = instrument();
        let both = SubmissionValue::Multi(vec!["DJ".into(), "Musician".into()]);
        let dj = SubmissionValue::Multi(vec!["DJ".into()]);
        assert!(is_visible(&field, &values(&[("role", both)])));
        assert!(!is_visible(&field, &values(&[("role", dj)])));
        assert!(!is_visible(&field, &values(&[("role", SubmissionValue::Multi(vec![]))])));
    }

    #[test]
    fn test_dangling_reference_stays_hidden() {
        let field = FieldSchema::new("x", "x", "X", FieldType::Text).shown_if("ghost", "yes");
        assert!(!is_visible(&field, &values(&[("role", "yes".into())])));
    }

    #[test]
    fn test_untagged_values_from_json() {
        let parsed: SubmissionValues =
            serde_json::from_str(r#"{"role": "DJ", "genres": ["House", "Disco"]}"#).unwrap();
        assert_eq!(parsed["role"], SubmissionValue::Single("DJ".into()));
        assert_eq!(
            parsed["genres"],
            SubmissionValue::Multi(vec!["House".into(), "Disco".into()])
        );
    }

    #[test]
    fn test_visible_fields_filters_in_order() {
        let fields = vec![
            FieldSchema::new("role", "role", "Role", FieldType::Radio).with_options(["DJ", "Musician"]),
            instrument(),
            FieldSchema::new("email", "email", "Email", FieldType::Email),
        ];
        let v = values(&[("role", "DJ".into())]);
        let names: Vec<_> = visible_fields(&fields, &v).map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["role", "email"]);
    }
}
