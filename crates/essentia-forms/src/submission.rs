//! Submission payloads

use crate::config::FormKey;
use crate::field::FieldSchema;
use crate::visibility::{is_visible, SubmissionValue, SubmissionValues};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Keep only values of fields that exist and are currently visible.
///
/// Hidden fields may still hold a cached answer in the session; it must not
/// reach delivery.
pub fn filter_visible(fields: &[FieldSchema], values: &SubmissionValues) -> SubmissionValues {
    fields
        .iter()
        .filter(|f| is_visible(f, values))
        .filter_map(|f| values.get(&f.name).map(|v| (f.name.clone(), v.clone())))
        .collect()
}

/// Names of visible required fields left empty in `payload`.
pub fn missing_required(fields: &[FieldSchema], payload: &SubmissionValues) -> Vec<String> {
    fields
        .iter()
        .filter(|f| f.required && is_visible(f, payload))
        .filter(|f| payload.get(&f.name).map_or(true, SubmissionValue::is_empty))
        .map(|f| f.name.clone())
        .collect()
}

/// A filtered payload ready for hand-off to delivery.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Submission {
    pub form: FormKey,
    pub values: SubmissionValues,
    pub submitted_at: DateTime<Utc>,
}

impl Submission {
    pub fn new(form: FormKey, fields: &[FieldSchema], values: &SubmissionValues) -> Self {
        Self { form, values: filter_visible(fields, values), submitted_at: Utc::now() }
    }

    /// First non-empty scalar among `keys`, e.g. the submitter's name.
    pub fn pick_first(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|k| match self.values.get(*k) {
            Some(SubmissionValue::Single(s)) if !s.trim().is_empty() => Some(s.trim()),
            _ => None,
        })
    }

    /// `name: value` lines for a plain-text body, empty values skipped.
    pub fn summary_lines(&self) -> Vec<String> {
        self.values
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| {
                let text = match v {
                    SubmissionValue::Single(s) => one_line(s),
                    SubmissionValue::Multi(items) => items
                        .iter()
                        .map(|s| one_line(s))
                        .filter(|s| !s.is_empty())
                        .collect::<Vec<_>>()
                        .join(", "),
                };
                format!("{k}: {text}")
            })
            .collect()
    }
}

/// Newline runs become ` · `, whitespace runs collapse to one space.
fn one_line(s: &str) -> String {
    s.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" · ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldType;

    fn join_fields() -> Vec<FieldSchema> {
        vec![
            FieldSchema::new("role", "role", "Role", FieldType::Radio)
                .required()
                .with_options(["DJ", "Musician"]),
            FieldSchema::new("instrument", "instrument", "Instrument", FieldType::Text)
                .required()
                .shown_if("role", "Musician"),
            FieldSchema::new("genres", "genres", "Genres", FieldType::CheckboxGroup)
                .with_options(["House", "Disco"]),
        ]
    }

    fn entered(pairs: &[(&str, SubmissionValue)]) -> SubmissionValues {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn test_hidden_cached_value_is_not_submitted() {
        let values = entered(&[("role", "DJ".into()), ("instrument", "Sax".into())]);
        let payload = filter_visible(&join_fields(), &values);
        assert!(payload.contains_key("role"));
        assert!(!payload.contains_key("instrument"));
    }

    #[test]
    fn test_toggling_back_restores_cached_value() {
        let mut values = entered(&[("role", "DJ".into()), ("instrument", "Sax".into())]);
        values.insert("role".into(), "Musician".into());
        let payload = filter_visible(&join_fields(), &values);
        assert_eq!(payload["instrument"], SubmissionValue::Single("Sax".into()));
    }

    #[test]
    fn test_unknown_keys_are_dropped() {
        let values = entered(&[("role", "DJ".into()), ("admin", "true".into())]);
        let payload = filter_visible(&join_fields(), &values);
        assert_eq!(payload.len(), 1);
    }

    #[test]
    fn test_missing_required_ignores_hidden_fields() {
        let fields = join_fields();
        let dj = entered(&[("role", "DJ".into())]);
        assert!(missing_required(&fields, &dj).is_empty());

        let musician = entered(&[("role", "Musician".into()), ("instrument", "  ".into())]);
        assert_eq!(missing_required(&fields, &musician), vec!["instrument".to_string()]);

        assert_eq!(missing_required(&fields, &SubmissionValues::new()), vec!["role".to_string()]);
    }

    #[test]
    fn test_summary_lines() {
        let values = entered(&[
            ("genres", SubmissionValue::Multi(vec!["House".into(), "Disco".into()])),
            ("role", "Musician".into()),
            ("instrument", "Sax\n\nand   flute".into()),
        ]);
        let submission = Submission::new(FormKey::Join, &join_fields(), &values);
        assert_eq!(
            submission.summary_lines(),
            vec![
                "genres: House, Disco".to_string(),
                "instrument: Sax · and flute".to_string(),
                "role: Musician".to_string(),
            ]
        );
        assert_eq!(submission.pick_first(&["full_name", "role"]), Some("Musician"));
    }
}
