//! Schema normalizer
//!
//! Turns arbitrary JSON (a database column, a request body) into a list of
//! [`FieldSchema`]. Lenient by contract: bad entries are dropped or coerced,
//! never fatal, so one broken field cannot take a public form down.

use crate::field::{is_valid_field_name, FieldSchema, FieldType, ShowIf};
use serde_json::{Map, Value};

/// Normalize a raw JSON value. Anything other than an array yields no fields.
pub fn normalize(raw: &Value, prefix: &str) -> Vec<FieldSchema> {
    match raw {
        Value::Array(items) => normalize_slice(items, prefix),
        _ => Vec::new(),
    }
}

/// Normalize each entry in order, dropping the ones that cannot be a field.
pub fn normalize_slice(raw: &[Value], prefix: &str) -> Vec<FieldSchema> {
    raw.iter()
        .enumerate()
        .filter_map(|(index, item)| normalize_field(item, index, prefix))
        .collect()
}

/// Normalize a single entry found at `index` of its list.
pub fn normalize_field(raw: &Value, index: usize, prefix: &str) -> Option<FieldSchema> {
    let item = raw.as_object()?;

    let label = match trimmed(item, "label") {
        l if l.is_empty() => format!("Field {}", index + 1),
        l => l,
    };
    let name = match trimmed(item, "name") {
        n if is_valid_field_name(&n) => n,
        _ => slugify(&label).unwrap_or_else(|| format!("field_{}", index + 1)),
    };
    let field_type = FieldType::parse(&trimmed(item, "type")).unwrap_or_default();
    let id = stable_id(item, &name, index, prefix);

    let mut field = FieldSchema::new(id, name, label, field_type);
    field.required = item.get("required").map(truthy).unwrap_or(false);
    field.placeholder = non_empty(trimmed(item, "placeholder"));
    field.help_text = non_empty(trimmed(item, "helpText"));

    if field_type.requires_options() {
        field.options = item
            .get("options")
            .and_then(Value::as_array)
            .map(|opts| {
                opts.iter()
                    .filter_map(Value::as_str)
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(String::from)
                    .collect::<Vec<_>>()
            })
            .filter(|opts| !opts.is_empty());
    }

    if field_type == FieldType::Number {
        field.min = item.get("min").and_then(finite);
        field.max = item.get("max").and_then(finite);
        field.step = item.get("step").and_then(finite);
    }

    if field_type == FieldType::File {
        field.accept = non_empty(trimmed(item, "accept"));
        field.multiple_files = Some(item.get("multipleFiles").map(truthy).unwrap_or(false));
    }

    field.show_if = item.get("showIf").and_then(Value::as_object).and_then(|rule| {
        let target = trimmed(rule, "field");
        let equals = trimmed(rule, "equals");
        (!target.is_empty() && !equals.is_empty()).then_some(ShowIf { field: target, equals })
    });

    Some(field)
}

/// Explicit id, else `{prefix}_{name}`, else `{prefix}_{index}`. Never random:
/// re-saving unchanged input must not change identities.
fn stable_id(item: &Map<String, Value>, name: &str, index: usize, prefix: &str) -> String {
    let explicit = trimmed(item, "id");
    if !explicit.is_empty() {
        explicit
    } else if !name.is_empty() {
        format!("{prefix}_{name}")
    } else {
        format!("{prefix}_{index}")
    }
}

/// Lowercase, whitespace runs to `_`, anything outside `[a-z0-9_]` dropped.
/// A result that does not start with a letter gets an `f_` prefix.
pub fn slugify(label: &str) -> Option<String> {
    let slug = label
        .to_lowercase()
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    match slug.chars().next() {
        None => None,
        Some(c) if c.is_ascii_alphabetic() => Some(slug),
        Some(_) => Some(format!("f_{slug}")),
    }
}

fn trimmed(item: &Map<String, Value>, key: &str) -> String {
    item.get(key)
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

fn finite(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) if !s.trim().is_empty() => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn truthy(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::String(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "on" | "1"),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn renormalize(fields: &[FieldSchema], prefix: &str) -> Vec<FieldSchema> {
        normalize(&serde_json::to_value(fields).unwrap(), prefix)
    }

    #[test]
    fn test_non_array_yields_nothing() {
        assert!(normalize(&json!({"fields": []}), "join").is_empty());
        assert!(normalize(&json!(null), "join").is_empty());
    }

    #[test]
    fn test_drops_non_objects_and_keeps_order() {
        let raw = json!([
            "nope",
            {"name": "email", "label": "Email", "type": "email"},
            42,
            {"name": "phone", "label": "Phone", "type": "tel"}
        ]);
        let fields = normalize(&raw, "contact");
        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["email", "phone"]);
    }

    #[test]
    fn test_label_and_name_fallbacks() {
        let raw = json!([
            {"label": "  Favourite Genres  "},
            {},
            {"name": "full name", "label": "Full name"}
        ]);
        let fields = normalize(&raw, "join");
        assert_eq!(fields[0].label, "Favourite Genres");
        assert_eq!(fields[0].name, "favourite_genres");
        assert_eq!(fields[1].label, "Field 2");
        assert_eq!(fields[1].name, "field_2");
        assert_eq!(fields[2].name, "full_name");
    }

    #[test]
    fn test_slugify_keeps_key_format() {
        assert_eq!(slugify("Event  Date").as_deref(), Some("event_date"));
        assert_eq!(slugify("2 nights?").as_deref(), Some("f_2_nights"));
        assert_eq!(slugify("!!!"), None);
        assert!(is_valid_field_name(&slugify("Where's the gig?").unwrap()));
    }

    #[test]
    fn test_stable_id_rule() {
        let raw = json!([
            {"id": " custom ", "name": "a", "label": "A"},
            {"name": "b", "label": "B"},
        ]);
        let fields = normalize(&raw, "enquire");
        assert_eq!(fields[0].id, "custom");
        assert_eq!(fields[1].id, "enquire_b");
        assert_eq!(normalize(&raw, "enquire"), fields);
    }

    #[test]
    fn test_unknown_type_coerces_to_text() {
        let raw = json!([
            {"name": "a", "label": "A", "type": "slider"},
            {"name": "b", "label": "B", "type": 7},
            {"name": "c", "label": "C"},
        ]);
        for field in normalize(&raw, "p") {
            assert_eq!(field.field_type, FieldType::Text);
        }
    }

    #[test]
    fn test_type_specific_attributes_are_scoped() {
        let raw = json!([
            {"name": "n", "label": "N", "type": "text", "options": ["x"], "min": 1, "accept": "image/*"},
            {"name": "guests", "label": "Guests", "type": "number", "min": 10, "max": "200", "step": 5, "options": ["x"]},
            {"name": "demo", "label": "Demo", "type": "file", "accept": "audio/*", "multipleFiles": true, "min": 3},
            {"name": "kind", "label": "Kind", "type": "select", "options": [" DJ ", "", 3, "Band"]},
        ]);
        let fields = normalize(&raw, "p");

        assert_eq!(fields[0].options, None);
        assert_eq!(fields[0].min, None);
        assert_eq!(fields[0].accept, None);

        assert_eq!(fields[1].min, Some(10.0));
        assert_eq!(fields[1].max, Some(200.0));
        assert_eq!(fields[1].step, Some(5.0));
        assert_eq!(fields[1].options, None);

        assert_eq!(fields[2].accept.as_deref(), Some("audio/*"));
        assert_eq!(fields[2].multiple_files, Some(true));
        assert_eq!(fields[2].min, None);

        assert_eq!(fields[3].options, Some(vec!["DJ".to_string(), "Band".to_string()]));
    }

    #[test]
    fn test_switching_type_drops_stale_attributes() {
        let raw = json!([{"name": "kind", "label": "Kind", "type": "radio", "options": ["A", "B"]}]);
        let mut fields = normalize(&raw, "p");
        fields[0].field_type = FieldType::Textarea;
        let again = renormalize(&fields, "p");
        assert_eq!(again[0].options, None);
        assert_eq!(again[0].field_type, FieldType::Textarea);
    }

    #[test]
    fn test_show_if_requires_both_parts() {
        let raw = json!([
            {"name": "a", "label": "A", "showIf": {"field": "role", "equals": " Musician "}},
            {"name": "b", "label": "B", "showIf": {"field": "role", "equals": "  "}},
            {"name": "c", "label": "C", "showIf": "role"},
        ]);
        let fields = normalize(&raw, "p");
        assert_eq!(
            fields[0].show_if,
            Some(ShowIf { field: "role".into(), equals: "Musician".into() })
        );
        assert_eq!(fields[1].show_if, None);
        assert_eq!(fields[2].show_if, None);
    }

    #[test]
    fn test_duplicate_names_pass_through() {
        let raw = json!([
            {"label": "Your Name"},
            {"label": "your   name"},
        ]);
        let fields = normalize(&raw, "p");
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, fields[1].name);
    }

    #[test]
    fn test_idempotent_on_messy_input() {
        let raw = json!([
            null,
            {"label": "Event date", "type": "date", "required": "true"},
            {"name": "guests", "type": "number", "min": "5", "max": 1e3},
            {"id": "x", "type": "checkboxes", "options": ["a", " b "], "label": "Pick"},
            {"type": "file"},
        ]);
        let once = normalize(&raw, "enquire");
        assert_eq!(renormalize(&once, "enquire"), once);
    }

    fn arb_text() -> impl Strategy<Value = Value> {
        prop_oneof![
            "[ a-zA-Z0-9_!?]{0,12}".prop_map(Value::from),
            any::<bool>().prop_map(Value::from),
            (-1000i64..1000).prop_map(Value::from),
            Just(Value::Null),
        ]
    }

    fn arb_type() -> impl Strategy<Value = Value> {
        prop_oneof![
            prop::sample::select(FieldType::ALL.to_vec()).prop_map(|t| Value::from(t.as_str())),
            Just(Value::from("checkboxes")),
            arb_text(),
        ]
    }

    fn arb_entry() -> impl Strategy<Value = Value> {
        let object = (
            prop::option::of(arb_text()),
            prop::option::of(arb_text()),
            prop::option::of(arb_text()),
            prop::option::of(arb_type()),
            prop::option::of(prop::collection::vec(arb_text(), 0..4)),
            prop::option::of(arb_text()),
            prop::option::of(arb_text()),
            prop::option::of((arb_text(), arb_text())),
        )
            .prop_map(|(id, name, label, ty, options, min, required, show_if)| {
                let mut obj = Map::new();
                let mut put = |k: &str, v: Option<Value>| {
                    if let Some(v) = v {
                        obj.insert(k.to_string(), v);
                    }
                };
                put("id", id);
                put("name", name);
                put("label", label);
                put("type", ty);
                put("options", options.map(Value::from));
                put("min", min.clone());
                put("max", min);
                put("required", required.clone());
                put("multipleFiles", required);
                put("showIf", show_if.map(|(f, e)| json!({"field": f, "equals": e})));
                Value::Object(obj)
            });
        prop_oneof![4 => object, 1 => arb_text()]
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(entries in prop::collection::vec(arb_entry(), 0..8)) {
            let once = normalize(&Value::Array(entries), "join");
            prop_assert_eq!(renormalize(&once, "join"), once);
        }

        #[test]
        fn prop_names_always_match_key_format(entries in prop::collection::vec(arb_entry(), 0..8)) {
            for field in normalize(&Value::Array(entries), "join") {
                prop_assert!(is_valid_field_name(&field.name));
                prop_assert!(!field.label.is_empty());
            }
        }
    }
}
