//! Forms commands

use crate::{FormCommands, output::OutputFormat};
use super::{ApiClient, read_document};
use colored::Colorize;
use essentia_forms::{
    validate_raw_fields, Control, FieldSchema, FormConfiguration, FormKey, FormSession,
    SubmissionValue, SubmissionValues, ValidationReport, Warning,
};
use serde::Serialize;
use serde_json::Value;
use tabled::Tabled;

#[derive(Tabled)]
struct FieldRow {
    id: String,
    name: String,
    #[tabled(rename = "type")]
    field_type: String,
    required: bool,
    #[tabled(rename = "shown if")]
    shown_if: String,
}

impl From<&FieldSchema> for FieldRow {
    fn from(f: &FieldSchema) -> Self {
        Self {
            id: f.id.clone(),
            name: f.name.clone(),
            field_type: f.field_type.to_string(),
            required: f.required,
            shown_if: f
                .show_if
                .as_ref()
                .map(|r| format!("{} = {}", r.field, r.equals))
                .unwrap_or_default(),
        }
    }
}

#[derive(Tabled, Serialize)]
struct PreviewRow {
    #[tabled(rename = "dom id")]
    dom_id: String,
    name: String,
    control: String,
    required: bool,
}

/// Result of checking a configuration file offline.
#[derive(Debug)]
pub struct LintReport {
    pub form: FormKey,
    /// Normalized fields; empty when the file breaks the authoring rules
    pub fields: Vec<FieldSchema>,
    pub outcome: Result<Vec<Warning>, ValidationReport>,
}

impl LintReport {
    pub fn passed(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Judge `fields` as written, the way a save through the service would.
pub fn lint(raw: &Value, form: FormKey) -> LintReport {
    let raw_fields = raw.get("fields").cloned().unwrap_or_else(|| Value::Array(Vec::new()));
    match validate_raw_fields(&raw_fields, form.id_prefix()) {
        Ok((fields, warnings)) => LintReport { form, fields, outcome: Ok(warnings) },
        Err(report) => LintReport { form, fields: Vec::new(), outcome: Err(report) },
    }
}

fn print_lint(report: &LintReport) {
    match &report.outcome {
        Ok(warnings) => {
            println!("{} {} field(s) for {}", "•".cyan(), report.fields.len(), report.form);
            if report.fields.is_empty() {
                println!("{} no fields; the built-in list will be served", "!".yellow());
            }
            for w in warnings {
                let text = match w {
                    Warning::DanglingShowIf { index, target } => {
                        format!("Field {}: shown only when unknown field '{target}' matches; it will stay hidden", index + 1)
                    }
                    Warning::SelfReferencingShowIf { index } => {
                        format!("Field {}: visibility rule points at itself", index + 1)
                    }
                };
                println!("{} {}", "!".yellow(), text);
            }
            println!("{} ok", "✓".green());
        }
        Err(report) => {
            for v in &report.violations {
                println!("{} {}", "✗".red(), v.message);
            }
        }
    }
}

fn parse_form(key: &str) -> Result<FormKey, String> {
    key.parse::<FormKey>().map_err(|e| e.to_string())
}

/// `name=value` pairs; a repeated name collects into a list.
pub fn parse_values(pairs: &[String]) -> Result<SubmissionValues, String> {
    let mut values = SubmissionValues::new();
    for pair in pairs {
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected name=value, got '{pair}'"))?;
        let name = name.trim().to_string();
        let value = value.to_string();
        let merged = match values.remove(&name) {
            None => SubmissionValue::Single(value),
            Some(SubmissionValue::Single(first)) => SubmissionValue::Multi(vec![first, value]),
            Some(SubmissionValue::Multi(mut items)) => {
                items.push(value);
                SubmissionValue::Multi(items)
            }
        };
        values.insert(name, merged);
    }
    Ok(values)
}

fn control_label(control: &Control) -> String {
    match control {
        Control::Input { kind } => format!("input[{kind}]"),
        Control::TextArea { rows } => format!("textarea({rows} rows)"),
        Control::Select { options } => format!("select({})", options.len()),
        Control::MultiSelect { options, size } => format!("multiselect({}, size {size})", options.len()),
        Control::RadioPills { options } => format!("radio pills({})", options.len()),
        Control::Checkbox => "checkbox".into(),
        Control::CheckboxPills { options } => format!("checkbox pills({})", options.len()),
        Control::Number { .. } => "number".into(),
        Control::File { multiple, .. } => if *multiple { "file(multiple)".into() } else { "file".into() },
    }
}

pub async fn handle(action: FormCommands, client: &ApiClient, format: OutputFormat) -> Result<(), String> {
    match action {
        FormCommands::Get { key } => {
            let key = parse_form(&key)?;
            let config: FormConfiguration = client.get(&format!("/api/forms/{key}")).await?;
            let rows: Vec<FieldRow> = config.fields.iter().map(FieldRow::from).collect();
            format.print_rows(&config, rows);
        }
        FormCommands::Lint { file, form } => {
            let report = lint(&read_document(&file)?, parse_form(&form)?);
            print_lint(&report);
            if !report.passed() {
                return Err(format!("{file} has field problems"));
            }
        }
        FormCommands::Push { key, file } => {
            let key = parse_form(&key)?;
            let raw = read_document(&file)?;
            let report = lint(&raw, key);
            if !report.passed() {
                print_lint(&report);
                return Err("not pushed".into());
            }
            let saved: FormConfiguration = client.put(&format!("/api/forms/{key}"), &raw).await?;
            println!("{} {} saved with {} field(s)", "✓".green(), key, saved.fields.len());
        }
        FormCommands::Preview { key, file, values } => {
            let key = parse_form(&key)?;
            let config = match file {
                Some(file) => FormConfiguration::from_raw(key, &read_document(&file)?),
                None => client.get(&format!("/api/forms/{key}")).await?,
            };

            let mut session = FormSession::new(key, key.as_str());
            session.apply_remote(config);
            for (name, value) in parse_values(&values)? {
                session.set_value(&name, value);
            }

            let rows: Vec<PreviewRow> = session
                .rendered_fields()
                .iter()
                .map(|r| PreviewRow {
                    dom_id: r.dom_id.clone(),
                    name: r.field.name.clone(),
                    control: control_label(&r.control),
                    required: r.field.required,
                })
                .collect();
            let payload = session.payload();
            match format {
                OutputFormat::Table => {
                    println!("{}", tabled::Table::new(rows));
                    println!("{} {} value(s) would be sent", "•".cyan(), payload.len());
                }
                _ => format.print(&serde_json::json!({ "fields": rows, "payload": payload })),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use essentia_forms::ViolationKind;
    use serde_json::json;

    #[test]
    fn test_lint_reports_entries_as_written() {
        let raw = json!({
            "fields": [
                "not a field",
                {"name": "full name", "label": ""},
                {"name": "2fast", "label": "Speed", "type": "slider"}
            ]
        });
        let report = lint(&raw, FormKey::Join);
        assert!(!report.passed());
        let kinds: Vec<_> = report
            .outcome
            .unwrap_err()
            .violations
            .into_iter()
            .map(|v| (v.index, v.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (0, ViolationKind::NotAnObject),
                (1, ViolationKind::EmptyLabel),
                (1, ViolationKind::InvalidName { name: "full name".into() }),
                (2, ViolationKind::InvalidName { name: "2fast".into() }),
                (2, ViolationKind::UnknownType { value: "slider".into() }),
            ]
        );
    }

    #[test]
    fn test_lint_reports_option_problems() {
        let raw = json!({"fields": [{"name": "genre", "label": "Genre", "type": "radio"}]});
        let report = lint(&raw, FormKey::Join);
        assert!(!report.passed());
    }

    #[test]
    fn test_lint_passes_with_warnings() {
        let raw = json!({
            "fields": [
                {"name": "mix", "label": "Mix", "type": "url", "showIf": {"field": "ghost", "equals": "yes"}}
            ]
        });
        let report = lint(&raw, FormKey::Join);
        assert!(report.passed());
        assert_eq!(report.outcome.unwrap().len(), 1);
    }

    #[test]
    fn test_parse_values() {
        let values = parse_values(&[
            "role=Musician".to_string(),
            "genres=House".to_string(),
            "genres=Disco".to_string(),
        ])
        .unwrap();
        assert_eq!(values["role"], SubmissionValue::Single("Musician".into()));
        assert_eq!(values["genres"], SubmissionValue::Multi(vec!["House".into(), "Disco".into()]));
        assert!(parse_values(&["novalue".to_string()]).is_err());
    }
}
