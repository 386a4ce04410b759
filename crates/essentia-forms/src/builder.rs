//! Admin form builder
//!
//! Authoring-time rules are stricter than the normalizer: nothing is coerced,
//! every problem in the list is reported at once, and a list with any
//! violation is never persisted.

use crate::field::{is_valid_field_name, FieldSchema, FieldType};
use crate::normalize::{normalize, normalize_field};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;

/// What is wrong with one field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViolationKind {
    EmptyLabel,
    EmptyName,
    InvalidName { name: String },
    DuplicateName { name: String, first_index: usize },
    DuplicateId { id: String, first_index: usize },
    MissingOptions { field_type: FieldType },
    MinGreaterThanMax { min: f64, max: f64 },
    UnknownType { value: String },
    NotAnObject,
    NotAList,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::EmptyLabel => write!(f, "label is required"),
            ViolationKind::EmptyName => write!(f, "name is required"),
            ViolationKind::InvalidName { name } => write!(
                f,
                "name '{name}' must start with a letter and contain only letters, digits or underscores"
            ),
            ViolationKind::DuplicateName { name, first_index } => {
                write!(f, "name '{name}' is already used by field {}", first_index + 1)
            }
            ViolationKind::DuplicateId { id, first_index } => {
                write!(f, "id '{id}' is already used by field {}", first_index + 1)
            }
            ViolationKind::MissingOptions { field_type } => {
                write!(f, "{field_type} fields need at least one option")
            }
            ViolationKind::MinGreaterThanMax { min, max } => {
                write!(f, "min greater than max ({min} > {max})")
            }
            ViolationKind::UnknownType { value } => write!(f, "unknown field type '{value}'"),
            ViolationKind::NotAnObject => write!(f, "entry is not a field object"),
            ViolationKind::NotAList => write!(f, "fields must be a list"),
        }
    }
}

/// A rule broken by the field at `index` (0-based).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub index: usize,
    pub field_id: String,
    #[serde(flatten)]
    pub kind: ViolationKind,
    pub message: String,
}

impl Violation {
    fn new(index: usize, field: &FieldSchema, kind: ViolationKind) -> Self {
        Self::at(index, field.id.clone(), kind)
    }

    fn at(index: usize, field_id: String, kind: ViolationKind) -> Self {
        let message = format!("Field {}: {kind}", index + 1);
        Self { index, field_id, kind, message }
    }
}

/// Every violation found in a field list.
#[derive(Clone, Debug, Error, PartialEq, Serialize, Deserialize)]
#[error("{} field problem(s): {}", .violations.len(), summary(.violations))]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

fn summary(violations: &[Violation]) -> String {
    violations.iter().map(|v| v.message.as_str()).collect::<Vec<_>>().join("; ")
}

impl ValidationReport {
    pub fn indices(&self) -> Vec<usize> {
        let mut out: Vec<_> = self.violations.iter().map(|v| v.index).collect();
        out.dedup();
        out
    }

    pub fn for_index(&self, index: usize) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.index == index)
    }
}

/// Non-fatal authoring problems.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// `showIf` points at a name that is not in the list; the field will never show.
    DanglingShowIf { index: usize, target: String },
    /// `showIf` points at the field itself.
    SelfReferencingShowIf { index: usize },
}

/// Check a field list before it is saved.
///
/// Runs over the whole list (never stops at the first problem). On success
/// returns the warnings, which do not block the save.
pub fn validate_fields(fields: &[FieldSchema]) -> Result<Vec<Warning>, ValidationReport> {
    let mut violations = Vec::new();
    let mut names: HashMap<&str, usize> = HashMap::new();
    let mut ids: HashMap<&str, usize> = HashMap::new();

    for (index, field) in fields.iter().enumerate() {
        let mut flag = |kind| violations.push(Violation::new(index, field, kind));

        if field.label.trim().is_empty() {
            flag(ViolationKind::EmptyLabel);
        }

        let name = field.name.trim();
        if name.is_empty() {
            flag(ViolationKind::EmptyName);
        } else if !is_valid_field_name(name) {
            flag(ViolationKind::InvalidName { name: name.to_string() });
        } else if let Some(&first_index) = names.get(name) {
            flag(ViolationKind::DuplicateName { name: name.to_string(), first_index });
        } else {
            names.insert(name, index);
        }

        let id = field.id.trim();
        if !id.is_empty() {
            match ids.get(id) {
                Some(&first_index) => {
                    flag(ViolationKind::DuplicateId { id: id.to_string(), first_index })
                }
                None => {
                    ids.insert(id, index);
                }
            }
        }

        if field.field_type.requires_options() && field.options().iter().all(|o| o.trim().is_empty()) {
            flag(ViolationKind::MissingOptions { field_type: field.field_type });
        }

        if field.field_type == FieldType::Number {
            if let (Some(min), Some(max)) = (field.min, field.max) {
                if min > max {
                    flag(ViolationKind::MinGreaterThanMax { min, max });
                }
            }
        }
    }

    if !violations.is_empty() {
        return Err(ValidationReport { violations });
    }

    let known: HashSet<&str> = fields.iter().map(|f| f.name.as_str()).collect();
    let warnings = fields
        .iter()
        .enumerate()
        .filter_map(|(index, field)| {
            let rule = field.show_if.as_ref()?;
            if rule.field == field.name {
                Some(Warning::SelfReferencingShowIf { index })
            } else if !known.contains(rule.field.as_str()) {
                Some(Warning::DanglingShowIf { index, target: rule.field.clone() })
            } else {
                None
            }
        })
        .collect::<Vec<_>>();

    for warning in &warnings {
        tracing::debug!(?warning, "form builder warning");
    }
    Ok(warnings)
}

/// Check a field list exactly as an admin submitted it.
///
/// Entries are judged before any normalization, so a bad key, an empty label
/// or an unknown type is reported instead of being rewritten. When every
/// entry is an object, the checks of [`validate_fields`] run on the
/// normalized list as well and all violations come back together. On success
/// returns the normalized fields and the warnings.
pub fn validate_raw_fields(
    raw: &Value,
    prefix: &str,
) -> Result<(Vec<FieldSchema>, Vec<Warning>), ValidationReport> {
    let Some(items) = raw.as_array() else {
        return Err(ValidationReport {
            violations: vec![Violation::at(0, String::new(), ViolationKind::NotAList)],
        });
    };

    let mut violations = Vec::new();
    // entries whose name or label is wrong as written
    let mut renamed = HashSet::new();
    let mut all_objects = true;

    for (index, item) in items.iter().enumerate() {
        let Some(obj) = item.as_object() else {
            all_objects = false;
            violations.push(Violation::at(index, String::new(), ViolationKind::NotAnObject));
            continue;
        };
        let text = |key: &str| obj.get(key).and_then(Value::as_str).map(str::trim).unwrap_or("");
        let id = text("id").to_string();
        let mut flag = |kind| violations.push(Violation::at(index, id.clone(), kind));

        if text("label").is_empty() {
            flag(ViolationKind::EmptyLabel);
            renamed.insert(index);
        }

        let name = text("name");
        if name.is_empty() {
            flag(ViolationKind::EmptyName);
            renamed.insert(index);
        } else if !is_valid_field_name(name) {
            flag(ViolationKind::InvalidName { name: name.to_string() });
            renamed.insert(index);
        }

        if let Some(raw_type) = obj.get("type") {
            if raw_type.as_str().and_then(|t| FieldType::parse(t.trim())).is_none() {
                let value = raw_type.as_str().map(String::from).unwrap_or_else(|| raw_type.to_string());
                flag(ViolationKind::UnknownType { value });
            }
        }
    }

    if !all_objects {
        return Err(ValidationReport { violations });
    }

    let fields = normalize(raw, prefix);
    match validate_fields(&fields) {
        Ok(warnings) if violations.is_empty() => Ok((fields, warnings)),
        Ok(_) => Err(ValidationReport { violations }),
        Err(report) => {
            // duplicates among coerced names say nothing about what was written
            violations.extend(report.violations.into_iter().filter(|v| {
                let derived = matches!(
                    v.kind,
                    ViolationKind::DuplicateName { .. } | ViolationKind::DuplicateId { .. }
                );
                !(derived && renamed.contains(&v.index))
            }));
            violations.sort_by_key(|v| v.index);
            Err(ValidationReport { violations })
        }
    }
}

/// Editing session over one form's field list.
///
/// Multi-line option text is buffered per field id until committed, so an
/// admin can type blank lines mid-edit without losing them. Buffers belong to
/// this session and die with it.
#[derive(Clone, Debug)]
pub struct FormBuilder {
    prefix: String,
    fields: Vec<FieldSchema>,
    option_drafts: HashMap<String, String>,
    next_seq: usize,
}

impl FormBuilder {
    pub fn new(prefix: impl Into<String>, fields: Vec<FieldSchema>) -> Self {
        let next_seq = fields.len() + 1;
        Self { prefix: prefix.into(), fields, option_drafts: HashMap::new(), next_seq }
    }

    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    pub fn field(&self, id: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Append a blank field and return its id.
    pub fn add_field(&mut self, field_type: FieldType) -> String {
        let id = loop {
            let candidate = format!("{}_new_{}", self.prefix, self.next_seq);
            self.next_seq += 1;
            if self.field(&candidate).is_none() {
                break candidate;
            }
        };
        let name = format!("field_{}", self.fields.len() + 1);
        let mut field = FieldSchema::new(id.clone(), name, "New field", field_type);
        if field_type.requires_options() {
            field.options = Some(vec!["Option 1".to_string()]);
        }
        self.fields.push(field);
        id
    }

    /// Remove a field together with its option draft.
    pub fn remove_field(&mut self, id: &str) -> Option<FieldSchema> {
        let pos = self.fields.iter().position(|f| f.id == id)?;
        self.option_drafts.remove(id);
        Some(self.fields.remove(pos))
    }

    /// Move a field up (negative) or down (positive), clamped to the list.
    pub fn move_field(&mut self, id: &str, delta: isize) -> bool {
        let Some(pos) = self.fields.iter().position(|f| f.id == id) else {
            return false;
        };
        let last = self.fields.len().saturating_sub(1) as isize;
        let target = (pos as isize + delta).clamp(0, last) as usize;
        let field = self.fields.remove(pos);
        self.fields.insert(target, field);
        true
    }

    pub fn update<F>(&mut self, id: &str, edit: F) -> bool
    where
        F: FnOnce(&mut FieldSchema),
    {
        match self.fields.iter_mut().find(|f| f.id == id) {
            Some(field) => {
                edit(field);
                true
            }
            None => false,
        }
    }

    /// Change a field's type, dropping attributes that no longer apply.
    pub fn set_type(&mut self, id: &str, field_type: FieldType) -> bool {
        let Some(pos) = self.fields.iter().position(|f| f.id == id) else {
            return false;
        };
        let mut edited = self.fields[pos].clone();
        edited.field_type = field_type;
        let raw = match serde_json::to_value(&edited) {
            Ok(raw) => raw,
            Err(_) => return false,
        };
        if let Some(mut field) = normalize_field(&raw, pos, &self.prefix) {
            // keep authoring values verbatim; only the attribute set changes
            field.name = edited.name;
            field.label = edited.label;
            if field_type.requires_options() && field.options.is_none() {
                field.options = Some(Vec::new());
            }
            self.fields[pos] = field;
        }
        if !field_type.requires_options() {
            self.option_drafts.remove(id);
        }
        true
    }

    pub fn set_option_draft(&mut self, id: &str, text: impl Into<String>) {
        if self.field(id).is_some() {
            self.option_drafts.insert(id.to_string(), text.into());
        }
    }

    /// Draft text if one is being edited, else the committed options.
    pub fn option_draft(&self, id: &str) -> String {
        match self.option_drafts.get(id) {
            Some(text) => text.clone(),
            None => self.field(id).map(|f| f.options().join("\n")).unwrap_or_default(),
        }
    }

    /// Parse every draft into its field's option list.
    pub fn commit_drafts(&mut self) {
        for (id, text) in self.option_drafts.drain() {
            if let Some(field) = self.fields.iter_mut().find(|f| f.id == id) {
                field.options = Some(parse_option_lines(&text));
            }
        }
    }

    /// Commit drafts and validate; the returned list is ready to persist.
    pub fn finish(&mut self) -> Result<Vec<FieldSchema>, ValidationReport> {
        self.commit_drafts();
        validate_fields(&self.fields)?;
        Ok(self.fields.clone())
    }
}

/// One option per non-empty trimmed line.
pub fn parse_option_lines(text: &str) -> Vec<String> {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).map(String::from).collect()
}
