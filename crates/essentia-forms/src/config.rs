//! Form configuration
//!
//! One record per form key, holding the section/modal copy, the delivery
//! address and the field list. Records are replaced wholesale on save.

use crate::builder::{validate_raw_fields, ValidationReport, Warning};
use crate::defaults;
use crate::field::FieldSchema;
use crate::normalize::normalize;
use crate::FormsError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// The three lead forms on the site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormKey {
    Enquire,
    Join,
    Contact,
}

impl FormKey {
    pub const ALL: [FormKey; 3] = [FormKey::Enquire, FormKey::Join, FormKey::Contact];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormKey::Enquire => "enquire",
            FormKey::Join => "join",
            FormKey::Contact => "contact",
        }
    }

    /// Prefix for generated field ids.
    pub fn id_prefix(&self) -> &'static str {
        self.as_str()
    }

    /// Copy keys that may be saved as an empty string to hide the element.
    fn blank_allowed(&self, copy_key: &str) -> bool {
        match self {
            FormKey::Enquire => matches!(copy_key, "consultCallLabel" | "consultCallUrl"),
            FormKey::Contact => matches!(copy_key, "eyebrow" | "lead" | "contactEmail"),
            FormKey::Join => false,
        }
    }
}

impl fmt::Display for FormKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormKey {
    type Err = FormsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| FormsError::UnknownForm(s.to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialPlatform {
    Instagram,
    X,
    Tiktok,
    Youtube,
    Linkedin,
    Facebook,
    Soundcloud,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub platform: SocialPlatform,
    pub url: String,
}

/// Section and modal copy. The optional extras only exist on the form that
/// uses them (consult call on enquire, contact details on contact).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormCopy {
    pub eyebrow: String,
    pub title: String,
    pub lead: String,
    pub button_label: String,

    pub modal_kicker: String,
    pub modal_title: String,
    pub modal_lead: String,
    pub submit_label: String,
    pub success_message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consult_call_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consult_call_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub social_links: Vec<SocialLink>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormConfiguration {
    #[serde(flatten)]
    pub copy: FormCopy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_email: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
}

impl FormConfiguration {
    /// Lenient load of a stored or submitted record.
    ///
    /// Copy strings are trimmed and fall back to the built-in copy when empty
    /// (except the keys a form allows to be blank). Fields go through the
    /// normalizer; an empty result falls back to the built-in field list.
    pub fn from_raw(key: FormKey, raw: &Value) -> Self {
        let empty = Map::new();
        let obj = raw.as_object().unwrap_or(&empty);
        let base = defaults::default_configuration(key);
        let d = &base.copy;

        let text = |copy_key: &str, fallback: &str| -> String {
            match obj.get(copy_key).and_then(Value::as_str).map(str::trim) {
                Some(s) if !s.is_empty() || key.blank_allowed(copy_key) => s.to_string(),
                _ => fallback.to_string(),
            }
        };
        let extra = |copy_key: &str, fallback: &Option<String>| -> Option<String> {
            fallback.as_ref().map(|f| text(copy_key, f))
        };

        let copy = FormCopy {
            eyebrow: text("eyebrow", &d.eyebrow),
            title: text("title", &d.title),
            lead: text("lead", &d.lead),
            button_label: text("buttonLabel", &d.button_label),
            modal_kicker: text("modalKicker", &d.modal_kicker),
            modal_title: text("modalTitle", &d.modal_title),
            modal_lead: text("modalLead", &d.modal_lead),
            submit_label: text("submitLabel", &d.submit_label),
            success_message: text("successMessage", &d.success_message),
            consult_call_label: extra("consultCallLabel", &d.consult_call_label),
            consult_call_url: extra("consultCallUrl", &d.consult_call_url),
            contact_email: extra("contactEmail", &d.contact_email),
            contact_phone: match key {
                FormKey::Contact => obj
                    .get("contactPhone")
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from),
                _ => None,
            },
            social_links: match key {
                FormKey::Contact => social_links(obj.get("socialLinks")),
                _ => Vec::new(),
            },
        };

        let recipient_email = obj
            .get("recipientEmail")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);

        let fields = match obj.get("fields") {
            Some(raw_fields) => normalize(raw_fields, key.id_prefix()),
            None => Vec::new(),
        };
        let fields = if fields.is_empty() { base.fields } else { fields };

        Self { copy, recipient_email, fields }
    }

    /// Strict load of an admin save. The submitted `fields` must pass the
    /// authoring rules as written; copy is still loaded leniently.
    pub fn from_authoring(key: FormKey, raw: &Value) -> Result<(Self, Vec<Warning>), ValidationReport> {
        let warnings = match raw.get("fields") {
            Some(raw_fields) => validate_raw_fields(raw_fields, key.id_prefix())?.1,
            None => Vec::new(),
        };
        Ok((Self::from_raw(key, raw), warnings))
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Entries with an unknown platform or an empty url are dropped.
fn social_links(raw: Option<&Value>) -> Vec<SocialLink> {
    raw.and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    let platform = item.get("platform")?.as_str()?.trim();
                    let url = item.get("url")?.as_str()?.trim();
                    if url.is_empty() {
                        return None;
                    }
                    let platform: SocialPlatform =
                        serde_json::from_value(Value::from(platform)).ok()?;
                    Some(SocialLink { platform, url: url.to_string() })
                })
                .collect()
        })
        .unwrap_or_default()
}
