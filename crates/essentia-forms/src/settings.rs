//! Site-wide settings rows: the coming-soon lock, the FAQ page and the home
//! page sections.

use crate::store::{SettingsBackend, StoreResult};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::warn;

const SITE_LOCK_KEY: &str = "site_lock";

/// A content row stored under a fixed key and loaded leniently.
pub trait SettingsRow: Serialize + DeserializeOwned + Default + Send {
    const KEY: &'static str;

    /// Never fails; unusable input falls back to the defaults.
    fn from_raw(raw: &Value) -> Self;
}

/// Only an explicit `{"enabled": true}` locks the site.
pub fn enabled_from_value(raw: &Value) -> bool {
    raw.get("enabled").and_then(Value::as_bool) == Some(true)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CtaType {
    #[default]
    None,
    Enquire,
    Join,
    Contact,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqItem {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub cta_type: CtaType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_label: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqConfig {
    pub eyebrow: String,
    pub title: String,
    pub lead: String,
    pub items: Vec<FaqItem>,
}

impl Default for FaqConfig {
    fn default() -> Self {
        let item = |id: &str, category: &str, question: &str, answer: &str, cta: Option<(CtaType, &str)>| FaqItem {
            id: id.into(),
            category: Some(category.into()),
            question: question.into(),
            answer: answer.into(),
            cta_type: cta.map(|(t, _)| t).unwrap_or_default(),
            cta_label: cta.map(|(_, l)| l.to_string()),
        };

        Self {
            eyebrow: "Help centre".into(),
            title: "Frequently asked questions.".into(),
            lead: "A quick guide for venues, events and artists working with Essentia. If you can't find what you're looking for, just get in touch.".into(),
            items: vec![
                item(
                    "venues-1",
                    "For venues & events",
                    "What kind of venues do you work with?",
                    "We curate music for restaurants, bars, rooftops, lounges, members' clubs and private events. The focus is always on atmosphere, matching the music to your brand, guest profile and schedule.",
                    Some((CtaType::Enquire, "Enquire about a booking")),
                ),
                item(
                    "venues-2",
                    "For venues & events",
                    "How does the booking process work?",
                    "Start by sending an enquiry with details about your venue, schedule and music brief. We'll follow up with a short call, then propose artists and a music direction. Once approved, we lock in dates and send a simple agreement.",
                    Some((CtaType::Enquire, "Open enquiry form")),
                ),
                item(
                    "artists-1",
                    "For artists",
                    "How do I join the Essentia roster?",
                    "Use the \"Join the roster\" form on the homepage to share your links, current venues and a short intro. We review every application carefully and will be in touch if there is a suitable fit.",
                    Some((CtaType::Join, "Apply to join")),
                ),
                item(
                    "general-1",
                    "General",
                    "I still have questions that aren't covered here.",
                    "No problem. You can contact us directly and we'll route your message to the right person on the team.",
                    Some((CtaType::Contact, "Contact us")),
                ),
                item(
                    "general-2",
                    "General",
                    "What areas do you currently cover?",
                    "We work primarily across the UK with a core presence in major cities. For international bookings, please include travel details in your enquiry and we'll confirm what's possible.",
                    None,
                ),
                item(
                    "general-3",
                    "General",
                    "How far in advance should we book?",
                    "For residencies, earlier is always better. One-off events are typically booked 1-4 weeks in advance, though we can often accommodate shorter notice depending on artist availability.",
                    None,
                ),
            ],
        }
    }
}

impl SettingsRow for FaqConfig {
    const KEY: &'static str = "faq";

    /// Items without a question or answer are dropped, ids are derived from
    /// position when missing, a CTA label only survives with a CTA. Empty copy
    /// and an empty item list fall back to the defaults.
    fn from_raw(raw: &Value) -> Self {
        let base = FaqConfig::default();
        let text = |key: &str| raw.get(key).and_then(Value::as_str).map(str::trim).unwrap_or("");
        let or = |s: &str, fallback: String| if s.is_empty() { fallback } else { s.to_string() };

        let items: Vec<FaqItem> = raw
            .get("items")
            .and_then(Value::as_array)
            .map(|items| items.iter().enumerate().filter_map(|(i, item)| faq_item(item, i)).collect())
            .unwrap_or_default();

        Self {
            eyebrow: or(text("eyebrow"), base.eyebrow),
            title: or(text("title"), base.title),
            lead: or(text("lead"), base.lead),
            items: if items.is_empty() { base.items } else { items },
        }
    }
}

fn faq_item(raw: &Value, index: usize) -> Option<FaqItem> {
    let text = |key: &str| {
        raw.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    };

    let question = text("question")?;
    let answer = text("answer")?;
    let cta_type = raw
        .get("ctaType")
        .cloned()
        .and_then(|v| serde_json::from_value::<CtaType>(v).ok())
        .unwrap_or_default();
    let cta_label = match cta_type {
        CtaType::None => None,
        _ => text("ctaLabel"),
    };

    Some(FaqItem {
        id: text("id").unwrap_or_else(|| format!("faq_{index}")),
        category: text("category"),
        question,
        answer,
        cta_type,
        cta_label,
    })
}

/// Site-wide settings rows over a [`SettingsBackend`].
#[derive(Clone)]
pub struct SiteSettings {
    backend: Arc<dyn SettingsBackend>,
}

impl SiteSettings {
    pub fn new(backend: Arc<dyn SettingsBackend>) -> Self {
        Self { backend }
    }

    /// A read failure counts as unlocked.
    pub async fn site_lock_enabled(&self) -> bool {
        match self.backend.fetch(SITE_LOCK_KEY).await {
            Ok(row) => row.as_ref().map(enabled_from_value).unwrap_or(false),
            Err(e) => {
                warn!(error = %e, "site lock read failed, treating site as unlocked");
                false
            }
        }
    }

    pub async fn set_site_lock(&self, enabled: bool) -> StoreResult<()> {
        self.backend.upsert(SITE_LOCK_KEY, json!({ "enabled": enabled })).await
    }

    /// Stored row, or the default on a miss or a read failure.
    pub async fn row<T: SettingsRow>(&self) -> T {
        match self.backend.fetch(T::KEY).await {
            Ok(Some(raw)) => T::from_raw(&raw),
            Ok(None) => T::default(),
            Err(e) => {
                warn!(key = T::KEY, error = %e, "settings read failed, serving default");
                T::default()
            }
        }
    }

    /// Sanitize and replace a row; returns what was stored.
    pub async fn put_row<T: SettingsRow>(&self, raw: &Value) -> StoreResult<T> {
        let row = T::from_raw(raw);
        let value = serde_json::to_value(&row).unwrap_or(Value::Null);
        self.backend.upsert(T::KEY, value).await?;
        Ok(row)
    }

    pub async fn faq(&self) -> FaqConfig {
        self.row().await
    }

    pub async fn put_faq(&self, raw: &Value) -> StoreResult<FaqConfig> {
        self.put_row(raw).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::BrokenBackend;
    use crate::store::InMemoryBackend;

    #[test]
    fn test_enabled_from_value() {
        assert!(enabled_from_value(&json!({"enabled": true})));
        assert!(!enabled_from_value(&json!({"enabled": "true"})));
        assert!(!enabled_from_value(&json!({"enabled": 1})));
        assert!(!enabled_from_value(&json!(true)));
        assert!(!enabled_from_value(&json!(null)));
    }

    #[tokio::test]
    async fn test_site_lock_toggle() {
        let settings = SiteSettings::new(Arc::new(InMemoryBackend::new()));
        assert!(!settings.site_lock_enabled().await);
        settings.set_site_lock(true).await.unwrap();
        assert!(settings.site_lock_enabled().await);
        settings.set_site_lock(false).await.unwrap();
        assert!(!settings.site_lock_enabled().await);
    }

    #[tokio::test]
    async fn test_site_lock_read_failure_is_unlocked() {
        let settings = SiteSettings::new(Arc::new(BrokenBackend));
        assert!(!settings.site_lock_enabled().await);
        assert!(settings.set_site_lock(true).await.is_err());
    }

    #[test]
    fn test_faq_item_sanitizing() {
        let raw = json!({
            "title": "  ",
            "items": [
                {"question": "Q1", "answer": "A1", "ctaType": "none", "ctaLabel": "ignored"},
                {"question": "Q2"},
                {"id": "x", "question": " Q3 ", "answer": "A3", "ctaType": "join", "ctaLabel": " Apply "},
                {"question": "Q4", "answer": "A4", "ctaType": "tiktok"}
            ]
        });
        let config = FaqConfig::from_raw(&raw);
        assert_eq!(config.title, FaqConfig::default().title);
        assert_eq!(config.items.len(), 3);
        assert_eq!(config.items[0].id, "faq_0");
        assert_eq!(config.items[0].cta_label, None);
        assert_eq!(config.items[1].id, "x");
        assert_eq!(config.items[1].question, "Q3");
        assert_eq!(config.items[1].cta_type, CtaType::Join);
        assert_eq!(config.items[1].cta_label.as_deref(), Some("Apply"));
        assert_eq!(config.items[2].cta_type, CtaType::None);
    }

    #[tokio::test]
    async fn test_faq_round_trip() {
        let settings = SiteSettings::new(Arc::new(InMemoryBackend::new()));
        assert_eq!(settings.faq().await, FaqConfig::default());
        let stored = settings
            .put_faq(&json!({"items": [{"question": "Q", "answer": "A"}]}))
            .await
            .unwrap();
        assert_eq!(settings.faq().await, stored);
        assert_eq!(stored.items.len(), 1);
    }

    #[tokio::test]
    async fn test_rows_are_stored_sanitized() {
        use crate::home::{ClientsSection, HeroSection};

        let backend = Arc::new(InMemoryBackend::new());
        let settings = SiteSettings::new(backend.clone());
        assert_eq!(settings.row::<HeroSection>().await, HeroSection::default());

        let stored: HeroSection = settings
            .put_row(&json!({"title": " Late shows ", "overlayDarkness": -2, "extra": true}))
            .await
            .unwrap();
        assert_eq!(stored.title, "Late shows");
        assert_eq!(stored.overlay_darkness, 0.0);

        let raw = backend.fetch("home_hero").await.unwrap().unwrap();
        assert!(raw.get("extra").is_none());
        assert_eq!(raw["title"], "Late shows");
        assert_eq!(settings.row::<HeroSection>().await, stored);
        assert_eq!(settings.row::<ClientsSection>().await, ClientsSection::default());
    }

    #[tokio::test]
    async fn test_row_read_failure_serves_default() {
        use crate::home::ServicesSection;

        let settings = SiteSettings::new(Arc::new(BrokenBackend));
        assert_eq!(settings.row::<ServicesSection>().await, ServicesSection::default());
        assert!(settings.put_row::<ServicesSection>(&json!({})).await.is_err());
    }
}
