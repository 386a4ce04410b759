//! Home page sections
//!
//! One row each for the hero, about, services and clients sections. Every
//! row is loaded leniently: unusable entries are dropped and empty copy or an
//! empty list falls back to the built-in content.

use crate::settings::SettingsRow;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const HERO_OVERLAY: f64 = 0.5;
const SERVICE_OVERLAY: f64 = 0.55;
const SERVICE_OVERLAY_MAX: f64 = 0.8;
const MAX_SERVICES: usize = 12;
const MAX_INCLUDES: usize = 12;
const MAX_CLIENTS: usize = 40;

fn text<'a>(raw: &'a Value, key: &str) -> &'a str {
    raw.get(key).and_then(Value::as_str).map(str::trim).unwrap_or("")
}

fn text_or(raw: &Value, key: &str, fallback: &str) -> String {
    match text(raw, key) {
        "" => fallback.to_string(),
        s => s.to_string(),
    }
}

fn optional(raw: &Value, key: &str) -> Option<String> {
    Some(text(raw, key)).filter(|s| !s.is_empty()).map(String::from)
}

/// Numbers or numeric strings; anything else is `None`.
fn number(raw: &Value, key: &str) -> Option<f64> {
    let n = match raw.get(key)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Trimmed non-empty strings of an array, or `None` when it is not one.
fn string_list(raw: &Value, key: &str) -> Option<Vec<String>> {
    raw.get(key).and_then(Value::as_array).map(|items| {
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    })
}

fn objects<'a>(raw: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    raw.get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter(|item| item.is_object())
}

fn or_default<T>(items: Vec<T>, fallback: Vec<T>) -> Vec<T> {
    if items.is_empty() {
        fallback
    } else {
        items
    }
}

// =============================================================================
// Hero
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MediaType {
    #[default]
    Image,
    Video,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroSection {
    pub media_type: MediaType,
    pub image_src: String,
    pub video_src: Option<String>,
    pub poster_src: Option<String>,
    pub title: String,
    pub description: String,
    pub cta_text: String,
    pub cta_href: String,
    /// 0 (none) to 1 (black)
    pub overlay_darkness: f64,
}

impl Default for HeroSection {
    fn default() -> Self {
        Self {
            media_type: MediaType::Image,
            image_src: String::new(),
            video_src: None,
            poster_src: None,
            title: "Bringing nightlife to life.".into(),
            description: "We're a curated collective of DJs and musicians crafting atmosphere-first experiences for venues and events. From soulful acoustics to floor-filling sets, Essentia delivers sound that fits the room and the brand.".into(),
            cta_text: "ENQUIRE NOW".into(),
            cta_href: "#enquire".into(),
            overlay_darkness: HERO_OVERLAY,
        }
    }
}

impl SettingsRow for HeroSection {
    const KEY: &'static str = "home_hero";

    fn from_raw(raw: &Value) -> Self {
        let d = Self::default();
        Self {
            media_type: match text(raw, "mediaType") {
                "VIDEO" => MediaType::Video,
                _ => MediaType::Image,
            },
            image_src: text(raw, "imageSrc").to_string(),
            video_src: optional(raw, "videoSrc"),
            poster_src: optional(raw, "posterSrc"),
            title: text_or(raw, "title", &d.title),
            description: text_or(raw, "description", &d.description),
            cta_text: text_or(raw, "ctaText", &d.cta_text),
            cta_href: text_or(raw, "ctaHref", &d.cta_href),
            overlay_darkness: number(raw, "overlayDarkness")
                .map(|n| n.clamp(0.0, 1.0))
                .unwrap_or(HERO_OVERLAY),
        }
    }
}

// =============================================================================
// About
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickFact {
    pub value: String,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCard {
    pub title: String,
    pub body: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutSection {
    pub eyebrow: String,
    pub title: String,
    pub lead: String,
    pub bullets: Vec<String>,
    pub cta_primary_text: String,
    pub cta_primary_href: String,
    pub cta_ghost_text: String,
    pub cta_ghost_href: String,
    pub quick_facts: Vec<QuickFact>,
    pub values: Vec<ValueCard>,
    pub video_url: Option<String>,
    pub video_poster: Option<String>,
    pub video_caption: Option<String>,
}

impl Default for AboutSection {
    fn default() -> Self {
        let fact = |value: &str, label: &str| QuickFact { value: value.into(), label: label.into() };
        let card = |title: &str, body: &str| ValueCard { title: title.into(), body: body.into() };

        Self {
            eyebrow: "ABOUT Essentia".into(),
            title: "Bringing nightlife to life.".into(),
            lead: "We're a curated collective of DJs and musicians crafting atmosphere-first experiences for venues and events. From soulful acoustics to floor-filling sets, Essentia delivers sound that fits the room and the brand.".into(),
            bullets: vec![
                "Curation over chaos: the right artist for the right room.".into(),
                "Reliable bookings, clear comms, zero hidden costs.".into(),
                "Artist-first ethos; venue-ready professionalism.".into(),
            ],
            cta_primary_text: "Learn more".into(),
            cta_primary_href: "/about".into(),
            cta_ghost_text: "Enquire now".into(),
            cta_ghost_href: "/enquire".into(),
            quick_facts: vec![
                fact("200+", "Gigs curated"),
                fact("UK-wide", "Venue coverage"),
                fact("DJs & Musicians", "Tailored rosters"),
            ],
            values: vec![
                card("Curation over chaos", "Every brief matched to the right artist, not the nearest calendar gap."),
                card("Artist-first", "Fair fees, clear comms, reliable logistics, because great work needs great conditions."),
                card("Venue-ready", "Professionalism on arrival, compact setups, and volume discipline for premium hospitality."),
                card("Zero surprises", "Transparent pricing, tidy invoicing, and dedicated point of contact from enquiry to encore."),
                card("Brand-fit sound", "Programming that respects brand tone and guest profile at every touchpoint."),
                card("Reliable rosters", "Depth of talent to cover multi-site schedules and last-minute changes."),
                card("Tech-ready", "Clear specs, tidy setups, and no drama with in-house teams or residents."),
                card("Guest-first", "Read-the-room sets that build energy without overwhelming the space."),
                card("Feedback loops", "We learn every week to refine the policy and roster for your venue."),
            ],
            video_url: None,
            video_poster: None,
            video_caption: None,
        }
    }
}

impl SettingsRow for AboutSection {
    const KEY: &'static str = "home_about";

    fn from_raw(raw: &Value) -> Self {
        let d = Self::default();

        let quick_facts = objects(raw, "quickFacts")
            .filter_map(|f| {
                let (value, label) = (text(f, "value"), text(f, "label"));
                (!value.is_empty() && !label.is_empty())
                    .then(|| QuickFact { value: value.into(), label: label.into() })
            })
            .collect();
        let values = objects(raw, "values")
            .filter_map(|v| {
                let (title, body) = (text(v, "title"), text(v, "body"));
                (!title.is_empty() && !body.is_empty())
                    .then(|| ValueCard { title: title.into(), body: body.into() })
            })
            .collect();

        Self {
            eyebrow: text_or(raw, "eyebrow", &d.eyebrow),
            title: text_or(raw, "title", &d.title),
            lead: text_or(raw, "lead", &d.lead),
            bullets: or_default(string_list(raw, "bullets").unwrap_or_default(), d.bullets),
            cta_primary_text: text_or(raw, "ctaPrimaryText", &d.cta_primary_text),
            cta_primary_href: text_or(raw, "ctaPrimaryHref", &d.cta_primary_href),
            cta_ghost_text: text_or(raw, "ctaGhostText", &d.cta_ghost_text),
            cta_ghost_href: text_or(raw, "ctaGhostHref", &d.cta_ghost_href),
            quick_facts: or_default(quick_facts, d.quick_facts),
            values: or_default(values, d.values),
            video_url: optional(raw, "videoUrl"),
            video_poster: optional(raw, "videoPoster"),
            video_caption: optional(raw, "videoCaption"),
        }
    }
}

// =============================================================================
// Services
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceItem {
    pub key: String,
    pub title: String,
    pub blurb: String,
    pub href: String,
    pub image: String,
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub includes: Option<Vec<String>>,
    /// Darkness of the card image, 0 to 0.8
    pub overlay: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServicesSection {
    pub kicker: String,
    pub title: String,
    pub lead: String,
    pub items: Vec<ServiceItem>,
}

impl Default for ServicesSection {
    fn default() -> Self {
        let includes = |first: &str, briefed: &str| {
            Some(vec![
                first.to_string(),
                briefed.to_string(),
                "Clear communication and artist alignment".to_string(),
                "One point of contact throughout".to_string(),
                "Reliable cover if availability changes".to_string(),
            ])
        };

        Self {
            kicker: "Our Services".into(),
            title: "Sound that fits the room.".into(),
            lead: "Two core offerings to start, built to scale with your brand.".into(),
            items: vec![
                ServiceItem {
                    key: "dj".into(),
                    title: "DJs".into(),
                    blurb: "Signature selectors for restaurants, bars and late-night venues. Floor-filling sets matched to brand, guest profile, and time of day.".into(),
                    href: "#enquire".into(),
                    image: "/assets/services/djs.jpg".into(),
                    tag: "Nightlife energy".into(),
                    detail: Some("Our DJ roster includes experienced selectors used to brand-fit programming, guest-flow control and multi-room setups.".into()),
                    includes: includes(
                        "Programming aligned to time of day and atmosphere",
                        "DJs briefed on volume, tone, and venue context",
                    ),
                    overlay: SERVICE_OVERLAY,
                },
                ServiceItem {
                    key: "musician".into(),
                    title: "Musicians".into(),
                    blurb: "Acoustic duos, sax, strings, vocalists: atmosphere-first performances curated for intimate dining and premium hospitality.".into(),
                    href: "#enquire".into(),
                    image: "/assets/services/musicians.jpg".into(),
                    tag: "Live atmosphere".into(),
                    detail: Some("We supply adaptable musicians for brunch, dinner or lounges, artists who enhance the atmosphere without overwhelming the room.".into()),
                    includes: includes(
                        "Set formats matched to service style and energy",
                        "Musicians briefed on volume, tone, and venue context",
                    ),
                    overlay: SERVICE_OVERLAY,
                },
            ],
        }
    }
}

fn service_item(raw: &Value) -> Option<ServiceItem> {
    let title = text(raw, "title");
    let blurb = text(raw, "blurb");
    if title.is_empty() || blurb.is_empty() {
        return None;
    }

    let key = match text(raw, "key") {
        "" => title.to_lowercase().split_whitespace().collect::<Vec<_>>().join("-"),
        k => k.to_string(),
    };

    Some(ServiceItem {
        key,
        title: title.into(),
        blurb: blurb.into(),
        href: text_or(raw, "href", "#enquire"),
        image: text(raw, "image").into(),
        tag: text(raw, "tag").into(),
        detail: optional(raw, "detail"),
        includes: string_list(raw, "includes").map(|mut items| {
            items.truncate(MAX_INCLUDES);
            items
        }),
        overlay: number(raw, "overlay")
            .map(|n| n.clamp(0.0, SERVICE_OVERLAY_MAX))
            .unwrap_or(SERVICE_OVERLAY),
    })
}

impl SettingsRow for ServicesSection {
    const KEY: &'static str = "home_services";

    fn from_raw(raw: &Value) -> Self {
        let d = Self::default();
        let items = objects(raw, "items").filter_map(service_item).take(MAX_SERVICES).collect();
        Self {
            kicker: text_or(raw, "kicker", &d.kicker),
            title: text_or(raw, "title", &d.title),
            lead: text_or(raw, "lead", &d.lead),
            items: or_default(items, d.items),
        }
    }
}

// =============================================================================
// Clients
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientLogo {
    pub name: String,
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blurb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_bg: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientsSection {
    pub title: String,
    pub subtitle: String,
    pub items: Vec<ClientLogo>,
}

impl Default for ClientsSection {
    fn default() -> Self {
        let client = |name: &str, src: &str, blurb: &str, quote: &str, person_title: &str| ClientLogo {
            name: name.into(),
            src: src.into(),
            blurb: Some(blurb.into()),
            quote: Some(quote.into()),
            person_title: Some(person_title.into()),
            ..ClientLogo::default()
        };

        Self {
            title: "Our Clients".into(),
            subtitle: "Trusted by leading venues, bars and creative brands.".into(),
            items: vec![
                ClientLogo {
                    person_name: Some("Gregorio".into()),
                    story_url: Some("/case-studies/reginas".into()),
                    story_label: Some("Watch the story".into()),
                    ..client(
                        "Regina's Bar & Restaurant",
                        "/assets/clients/garden.png",
                        "Restaurant & Late-Night Bar, Birmingham",
                        "They keep the room perfectly tuned, from first drink to last call.",
                        "General Manager",
                    )
                },
                client(
                    "Luna Lounge",
                    "/assets/clients/luna.png",
                    "Cocktail bar & events venue",
                    "Smooth, brand-safe sets that still feel fresh every week.",
                    "Brand Director",
                ),
                client(
                    "Stardust",
                    "/assets/clients/stardust.png",
                    "Live events & private hire",
                    "Reliable rosters and zero drama with tech or timings.",
                    "Events Lead",
                ),
                client(
                    "Stellar",
                    "/assets/clients/stellar.png",
                    "Late-night venue",
                    "Guests notice the music, in a good way, not a loud way.",
                    "Venue Owner",
                ),
                client(
                    "Symphony Center",
                    "/assets/clients/symphony.png",
                    "Culture & programming",
                    "They understand our audience and programme to match.",
                    "Programming Manager",
                ),
            ],
        }
    }
}

fn client_logo(raw: &Value) -> Option<ClientLogo> {
    let name = text(raw, "name");
    let src = text(raw, "src");
    if name.is_empty() || src.is_empty() {
        return None;
    }
    Some(ClientLogo {
        name: name.into(),
        src: src.into(),
        href: optional(raw, "href"),
        blurb: optional(raw, "blurb"),
        quote: optional(raw, "quote"),
        person_name: optional(raw, "personName"),
        person_title: optional(raw, "personTitle"),
        story_url: optional(raw, "storyUrl"),
        story_label: optional(raw, "storyLabel"),
        back_bg: optional(raw, "backBg"),
    })
}

impl SettingsRow for ClientsSection {
    const KEY: &'static str = "home_clients";

    /// `lead` is accepted as the older name of `subtitle`.
    fn from_raw(raw: &Value) -> Self {
        let d = Self::default();
        let items = objects(raw, "items").filter_map(client_logo).take(MAX_CLIENTS).collect();
        let subtitle = match text(raw, "subtitle") {
            "" => text_or(raw, "lead", &d.subtitle),
            s => s.to_string(),
        };
        Self { title: text_or(raw, "title", &d.title), subtitle, items: or_default(items, d.items) }
    }
}
