//! Essentia Form Engine
//!
//! Schema-driven lead forms for the Essentia booking site (enquire, join,
//! contact) and the admin builder that edits them.
//!
//! ## Features
//! - Closed field type set with type-specific constraints
//! - Lenient normalizer for persisted or submitted JSON
//! - One-hop conditional visibility (`showIf`)
//! - Batch authoring-time validation for the admin builder
//! - Per-form configuration store with built-in defaults
//! - Headless renderer model for the public modals
//! - Home page section rows (hero, about, services, clients)
//!
//! ## Flow
//!
//! ```text
//! FormBuilder ──validate──▶ FormConfigStore::put
//!                               │
//! FormSession ◀──normalize── FormConfigStore::get
//!      │
//!      └─ visible values only ──▶ Mailer (external)
//! ```

pub mod builder;
pub mod config;
pub mod defaults;
pub mod field;
pub mod home;
pub mod normalize;
pub mod render;
pub mod settings;
pub mod store;
pub mod submission;
pub mod visibility;

pub use builder::{validate_fields, validate_raw_fields, FormBuilder, ValidationReport, Violation, ViolationKind, Warning};
pub use config::{FormConfiguration, FormCopy, FormKey, SocialLink};
pub use field::{is_valid_field_name, FieldSchema, FieldType, ShowIf};
pub use normalize::{normalize, normalize_slice};
pub use render::{Control, FormSession, RenderedField};
pub use home::{AboutSection, ClientsSection, HeroSection, ServicesSection};
pub use settings::{CtaType, FaqConfig, FaqItem, SettingsRow, SiteSettings};
pub use store::{FormConfigStore, InMemoryBackend, JsonFileBackend, SettingsBackend, StoreError};
pub use submission::{filter_visible, missing_required, Submission};
pub use visibility::{is_visible, visible_fields, Condition, SubmissionValue, SubmissionValues};

use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum FormsError {
    #[error("Unknown form: {0}")]
    UnknownForm(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationReport),

    #[error("Missing required fields: {}", .0.join(", "))]
    MissingRequired(Vec<String>),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, FormsError>;
