//! Built-in configurations
//!
//! Served whenever a form has never been saved or the store cannot be read,
//! so the public site never shows an empty form.

use crate::config::{FormConfiguration, FormCopy, FormKey};
use crate::field::{FieldSchema, FieldType};

pub fn default_configuration(key: FormKey) -> FormConfiguration {
    FormConfiguration { copy: default_copy(key), recipient_email: None, fields: default_fields(key) }
}

pub fn default_fields(key: FormKey) -> Vec<FieldSchema> {
    use FieldType::*;

    let field = |name: &str, label: &str, field_type| FieldSchema::new(name, name, label, field_type);

    match key {
        FormKey::Enquire => vec![
            field("enq_type", "What is this about?", Radio)
                .required()
                .with_options(["Booking", "Partnership", "General"]),
            field("contact_name", "Your name", Text).required(),
            field("email", "Email address", Email).required(),
            field("phone", "Phone number", Tel),
            field("event_date", "Event date", Date),
            field("event_time", "Event time", Time),
            field("location", "Location", Text),
            field("message", "Details", Textarea).required(),
        ],
        FormKey::Join => vec![
            field("role", "Are you a musician or DJ?", Radio)
                .required()
                .with_options(["DJ", "Musician"]),
            field("instrument", "If musician, what do you play?", Text)
                .with_placeholder("e.g. Saxophone, keys, percussion…")
                .shown_if("role", "Musician"),
            field("full_name", "Full legal or birth name", Text).required(),
            field("email", "Email address", Email).required(),
            field("phone", "Mobile number", Tel).required(),
            field("dob", "Date of birth", Date).required(),
            field("address", "Full address", Textarea).required(),
            field("genres", "Favourite genres", Textarea),
        ],
        FormKey::Contact => vec![
            field("name", "Your name", Text).required(),
            field("email", "Email address", Email).required(),
            field("message", "Message", Textarea).required(),
        ],
    }
}

pub fn default_copy(key: FormKey) -> FormCopy {
    let copy = |eyebrow: &str, title: &str, lead: &str, button_label: &str| FormCopy {
        eyebrow: eyebrow.into(),
        title: title.into(),
        lead: lead.into(),
        button_label: button_label.into(),
        modal_kicker: String::new(),
        modal_title: String::new(),
        modal_lead: String::new(),
        submit_label: String::new(),
        success_message: String::new(),
        consult_call_label: None,
        consult_call_url: None,
        contact_email: None,
        contact_phone: None,
        social_links: Vec::new(),
    };

    match key {
        FormKey::Enquire => FormCopy {
            modal_kicker: "Enquire Now".into(),
            modal_title: "Tell us about your venue or event.".into(),
            modal_lead: "Share a few details about your space, schedule and music brief. We'll match you with the right artists.".into(),
            submit_label: "Send enquiry".into(),
            success_message: "Thanks, we'll be in touch shortly.".into(),
            consult_call_label: Some("Book consultant call".into()),
            consult_call_url: Some("https://calendar.app.google/hdvYediQuWn4wDQH6".into()),
            ..copy(
                "For venues & events",
                "Enquire about DJs and live music.",
                "We curate DJs and musicians for restaurants, bars and event spaces, matching artists to your brand, guest profile and schedule.",
                "Open enquiry form",
            )
        },
        FormKey::Join => FormCopy {
            modal_kicker: "Join Essentia".into(),
            modal_title: "Tell us about your sound.".into(),
            modal_lead: "Share links, socials and a short intro. We'll review and get back if there's a fit.".into(),
            submit_label: "Apply to join".into(),
            success_message: "Thanks, we'll review your submission and follow up.".into(),
            ..copy(
                "For artists & collectives",
                "Join the Essentia roster.",
                "DJs, musicians and live acts who care about atmosphere, consistency and good hospitality.",
                "Open application form",
            )
        },
        FormKey::Contact => FormCopy {
            modal_kicker: "Contact".into(),
            modal_title: "Send us a message.".into(),
            modal_lead: "We'll get back to you shortly.".into(),
            submit_label: "Send message".into(),
            success_message: "Thanks, we'll be in touch soon.".into(),
            contact_email: Some(String::new()),
            ..copy("LET'S CONNECT", "Get in touch", "General enquiries", "Open contact form")
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::validate_fields;
    use crate::normalize::normalize;

    #[test]
    fn test_defaults_pass_authoring_rules() {
        for key in FormKey::ALL {
            let fields = default_fields(key);
            assert!(!fields.is_empty());
            assert_eq!(validate_fields(&fields), Ok(vec![]), "{key}");
        }
    }

    #[test]
    fn test_defaults_are_normalized() {
        for key in FormKey::ALL {
            let fields = default_fields(key);
            let raw = serde_json::to_value(&fields).unwrap();
            assert_eq!(normalize(&raw, key.id_prefix()), fields, "{key}");
        }
    }

    #[test]
    fn test_join_default_has_conditional_instrument() {
        let fields = default_fields(FormKey::Join);
        let instrument = fields.iter().find(|f| f.name == "instrument").unwrap();
        let rule = instrument.show_if.as_ref().unwrap();
        assert_eq!((rule.field.as_str(), rule.equals.as_str()), ("role", "Musician"));
    }
}
