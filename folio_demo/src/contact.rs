use std::sync::LazyLock;

use folio_models::{
    contact::{ContactForm, ContactSubmission},
    email_address::EmailAddressWithName,
};

pub static FOO: LazyLock<ContactForm> = LazyLock::new(|| ContactForm {
    name: "Max Mustermann".into(),
    email: "max.mustermann@example.de".into(),
    phone: Some("+49 123 456789".into()),
    message: "Hello World!\nI would like to talk about a project.".into(),
});

pub static FOO_SUBMISSION: LazyLock<ContactSubmission> =
    LazyLock::new(|| FOO.validate().unwrap());

/// Shortest form that passes validation, phone omitted.
pub static MINIMAL: LazyLock<ContactForm> = LazyLock::new(|| ContactForm {
    name: "Al".into(),
    email: "a@b.com".into(),
    phone: None,
    message: "Hello there, checking in".into(),
});

pub static MINIMAL_SUBMISSION: LazyLock<ContactSubmission> =
    LazyLock::new(|| MINIMAL.validate().unwrap());

/// Fails all three checked fields.
pub static INVALID: LazyLock<ContactForm> = LazyLock::new(|| ContactForm {
    name: "X".into(),
    email: "bad".into(),
    phone: None,
    message: "short".into(),
});

pub static RECIPIENT: LazyLock<EmailAddressWithName> =
    LazyLock::new(|| "Portfolio Owner <contact@example.com>".parse().unwrap());
