//! The contact form and the rules it is checked against.
//!
//! The same rule set is enforced by the submission client before a request is
//! sent and again by the server before anything is relayed.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::{email_address::EmailAddress, macros::nutype_string};

nutype_string!(ContactName(
    sanitize(trim),
    validate(len_char_min = 2),
));

nutype_string!(ContactMessage(
    sanitize(trim),
    validate(len_char_min = 10),
));

/// Raw, untrusted contact form fields as entered by a visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub message: String,
}

/// A contact form that passed validation. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: ContactName,
    pub email: EmailAddress,
    pub phone: Option<String>,
    pub message: ContactMessage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactField {
    Name,
    Email,
    Phone,
    Message,
}

/// A single validation rule: the field it belongs to, the check and the
/// message shown when the check fails.
#[derive(Debug, Clone, Copy)]
pub struct ContactRule {
    pub field: ContactField,
    pub message: &'static str,
    predicate: fn(&ContactForm) -> bool,
}

impl ContactRule {
    pub fn check(&self, form: &ContactForm) -> bool {
        (self.predicate)(form)
    }
}

pub static CONTACT_RULES: &[ContactRule] = &[
    ContactRule {
        field: ContactField::Name,
        message: "Name must be at least 2 characters",
        predicate: is_valid_name,
    },
    ContactRule {
        field: ContactField::Email,
        message: "Please enter a valid email",
        predicate: is_valid_email,
    },
    ContactRule {
        field: ContactField::Message,
        message: "Message must be at least 10 characters",
        predicate: is_valid_message,
    },
];

fn is_valid_name(form: &ContactForm) -> bool {
    ContactName::try_new(form.name.clone()).is_ok()
}

fn is_valid_email(form: &ContactForm) -> bool {
    form.email.trim().parse::<EmailAddress>().is_ok()
}

fn is_valid_message(form: &ContactForm) -> bool {
    ContactMessage::try_new(form.message.clone()).is_ok()
}

/// Human readable validation errors keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactFieldErrors(BTreeMap<ContactField, String>);

impl ContactForm {
    /// Checks every rule (without stopping at the first failure) and returns
    /// the normalized submission or all field errors.
    pub fn validate(&self) -> Result<ContactSubmission, ContactFieldErrors> {
        let errors = CONTACT_RULES
            .iter()
            .filter(|rule| !rule.check(self))
            .map(|rule| (rule.field, rule.message.to_owned()))
            .collect::<ContactFieldErrors>();

        let (Ok(name), Ok(email), Ok(message), true) = (
            ContactName::try_new(self.name.clone()),
            self.email.trim().parse::<EmailAddress>(),
            ContactMessage::try_new(self.message.clone()),
            errors.is_empty(),
        ) else {
            return Err(errors);
        };

        let phone = self
            .phone
            .as_deref()
            .map(str::trim)
            .filter(|phone| !phone.is_empty())
            .map(ToOwned::to_owned);

        Ok(ContactSubmission {
            name,
            email,
            phone,
            message,
        })
    }
}

impl From<&ContactSubmission> for ContactForm {
    fn from(value: &ContactSubmission) -> Self {
        Self {
            name: value.name.to_string(),
            email: value.email.to_string(),
            phone: value.phone.clone(),
            message: value.message.to_string(),
        }
    }
}

impl ContactFieldErrors {
    pub fn get(&self, field: ContactField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ContactField, &str)> {
        self.0.iter().map(|(&field, message)| (field, message.as_str()))
    }
}

impl FromIterator<(ContactField, String)> for ContactFieldErrors {
    fn from_iter<T: IntoIterator<Item = (ContactField, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for ContactFieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (_, message)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(". ")?;
            }
            f.write_str(message)?;
        }
        Ok(())
    }
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Message => "message",
        })
    }
}
