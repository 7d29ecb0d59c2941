use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A syntactically valid email address without a display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress(pub lettre::Address);

/// A mailbox, i.e. an email address with an optional display name
/// (`Jane Doe <jane@example.com>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddressWithName(pub lettre::message::Mailbox);

impl EmailAddress {
    pub fn as_str(&self) -> &str {
        self.0.as_ref()
    }
}

impl EmailAddressWithName {
    pub fn into_email_address(self) -> EmailAddress {
        EmailAddress(self.0.email)
    }
}

impl FromStr for EmailAddress {
    type Err = <lettre::Address as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl FromStr for EmailAddressWithName {
    type Err = <lettre::message::Mailbox as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for EmailAddressWithName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_address() {
        for (input, valid) in [
            ("a@b.com", true),
            ("max.mustermann@example.de", true),
            ("bad", false),
            ("@example.com", false),
            ("max@", false),
            ("max mustermann@example.com", false),
        ] {
            assert_eq!(input.parse::<EmailAddress>().is_ok(), valid, "{input}");
        }
    }

    #[test]
    fn parse_mailbox() {
        let mailbox = "Portfolio <noreply@example.com>"
            .parse::<EmailAddressWithName>()
            .unwrap();
        assert_eq!(mailbox.0.name.as_deref(), Some("Portfolio"));
        assert_eq!(
            mailbox.into_email_address().as_str(),
            "noreply@example.com"
        );
    }
}
