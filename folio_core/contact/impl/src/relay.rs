use std::{sync::Arc, time::Duration};

use folio_core_contact_contracts::relay::{
    ContactDelivery, ContactRelayError, ContactRelayService,
};
use folio_email_contracts::{ContentType, Email, EmailService};
use folio_models::{contact::ContactSubmission, email_address::EmailAddressWithName};
use folio_templates_contracts::{ContactMessageTemplate, TemplateService};
use tracing::{error, info, warn};

/// Target of the log records carrying a visitor's submission. These contain
/// personal data and must not be forwarded to error reporting.
pub const SUBMISSION_LOG_TARGET: &str = "folio::contact_submission";

/// Sends contact submissions to the site owner by email.
///
/// Without an email service every submission is written to the log and
/// reported as [`ContactDelivery::LoggedOnly`].
#[derive(Debug, Clone)]
pub struct ContactRelayServiceImpl<Mail, Template> {
    email: Option<Mail>,
    template: Template,
    config: ContactRelayServiceConfig,
}

#[derive(Debug, Clone)]
pub struct ContactRelayServiceConfig {
    pub recipient: Arc<EmailAddressWithName>,
    pub timeout: Duration,
}

impl<Mail, Template> ContactRelayServiceImpl<Mail, Template> {
    pub fn new(
        email: Option<Mail>,
        template: Template,
        config: ContactRelayServiceConfig,
    ) -> Self {
        Self {
            email,
            template,
            config,
        }
    }
}

impl<Mail, Template> ContactRelayService for ContactRelayServiceImpl<Mail, Template>
where
    Mail: EmailService,
    Template: TemplateService,
{
    async fn relay(
        &self,
        submission: ContactSubmission,
    ) -> Result<ContactDelivery, ContactRelayError> {
        let Some(email_service) = &self.email else {
            warn!("email delivery is not configured, contact submission was only logged");
            info!(
                target: SUBMISSION_LOG_TARGET,
                name = %submission.name,
                email = %submission.email,
                phone = submission.phone.as_deref().unwrap_or_default(),
                message = %submission.message,
                "contact submission"
            );
            return Ok(ContactDelivery::LoggedOnly);
        };

        let body = self
            .template
            .render(&ContactMessageTemplate::from(&submission))
            .map_err(|err| {
                error!("Failed to render contact email: {err:#}");
                ContactRelayError::new("Failed to send email")
            })?;

        let email = Email {
            recipient: (*self.config.recipient).clone(),
            subject: format!("Portfolio Contact from {}", submission.name),
            body,
            content_type: ContentType::Html,
            reply_to: Some(submission.email.clone()),
        };

        match tokio::time::timeout(self.config.timeout, email_service.send(email)).await {
            Ok(Ok(true)) => {
                info!(sender = %submission.email, "contact submission relayed");
                Ok(ContactDelivery::Relayed)
            }
            Ok(Ok(false)) => {
                error!(sender = %submission.email, "mail server rejected contact email");
                Err(ContactRelayError::new("The mail server rejected the message"))
            }
            Ok(Err(err)) => {
                error!(sender = %submission.email, "Failed to send contact email: {err:#}");
                Err(ContactRelayError::new(err.to_string()))
            }
            Err(_) => {
                error!(
                    sender = %submission.email,
                    timeout = ?self.config.timeout,
                    "sending contact email timed out"
                );
                Err(ContactRelayError::new("Sending the message timed out"))
            }
        }
    }
}
