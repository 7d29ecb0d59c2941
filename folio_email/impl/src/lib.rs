use std::time::Duration;

use anyhow::anyhow;
use folio_email_contracts::{ContentType, Email, EmailService};
use folio_models::email_address::EmailAddressWithName;
use lettre::{
    message::{header, Mailbox},
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

#[derive(Debug, Clone)]
pub struct EmailServiceImpl {
    from: EmailAddressWithName,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailServiceImpl {
    /// Creates the SMTP transport. The connection itself is established
    /// lazily, use [`EmailService::ping`] to verify it.
    pub fn new(url: &str, from: EmailAddressWithName, timeout: Duration) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::from_url(url)?
            .timeout(Some(timeout))
            .build();

        Ok(Self { from, transport })
    }

    fn build_message(&self, email: Email) -> anyhow::Result<Message> {
        let mut builder = Message::builder()
            .from(self.from.0.clone())
            .to(email.recipient.0)
            .subject(email.subject)
            .header(match email.content_type {
                ContentType::Text => header::ContentType::TEXT_PLAIN,
                ContentType::Html => header::ContentType::TEXT_HTML,
            });

        if let Some(reply_to) = email.reply_to {
            builder = builder.reply_to(Mailbox::new(None, reply_to.0));
        }

        builder.body(email.body).map_err(Into::into)
    }
}

impl EmailService for EmailServiceImpl {
    #[tracing::instrument(level = "trace", skip_all, fields(recipient = %email.recipient))]
    async fn send(&self, email: Email) -> anyhow::Result<bool> {
        let message = self.build_message(email)?;

        self.transport
            .send(message)
            .await
            .map(|response| response.is_positive())
            .map_err(Into::into)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.transport
            .test_connection()
            .await?
            .then_some(())
            .ok_or_else(|| anyhow!("Failed to ping smtp server"))
    }
}
