use anyhow::Context;
use folio_config::EmailConfig;
use folio_email_impl::EmailServiceImpl;

/// Set up the SMTP transport, `None` if no SMTP server is configured.
pub fn connect(config: &EmailConfig) -> anyhow::Result<Option<EmailServiceImpl>> {
    config
        .smtp_url
        .as_deref()
        .map(|smtp_url| {
            EmailServiceImpl::new(smtp_url, config.from.clone(), config.timeout.into())
                .context("Failed to connect to SMTP server")
        })
        .transpose()
}
