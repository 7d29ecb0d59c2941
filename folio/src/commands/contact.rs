use anyhow::bail;
use clap::Subcommand;
use folio_client::{
    api::ContactApiImpl, http::HttpClient, ContactFormClient, NotificationKind, SubmitError,
};
use folio_models::contact::ContactForm;
use url::Url;

#[derive(Debug, Subcommand)]
pub enum ContactCommand {
    /// Submit the contact form of a running portfolio server
    Send {
        /// Base URL of the portfolio server
        #[arg(long, default_value = "http://127.0.0.1:8000/")]
        url: Url,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        message: String,
        /// Give up if the server does not respond in time
        #[arg(long, default_value = "10s")]
        timeout: folio_config::Duration,
    },
}

impl ContactCommand {
    pub async fn invoke(self) -> anyhow::Result<()> {
        match self {
            ContactCommand::Send {
                url,
                name,
                email,
                phone,
                message,
                timeout,
            } => {
                let form = ContactForm {
                    name,
                    email,
                    phone,
                    message,
                };
                send(url, form, timeout).await
            }
        }
    }
}

async fn send(
    url: Url,
    mut form: ContactForm,
    timeout: folio_config::Duration,
) -> anyhow::Result<()> {
    let api = ContactApiImpl::new(HttpClient::new(timeout.into())?, &url)?;
    let client = ContactFormClient::new(api);

    match client.submit(&mut form).await {
        Ok(notification) => {
            println!("{}\n{}", notification.title, notification.description);
            if notification.kind == NotificationKind::Error {
                bail!("{}", notification.title);
            }
            Ok(())
        }
        Err(SubmitError::Invalid(errors)) => {
            for (field, message) in errors.iter() {
                eprintln!("{field}: {message}");
            }
            bail!("Invalid contact form")
        }
        Err(err) => Err(err.into()),
    }
}
