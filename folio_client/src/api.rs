use std::{future::Future, sync::Arc};

use folio_models::contact::{ContactFieldErrors, ContactForm};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::http::HttpClient;

/// Network seam of the contact form client.
#[cfg_attr(test, mockall::automock)]
pub trait ContactApi: Send + Sync + 'static {
    /// Post the form to the contact endpoint.
    fn send(&self, form: ContactForm) -> impl Future<Output = Result<(), ContactApiError>> + Send;
}

#[derive(Debug, Error)]
pub enum ContactApiError {
    /// The server answered with a non-success status.
    #[error("The server rejected the message with status {status}")]
    Rejected { status: u16, message: Option<String> },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ContactApiError {
    /// The error message the server sent back, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => message.as_deref(),
            Self::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContactApiImpl {
    client: HttpClient,
    endpoint: Arc<Url>,
}

impl ContactApiImpl {
    /// `base_url` is the root of the portfolio site, the form is posted to
    /// `api/contact` relative to it.
    pub fn new(client: HttpClient, base_url: &Url) -> Result<Self, url::ParseError> {
        Ok(Self {
            client,
            endpoint: base_url.join("api/contact")?.into(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl ContactApi for ContactApiImpl {
    async fn send(&self, form: ContactForm) -> Result<(), ContactApiError> {
        let response = self
            .client
            .post((*self.endpoint).clone())
            .json(&form)
            .send()
            .await
            .map_err(anyhow::Error::from)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response
            .json::<ErrorResponse>()
            .await
            .ok()
            .and_then(ErrorResponse::into_message);

        Err(ContactApiError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Message(String),
    Fields(ContactFieldErrors),
}

impl ErrorResponse {
    fn into_message(self) -> Option<String> {
        let message = match self.error {
            ErrorDetail::Message(message) => message,
            ErrorDetail::Fields(errors) => errors.to_string(),
        };
        (!message.is_empty()).then_some(message)
    }
}
