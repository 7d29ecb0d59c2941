use std::{future::Future, net::IpAddr, time::Duration};

use folio_models::contact::{ContactFieldErrors, ContactForm};
use thiserror::Error;

pub mod relay;

pub use relay::ContactDelivery;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactFeatureService: Send + Sync + 'static {
    /// Handles a contact form submitted from `client`.
    ///
    /// The attempt is counted against the client's rate limit before the form
    /// is validated, so invalid submissions consume a slot as well.
    fn send_message(
        &self,
        client: IpAddr,
        form: ContactForm,
    ) -> impl Future<Output = Result<ContactDelivery, ContactFeatureError>> + Send;
}

#[derive(Debug, Error)]
pub enum ContactFeatureError {
    #[error("Too many requests, retry after {retry_after:?}.")]
    RateLimited { retry_after: Duration },
    #[error("Invalid contact form: {0}")]
    Validation(ContactFieldErrors),
    #[error("Failed to deliver message: {0}")]
    Delivery(String),
}

#[cfg(feature = "mock")]
impl MockContactFeatureService {
    pub fn with_send_message(
        mut self,
        client: IpAddr,
        form: ContactForm,
        result: Result<ContactDelivery, ContactFeatureError>,
    ) -> Self {
        self.expect_send_message()
            .once()
            .with(
                mockall::predicate::eq(client),
                mockall::predicate::eq(form),
            )
            .return_once(move |_, _| Box::pin(std::future::ready(result)));
        self
    }
}
