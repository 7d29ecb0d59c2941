use std::future::Future;

use folio_models::contact::ContactSubmission;
use thiserror::Error;

/// Forwards validated contact submissions to the site owner.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactRelayService: Send + Sync + 'static {
    /// Never fails with anything but a [`ContactRelayError`]; transport and
    /// rendering errors are converted at this boundary.
    fn relay(
        &self,
        submission: ContactSubmission,
    ) -> impl Future<Output = Result<ContactDelivery, ContactRelayError>> + Send;
}

/// How a successfully handled submission reached the site owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactDelivery {
    /// Sent as an email.
    Relayed,
    /// Email delivery is not configured, the submission was only logged.
    LoggedOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct ContactRelayError {
    pub reason: String,
}

impl ContactRelayError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[cfg(feature = "mock")]
impl MockContactRelayService {
    pub fn with_relay(
        mut self,
        submission: ContactSubmission,
        result: Result<ContactDelivery, ContactRelayError>,
    ) -> Self {
        self.expect_relay()
            .once()
            .with(mockall::predicate::eq(submission))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}
