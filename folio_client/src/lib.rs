//! Client side of the contact form.
//!
//! [`ContactFormClient`] checks a [`ContactForm`] against the shared rule set,
//! posts it to the portfolio server and turns the outcome into a
//! [`Notification`] for the visitor. While a request is in flight the client
//! is [`SubmitState::Pending`] and further submissions are refused.

use folio_models::contact::{ContactFieldErrors, ContactForm};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::api::ContactApi;

pub mod api;
pub mod http;

pub const SUCCESS_TITLE: &str = "Message sent!";
pub const SUCCESS_DESCRIPTION: &str = "Thanks for reaching out. I'll get back to you soon.";
pub const ERROR_TITLE: &str = "Failed to send message";
pub const ERROR_FALLBACK_DESCRIPTION: &str = "Please try again later.";

#[derive(Debug)]
pub struct ContactFormClient<Api> {
    api: Api,
    state: watch::Sender<SubmitState>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitState {
    #[default]
    Idle,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("The contact form is invalid: {0}")]
    Invalid(ContactFieldErrors),
    #[error("A submission is already in progress.")]
    Busy,
}

impl<Api: ContactApi> ContactFormClient<Api> {
    pub fn new(api: Api) -> Self {
        Self {
            api,
            state: watch::Sender::new(SubmitState::Idle),
        }
    }

    pub fn state(&self) -> SubmitState {
        *self.state.borrow()
    }

    /// Watch state transitions, e.g. to disable a submit button.
    pub fn subscribe(&self) -> watch::Receiver<SubmitState> {
        self.state.subscribe()
    }

    /// Validate and send `form`.
    ///
    /// Invalid forms are never sent. After a successful submission the form
    /// is cleared, otherwise it is left as it was so the visitor can retry.
    pub async fn submit(&self, form: &mut ContactForm) -> Result<Notification, SubmitError> {
        let submission = form.validate().map_err(SubmitError::Invalid)?;

        let started = self.state.send_if_modified(|state| match state {
            SubmitState::Idle => {
                *state = SubmitState::Pending;
                true
            }
            SubmitState::Pending => false,
        });
        if !started {
            return Err(SubmitError::Busy);
        }
        let _idle = IdleOnDrop(&self.state);

        match self.api.send(ContactForm::from(&submission)).await {
            Ok(()) => {
                info!(email = %submission.email, "contact form submitted");
                *form = ContactForm::default();
                Ok(Notification::success())
            }
            Err(err) => {
                warn!("Failed to submit contact form: {err:#}");
                Ok(Notification::error(err.server_message()))
            }
        }
    }
}

/// Resets the state when a submission ends, including when its future is
/// dropped before completion.
struct IdleOnDrop<'a>(&'a watch::Sender<SubmitState>);

impl Drop for IdleOnDrop<'_> {
    fn drop(&mut self) {
        self.0.send_replace(SubmitState::Idle);
    }
}

impl Notification {
    pub fn success() -> Self {
        Self {
            kind: NotificationKind::Success,
            title: SUCCESS_TITLE.into(),
            description: SUCCESS_DESCRIPTION.into(),
        }
    }

    /// Error notification showing `message` or a generic hint when the server
    /// did not provide one.
    pub fn error(message: Option<&str>) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: ERROR_TITLE.into(),
            description: message.unwrap_or(ERROR_FALLBACK_DESCRIPTION).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use folio_demo::contact::{FOO, FOO_SUBMISSION, INVALID, MINIMAL, MINIMAL_SUBMISSION};
    use pretty_assertions::assert_eq;
    use tokio::sync::oneshot;

    use super::*;
    use crate::api::{ContactApiError, MockContactApi};

    impl MockContactApi {
        fn with_send(mut self, form: ContactForm, result: Result<(), ContactApiError>) -> Self {
            self.expect_send()
                .once()
                .with(mockall::predicate::eq(form))
                .return_once(move |_| Box::pin(std::future::ready(result)));
            self
        }
    }

    #[tokio::test]
    async fn ok() {
        // Arrange
        let api = MockContactApi::new().with_send(ContactForm::from(&*FOO_SUBMISSION), Ok(()));
        let sut = ContactFormClient::new(api);
        let mut form = FOO.clone();

        // Act
        let result = sut.submit(&mut form).await;

        // Assert
        assert_eq!(result, Ok(Notification::success()));
        assert_eq!(form, ContactForm::default());
        assert_eq!(sut.state(), SubmitState::Idle);
    }

    #[tokio::test]
    async fn sends_normalized_form() {
        // Arrange
        let api = MockContactApi::new().with_send(
            ContactForm {
                name: "Al".into(),
                email: "a@b.com".into(),
                phone: None,
                message: "Hello there, checking in".into(),
            },
            Ok(()),
        );
        let sut = ContactFormClient::new(api);
        let mut form = ContactForm {
            name: "  Al ".into(),
            email: " a@b.com".into(),
            phone: Some("   ".into()),
            message: "Hello there, checking in\n".into(),
        };

        // Act
        let result = sut.submit(&mut form).await;

        // Assert
        assert_eq!(result, Ok(Notification::success()));
    }

    #[tokio::test]
    async fn invalid() {
        // Arrange
        let sut = ContactFormClient::new(MockContactApi::new());
        let mut form = INVALID.clone();

        // Act
        let result = sut.submit(&mut form).await;

        // Assert
        assert_eq!(
            result,
            Err(SubmitError::Invalid(INVALID.validate().unwrap_err()))
        );
        assert_eq!(form, *INVALID);
        assert_eq!(sut.state(), SubmitState::Idle);
    }

    #[tokio::test]
    async fn short_name_never_sent() {
        // Arrange
        let sut = ContactFormClient::new(MockContactApi::new());
        let mut form = ContactForm {
            name: "A".into(),
            ..MINIMAL.clone()
        };

        // Act
        let result = sut.submit(&mut form).await;

        // Assert
        let Err(SubmitError::Invalid(errors)) = result else {
            panic!("expected invalid form, got {result:?}");
        };
        assert_eq!(
            errors.get(folio_models::contact::ContactField::Name),
            Some("Name must be at least 2 characters")
        );
        assert_eq!(errors.len(), 1);
    }

    #[tokio::test]
    async fn rejected_with_message() {
        // Arrange
        let api = MockContactApi::new().with_send(
            ContactForm::from(&*MINIMAL_SUBMISSION),
            Err(ContactApiError::Rejected {
                status: 429,
                message: Some("Too many requests. Please try again in 60 minutes.".into()),
            }),
        );
        let sut = ContactFormClient::new(api);
        let mut form = MINIMAL.clone();

        // Act
        let result = sut.submit(&mut form).await;

        // Assert
        assert_eq!(
            result,
            Ok(Notification {
                kind: NotificationKind::Error,
                title: "Failed to send message".into(),
                description: "Too many requests. Please try again in 60 minutes.".into(),
            })
        );
        assert_eq!(form, *MINIMAL);
        assert_eq!(sut.state(), SubmitState::Idle);
    }

    #[tokio::test]
    async fn network_error() {
        // Arrange
        let api = MockContactApi::new().with_send(
            ContactForm::from(&*MINIMAL_SUBMISSION),
            Err(anyhow::anyhow!("connection refused").into()),
        );
        let sut = ContactFormClient::new(api);
        let mut form = MINIMAL.clone();

        // Act
        let result = sut.submit(&mut form).await;

        // Assert
        assert_eq!(
            result,
            Ok(Notification {
                kind: NotificationKind::Error,
                title: "Failed to send message".into(),
                description: "Please try again later.".into(),
            })
        );
        assert_eq!(form, *MINIMAL);
    }

    #[tokio::test]
    async fn busy_while_pending() {
        // Arrange
        let (release, released) = oneshot::channel::<()>();
        let mut api = MockContactApi::new();
        api.expect_send().once().return_once(move |_| {
            Box::pin(async move {
                let _ = released.await;
                Ok(())
            })
        });
        let sut = ContactFormClient::new(api);
        let mut first = MINIMAL.clone();
        let mut second = FOO.clone();
        let mut state = sut.subscribe();

        // Act
        let (first_result, second_result) = tokio::join!(sut.submit(&mut first), async {
            state
                .wait_for(|state| *state == SubmitState::Pending)
                .await
                .unwrap();
            let result = sut.submit(&mut second).await;
            release.send(()).unwrap();
            result
        });

        // Assert
        assert_eq!(first_result, Ok(Notification::success()));
        assert_eq!(second_result, Err(SubmitError::Busy));
        assert_eq!(second, *FOO);
        assert_eq!(sut.state(), SubmitState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn idle_after_cancel() {
        // Arrange
        let mut api = MockContactApi::new();
        api.expect_send()
            .once()
            .return_once(|_| Box::pin(std::future::pending()));
        let sut = ContactFormClient::new(api);
        let mut form = MINIMAL.clone();

        // Act
        let result = tokio::time::timeout(Duration::from_secs(30), sut.submit(&mut form)).await;

        // Assert
        assert!(result.is_err());
        assert_eq!(sut.state(), SubmitState::Idle);
        assert_eq!(form, *MINIMAL);
    }
}
