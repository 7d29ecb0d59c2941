use std::net::IpAddr;

use folio_core_contact_contracts::{
    relay::{ContactRelayError, ContactRelayService},
    ContactDelivery, ContactFeatureError, ContactFeatureService,
};
use folio_models::contact::ContactForm;
use folio_shared_contracts::rate_limit::{RateLimitDecision, RateLimitService};
use tracing::debug;

pub mod relay;

#[derive(Debug, Clone)]
pub struct ContactFeatureServiceImpl<RateLimit, Relay> {
    rate_limit: RateLimit,
    relay: Relay,
}

impl<RateLimit, Relay> ContactFeatureServiceImpl<RateLimit, Relay> {
    pub fn new(rate_limit: RateLimit, relay: Relay) -> Self {
        Self { rate_limit, relay }
    }
}

impl<RateLimit, Relay> ContactFeatureService for ContactFeatureServiceImpl<RateLimit, Relay>
where
    RateLimit: RateLimitService,
    Relay: ContactRelayService,
{
    #[tracing::instrument(level = "trace", skip(self, form))]
    async fn send_message(
        &self,
        client: IpAddr,
        form: ContactForm,
    ) -> Result<ContactDelivery, ContactFeatureError> {
        if let RateLimitDecision::Limited { retry_after } = self.rate_limit.check(client).await {
            debug!(%client, ?retry_after, "contact submission rejected by rate limit");
            return Err(ContactFeatureError::RateLimited { retry_after });
        }

        let submission = form.validate().map_err(|errors| {
            debug!(%client, %errors, "contact submission failed validation");
            ContactFeatureError::Validation(errors)
        })?;

        self.relay
            .relay(submission)
            .await
            .map_err(|ContactRelayError { reason }| ContactFeatureError::Delivery(reason))
    }
}
