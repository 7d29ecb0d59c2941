use std::sync::Arc;

use folio_api_rest::{RestServerConfig, RestServerRealIpConfig};
use folio_config::Config;
use folio_core_contact_impl::{relay::ContactRelayServiceConfig, ContactFeatureServiceImpl};
use folio_shared_impl::{rate_limit::RateLimitServiceConfig, time::TimeServiceImpl};
use folio_templates_impl::TemplateServiceImpl;
use types::{ContactRelay, Email, RateLimit, RestServer};

pub mod types;

pub fn rest_server_config(config: &Config) -> RestServerConfig {
    RestServerConfig {
        real_ip: config.http.real_ip.as_ref().map(|real_ip_config| {
            Arc::new(RestServerRealIpConfig {
                header: real_ip_config.header.clone(),
                set_from: real_ip_config.set_from,
            })
        }),
    }
}

pub fn rate_limit(config: &Config) -> RateLimit {
    RateLimit::new(
        TimeServiceImpl,
        RateLimitServiceConfig {
            window: config.rate_limit.window.into(),
            max_requests: config.rate_limit.max_requests,
        },
    )
}

/// Wire up the REST server. Without `email` contact messages are only logged.
pub fn rest_server(
    config: &Config,
    rate_limit: RateLimit,
    email: Option<Email>,
) -> anyhow::Result<RestServer> {
    let relay = ContactRelay::new(
        email,
        TemplateServiceImpl::new()?,
        ContactRelayServiceConfig {
            recipient: config.contact.email.clone().into(),
            timeout: config.email.timeout.into(),
        },
    );
    let contact = ContactFeatureServiceImpl::new(rate_limit, relay);

    Ok(RestServer::new(rest_server_config(config), contact))
}
