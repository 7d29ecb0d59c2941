use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
};

use axum::{
    extract::{ConnectInfo, Request},
    middleware::{from_fn, Next},
    Router,
};
use tracing::{debug, error, warn};

use crate::RestServerRealIpConfig;

pub fn add<S: Clone + Send + Sync + 'static>(
    real_ip_config: Option<Arc<RestServerRealIpConfig>>,
) -> impl FnOnce(Router<S>) -> Router<S> {
    |router| {
        router.layer(from_fn(move |mut request: Request, next: Next| {
            let client_ip = ClientIp::from_request(&request, real_ip_config.as_deref());
            request.extensions_mut().insert(client_ip);
            next.run(request)
        }))
    }
}

/// Address of the client a request is attributed to (e.g. for rate limiting).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientIp(pub IpAddr);

impl ClientIp {
    fn from_request(request: &Request, real_ip_config: Option<&RestServerRealIpConfig>) -> Self {
        let Some(peer_ip) = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
        else {
            warn!("connection info is missing, client address is unknown");
            return Self(Ipv4Addr::UNSPECIFIED.into());
        };

        let Some(RestServerRealIpConfig { header, set_from }) = real_ip_config else {
            return Self(peer_ip);
        };

        let header_value = request.headers().get(header.as_str());

        if set_from.is_some_and(|set_from| set_from != peer_ip) {
            if let Some(header_value) = header_value {
                debug!(%peer_ip, ?header_value, "ignoring real ip header value from untrusted source");
            }
            return Self(peer_ip);
        }

        let Some(header_value) = header_value else {
            if set_from.is_some() {
                warn!(%peer_ip, "real ip header not found");
            }
            return Self(peer_ip);
        };

        // X-Forwarded-For style lists start with the original client
        let Some(real_ip) = header_value
            .to_str()
            .ok()
            .and_then(|value| value.split(',').next())
            .and_then(|value| value.trim().parse().ok())
        else {
            error!(%peer_ip, ?header_value, "failed to parse real ip header value");
            return Self(peer_ip);
        };

        Self(real_ip)
    }
}
