use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use axum::Router;
use folio_core_contact_contracts::ContactFeatureService;
use tokio::net::TcpListener;
use tracing::{error, info};

mod errors;
mod middlewares;
mod models;
mod routes;

#[derive(Debug, Clone)]
pub struct RestServer<Contact> {
    config: RestServerConfig,
    contact: Contact,
}

#[derive(Debug, Clone, Default)]
pub struct RestServerConfig {
    pub real_ip: Option<Arc<RestServerRealIpConfig>>,
}

/// Where to find the client address when running behind a reverse proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestServerRealIpConfig {
    /// Header set by the proxy, e.g. `X-Forwarded-For`.
    pub header: String,
    /// Only trust the header on connections from this address.
    pub set_from: Option<IpAddr>,
}

impl<Contact> RestServer<Contact>
where
    Contact: ContactFeatureService,
{
    pub fn new(config: RestServerConfig, contact: Contact) -> Self {
        Self { config, contact }
    }

    /// Serve the API until the process receives Ctrl+C.
    pub async fn serve(self, host: IpAddr, port: u16) -> anyhow::Result<()> {
        let router = self.router();
        let listener = TcpListener::bind((host, port)).await?;
        info!("Starting REST API server on {}", listener.local_addr()?);

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(Into::into)
    }

    fn router(self) -> Router<()> {
        let router = Router::new().merge(routes::contact::router(self.contact.into()));

        // layers added last run first
        let router = middlewares::panic_handler::add(router);
        let router = middlewares::trace::add(router);
        let router = middlewares::client_ip::add(self.config.real_ip)(router);
        middlewares::request_id::add(router)
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(err) => {
            error!("Failed to listen for Ctrl+C: {err}");
            std::future::pending::<()>().await;
        }
    }
}
