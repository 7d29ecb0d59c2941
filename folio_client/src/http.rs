use std::{ops::Deref, sync::LazyLock, time::Duration};

pub static USER_AGENT: LazyLock<String> = LazyLock::new(|| {
    let homepage = env!("CARGO_PKG_HOMEPAGE");
    let repository = env!("CARGO_PKG_REPOSITORY");
    let version = env!("CARGO_PKG_VERSION");

    format!("Folio Contact Client ({homepage}, {repository}, Version {version})")
});

#[derive(Debug, Clone)]
pub struct HttpClient(reqwest::Client);

impl HttpClient {
    /// Every request made through this client fails once `timeout` has
    /// passed.
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        reqwest::Client::builder()
            .user_agent(&*USER_AGENT)
            .timeout(timeout)
            .build()
            .map(Self)
            .map_err(Into::into)
    }
}

impl Deref for HttpClient {
    type Target = reqwest::Client;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
