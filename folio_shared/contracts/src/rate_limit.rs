use std::{future::Future, net::IpAddr, time::Duration};

/// Per-address admission control using fixed time windows.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait RateLimitService: Send + Sync + 'static {
    /// Counts one attempt from `key` and decides whether it is admitted.
    ///
    /// The first attempt of a window is always admitted and consumes one
    /// slot. Checking and counting happen atomically per key.
    fn check(&self, key: IpAddr) -> impl Future<Output = RateLimitDecision> + Send;

    /// Removes all records whose window has already passed and returns how
    /// many were removed.
    fn sweep(&self) -> impl Future<Output = usize> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    /// `retry_after` is a whole number of seconds and never zero.
    Limited { retry_after: Duration },
}

impl RateLimitDecision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }
}

#[cfg(feature = "mock")]
impl MockRateLimitService {
    pub fn with_check(mut self, key: IpAddr, result: RateLimitDecision) -> Self {
        self.expect_check()
            .once()
            .with(mockall::predicate::eq(key))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}
