use std::{collections::HashMap, net::IpAddr, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use folio_shared_contracts::{
    rate_limit::{RateLimitDecision, RateLimitService},
    time::TimeService,
};
use tokio::sync::Mutex;
use tracing::trace;

/// In-memory fixed window rate limiter.
///
/// State lives in process memory only, so a restart forgets every record.
/// Records of addresses that never come back are kept until [`sweep`] runs.
///
/// [`sweep`]: RateLimitService::sweep
#[derive(Debug, Clone)]
pub struct RateLimitServiceImpl<Time> {
    time: Time,
    config: RateLimitServiceConfig,
    state: Arc<Mutex<HashMap<IpAddr, RateLimitRecord>>>,
}

#[derive(Debug, Clone, Copy)]
pub struct RateLimitServiceConfig {
    pub window: Duration,
    pub max_requests: u32,
}

impl Default for RateLimitServiceConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(3600),
            max_requests: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RateLimitRecord {
    count: u32,
    window_reset_at: DateTime<Utc>,
}

impl<Time> RateLimitServiceImpl<Time> {
    pub fn new(time: Time, config: RateLimitServiceConfig) -> Self {
        Self {
            time,
            config,
            state: Default::default(),
        }
    }

    /// Number of addresses currently tracked, including expired ones that
    /// have not been swept yet.
    pub async fn len(&self) -> usize {
        self.state.lock().await.len()
    }
}

impl<Time> RateLimitService for RateLimitServiceImpl<Time>
where
    Time: TimeService,
{
    #[tracing::instrument(level = "trace", skip(self))]
    async fn check(&self, key: IpAddr) -> RateLimitDecision {
        let now = self.time.now();
        let mut records = self.state.lock().await;

        match records.get_mut(&key) {
            Some(record) if now <= record.window_reset_at => {
                if record.count < self.config.max_requests {
                    record.count += 1;
                    trace!(count = record.count, "admitted");
                    RateLimitDecision::Allowed
                } else {
                    RateLimitDecision::Limited {
                        retry_after: retry_after(record.window_reset_at, now),
                    }
                }
            }
            _ => {
                records.insert(
                    key,
                    RateLimitRecord {
                        count: 1,
                        window_reset_at: now + self.config.window,
                    },
                );
                trace!("admitted, new window");
                RateLimitDecision::Allowed
            }
        }
    }

    #[tracing::instrument(level = "trace", skip(self))]
    async fn sweep(&self) -> usize {
        let now = self.time.now();
        let mut records = self.state.lock().await;
        let before = records.len();
        records.retain(|_, record| now <= record.window_reset_at);
        before - records.len()
    }
}

/// Time until `reset_at`, rounded up to whole seconds (at least one).
fn retry_after(reset_at: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    let millis = (reset_at - now).num_milliseconds().max(0).unsigned_abs();
    Duration::from_secs(millis.div_ceil(1000).max(1))
}

#[cfg(test)]
mod tests {
    use std::{net::Ipv4Addr, sync::Mutex as StdMutex};

    use chrono::TimeZone;
    use folio_shared_contracts::time::MockTimeService;

    use super::*;

    const ADDR: IpAddr = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7));
    const OTHER_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::new(198, 51, 100, 1));

    #[derive(Debug, Clone)]
    struct Clock(Arc<StdMutex<DateTime<Utc>>>);

    impl Clock {
        fn new() -> Self {
            Self(Arc::new(StdMutex::new(
                Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            )))
        }

        fn advance(&self, duration: Duration) {
            *self.0.lock().unwrap() += duration;
        }
    }

    impl TimeService for Clock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    fn make_sut() -> (RateLimitServiceImpl<Clock>, Clock) {
        let clock = Clock::new();
        let sut = RateLimitServiceImpl::new(clock.clone(), RateLimitServiceConfig::default());
        (sut, clock)
    }

    #[tokio::test]
    async fn first_call_is_allowed() {
        // Arrange
        let time = MockTimeService::new().with_now(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        let sut = RateLimitServiceImpl::new(time, RateLimitServiceConfig::default());

        // Act
        let result = sut.check(ADDR).await;

        // Assert
        assert_eq!(result, RateLimitDecision::Allowed);
        assert_eq!(sut.len().await, 1);
    }

    #[tokio::test]
    async fn fourth_call_in_window_is_limited() {
        // Arrange
        let (sut, clock) = make_sut();

        // Act
        let mut results = Vec::new();
        for _ in 0..3 {
            results.push(sut.check(ADDR).await);
            clock.advance(Duration::from_secs(60));
        }
        let limited = sut.check(ADDR).await;

        // Assert
        assert_eq!(results, [RateLimitDecision::Allowed; 3]);
        assert_eq!(
            limited,
            RateLimitDecision::Limited {
                retry_after: Duration::from_secs(3600 - 180)
            }
        );
    }

    #[tokio::test]
    async fn retry_after_rounds_up() {
        // Arrange
        let (sut, clock) = make_sut();
        for _ in 0..3 {
            sut.check(ADDR).await;
        }
        clock.advance(Duration::from_millis(1500));

        // Act
        let result = sut.check(ADDR).await;

        // Assert
        assert_eq!(
            result,
            RateLimitDecision::Limited {
                retry_after: Duration::from_secs(3599)
            }
        );
    }

    #[tokio::test]
    async fn limited_calls_do_not_extend_window() {
        // Arrange
        let (sut, clock) = make_sut();
        for _ in 0..3 {
            sut.check(ADDR).await;
        }
        for _ in 0..5 {
            assert!(!sut.check(ADDR).await.is_allowed());
        }

        // Act
        clock.advance(Duration::from_secs(3601));
        let result = sut.check(ADDR).await;

        // Assert
        assert_eq!(result, RateLimitDecision::Allowed);
    }

    #[tokio::test]
    async fn counter_restarts_after_window() {
        // Arrange
        let (sut, clock) = make_sut();
        for _ in 0..4 {
            sut.check(ADDR).await;
        }

        // Act
        clock.advance(Duration::from_secs(3601));
        let mut results = Vec::new();
        for _ in 0..4 {
            results.push(sut.check(ADDR).await.is_allowed());
        }

        // Assert
        assert_eq!(results, [true, true, true, false]);
    }

    #[tokio::test]
    async fn still_limited_at_reset_instant() {
        // Arrange
        let (sut, clock) = make_sut();
        for _ in 0..3 {
            sut.check(ADDR).await;
        }

        // Act
        clock.advance(Duration::from_secs(3600));
        let result = sut.check(ADDR).await;

        // Assert
        assert_eq!(
            result,
            RateLimitDecision::Limited {
                retry_after: Duration::from_secs(1)
            }
        );
    }

    #[tokio::test]
    async fn addresses_are_independent() {
        // Arrange
        let (sut, _clock) = make_sut();
        for _ in 0..3 {
            sut.check(ADDR).await;
        }

        // Act
        let limited = sut.check(ADDR).await;
        let other = sut.check(OTHER_ADDR).await;

        // Assert
        assert!(!limited.is_allowed());
        assert!(other.is_allowed());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_checks_admit_at_most_max() {
        // Arrange
        let (sut, _clock) = make_sut();

        // Act
        let results = futures::future::join_all((0..32).map(|_| {
            let sut = sut.clone();
            tokio::spawn(async move { sut.check(ADDR).await })
        }))
        .await;

        // Assert
        let allowed = results
            .into_iter()
            .map(Result::unwrap)
            .filter(|x| x.is_allowed())
            .count();
        assert_eq!(allowed, 3);
    }

    #[tokio::test]
    async fn sweep_removes_expired_records() {
        // Arrange
        let (sut, clock) = make_sut();
        sut.check(ADDR).await;
        clock.advance(Duration::from_secs(1800));
        sut.check(OTHER_ADDR).await;

        // Act
        clock.advance(Duration::from_secs(1801));
        let removed = sut.sweep().await;

        // Assert
        assert_eq!(removed, 1);
        assert_eq!(sut.len().await, 1);
    }

    #[tokio::test]
    async fn custom_limit() {
        // Arrange
        let clock = Clock::new();
        let sut = RateLimitServiceImpl::new(
            clock.clone(),
            RateLimitServiceConfig {
                window: Duration::from_secs(60),
                max_requests: 1,
            },
        );

        // Act
        let first = sut.check(ADDR).await;
        let second = sut.check(ADDR).await;

        // Assert
        assert!(first.is_allowed());
        assert_eq!(
            second,
            RateLimitDecision::Limited {
                retry_after: Duration::from_secs(60)
            }
        );
    }
}
