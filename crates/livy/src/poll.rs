use crate::error::{LivyError, Result};
use backon::{BackoffBuilder, ExponentialBackoff, ExponentialBuilder};
use serde::{Deserialize, Deserializer, Serialize};
use std::time::{Duration, Instant};

/// How often a remote state is polled and for how long.
///
/// `factor: 1.0` without jitter polls on a fixed interval. In a
/// configuration file any field may be left out; see
/// [`PollPolicy::deserialize_over`].
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PollPolicy {
    pub interval_ms: u64,
    pub factor: f32,
    pub max_interval_ms: u64,
    pub jitter: bool,
    /// `None` waits forever.
    pub deadline_ms: Option<u64>,
}

/// The policy fields a configuration file actually sets.
#[derive(Deserialize, Default)]
#[serde(default)]
struct PollOverrides {
    interval_ms: Option<u64>,
    factor: Option<f32>,
    max_interval_ms: Option<u64>,
    jitter: Option<bool>,
    /// `Some(None)` is an explicit `null`, which removes the deadline.
    #[serde(deserialize_with = "explicit_null")]
    deadline_ms: Option<Option<u64>>,
}

fn explicit_null<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<Option<u64>>, D::Error> {
    Option::<u64>::deserialize(deserializer).map(Some)
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl PollPolicy {
    pub fn fixed(interval: Duration) -> Self {
        let interval_ms = millis(interval);
        Self {
            interval_ms,
            factor: 1.0,
            max_interval_ms: interval_ms,
            jitter: false,
            deadline_ms: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline_ms = Some(millis(deadline));
        self
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }

    /// Read a policy whose missing fields are taken from `base`, so a
    /// partial block keeps the base interval and deadline.
    pub fn deserialize_over<'de, D>(base: PollPolicy, deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let set = PollOverrides::deserialize(deserializer)?;
        Ok(Self {
            interval_ms: set.interval_ms.unwrap_or(base.interval_ms),
            factor: set.factor.unwrap_or(base.factor),
            max_interval_ms: set.max_interval_ms.unwrap_or(base.max_interval_ms),
            jitter: set.jitter.unwrap_or(base.jitter),
            deadline_ms: set.deadline_ms.unwrap_or(base.deadline_ms),
        })
    }

    fn backoff(&self) -> ExponentialBackoff {
        let builder = ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(self.interval_ms))
            .with_max_delay(Duration::from_millis(self.max_interval_ms.max(self.interval_ms)))
            .with_factor(self.factor.max(1.0))
            .with_max_times(usize::MAX);
        if self.jitter {
            builder.with_jitter().build()
        } else {
            builder.build()
        }
    }
}

/// Paces one polling loop and enforces its deadline.
///
/// Waited time is the larger of wall-clock time and the sum of requested
/// sleeps, so an injected sleeper still observes deadlines.
pub(crate) struct Poller<'a> {
    what: String,
    backoff: ExponentialBackoff,
    fallback: Duration,
    deadline: Option<Duration>,
    started: Instant,
    slept: Duration,
    sleep: &'a dyn Fn(Duration),
}

impl<'a> Poller<'a> {
    pub(crate) fn new(what: String, policy: &PollPolicy, sleep: &'a dyn Fn(Duration)) -> Self {
        Self {
            what,
            backoff: policy.backoff(),
            fallback: Duration::from_millis(policy.max_interval_ms.max(policy.interval_ms)),
            deadline: policy.deadline(),
            started: Instant::now(),
            slept: Duration::ZERO,
            sleep,
        }
    }

    pub(crate) fn waited(&self) -> Duration {
        self.started.elapsed().max(self.slept)
    }

    /// Sleep before the next poll, or fail if that would pass the deadline.
    pub(crate) fn pause(&mut self) -> Result<()> {
        let delay = self.backoff.next().unwrap_or(self.fallback);
        if let Some(deadline) = self.deadline {
            let waited = self.waited();
            if waited + delay > deadline {
                return Err(LivyError::TimedOut {
                    what: self.what.clone(),
                    waited,
                });
            }
        }
        (self.sleep)(delay);
        self.slept += delay;
        Ok(())
    }
}
