use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

/// Cancelable one-per-period tick source for the quiz clock.
///
/// Disarming drops the interval, so a pending tick can never fire after the
/// session leaves `InProgress`.
#[derive(Debug)]
pub struct Countdown {
    period: Duration,
    interval: Option<Interval>,
}

impl Countdown {
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    /// Start ticking one period from now. No-op if already armed.
    pub fn arm(&mut self) {
        if self.interval.is_some() {
            return;
        }
        let mut interval = interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
    }

    pub fn disarm(&mut self) {
        self.interval = None;
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.interval.is_some()
    }

    /// Wait for the next tick. Never resolves while disarmed.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}
