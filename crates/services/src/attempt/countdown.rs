use std::future;
use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

/// Period of the attempt countdown.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Scoped periodic ticker for one attempt screen.
///
/// The first tick fires one period after `start`. Dropping the value cancels
/// the countdown; there is no shared timer registry.
#[derive(Debug)]
pub struct Countdown {
    interval: Interval,
}

impl Countdown {
    #[must_use]
    pub fn start(period: Duration) -> Self {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }

    /// Wait for the next tick.
    pub async fn tick(&mut self) {
        self.interval.tick().await;
    }
}

/// Wait for the next tick of `countdown`, or forever if there is none.
pub(crate) async fn next_tick(countdown: &mut Option<Countdown>) {
    match countdown {
        Some(countdown) => countdown.tick().await,
        None => future::pending().await,
    }
}
