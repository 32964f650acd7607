//! Fixed-interval tick driver for headless runs
//!
//! The viewer relies on Bevy's `FixedUpdate` schedule instead; this is the
//! same contract without a window: call `Pipeline::tick` once per interval.

use std::thread;
use std::time::{Duration, Instant};

use super::pipeline::{Pipeline, TickReport};

/// Deadline-based periodic timer
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    next: Instant,
}

impl Ticker {
    /// First deadline is one interval from now
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next: Instant::now() + interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Sleep until the next deadline and return how late we woke up.
    ///
    /// When more than a full interval behind, the schedule is re-anchored to
    /// now instead of firing a burst of catch-up ticks.
    pub fn wait(&mut self) -> Duration {
        let now = Instant::now();
        if now < self.next {
            thread::sleep(self.next - now);
        }
        let woke = Instant::now();
        let late = woke.saturating_duration_since(self.next);

        self.next += self.interval;
        if woke > self.next {
            self.next = woke + self.interval;
        }
        late
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,          // successful ticks
    pub failures: u64,       // ticks that returned an error
    pub total_wait: Duration,
    pub max_wait: Duration,
}

impl RunSummary {
    pub fn mean_wait(&self) -> Duration {
        if self.ticks == 0 {
            Duration::ZERO
        } else {
            self.total_wait.div_f64(self.ticks as f64)
        }
    }
}

/// Drive `pipeline` for `ticks` intervals, handing each published snapshot to `on_frame`
pub fn run_fixed<F>(pipeline: &mut Pipeline, ticker: &mut Ticker, ticks: u64, mut on_frame: F) -> RunSummary
where
    F: FnMut(&Pipeline, &TickReport),
{
    let mut summary = RunSummary::default();

    for _ in 0..ticks {
        ticker.wait();
        match pipeline.tick() {
            Ok(report) => {
                summary.ticks += 1;
                summary.total_wait += report.waited;
                summary.max_wait = summary.max_wait.max(report.waited);
                on_frame(pipeline, &report);
            }
            Err(err) => {
                summary.failures += 1;
                log::warn!("tick failed, keeping last snapshot: {err}");
            }
        }
    }

    summary
}
