//! Owned periodic tasks.
//!
//! A `Ticker` is a spawned loop that calls its callback once per period.
//! Dropping the handle aborts the task, so a timer can never outlive its
//! owner.

use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

pub const CLOCK_PERIOD: Duration = Duration::from_secs(1);
pub const LOADING_PERIOD: Duration = Duration::from_millis(400);

#[derive(Debug)]
pub struct Ticker {
    name: &'static str,
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Call `tick` every `period`, first one period from now, until it
    /// returns `Break` or the ticker is dropped.
    pub fn spawn<F, Fut>(name: &'static str, period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tick().await.is_break() {
                    tracing::debug!(ticker = name, "ticker finished");
                    break;
                }
            }
        });
        Self { name, handle }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Next frame of the loading animation: "" → "." → ".." → "..." → "".
pub fn next_dots(current: &str) -> &'static str {
    match current.len() {
        0 => ".",
        1 => "..",
        2 => "...",
        _ => "",
    }
}
