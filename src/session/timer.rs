//! Countdown timer driving the session time limit.
//!
//! Remaining time is a pure function of the session start time and the
//! clock; the timer task only polls it on a fixed interval so the UI
//! can tick once per second. Expiry fires exactly once, after which the
//! task stops. Dropping or stopping the handle aborts the task, so no
//! event outlives teardown.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::clock::Clock;

/// Fixed polling interval for live countdown display.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Remaining session time, saturating at zero.
pub fn remaining_millis(start_millis: u64, now_millis: u64, duration_millis: u64) -> u64 {
    duration_millis.saturating_sub(now_millis.saturating_sub(start_millis))
}

/// Events emitted by the timer task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// Periodic tick with the remaining whole seconds.
    Tick { remaining_secs: u64 },
    /// The session time limit has been reached. Sent exactly once.
    Expired,
}

/// Handle to a running countdown task.
pub struct CountdownTimer {
    handle: JoinHandle<()>,
    paused: Arc<AtomicBool>,
}

impl CountdownTimer {
    /// Start polling. The first evaluation happens immediately, so a
    /// session resumed past its deadline expires without waiting for
    /// the next interval.
    pub fn start<C>(
        start_millis: u64,
        duration_millis: u64,
        clock: C,
    ) -> (Self, mpsc::UnboundedReceiver<TimerEvent>)
    where
        C: Clock + Send + 'static,
    {
        Self::start_with_period(start_millis, duration_millis, clock, TICK_INTERVAL)
    }

    fn start_with_period<C>(
        start_millis: u64,
        duration_millis: u64,
        clock: C,
        period: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<TimerEvent>)
    where
        C: Clock + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let paused = Arc::new(AtomicBool::new(false));
        let paused_flag = Arc::clone(&paused);

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                interval.tick().await;
                let remaining =
                    remaining_millis(start_millis, clock.now_millis(), duration_millis);

                // Pause suppresses tick delivery only; elapsed time stays
                // wall-clock derived and expiry still fires.
                if !paused_flag.load(Ordering::SeqCst)
                    && tx
                        .send(TimerEvent::Tick {
                            remaining_secs: remaining.div_ceil(1000),
                        })
                        .is_err()
                {
                    break;
                }

                if remaining == 0 {
                    let _ = tx.send(TimerEvent::Expired);
                    break;
                }
            }
        });

        (Self { handle, paused }, rx)
    }

    /// Suppress tick delivery without freezing the clock.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    /// Halt the polling task. No callbacks are delivered afterwards.
    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
