use std::{sync::Arc, time::Duration};

use serde::Serialize;
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::{
    clock::Clock,
    events::{Events, COUNTDOWN_TICK},
};

use super::{CountdownState, CountdownTarget, CountdownTracker, DigitFlips, Tick};

// The ticker logs every second; flip this off when it gets noisy.
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

/// Called once, on the tick that reaches the target.
pub type OnReached = Box<dyn FnOnce() + Send + 'static>;

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CountdownSnapshot {
    pub target: CountdownTarget,
    pub state: CountdownState,
    pub flips: DigitFlips,
    pub running: bool,
}

struct CountdownInner {
    target: CountdownTarget,
    tracker: CountdownTracker,
    flips: DigitFlips,
}

struct Ticker {
    handle: JoinHandle<()>,
    cancel: CancellationToken,
}

#[derive(Clone)]
pub struct CountdownTimer {
    inner: Arc<Mutex<CountdownInner>>,
    events: Events,
    clock: Arc<dyn Clock>,
    ticker: Arc<Mutex<Option<Ticker>>>,
    tick_interval: Duration,
}

impl CountdownTimer {
    pub fn new(target: CountdownTarget, clock: Arc<dyn Clock>, events: Events) -> Self {
        Self {
            inner: Arc::new(Mutex::new(CountdownInner {
                target,
                tracker: CountdownTracker::new(target.instant),
                flips: DigitFlips::default(),
            })),
            events,
            clock,
            ticker: Arc::new(Mutex::new(None)),
            tick_interval: Duration::from_secs(1),
        }
    }

    pub async fn target(&self) -> CountdownTarget {
        self.inner.lock().await.target
    }

    /// Computes the first state right away and, unless the session is already
    /// reached, keeps recomputing every second until the target is hit.
    /// Restarting replaces any ticker left from a previous start.
    pub async fn start(&self, already_reached: bool, on_reached: OnReached) -> CountdownSnapshot {
        self.stop().await;

        let first = {
            let mut guard = self.inner.lock().await;
            let target = guard.target.instant;
            if already_reached {
                guard.tracker = CountdownTracker::already_reached(target);
                guard.flips = DigitFlips::default();
                Tick {
                    state: CountdownState::terminal(),
                    flips: DigitFlips::default(),
                    just_reached: false,
                }
            } else {
                guard.tracker = CountdownTracker::new(target);
                let tick = guard.tracker.observe(self.clock.now());
                guard.flips = tick.flips;
                tick
            }
        };

        self.events.emit(COUNTDOWN_TICK, &first);

        if already_reached {
            log_info!("birthday already reached, countdown not started");
        } else if first.just_reached {
            log_info!("countdown target already passed at start");
            on_reached();
        } else {
            self.spawn_ticker(on_reached).await;
        }

        self.snapshot().await
    }

    pub async fn snapshot(&self) -> CountdownSnapshot {
        let running = self.is_running().await;
        let guard = self.inner.lock().await;
        CountdownSnapshot {
            target: guard.target,
            state: guard
                .tracker
                .last()
                .unwrap_or_else(CountdownState::default),
            flips: guard.flips,
            running,
        }
    }

    pub async fn is_running(&self) -> bool {
        self.ticker
            .lock()
            .await
            .as_ref()
            .map(|ticker| !ticker.handle.is_finished())
            .unwrap_or(false)
    }

    /// Cancels the ticker. Safe to call when nothing is running.
    pub async fn stop(&self) {
        if let Some(ticker) = self.ticker.lock().await.take() {
            ticker.cancel.cancel();
            ticker.handle.abort();
        }
    }

    async fn spawn_ticker(&self, on_reached: OnReached) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(old) = ticker_guard.take() {
            old.cancel.cancel();
            old.handle.abort();
        }

        let inner = self.inner.clone();
        let events = self.events.clone();
        let clock = self.clock.clone();
        let tick_interval = self.tick_interval;
        let cancel = CancellationToken::new();
        let cancel_task = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + tick_interval, tick_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut on_reached = Some(on_reached);

            loop {
                tokio::select! {
                    _ = cancel_task.cancelled() => {
                        log_debug!("countdown ticker cancelled");
                        break;
                    }
                    _ = interval.tick() => {
                        let tick = {
                            let mut guard = inner.lock().await;
                            let tick = guard.tracker.observe(clock.now());
                            guard.flips = tick.flips;
                            tick
                        };

                        events.emit(COUNTDOWN_TICK, &tick);

                        if tick.just_reached {
                            log_info!("countdown reached its target");
                            if let Some(callback) = on_reached.take() {
                                callback();
                            }
                            break;
                        }
                    }
                }
            }
        });

        *ticker_guard = Some(Ticker { handle, cancel });
    }
}
