use std::{future::Future, sync::Arc, time::Duration};

use log::{info, warn};
use serde::Serialize;
use tokio::{
    sync::{watch, Mutex},
    task::JoinHandle,
    time,
};

use crate::events::{Events, PAGE_CHANGED, PAGE_TRANSITION_STARTED};

use super::{GoTo, NavigationState, PageId, Transition, Visibility};

/// The leaving page slides out over this long.
pub const EXIT_DURATION: Duration = Duration::from_millis(600);
/// The entering page starts moving this long after the leaving one.
pub const ENTRY_DELAY: Duration = Duration::from_millis(200);
pub const ENTRY_DURATION: Duration = Duration::from_millis(600);

/// A transition settles when the entering page comes to rest.
pub fn settle_delay() -> Duration {
    ENTRY_DELAY + ENTRY_DURATION
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub page: PageId,
    pub visibility: Visibility,
    pub interactive: bool,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NavigationSnapshot {
    pub current: PageId,
    pub in_flight: Option<Transition>,
    pub pages: Vec<PageView>,
}

#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
struct TransitionStartedEvent {
    transition: Transition,
    exit_offset: i32,
    entry_offset: i32,
    exit_ms: u64,
    entry_delay_ms: u64,
    entry_ms: u64,
}

#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
struct PageChangedEvent {
    page: PageId,
    previous: PageId,
    scroll_to_top: bool,
}

/// Moves between the four pages. A request made while another transition is
/// settling is dropped and reported as [`GoTo::Busy`].
#[derive(Clone)]
pub struct NavigationController {
    state: Arc<Mutex<NavigationState>>,
    events: Events,
    pages: Arc<watch::Sender<PageId>>,
    settler: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl NavigationController {
    pub fn new(events: Events) -> Self {
        let (pages, _) = watch::channel(PageId::Countdown);
        Self {
            state: Arc::new(Mutex::new(NavigationState::new(PageId::Countdown))),
            events,
            pages: Arc::new(pages),
            settler: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn current(&self) -> PageId {
        self.state.lock().await.current()
    }

    /// Receives the current page every time a transition settles.
    pub fn subscribe(&self) -> watch::Receiver<PageId> {
        self.pages.subscribe()
    }

    pub async fn snapshot(&self) -> NavigationSnapshot {
        let state = self.state.lock().await;
        NavigationSnapshot {
            current: state.current(),
            in_flight: state.in_flight(),
            pages: PageId::ALL
                .into_iter()
                .map(|page| PageView {
                    page,
                    visibility: state.visibility(page),
                    interactive: state.is_interactive(page),
                })
                .collect(),
        }
    }

    pub async fn go_to(&self, target: PageId) -> GoTo {
        let outcome = self.state.lock().await.begin(target);

        match outcome {
            GoTo::Unchanged => {}
            GoTo::Busy { in_flight } => {
                warn!(
                    "ignoring navigation to {:?}: transition {:?} -> {:?} still settling",
                    target, in_flight.from, in_flight.to
                );
            }
            GoTo::Started { transition } => {
                info!(
                    "page transition {:?} -> {:?} ({:?})",
                    transition.from, transition.to, transition.direction
                );
                self.events.emit(
                    PAGE_TRANSITION_STARTED,
                    &TransitionStartedEvent {
                        transition,
                        exit_offset: transition.exit_offset(),
                        entry_offset: transition.entry_offset(),
                        exit_ms: EXIT_DURATION.as_millis() as u64,
                        entry_delay_ms: ENTRY_DELAY.as_millis() as u64,
                        entry_ms: ENTRY_DURATION.as_millis() as u64,
                    },
                );
                self.spawn_settler(transition).await;
            }
        }

        outcome
    }

    /// Jumps straight to `page`, dropping any transition in flight.
    pub async fn reset_to(&self, page: PageId) {
        self.abort_settler().await;
        let previous = {
            let mut state = self.state.lock().await;
            let previous = state.current();
            state.reset(page);
            previous
        };

        self.pages.send_replace(page);
        self.events.emit(
            PAGE_CHANGED,
            &PageChangedEvent {
                page,
                previous,
                scroll_to_top: true,
            },
        );
    }

    pub async fn shutdown(&self) {
        self.abort_settler().await;
    }

    async fn abort_settler(&self) {
        if let Some(handle) = self.settler.lock().await.take() {
            handle.abort();
        }
    }

    async fn spawn_settler(&self, transition: Transition) {
        let state = self.state.clone();
        let pages = self.pages.clone();
        let events = self.events.clone();

        let handle = tokio::spawn(async move {
            time::sleep(settle_delay()).await;

            let settled = state.lock().await.settle(transition.id);
            if let Some(page) = settled {
                pages.send_replace(page);
                events.emit(
                    PAGE_CHANGED,
                    &PageChangedEvent {
                        page,
                        previous: transition.from,
                        scroll_to_top: true,
                    },
                );
            }
        });

        let mut settler = self.settler.lock().await;
        if let Some(previous) = settler.replace(handle) {
            // Only reachable once the previous transition settled.
            previous.abort();
        }
    }
}

/// Runs `on_change(true)` each time `page` becomes current and
/// `on_change(false)` each time it stops being current.
pub fn watch_page<F, Fut>(
    mut pages: watch::Receiver<PageId>,
    page: PageId,
    mut on_change: F,
) -> JoinHandle<()>
where
    F: FnMut(bool) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    tokio::spawn(async move {
        let mut was_active = *pages.borrow_and_update() == page;
        if was_active {
            on_change(true).await;
        }

        while pages.changed().await.is_ok() {
            let active = *pages.borrow_and_update() == page;
            if active != was_active {
                was_active = active;
                on_change(active).await;
            }
        }
    })
}
