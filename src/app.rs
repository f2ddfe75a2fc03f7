use std::sync::Arc;

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;
use tokio::{sync::Mutex, task::JoinHandle};

use crate::{
    audio::MusicPlayer,
    boundary::{Fault, FaultBoundary},
    celebration::{default_slides, CelebrationController, CelebrationView},
    clock::Clock,
    config::AppConfig,
    countdown::{CountdownSnapshot, CountdownTarget, CountdownTimer},
    decor::DecorConfig,
    effects::{Effect, EventEffects, PresentationEffects},
    events::{Events, BIRTHDAY_REACHED},
    navigation::{GoTo, NavigationController, NavigationSnapshot, PageId},
    pages::{GalleryPage, GalleryView, MessagePage, MessageView},
    session::{apply_reset_query, FlagStore, ResetOutcome, Session},
};

/// How long the balloons and fireworks run when the countdown hits zero.
pub const BIRTHDAY_EFFECT_MS: u64 = 10_000;

#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
struct ReachedEvent {
    at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AppSnapshot {
    pub reached: bool,
    pub recipient_name: String,
    pub navigation: NavigationSnapshot,
    pub countdown: CountdownSnapshot,
    pub celebration: CelebrationView,
    pub message: MessageView,
    pub gallery: GalleryView,
    pub fault: Option<Fault>,
}

/// Everything the page needs, wired together. Cheap to clone.
#[derive(Clone)]
pub struct BirthdayApp {
    config: Arc<AppConfig>,
    events: Events,
    effects: Arc<dyn PresentationEffects>,
    music: Arc<dyn MusicPlayer>,
    clock: Arc<dyn Clock>,
    session: Session,
    navigation: NavigationController,
    countdown: CountdownTimer,
    celebration: CelebrationController,
    message: MessagePage,
    gallery: GalleryPage,
    decor: Arc<DecorConfig>,
    boundary: FaultBoundary,
    watchers: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl BirthdayApp {
    /// Loads the session flag (clearing it unless the config remembers it)
    /// and resolves the countdown target against `clock`.
    pub fn new(
        config: AppConfig,
        store: Arc<FlagStore>,
        events: Events,
        music: Arc<dyn MusicPlayer>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let session = Session::load(store, config.remember_reached)?;
        let effects: Arc<dyn PresentationEffects> = Arc::new(EventEffects::new(events.clone()));
        let navigation = NavigationController::new(events.clone());

        let target = CountdownTarget::resolve(config.target.as_deref(), clock.now());
        info!("countdown target {} ({:?})", target.instant, target.source);
        let countdown = CountdownTimer::new(target, clock.clone(), events.clone());

        let celebration = CelebrationController::new(
            default_slides(&config.recipient_name),
            effects.clone(),
            music.clone(),
            navigation.clone(),
        );
        let message = MessagePage::new(effects.clone(), navigation.clone());
        let gallery = GalleryPage::new(config.photos.clone(), effects.clone(), navigation.clone());
        let decor = DecorConfig::generate(config.decor_seed());
        let boundary = FaultBoundary::new(events.clone(), config.debug);

        Ok(Self {
            config: Arc::new(config),
            events,
            effects,
            music,
            clock,
            session,
            navigation,
            countdown,
            celebration,
            message,
            gallery,
            decor: Arc::new(decor),
            boundary,
            watchers: Arc::new(Mutex::new(Vec::new())),
        })
    }

    /// Hooks the pages up to navigation and starts the countdown.
    pub async fn start(&self) -> CountdownSnapshot {
        {
            let mut watchers = self.watchers.lock().await;
            for handle in watchers.drain(..) {
                handle.abort();
            }
            watchers.push(self.celebration.watch());
            watchers.push(self.message.watch());
            watchers.push(self.gallery.watch());
        }

        self.start_countdown().await
    }

    async fn start_countdown(&self) -> CountdownSnapshot {
        let session = self.session.clone();
        let effects = self.effects.clone();
        let events = self.events.clone();
        let boundary = self.boundary.clone();
        let clock = self.clock.clone();

        let on_reached = Box::new(move || {
            // A failed write still celebrates; only the persisted copy is missing.
            if let Ok(false) = boundary.guard("mark_reached", session.mark_reached()) {
                return;
            }
            info!("birthday reached");
            effects.play(Effect::BirthdayCelebration {
                duration_ms: BIRTHDAY_EFFECT_MS,
            });
            events.emit(BIRTHDAY_REACHED, &ReachedEvent { at: clock.now() });
        });

        self.countdown
            .start(self.session.is_reached(), on_reached)
            .await
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn navigation(&self) -> &NavigationController {
        &self.navigation
    }

    pub fn countdown(&self) -> &CountdownTimer {
        &self.countdown
    }

    pub fn celebration(&self) -> &CelebrationController {
        &self.celebration
    }

    pub fn message(&self) -> &MessagePage {
        &self.message
    }

    pub fn gallery(&self) -> &GalleryPage {
        &self.gallery
    }

    pub fn decor(&self) -> &DecorConfig {
        &self.decor
    }

    pub fn boundary(&self) -> &FaultBoundary {
        &self.boundary
    }

    /// The "Let's Celebrate" button.
    pub async fn begin_celebration(&self) -> GoTo {
        self.go_to(PageId::Celebration).await
    }

    /// The countdown page can only be left once the birthday is reached.
    pub async fn go_to(&self, page: PageId) -> GoTo {
        let current = self.navigation.current().await;
        if current == PageId::Countdown && page != current && !self.session.is_reached() {
            warn!("ignoring navigation to {page:?}: the countdown is still running");
            return GoTo::Unchanged;
        }
        self.navigation.go_to(page).await
    }

    /// Page numbers as the front-end uses them, 1 to 4.
    pub async fn go_to_number(&self, number: u8) -> Result<GoTo> {
        let Some(page) = PageId::from_number(number) else {
            bail!("there is no page {number}");
        };
        Ok(self.go_to(page).await)
    }

    /// Handles the launch query; a `resetCountdown=1` restarts the countdown.
    pub async fn apply_launch_query(&self, query: &str) -> Result<ResetOutcome> {
        let outcome = apply_reset_query(query, &self.session)?;
        if outcome.reset {
            self.restart().await?;
        }
        Ok(outcome)
    }

    /// Forgets that the birthday was reached and starts over on the
    /// countdown.
    pub async fn developer_reset(&self) -> Result<CountdownSnapshot> {
        info!("developer reset");
        self.session.clear()?;
        self.restart().await
    }

    /// Clears a tripped fault and starts over as if freshly loaded.
    pub async fn reload(&self) -> Result<CountdownSnapshot> {
        info!("reloading");
        self.boundary.clear();
        if !self.config.remember_reached {
            self.session.clear()?;
        }
        self.gallery.reset().await;
        self.restart().await
    }

    async fn restart(&self) -> Result<CountdownSnapshot> {
        self.countdown.stop().await;
        if let Err(err) = self.music.stop() {
            warn!("failed to stop music: {err:#}");
        }
        self.navigation.reset_to(PageId::Countdown).await;
        self.effects.play(Effect::ScrollToTop);
        Ok(self.start_countdown().await)
    }

    pub async fn snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            reached: self.session.is_reached(),
            recipient_name: self.config.recipient_name.clone(),
            navigation: self.navigation.snapshot().await,
            countdown: self.countdown.snapshot().await,
            celebration: self.celebration.view().await,
            message: self.message.view().await,
            gallery: self.gallery.view().await,
            fault: self.boundary.current(),
        }
    }

    pub async fn shutdown(&self) {
        self.countdown.stop().await;
        self.navigation.shutdown().await;
        self.celebration.shutdown().await;
        for handle in self.watchers.lock().await.drain(..) {
            handle.abort();
        }
        if let Err(err) = self.music.stop() {
            warn!("failed to stop music: {err:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{audio::SilentPlayer, clock::TokioClock, events::MemorySink};
    use chrono::{Duration as ChronoDuration, TimeZone};
    use std::time::Duration;

    fn app_with_target(offset_secs: i64) -> (Arc<MemorySink>, BirthdayApp) {
        let now = Utc.with_ymd_and_hms(2026, 1, 30, 16, 0, 0).unwrap();
        let target = now + ChronoDuration::seconds(offset_secs);
        let config = AppConfig {
            target: Some(target.to_rfc3339()),
            decor_seed: Some(1),
            ..AppConfig::default()
        };
        let sink = MemorySink::new();
        let app = BirthdayApp::new(
            config,
            Arc::new(FlagStore::in_memory()),
            Events::new(sink.clone()),
            Arc::new(SilentPlayer::new()),
            Arc::new(TokioClock::starting_at(now)),
        )
        .unwrap();
        (sink, app)
    }

    #[tokio::test(start_paused = true)]
    async fn celebration_is_locked_until_reached() {
        let (_, app) = app_with_target(60);
        app.start().await;

        assert_eq!(app.begin_celebration().await, GoTo::Unchanged);

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert!(app.session().is_reached());
        assert!(matches!(
            app.begin_celebration().await,
            GoTo::Started { .. }
        ));
        app.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn reaching_the_target_celebrates_once() {
        let (sink, app) = app_with_target(3);
        app.start().await;
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(sink.count(BIRTHDAY_REACHED), 1);
        let effects = sink.named(crate::events::EFFECT);
        assert_eq!(effects[0]["kind"], "birthdayCelebration");
        assert_eq!(effects[0]["durationMs"], BIRTHDAY_EFFECT_MS);
        app.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_page_numbers_are_errors() {
        let (_, app) = app_with_target(-5);
        app.start().await;
        assert!(app.go_to_number(0).await.is_err());
        assert!(app.go_to_number(5).await.is_err());
        assert!(app.go_to_number(4).await.is_ok());
        app.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn developer_reset_starts_the_countdown_over() {
        let (_, app) = app_with_target(-5);
        app.start().await;
        assert!(app.session().is_reached());

        let snapshot = app.developer_reset().await.unwrap();
        assert!(!app.session().is_reached());
        assert_eq!(app.navigation().current().await, PageId::Countdown);
        // Target already passed, so the restart reaches it again at once.
        assert!(snapshot.state.reached);
        assert!(app.session().is_reached());
        app.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn launch_query_reset_clears_the_flag() {
        let (_, app) = app_with_target(120);
        app.session().mark_reached().unwrap();

        let outcome = app
            .apply_launch_query("?resetCountdown=1&lang=en")
            .await
            .unwrap();
        assert!(outcome.reset);
        assert_eq!(outcome.query, "?lang=en");
        assert!(!app.session().is_reached());
        assert!(app.countdown().is_running().await);
        app.shutdown().await;
    }
}
