use std::{future::Future, sync::Arc, time::Duration};

use tokio::{sync::Mutex, task::JoinHandle, time};
use tokio_util::sync::CancellationToken;

use crate::{
    audio::MusicPlayer,
    effects::{Effect, PresentationEffects},
    navigation::{watch_page, NavigationController, PageId},
};

use super::{Answer, ButtonKey, CelebrationSequencer, CelebrationView, Slide, Step};

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Decorations appear a beat after their button is pressed.
pub const DECORATION_DELAY: Duration = Duration::from_millis(200);
/// Time the finale gets before the message page takes over.
pub const FINALE_SETTLE: Duration = Duration::from_millis(2_000);
pub const BALLOON_CONFETTI: Duration = Duration::from_secs(5);

struct CelebrationInner {
    sequencer: CelebrationSequencer,
    active: bool,
    /// Cancels delayed effects and the pending completion from this visit.
    visit: CancellationToken,
}

/// Drives the celebration page: forwards input to the sequencer, plays the
/// matching effects and hands over to the message page when the chain is
/// done. Input is ignored while the page is not the active one.
#[derive(Clone)]
pub struct CelebrationController {
    inner: Arc<Mutex<CelebrationInner>>,
    effects: Arc<dyn PresentationEffects>,
    music: Arc<dyn MusicPlayer>,
    navigation: NavigationController,
}

impl CelebrationController {
    pub fn new(
        slides: Vec<Slide>,
        effects: Arc<dyn PresentationEffects>,
        music: Arc<dyn MusicPlayer>,
        navigation: NavigationController,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(CelebrationInner {
                sequencer: CelebrationSequencer::new(slides),
                active: false,
                visit: CancellationToken::new(),
            })),
            effects,
            music,
            navigation,
        }
    }

    /// Resets on every entry to the celebration page.
    pub fn watch(&self) -> JoinHandle<()> {
        let controller = self.clone();
        watch_page(
            self.navigation.subscribe(),
            PageId::Celebration,
            move |active| {
                let controller = controller.clone();
                async move {
                    if active {
                        controller.on_page_active().await;
                    } else {
                        controller.on_page_inactive().await;
                    }
                }
            },
        )
    }

    pub async fn view(&self) -> CelebrationView {
        self.inner.lock().await.sequencer.view()
    }

    pub async fn is_active(&self) -> bool {
        self.inner.lock().await.active
    }

    pub async fn on_page_active(&self) {
        let mut inner = self.inner.lock().await;
        inner.visit.cancel();
        inner.visit = CancellationToken::new();
        inner.sequencer.reset();
        inner.active = true;
        log_info!("celebration page entered, sequence reset");
    }

    pub async fn on_page_inactive(&self) {
        let mut inner = self.inner.lock().await;
        inner.visit.cancel();
        inner.active = false;
    }

    pub async fn shutdown(&self) {
        let mut inner = self.inner.lock().await;
        inner.visit.cancel();
        inner.active = false;
    }

    pub async fn advance(&self) -> CelebrationView {
        self.apply(|seq| seq.advance()).await
    }

    pub async fn answer(&self, answer: Answer) -> CelebrationView {
        self.apply(|seq| seq.answer(answer)).await
    }

    pub async fn activate(&self, key: ButtonKey) -> CelebrationView {
        self.apply(|seq| seq.activate(key)).await
    }

    pub async fn handle_key(&self, key: &str) -> CelebrationView {
        self.apply(|seq| seq.handle_key(key)).await
    }

    async fn apply<F>(&self, input: F) -> CelebrationView
    where
        F: FnOnce(&mut CelebrationSequencer) -> Step,
    {
        let (step, view, visit) = {
            let mut inner = self.inner.lock().await;
            if !inner.active {
                return inner.sequencer.view();
            }
            let step = input(&mut inner.sequencer);
            (step, inner.sequencer.view(), inner.visit.clone())
        };

        self.play_step(step, &visit);
        view
    }

    fn play_step(&self, step: Step, visit: &CancellationToken) {
        match step {
            Step::Unchanged | Step::Completed => {}
            Step::SlideAdvanced { .. } => self.effects.play(Effect::SlideBurst),
            Step::ButtonsRevealed => {
                self.effects.play(Effect::SlideBurst);
                self.effects.play(Effect::ButtonsRevealed);
            }
            Step::Rejected => self.effects.play(Effect::QuestionRejected),
            Step::Activated { button } => self.play_activation(button, visit),
        }
    }

    fn play_activation(&self, button: ButtonKey, visit: &CancellationToken) {
        log_info!("celebration button {button:?} activated");
        self.effects.play(Effect::ButtonBurst { button });

        match button {
            ButtonKey::Lights => self.effects.play(Effect::LightsOn),
            ButtonKey::Music => {
                if let Err(err) = self.music.play() {
                    log_warn!("music player failed to start: {err:#}");
                }
                self.effects.play(Effect::MusicNotes);
                self.show_decoration(button, visit);
            }
            ButtonKey::Decorate => self.show_decoration(button, visit),
            ButtonKey::Balloons => {
                let effects = self.effects.clone();
                self.after(DECORATION_DELAY, visit, async move {
                    effects.play(Effect::Confetti {
                        duration_ms: BALLOON_CONFETTI.as_millis() as u64,
                    });
                    effects.play(Effect::Decoration { button });
                });
            }
            ButtonKey::Message => {
                self.effects.play(Effect::Finale);
                let controller = self.clone();
                self.after(FINALE_SETTLE, visit, async move {
                    controller.complete().await;
                });
            }
        }
    }

    fn show_decoration(&self, button: ButtonKey, visit: &CancellationToken) {
        let effects = self.effects.clone();
        self.after(DECORATION_DELAY, visit, async move {
            effects.play(Effect::Decoration { button });
        });
    }

    async fn complete(&self) {
        let completed = {
            let mut inner = self.inner.lock().await;
            inner.active && inner.sequencer.finish() == Step::Completed
        };

        if completed {
            log_info!("celebration complete, moving to the message");
            self.navigation.go_to(PageId::Message).await;
        }
    }

    /// Runs `work` after `delay` unless the visit ends first.
    fn after<Fut>(&self, delay: Duration, visit: &CancellationToken, work: Fut)
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        let visit = visit.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = visit.cancelled() => {}
                _ = time::sleep(delay) => work.await,
            }
        });
    }
}
