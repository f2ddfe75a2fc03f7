use std::{sync::Arc, time::Duration};

use serde::Serialize;
use tokio::{sync::Mutex, task::JoinHandle};

use crate::{
    effects::{Effect, PresentationEffects},
    navigation::{watch_page, NavigationController, PageId},
};

pub const ENTRY_CONFETTI: Duration = Duration::from_secs(5);

/// Curtains over the message. They open once per visit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageReveal {
    pub opened: bool,
}

impl MessageReveal {
    /// True only for the call that actually opens them.
    pub fn open(&mut self) -> bool {
        !std::mem::replace(&mut self.opened, true)
    }

    pub fn close(&mut self) {
        self.opened = false;
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    pub active: bool,
    pub reveal: MessageReveal,
}

struct MessageInner {
    reveal: MessageReveal,
    active: bool,
}

#[derive(Clone)]
pub struct MessagePage {
    inner: Arc<Mutex<MessageInner>>,
    effects: Arc<dyn PresentationEffects>,
    navigation: NavigationController,
}

impl MessagePage {
    pub fn new(effects: Arc<dyn PresentationEffects>, navigation: NavigationController) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MessageInner {
                reveal: MessageReveal::default(),
                active: false,
            })),
            effects,
            navigation,
        }
    }

    pub fn watch(&self) -> JoinHandle<()> {
        let page = self.clone();
        watch_page(self.navigation.subscribe(), PageId::Message, move |active| {
            let page = page.clone();
            async move {
                if active {
                    page.on_page_active().await;
                } else {
                    page.on_page_inactive().await;
                }
            }
        })
    }

    pub async fn view(&self) -> MessageView {
        let inner = self.inner.lock().await;
        MessageView {
            active: inner.active,
            reveal: inner.reveal,
        }
    }

    pub async fn on_page_active(&self) {
        self.inner.lock().await.active = true;
        self.effects.play(Effect::Confetti {
            duration_ms: ENTRY_CONFETTI.as_millis() as u64,
        });
    }

    pub async fn on_page_inactive(&self) {
        let mut inner = self.inner.lock().await;
        inner.active = false;
        inner.reveal.close();
    }

    pub async fn open_curtains(&self) -> MessageView {
        let opened = {
            let mut inner = self.inner.lock().await;
            inner.active && inner.reveal.open()
        };
        if opened {
            log::info!("message curtains opened");
            self.effects.play(Effect::CurtainsOpened);
        }
        self.view().await
    }

    pub async fn handle_key(&self, key: &str) -> MessageView {
        match key {
            "Enter" | " " | "Space" => self.open_curtains().await,
            _ => self.view().await,
        }
    }
}
