use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::{sync::Mutex, task::JoinHandle};

use crate::{
    effects::{Effect, PresentationEffects},
    navigation::{watch_page, NavigationController, PageId},
};

/// Opaque to the core; the front-end loads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub src: String,
    pub alt: String,
}

pub fn default_photos() -> Vec<Photo> {
    (1..=12)
        .map(|n| Photo {
            src: format!("https://dummyimage.com/400x400/ffffff/000000.jpg&text=image+{n}"),
            alt: format!("Memory {n}"),
        })
        .collect()
}

/// Full-screen view of one photo. Navigation wraps around both ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lightbox {
    len: usize,
    open: Option<usize>,
}

impl Lightbox {
    pub fn new(len: usize) -> Self {
        Self { len, open: None }
    }

    pub fn current(&self) -> Option<usize> {
        self.open
    }

    pub fn open(&mut self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        self.open = Some(index);
        true
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    pub fn next(&mut self) {
        if let Some(index) = self.open {
            self.open = Some((index + 1) % self.len);
        }
    }

    pub fn prev(&mut self) {
        if let Some(index) = self.open {
            self.open = Some((index + self.len - 1) % self.len);
        }
    }

    /// Keys only do something while the lightbox is open.
    pub fn handle_key(&mut self, key: &str) {
        if self.open.is_none() {
            return;
        }
        match key {
            "Escape" => self.close(),
            "ArrowLeft" => self.prev(),
            "ArrowRight" => self.next(),
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryView {
    pub active: bool,
    pub photos: Vec<Photo>,
    pub open: Option<usize>,
    /// "Photo 3 of 12" while the lightbox is open.
    pub caption: Option<String>,
}

struct GalleryInner {
    lightbox: Lightbox,
    active: bool,
    revealed: bool,
}

#[derive(Clone)]
pub struct GalleryPage {
    photos: Arc<Vec<Photo>>,
    inner: Arc<Mutex<GalleryInner>>,
    effects: Arc<dyn PresentationEffects>,
    navigation: NavigationController,
}

impl GalleryPage {
    pub fn new(
        photos: Vec<Photo>,
        effects: Arc<dyn PresentationEffects>,
        navigation: NavigationController,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(GalleryInner {
                lightbox: Lightbox::new(photos.len()),
                active: false,
                revealed: false,
            })),
            photos: Arc::new(photos),
            effects,
            navigation,
        }
    }

    pub fn watch(&self) -> JoinHandle<()> {
        let page = self.clone();
        watch_page(self.navigation.subscribe(), PageId::Gallery, move |active| {
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

    /// Photos animate in the first time the page is shown, not on return
    /// visits.
    pub async fn on_page_active(&self) {
        let first_visit = {
            let mut inner = self.inner.lock().await;
            inner.active = true;
            !std::mem::replace(&mut inner.revealed, true)
        };
        if first_visit {
            self.effects.play(Effect::RevealPhotos);
        }
    }

    pub async fn on_page_inactive(&self) {
        let mut inner = self.inner.lock().await;
        inner.active = false;
        inner.lightbox.close();
    }

    /// Only the next full reload replays the photo reveal.
    pub async fn reset(&self) {
        let mut inner = self.inner.lock().await;
        inner.lightbox.close();
        inner.revealed = false;
    }

    pub async fn view(&self) -> GalleryView {
        let inner = self.inner.lock().await;
        let open = inner.lightbox.current();
        GalleryView {
            active: inner.active,
            photos: self.photos.as_ref().clone(),
            open,
            caption: open.map(|index| format!("Photo {} of {}", index + 1, self.photos.len())),
        }
    }

    pub async fn open(&self, index: usize) -> GalleryView {
        self.with_lightbox(|lightbox| {
            lightbox.open(index);
        })
        .await
    }

    pub async fn close(&self) -> GalleryView {
        self.with_lightbox(Lightbox::close).await
    }

    pub async fn next(&self) -> GalleryView {
        self.with_lightbox(Lightbox::next).await
    }

    pub async fn prev(&self) -> GalleryView {
        self.with_lightbox(Lightbox::prev).await
    }

    pub async fn handle_key(&self, key: &str) -> GalleryView {
        self.with_lightbox(|lightbox| lightbox.handle_key(key)).await
    }

    async fn with_lightbox<F>(&self, action: F) -> GalleryView
    where
        F: FnOnce(&mut Lightbox),
    {
        {
            let mut inner = self.inner.lock().await;
            if inner.active {
                action(&mut inner.lightbox);
            }
        }
        self.view().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        effects::EventEffects,
        events::{Events, MemorySink, EFFECT},
    };

    #[test]
    fn lightbox_wraps_both_ways() {
        let mut lightbox = Lightbox::new(12);
        assert!(lightbox.open(11));
        lightbox.next();
        assert_eq!(lightbox.current(), Some(0));
        lightbox.prev();
        assert_eq!(lightbox.current(), Some(11));
    }

    #[test]
    fn out_of_range_open_is_ignored() {
        let mut lightbox = Lightbox::new(3);
        assert!(!lightbox.open(3));
        assert_eq!(lightbox.current(), None);
    }

    #[test]
    fn keys_need_an_open_lightbox() {
        let mut lightbox = Lightbox::new(3);
        lightbox.handle_key("ArrowRight");
        assert_eq!(lightbox.current(), None);

        lightbox.open(0);
        lightbox.handle_key("ArrowLeft");
        assert_eq!(lightbox.current(), Some(2));
        lightbox.handle_key("Escape");
        assert_eq!(lightbox.current(), None);
    }

    #[tokio::test]
    async fn photos_reveal_on_the_first_visit_only() {
        let sink = MemorySink::new();
        let events = Events::new(sink.clone());
        let gallery = GalleryPage::new(
            default_photos(),
            Arc::new(EventEffects::new(events.clone())),
            NavigationController::new(events),
        );

        gallery.on_page_active().await;
        let view = gallery.open(2).await;
        assert_eq!(view.caption.as_deref(), Some("Photo 3 of 12"));

        gallery.on_page_inactive().await;
        assert_eq!(gallery.view().await.open, None);
        gallery.on_page_active().await;

        assert_eq!(sink.count(EFFECT), 1);
        assert_eq!(sink.named(EFFECT)[0]["kind"], "revealPhotos");
    }
}
