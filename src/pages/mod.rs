//! The two pages after the celebration: the curtained message and the photo
//! gallery.

#[cfg(feature = "desktop")]
pub mod commands;
pub mod gallery;
pub mod message;

pub use gallery::{default_photos, GalleryPage, GalleryView, Lightbox, Photo};
pub use message::{MessagePage, MessageReveal, MessageView};
