#[cfg(feature = "desktop")]
pub mod commands;
pub mod buttons;
pub mod controller;
pub mod sequencer;
pub mod slides;

pub use buttons::{ButtonChain, ButtonKey};
pub use controller::CelebrationController;
pub use sequencer::{CelebrationSequencer, CelebrationView, Phase, Step};
pub use slides::{default_slides, Answer, AnswerOption, Slide, SlideKind};
