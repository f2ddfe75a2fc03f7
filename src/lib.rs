pub mod app;
pub mod audio;
pub mod boundary;
pub mod celebration;
pub mod clock;
pub mod config;
pub mod countdown;
pub mod decor;
pub mod effects;
pub mod events;
pub mod navigation;
pub mod pages;
pub mod session;
#[cfg(feature = "desktop")]
mod shell;
mod utils;

pub use app::{AppSnapshot, BirthdayApp};
pub use config::AppConfig;
#[cfg(feature = "desktop")]
pub use shell::run;
