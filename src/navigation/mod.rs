#[cfg(feature = "desktop")]
pub mod commands;
pub mod controller;
pub mod state;

pub use controller::{watch_page, NavigationController, NavigationSnapshot, PageView};
pub use state::{Direction, GoTo, NavigationState, PageId, Transition, Visibility};
