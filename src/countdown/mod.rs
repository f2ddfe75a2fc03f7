#[cfg(feature = "desktop")]
pub mod commands;
pub mod controller;
pub mod state;
pub mod target;

pub use controller::{CountdownSnapshot, CountdownTimer, OnReached};
pub use state::{CountdownState, CountdownTracker, DigitFlips, Tick};
pub use target::{CountdownTarget, TargetSource};
