//! Structured game events and observers.
//!
//! The engine reports phase transitions, elections, enactments, powers and
//! the final result as [`GameEvent`]s. Observers decide what to do with them:
//! log them, record them for tests, or feed analytics.

pub mod event;
pub mod observer;

pub use event::GameEvent;
pub use observer::{GameObserver, LogObserver, RecordingObserver};
