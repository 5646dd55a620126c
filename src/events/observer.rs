//! Observers receive engine events.
//!
//! The engine owns a list of boxed observers and calls them synchronously,
//! in registration order, after each transition has been committed.

use std::cell::RefCell;
use std::rc::Rc;

use super::event::GameEvent;

/// Receives every event the engine emits.
pub trait GameObserver {
    fn on_event(&mut self, event: &GameEvent);
}

/// Forwards events to the `log` facade.
///
/// Game results go out at `info`, everything else at `debug`. Private events
/// are only logged at `trace`.
#[derive(Clone, Debug, Default)]
pub struct LogObserver {
    game_label: Option<String>,
}

impl LogObserver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix every line with a label, e.g. the game seed in batch runs.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.game_label = Some(label.into());
        self
    }
}

impl GameObserver for LogObserver {
    fn on_event(&mut self, event: &GameEvent) {
        let label = self.game_label.as_deref().unwrap_or("game");
        match event {
            GameEvent::GameEnded { .. } => log::info!("[{label}] {event}"),
            e if e.is_private() => log::trace!("[{label}] {event}"),
            _ => log::debug!("[{label}] {event}"),
        }
    }
}

/// Keeps every event in memory.
///
/// Clones share the same buffer, so a test can hand one clone to the engine
/// and inspect the other.
///
/// ```
/// use secret_hitler_rl::events::{GameEvent, GameObserver, RecordingObserver};
/// use secret_hitler_rl::core::PlayerId;
///
/// let recorder = RecordingObserver::new();
/// let mut handle = recorder.clone();
/// handle.on_event(&GameEvent::PlayerExecuted { player: PlayerId::new(2) });
/// assert_eq!(recorder.len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RecordingObserver {
    events: Rc<RefCell<Vec<GameEvent>>>,
}

impl RecordingObserver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<GameEvent> {
        self.events.borrow().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Number of recorded events matching `pred`.
    pub fn count(&self, pred: impl Fn(&GameEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| pred(e)).count()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl GameObserver for RecordingObserver {
    fn on_event(&mut self, event: &GameEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}
