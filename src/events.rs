//! Discrete notifications and the listener registry that delivers them.

use std::error::Error;

use crate::diagnostics::{Diagnostic, DiagnosticOrigin, DiagnosticSink};
use crate::food::FoodKind;
use crate::score::ScoreSummary;
use crate::snake::Position;

/// Why a game ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameOverReason {
    WallCollision,
    SelfCollision,
    /// The snake covers every cell; nothing is left to spawn on.
    BoardFull,
}

/// Notifications emitted by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    GameStarted,
    GamePaused,
    GameResumed,
    GameOver {
        reason: GameOverReason,
        summary: ScoreSummary,
    },
    SnakeAdvanced {
        head: Position,
        length: usize,
    },
    FoodConsumed {
        position: Position,
        kind: FoodKind,
        points: u32,
    },
    ScoreUpdated(ScoreSummary),
    GameReset,
}

/// Outcome of one listener call. An `Err` is reported, never propagated.
pub type ListenerResult = Result<(), Box<dyn Error>>;

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct SubscriptionId(u64);

type Listener<T> = Box<dyn FnMut(&T) -> ListenerResult>;

/// Ordered registry of listeners for events of type `T`.
pub struct EventBus<T> {
    listeners: Vec<(SubscriptionId, Listener<T>)>,
    next_id: u64,
}

impl<T> Default for EventBus<T> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }
}

impl<T> EventBus<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener`; it is called after every earlier subscriber.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&T) -> ListenerResult + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns false when `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Delivers `event` to every listener. A failing listener is reported to
    /// `diagnostics` and delivery carries on with the next one.
    pub fn publish(&mut self, event: &T, diagnostics: &dyn DiagnosticSink) {
        for (id, listener) in &mut self.listeners {
            if let Err(error) = listener(event) {
                diagnostics.report(Diagnostic::new(
                    DiagnosticOrigin::Listener,
                    format!("listener {} failed: {error}", id.0),
                ));
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
