//! Outbound "decision started" / "decision completed" hooks.
//!
//! Delivery is fire-and-forget: the engine logs sink failures and carries
//! on, a notification problem never changes a decision's outcome.

use munch_core::model::Decision;
use munch_core::DecisionId;
use std::sync::Mutex;

#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("event transport unavailable: {0}")]
    Transport(String),
}

pub trait DecisionEvents: Send + Sync {
    fn decision_started(&self, decision: &Decision) -> Result<(), EventError>;
    fn decision_completed(&self, decision: &Decision) -> Result<(), EventError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEvents;

impl DecisionEvents for NoopEvents {
    fn decision_started(&self, _decision: &Decision) -> Result<(), EventError> {
        Ok(())
    }

    fn decision_completed(&self, _decision: &Decision) -> Result<(), EventError> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionEvent {
    Started(DecisionId),
    Completed(DecisionId),
}

/// Keeps every event in memory, in emission order.
#[derive(Debug, Default)]
pub struct RecordingEvents {
    events: Mutex<Vec<DecisionEvent>>,
}

impl RecordingEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DecisionEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn push(&self, event: DecisionEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }
}

impl DecisionEvents for RecordingEvents {
    fn decision_started(&self, decision: &Decision) -> Result<(), EventError> {
        self.push(DecisionEvent::Started(decision.id.clone()));
        Ok(())
    }

    fn decision_completed(&self, decision: &Decision) -> Result<(), EventError> {
        self.push(DecisionEvent::Completed(decision.id.clone()));
        Ok(())
    }
}
