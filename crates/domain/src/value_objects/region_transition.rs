//! Outcome of evaluating one region transition.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionType {
    Enter,
    Exit,
}

/// Whether a subject may complete a move, and what to tell them.
///
/// Everything but the message is fixed at construction; the message can be
/// replaced by later composition passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionTransitionDecision {
    movement_allowed: bool,
    message: Option<String>,
    transition: TransitionType,
}

impl RegionTransitionDecision {
    pub fn allow(transition: TransitionType) -> Self {
        Self {
            movement_allowed: true,
            message: None,
            transition,
        }
    }

    pub fn allow_with_message(transition: TransitionType, message: impl Into<String>) -> Self {
        Self {
            movement_allowed: true,
            message: Some(message.into()),
            transition,
        }
    }

    /// A denial always carries a message for the player.
    pub fn deny(transition: TransitionType, message: impl Into<String>) -> Self {
        Self {
            movement_allowed: false,
            message: Some(message.into()),
            transition,
        }
    }

    pub fn movement_allowed(&self) -> bool {
        self.movement_allowed
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn transition(&self) -> TransitionType {
        self.transition
    }

    pub fn set_message(&mut self, message: Option<String>) {
        self.message = message;
    }
}
