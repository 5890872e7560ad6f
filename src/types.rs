//! Common types and enums for the bowling game.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Which input adapter drives the ball.
///
/// The two schemes differ in more than input: the VR rack sits slightly
/// closer to the player and the camera is owned by the headset, so it is
/// never repositioned on level changes.
///
/// # Example
/// ```
/// use bevy_bowling::types::InputScheme;
///
/// assert_eq!(InputScheme::default(), InputScheme::Desktop);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Reflect, Serialize, Deserialize)]
pub enum InputScheme {
    /// Pointer drag-and-release on a flat screen
    #[default]
    Desktop,
    /// Tracked controller grab-and-throw
    Vr,
}

/// Phase of the current throw, as seen by the round state machine.
///
/// `Rolling` is the "throw active" flag, `Settling` is the "resetting"
/// flag: while the settle timer is pending no second evaluation can be
/// scheduled.
#[derive(Clone, Debug, Default)]
pub enum ThrowPhase {
    /// No throw in flight, input may start one
    #[default]
    Idle,
    /// Ball released, polled every fixed tick for the settle condition
    Rolling,
    /// Settle detected, evaluation fires when the timer finishes
    Settling {
        /// One-shot delay before pins are counted
        timer: Timer,
    },
}

impl ThrowPhase {
    /// Whether a throw is active (rolling or waiting for evaluation).
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Whether a settle evaluation is pending.
    pub fn is_settling(&self) -> bool {
        matches!(self, Self::Settling { .. })
    }
}

/// Result of probing the browser for immersive VR support.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Reflect)]
pub enum VrCapability {
    /// Probe still running
    #[default]
    Probing,
    /// `immersive-vr` sessions are supported
    Supported,
    /// WebXR exists but no headset is available
    NoHeadset,
    /// No WebXR at all (or the probe failed)
    Unsupported,
}

impl VrCapability {
    /// Status line shown in the bottom-left corner.
    pub fn status_text(&self) -> &'static str {
        match self {
            Self::Probing => "Loading VR...",
            Self::Supported => "VR available",
            Self::NoHeadset => "WebXR active but no headset",
            Self::Unsupported => "This browser does not support VR",
        }
    }

    /// Colour of the status line.
    pub fn status_color(&self) -> Color {
        match self {
            Self::Probing => Color::srgb(1.0, 0.65, 0.0),
            Self::Supported => Color::srgb(0.0, 1.0, 0.0),
            Self::NoHeadset => Color::srgb(1.0, 0.67, 0.0),
            Self::Unsupported => Color::srgb(1.0, 0.0, 0.0),
        }
    }
}

/// Hand a tracked controller is held in.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Reflect)]
pub enum Hand {
    Left,
    #[default]
    Right,
}

impl Hand {
    /// Hand for a WebXR `handedness` string.
    ///
    /// Sources without a side (`"none"`, gaze or screen input) count as the
    /// right hand.
    ///
    /// # Example
    /// ```
    /// use bevy_bowling::types::Hand;
    ///
    /// assert_eq!(Hand::from_handedness("left"), Hand::Left);
    /// assert_eq!(Hand::from_handedness("none"), Hand::Right);
    /// ```
    pub fn from_handedness(handedness: &str) -> Self {
        match handedness {
            "left" => Self::Left,
            _ => Self::Right,
        }
    }
}

/// Outcome of a single settle evaluation.
///
/// # Fields
/// * `fallen` - Number of pins judged fallen
/// * `level_reached` - Level announced after a strike, before any game-over reset
/// * `game_over` - Round counter wrapped, game restarted at level 1
/// * `round` - Round counter after the evaluation
/// * `level` - Level counter after the evaluation
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RoundOutcome {
    pub fallen: usize,
    pub level_reached: Option<u32>,
    pub game_over: bool,
    pub round: u32,
    pub level: u32,
}

impl RoundOutcome {
    /// Whether every pin fell on this throw.
    pub fn level_up(&self) -> bool {
        self.level_reached.is_some()
    }

    /// Toast messages for this outcome, in display order.
    ///
    /// The toast shows one message at a time, so when a game ends the
    /// "game over" text is the one left on screen.
    pub fn messages(&self) -> Vec<String> {
        let mut messages = Vec::with_capacity(2);
        match self.level_reached {
            Some(level) => messages.push(format!("¡Nivel {level} alcanzado!")),
            None => messages.push(format!("Tiraste {} pino(s)", self.fallen)),
        }
        if self.game_over {
            messages.push("Juego terminado".to_string());
        }
        messages
    }
}
