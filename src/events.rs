//! Messages exchanged between the input adapters, the round state machine
//! and the HUD.
//!
//! Note: In Bevy 0.18, buffered events use the `Message` trait instead of `Event`.

use bevy::ecs::message::Message;
use bevy::prelude::*;

use crate::types::RoundOutcome;

/// Phase of a pointer interaction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PointerPhase {
    Pressed,
    Moved,
    Released,
}

/// A pointer (mouse or primary touch) event on the game surface.
///
/// # Fields
/// * `phase` - Press, move or release
/// * `position` - Pointer position in logical pixels, origin top-left, Y down
///
/// # Example
/// ```
/// use bevy::prelude::*;
/// use bevy_bowling::events::{PointerInput, PointerPhase};
///
/// let press = PointerInput::new(PointerPhase::Pressed, Vec2::new(400.0, 300.0));
/// assert_eq!(press.phase, PointerPhase::Pressed);
/// ```
#[derive(Message, Clone, Copy, Debug)]
pub struct PointerInput {
    pub phase: PointerPhase,
    pub position: Vec2,
}

impl PointerInput {
    pub fn new(phase: PointerPhase, position: Vec2) -> Self {
        Self { phase, position }
    }
}

/// Phase of a controller trigger squeeze.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SelectPhase {
    Start,
    End,
}

/// Trigger squeeze on a tracked controller, sent by the XR backend.
#[derive(Message, Clone, Copy, Debug)]
pub struct ControllerSelect {
    /// Entity carrying `XrController`
    pub controller: Entity,
    pub phase: SelectPhase,
}

/// Sent when the ball is released with a launch velocity.
#[derive(Message, Clone, Copy, Debug)]
pub struct ThrowLaunched {
    pub velocity: Vec3,
    /// Whether the round state machine is tracking this throw
    pub scored: bool,
}

/// Sent when a settle evaluation has updated the counters.
///
/// The lane reset listens for this.
#[derive(Message, Clone, Copy, Debug)]
pub struct RoundScored(pub RoundOutcome);

/// Show a transient message to the player.
#[derive(Message, Clone, Debug)]
pub struct ShowMessage(pub String);
