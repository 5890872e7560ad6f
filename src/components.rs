//! Core components for the bowling game.

use bevy::prelude::*;

use crate::types::Hand;

/// The bowling ball. Exactly one exists.
///
/// The entity also carries the avian rigid body, collider and velocity
/// components; this marker only identifies it.
#[derive(Component, Reflect, Default, Clone, Copy)]
#[reflect(Component)]
pub struct Ball;

/// A pin and the rack slot it returns to on every reset.
///
/// # Example
/// ```
/// use bevy_bowling::components::Pin;
///
/// let head_pin = Pin { slot: 0 };
/// assert_eq!(head_pin.slot, 0);
/// ```
#[derive(Component, Reflect, Default, Clone, Copy)]
#[reflect(Component)]
pub struct Pin {
    /// Index into the rack layout
    pub slot: usize,
}

/// Camera that follows the lane length on flat screens.
#[derive(Component, Reflect, Default, Clone, Copy)]
#[reflect(Component)]
pub struct LaneCamera;

/// A tracked VR controller.
///
/// Its `GlobalTransform` is driven by the XR backend; the grab systems
/// only read it.
#[derive(Component, Reflect, Default, Clone, Copy)]
#[reflect(Component)]
pub struct XrController {
    pub hand: Hand,
}

/// Text showing level and round.
#[derive(Component, Default)]
pub struct HudText;

/// Text showing the VR capability status.
#[derive(Component, Default)]
pub struct VrStatusText;

/// Transient message that fades out after a hold period.
///
/// # Fields
/// * `hold` - Runs while the message is fully visible
/// * `fade` - Runs while the message fades and slides up
#[derive(Component)]
pub struct Toast {
    pub hold: Timer,
    pub fade: Timer,
}

impl Toast {
    /// Distance the message slides up while fading (px).
    pub const SLIDE: f32 = 20.0;

    pub fn new(hold_secs: f32, fade_secs: f32) -> Self {
        let mut toast = Self {
            hold: Timer::from_seconds(hold_secs, TimerMode::Once),
            fade: Timer::from_seconds(fade_secs.max(f32::EPSILON), TimerMode::Once),
        };
        toast.finish();
        toast
    }

    /// Show the message again from the start of the hold period.
    pub fn restart(&mut self) {
        self.hold.reset();
        self.fade.reset();
    }

    /// Jump to the fully faded state.
    pub fn finish(&mut self) {
        let hold = self.hold.duration();
        let fade = self.fade.duration();
        self.hold.set_elapsed(hold);
        self.fade.set_elapsed(fade);
    }

    /// Advance the toast and return `(opacity, upward offset in px)`.
    pub fn advance(&mut self, delta: std::time::Duration) -> (f32, f32) {
        if self.hold.elapsed() < self.hold.duration() {
            self.hold.tick(delta);
            return (1.0, 0.0);
        }
        self.fade.tick(delta);
        let t = self.fade.fraction();
        (1.0 - t, Self::SLIDE * t)
    }
}
