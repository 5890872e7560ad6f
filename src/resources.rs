//! Global resources for the bowling game.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::types::{InputScheme, RoundOutcome, ThrowPhase, VrCapability};

/// Tunable constants of the lane, the bodies and the game loop.
///
/// Every literal the game uses lives here so a host can override them
/// (the type is serde-compatible for loading from a settings file).
///
/// # Example
/// ```
/// use bevy_bowling::resources::BowlingConfig;
///
/// let config = BowlingConfig {
///     rounds_max: 10,
///     ..Default::default()
/// };
/// assert_eq!(config.pin_count(), 10);
/// ```
#[derive(Resource, Reflect, Clone, Debug, Serialize, Deserialize)]
#[reflect(Resource)]
pub struct BowlingConfig {
    /// Which input adapter drives the ball
    pub input_scheme: InputScheme,
    /// Rounds per game before the counters wrap
    pub rounds_max: u32,

    /// Ball sphere radius (m)
    pub ball_radius: f32,
    /// Ball mass (kg)
    pub ball_mass: f32,
    /// Ball linear damping
    pub ball_linear_damping: f32,
    /// Ball spawn Z before the per-level offset
    pub ball_base_z: f32,

    /// Camera eye height (m)
    pub camera_height: f32,
    /// Camera Z before the per-level offset
    pub camera_base_z: f32,
    /// Extra lane length added per level, for both ball and camera
    pub level_step: f32,

    /// Pin height (m)
    pub pin_height: f32,
    /// Pin top radius (m)
    pub pin_top_radius: f32,
    /// Pin bottom radius (m)
    pub pin_bottom_radius: f32,
    /// Pin mass (kg)
    pub pin_mass: f32,
    pub pin_friction: f32,
    pub pin_restitution: f32,

    /// Rows in the triangular rack
    pub rack_rows: usize,
    /// Spacing between pins and between rows
    pub rack_spacing: f32,
    /// Z of the head pin on a flat screen
    pub rack_front_z: f32,
    /// Z of the head pin in VR
    pub rack_front_z_vr: f32,

    /// Ball Z past which a throw is over
    pub far_boundary_z: f32,
    /// Ball speed under which a throw is over (m/s)
    pub settle_speed: f32,
    /// Delay between settle detection and pin counting (s)
    pub settle_delay: f32,
    /// Up-axis dot product under which a pin is fallen
    pub fallen_threshold: f32,

    /// Pointer pixels to metres while aiming
    pub aim_scale: f32,
    /// Pointer pixels to m/s on release
    pub throw_scale: f32,
    /// Controller displacement to m/s on release
    pub vr_throw_scale: f32,
    /// Whether VR throws run through the round state machine
    pub score_vr_throws: bool,

    /// How long a toast stays fully visible (s)
    pub message_hold: f32,
    /// Duration of the toast fade-out (s)
    pub message_fade: f32,

    /// Stick deflection ignored when steering gamepad controllers
    pub gamepad_deadzone: f32,
    /// Gamepad controller travel at full stick deflection (m/s)
    pub gamepad_reach_speed: f32,

    /// Draw settle boundary and pin axes
    pub debug_draw: bool,
}

impl Default for BowlingConfig {
    fn default() -> Self {
        Self {
            input_scheme: InputScheme::Desktop,
            rounds_max: 5,
            ball_radius: 0.15,
            ball_mass: 1.0,
            ball_linear_damping: 0.31,
            ball_base_z: 2.0,
            camera_height: 1.6,
            camera_base_z: 5.0,
            level_step: 1.5,
            pin_height: 0.4,
            pin_top_radius: 0.08,
            pin_bottom_radius: 0.1,
            pin_mass: 0.3,
            pin_friction: 0.5,
            pin_restitution: 0.2,
            rack_rows: 4,
            rack_spacing: 0.5,
            rack_front_z: -5.0,
            rack_front_z_vr: -4.5,
            far_boundary_z: -7.0,
            settle_speed: 0.05,
            settle_delay: 2.5,
            fallen_threshold: 0.7,
            aim_scale: 0.01,
            throw_scale: 0.4,
            vr_throw_scale: 10.0,
            score_vr_throws: true,
            message_hold: 1.5,
            message_fade: 0.3,
            gamepad_deadzone: 0.15,
            gamepad_reach_speed: 1.5,
            debug_draw: false,
        }
    }
}

impl BowlingConfig {
    /// Configuration for the tracked-controller variant.
    pub fn vr() -> Self {
        Self {
            input_scheme: InputScheme::Vr,
            ..Default::default()
        }
    }

    /// Number of pins in a full rack (triangular number of `rack_rows`).
    pub fn pin_count(&self) -> usize {
        self.rack_rows * (self.rack_rows + 1) / 2
    }

    /// Z of the head pin for the configured input scheme.
    pub fn rack_front(&self) -> f32 {
        match self.input_scheme {
            InputScheme::Desktop => self.rack_front_z,
            InputScheme::Vr => self.rack_front_z_vr,
        }
    }

    /// Ball position for the opening throw of a session.
    ///
    /// The level offset only applies from the first reset on.
    pub fn opening_ball_spawn(&self) -> Vec3 {
        self.ball_spawn(0)
    }

    /// Camera position for the opening throw of a session.
    pub fn opening_camera_position(&self) -> Vec3 {
        self.camera_position(0)
    }

    /// Ball spawn point after a reset at the given level.
    pub fn ball_spawn(&self, level: u32) -> Vec3 {
        Vec3::new(
            0.0,
            self.ball_radius,
            self.ball_base_z + level as f32 * self.level_step,
        )
    }

    /// Camera position for the given level (flat-screen only).
    pub fn camera_position(&self, level: u32) -> Vec3 {
        Vec3::new(
            0.0,
            self.camera_height,
            self.camera_base_z + level as f32 * self.level_step,
        )
    }

    /// Whether a release from the active input scheme starts a scored throw.
    pub fn scores_throws(&self) -> bool {
        match self.input_scheme {
            InputScheme::Desktop => true,
            InputScheme::Vr => self.score_vr_throws,
        }
    }
}

/// Image URLs for the lane textures.
///
/// `https://` paths go through Bevy's web asset source. A failed download
/// is reported by the asset server and the mesh keeps its base colour.
#[derive(Resource, Clone, Debug, Serialize, Deserialize)]
pub struct LaneTextures {
    pub background: String,
    pub floor: String,
    pub lane: String,
    pub ball: String,
    pub pin: String,
}

impl Default for LaneTextures {
    fn default() -> Self {
        const BASE: &str = "https://threejs.org/examples/textures";
        Self {
            background: format!("{BASE}/2294472375_24a3b8ef46_o.jpg"),
            floor: format!("{BASE}/terrain/grasslight-big.jpg"),
            lane: format!("{BASE}/hardwood2_diffuse.jpg"),
            ball: format!("{BASE}/metal.jpg"),
            pin: format!("{BASE}/brick_diffuse.jpg"),
        }
    }
}

/// Round and level counters plus the phase of the current throw.
///
/// Only the fixed-tick round systems and the input adapters touch this,
/// all from the main schedule, so no locking is involved. The `Settling`
/// phase keeps a second evaluation from being scheduled while one is
/// pending.
#[derive(Resource, Clone, Debug)]
pub struct BowlingGame {
    /// Current round, in `1..=rounds_max`
    pub round: u32,
    /// Current level, starting at 1
    pub level: u32,
    /// Rounds per game
    pub rounds_max: u32,
    /// Phase of the current throw
    pub phase: ThrowPhase,
}

impl FromWorld for BowlingGame {
    fn from_world(world: &mut World) -> Self {
        let rounds_max = world
            .get_resource::<BowlingConfig>()
            .map(|config| config.rounds_max)
            .unwrap_or_else(|| BowlingConfig::default().rounds_max);
        Self::new(rounds_max)
    }
}

impl BowlingGame {
    /// Fresh game at round 1, level 1.
    pub fn new(rounds_max: u32) -> Self {
        Self {
            round: 1,
            level: 1,
            rounds_max: rounds_max.max(1),
            phase: ThrowPhase::Idle,
        }
    }

    /// Apply a settle evaluation to the counters.
    ///
    /// The level goes up by one exactly when every pin fell. The round
    /// always advances; past `rounds_max` both counters go back to 1.
    ///
    /// # Arguments
    /// * `fallen` - Pins judged fallen on this throw
    /// * `pin_count` - Pins in a full rack
    ///
    /// # Example
    /// ```
    /// use bevy_bowling::resources::BowlingGame;
    ///
    /// let mut game = BowlingGame::new(5);
    /// let outcome = game.record_throw(10, 10);
    /// assert_eq!(outcome.level_reached, Some(2));
    /// assert_eq!(game.round, 2);
    /// ```
    pub fn record_throw(&mut self, fallen: usize, pin_count: usize) -> RoundOutcome {
        let level_reached = if pin_count > 0 && fallen == pin_count {
            self.level += 1;
            Some(self.level)
        } else {
            None
        };

        self.round += 1;
        let game_over = self.round > self.rounds_max;
        if game_over {
            self.round = 1;
            self.level = 1;
        }

        RoundOutcome {
            fallen,
            level_reached,
            game_over,
            round: self.round,
            level: self.level,
        }
    }

    /// HUD text for the current counters.
    pub fn hud_text(&self) -> String {
        format!(
            "Level: {}\nRound: {}/{}",
            self.level, self.round, self.rounds_max
        )
    }
}

/// Flat-screen aiming state.
///
/// Pressing captures the pointer and the ball position; moving slides the
/// ball on the X/Z plane; releasing turns the pointer displacement into a
/// horizontal launch velocity.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub enum PointerDrag {
    #[default]
    Idle,
    Dragging {
        /// Pointer position at press (screen pixels, Y down)
        pointer_origin: Vec2,
        /// Ball position at press
        ball_origin: Vec3,
    },
}

impl PointerDrag {
    /// Start aiming from `pointer` with the ball at `ball`.
    pub fn press(&mut self, pointer: Vec2, ball: Vec3) {
        *self = Self::Dragging {
            pointer_origin: pointer,
            ball_origin: ball,
        };
    }

    /// Ball position for the pointer at `pointer`, or `None` when idle.
    ///
    /// Screen X maps to world X and screen Y (downwards) to world Z
    /// (towards the player). The ball height is left untouched.
    pub fn aim(&self, pointer: Vec2, scale: f32) -> Option<Vec3> {
        match *self {
            Self::Idle => None,
            Self::Dragging {
                pointer_origin,
                ball_origin,
            } => {
                let delta = (pointer - pointer_origin) * scale;
                Some(Vec3::new(
                    ball_origin.x + delta.x,
                    ball_origin.y,
                    ball_origin.z + delta.y,
                ))
            }
        }
    }

    /// Finish aiming and return the launch velocity, or `None` when idle.
    pub fn release(&mut self, pointer: Vec2, scale: f32) -> Option<Vec3> {
        let Self::Dragging { pointer_origin, .. } = std::mem::take(self) else {
            return None;
        };
        let delta = (pointer - pointer_origin) * scale;
        Some(Vec3::new(delta.x, 0.0, delta.y))
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }
}

/// Tracked-controller grab state.
///
/// Whichever controller last squeezed its trigger owns the ball.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub enum ControllerGrab {
    #[default]
    Idle,
    Held {
        /// Controller holding the ball
        controller: Entity,
        /// Controller world position at grab time
        grab_position: Vec3,
    },
}

impl ControllerGrab {
    /// Take the ball with `controller`, overriding any previous grab.
    pub fn grab(&mut self, controller: Entity, position: Vec3) {
        *self = Self::Held {
            controller,
            grab_position: position,
        };
    }

    /// Controller currently holding the ball.
    pub fn holder(&self) -> Option<Entity> {
        match *self {
            Self::Idle => None,
            Self::Held { controller, .. } => Some(controller),
        }
    }

    /// Release the ball from `controller` at `position`.
    ///
    /// Returns the full 3D launch velocity. A release from a controller that
    /// is not holding the ball is ignored.
    pub fn release(&mut self, controller: Entity, position: Vec3, scale: f32) -> Option<Vec3> {
        match *self {
            Self::Held {
                controller: holder,
                grab_position,
            } if holder == controller => {
                *self = Self::Idle;
                Some((position - grab_position) * scale)
            }
            _ => None,
        }
    }
}

/// Latest known VR capability of the host.
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct VrSupport {
    pub capability: VrCapability,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_textures_load_over_https() {
        let textures = LaneTextures::default();
        for url in [
            &textures.background,
            &textures.floor,
            &textures.lane,
            &textures.ball,
            &textures.pin,
        ] {
            assert!(url.starts_with("https://"), "{url}");
            assert!(url.ends_with(".jpg"), "{url}");
        }
    }
}
