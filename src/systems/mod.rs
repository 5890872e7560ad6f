//! Systems module - all ECS systems for the bowling game.

pub mod debug;
pub mod hud;
pub mod input;
pub mod layout;
pub mod round;
pub mod scene;
pub mod vr;

use bevy::prelude::*;

use crate::resources::BowlingConfig;
use crate::types::InputScheme;

/// Run condition: the configured input scheme is `scheme`.
pub fn input_scheme_is(scheme: InputScheme) -> impl Fn(Res<BowlingConfig>) -> bool + Clone {
    move |config: Res<BowlingConfig>| config.input_scheme == scheme
}
