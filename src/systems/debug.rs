//! Debug overlay - lane gizmos behind an F3 toggle.

use bevy::prelude::*;

use crate::components::{Ball, Pin};
use crate::resources::BowlingConfig;
use crate::systems::round::is_pin_fallen;

/// Toggle the debug overlay with F3.
pub fn toggle_debug_draw(keyboard: Res<ButtonInput<KeyCode>>, mut config: ResMut<BowlingConfig>) {
    if keyboard.just_pressed(KeyCode::F3) {
        config.debug_draw = !config.debug_draw;
    }
}

/// Draw debug gizmos for the lane.
///
/// Shows the far settle boundary, the ball velocity and each pin's up axis,
/// red once the pin counts as fallen.
pub fn draw_lane_debug(
    mut gizmos: Gizmos,
    config: Res<BowlingConfig>,
    ball: Query<(&Transform, &avian3d::prelude::LinearVelocity), With<Ball>>,
    pins: Query<&Transform, With<Pin>>,
) {
    if !config.debug_draw {
        return;
    }

    let z = config.far_boundary_z;
    gizmos.line(
        Vec3::new(-2.0, 0.02, z),
        Vec3::new(2.0, 0.02, z),
        Color::srgb(1.0, 1.0, 0.0),
    );

    for (transform, velocity) in ball.iter() {
        gizmos.sphere(transform.translation, config.ball_radius, Color::srgb(0.0, 0.6, 1.0));
        let end = transform.translation + velocity.0 * 0.25;
        gizmos.line(transform.translation, end, Color::srgb(0.0, 1.0, 0.0));
    }

    for transform in pins.iter() {
        let color = if is_pin_fallen(transform.rotation, config.fallen_threshold) {
            Color::srgb(1.0, 0.0, 0.0)
        } else {
            Color::srgb(0.0, 1.0, 0.0)
        };
        let up = transform.rotation * Vec3::Y * config.pin_height;
        gizmos.line(transform.translation, transform.translation + up, color);
    }
}
