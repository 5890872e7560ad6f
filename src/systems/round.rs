//! Round state machine - settle detection, pin counting and lane reset.

use avian3d::prelude::*;
use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::components::{Ball, LaneCamera, Pin};
use crate::events::{RoundScored, ShowMessage};
use crate::resources::{BowlingConfig, BowlingGame, ControllerGrab, PointerDrag};
use crate::systems::layout::{configured_rack, pin_home};
use crate::types::{InputScheme, ThrowPhase};

/// Whether a pin with the given orientation counts as knocked down.
///
/// The pin's local up axis is rotated into world space and compared with
/// world up; below `threshold` (0.7, about 45.6 degrees of tilt) it is down.
///
/// # Example
/// ```
/// use bevy::prelude::*;
/// use bevy_bowling::systems::round::is_pin_fallen;
///
/// assert!(!is_pin_fallen(Quat::IDENTITY, 0.7));
/// assert!(is_pin_fallen(Quat::from_rotation_x(std::f32::consts::FRAC_PI_2), 0.7));
/// ```
pub fn is_pin_fallen(rotation: Quat, threshold: f32) -> bool {
    (rotation * Vec3::Y).dot(Vec3::Y) < threshold
}

/// Count fallen pins among the given orientations.
pub fn count_fallen<I>(rotations: I, threshold: f32) -> usize
where
    I: IntoIterator<Item = Quat>,
{
    rotations
        .into_iter()
        .filter(|rotation| is_pin_fallen(*rotation, threshold))
        .count()
}

/// Whether a rolling ball has finished its throw.
///
/// A throw ends once the ball passes the far end of the lane or has all
/// but stopped.
pub fn throw_has_settled(position: Vec3, velocity: Vec3, config: &BowlingConfig) -> bool {
    position.z < config.far_boundary_z || velocity.length() < config.settle_speed
}

/// Poll the rolling ball and schedule the delayed evaluation once it settles.
///
/// Runs every fixed tick. Only a `Rolling` phase is inspected, so a pending
/// evaluation is never scheduled twice.
pub fn detect_settled_throw(
    config: Res<BowlingConfig>,
    mut game: ResMut<BowlingGame>,
    ball: Query<(&Transform, &LinearVelocity), With<Ball>>,
) {
    if !matches!(game.phase, ThrowPhase::Rolling) {
        return;
    }

    let Ok((transform, velocity)) = ball.single() else {
        warn!("Throw in progress but no ball found");
        return;
    };

    if throw_has_settled(transform.translation, velocity.0, &config) {
        info!(
            "Throw settled at z={:.2} (speed {:.3}), counting pins in {:.1}s",
            transform.translation.z,
            velocity.length(),
            config.settle_delay
        );
        game.phase = ThrowPhase::Settling {
            timer: Timer::from_seconds(config.settle_delay, TimerMode::Once),
        };
    }
}

/// Fire the pending settle evaluation when its delay has elapsed.
///
/// Counts fallen pins, advances the counters and announces the result. The
/// lane itself is reset by [`reset_lane`] in response to [`RoundScored`].
pub fn evaluate_settled_throw(
    time: Res<Time>,
    config: Res<BowlingConfig>,
    mut game: ResMut<BowlingGame>,
    mut scored: MessageWriter<RoundScored>,
    mut messages: MessageWriter<ShowMessage>,
    pins: Query<&Transform, With<Pin>>,
) {
    let ThrowPhase::Settling { timer } = &mut game.phase else {
        return;
    };
    timer.tick(time.delta());
    if !timer.just_finished() {
        return;
    }

    let fallen = count_fallen(
        pins.iter().map(|transform| transform.rotation),
        config.fallen_threshold,
    );
    let outcome = game.record_throw(fallen, config.pin_count());

    info!(
        "Round scored: {} pin(s) down, now level {} round {}/{}",
        outcome.fallen, outcome.level, outcome.round, game.rounds_max
    );
    if let Some(level) = outcome.level_reached {
        info!("Strike! Level {} reached", level);
    }
    if outcome.game_over {
        info!("Game over, restarting at level 1");
    }

    for text in outcome.messages() {
        messages.write(ShowMessage(text));
    }
    scored.write(RoundScored(outcome));
}

/// Put the ball, the pins and (on flat screens) the camera back in place
/// for the next round, then return the state machine to `Idle`.
#[allow(clippy::too_many_arguments, clippy::type_complexity)]
pub fn reset_lane(
    config: Res<BowlingConfig>,
    mut game: ResMut<BowlingGame>,
    mut drag: ResMut<PointerDrag>,
    mut grab: ResMut<ControllerGrab>,
    mut scored: MessageReader<RoundScored>,
    mut ball: Query<
        (&mut Transform, &mut LinearVelocity, &mut AngularVelocity),
        (With<Ball>, Without<Pin>),
    >,
    mut pins: Query<
        (&Pin, &mut Transform, &mut LinearVelocity, &mut AngularVelocity),
        Without<Ball>,
    >,
    mut camera: Query<&mut Transform, (With<LaneCamera>, Without<Ball>, Without<Pin>)>,
) {
    let Some(RoundScored(outcome)) = scored.read().last().copied() else {
        return;
    };

    if let Ok((mut transform, mut linear, mut angular)) = ball.single_mut() {
        *transform = Transform::from_translation(config.ball_spawn(outcome.level));
        linear.0 = Vec3::ZERO;
        angular.0 = Vec3::ZERO;
    } else {
        warn!("Lane reset without a ball");
    }

    if config.input_scheme == InputScheme::Desktop {
        for mut transform in camera.iter_mut() {
            transform.translation = config.camera_position(outcome.level);
        }
    }

    let rack = configured_rack(&config);
    for (pin, mut transform, mut linear, mut angular) in pins.iter_mut() {
        let Some(slot) = rack.get(pin.slot) else {
            continue;
        };
        *transform = pin_home(&config, *slot);
        linear.0 = Vec3::ZERO;
        angular.0 = Vec3::ZERO;
    }

    // A grab that started while the timer was pending is dropped with the reset.
    *drag = PointerDrag::Idle;
    *grab = ControllerGrab::Idle;
    game.phase = ThrowPhase::Idle;
    debug!("Lane reset for level {} round {}", outcome.level, outcome.round);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_upright_pin_is_standing() {
        assert!(!is_pin_fallen(Quat::IDENTITY, 0.7));
        // Spinning about the vertical axis does not tip a pin
        assert!(!is_pin_fallen(Quat::from_rotation_y(1.3), 0.7));
    }

    #[test]
    fn test_pin_on_its_side_is_fallen() {
        assert!(is_pin_fallen(Quat::from_rotation_x(FRAC_PI_2), 0.7));
        assert!(is_pin_fallen(Quat::from_rotation_z(-FRAC_PI_2), 0.7));
    }

    #[test]
    fn test_fallen_threshold_angle() {
        // cos(45°) ≈ 0.707 stays up, cos(46°) ≈ 0.695 goes down
        assert!(!is_pin_fallen(Quat::from_rotation_x(45f32.to_radians()), 0.7));
        assert!(is_pin_fallen(Quat::from_rotation_x(46f32.to_radians()), 0.7));
    }

    #[test]
    fn test_count_fallen() {
        let rotations = [
            Quat::IDENTITY,
            Quat::from_rotation_x(FRAC_PI_2),
            Quat::from_rotation_z(FRAC_PI_2),
            Quat::from_rotation_y(0.5),
        ];
        assert_eq!(count_fallen(rotations, 0.7), 2);
    }

    #[test]
    fn test_settle_conditions() {
        let config = BowlingConfig::default();
        let lane = Vec3::new(0.0, 0.15, -3.0);

        assert!(!throw_has_settled(lane, Vec3::new(0.0, 0.0, -2.0), &config));
        assert!(throw_has_settled(lane, Vec3::new(0.0, 0.0, -0.01), &config));
        assert!(throw_has_settled(
            Vec3::new(0.0, 0.15, -7.5),
            Vec3::new(0.0, 0.0, -4.0),
            &config
        ));
    }

    #[test]
    fn test_round_advances_by_one() {
        let mut game = BowlingGame::new(5);
        for expected in 2..=5 {
            let outcome = game.record_throw(3, 10);
            assert_eq!(outcome.round, expected);
            assert!(!outcome.game_over);
        }
    }

    #[test]
    fn test_level_increments_only_on_full_rack() {
        let mut game = BowlingGame::new(5);
        game.record_throw(9, 10);
        assert_eq!(game.level, 1);

        let outcome = game.record_throw(10, 10);
        assert_eq!(game.level, 2);
        assert!(outcome.level_up());
    }

    #[test]
    fn test_game_over_wraps_counters() {
        let mut game = BowlingGame::new(5);
        game.round = 5;
        game.level = 3;

        let outcome = game.record_throw(3, 10);
        assert!(outcome.game_over);
        assert_eq!(game.round, 1);
        assert_eq!(game.level, 1);
        assert_eq!(
            outcome.messages(),
            vec!["Tiraste 3 pino(s)".to_string(), "Juego terminado".to_string()]
        );
    }

    #[test]
    fn test_strike_at_level_two_moves_spawn_back() {
        let config = BowlingConfig::default();
        let mut game = BowlingGame::new(5);
        game.level = 2;

        let outcome = game.record_throw(10, 10);
        assert_eq!(outcome.level, 3);
        assert_eq!(outcome.messages(), vec!["¡Nivel 3 alcanzado!".to_string()]);
        assert!((config.ball_spawn(outcome.level).z - 6.5).abs() < 1e-6);
        assert!((config.camera_position(outcome.level).z - 9.5).abs() < 1e-6);
    }

    #[test]
    fn test_opening_marks_skip_level_offset() {
        let config = BowlingConfig::default();
        assert_eq!(config.opening_ball_spawn(), Vec3::new(0.0, 0.15, 2.0));
        assert_eq!(config.opening_camera_position(), Vec3::new(0.0, 1.6, 5.0));
        // The first reset at level 1 already carries one step
        assert!((config.ball_spawn(1).z - 3.5).abs() < 1e-6);
    }

    #[test]
    fn test_hud_text() {
        let game = BowlingGame::new(5);
        assert_eq!(game.hud_text(), "Level: 1\nRound: 1/5");
    }
}
