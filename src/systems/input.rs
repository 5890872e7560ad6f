//! Desktop input adapter - pointer drag to aim, release to throw.

use avian3d::prelude::*;
use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::components::Ball;
use crate::events::{PointerInput, PointerPhase, ThrowLaunched};
use crate::resources::{BowlingConfig, BowlingGame, PointerDrag};
use crate::types::ThrowPhase;

/// Translate mouse and primary-touch input into [`PointerInput`] messages.
///
/// The last known pointer position is kept so a release outside the
/// window still ends the drag.
pub fn emit_pointer_input(
    mouse: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut last_position: Local<Option<Vec2>>,
    mut pointer: MessageWriter<PointerInput>,
) {
    if let Some(cursor) = windows.single().ok().and_then(Window::cursor_position) {
        *last_position = Some(cursor);
    }

    if let Some(position) = *last_position {
        if mouse.just_pressed(MouseButton::Left) {
            pointer.write(PointerInput::new(PointerPhase::Pressed, position));
        } else if mouse.pressed(MouseButton::Left) {
            pointer.write(PointerInput::new(PointerPhase::Moved, position));
        }
        if mouse.just_released(MouseButton::Left) {
            pointer.write(PointerInput::new(PointerPhase::Released, position));
        }
    }

    for touch in touches.iter_just_pressed() {
        pointer.write(PointerInput::new(PointerPhase::Pressed, touch.position()));
    }
    for touch in touches.iter() {
        if !touches.just_pressed(touch.id()) {
            pointer.write(PointerInput::new(PointerPhase::Moved, touch.position()));
        }
    }
    for touch in touches.iter_just_released() {
        pointer.write(PointerInput::new(PointerPhase::Released, touch.position()));
    }
}

/// Apply pointer messages to the ball through the [`PointerDrag`] state machine.
///
/// - Press: capture pointer and ball and stop the ball; pressing on a
///   rolling ball only stops it, and that throw is scored as it lies
/// - Move: slide the ball on the X/Z plane (aiming, not a physical drag)
/// - Release: launch with the scaled pointer displacement, Y velocity zero
///
/// Presses are ignored while a settle evaluation is pending; a release
/// without a matching press does nothing.
pub fn drive_pointer_drag(
    config: Res<BowlingConfig>,
    mut game: ResMut<BowlingGame>,
    mut drag: ResMut<PointerDrag>,
    mut pointer: MessageReader<PointerInput>,
    mut launched: MessageWriter<ThrowLaunched>,
    mut ball: Query<(&mut Transform, &mut LinearVelocity, &mut AngularVelocity), With<Ball>>,
) {
    let Ok((mut transform, mut linear, mut angular)) = ball.single_mut() else {
        return;
    };

    for input in pointer.read() {
        match input.phase {
            PointerPhase::Pressed => {
                if game.phase.is_settling() {
                    continue;
                }
                if matches!(game.phase, ThrowPhase::Rolling) {
                    // Stopping the ball ends the throw; it settles on the next tick.
                    linear.0 = Vec3::ZERO;
                    angular.0 = Vec3::ZERO;
                    debug!("Rolling ball stopped at {:?}", transform.translation);
                    continue;
                }
                drag.press(input.position, transform.translation);
                linear.0 = Vec3::ZERO;
                angular.0 = Vec3::ZERO;
                game.phase = ThrowPhase::Idle;
                debug!("Ball grabbed at {:?}", transform.translation);
            }
            PointerPhase::Moved => {
                if let Some(target) = drag.aim(input.position, config.aim_scale) {
                    transform.translation = target;
                }
            }
            PointerPhase::Released => {
                let Some(velocity) = drag.release(input.position, config.throw_scale) else {
                    continue;
                };
                linear.0 = velocity;
                game.phase = ThrowPhase::Rolling;
                info!("Ball thrown with velocity {:?}", velocity);
                launched.write(ThrowLaunched {
                    velocity,
                    scored: true,
                });
            }
        }
    }
}
