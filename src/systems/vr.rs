//! VR input adapter - controller grab and throw.
//!
//! Trigger squeezes come from the browser's XR session (through
//! [`XrSelectQueue`]) or from a gamepad, whose sticks also steer the
//! controllers when no tracking backend moves them.

use avian3d::prelude::*;
use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::components::{Ball, XrController};
use crate::events::{ControllerSelect, SelectPhase, ThrowLaunched};
use crate::platform::XrSelectQueue;
use crate::resources::{BowlingConfig, BowlingGame, ControllerGrab};
use crate::types::{Hand, ThrowPhase};

/// Turn queued XR session squeezes into [`ControllerSelect`] messages.
///
/// A squeeze goes to the controller entity for its hand; squeezes for a
/// hand with no controller are dropped.
pub fn forward_xr_selects(
    queue: Res<XrSelectQueue>,
    controllers: Query<(Entity, &XrController)>,
    mut selects: MessageWriter<ControllerSelect>,
) {
    for (hand, phase) in queue.drain() {
        let Some((controller, _)) = controllers.iter().find(|(_, c)| c.hand == hand) else {
            debug!("Dropped {:?} select for missing {:?} controller", phase, hand);
            continue;
        };
        selects.write(ControllerSelect { controller, phase });
    }
}

/// Drive the controllers from the first connected gamepad.
///
/// Each hand has its own trigger (`LeftTrigger2` / `RightTrigger2`) and
/// stick; stick X slides the controller sideways and stick Y pushes it
/// down the lane.
pub fn drive_gamepad_controllers(
    time: Res<Time>,
    config: Res<BowlingConfig>,
    gamepads: Query<&Gamepad>,
    mut controllers: Query<(Entity, &XrController, &mut Transform)>,
    mut selects: MessageWriter<ControllerSelect>,
) {
    let Some(gamepad) = gamepads.iter().next() else {
        return;
    };

    for (controller, xr, mut transform) in controllers.iter_mut() {
        let (trigger, stick) = match xr.hand {
            Hand::Left => (GamepadButton::LeftTrigger2, gamepad.left_stick()),
            Hand::Right => (GamepadButton::RightTrigger2, gamepad.right_stick()),
        };

        if stick.length() > config.gamepad_deadzone {
            let step = config.gamepad_reach_speed * time.delta_secs();
            transform.translation.x += stick.x * step;
            transform.translation.z -= stick.y * step;
        }

        if gamepad.just_pressed(trigger) {
            selects.write(ControllerSelect {
                controller,
                phase: SelectPhase::Start,
            });
        }
        if gamepad.just_released(trigger) {
            selects.write(ControllerSelect {
                controller,
                phase: SelectPhase::End,
            });
        }
    }
}

/// Apply controller trigger messages to the ball.
///
/// A trigger squeeze snaps the ball into the controller and overrides any
/// earlier grab. Squeezing while a scored throw rolls only stops the ball. Letting go throws the ball with the controller's
/// displacement since the grab, scaled, as a full 3D velocity.
pub fn drive_controller_grab(
    config: Res<BowlingConfig>,
    mut game: ResMut<BowlingGame>,
    mut grab: ResMut<ControllerGrab>,
    mut selects: MessageReader<ControllerSelect>,
    mut launched: MessageWriter<ThrowLaunched>,
    controllers: Query<&GlobalTransform, With<XrController>>,
    mut ball: Query<(&mut Transform, &mut LinearVelocity, &mut AngularVelocity), With<Ball>>,
) {
    let Ok((mut transform, mut linear, mut angular)) = ball.single_mut() else {
        return;
    };

    for select in selects.read() {
        let Ok(controller) = controllers.get(select.controller) else {
            warn!("Select from unknown controller {:?}", select.controller);
            continue;
        };
        let position = controller.translation();

        match select.phase {
            SelectPhase::Start => {
                if game.phase.is_settling() {
                    continue;
                }
                if matches!(game.phase, ThrowPhase::Rolling) {
                    // Stopping the ball ends the throw; it settles on the next tick.
                    linear.0 = Vec3::ZERO;
                    angular.0 = Vec3::ZERO;
                    continue;
                }
                grab.grab(select.controller, position);
                transform.translation = position;
                linear.0 = Vec3::ZERO;
                angular.0 = Vec3::ZERO;
                game.phase = ThrowPhase::Idle;
                debug!("Ball grabbed by {:?} at {:?}", select.controller, position);
            }
            SelectPhase::End => {
                let Some(velocity) =
                    grab.release(select.controller, position, config.vr_throw_scale)
                else {
                    continue;
                };
                linear.0 = velocity;
                let scored = config.scores_throws();
                if scored {
                    game.phase = ThrowPhase::Rolling;
                }
                info!("Ball thrown from controller with velocity {:?}", velocity);
                launched.write(ThrowLaunched { velocity, scored });
            }
        }
    }
}

/// Keep a held ball inside the controller that holds it.
///
/// Velocity is cleared every frame so gravity does not build up while held.
pub fn follow_holding_controller(
    grab: Res<ControllerGrab>,
    controllers: Query<&GlobalTransform, With<XrController>>,
    mut ball: Query<(&mut Transform, &mut LinearVelocity), With<Ball>>,
) {
    let Some(holder) = grab.holder() else {
        return;
    };
    let Ok(controller) = controllers.get(holder) else {
        return;
    };
    let Ok((mut transform, mut linear)) = ball.single_mut() else {
        return;
    };
    transform.translation = controller.translation();
    linear.0 = Vec3::ZERO;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_controllers() -> (Entity, Entity) {
        let mut world = World::new();
        (world.spawn_empty().id(), world.spawn_empty().id())
    }

    #[test]
    fn test_release_is_scaled_full_3d_displacement() {
        let (left, _) = two_controllers();
        let mut grab = ControllerGrab::default();
        grab.grab(left, Vec3::new(0.2, 1.0, 4.0));

        let velocity = grab.release(left, Vec3::new(0.3, 1.2, 3.5), 10.0).unwrap();
        assert!((velocity - Vec3::new(1.0, 2.0, -5.0)).length() < 1e-5);
        assert_eq!(grab, ControllerGrab::Idle);
    }

    #[test]
    fn test_last_grab_wins() {
        let (left, right) = two_controllers();
        let mut grab = ControllerGrab::default();
        grab.grab(left, Vec3::ZERO);
        grab.grab(right, Vec3::ONE);

        assert_eq!(grab.holder(), Some(right));
        // The overridden controller cannot throw
        assert_eq!(grab.release(left, Vec3::X, 10.0), None);
        assert_eq!(grab.release(right, Vec3::ONE, 10.0), Some(Vec3::ZERO));
    }

    #[test]
    fn test_release_while_idle() {
        let (left, _) = two_controllers();
        let mut grab = ControllerGrab::Idle;
        assert_eq!(grab.release(left, Vec3::ONE, 10.0), None);
    }
}
