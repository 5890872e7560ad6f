//! # Bevy Bowling
//!
//! A ten-pin bowling mini-game for Bevy 0.18 with avian3d rigid bodies.
//!
//! ## Features
//! - Triangular ten-pin rack rebuilt identically every round
//! - Round/level state machine with delayed pin counting
//! - Desktop pointer drag-and-release throwing
//! - VR controller grab-and-throw (fed by any XR backend)
//! - HUD, fading toast messages and a WebXR capability probe
//!
//! ## Quick Start
//! ```rust,no_run
//! use avian3d::prelude::*;
//! use bevy::prelude::*;
//! use bevy_bowling::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(PhysicsPlugins::default())
//!         .add_plugins(BowlingPluginGroup)
//!         .run();
//! }
//! ```

pub mod components;
pub mod events;
pub mod platform;
pub mod resources;
pub mod systems;
pub mod types;


pub mod prelude {
    pub use crate::components::*;
    pub use crate::events::*;
    pub use crate::platform::{EnterVrButton, XrSelectQueue};
    pub use crate::resources::*;
    pub use crate::types::*;
    pub use crate::BowlingPluginGroup;
    pub use crate::{
        BowlingDebugPlugin, BowlingHudPlugin, BowlingInputPlugin, BowlingPhysicsPlugin,
        BowlingRoundPlugin, BowlingScenePlugin,
    };
}

use avian3d::prelude::Gravity;
use bevy::prelude::*;

use crate::systems::input_scheme_is;
use crate::types::InputScheme;

/// Main plugin group that includes every part of the game.
///
/// Insert a custom [`resources::BowlingConfig`] before adding the group;
/// the avian `PhysicsPlugins` are left to the host.
///
/// # Example
/// ```no_run
/// use avian3d::prelude::*;
/// use bevy::prelude::*;
/// use bevy_bowling::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(PhysicsPlugins::default())
///     .insert_resource(BowlingConfig::vr())
///     .add_plugins(BowlingPluginGroup)
///     .run();
/// ```
#[derive(Default)]
pub struct BowlingPluginGroup;

impl PluginGroup for BowlingPluginGroup {
    fn build(self) -> bevy::app::PluginGroupBuilder {
        bevy::app::PluginGroupBuilder::start::<Self>()
            .add(BowlingPhysicsPlugin)
            .add(BowlingRoundPlugin)
            .add(BowlingInputPlugin)
            .add(BowlingScenePlugin)
            .add(BowlingHudPlugin)
            .add(BowlingDebugPlugin)
    }
}

/// Physics world settings: gravity and the fixed 60 Hz step.
pub struct BowlingPhysicsPlugin;

impl Plugin for BowlingPhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Gravity(Vec3::new(0.0, -9.82, 0.0)))
            .insert_resource(Time::<Fixed>::from_hz(60.0));
    }
}

/// Round/score state machine.
///
/// # Systems
/// - `detect_settled_throw` - Polls the rolling ball for the settle condition
/// - `evaluate_settled_throw` - Counts pins once the settle delay has passed
/// - `reset_lane` - Puts ball, pins and camera back for the next round
pub struct BowlingRoundPlugin;

impl Plugin for BowlingRoundPlugin {
    fn build(&self, app: &mut App) {
        register_shared(app);
        app.add_systems(
            FixedUpdate,
            (
                systems::round::detect_settled_throw,
                systems::round::evaluate_settled_throw,
                systems::round::reset_lane,
            )
                .chain(),
        );
    }
}

/// Input adapters, each active only for its configured scheme.
///
/// # Systems
/// - `emit_pointer_input` - Mouse/touch to [`events::PointerInput`] (needs the input plugin)
/// - `drive_pointer_drag` - Desktop aim and throw
/// - `drive_gamepad_controllers` - Gamepad triggers and sticks as VR controllers
/// - `forward_xr_selects` - Browser XR session squeezes to [`events::ControllerSelect`]
/// - `drive_controller_grab` - VR grab and throw
/// - `follow_holding_controller` - Keeps a held ball in the controller
pub struct BowlingInputPlugin;

impl Plugin for BowlingInputPlugin {
    fn build(&self, app: &mut App) {
        register_shared(app);
        app.add_systems(
            Update,
            (
                systems::input::emit_pointer_input.run_if(
                    resource_exists::<ButtonInput<MouseButton>>.and(resource_exists::<Touches>),
                ),
                systems::input::drive_pointer_drag,
            )
                .chain()
                .run_if(input_scheme_is(InputScheme::Desktop)),
        )
        .add_systems(
            Update,
            (
                systems::vr::drive_gamepad_controllers,
                systems::vr::forward_xr_selects,
                systems::vr::drive_controller_grab,
                systems::vr::follow_holding_controller,
            )
                .chain()
                .run_if(input_scheme_is(InputScheme::Vr)),
        );
    }
}

/// Lane scenery, camera, ball and pins.
pub struct BowlingScenePlugin;

impl Plugin for BowlingScenePlugin {
    fn build(&self, app: &mut App) {
        register_shared(app);
        app.init_resource::<resources::LaneTextures>().add_systems(
            Startup,
            (
                systems::scene::setup_lane,
                systems::scene::setup_camera,
                systems::scene::setup_bodies,
            ),
        );
    }
}

/// HUD, toast messages, the VR status line and the enter-VR button.
pub struct BowlingHudPlugin;

impl Plugin for BowlingHudPlugin {
    fn build(&self, app: &mut App) {
        register_shared(app);
        app.init_resource::<resources::VrSupport>()
            .init_resource::<platform::EnterVrButton>()
            .add_systems(
                Startup,
                (platform::start_vr_probe, systems::hud::setup_hud),
            )
            .add_systems(
                Update,
                (
                    platform::poll_vr_probe,
                    platform::offer_enter_vr.run_if(input_scheme_is(InputScheme::Vr)),
                    systems::hud::update_hud,
                    systems::hud::show_messages,
                    systems::hud::animate_toasts,
                    systems::hud::update_vr_status,
                )
                    .chain(),
            );
    }
}

/// Debug plugin for lane visualization.
pub struct BowlingDebugPlugin;

impl Plugin for BowlingDebugPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<resources::BowlingConfig>().add_systems(
            Update,
            (
                systems::debug::toggle_debug_draw
                    .run_if(resource_exists::<ButtonInput<KeyCode>>),
                systems::debug::draw_lane_debug
                    .run_if(resource_exists::<bevy::gizmos::config::GizmoConfigStore>),
            )
                .chain(),
        );
    }
}

/// Resources, messages and reflected types every plugin relies on.
///
/// Safe to call from several plugins; existing resources are kept.
fn register_shared(app: &mut App) {
    app.register_type::<components::Ball>()
        .register_type::<components::Pin>()
        .register_type::<components::LaneCamera>()
        .register_type::<components::XrController>()
        .register_type::<resources::BowlingConfig>()
        .init_resource::<resources::BowlingConfig>()
        .init_resource::<resources::BowlingGame>()
        .init_resource::<resources::PointerDrag>()
        .init_resource::<resources::ControllerGrab>()
        .init_resource::<platform::XrSelectQueue>()
        .add_message::<events::PointerInput>()
        .add_message::<events::ControllerSelect>()
        .add_message::<events::ThrowLaunched>()
        .add_message::<events::RoundScored>()
        .add_message::<events::ShowMessage>();
}
