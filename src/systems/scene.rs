//! Scene setup - lane, lights, camera, ball and pins with their rigid bodies.

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::components::{Ball, LaneCamera, Pin, XrController};
use crate::resources::{BowlingConfig, LaneTextures};
use crate::systems::layout::{configured_rack, pin_home};
use crate::types::{Hand, InputScheme};

/// Spawn the static scenery: lights, floor, lane and backdrop.
pub fn setup_lane(
    mut commands: Commands,
    textures: Res<LaneTextures>,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // Key light above the pins
    commands.spawn((
        DirectionalLight {
            illuminance: 6000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(0.0, 10.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    // Soft fill from behind the player
    commands.spawn((
        DirectionalLight {
            illuminance: 4000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(0.0, 4.0, 10.0).looking_at(Vec3::new(0.0, 0.0, -5.0), Vec3::Y),
    ));

    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(10.0, 20.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color_texture: Some(asset_server.load(textures.floor.clone())),
            perceptual_roughness: 0.9,
            ..default()
        })),
        Transform::IDENTITY,
        Name::new("Floor"),
    ));

    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(1.5, 8.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color_texture: Some(asset_server.load(textures.lane.clone())),
            perceptual_roughness: 0.4,
            ..default()
        })),
        Transform::from_xyz(0.0, 0.01, -1.5),
        Name::new("Lane"),
    ));

    // Backdrop standing in for a textured sky
    commands.spawn((
        Mesh3d(meshes.add(Rectangle::new(60.0, 30.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color_texture: Some(asset_server.load(textures.background.clone())),
            unlit: true,
            ..default()
        })),
        Transform::from_xyz(0.0, 10.0, -20.0),
        Name::new("Backdrop"),
    ));

    // Ground collider, larger than the visible floor so balls leaving the
    // lane keep rolling towards the far boundary.
    commands.spawn((
        RigidBody::Static,
        Collider::cuboid(40.0, 0.2, 60.0),
        Transform::from_xyz(0.0, -0.1, 0.0),
        Name::new("Ground"),
    ));
}

/// Spawn the camera (and, in VR, the two tracked controllers).
///
/// Either camera starts at the opening mark; the level offset only moves the
/// flat-screen camera from the first reset on.
pub fn setup_camera(mut commands: Commands, config: Res<BowlingConfig>) {
    // Uniform white fill under the directional lights
    let ambient = AmbientLight {
        color: Color::WHITE,
        brightness: 400.0,
        ..default()
    };

    match config.input_scheme {
        InputScheme::Desktop => {
            commands.spawn((
                Camera3d::default(),
                Transform::from_translation(config.opening_camera_position()),
                ambient,
                LaneCamera,
            ));
        }
        InputScheme::Vr => {
            // The headset drives the view; this is only the initial pose.
            commands.spawn((
                Camera3d::default(),
                Transform::from_translation(config.opening_camera_position()),
                ambient,
            ));
            for (hand, x) in [(Hand::Left, -0.25), (Hand::Right, 0.25)] {
                commands.spawn((
                    XrController { hand },
                    Transform::from_xyz(x, 1.1, config.camera_base_z - 0.4),
                    Name::new(format!("{hand:?} controller")),
                ));
            }
        }
    }
}

/// Spawn the ball and a full rack of pins.
pub fn setup_bodies(
    mut commands: Commands,
    config: Res<BowlingConfig>,
    textures: Res<LaneTextures>,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(config.ball_radius))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color_texture: Some(asset_server.load(textures.ball.clone())),
            metallic: 0.6,
            perceptual_roughness: 0.3,
            ..default()
        })),
        Transform::from_translation(config.opening_ball_spawn()),
        RigidBody::Dynamic,
        Collider::sphere(config.ball_radius),
        Mass(config.ball_mass),
        LinearDamping(config.ball_linear_damping),
        LinearVelocity::default(),
        AngularVelocity::default(),
        Ball,
        Name::new("Ball"),
    ));

    let pin_mesh = meshes.add(ConicalFrustum {
        radius_top: config.pin_top_radius,
        radius_bottom: config.pin_bottom_radius,
        height: config.pin_height,
    });
    let pin_material = materials.add(StandardMaterial {
        base_color_texture: Some(asset_server.load(textures.pin.clone())),
        ..default()
    });
    let pin_radius = (config.pin_top_radius + config.pin_bottom_radius) / 2.0;

    for (slot, position) in configured_rack(&config).into_iter().enumerate() {
        commands.spawn((
            Mesh3d(pin_mesh.clone()),
            MeshMaterial3d(pin_material.clone()),
            pin_home(&config, position),
            RigidBody::Dynamic,
            Collider::cylinder(pin_radius, config.pin_height),
            Mass(config.pin_mass),
            Friction::new(config.pin_friction),
            Restitution::new(config.pin_restitution),
            LinearVelocity::default(),
            AngularVelocity::default(),
            Pin { slot },
            Name::new(format!("Pin {slot}")),
        ));
    }

    info!(
        "Lane ready: {} pins, ball at {:?}",
        config.pin_count(),
        config.opening_ball_spawn()
    );
}
