//! Bowling lane in a window (or a browser canvas).

use avian3d::prelude::*;
use bevy::prelude::*;
use bevy_bowling::prelude::*;

#[cfg(not(target_arch = "wasm32"))]
#[derive(clap::Parser, Debug)]
#[command(name = "bevy_bowling", about = "Ten-pin bowling with physics")]
struct Cli {
    /// Use tracked VR controllers instead of the mouse
    #[arg(long)]
    vr: bool,

    /// Rounds per game
    #[arg(long, default_value_t = 5)]
    rounds: u32,

    /// Start with the debug overlay enabled (toggle with F3)
    #[arg(long)]
    debug: bool,
}

#[cfg(not(target_arch = "wasm32"))]
fn config_from_host() -> BowlingConfig {
    use clap::Parser;

    let cli = Cli::parse();
    let base = if cli.vr {
        BowlingConfig::vr()
    } else {
        BowlingConfig::default()
    };
    BowlingConfig {
        rounds_max: cli.rounds.max(1),
        debug_draw: cli.debug,
        ..base
    }
}

#[cfg(target_arch = "wasm32")]
fn config_from_host() -> BowlingConfig {
    if bevy_bowling::platform::vr_requested() {
        BowlingConfig::vr()
    } else {
        BowlingConfig::default()
    }
}

fn main() {
    let config = config_from_host();

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Bowling".to_string(),
                fit_canvas_to_parent: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(PhysicsPlugins::default())
        .insert_resource(ClearColor(Color::srgb(0.55, 0.7, 0.9)))
        .insert_resource(config)
        .add_plugins(BowlingPluginGroup)
        .run();
}
