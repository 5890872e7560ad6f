//! HUD text, transient messages and the VR status line.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::components::{HudText, Toast, VrStatusText};
use crate::events::ShowMessage;
use crate::resources::{BowlingConfig, BowlingGame, VrSupport};

/// Resting distance of the toast from the top of the screen (px).
const TOAST_TOP: f32 = 80.0;

/// Spawn the three text regions.
pub fn setup_hud(
    mut commands: Commands,
    config: Res<BowlingConfig>,
    game: Res<BowlingGame>,
    support: Res<VrSupport>,
) {
    commands.spawn((
        Text::new(game.hud_text()),
        TextFont {
            font_size: 22.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            padding: UiRect::axes(Val::Px(10.0), Val::Px(6.0)),
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.5)),
        HudText,
    ));

    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 32.0,
            ..default()
        },
        TextColor(Color::WHITE.with_alpha(0.0)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(TOAST_TOP - Toast::SLIDE),
            left: Val::Percent(35.0),
            ..default()
        },
        Toast::new(config.message_hold, config.message_fade),
    ));

    let capability = support.capability;
    commands.spawn((
        Text::new(capability.status_text()),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(capability.status_color()),
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(10.0),
            left: Val::Px(10.0),
            padding: UiRect::axes(Val::Px(10.0), Val::Px(6.0)),
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
        VrStatusText,
    ));
}

/// Refresh the level/round text whenever the game state changes.
pub fn update_hud(game: Res<BowlingGame>, mut hud: Query<&mut Text, With<HudText>>) {
    if !game.is_changed() {
        return;
    }
    let text = game.hud_text();
    for mut hud_text in hud.iter_mut() {
        if hud_text.0 != text {
            hud_text.0 = text.clone();
        }
    }
}

/// Show the most recent message; earlier ones in the same frame are replaced.
pub fn show_messages(
    mut messages: MessageReader<ShowMessage>,
    mut toasts: Query<(&mut Text, &mut Toast)>,
) {
    let Some(ShowMessage(latest)) = messages.read().last() else {
        return;
    };
    for (mut text, mut toast) in toasts.iter_mut() {
        text.0 = latest.clone();
        toast.restart();
    }
}

/// Hold the toast, then fade it out while sliding it up.
pub fn animate_toasts(
    time: Res<Time>,
    mut toasts: Query<(&mut Toast, &mut TextColor, &mut Node)>,
) {
    for (mut toast, mut color, mut node) in toasts.iter_mut() {
        let (opacity, offset) = toast.advance(time.delta());
        if color.0.alpha() != opacity {
            color.0.set_alpha(opacity);
        }
        let top = Val::Px(TOAST_TOP - offset);
        if node.top != top {
            node.top = top;
        }
    }
}

/// Mirror the probed VR capability into the status line.
pub fn update_vr_status(
    support: Res<VrSupport>,
    mut status: Query<(&mut Text, &mut TextColor), With<VrStatusText>>,
) {
    if !support.is_changed() {
        return;
    }
    for (mut text, mut color) in status.iter_mut() {
        text.0 = support.capability.status_text().to_string();
        color.0 = support.capability.status_color();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_toast_starts_hidden() {
        let mut toast = Toast::new(1.5, 0.3);
        let (opacity, offset) = toast.advance(Duration::ZERO);
        assert_eq!(opacity, 0.0);
        assert_eq!(offset, Toast::SLIDE);
    }

    #[test]
    fn test_toast_holds_then_fades() {
        let mut toast = Toast::new(1.5, 0.3);
        toast.restart();

        assert_eq!(toast.advance(Duration::from_secs_f32(1.0)), (1.0, 0.0));
        assert_eq!(toast.advance(Duration::from_secs_f32(0.6)), (1.0, 0.0));

        // Hold is over, fade runs to completion
        let (opacity, _) = toast.advance(Duration::from_secs_f32(0.15));
        assert!(opacity > 0.0 && opacity < 1.0);
        let (opacity, offset) = toast.advance(Duration::from_secs_f32(0.5));
        assert_eq!(opacity, 0.0);
        assert_eq!(offset, Toast::SLIDE);
    }

    #[test]
    fn test_restart_makes_toast_visible_again() {
        let mut toast = Toast::new(1.5, 0.3);
        toast.restart();
        toast.advance(Duration::from_secs(2));
        toast.advance(Duration::from_secs(2));

        toast.restart();
        assert_eq!(toast.advance(Duration::from_millis(10)), (1.0, 0.0));
    }
}
