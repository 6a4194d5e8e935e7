use bevy::prelude::*;
use vault_core::NavSide;

use crate::constants::NAV_REGION_FRACTION;
use crate::game::input::NavRegion;

use super::types::{
    neon, overlay_bg, HudEnterButton, HudLabelText, HudStartScreen, BUTTON_FONT_SIZE,
    LABEL_FONT_SIZE, LABEL_TOP, TITLE_FONT_SIZE,
};

pub(super) fn spawn_hud(mut commands: Commands) {
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            top: Val::Px(LABEL_TOP),
            width: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont::from_font_size(LABEL_FONT_SIZE),
                TextColor(neon(0.95)),
                HudLabelText,
            ));
        });

    let strip = Val::Percent(NAV_REGION_FRACTION * 100.0);
    for side in [NavSide::Left, NavSide::Right] {
        let (left, right) = match side {
            NavSide::Left => (Val::Px(0.0), Val::Auto),
            NavSide::Right => (Val::Auto, Val::Px(0.0)),
        };
        commands.spawn((
            Button,
            Node {
                position_type: PositionType::Absolute,
                left,
                right,
                top: Val::Px(0.0),
                width: strip,
                height: Val::Percent(100.0),
                ..default()
            },
            BackgroundColor(Color::NONE),
            NavRegion(side),
        ));
    }

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(28.0),
                ..default()
            },
            BackgroundColor(overlay_bg(0.92)),
            GlobalZIndex(10),
            HudStartScreen,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("MOODMEME VAULT"),
                TextFont::from_font_size(TITLE_FONT_SIZE),
                TextColor(neon(1.0)),
            ));
            parent
                .spawn((
                    Button,
                    Node {
                        padding: UiRect::axes(Val::Px(24.0), Val::Px(10.0)),
                        border: UiRect::all(Val::Px(1.0)),
                        justify_content: JustifyContent::Center,
                        align_items: AlignItems::Center,
                        ..default()
                    },
                    BackgroundColor(overlay_bg(0.6)),
                    BorderColor::all(neon(0.6)),
                    HudEnterButton,
                ))
                .with_children(|button| {
                    button.spawn((
                        Text::new("ENTER VAULT"),
                        TextFont::from_font_size(BUTTON_FONT_SIZE),
                        TextColor(neon(0.9)),
                    ));
                });
        });
}
