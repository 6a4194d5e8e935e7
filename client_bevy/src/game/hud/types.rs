use bevy::prelude::*;

use crate::constants::{color_from_hex, Colors};

pub(super) const LABEL_TOP: f32 = 24.0;
pub(super) const LABEL_FONT_SIZE: f32 = 22.0;
pub(super) const TITLE_FONT_SIZE: f32 = 40.0;
pub(super) const BUTTON_FONT_SIZE: f32 = 18.0;

/// Side strip tint while hovered
pub(super) const NAV_HOVER_ALPHA: f32 = 0.12;

/// Active card name (or the idle label)
#[derive(Component)]
pub(super) struct HudLabelText;

/// Full-screen start overlay; hidden once the vault is entered.
#[derive(Component)]
pub(super) struct HudStartScreen;

#[derive(Component)]
pub(super) struct HudEnterButton;

pub(super) fn neon(alpha: f32) -> Color {
    color_from_hex(Colors::NEON_CYAN).with_alpha(alpha)
}

pub(super) fn overlay_bg(alpha: f32) -> Color {
    color_from_hex(Colors::BACKGROUND).with_alpha(alpha)
}
