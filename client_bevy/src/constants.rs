pub const WINDOW_WIDTH: u32 = 1280;
pub const WINDOW_HEIGHT: u32 = 720;

pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;

pub const FOG_DENSITY: f32 = 0.03;

pub const GRID_SIZE: f32 = 150.0;
pub const GRID_DIVISIONS: usize = 50;
pub const GRID_Y: f32 = -8.0;

/// Point lights at (±20, 20, 20)
pub const LIGHT_OFFSET: f32 = 20.0;
pub const LIGHT_INTENSITY: f32 = 400_000.0;
pub const LIGHT_RANGE: f32 = 80.0;

pub const HOLO_OPACITY: f32 = 0.25;
/// Scanline texture repeats along V
pub const HOLO_REPEAT: f32 = 15.0;
pub const GLASS_OPACITY: f32 = 0.1;
pub const DUST_OPACITY: f32 = 0.6;

/// Width of each side navigation strip, as a fraction of the window
pub const NAV_REGION_FRACTION: f32 = 0.1;

#[derive(Clone, Copy)]
pub struct Colors;

impl Colors {
    pub const BACKGROUND: u32 = 0x020205;
    pub const NEON_CYAN: u32 = 0x00f3ff;
    pub const NEON_MAGENTA: u32 = 0xff00ff;
    pub const GRID_MINOR: u32 = 0x111122;
    pub const LABEL: u32 = 0x00f3ff;
}

pub fn color_from_hex(rgb: u32) -> bevy::prelude::Color {
    let r = ((rgb >> 16) & 0xff) as f32 / 255.0;
    let g = ((rgb >> 8) & 0xff) as f32 / 255.0;
    let b = (rgb & 0xff) as f32 / 255.0;
    bevy::prelude::Color::srgb(r, g, b)
}

/// Emissive color for a glow intensity. Intensity scales the neon tint linearly.
pub fn glow_emissive(intensity: f32) -> bevy::prelude::LinearRgba {
    color_from_hex(Colors::NEON_CYAN).to_linear() * intensity.max(0.0)
}
