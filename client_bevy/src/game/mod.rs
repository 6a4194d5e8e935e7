mod cards;
mod core;
mod environment;
mod hud;
mod input;
mod sound;

pub use cards::CardsPlugin;
pub use core::CorePlugin;
pub(crate) use core::{UpdateSet, VaultMessage, VaultSim};
pub use environment::EnvironmentPlugin;
pub use hud::HudPlugin;
pub use input::InputPlugin;
pub use sound::SoundPlugin;

use bevy::prelude::Vec3;

/// Convert a core vector to a render vector.
pub(crate) fn to_render(v: vault_core::Vec3) -> Vec3 {
    Vec3::new(v.x as f32, v.y as f32, v.z as f32)
}
