mod constants;
mod game;

use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};
use vault_core::{manifest_from_env, Vault, VaultConfig, VaultError};

use constants::{WINDOW_HEIGHT, WINDOW_WIDTH};
use game::{
    CardsPlugin, CorePlugin, EnvironmentPlugin, HudPlugin, InputPlugin, SoundPlugin,
};

fn main() {
    let vault = match load_vault() {
        Ok(vault) => vault,
        Err(e) => {
            eprintln!("Failed to load vault gallery: {}", e);
            std::process::exit(1);
        }
    };

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Meme Vault".to_string(),
                resolution: WindowResolution::new(WINDOW_WIDTH, WINDOW_HEIGHT),
                present_mode: PresentMode::AutoVsync,
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(CorePlugin { vault })
        .add_plugins(EnvironmentPlugin)
        .add_plugins(CardsPlugin)
        .add_plugins(InputPlugin)
        .add_plugins(SoundPlugin)
        .add_plugins(HudPlugin)
        .run();
}

/// Config from `VAULT_CONFIG` and manifest from `VAULT_MANIFEST`, with built-in fallbacks.
fn load_vault() -> Result<Vault, VaultError> {
    let config = VaultConfig::from_env()?;
    let sources = manifest_from_env()?;
    Vault::new(config, &sources)
}
