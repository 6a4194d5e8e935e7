mod spawn;
mod systems;
mod types;

use bevy::prelude::*;

use super::UpdateSet;

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn::spawn_hud).add_systems(
            Update,
            (
                systems::handle_enter_button,
                systems::update_label_ui,
                systems::update_nav_region_ui,
            )
                .chain()
                .in_set(UpdateSet::Visuals),
        );
    }
}
