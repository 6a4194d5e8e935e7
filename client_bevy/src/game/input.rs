use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use vault_core::NavSide;

use super::{UpdateSet, VaultSim};

pub struct InputPlugin;

/// A screen strip that spins the ring while hovered.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct NavRegion(pub(crate) NavSide);

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (pointer_system, nav_region_system, click_system)
                .chain()
                .in_set(UpdateSet::Input),
        );
    }
}

fn pointer_system(q_window: Query<&Window, With<PrimaryWindow>>, mut sim: ResMut<VaultSim>) {
    let Ok(window) = q_window.single() else {
        return;
    };
    // Keep the last position while the cursor is outside the window.
    if let Some(pos) = window.cursor_position() {
        sim.vault.pointer_moved(pos.x as f64, pos.y as f64);
    }
}

fn nav_region_system(
    q_regions: Query<(&Interaction, &NavRegion), Changed<Interaction>>,
    mut sim: ResMut<VaultSim>,
) {
    for (interaction, region) in &q_regions {
        match interaction {
            Interaction::Hovered | Interaction::Pressed => sim.vault.hover_enter(region.0),
            Interaction::None => sim.vault.hover_leave(),
        }
    }
}

/// Clicks only reach the vault once the start overlay is gone.
fn click_system(
    buttons: Res<ButtonInput<MouseButton>>,
    time: Res<Time>,
    mut sim: ResMut<VaultSim>,
) {
    if buttons.just_pressed(MouseButton::Left) && sim.vault.is_started() {
        sim.vault.click(time.elapsed_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vault_core::{Camera as VaultCamera, SourceItem, Vault, VaultConfig};

    fn make_test_app() -> App {
        let mut config = VaultConfig::default();
        config.particles.count = 4;
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<ButtonInput<MouseButton>>();
        app.insert_resource(VaultSim {
            vault: Vault::new(config, &[SourceItem::new("a.png").with_audio("a.ogg")]).unwrap(),
            camera: VaultCamera::default(),
            frame: None,
        });
        app
    }

    #[test]
    fn hovering_region_sets_direction_and_leaving_keeps_it() {
        let mut app = make_test_app();
        app.add_systems(Update, nav_region_system);

        let region = app
            .world_mut()
            .spawn((Button, Interaction::Hovered, NavRegion(NavSide::Right)))
            .id();
        app.update();
        {
            let sim = app.world().resource::<VaultSim>();
            assert!(sim.vault.rotation().is_navigating());
            assert_eq!(sim.vault.rotation().direction(), -1.0);
        }

        *app.world_mut().get_mut::<Interaction>(region).unwrap() = Interaction::None;
        app.update();
        let sim = app.world().resource::<VaultSim>();
        assert!(!sim.vault.rotation().is_navigating());
        assert_eq!(sim.vault.rotation().direction(), -1.0);
    }

    #[test]
    fn click_ignored_until_started() {
        let mut app = make_test_app();
        app.add_systems(Update, click_system);
        {
            let mut sim = app.world_mut().resource_mut::<VaultSim>();
            let camera = VaultCamera {
                position: vault_core::Vec3::new(30.0, 1.0, 0.0),
                target: vault_core::Vec3::new(0.0, 1.0, 0.0),
                fov_y: 60.0,
                aspect: 1.0,
            };
            sim.vault.tick(0.0, &camera);
            assert!(sim.vault.picked().is_some());
        }

        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .press(MouseButton::Left);
        app.update();
        assert!(app
            .world()
            .resource::<VaultSim>()
            .vault
            .active_audio()
            .is_none());

        app.world_mut()
            .resource_mut::<VaultSim>()
            .vault
            .mark_started();
        {
            let mut buttons = app.world_mut().resource_mut::<ButtonInput<MouseButton>>();
            buttons.release(MouseButton::Left);
            buttons.clear();
            buttons.press(MouseButton::Left);
        }
        app.update();
        let sim = app.world().resource::<VaultSim>();
        assert_eq!(
            sim.vault.active_audio().map(|p| p.source.as_str()),
            Some("a.ogg")
        );
    }
}
