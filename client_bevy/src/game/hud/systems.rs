use bevy::prelude::*;
use vault_core::VaultEvent;

use crate::game::input::NavRegion;
use crate::game::{VaultMessage, VaultSim};

use super::types::{neon, HudEnterButton, HudLabelText, HudStartScreen, NAV_HOVER_ALPHA};

type EnterButtonQuery<'w, 's> =
    Query<'w, 's, &'static Interaction, (Changed<Interaction>, With<HudEnterButton>)>;

type NavRegionQuery<'w, 's> = Query<
    'w,
    's,
    (&'static Interaction, &'static mut BackgroundColor),
    (Changed<Interaction>, With<NavRegion>),
>;

pub(super) fn handle_enter_button(
    buttons: EnterButtonQuery,
    mut q_screen: Query<&mut Visibility, With<HudStartScreen>>,
    mut sim: ResMut<VaultSim>,
) {
    if !buttons.iter().any(|i| *i == Interaction::Pressed) {
        return;
    }
    sim.vault.mark_started();
    for mut visibility in &mut q_screen {
        *visibility = Visibility::Hidden;
    }
}

/// Show the latest label the vault announced this frame.
pub(super) fn update_label_ui(
    mut reader: MessageReader<VaultMessage>,
    mut q_label: Query<&mut Text, With<HudLabelText>>,
) {
    let latest = reader.read().fold(None, |acc, VaultMessage(event)| match event {
        VaultEvent::LabelChanged { text } => Some(text),
        _ => acc,
    });
    let Some(text) = latest else {
        return;
    };
    for mut label in &mut q_label {
        label.0.clone_from(text);
    }
}

pub(super) fn update_nav_region_ui(mut q_regions: NavRegionQuery) {
    for (interaction, mut background) in &mut q_regions {
        background.0 = match interaction {
            Interaction::None => Color::NONE,
            _ => neon(NAV_HOVER_ALPHA),
        };
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
        app.add_message::<VaultMessage>();
        app.insert_resource(VaultSim {
            vault: Vault::new(config, &[SourceItem::new("a.png")]).unwrap(),
            camera: VaultCamera::default(),
            frame: None,
        });
        app
    }

    #[test]
    fn label_shows_last_label_of_the_frame() {
        let mut app = make_test_app();
        app.add_systems(Update, update_label_ui);
        let label = app.world_mut().spawn((HudLabelText, Text::new(""))).id();

        for text in ["DOGE", "SCANNING_VAULT"] {
            app.world_mut()
                .write_message(VaultMessage(VaultEvent::LabelChanged {
                    text: text.to_string(),
                }));
        }
        app.update();

        assert_eq!(&app.world().get::<Text>(label).unwrap().0, "SCANNING_VAULT");
    }

    #[test]
    fn label_untouched_without_label_events() {
        let mut app = make_test_app();
        app.add_systems(Update, update_label_ui);
        let label = app
            .world_mut()
            .spawn((HudLabelText, Text::new("PEPE")))
            .id();

        app.world_mut()
            .write_message(VaultMessage(VaultEvent::FlashEnded {
                entity: vault_core::EntityId(0),
            }));
        app.update();

        assert_eq!(&app.world().get::<Text>(label).unwrap().0, "PEPE");
    }

    #[test]
    fn enter_button_starts_vault_and_hides_overlay() {
        let mut app = make_test_app();
        app.add_systems(Update, handle_enter_button);
        let screen = app
            .world_mut()
            .spawn((HudStartScreen, Visibility::Visible))
            .id();
        app.world_mut()
            .spawn((Button, Interaction::Pressed, HudEnterButton));

        app.update();

        assert!(app.world().resource::<VaultSim>().vault.is_started());
        assert_eq!(
            *app.world().get::<Visibility>(screen).unwrap(),
            Visibility::Hidden
        );
    }

    #[test]
    fn hovered_region_is_tinted() {
        let mut app = make_test_app();
        app.add_systems(Update, update_nav_region_ui);
        let region = app
            .world_mut()
            .spawn((
                Interaction::Hovered,
                BackgroundColor(Color::NONE),
                NavRegion(vault_core::NavSide::Left),
            ))
            .id();

        app.update();

        let bg = app.world().get::<BackgroundColor>(region).unwrap().0;
        assert!((bg.alpha() - NAV_HOVER_ALPHA).abs() < 1e-5);
    }
}
