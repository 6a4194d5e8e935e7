use bevy::camera::{PerspectiveProjection, Projection};
use bevy::pbr::{DistanceFog, FogFalloff};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use vault_core::{Camera as VaultCamera, Vault, VaultEvent, VaultFrame};

use crate::constants::{
    color_from_hex, Colors, CAMERA_FAR, CAMERA_NEAR, FOG_DENSITY, LIGHT_INTENSITY, LIGHT_OFFSET,
    LIGHT_RANGE,
};

use super::to_render;

#[derive(SystemSet, Debug, Hash, Eq, PartialEq, Clone)]
pub(crate) enum UpdateSet {
    Input,
    Simulate,
    Visuals,
}

/// A driver event forwarded to the rest of the app.
#[derive(Message, Clone, Debug)]
pub(crate) struct VaultMessage(pub(crate) VaultEvent);

/// The simulation and the picking camera it is driven with.
#[derive(Resource)]
pub(crate) struct VaultSim {
    pub(crate) vault: Vault,
    pub(crate) camera: VaultCamera,
    /// Snapshot from the latest tick
    pub(crate) frame: Option<VaultFrame>,
}

pub struct CorePlugin {
    pub vault: Vault,
}

#[derive(Component)]
pub(crate) struct MainCamera;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(VaultSim {
            vault: self.vault.clone(),
            camera: VaultCamera::default(),
            frame: None,
        })
        .add_message::<VaultMessage>()
        .insert_resource(ClearColor(color_from_hex(Colors::BACKGROUND)))
        .insert_resource(AmbientLight {
            color: Color::WHITE,
            brightness: 250.0,
            affects_lightmapped_meshes: true,
        })
        .configure_sets(
            Update,
            (UpdateSet::Input, UpdateSet::Simulate, UpdateSet::Visuals).chain(),
        )
        .add_systems(Startup, (setup_camera, setup_lights))
        .add_systems(
            Update,
            (sync_viewport, tick_vault)
                .chain()
                .in_set(UpdateSet::Simulate),
        );
    }
}

fn setup_camera(mut commands: Commands, sim: Res<VaultSim>) {
    let cam = sim.camera;
    let background = color_from_hex(Colors::BACKGROUND);

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: (cam.fov_y as f32).to_radians(),
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            ..default()
        }),
        Transform::from_translation(to_render(cam.position))
            .looking_at(to_render(cam.target), Vec3::Y),
        DistanceFog {
            color: background,
            falloff: FogFalloff::ExponentialSquared {
                density: FOG_DENSITY,
            },
            ..default()
        },
        Msaa::Sample4,
        MainCamera,
    ));
}

fn setup_lights(mut commands: Commands) {
    for (x, color) in [
        (LIGHT_OFFSET, Colors::NEON_CYAN),
        (-LIGHT_OFFSET, Colors::NEON_MAGENTA),
    ] {
        commands.spawn((
            PointLight {
                color: color_from_hex(color),
                intensity: LIGHT_INTENSITY,
                range: LIGHT_RANGE,
                ..default()
            },
            Transform::from_xyz(x, LIGHT_OFFSET, LIGHT_OFFSET),
        ));
    }
}

/// Keep the picking camera and pointer mapping in step with the window size.
fn sync_viewport(
    q_window: Query<&Window, (With<PrimaryWindow>, Changed<Window>)>,
    mut sim: ResMut<VaultSim>,
) {
    let Ok(window) = q_window.single() else {
        return;
    };
    let (w, h) = (window.width() as f64, window.height() as f64);
    if w <= 0.0 || h <= 0.0 {
        return;
    }
    sim.camera.set_viewport(w, h);
    sim.vault.set_viewport(w, h);
}

fn tick_vault(time: Res<Time>, mut sim: ResMut<VaultSim>, mut writer: MessageWriter<VaultMessage>) {
    let sim = &mut *sim;
    let frame = sim.vault.tick(time.elapsed_secs_f64(), &sim.camera);
    sim.frame = Some(frame);

    for event in sim.vault.drain_events() {
        writer.write(VaultMessage(event));
    }
}
