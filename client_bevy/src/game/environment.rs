use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::PrimitiveTopology;

use crate::constants::{color_from_hex, Colors, DUST_OPACITY, GRID_DIVISIONS, GRID_SIZE, GRID_Y};

use super::{UpdateSet, VaultSim};

pub struct EnvironmentPlugin;

/// The ambient particle cloud. Its mesh is rewritten from the field every frame.
#[derive(Component)]
struct Dust {
    mesh: Handle<Mesh>,
}

impl Plugin for EnvironmentPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (spawn_dust, spawn_grid))
            .add_systems(Update, sync_dust.in_set(UpdateSet::Visuals));
    }
}

/// Grid lines on the XZ plane: `divisions + 1` lines per direction, the two centre lines split out.
fn grid_lines(size: f32, divisions: usize) -> (Vec<[f32; 3]>, Vec<[f32; 3]>) {
    let half = size / 2.0;
    let step = size / divisions as f32;
    let mut centre = Vec::new();
    let mut minor = Vec::new();
    for i in 0..=divisions {
        let k = -half + i as f32 * step;
        let target = if i * 2 == divisions {
            &mut centre
        } else {
            &mut minor
        };
        target.extend_from_slice(&[[-half, 0.0, k], [half, 0.0, k], [k, 0.0, -half], [k, 0.0, half]]);
    }
    (centre, minor)
}

fn line_mesh(positions: Vec<[f32; 3]>) -> Mesh {
    let normals = vec![[0.0, 1.0, 0.0]; positions.len()];
    Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::RENDER_WORLD)
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
}

fn spawn_grid(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let (centre, minor) = grid_lines(GRID_SIZE, GRID_DIVISIONS);
    for (positions, color) in [(centre, Colors::NEON_MAGENTA), (minor, Colors::GRID_MINOR)] {
        commands.spawn((
            Mesh3d(meshes.add(line_mesh(positions))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: color_from_hex(color),
                unlit: true,
                ..default()
            })),
            Transform::from_xyz(0.0, GRID_Y, 0.0),
        ));
    }
}

fn spawn_dust(
    mut commands: Commands,
    sim: Res<VaultSim>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mut positions = Vec::new();
    sim.vault.particles().write_positions_f32(&mut positions);

    // Kept in the main world so it can be rewritten each frame.
    let mesh = meshes.add(
        Mesh::new(PrimitiveTopology::PointList, RenderAssetUsages::default())
            .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions),
    );
    let material = materials.add(StandardMaterial {
        base_color: color_from_hex(Colors::NEON_CYAN).with_alpha(DUST_OPACITY),
        alpha_mode: AlphaMode::Add,
        unlit: true,
        ..default()
    });

    commands.spawn((
        Mesh3d(mesh.clone()),
        MeshMaterial3d(material),
        Transform::default(),
        Dust { mesh },
    ));
    info!("Spawned {} dust particles", sim.vault.particles().len());
}

fn sync_dust(
    sim: Res<VaultSim>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut q_dust: Query<(&Dust, &mut Transform)>,
    mut scratch: Local<Vec<[f32; 3]>>,
) {
    let Some(frame) = sim.frame else {
        return;
    };
    sim.vault.particles().write_positions_f32(&mut scratch);

    for (dust, mut transform) in &mut q_dust {
        transform.rotation = Quat::from_rotation_y(frame.particle_yaw as f32);
        if let Some(mesh) = meshes.get_mut(&dust.mesh) {
            mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, scratch.clone());
        }
    }
}
