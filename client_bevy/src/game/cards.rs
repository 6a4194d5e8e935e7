use bevy::asset::RenderAssetUsages;
use bevy::image::{ImageAddressMode, ImageSampler, ImageSamplerDescriptor};
use bevy::math::Affine2;
use bevy::prelude::*;
use bevy::render::render_resource::{
    Extent3d, PrimitiveTopology, TextureDimension, TextureFormat,
};
use vault_core::picking::{card_parts, HitShape};
use vault_core::{CardGeometry, Entity as Card, EntityId};

use crate::constants::{
    color_from_hex, glow_emissive, Colors, GLASS_OPACITY, HOLO_OPACITY, HOLO_REPEAT,
};

use super::{to_render, UpdateSet, VaultSim};

pub struct CardsPlugin;

const SCANLINE_SIZE: u32 = 64;
/// Scanline rows (inclusive start, exclusive end) in the holo texture
const SCANLINE_ROWS: (u32, u32) = (30, 34);

/// The group every card hangs off; carries the ring yaw.
#[derive(Component)]
pub(crate) struct VaultRoot;

#[derive(Component)]
pub(crate) struct CardVisual {
    pub(crate) id: EntityId,
    front: Handle<StandardMaterial>,
    back: Handle<StandardMaterial>,
}

/// Material shared by every holo overlay; its UVs scroll over time.
#[derive(Resource)]
struct HoloMaterial(Handle<StandardMaterial>);

impl Plugin for CardsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_cards).add_systems(
            Update,
            (sync_card_transforms, sync_card_glow, scroll_holo).in_set(UpdateSet::Visuals),
        );
    }
}

/// Transparent 64x64 texture with one horizontal neon line, tiled across the holo planes.
fn scanline_image() -> Image {
    let mut data = vec![0u8; (SCANLINE_SIZE * SCANLINE_SIZE * 4) as usize];
    for y in SCANLINE_ROWS.0..SCANLINE_ROWS.1 {
        for x in 0..SCANLINE_SIZE {
            let i = ((y * SCANLINE_SIZE + x) * 4) as usize;
            data[i..i + 4].copy_from_slice(&[0, 243, 255, 153]);
        }
    }

    let mut image = Image::new(
        Extent3d {
            width: SCANLINE_SIZE,
            height: SCANLINE_SIZE,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD,
    );
    image.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
        address_mode_u: ImageAddressMode::Repeat,
        address_mode_v: ImageAddressMode::Repeat,
        ..default()
    });
    image
}

/// Bracket polylines as a line list, taken from the same segments the picker tests against.
fn bracket_positions(card: &CardGeometry) -> Vec<[f32; 3]> {
    card_parts(EntityId(0), card)
        .iter()
        .filter_map(|part| match part.shape {
            HitShape::Segment { a, b } => Some([to_render(a), to_render(b)]),
            _ => None,
        })
        .flatten()
        .map(|v| v.to_array())
        .collect()
}

fn bracket_mesh(card: &CardGeometry) -> Mesh {
    let positions = bracket_positions(card);
    let normals = vec![[0.0, 0.0, 1.0]; positions.len()];
    Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::RENDER_WORLD)
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
}

/// Card placement inside the vault group.
pub(crate) fn card_transform(card: &Card) -> Transform {
    let [x, y, z] = card.basis();
    let rotation = Quat::from_mat3(&Mat3::from_cols(to_render(x), to_render(y), to_render(z)));
    Transform {
        translation: to_render(card.position()),
        rotation,
        scale: Vec3::splat(card.scale() as f32),
    }
}

/// Holo texture transform at a given scroll offset.
fn holo_uv(scroll: f64) -> Affine2 {
    Affine2::from_scale_angle_translation(
        Vec2::new(1.0, HOLO_REPEAT),
        0.0,
        Vec2::new(0.0, scroll.fract() as f32),
    )
}

fn spawn_cards(
    mut commands: Commands,
    sim: Res<VaultSim>,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
) {
    let geometry = &sim.vault.config().card;
    let neon = color_from_hex(Colors::NEON_CYAN);

    let pane_mesh = meshes.add(Cuboid::new(
        geometry.pane_size as f32,
        geometry.pane_size as f32,
        geometry.pane_depth as f32,
    ));
    let image_mesh = meshes.add(Rectangle::new(
        geometry.image_size as f32,
        geometry.image_size as f32,
    ));
    let bracket = meshes.add(bracket_mesh(geometry));

    let glass = materials.add(StandardMaterial {
        base_color: neon.with_alpha(GLASS_OPACITY),
        alpha_mode: AlphaMode::Blend,
        perceptual_roughness: 0.1,
        ..default()
    });
    let holo = materials.add(StandardMaterial {
        base_color: Color::WHITE.with_alpha(HOLO_OPACITY),
        base_color_texture: Some(images.add(scanline_image())),
        alpha_mode: AlphaMode::Add,
        unlit: true,
        uv_transform: holo_uv(0.0),
        ..default()
    });
    let bracket_material = materials.add(StandardMaterial {
        base_color: neon,
        unlit: true,
        ..default()
    });
    commands.insert_resource(HoloMaterial(holo.clone()));

    let image_z = geometry.image_offset as f32;
    let holo_z = geometry.holo_offset as f32;
    let flipped = Quat::from_rotation_y(std::f32::consts::PI);

    let root = commands
        .spawn((VaultRoot, Transform::default(), Visibility::default()))
        .id();

    for card in sim.vault.registry().iter() {
        let texture: Handle<Image> = asset_server.load(card.image().to_string());
        let face = |materials: &mut Assets<StandardMaterial>| {
            materials.add(StandardMaterial {
                base_color_texture: Some(texture.clone()),
                alpha_mode: AlphaMode::Blend,
                emissive: LinearRgba::BLACK,
                ..default()
            })
        };
        let front = face(&mut materials);
        let back = face(&mut materials);

        let card_entity = commands
            .spawn((
                CardVisual {
                    id: card.id(),
                    front: front.clone(),
                    back: back.clone(),
                },
                card_transform(card),
                Visibility::default(),
                Name::new(card.name().to_string()),
                ChildOf(root),
            ))
            .id();

        commands.entity(card_entity).with_children(|parent| {
            parent.spawn((Mesh3d(pane_mesh.clone()), MeshMaterial3d(glass.clone())));
            parent.spawn((
                Mesh3d(image_mesh.clone()),
                MeshMaterial3d(front),
                Transform::from_xyz(0.0, 0.0, image_z),
            ));
            parent.spawn((
                Mesh3d(image_mesh.clone()),
                MeshMaterial3d(back),
                Transform::from_xyz(0.0, 0.0, -image_z).with_rotation(flipped),
            ));
            parent.spawn((
                Mesh3d(image_mesh.clone()),
                MeshMaterial3d(holo.clone()),
                Transform::from_xyz(0.0, 0.0, holo_z),
            ));
            parent.spawn((
                Mesh3d(image_mesh.clone()),
                MeshMaterial3d(holo.clone()),
                Transform::from_xyz(0.0, 0.0, -holo_z).with_rotation(flipped),
            ));
            parent.spawn((Mesh3d(bracket.clone()), MeshMaterial3d(bracket_material.clone())));
        });
    }

    info!("Spawned {} vault cards", sim.vault.registry().len());
}

fn sync_card_transforms(
    sim: Res<VaultSim>,
    mut q_root: Query<&mut Transform, (With<VaultRoot>, Without<CardVisual>)>,
    mut q_cards: Query<(&CardVisual, &mut Transform), Without<VaultRoot>>,
) {
    let Some(frame) = sim.frame else {
        return;
    };
    for mut root in &mut q_root {
        root.rotation = Quat::from_rotation_y(frame.yaw as f32);
    }
    for (visual, mut transform) in &mut q_cards {
        if let Some(card) = sim.vault.registry().get(visual.id) {
            *transform = card_transform(card);
        }
    }
}

fn sync_card_glow(
    sim: Res<VaultSim>,
    q_cards: Query<&CardVisual>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for visual in &q_cards {
        let Some(card) = sim.vault.registry().get(visual.id) else {
            continue;
        };
        if let Some(front) = materials.get_mut(&visual.front) {
            front.emissive = glow_emissive(card.glow_front() as f32);
        }
        if let Some(back) = materials.get_mut(&visual.back) {
            back.emissive = glow_emissive(card.glow_back() as f32);
        }
    }
}

fn scroll_holo(
    sim: Res<VaultSim>,
    holo: Option<Res<HoloMaterial>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let (Some(frame), Some(holo)) = (sim.frame, holo) else {
        return;
    };
    if let Some(material) = materials.get_mut(&holo.0) {
        material.uv_transform = holo_uv(frame.holo_scroll);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::VaultMessage;
    use vault_core::{Camera as VaultCamera, SourceItem, Vault, VaultConfig, VaultFrame};

    fn sim(n: usize) -> VaultSim {
        let mut config = VaultConfig::default();
        config.particles.count = 4;
        let sources: Vec<SourceItem> = (0..n)
            .map(|i| SourceItem::new(format!("{i}.png")))
            .collect();
        VaultSim {
            vault: Vault::new(config, &sources).unwrap(),
            camera: VaultCamera::default(),
            frame: None,
        }
    }

    #[test]
    fn scanline_texture_has_one_opaque_band() {
        let image = scanline_image();
        let data = image.data.as_ref().unwrap();
        let alpha_at = |y: u32| data[((y * SCANLINE_SIZE) * 4 + 3) as usize];
        assert_eq!(alpha_at(0), 0);
        assert_eq!(alpha_at(31), 153);
        assert_eq!(alpha_at(40), 0);
    }

    #[test]
    fn brackets_are_four_corners_of_two_segments() {
        let card = CardGeometry::default();
        let positions = bracket_positions(&card);
        assert_eq!(positions.len(), 16);
        let half = (card.bracket_size / 2.0) as f32;
        for p in positions {
            assert!(p[0].abs() <= half + 1e-5);
            assert!(p[1].abs() <= half + 1e-5);
            assert_eq!(p[2], 0.0);
        }
    }

    #[test]
    fn card_transform_faces_ring_centre() {
        let sim = sim(4);
        for card in sim.vault.registry().iter() {
            let t = card_transform(card);
            let forward = t.rotation * Vec3::Z;
            let to_centre = (-t.translation.with_y(0.0)).normalize();
            assert!(forward.dot(to_centre) > 0.999);
            assert!((t.rotation * Vec3::Y).dot(Vec3::Y) > 0.999);
        }
    }

    #[test]
    fn holo_scroll_wraps() {
        let uv = holo_uv(2.25);
        assert!((uv.translation.y - 0.25).abs() < 1e-6);
        assert!((uv.matrix2.y_axis.y - HOLO_REPEAT).abs() < 1e-6);
    }

    #[test]
    fn transforms_follow_frame() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_message::<VaultMessage>();
        let mut sim = sim(2);
        sim.frame = Some(VaultFrame {
            time: 0.0,
            yaw: 0.5,
            holo_scroll: 0.0,
            particle_yaw: 0.0,
            picked: None,
        });
        app.insert_resource(sim);
        app.add_systems(Update, sync_card_transforms);

        let root = app
            .world_mut()
            .spawn((VaultRoot, Transform::default()))
            .id();
        let card = app
            .world_mut()
            .spawn((
                CardVisual {
                    id: EntityId(1),
                    front: Handle::default(),
                    back: Handle::default(),
                },
                Transform::default(),
            ))
            .id();

        app.update();

        let root_rot = app.world().get::<Transform>(root).unwrap().rotation;
        assert!(root_rot.angle_between(Quat::from_rotation_y(0.5)) < 1e-5);

        let t = app.world().get::<Transform>(card).unwrap();
        // Card 1 of 2 sits opposite card 0 on the ring.
        assert!((t.translation.x + 15.0).abs() < 1e-4);
        assert_eq!(t.scale, Vec3::ONE);
    }
}
