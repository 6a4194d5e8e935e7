//! Gallery cards: identity, fixed ring placement and per-frame animation fields.

use std::f64::consts::TAU;

use crate::config::VaultConfig;
use crate::source::SourceItem;
use crate::vec3::{cross, normalize, vec3, Vec3};

/// Stable identifier of a card; equal to its creation index.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct EntityId(pub u32);

impl EntityId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One card on the ring.
///
/// `angle`, `base_y` and the ring position are fixed at construction. Only the
/// animation fields (`y_offset`, `scale`, both glow values) and the flash
/// deadline change afterwards.
#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    name: String,
    image: String,
    audio: Option<String>,
    angle: f64,
    base_y: f64,
    ring_position: Vec3,
    phase: f64,

    pub(crate) y_offset: f64,
    pub(crate) scale: f64,
    pub(crate) glow_front: f64,
    pub(crate) glow_back: f64,
    /// Glow is pinned at the flash intensity until this elapsed time
    pub(crate) flash_until: Option<f64>,
}

impl Entity {
    fn new(index: usize, count: usize, item: &SourceItem, config: &VaultConfig) -> Self {
        let angle = index as f64 / count as f64 * TAU;
        let name = item
            .label
            .clone()
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| format!("{}{}", config.fallback_name_prefix, index));
        let audio = item.audio.clone().filter(|a| !a.is_empty());

        Self {
            id: EntityId(index as u32),
            name,
            image: item.image.clone(),
            audio,
            angle,
            base_y: config.base_y,
            ring_position: vec3(
                angle.cos() * config.ring_radius,
                config.base_y,
                angle.sin() * config.ring_radius,
            ),
            phase: index as f64,
            y_offset: 0.0,
            scale: 1.0,
            glow_front: 0.0,
            glow_back: 0.0,
            flash_until: None,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn audio(&self) -> Option<&str> {
        self.audio.as_deref()
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn base_y(&self) -> f64 {
        self.base_y
    }

    /// Float animation phase offset (the creation index).
    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn y_offset(&self) -> f64 {
        self.y_offset
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn glow_front(&self) -> f64 {
        self.glow_front
    }

    pub fn glow_back(&self) -> f64 {
        self.glow_back
    }

    pub fn flash_until(&self) -> Option<f64> {
        self.flash_until
    }

    /// Position inside the vault group, including the float offset.
    pub fn position(&self) -> Vec3 {
        vec3(
            self.ring_position.x,
            self.ring_position.y + self.y_offset,
            self.ring_position.z,
        )
    }

    /// Local axes (x, y, z) inside the vault group. +Z faces the ring centre.
    pub fn basis(&self) -> [Vec3; 3] {
        let z = normalize(vec3(-self.ring_position.x, 0.0, -self.ring_position.z));
        let x = normalize(cross(Vec3::Y, z));
        let y = cross(z, x);
        [x, y, z]
    }

    /// True when every animation field is a finite number.
    pub fn is_sane(&self) -> bool {
        self.y_offset.is_finite()
            && self.scale.is_finite()
            && self.glow_front.is_finite()
            && self.glow_back.is_finite()
    }

    /// Reset animation fields to their neutral values.
    pub(crate) fn reset_animation(&mut self) {
        self.y_offset = 0.0;
        self.scale = 1.0;
        self.glow_front = 0.0;
        self.glow_back = 0.0;
        self.flash_until = None;
    }
}

/// Owns every card. Built once; cards are never added or removed afterwards.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entities: Vec<Entity>,
}

impl EntityRegistry {
    pub fn from_sources(sources: &[SourceItem], config: &VaultConfig) -> Self {
        let count = sources.len();
        let entities = sources
            .iter()
            .enumerate()
            .map(|(i, item)| Entity::new(i, count, item, config))
            .collect::<Vec<_>>();
        tracing::info!("Vault registry built with {} cards", entities.len());
        Self { entities }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.index())
    }

    pub(crate) fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.iter().map(|e| e.id)
    }
}
