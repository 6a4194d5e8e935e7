//! Simulation core of the card vault: a rotating ring of cards with float,
//! hover and click-flash animation, an ambient particle field, and ray picking
//! that resolves any hit part to the card that owns it.
//!
//! Everything here is renderer-agnostic. A host feeds pointer input and elapsed
//! time into [`Vault`] and reads back per-card state and [`VaultEvent`]s.

pub mod audio;
pub mod camera;
pub mod config;
pub mod driver;
pub mod entity;
pub mod error;
pub mod glow;
pub mod particles;
pub mod picking;
pub mod rotation;
pub mod source;
pub mod vec3;

pub use audio::{AudioSlot, Playback};
pub use camera::{pointer_to_ndc, Camera, Ray};
pub use config::{CardGeometry, ParticleConfig, VaultConfig};
pub use driver::{Vault, VaultEvent, VaultFrame};
pub use entity::{Entity, EntityId, EntityRegistry};
pub use error::VaultError;
pub use particles::ParticleField;
pub use picking::{Hit, HitIndex, PartKind};
pub use rotation::{NavSide, VaultRotation};
pub use source::{demo_manifest, manifest_from_env, SourceItem};
pub use vec3::Vec3;
