//! The per-frame driver.
//!
//! `Vault` owns every piece of gallery state and is advanced once per display
//! refresh by the host. Each tick runs, in order: ring rotation, card
//! float/scale/glow, particles, and finally picking, so the pick always reflects
//! this frame's geometry. Discrete side effects (label text, audio commands,
//! flash start/end) are queued as [`VaultEvent`]s for the host to drain.

use crate::audio::{AudioSlot, Playback};
use crate::camera::{pointer_to_ndc, Camera};
use crate::config::VaultConfig;
use crate::entity::{EntityId, EntityRegistry};
use crate::error::VaultError;
use crate::glow::{self, FlashStep};
use crate::particles::ParticleField;
use crate::picking::{pick, HitIndex};
use crate::rotation::{NavSide, VaultRotation};
use crate::source::SourceItem;

/// Side effects for the host, in the order they happened.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VaultEvent {
    /// The active-name label should now read this text.
    LabelChanged { text: String },
    /// Stop the clip that was playing.
    StopAudio(Playback),
    /// Start playing a clip.
    PlayAudio(Playback),
    FlashStarted { entity: EntityId, until: f64 },
    FlashEnded { entity: EntityId },
}

/// Scalars the renderer needs besides the per-card fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VaultFrame {
    pub time: f64,
    pub yaw: f64,
    pub holo_scroll: f64,
    pub particle_yaw: f64,
    pub picked: Option<EntityId>,
}

#[derive(Debug, Clone)]
pub struct Vault {
    config: VaultConfig,
    registry: EntityRegistry,
    hit_index: HitIndex,
    particles: ParticleField,
    rotation: VaultRotation,
    viewport: [f64; 2],
    pointer_ndc: [f64; 2],
    picked: Option<EntityId>,
    started: bool,
    label: Option<String>,
    audio: AudioSlot,
    events: Vec<VaultEvent>,
    time: f64,
}

impl Vault {
    pub fn new(config: VaultConfig, sources: &[SourceItem]) -> Result<Self, VaultError> {
        config.validate().map_err(VaultError::InvalidConfig)?;
        let registry = EntityRegistry::from_sources(sources, &config);
        let hit_index = HitIndex::build(&registry, &config.card);
        let particles = ParticleField::new(&config.particles);

        Ok(Self {
            config,
            registry,
            hit_index,
            particles,
            rotation: VaultRotation::default(),
            viewport: [0.0, 0.0],
            pointer_ndc: [0.0, 0.0],
            picked: None,
            started: false,
            label: None,
            audio: AudioSlot::default(),
            events: Vec::new(),
            time: 0.0,
        })
    }

    /// Advance one frame at elapsed time `t` (seconds since start).
    pub fn tick(&mut self, t: f64, camera: &Camera) -> VaultFrame {
        self.time = t;

        let yaw = self.rotation.advance(&self.config);

        for entity in self.registry.iter_mut() {
            let hovered = self.picked == Some(entity.id());
            if glow::advance_entity(entity, t, hovered, &self.config) == FlashStep::Ended {
                tracing::debug!("Flash ended on {}", entity.id());
                self.events.push(VaultEvent::FlashEnded {
                    entity: entity.id(),
                });
            }
            if !entity.is_sane() {
                tracing::warn!("Card {} produced non-finite state, resetting", entity.id());
                entity.reset_animation();
            }
        }

        self.particles.advance();

        self.update_pick(camera, yaw);

        VaultFrame {
            time: t,
            yaw,
            holo_scroll: glow::holo_scroll(t, &self.config),
            particle_yaw: self.particles.yaw(),
            picked: self.picked,
        }
    }

    fn update_pick(&mut self, camera: &Camera, yaw: f64) {
        let ray = camera.ray_from_ndc(self.pointer_ndc);
        let hit = pick(
            &ray,
            &self.registry,
            &self.hit_index,
            yaw,
            self.config.card.line_pick_threshold,
        );
        let now = hit.map(|h| h.entity);

        if now != self.picked {
            tracing::debug!("Pick changed {:?} -> {:?}", self.picked, now);
            self.picked = now;
            if let Some(entity) = now.and_then(|id| self.registry.get(id)) {
                let text = entity.name().to_string();
                self.set_label(text);
            }
        }

        if self.picked.is_none() && self.started {
            let idle = self.config.idle_label.clone();
            if self.label.as_deref() != Some(idle.as_str()) {
                self.set_label(idle);
            }
        }
    }

    fn set_label(&mut self, text: String) {
        self.label = Some(text.clone());
        self.events.push(VaultEvent::LabelChanged { text });
    }

    /// Pointer click at elapsed time `now`. Acts on the current pick only.
    ///
    /// Plays the picked card's clip (stopping any other) and flashes it. Does
    /// nothing when nothing is picked or the card has no clip.
    pub fn click(&mut self, now: f64) {
        let Some(id) = self.picked else {
            return;
        };
        let Some(entity) = self.registry.get_mut(id) else {
            return;
        };
        let Some(source) = entity.audio().map(str::to_string) else {
            tracing::debug!("Card {} has no audio, click ignored", id);
            return;
        };

        glow::start_flash(entity, now, &self.config);
        let until = now + self.config.flash_duration;

        tracing::info!("Playing {} for {}", source, entity.name());
        if let Some(previous) = self.audio.play(id, source.clone()) {
            self.events.push(VaultEvent::StopAudio(previous));
        }
        self.events.push(VaultEvent::PlayAudio(Playback { entity: id, source }));
        self.events.push(VaultEvent::FlashStarted { entity: id, until });
    }

    /// Stop whatever clip is playing, if any.
    pub fn stop_audio(&mut self) {
        if let Some(previous) = self.audio.stop() {
            self.events.push(VaultEvent::StopAudio(previous));
        }
    }

    /// Viewport size in pixels, used to convert pointer positions.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = [width, height];
    }

    /// Pointer position in viewport pixels (origin top-left).
    ///
    /// Before a viewport is set, or while it is zero-sized, this maps to the centre.
    pub fn pointer_moved(&mut self, px: f64, py: f64) {
        self.pointer_ndc = pointer_to_ndc(px, py, self.viewport[0], self.viewport[1]);
    }

    /// Pointer position in normalized device coordinates. Clamped to [-1, 1].
    pub fn set_pointer_ndc(&mut self, ndc: [f64; 2]) {
        let clamp = |v: f64| if v.is_finite() { v.clamp(-1.0, 1.0) } else { 0.0 };
        self.pointer_ndc = [clamp(ndc[0]), clamp(ndc[1])];
    }

    pub fn hover_enter(&mut self, side: NavSide) {
        self.rotation.hover_enter(side);
    }

    pub fn hover_leave(&mut self) {
        self.rotation.hover_leave();
    }

    /// Open the start gate. From now on an empty pick shows the idle label.
    pub fn mark_started(&mut self) {
        if !self.started {
            tracing::info!("Vault started");
        }
        self.started = true;
    }

    /// Take all queued events.
    pub fn drain_events(&mut self) -> Vec<VaultEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn hit_index(&self) -> &HitIndex {
        &self.hit_index
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    pub fn rotation(&self) -> &VaultRotation {
        &self.rotation
    }

    pub fn pointer_ndc(&self) -> [f64; 2] {
        self.pointer_ndc
    }

    pub fn picked(&self) -> Option<EntityId> {
        self.picked
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn active_audio(&self) -> Option<&Playback> {
        self.audio.active()
    }

    /// Elapsed time of the last tick.
    pub fn time(&self) -> f64 {
        self.time
    }
}
