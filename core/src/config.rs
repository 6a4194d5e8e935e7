use std::path::Path;

use crate::error::{read_to_string, VaultError};

/// Card dimensions used both for rendering and for hit-testing.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CardGeometry {
    /// Glass pane width/height
    pub pane_size: f64,
    /// Glass pane thickness
    pub pane_depth: f64,
    /// Front/back image plane edge length
    pub image_size: f64,
    /// Distance of the image planes from the pane centre
    pub image_offset: f64,
    /// Distance of the holo overlays from the pane centre
    pub holo_offset: f64,
    /// Outer size of the corner bracket frame
    pub bracket_size: f64,
    /// Length of each bracket arm
    pub bracket_arm: f64,
    /// Max ray-to-segment distance that counts as a bracket hit (world units)
    pub line_pick_threshold: f64,
}

impl Default for CardGeometry {
    fn default() -> Self {
        Self {
            pane_size: 4.0,
            pane_depth: 0.05,
            image_size: 3.8,
            image_offset: 0.03,
            holo_offset: 0.07,
            bracket_size: 4.2,
            bracket_arm: 0.6,
            line_pick_threshold: 1.0,
        }
    }
}

/// Ambient dust configuration
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ParticleConfig {
    pub count: usize,
    /// Initial positions are uniform in [-spawn_half_extent, spawn_half_extent] per axis
    pub spawn_half_extent: f64,
    /// Velocity components are uniform in [-max_step, max_step] (units per tick)
    pub max_step: f64,
    /// Half-width of the bounding cube
    pub bound: f64,
    /// Whole-field yaw increment per tick
    pub spin_per_tick: f64,
    pub rng_seed: u64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 6000,
            spawn_half_extent: 50.0,
            max_step: 0.015,
            bound: 60.0,
            spin_per_tick: 0.001,
            rng_seed: 42,
        }
    }
}

impl ParticleConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.bound.is_finite() || self.bound <= 0.0 {
            return Err("particles.bound must be finite and > 0".to_string());
        }
        if !self.spawn_half_extent.is_finite() || self.spawn_half_extent < 0.0 {
            return Err("particles.spawn_half_extent must be finite and >= 0".to_string());
        }
        // A particle spawned outside the cube would flip every tick and never return.
        if self.spawn_half_extent > self.bound {
            return Err("particles.spawn_half_extent must be <= particles.bound".to_string());
        }
        if !self.max_step.is_finite() || self.max_step < 0.0 {
            return Err("particles.max_step must be finite and >= 0".to_string());
        }
        if !self.spin_per_tick.is_finite() {
            return Err("particles.spin_per_tick must be finite".to_string());
        }
        Ok(())
    }
}

/// Vault tuning. Rotation speeds and easing are per tick, pulse and scroll rates per second.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct VaultConfig {
    pub ring_radius: f64,
    pub base_y: f64,
    pub float_amplitude: f64,
    pub holo_scroll_rate: f64,
    pub hover_scale: f64,
    /// Fraction of the remaining gap closed per tick by scale and glow decay
    pub ease_factor: f64,
    pub pulse_base: f64,
    pub pulse_amplitude: f64,
    /// Angular frequency of the hover pulse (rad/s)
    pub pulse_frequency: f64,
    pub flash_intensity: f64,
    pub flash_duration: f64,
    pub base_rotation_speed: f64,
    pub nav_rotation_speed: f64,
    pub idle_label: String,
    /// Used as `<prefix><index>` when a source item has no label
    pub fallback_name_prefix: String,
    pub card: CardGeometry,
    pub particles: ParticleConfig,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            ring_radius: 15.0,
            base_y: 1.0,
            float_amplitude: 0.4,
            holo_scroll_rate: 0.15,
            hover_scale: 1.25,
            ease_factor: 0.1,
            pulse_base: 0.3,
            pulse_amplitude: 0.3,
            pulse_frequency: 8.0,
            flash_intensity: 3.0,
            flash_duration: 0.5,
            base_rotation_speed: 0.003,
            nav_rotation_speed: 0.025,
            idle_label: "SCANNING_VAULT".to_string(),
            fallback_name_prefix: "ARCHIVE_".to_string(),
            card: CardGeometry::default(),
            particles: ParticleConfig::default(),
        }
    }
}

impl VaultConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.ring_radius.is_finite() || self.ring_radius < 0.0 {
            return Err("ring_radius must be finite and >= 0".to_string());
        }
        if !self.ease_factor.is_finite() || self.ease_factor <= 0.0 || self.ease_factor > 1.0 {
            return Err("ease_factor must be in (0, 1]".to_string());
        }
        if !self.hover_scale.is_finite() || self.hover_scale <= 0.0 {
            return Err("hover_scale must be finite and > 0".to_string());
        }
        if !self.flash_duration.is_finite() || self.flash_duration < 0.0 {
            return Err("flash_duration must be finite and >= 0".to_string());
        }
        if !self.base_rotation_speed.is_finite() || !self.nav_rotation_speed.is_finite() {
            return Err("rotation speeds must be finite".to_string());
        }
        for (name, v) in [
            ("base_y", self.base_y),
            ("float_amplitude", self.float_amplitude),
            ("holo_scroll_rate", self.holo_scroll_rate),
            ("pulse_base", self.pulse_base),
            ("pulse_amplitude", self.pulse_amplitude),
            ("pulse_frequency", self.pulse_frequency),
            ("flash_intensity", self.flash_intensity),
        ] {
            if !v.is_finite() {
                return Err(format!("{name} must be finite"));
            }
        }
        let card = &self.card;
        if card.pane_size <= 0.0 || card.image_size <= 0.0 || card.bracket_size <= 0.0 {
            return Err("card sizes must be > 0".to_string());
        }
        if card.line_pick_threshold < 0.0 {
            return Err("card.line_pick_threshold must be >= 0".to_string());
        }
        self.particles.validate()
    }

    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, VaultError> {
        let config: VaultConfig = serde_json::from_str(json)?;
        config.validate().map_err(VaultError::InvalidConfig)?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, VaultError> {
        Self::from_json_str(&read_to_string(path.as_ref())?)
    }

    /// Load from the path in `VAULT_CONFIG`, or defaults when unset.
    pub fn from_env() -> Result<Self, VaultError> {
        match std::env::var_os("VAULT_CONFIG") {
            Some(path) => {
                tracing::info!("Loading vault config from {:?}", path);
                Self::load(path)
            }
            None => Ok(Self::default()),
        }
    }
}
