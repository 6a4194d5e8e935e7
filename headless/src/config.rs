use vault_core::Camera;

/// Headless runner configuration
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub tick_rate_hz: u32,
    /// Capacity of the event broadcast channel
    pub event_capacity: usize,
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Stop after this many ticks. Runs until the command channel closes when unset.
    pub max_ticks: Option<u64>,
    pub camera: Camera,
    pub rng_seed: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        let mut camera = Camera::default();
        camera.set_viewport(1280.0, 720.0);
        Self {
            tick_rate_hz: 60,
            event_capacity: 256,
            viewport_width: 1280.0,
            viewport_height: 720.0,
            max_ticks: None,
            camera,
            rng_seed: 7,
        }
    }
}

impl RunnerConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.tick_rate_hz == 0 {
            return Err("tick_rate_hz must be > 0".to_string());
        }
        if self.event_capacity == 0 {
            return Err("event_capacity must be > 0".to_string());
        }
        if !(self.viewport_width > 0.0 && self.viewport_height > 0.0) {
            return Err("viewport size must be > 0".to_string());
        }
        if !self.camera.position.is_finite() || !self.camera.target.is_finite() {
            return Err("camera position and target must be finite".to_string());
        }
        if !(self.camera.fov_y > 0.0 && self.camera.fov_y < 180.0) {
            return Err("camera fov_y must be in (0, 180)".to_string());
        }
        Ok(())
    }

    /// Seconds per tick
    pub fn tick_dt(&self) -> f64 {
        1.0 / self.tick_rate_hz as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_runner_config_is_valid() {
        assert!(RunnerConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_tick_rate_invalid() {
        let config = RunnerConfig {
            tick_rate_hz: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn degenerate_viewport_invalid() {
        let config = RunnerConfig {
            viewport_height: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_camera_matches_viewport() {
        let config = RunnerConfig::default();
        assert!((config.camera.aspect - 1280.0 / 720.0).abs() < 1e-12);
    }
}
