use crate::config::VaultConfig;

/// Lateral navigation region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavSide {
    Left,
    Right,
}

impl NavSide {
    /// Rotation sign selected by hovering this side.
    pub fn direction(self) -> f64 {
        match self {
            NavSide::Left => 1.0,
            NavSide::Right => -1.0,
        }
    }
}

/// Accumulated yaw of the whole card ring.
///
/// The direction is sticky: leaving a side region only drops the speed back
/// to the idle drift, it never resets the direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VaultRotation {
    yaw: f64,
    direction: f64,
    navigating: bool,
}

impl Default for VaultRotation {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            direction: 1.0,
            navigating: false,
        }
    }
}

impl VaultRotation {
    pub fn hover_enter(&mut self, side: NavSide) {
        self.navigating = true;
        self.direction = side.direction();
    }

    pub fn hover_leave(&mut self) {
        self.navigating = false;
    }

    /// Angular step for the current navigation state (radians per tick).
    pub fn speed(&self, config: &VaultConfig) -> f64 {
        if self.navigating {
            config.nav_rotation_speed
        } else {
            config.base_rotation_speed
        }
    }

    /// Advance one tick and return the new yaw.
    pub fn advance(&mut self, config: &VaultConfig) -> f64 {
        self.yaw += self.speed(config) * self.direction;
        self.yaw
    }

    pub fn yaw(&self) -> f64 {
        self.yaw
    }

    /// Yaw wrapped into [0, 2π) for display.
    pub fn display_yaw(&self) -> f64 {
        self.yaw.rem_euclid(std::f64::consts::TAU)
    }

    pub fn direction(&self) -> f64 {
        self.direction
    }

    pub fn is_navigating(&self) -> bool {
        self.navigating
    }
}
