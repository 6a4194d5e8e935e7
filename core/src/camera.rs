use crate::vec3::{add, cross, normalize, scale, sub, vec3, Vec3};

/// Perspective camera as seen by the picker. Right-handed, looks from `position` toward `target`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees
    pub fov_y: f64,
    pub aspect: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: vec3(0.0, 10.0, 32.0),
            target: Vec3::ZERO,
            fov_y: 60.0,
            aspect: 16.0 / 9.0,
        }
    }
}

/// Half-line used for picking. `dir` is unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Camera {
    /// Camera basis (right, up, forward).
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = normalize(sub(self.target, self.position));
        let right = normalize(cross(forward, Vec3::Y));
        let up = cross(right, forward);
        (right, up, forward)
    }

    /// Ray from the eye through normalized device coordinates in [-1, 1].
    pub fn ray_from_ndc(&self, ndc: [f64; 2]) -> Ray {
        let (right, up, forward) = self.basis();
        let tan_half = (self.fov_y.to_radians() * 0.5).tan();
        let dx = ndc[0] * tan_half * self.aspect.max(1e-6);
        let dy = ndc[1] * tan_half;
        let dir = normalize(add(add(forward, scale(right, dx)), scale(up, dy)));
        Ray {
            origin: self.position,
            dir,
        }
    }

    /// Update the aspect ratio after a viewport resize. Degenerate sizes are ignored.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }
}

/// Convert a viewport pixel position (origin top-left, Y down) to clamped NDC.
pub fn pointer_to_ndc(px: f64, py: f64, width: f64, height: f64) -> [f64; 2] {
    if !(width > 0.0 && height > 0.0) || !px.is_finite() || !py.is_finite() {
        return [0.0, 0.0];
    }
    let x = (px / width) * 2.0 - 1.0;
    let y = -(py / height) * 2.0 + 1.0;
    [x.clamp(-1.0, 1.0), y.clamp(-1.0, 1.0)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3::{dot, length};

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "Expected {} to be close to {}",
            actual,
            expected
        );
    }

    #[test]
    fn centre_ray_points_at_target() {
        let camera = Camera::default();
        let ray = camera.ray_from_ndc([0.0, 0.0]);
        let expected = normalize(sub(camera.target, camera.position));
        assert_close(dot(ray.dir, expected), 1.0);
        assert_eq!(ray.origin, camera.position);
    }

    #[test]
    fn top_edge_ray_is_half_fov_above_forward() {
        let camera = Camera {
            position: Vec3::ZERO,
            target: vec3(0.0, 0.0, -1.0),
            fov_y: 90.0,
            aspect: 1.0,
        };
        let ray = camera.ray_from_ndc([0.0, 1.0]);
        assert_close(length(ray.dir), 1.0);
        assert_close(ray.dir.y, std::f64::consts::FRAC_1_SQRT_2);
        assert_close(ray.dir.z, -std::f64::consts::FRAC_1_SQRT_2);
    }

    #[test]
    fn right_ndc_turns_ray_right() {
        let camera = Camera {
            position: Vec3::ZERO,
            target: vec3(0.0, 0.0, -1.0),
            fov_y: 60.0,
            aspect: 2.0,
        };
        assert!(camera.ray_from_ndc([1.0, 0.0]).dir.x > 0.0);
        assert!(camera.ray_from_ndc([-1.0, 0.0]).dir.x < 0.0);
    }

    #[test]
    fn pointer_maps_corners() {
        assert_eq!(pointer_to_ndc(0.0, 0.0, 800.0, 600.0), [-1.0, 1.0]);
        assert_eq!(pointer_to_ndc(800.0, 600.0, 800.0, 600.0), [1.0, -1.0]);
        assert_eq!(pointer_to_ndc(400.0, 300.0, 800.0, 600.0), [0.0, 0.0]);
    }

    #[test]
    fn off_canvas_pointer_is_clamped() {
        assert_eq!(pointer_to_ndc(-50.0, 900.0, 800.0, 600.0), [-1.0, -1.0]);
        assert_eq!(pointer_to_ndc(f64::NAN, 1.0, 800.0, 600.0), [0.0, 0.0]);
        assert_eq!(pointer_to_ndc(10.0, 10.0, 0.0, 600.0), [0.0, 0.0]);
    }

    #[test]
    fn resize_updates_aspect() {
        let mut camera = Camera::default();
        camera.set_viewport(1000.0, 500.0);
        assert_close(camera.aspect, 2.0);
        camera.set_viewport(0.0, 500.0);
        assert_close(camera.aspect, 2.0);
    }
}
