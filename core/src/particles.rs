//! Ambient dust: a fixed cloud of independently drifting points that bounce
//! off the faces of a bounding cube.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::ParticleConfig;
use crate::vec3::Vec3;

#[derive(Debug, Clone)]
pub struct ParticleField {
    positions: Vec<Vec3>,
    velocities: Vec<Vec3>,
    bound: f64,
    spin_per_tick: f64,
    /// Whole-field rotation about the vertical axis
    yaw: f64,
}

impl ParticleField {
    /// Sample positions and velocities from the seeded RNG.
    pub fn new(config: &ParticleConfig) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.rng_seed);
        let mut sample = |half: f64| (rng.gen::<f64>() - 0.5) * 2.0 * half;

        let mut positions = Vec::with_capacity(config.count);
        let mut velocities = Vec::with_capacity(config.count);
        for _ in 0..config.count {
            let h = config.spawn_half_extent;
            positions.push(Vec3::new(sample(h), sample(h), sample(h)));
            let m = config.max_step;
            velocities.push(Vec3::new(sample(m), sample(m), sample(m)));
        }

        Self::from_parts(positions, velocities, config)
    }

    /// Build a field from explicit buffers. Extra entries in the longer buffer are dropped.
    pub fn from_parts(
        mut positions: Vec<Vec3>,
        mut velocities: Vec<Vec3>,
        config: &ParticleConfig,
    ) -> Self {
        let n = positions.len().min(velocities.len());
        positions.truncate(n);
        velocities.truncate(n);
        Self {
            positions,
            velocities,
            bound: config.bound,
            spin_per_tick: config.spin_per_tick,
            yaw: 0.0,
        }
    }

    /// Advance every particle by one tick. Returns the number of axis bounces.
    ///
    /// A component past the bound keeps its position and has its velocity
    /// negated, so a coordinate can overshoot by at most one step.
    pub fn advance(&mut self) -> usize {
        let bound = self.bound;
        let mut bounces = 0;
        for (pos, vel) in self.positions.iter_mut().zip(self.velocities.iter_mut()) {
            for axis in 0..3 {
                let p = pos.axis_mut(axis);
                *p += vel.axis(axis);
                if p.abs() > bound {
                    let v = vel.axis_mut(axis);
                    *v = -*v;
                    bounces += 1;
                }
            }
        }
        self.yaw += self.spin_per_tick;
        bounces
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    pub fn bound(&self) -> f64 {
        self.bound
    }

    pub fn yaw(&self) -> f64 {
        self.yaw
    }

    /// Copy positions into a renderer vertex buffer, reusing its allocation.
    pub fn write_positions_f32(&self, out: &mut Vec<[f32; 3]>) {
        out.clear();
        out.extend(
            self.positions
                .iter()
                .map(|p| [p.x as f32, p.y as f32, p.z as f32]),
        );
    }
}
