//! The particle cloud seeded around the open pages.

use super::poisson::{PointCloud, PoissonDiskSampler};
use crate::constants::{
    PARTICLE_OPEN_HINGE, POISSON_MIN_DISTANCE, SPAWN_DEPTH_RATIO, SPAWN_HEIGHT_RATIO,
    SPAWN_WIDTH_RATIO, SPINE_DEPTH,
};
use crate::types::Dimensions;
use glam::Vec3;
use rand::Rng;

/// Particle spawn positions plus the rules deciding how many are shown.
#[derive(Debug, Clone)]
pub struct ParticleField {
    cloud: PointCloud,
}

impl ParticleField {
    /// Seed `count` particles inside the spawn box for a book of `dimensions`.
    pub fn seed<R: Rng + ?Sized>(dimensions: &Dimensions, count: usize, rng: &mut R) -> Self {
        let mut sampler = PoissonDiskSampler::new(
            dimensions.width * SPAWN_WIDTH_RATIO,
            dimensions.height * SPAWN_HEIGHT_RATIO,
            SPINE_DEPTH * SPAWN_DEPTH_RATIO,
            POISSON_MIN_DISTANCE,
        );
        let cloud = sampler.sample(count, rng);
        tracing::debug!(
            "Seeded {} particles ({} spaced, {} padded)",
            cloud.len(),
            cloud.accepted,
            cloud.len() - cloud.accepted
        );
        Self { cloud }
    }

    pub fn count(&self) -> usize {
        self.cloud.len()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.cloud.points
    }

    pub fn cloud(&self) -> &PointCloud {
        &self.cloud
    }

    /// Particles only show while at least one cover stands open.
    pub fn is_visible(&self, enabled: bool, front_hinge: f32, back_hinge: f32) -> bool {
        enabled && (front_hinge > PARTICLE_OPEN_HINGE || back_hinge > PARTICLE_OPEN_HINGE)
    }

    /// Number of particles shown at `intensity` in [0, 1].
    pub fn active_count(&self, intensity: f32) -> usize {
        let intensity = intensity.clamp(0.0, 1.0);
        ((intensity * self.count() as f32).floor() as usize).min(self.count())
    }

    /// The particles currently shown, or none when hidden.
    pub fn visible_positions(
        &self,
        enabled: bool,
        intensity: f32,
        front_hinge: f32,
        back_hinge: f32,
    ) -> &[Vec3] {
        if !self.is_visible(enabled, front_hinge, back_hinge) {
            return &[];
        }
        &self.cloud.points[..self.active_count(intensity)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn field(count: usize) -> ParticleField {
        ParticleField::seed(&Dimensions::default(), count, &mut StdRng::seed_from_u64(9))
    }

    #[test]
    fn test_seed_count_and_spawn_box() {
        let field = field(200);
        assert_eq!(field.count(), 200);
        for p in field.positions() {
            assert!(p.x.abs() <= 1.2 + 1e-6);
            assert!(p.y.abs() <= 1.0 + 1e-6);
            assert!(p.z.abs() <= 0.15 + 1e-6);
        }
    }

    #[test]
    fn test_hidden_while_closed_or_disabled() {
        let field = field(100);
        assert!(!field.is_visible(true, 0.0, 0.0));
        assert!(!field.is_visible(true, 0.5, 0.5));
        assert!(field.is_visible(true, 0.6, 0.0));
        assert!(!field.is_visible(false, 1.0, 1.0));
        assert!(field.visible_positions(true, 1.0, 0.0, 0.0).is_empty());
    }

    #[test]
    fn test_active_count_follows_intensity() {
        let field = field(100);
        assert_eq!(field.active_count(0.0), 0);
        assert_eq!(field.active_count(0.25), 25);
        assert_eq!(field.active_count(3.0), 100);
        assert_eq!(field.visible_positions(true, 0.5, 1.0, 1.0).len(), 50);
    }
}
