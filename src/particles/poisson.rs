//! Poisson-disk (blue-noise) point sampling inside a centred box.
//!
//! Uses a uniform grid with cell size `d / √3`, so a cell holds at most one
//! accepted point and neighbour checks stay O(1).

use crate::constants::POISSON_ATTEMPTS;
use glam::Vec3;
use rand::Rng;
use std::collections::HashMap;
use std::f32::consts::TAU;

/// Points produced by [`PoissonDiskSampler::sample`].
///
/// The first `accepted` points respect the minimum distance. Any points after
/// that are uniform padding, added when the sampler ran out of room before
/// reaching the requested count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    pub points: Vec<Vec3>,
    pub accepted: usize,
}

impl PointCloud {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn accepted_points(&self) -> &[Vec3] {
        &self.points[..self.accepted]
    }

    pub fn padded_points(&self) -> &[Vec3] {
        &self.points[self.accepted..]
    }
}

type CellKey = (i32, i32, i32);

pub struct PoissonDiskSampler {
    extent: Vec3,
    min_distance: f32,
    cell_size: f32,
    /// How many cells out a neighbour closer than `min_distance` can sit.
    reach: i32,
    grid: HashMap<CellKey, Vec3>,
    active: Vec<Vec3>,
}

impl PoissonDiskSampler {
    /// Sampler over the box `[-w/2, w/2] × [-h/2, h/2] × [-d/2, d/2]`.
    pub fn new(width: f32, height: f32, depth: f32, min_distance: f32) -> Self {
        let min_distance = min_distance.max(f32::EPSILON);
        let cell_size = min_distance / 3f32.sqrt();
        Self {
            extent: Vec3::new(width.max(0.0), height.max(0.0), depth.max(0.0)),
            min_distance,
            cell_size,
            reach: (min_distance / cell_size).ceil() as i32,
            grid: HashMap::new(),
            active: Vec::new(),
        }
    }

    pub fn min_distance(&self) -> f32 {
        self.min_distance
    }

    /// Generate exactly `count` points.
    pub fn sample<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> PointCloud {
        self.clear();
        let mut points = Vec::with_capacity(count);
        if count == 0 {
            return PointCloud::default();
        }

        let first = self.random_point(rng);
        self.add_point(first);
        points.push(first);

        while !self.active.is_empty() && points.len() < count {
            let idx = rng.gen_range(0..self.active.len());
            let center = self.active[idx];

            let mut found = None;
            for _ in 0..POISSON_ATTEMPTS {
                let candidate = self.random_around(center, rng);
                if self.is_valid(candidate) {
                    found = Some(candidate);
                    break;
                }
            }

            match found {
                Some(point) => {
                    self.add_point(point);
                    points.push(point);
                }
                None => {
                    self.active.swap_remove(idx);
                }
            }
        }

        let accepted = points.len();
        // Guaranteed count beats perfect spacing for a cosmetic cloud.
        while points.len() < count {
            points.push(self.random_point(rng));
        }

        PointCloud { points, accepted }
    }

    pub fn clear(&mut self) {
        self.grid.clear();
        self.active.clear();
    }

    fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        Vec3::new(
            (rng.gen::<f32>() - 0.5) * self.extent.x,
            (rng.gen::<f32>() - 0.5) * self.extent.y,
            (rng.gen::<f32>() - 0.5) * self.extent.z,
        )
    }

    /// A candidate in the annulus `[d, 2d]` around `center` in XY, with a
    /// small Z jitter.
    fn random_around<R: Rng + ?Sized>(&self, center: Vec3, rng: &mut R) -> Vec3 {
        let angle = rng.gen::<f32>() * TAU;
        let radius = self.min_distance * (1.0 + rng.gen::<f32>());
        Vec3::new(
            center.x + angle.cos() * radius,
            center.y + angle.sin() * radius,
            center.z + (rng.gen::<f32>() - 0.5) * self.min_distance,
        )
    }

    fn cell_of(&self, point: Vec3) -> CellKey {
        let shifted = (point + self.extent / 2.0) / self.cell_size;
        (
            shifted.x.floor() as i32,
            shifted.y.floor() as i32,
            shifted.z.floor() as i32,
        )
    }

    fn in_bounds(&self, point: Vec3) -> bool {
        let half = self.extent / 2.0;
        point.x.abs() <= half.x && point.y.abs() <= half.y && point.z.abs() <= half.z
    }

    fn is_valid(&self, point: Vec3) -> bool {
        if !self.in_bounds(point) {
            return false;
        }

        let (cx, cy, cz) = self.cell_of(point);
        let r = self.reach;
        for dx in -r..=r {
            for dy in -r..=r {
                for dz in -r..=r {
                    if let Some(neighbor) = self.grid.get(&(cx + dx, cy + dy, cz + dz)) {
                        if neighbor.distance(point) < self.min_distance {
                            return false;
                        }
                    }
                }
            }
        }
        true
    }

    fn add_point(&mut self, point: Vec3) {
        let key = self.cell_of(point);
        self.grid.insert(key, point);
        self.active.push(point);
    }
}
