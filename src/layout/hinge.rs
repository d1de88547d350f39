//! Cover and page kinematics about the spine edge.

use super::pages::{page_depth_offset, stack_of, Stack};
use crate::config::BookConfig;
use crate::constants::{COVER_THICKNESS, SPINE_DEPTH, SPINE_WIDTH};
use crate::types::FlipDirection;
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverSide {
    Front,
    Back,
}

/// A cover's pivot on the spine edge and its Y rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverPose {
    pub side: CoverSide,
    pub pivot: Vec3,
    pub rotation_y: f32,
}

impl CoverPose {
    /// Front and back covers rotate with opposite signs so both open outward
    /// as their hinge angle grows.
    pub fn new(side: CoverSide, hinge: f32) -> Self {
        let (z, rotation_y) = match side {
            CoverSide::Front => (SPINE_DEPTH / 2.0, -hinge),
            CoverSide::Back => (-SPINE_DEPTH / 2.0, hinge),
        };
        Self {
            side,
            pivot: Vec3::new(SPINE_WIDTH / 2.0, 0.0, z),
            rotation_y,
        }
    }

    pub fn front(config: &BookConfig) -> Self {
        Self::new(CoverSide::Front, config.front_hinge)
    }

    pub fn back(config: &BookConfig) -> Self {
        Self::new(CoverSide::Back, config.back_hinge)
    }

    /// Pivot-space transform; cover geometry extends along +X from the pivot.
    pub fn transform(&self) -> Mat4 {
        Mat4::from_translation(self.pivot) * Mat4::from_rotation_y(self.rotation_y)
    }
}

/// Where a page hangs: a pivot, a Y rotation about it, and a depth offset
/// applied after the rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagePose {
    pub pivot: Vec3,
    pub rotation_y: f32,
    pub depth: f32,
    pub flipping: bool,
}

impl PagePose {
    pub fn transform(&self) -> Mat4 {
        Mat4::from_translation(self.pivot)
            * Mat4::from_rotation_y(self.rotation_y)
            * Mat4::from_translation(Vec3::new(0.0, 0.0, self.depth))
    }

    /// Re-pivot the page about the spine edge at its resting depth, turned
    /// by `angle` instead of following its cover.
    pub fn swept(&self, angle: f32) -> PagePose {
        PagePose {
            pivot: Vec3::new(SPINE_WIDTH / 2.0, 0.0, self.pivot.z + self.depth),
            rotation_y: angle,
            depth: 0.0,
            flipping: self.flipping,
        }
    }
}

/// Rotation of the in-flight page: a linear blend between the two cover
/// angles, leaving the cover it started on.
pub fn flipping_page_angle(
    direction: FlipDirection,
    progress: f32,
    front_hinge: f32,
    back_hinge: f32,
) -> f32 {
    let front = -front_hinge;
    let back = back_hinge;
    let progress = progress.clamp(0.0, 1.0);
    match direction {
        FlipDirection::Forward => front + progress * (back - front),
        FlipDirection::Backward => back + progress * (front - back),
    }
}

/// Pose of page `index` under `config`, including the in-flight page.
///
/// Returns `None` for indices outside the book.
pub fn page_pose(config: &BookConfig, index: usize) -> Option<PagePose> {
    if index >= config.page_count {
        return None;
    }

    if config.flipping_page_index == Some(index) && config.flip_progress > 0.0 {
        let direction = config.flip_direction.unwrap_or(FlipDirection::Forward);
        return Some(PagePose {
            pivot: Vec3::new(SPINE_WIDTH / 2.0, 0.0, 0.0),
            rotation_y: flipping_page_angle(
                direction,
                config.flip_progress,
                config.front_hinge,
                config.back_hinge,
            ),
            depth: 0.0,
            flipping: true,
        });
    }

    let offset = page_depth_offset(index, config.current_page, config.page_count);
    let pose = match stack_of(index, config.current_page) {
        Stack::Back => {
            let cover = CoverPose::back(config);
            PagePose {
                pivot: cover.pivot,
                rotation_y: cover.rotation_y,
                depth: COVER_THICKNESS / 2.0 + offset,
                flipping: false,
            }
        }
        Stack::Front => {
            let cover = CoverPose::front(config);
            PagePose {
                pivot: cover.pivot,
                rotation_y: cover.rotation_y,
                depth: -COVER_THICKNESS / 2.0 + offset,
                flipping: false,
            }
        }
    };
    Some(pose)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn open_config() -> BookConfig {
        BookConfig {
            front_hinge: 0.4 * PI,
            back_hinge: 0.3 * PI,
            ..BookConfig::default()
        }
    }

    #[test]
    fn test_cover_sign_convention() {
        let config = open_config();
        assert_eq!(CoverPose::front(&config).rotation_y, -0.4 * PI);
        assert_eq!(CoverPose::back(&config).rotation_y, 0.3 * PI);
        assert_eq!(CoverPose::front(&config).pivot, Vec3::new(0.05, 0.0, 0.3));
        assert_eq!(CoverPose::back(&config).pivot, Vec3::new(0.05, 0.0, -0.3));
    }

    #[test]
    fn test_covers_open_outward() {
        // The far edge of an opening front cover moves toward +Z (away from the back cover).
        let edge = Vec3::new(3.0, 0.0, 0.0);
        let closed = CoverPose::new(CoverSide::Front, 0.0).transform().transform_point3(edge);
        let open = CoverPose::new(CoverSide::Front, 0.5).transform().transform_point3(edge);
        assert!(open.z > closed.z);

        let closed = CoverPose::new(CoverSide::Back, 0.0).transform().transform_point3(edge);
        let open = CoverPose::new(CoverSide::Back, 0.5).transform().transform_point3(edge);
        assert!(open.z < closed.z);
    }

    #[test]
    fn test_flipping_angle_endpoints() {
        let (front, back) = (1.0, 0.5);
        assert_eq!(flipping_page_angle(FlipDirection::Forward, 0.0, front, back), -1.0);
        assert_eq!(flipping_page_angle(FlipDirection::Forward, 1.0, front, back), 0.5);
        assert_eq!(flipping_page_angle(FlipDirection::Backward, 0.0, front, back), 0.5);
        assert_eq!(flipping_page_angle(FlipDirection::Backward, 1.0, front, back), -1.0);
        assert!((flipping_page_angle(FlipDirection::Forward, 0.5, front, back) + 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_page_pose_follows_stack() {
        let config = open_config();

        let back = page_pose(&config, 3).unwrap();
        assert_eq!(back.rotation_y, config.back_hinge);
        assert!(back.depth > 0.0);

        let front = page_pose(&config, 20).unwrap();
        assert_eq!(front.rotation_y, -config.front_hinge);
        assert!(front.depth < 0.0);

        assert!(page_pose(&config, 30).is_none());
    }

    #[test]
    fn test_page_pose_for_flipping_page() {
        let config = BookConfig {
            flipping_page_index: Some(15),
            flip_progress: 0.5,
            flip_direction: Some(FlipDirection::Forward),
            ..open_config()
        };
        let pose = page_pose(&config, 15).unwrap();
        assert!(pose.flipping);
        assert_eq!(pose.pivot, Vec3::new(0.05, 0.0, 0.0));
        let expected = flipping_page_angle(FlipDirection::Forward, 0.5, config.front_hinge, config.back_hinge);
        assert_eq!(pose.rotation_y, expected);

        // Progress 0 means the page has not left its stack yet.
        let config = BookConfig { flip_progress: 0.0, ..config };
        assert!(!page_pose(&config, 15).unwrap().flipping);
    }

    #[test]
    fn test_closed_pages_stay_between_covers() {
        let config = BookConfig::default();
        for index in 0..config.page_count {
            let pose = page_pose(&config, index).unwrap();
            let origin = pose.transform().transform_point3(Vec3::ZERO);
            assert!(origin.z.abs() <= SPINE_DEPTH / 2.0, "page {} at {}", index, origin.z);
        }
    }

    #[test]
    fn test_swept_pose_keeps_resting_depth() {
        let config = BookConfig::default();
        let pose = page_pose(&config, 0).unwrap();
        let swept = pose.swept(0.7);
        assert_eq!(swept.rotation_y, 0.7);
        assert!((swept.pivot.z - (pose.pivot.z + pose.depth)).abs() < 1e-6);
    }
}
