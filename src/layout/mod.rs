//! Geometric layout of the book: which stack each page belongs to, how far
//! it sits from its cover, and how covers and pages rotate about the spine.

pub mod hinge;
pub mod pages;

pub use hinge::{flipping_page_angle, page_pose, CoverPose, CoverSide, PagePose};
pub use pages::{available_depth, distribute, page_depth_offset, stack_of, PageSlot, Stack};
