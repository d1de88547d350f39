//! Page depth distribution across the fixed spine depth.
//!
//! Pages do not stack physically. Each stack is fanned evenly from the inner
//! face of its cover toward the spine centre, so a denser book packs its
//! pages tighter instead of growing thicker.

use crate::constants::{COVER_THICKNESS, SPINE_DEPTH};
use serde::{Deserialize, Serialize};

/// The cover a page is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stack {
    Back,
    Front,
}

/// A page's stack membership and depth offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSlot {
    pub index: usize,
    pub stack: Stack,
    /// Offset along Z from the inner cover face. Positive for the back stack
    /// (toward the centre from z = -depth/2), negative for the front stack.
    pub offset: f32,
}

/// Usable half-depth between a cover's inner face and the spine centre.
pub fn available_depth() -> f32 {
    SPINE_DEPTH / 2.0 - COVER_THICKNESS / 2.0
}

/// Stack membership for a page given the split point.
pub fn stack_of(index: usize, current_page: usize) -> Stack {
    if index < current_page {
        Stack::Back
    } else {
        Stack::Front
    }
}

/// Depth offset of `index` inside its stack.
pub fn page_depth_offset(index: usize, current_page: usize, page_count: usize) -> f32 {
    let depth = available_depth();
    match stack_of(index, current_page) {
        Stack::Back => {
            // Page 0 rests on the back cover, the last back page nearest the centre.
            let span = current_page.saturating_sub(1).max(1);
            let progress = index as f32 / span as f32;
            progress * depth
        }
        Stack::Front => {
            let span = page_count
                .saturating_sub(current_page)
                .saturating_sub(1)
                .max(1);
            let progress = (index - current_page) as f32 / span as f32;
            -progress * depth
        }
    }
}

/// Slots for every page in the book.
pub fn distribute(current_page: usize, page_count: usize) -> Vec<PageSlot> {
    (0..page_count)
        .map(|index| PageSlot {
            index,
            stack: stack_of(index, current_page),
            offset: page_depth_offset(index, current_page, page_count),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_depth() {
        assert!((available_depth() - 0.275).abs() < 1e-6);
    }

    #[test]
    fn test_split_point() {
        assert_eq!(stack_of(14, 15), Stack::Back);
        assert_eq!(stack_of(15, 15), Stack::Front);
        assert_eq!(stack_of(0, 0), Stack::Front);
    }

    #[test]
    fn test_stack_ends_reach_cover_and_centre() {
        let depth = available_depth();
        let slots = distribute(15, 30);

        assert_eq!(slots[0].offset, 0.0);
        assert!((slots[14].offset - depth).abs() < 1e-6);
        assert_eq!(slots[15].offset, 0.0);
        assert!((slots[29].offset + depth).abs() < 1e-6);
    }

    #[test]
    fn test_monotonic_and_bounded_for_all_books() {
        let depth = available_depth();
        for page_count in 10..=100 {
            for current_page in 0..page_count {
                let slots = distribute(current_page, page_count);
                assert_eq!(slots.len(), page_count);

                for pair in slots.windows(2) {
                    let (a, b) = (pair[0], pair[1]);
                    if a.stack == Stack::Back && b.stack == Stack::Back {
                        assert!(b.offset >= a.offset, "back {} {}", page_count, current_page);
                    }
                    if a.stack == Stack::Front && b.stack == Stack::Front {
                        assert!(b.offset <= a.offset, "front {} {}", page_count, current_page);
                    }
                }
                for slot in &slots {
                    assert!(slot.offset.abs() <= depth + 1e-6);
                }
            }
        }
    }

    #[test]
    fn test_single_member_stacks_do_not_divide_by_zero() {
        // One back page, one front page.
        let slots = distribute(1, 2);
        assert_eq!(slots[0].offset, 0.0);
        assert_eq!(slots[1].offset, 0.0);

        let slots = distribute(9, 10);
        assert!(slots.iter().all(|s| s.offset.is_finite()));
    }
}
