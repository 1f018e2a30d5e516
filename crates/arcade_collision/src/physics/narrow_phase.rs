//! Narrow-phase overlap test and direction classification
//!
//! A contact's side is decided from where the moving object was at the start
//! of the tick (`previous`) relative to the obstacle's current box. Only the
//! directions of the axis group being evaluated are tested, Top before Bottom
//! and Left before Right, so at most one direction is reported per axis.

use crate::foundation::{Aabb, Vec2};
use crate::physics::collision_event::{Axis, Direction};

/// Direction and correction for one classified overlap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Side of the target that was hit
    pub direction: Direction,
    /// Signed distance that moves the source out of the target along the axis
    pub offset: Vec2,
}

/// Classify an overlap between a moving box and a target along one axis
///
/// Returns `None` when the boxes do not intersect, or when they do but the
/// previous position does not explain the overlap along this axis (e.g. the
/// source was already overlapping vertically when testing `Vertical`).
pub fn classify(previous: &Aabb, current: &Aabb, target: &Aabb, axis: Axis) -> Option<Contact> {
    if !current.intersects(target) {
        return None;
    }

    let (direction, offset) = match axis {
        Axis::Vertical => {
            if previous.top() >= target.bottom() {
                (Direction::TOP, Vec2::new(0.0, target.bottom() - current.top()))
            } else if previous.bottom() <= target.top() {
                (Direction::BOTTOM, Vec2::new(0.0, target.top() - current.bottom()))
            } else {
                return None;
            }
        }
        Axis::Horizontal => {
            if previous.left() >= target.right() {
                (Direction::LEFT, Vec2::new(target.right() - current.left(), 0.0))
            } else if previous.right() <= target.left() {
                (Direction::RIGHT, Vec2::new(target.left() - current.right(), 0.0))
            } else {
                return None;
            }
        }
    };

    Some(Contact { direction, offset })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const PLATFORM: Aabb = Aabb::new(100.0, 100.0, 40.0, 40.0);

    #[test]
    fn test_falling_onto_platform() {
        let previous = Aabb::new(100.0, 50.0, 20.0, 20.0);
        let current = Aabb::new(100.0, 95.0, 20.0, 20.0);

        let contact = classify(&previous, &current, &PLATFORM, Axis::Vertical).unwrap();
        assert_eq!(contact.direction, Direction::BOTTOM);
        assert_relative_eq!(contact.offset.y, 100.0 - 115.0);
        assert_relative_eq!(contact.offset.x, 0.0);

        // Entry came from above, so nothing horizontal is reported
        assert!(classify(&previous, &current, &PLATFORM, Axis::Horizontal).is_none());
    }

    #[test]
    fn test_head_bump() {
        let previous = Aabb::new(105.0, 150.0, 20.0, 20.0);
        let current = Aabb::new(105.0, 135.0, 20.0, 20.0);

        let contact = classify(&previous, &current, &PLATFORM, Axis::Vertical).unwrap();
        assert_eq!(contact.direction, Direction::TOP);
        assert_relative_eq!(contact.offset.y, 5.0);
    }

    #[test]
    fn test_walking_into_walls() {
        let from_left_prev = Aabb::new(70.0, 110.0, 20.0, 20.0);
        let from_left = Aabb::new(85.0, 110.0, 20.0, 20.0);
        let contact = classify(&from_left_prev, &from_left, &PLATFORM, Axis::Horizontal).unwrap();
        assert_eq!(contact.direction, Direction::RIGHT);
        assert_relative_eq!(contact.offset.x, -5.0);

        let from_right_prev = Aabb::new(145.0, 110.0, 20.0, 20.0);
        let from_right = Aabb::new(137.0, 110.0, 20.0, 20.0);
        let contact = classify(&from_right_prev, &from_right, &PLATFORM, Axis::Horizontal).unwrap();
        assert_eq!(contact.direction, Direction::LEFT);
        assert_relative_eq!(contact.offset.x, 3.0);
    }

    #[test]
    fn test_no_intersection_no_contact() {
        let previous = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let current = Aabb::new(5.0, 5.0, 10.0, 10.0);
        assert!(classify(&previous, &current, &PLATFORM, Axis::Vertical).is_none());
    }

    #[test]
    fn test_already_overlapping_is_unclassified() {
        let inside = Aabb::new(110.0, 110.0, 10.0, 10.0);
        assert!(classify(&inside, &inside, &PLATFORM, Axis::Vertical).is_none());
        assert!(classify(&inside, &inside, &PLATFORM, Axis::Horizontal).is_none());
    }

    #[test]
    fn test_zero_area_never_collides() {
        let previous = Aabb::new(100.0, 50.0, 20.0, 0.0);
        let current = Aabb::new(100.0, 110.0, 20.0, 0.0);
        assert!(classify(&previous, &current, &PLATFORM, Axis::Vertical).is_none());
    }
}
