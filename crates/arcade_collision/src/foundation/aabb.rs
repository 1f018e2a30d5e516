//! Axis-aligned bounding rectangle and its geometry helpers
//!
//! Rectangles are half-open: a box spans `[left, right)` horizontally and
//! `[top, bottom)` vertically, so two boxes that merely share an edge do not
//! intersect.

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec2;

/// Axis-aligned rectangle in screen space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Aabb {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Horizontal size
    pub width: f32,
    /// Vertical size
    pub height: f32,
}

impl Aabb {
    /// Create a rectangle from its top-left corner and size
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle spanning two corners
    pub fn from_corners(min: Vec2, max: Vec2) -> Self {
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    /// Create a rectangle centered at a point with the given half-size
    pub fn from_center_extents(center: Vec2, half_extents: Vec2) -> Self {
        Self::from_corners(center - half_extents, center + half_extents)
    }

    /// Left edge (`x`)
    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    /// Right edge (`x + width`)
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge (`y`)
    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    /// Bottom edge (`y + height`)
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Top-left corner
    pub fn top_left(&self) -> Vec2 {
        Vec2::new(self.left(), self.top())
    }

    /// Top-right corner
    pub fn top_right(&self) -> Vec2 {
        Vec2::new(self.right(), self.top())
    }

    /// Bottom-left corner
    pub fn bottom_left(&self) -> Vec2 {
        Vec2::new(self.left(), self.bottom())
    }

    /// Bottom-right corner
    pub fn bottom_right(&self) -> Vec2 {
        Vec2::new(self.right(), self.bottom())
    }

    /// Center point
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Midpoint of the bottom edge (where a standing sprite touches the ground)
    pub fn bottom_center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.bottom())
    }

    /// Width and height as a vector
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Half of the size
    pub fn half_extents(&self) -> Vec2 {
        self.size() * 0.5
    }

    /// True when the rectangle has no area (zero, negative or NaN size)
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Area, or zero for an empty rectangle
    pub fn area(&self) -> f32 {
        if self.is_empty() {
            0.0
        } else {
            self.width * self.height
        }
    }

    /// Check whether two rectangles overlap with positive area
    ///
    /// Empty rectangles never intersect anything.
    pub fn intersects(&self, other: &Self) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Check whether a point lies inside the rectangle
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.left() && point.x < self.right() && point.y >= self.top() && point.y < self.bottom()
    }

    /// Check whether another rectangle lies entirely inside this one
    pub fn contains(&self, other: &Self) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }

    /// Copy of the rectangle moved by `offset`
    pub fn translated(&self, offset: Vec2) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }

    /// Copy of the rectangle with its top-left corner at `position`
    pub fn with_position(&self, position: Vec2) -> Self {
        Self::new(position.x, position.y, self.width, self.height)
    }

    /// Signed depth of the overlap between `self` and `other`
    ///
    /// Each component is the distance `self` must move along that axis to stop
    /// overlapping, signed away from `other`'s center. Returns zero when the
    /// rectangles do not intersect.
    pub fn intersection_depth(&self, other: &Self) -> Vec2 {
        if !self.intersects(other) {
            return Vec2::zeros();
        }

        let half_a = self.half_extents();
        let half_b = other.half_extents();
        let distance = self.center() - other.center();
        let min_distance = half_a + half_b;

        let depth_x = if distance.x > 0.0 {
            min_distance.x - distance.x
        } else {
            -min_distance.x - distance.x
        };
        let depth_y = if distance.y > 0.0 {
            min_distance.y - distance.y
        } else {
            -min_distance.y - distance.y
        };

        Vec2::new(depth_x, depth_y)
    }

    /// Split into four equal quadrants ordered NE, NW, SW, SE
    pub fn quadrants(&self) -> [Self; 4] {
        let half_w = self.width * 0.5;
        let half_h = self.height * 0.5;
        let mid_x = self.x + half_w;
        let mid_y = self.y + half_h;

        [
            Self::new(mid_x, self.y, half_w, half_h),
            Self::new(self.x, self.y, half_w, half_h),
            Self::new(self.x, mid_y, half_w, half_h),
            Self::new(mid_x, mid_y, half_w, half_h),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_edges_and_corners() {
        let rect = Aabb::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect.left(), 10.0);
        assert_eq!(rect.right(), 40.0);
        assert_eq!(rect.top(), 20.0);
        assert_eq!(rect.bottom(), 60.0);
        assert_eq!(rect.top_right(), Vec2::new(40.0, 20.0));
        assert_eq!(rect.bottom_left(), Vec2::new(10.0, 60.0));
        assert_eq!(rect.center(), Vec2::new(25.0, 40.0));
        assert_eq!(rect.bottom_center(), Vec2::new(25.0, 60.0));
    }

    #[test]
    fn test_shared_edge_is_not_intersection() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&b.translated(Vec2::new(-0.5, 0.0))));
    }

    #[test]
    fn test_empty_boxes_never_intersect() {
        let solid = Aabb::new(0.0, 0.0, 100.0, 100.0);
        let flat = Aabb::new(10.0, 10.0, 50.0, 0.0);
        let inverted = Aabb::new(10.0, 10.0, -5.0, 5.0);
        assert!(flat.is_empty());
        assert!(!solid.intersects(&flat));
        assert!(!inverted.intersects(&solid));
        assert_eq!(inverted.area(), 0.0);
    }

    #[test]
    fn test_intersection_depth_signs() {
        let floor = Aabb::new(0.0, 100.0, 200.0, 20.0);
        let sinking = Aabb::new(50.0, 85.0, 20.0, 20.0);

        let depth = sinking.intersection_depth(&floor);
        // Pushed up (negative y) by the 5 units of overlap
        assert_relative_eq!(depth.y, -5.0);

        let apart = Aabb::new(500.0, 500.0, 1.0, 1.0);
        assert_eq!(apart.intersection_depth(&floor), Vec2::zeros());
    }

    #[test]
    fn test_quadrant_order() {
        let rect = Aabb::new(0.0, 0.0, 800.0, 640.0);
        let [ne, nw, sw, se] = rect.quadrants();
        assert_eq!(ne, Aabb::new(400.0, 0.0, 400.0, 320.0));
        assert_eq!(nw, Aabb::new(0.0, 0.0, 400.0, 320.0));
        assert_eq!(sw, Aabb::new(0.0, 320.0, 400.0, 320.0));
        assert_eq!(se, Aabb::new(400.0, 320.0, 400.0, 320.0));
    }

    #[test]
    fn test_containment() {
        let outer = Aabb::new(0.0, 0.0, 100.0, 100.0);
        assert!(outer.contains(&Aabb::new(10.0, 10.0, 20.0, 20.0)));
        assert!(!outer.contains(&Aabb::new(90.0, 10.0, 20.0, 20.0)));
        assert!(outer.contains_point(Vec2::new(0.0, 0.0)));
        assert!(!outer.contains_point(Vec2::new(100.0, 50.0)));
    }
}
