//! Collision events delivered to gameplay objects
//!
//! One event is built per detected overlap and handed to both participants:
//! the moving object sees the obstacle, and the obstacle sees the same
//! contact mirrored.

use bitflags::bitflags;

use crate::foundation::{ObjectKey, Vec2};
use crate::physics::collidable::CollidableKind;

bitflags! {
    /// Side of the obstacle the source ran into
    ///
    /// `BOTTOM` means the source's bottom edge hit the obstacle (it landed on
    /// it); `TOP` means the source's top edge hit it (a head bump).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Direction: u8 {
        /// Source's left edge hit the obstacle's right side
        const LEFT = 0b0001;
        /// Source's right edge hit the obstacle's left side
        const RIGHT = 0b0010;
        /// Source's top edge hit the obstacle's bottom side
        const TOP = 0b0100;
        /// Source's bottom edge hit the obstacle's top side
        const BOTTOM = 0b1000;

        /// Either horizontal direction
        const HORIZONTAL = Self::LEFT.bits() | Self::RIGHT.bits();
        /// Either vertical direction
        const VERTICAL = Self::TOP.bits() | Self::BOTTOM.bits();
    }
}

impl Direction {
    /// Same contact seen from the other participant (Left<->Right, Top<->Bottom)
    pub fn mirrored(self) -> Self {
        let mut mirrored = Self::empty();
        mirrored.set(Self::RIGHT, self.contains(Self::LEFT));
        mirrored.set(Self::LEFT, self.contains(Self::RIGHT));
        mirrored.set(Self::BOTTOM, self.contains(Self::TOP));
        mirrored.set(Self::TOP, self.contains(Self::BOTTOM));
        mirrored
    }
}

/// Axis group evaluated in one narrow-phase pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Top/Bottom contacts
    Vertical,
    /// Left/Right contacts
    Horizontal,
}

impl Axis {
    /// Order in which axis groups are resolved each tick
    ///
    /// Gravity acts every frame, so landing is settled before sideways sliding.
    pub const RESOLUTION_ORDER: [Self; 2] = [Self::Vertical, Self::Horizontal];
}

/// One collision outcome, from the point of view of `source`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    /// Object receiving this event
    pub source: ObjectKey,
    /// Object it collided with
    pub obstacle: ObjectKey,
    /// How the obstacle behaves when touched
    pub obstacle_kind: CollidableKind,
    /// Side(s) of the obstacle that were hit
    pub direction: Direction,
    /// Signed correction that moves `source` out of the overlap
    pub offset: Vec2,
}

impl CollisionEvent {
    /// The same contact as seen by the obstacle
    ///
    /// `source_kind` becomes the mirrored event's `obstacle_kind`.
    pub fn mirrored(&self, source_kind: CollidableKind) -> Self {
        Self {
            source: self.obstacle,
            obstacle: self.source,
            obstacle_kind: source_kind,
            direction: self.direction.mirrored(),
            offset: -self.offset,
        }
    }

    /// Whether the obstacle stops the source's motion in this direction
    ///
    /// Platforms are one-way: they only hold up something landing on them.
    pub fn blocks(&self) -> bool {
        match self.obstacle_kind {
            CollidableKind::Passable => false,
            CollidableKind::Impassable => !self.direction.is_empty(),
            CollidableKind::Platform => self.direction.contains(Direction::BOTTOM),
        }
    }

    /// Position moved by the penetration offset
    pub fn resolve_position(&self, position: Vec2) -> Vec2 {
        position + self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn event(kind: CollidableKind, direction: Direction) -> CollisionEvent {
        let mut keys: SlotMap<ObjectKey, ()> = SlotMap::with_key();
        CollisionEvent {
            source: keys.insert(()),
            obstacle: keys.insert(()),
            obstacle_kind: kind,
            direction,
            offset: Vec2::new(0.0, -5.0),
        }
    }

    #[test]
    fn test_direction_mirror() {
        assert_eq!(Direction::BOTTOM.mirrored(), Direction::TOP);
        assert_eq!(Direction::LEFT.mirrored(), Direction::RIGHT);
        assert_eq!(
            (Direction::TOP | Direction::RIGHT).mirrored(),
            Direction::BOTTOM | Direction::LEFT
        );
        assert_eq!(Direction::empty().mirrored(), Direction::empty());
    }

    #[test]
    fn test_event_mirror_swaps_participants() {
        let landing = event(CollidableKind::Impassable, Direction::BOTTOM);
        let seen_by_floor = landing.mirrored(CollidableKind::Passable);

        assert_eq!(seen_by_floor.source, landing.obstacle);
        assert_eq!(seen_by_floor.obstacle, landing.source);
        assert_eq!(seen_by_floor.direction, Direction::TOP);
        assert_eq!(seen_by_floor.offset, Vec2::new(0.0, 5.0));
        assert_eq!(seen_by_floor.obstacle_kind, CollidableKind::Passable);
    }

    #[test]
    fn test_platform_blocks_only_from_above() {
        assert!(event(CollidableKind::Platform, Direction::BOTTOM).blocks());
        assert!(!event(CollidableKind::Platform, Direction::TOP).blocks());
        assert!(!event(CollidableKind::Platform, Direction::LEFT).blocks());
        assert!(event(CollidableKind::Impassable, Direction::LEFT).blocks());
        assert!(!event(CollidableKind::Passable, Direction::BOTTOM).blocks());
    }

    #[test]
    fn test_resolve_position() {
        let landing = event(CollidableKind::Impassable, Direction::BOTTOM);
        assert_eq!(landing.resolve_position(Vec2::new(10.0, 20.0)), Vec2::new(10.0, 15.0));
    }
}
