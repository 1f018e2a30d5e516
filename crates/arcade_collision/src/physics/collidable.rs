//! Capabilities an entity implements to take part in collision
//!
//! Gameplay code owns its entities (typically as `Rc<RefCell<T>>`). The
//! registry keeps only a [`Weak`] handle, tagged once at registration as
//! static or moving, so it never needs a runtime type test afterwards.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

use crate::foundation::{Aabb, Vec2};
use crate::physics::collision_event::CollisionEvent;
use crate::physics::context::CollisionContext;

/// How an object behaves when something runs into it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CollidableKind {
    /// Never blocks motion (pickups, triggers, decorations)
    Passable,
    /// Blocks motion from every side
    #[default]
    Impassable,
    /// One-way: blocks only objects landing on it from above
    Platform,
}

/// Anything that occupies space in the collision world
pub trait Collidable {
    /// Inactive objects are skipped by the narrow phase
    fn is_active(&self) -> bool {
        true
    }

    /// Current bounding box
    fn bounding_box(&self) -> Aabb;

    /// Blocking behavior
    fn kind(&self) -> CollidableKind {
        CollidableKind::Impassable
    }

    /// Called once per detected contact involving this object
    ///
    /// The context only allows queuing removals; the index cannot be mutated
    /// from inside a callback.
    fn handle_collision(&mut self, event: &CollisionEvent, ctx: &mut CollisionContext) {
        let _ = (event, ctx);
    }
}

/// A collidable that moves between ticks
pub trait MovingCollidable: Collidable {
    /// Bounding box at the start of the current tick, before integration
    ///
    /// Must be captured before the position is advanced; the resolver uses it
    /// to tell which side a contact came from.
    fn previous_bounding_box(&self) -> Aabb;

    /// Current velocity
    fn velocity(&self) -> Vec2 {
        Vec2::zeros()
    }
}

/// Values read from a live collider
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ColliderState {
    pub active: bool,
    pub bounds: Aabb,
    pub kind: CollidableKind,
    /// `Some` only for moving colliders
    pub previous: Option<Aabb>,
}

/// Result of trying to read a collider
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum ColliderRead {
    Live(ColliderState),
    /// The owner dropped the object
    Dropped,
    /// The object is mutably borrowed elsewhere
    Busy,
}

/// Non-owning handle to a registered object, tagged by capability
#[derive(Clone)]
pub(crate) enum ColliderRef {
    Static(Weak<RefCell<dyn Collidable>>),
    Moving(Weak<RefCell<dyn MovingCollidable>>),
}

impl ColliderRef {
    pub fn new_static<T: Collidable + 'static>(object: &Rc<RefCell<T>>) -> Self {
        let weak: Weak<RefCell<T>> = Rc::downgrade(object);
        Self::Static(weak)
    }

    pub fn new_moving<T: MovingCollidable + 'static>(object: &Rc<RefCell<T>>) -> Self {
        let weak: Weak<RefCell<T>> = Rc::downgrade(object);
        Self::Moving(weak)
    }

    pub fn is_moving(&self) -> bool {
        matches!(self, Self::Moving(_))
    }

    pub fn is_alive(&self) -> bool {
        match self {
            Self::Static(weak) => weak.strong_count() > 0,
            Self::Moving(weak) => weak.strong_count() > 0,
        }
    }

    pub fn read(&self) -> ColliderRead {
        match self {
            Self::Static(weak) => read_common(weak, |_| None),
            Self::Moving(weak) => read_common(weak, |object| Some(object.previous_bounding_box())),
        }
    }

    /// Deliver an event; returns `false` if the object was gone or busy
    pub fn dispatch(&self, event: &CollisionEvent, ctx: &mut CollisionContext) -> bool {
        match self {
            Self::Static(weak) => dispatch_common(weak, event, ctx),
            Self::Moving(weak) => dispatch_common(weak, event, ctx),
        }
    }
}

impl std::fmt::Debug for ColliderRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (tag, alive) = match self {
            Self::Static(weak) => ("Static", weak.strong_count() > 0),
            Self::Moving(weak) => ("Moving", weak.strong_count() > 0),
        };
        f.debug_struct("ColliderRef")
            .field("kind", &tag)
            .field("alive", &alive)
            .finish()
    }
}

/// Identity of the allocation behind an `Rc`, used to spot double registration
pub(crate) fn identity_of<T>(object: &Rc<RefCell<T>>) -> usize {
    Rc::as_ptr(object).cast::<()>() as usize
}

fn read_common<T: ?Sized + Collidable>(
    weak: &Weak<RefCell<T>>,
    previous: impl FnOnce(&T) -> Option<Aabb>,
) -> ColliderRead {
    let Some(shared) = weak.upgrade() else {
        return ColliderRead::Dropped;
    };
    let Ok(object) = shared.try_borrow() else {
        return ColliderRead::Busy;
    };

    let state = ColliderState {
        active: object.is_active(),
        bounds: object.bounding_box(),
        kind: object.kind(),
        previous: previous(&*object),
    };
    ColliderRead::Live(state)
}

fn dispatch_common<T: ?Sized + Collidable>(
    weak: &Weak<RefCell<T>>,
    event: &CollisionEvent,
    ctx: &mut CollisionContext,
) -> bool {
    let Some(shared) = weak.upgrade() else {
        return false;
    };
    let Ok(mut object) = shared.try_borrow_mut() else {
        log::warn!("Skipping collision callback for {:?}: object is already borrowed", event.source);
        return false;
    };

    object.handle_collision(event, ctx);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Crate {
        bounds: Aabb,
    }

    impl Collidable for Crate {
        fn bounding_box(&self) -> Aabb {
            self.bounds
        }
    }

    struct Slime {
        previous: Aabb,
        bounds: Aabb,
    }

    impl Collidable for Slime {
        fn bounding_box(&self) -> Aabb {
            self.bounds
        }

        fn kind(&self) -> CollidableKind {
            CollidableKind::Passable
        }
    }

    impl MovingCollidable for Slime {
        fn previous_bounding_box(&self) -> Aabb {
            self.previous
        }
    }

    #[test]
    fn test_static_ref_reads_without_previous() {
        let object = Rc::new(RefCell::new(Crate {
            bounds: Aabb::new(0.0, 0.0, 16.0, 16.0),
        }));
        let collider = ColliderRef::new_static(&object);

        assert!(!collider.is_moving());
        let ColliderRead::Live(state) = collider.read() else {
            panic!("expected a live collider");
        };
        assert_eq!(state.bounds, Aabb::new(0.0, 0.0, 16.0, 16.0));
        assert_eq!(state.kind, CollidableKind::Impassable);
        assert!(state.active);
        assert_eq!(state.previous, None);
    }

    #[test]
    fn test_moving_ref_reads_previous_box() {
        let object = Rc::new(RefCell::new(Slime {
            previous: Aabb::new(0.0, 0.0, 8.0, 8.0),
            bounds: Aabb::new(2.0, 0.0, 8.0, 8.0),
        }));
        let collider = ColliderRef::new_moving(&object);

        assert!(collider.is_moving());
        let ColliderRead::Live(state) = collider.read() else {
            panic!("expected a live collider");
        };
        assert_eq!(state.kind, CollidableKind::Passable);
        assert_eq!(state.previous, Some(Aabb::new(0.0, 0.0, 8.0, 8.0)));
    }

    #[test]
    fn test_ref_reports_busy_and_dropped() {
        let object = Rc::new(RefCell::new(Crate {
            bounds: Aabb::new(0.0, 0.0, 16.0, 16.0),
        }));
        let collider = ColliderRef::new_static(&object);

        {
            let _held = object.borrow_mut();
            assert_eq!(collider.read(), ColliderRead::Busy);
        }
        assert!(collider.is_alive());

        drop(object);
        assert!(!collider.is_alive());
        assert_eq!(collider.read(), ColliderRead::Dropped);
    }
}
