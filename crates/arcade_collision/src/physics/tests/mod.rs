//! Scenario tests for the collision registry and scope stack

mod scope_stack;

use std::cell::RefCell;
use std::rc::Rc;

use crate::foundation::Aabb;
use crate::physics::{Collidable, CollidableKind, CollisionContext, CollisionEvent, MovingCollidable};

/// Test body that records every event it receives
#[derive(Debug)]
pub(super) struct Body {
    pub previous: Aabb,
    pub bounds: Aabb,
    pub kind: CollidableKind,
    pub active: bool,
    pub remove_on_hit: bool,
    pub events: Vec<CollisionEvent>,
}

impl Body {
    pub fn fixed(bounds: Aabb) -> Rc<RefCell<Self>> {
        Self::moving(bounds, bounds)
    }

    pub fn moving(previous: Aabb, bounds: Aabb) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            previous,
            bounds,
            kind: CollidableKind::Impassable,
            active: true,
            remove_on_hit: false,
            events: Vec::new(),
        }))
    }
}

impl Collidable for Body {
    fn is_active(&self) -> bool {
        self.active
    }

    fn bounding_box(&self) -> Aabb {
        self.bounds
    }

    fn kind(&self) -> CollidableKind {
        self.kind
    }

    fn handle_collision(&mut self, event: &CollisionEvent, ctx: &mut CollisionContext) {
        self.events.push(*event);
        if self.remove_on_hit {
            ctx.queue_pending_removal(event.source);
        }
    }
}

impl MovingCollidable for Body {
    fn previous_bounding_box(&self) -> Aabb {
        self.previous
    }
}

pub(super) fn level_bounds() -> Aabb {
    Aabb::new(0.0, 0.0, 800.0, 640.0)
}
