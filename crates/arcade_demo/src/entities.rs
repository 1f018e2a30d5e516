//! Demo level entities

use std::cell::RefCell;
use std::rc::Rc;

use arcade_collision::prelude::*;

const GRAVITY: f32 = 900.0;
const JUMP_SPEED: f32 = 420.0;
const WALK_SPEED: f32 = 90.0;

/// Solid or one-way level geometry
pub struct Tile {
    bounds: Aabb,
    kind: CollidableKind,
}

impl Tile {
    pub fn solid(bounds: Aabb) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            bounds,
            kind: CollidableKind::Impassable,
        }))
    }

    pub fn platform(bounds: Aabb) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            bounds,
            kind: CollidableKind::Platform,
        }))
    }
}

impl Collidable for Tile {
    fn bounding_box(&self) -> Aabb {
        self.bounds
    }

    fn kind(&self) -> CollidableKind {
        self.kind
    }
}

/// Pickup that removes itself when touched
pub struct Coin {
    bounds: Aabb,
    pub collected: bool,
}

impl Coin {
    pub fn new(center: Vec2) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            bounds: Aabb::from_center_extents(center, Vec2::new(6.0, 6.0)),
            collected: false,
        }))
    }
}

impl Collidable for Coin {
    fn is_active(&self) -> bool {
        !self.collected
    }

    fn bounding_box(&self) -> Aabb {
        self.bounds
    }

    fn kind(&self) -> CollidableKind {
        CollidableKind::Passable
    }

    fn handle_collision(&mut self, event: &CollisionEvent, ctx: &mut CollisionContext) {
        if !self.collected {
            self.collected = true;
            ctx.queue_pending_removal(event.source);
            log::info!("Coin {:?} collected", event.source);
        }
    }
}

/// Walking, jumping player integrated with explicit Euler steps
pub struct Player {
    previous: Aabb,
    bounds: Aabb,
    velocity: Vec2,
    pub grounded: bool,
    pub coins: usize,
}

impl Player {
    pub fn new(position: Vec2) -> Rc<RefCell<Self>> {
        let bounds = Aabb::new(position.x, position.y, 16.0, 24.0);
        Rc::new(RefCell::new(Self {
            previous: bounds,
            bounds,
            velocity: Vec2::new(WALK_SPEED, 0.0),
            grounded: false,
            coins: 0,
        }))
    }

    /// Advance one step; the previous box is captured before moving
    pub fn step(&mut self, delta_time: f32, jump: bool) {
        self.previous = self.bounds;

        if jump && self.grounded {
            self.velocity.y = -JUMP_SPEED;
        }
        self.velocity.y += GRAVITY * delta_time;
        self.grounded = false;

        self.bounds = self.bounds.translated(self.velocity * delta_time);
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }
}

impl Collidable for Player {
    fn bounding_box(&self) -> Aabb {
        self.bounds
    }

    fn handle_collision(&mut self, event: &CollisionEvent, _ctx: &mut CollisionContext) {
        if event.obstacle_kind == CollidableKind::Passable {
            self.coins += 1;
            return;
        }
        if !event.blocks() {
            return;
        }

        let position = event.resolve_position(self.bounds.top_left());
        self.bounds = self.bounds.with_position(position);

        if event.direction.intersects(Direction::VERTICAL) {
            self.velocity.y = 0.0;
            self.grounded |= event.direction.contains(Direction::BOTTOM);
        } else {
            // Turn around at walls
            self.velocity.x = -self.velocity.x;
        }
    }
}

impl MovingCollidable for Player {
    fn previous_bounding_box(&self) -> Aabb {
        self.previous
    }

    fn velocity(&self) -> Vec2 {
        self.velocity
    }
}
