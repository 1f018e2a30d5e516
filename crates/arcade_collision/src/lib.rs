//! # Arcade Collision
//!
//! Quadtree-backed collision tracking for 2D platformer and arcade games.
//!
//! ## Features
//!
//! - **Broad phase**: arena-backed quadtree with automatic splitting
//! - **Narrow phase**: AABB overlap with Top/Bottom/Left/Right classification
//!   taken from each object's previous position
//! - **Callbacks**: both participants are notified with mirrored events
//! - **Scopes**: per-level registries with RAII save/restore
//!
//! ## Quick Start
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use arcade_collision::prelude::*;
//!
//! struct Floor(Aabb);
//!
//! impl Collidable for Floor {
//!     fn bounding_box(&self) -> Aabb {
//!         self.0
//!     }
//! }
//!
//! struct Player {
//!     previous: Aabb,
//!     bounds: Aabb,
//!     grounded: bool,
//! }
//!
//! impl Collidable for Player {
//!     fn bounding_box(&self) -> Aabb {
//!         self.bounds
//!     }
//!
//!     fn handle_collision(&mut self, event: &CollisionEvent, _ctx: &mut CollisionContext) {
//!         if event.blocks() && event.direction.contains(Direction::BOTTOM) {
//!             self.bounds = self.bounds.translated(event.offset);
//!             self.grounded = true;
//!         }
//!     }
//! }
//!
//! impl MovingCollidable for Player {
//!     fn previous_bounding_box(&self) -> Aabb {
//!         self.previous
//!     }
//! }
//!
//! let mut registry = CollisionRegistry::new(Aabb::new(0.0, 0.0, 800.0, 640.0));
//! let floor = Rc::new(RefCell::new(Floor(Aabb::new(0.0, 600.0, 800.0, 40.0))));
//! let player = Rc::new(RefCell::new(Player {
//!     previous: Aabb::new(10.0, 570.0, 16.0, 24.0),
//!     bounds: Aabb::new(10.0, 580.0, 16.0, 24.0),
//!     grounded: false,
//! }));
//!
//! registry.register_static(&floor);
//! registry.register_moving(&player);
//! registry.tick(1.0 / 60.0);
//!
//! assert!(player.borrow().grounded);
//! assert_eq!(player.borrow().bounds.bottom(), 600.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod core;
pub mod foundation;
pub mod physics;
pub mod spatial;

/// Common imports for collision users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        core::config::CollisionConfig,
        foundation::{Aabb, ObjectKey, Vec2},
        physics::{
            Collidable, CollidableKind, CollisionContext, CollisionEvent, CollisionManager,
            CollisionRegistry, CollisionScopes, Direction, Layer, MovingCollidable, TickReport,
        },
        spatial::{Quadtree, QuadtreeConfig, SpatialIndex},
    };
}
