//! Physics module for collision detection and response
//!
//! Broad phase through a quadtree, narrow phase through directional AABB
//! tests, and the registry/scope plumbing that ties them to gameplay objects.

pub mod collidable;
pub mod collision_event;
pub mod collision_system;
pub mod context;
pub mod layers;
pub mod manager;
pub mod narrow_phase;
pub mod scope;

#[cfg(test)]
mod tests;

pub use collidable::{Collidable, CollidableKind, MovingCollidable};
pub use collision_event::{Axis, CollisionEvent, Direction};
pub use collision_system::{CollisionRegistry, TickReport};
pub use context::CollisionContext;
pub use layers::{Layer, LayerSpace};
pub use manager::{CollisionManager, CollisionManagerScope};
pub use narrow_phase::{classify, Contact};
pub use scope::{CollisionScopes, ScopeGuard};
