//! Abstract spatial index interface for broad-phase collision detection
//!
//! The registry only talks to its index through this trait, so a different
//! partitioning scheme (uniform grid, sweep-and-prune) can be dropped in
//! without touching the resolver.

use std::any::Any;

use crate::foundation::{Aabb, ObjectKey};
use crate::spatial::Quadtree;

/// Broad-phase index keyed by [`ObjectKey`]
pub trait SpatialIndex {
    /// Insert an object; returns `true` if it was not present before
    fn insert(&mut self, key: ObjectKey, bounds: Aabb) -> bool;

    /// Remove an object; returns `false` if it was not present
    fn remove(&mut self, key: ObjectKey) -> bool;

    /// Move an object to a new bounding box
    fn update(&mut self, key: ObjectKey, bounds: Aabb);

    /// Candidate colliders for an object (never includes the object itself)
    fn retrieve(&self, key: ObjectKey) -> Vec<ObjectKey>;

    /// Objects that may overlap an area
    fn query_area(&self, area: &Aabb) -> Vec<ObjectKey>;

    /// Remove every object
    fn clear(&mut self);

    /// Defer an object's removal until [`SpatialIndex::apply_pending_removals`]
    fn queue_pending_removal(&mut self, key: ObjectKey);

    /// Flush deferred removals, returning the keys that were queued
    fn apply_pending_removals(&mut self) -> Vec<ObjectKey>;

    /// Check if an object is indexed
    fn contains(&self, key: ObjectKey) -> bool;

    /// Number of indexed objects
    fn object_count(&self) -> usize;

    /// Region the index covers
    fn bounds(&self) -> Aabb;

    /// Downcast to Any for type-specific access (e.g., quadtree diagnostics)
    fn as_any(&self) -> &dyn Any;
}

impl SpatialIndex for Quadtree {
    fn insert(&mut self, key: ObjectKey, bounds: Aabb) -> bool {
        Self::insert(self, key, bounds)
    }

    fn remove(&mut self, key: ObjectKey) -> bool {
        Self::remove(self, key)
    }

    fn update(&mut self, key: ObjectKey, bounds: Aabb) {
        Self::update(self, key, bounds);
    }

    fn retrieve(&self, key: ObjectKey) -> Vec<ObjectKey> {
        Self::retrieve(self, key)
    }

    fn query_area(&self, area: &Aabb) -> Vec<ObjectKey> {
        Self::query_area(self, area)
    }

    fn clear(&mut self) {
        Self::clear(self);
    }

    fn queue_pending_removal(&mut self, key: ObjectKey) {
        Self::queue_pending_removal(self, key);
    }

    fn apply_pending_removals(&mut self) -> Vec<ObjectKey> {
        Self::apply_pending_removals(self)
    }

    fn contains(&self, key: ObjectKey) -> bool {
        Self::contains(self, key)
    }

    fn object_count(&self) -> usize {
        Self::object_count(self)
    }

    fn bounds(&self) -> Aabb {
        Self::bounds(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
