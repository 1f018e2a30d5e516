//! Handle types for arena-style storage
//!
//! Collidable objects and quadtree nodes are both referenced through
//! generational slot-map keys rather than pointers, so a stale handle can
//! never alias a newer object.

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Stable handle for an object registered with a collision registry
    pub struct ObjectKey;

    /// Stable handle for a node inside a quadtree arena
    pub struct NodeKey;
}

/// Slot map keyed by [`ObjectKey`]
pub type ObjectMap<T> = SlotMap<ObjectKey, T>;
