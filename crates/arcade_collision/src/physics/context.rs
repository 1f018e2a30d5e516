//! The surface collision callbacks are allowed to touch

use crate::foundation::ObjectKey;

/// Handed to every [`Collidable::handle_collision`] call during a tick
///
/// Callbacks run while the resolver is walking broad-phase candidate lists,
/// so the only mutation offered here is a deferred removal. Queued objects
/// stay in the index until the tick's final flush.
///
/// [`Collidable::handle_collision`]: crate::physics::Collidable::handle_collision
#[derive(Debug, Default)]
pub struct CollisionContext {
    delta_time: f32,
    pending_removals: Vec<ObjectKey>,
}

impl CollisionContext {
    pub(crate) fn new(delta_time: f32) -> Self {
        Self {
            delta_time,
            pending_removals: Vec::new(),
        }
    }

    /// Seconds elapsed since the previous tick
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Remove `key` from collision tracking once the current tick finishes
    pub fn queue_pending_removal(&mut self, key: ObjectKey) {
        if !self.pending_removals.contains(&key) {
            self.pending_removals.push(key);
        }
    }

    /// Removals queued so far this tick
    pub fn pending_removals(&self) -> &[ObjectKey] {
        &self.pending_removals
    }

    pub(crate) fn take_pending_removals(&mut self) -> Vec<ObjectKey> {
        std::mem::take(&mut self.pending_removals)
    }
}
