//! Scoped collision registries
//!
//! Level-loading code pushes a registry when a level starts and the guard pops
//! it when the level ends, restoring whatever was current before. A scope can
//! also be pushed with no registry at all, which disables collision tracking
//! until it is released (e.g. during a cutscene).
//!
//! Guards borrow the stack mutably and dereference to it, so nested scopes
//! are opened from the outer guard and are always released first:
//!
//! ```
//! use arcade_collision::prelude::*;
//!
//! let mut scopes = CollisionScopes::new();
//! {
//!     let mut level = scopes.begin_scope(Aabb::new(0.0, 0.0, 800.0, 640.0), None);
//!     assert!(level.is_active());
//!     {
//!         let paused = level.suppress();
//!         assert!(!paused.is_active());
//!     }
//!     assert!(level.is_active());
//! }
//! assert!(!scopes.is_active());
//! ```

use std::cell::RefCell;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use crate::foundation::{Aabb, ObjectKey, Vec2};
use crate::physics::collidable::{Collidable, MovingCollidable};
use crate::physics::collision_system::{CollisionRegistry, TickReport};
use crate::physics::layers::Layer;

/// Identifies one pushed scope
///
/// Ids are never reused, so a token whose scope was already popped (for
/// instance by releasing an outer scope first) never matches a later entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScopeToken {
    depth: usize,
    id: u64,
}

#[derive(Debug)]
struct ScopeEntry {
    id: u64,
    registry: Option<CollisionRegistry>,
}

/// Stack of registries; the top entry is the current one
///
/// Entry points act on the current registry and are no-ops when there is
/// none (empty stack or a suppressed scope on top).
#[derive(Debug, Default)]
pub struct CollisionScopes {
    stack: Vec<ScopeEntry>,
    next_id: u64,
}

impl CollisionScopes {
    /// Empty stack: no scope is active
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a fresh registry over `bounds` and make it current
    pub fn begin_scope(&mut self, bounds: Aabb, reference_layer: Option<Layer>) -> ScopeGuard<'_> {
        let registry = CollisionRegistry::new(bounds);
        let registry = match reference_layer {
            Some(layer) => registry.with_reference_layer(layer),
            None => registry,
        };
        self.begin_scope_with(registry)
    }

    /// Push an already configured registry and make it current
    pub fn begin_scope_with(&mut self, registry: CollisionRegistry) -> ScopeGuard<'_> {
        let token = self.push(Some(registry));
        ScopeGuard { scopes: self, token }
    }

    /// Push a "no registry" entry, disabling collision until released
    pub fn suppress(&mut self) -> ScopeGuard<'_> {
        let token = self.push(None);
        ScopeGuard { scopes: self, token }
    }

    /// Number of pushed scopes, suppressed ones included
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// True if a registry is current
    pub fn is_active(&self) -> bool {
        self.current().is_some()
    }

    /// The current registry
    pub fn current(&self) -> Option<&CollisionRegistry> {
        self.stack.last().and_then(|entry| entry.registry.as_ref())
    }

    /// The current registry, mutably
    pub fn current_mut(&mut self) -> Option<&mut CollisionRegistry> {
        self.stack.last_mut().and_then(|entry| entry.registry.as_mut())
    }

    /// Register a static object with the current registry
    pub fn register_static<T: Collidable + 'static>(&mut self, object: &Rc<RefCell<T>>) -> Option<ObjectKey> {
        self.current_mut().map(|registry| registry.register_static(object))
    }

    /// Register a moving object with the current registry
    pub fn register_moving<T: MovingCollidable + 'static>(&mut self, object: &Rc<RefCell<T>>) -> Option<ObjectKey> {
        self.current_mut().map(|registry| registry.register_moving(object))
    }

    /// Unregister from the current registry
    pub fn unregister(&mut self, key: ObjectKey) -> bool {
        self.current_mut().is_some_and(|registry| registry.unregister(key))
    }

    /// Queue a removal on the current registry
    pub fn queue_pending_removal(&mut self, key: ObjectKey) {
        if let Some(registry) = self.current_mut() {
            registry.queue_pending_removal(key);
        }
    }

    /// Tick the current registry
    pub fn tick(&mut self, delta_time: f32) -> Option<TickReport> {
        self.current_mut().map(|registry| registry.tick(delta_time))
    }

    /// Broad-phase candidates from the current registry
    pub fn retrieve(&self, key: ObjectKey) -> Vec<ObjectKey> {
        self.current().map(|registry| registry.candidates(key)).unwrap_or_default()
    }

    /// Move the camera used by the current registry's layer conversion
    pub fn set_camera_position(&mut self, camera: Vec2) {
        if let Some(registry) = self.current_mut() {
            registry.set_camera_position(camera);
        }
    }

    /// Convert through the current registry (identity when none)
    pub fn convert_world_position(&self, position: Vec2, from: &Layer) -> Vec2 {
        self.current()
            .map_or(position, |registry| registry.convert_world_position(position, from))
    }

    /// Convert through the current registry (identity when none)
    pub fn convert_screen_position(&self, position: Vec2) -> Vec2 {
        self.current()
            .map_or(position, |registry| registry.convert_screen_position(position))
    }

    /// Push an entry and return the token that identifies it
    pub(crate) fn push(&mut self, registry: Option<CollisionRegistry>) -> ScopeToken {
        self.next_id += 1;
        let id = self.next_id;
        log::debug!(
            "Collision scope {} pushed ({})",
            self.stack.len() + 1,
            if registry.is_some() { "registry" } else { "suppressed" }
        );
        self.stack.push(ScopeEntry { id, registry });
        ScopeToken {
            depth: self.stack.len(),
            id,
        }
    }

    /// Pop the token's entry and anything still above it
    ///
    /// Returns `false` without touching the stack if that entry is already
    /// gone.
    pub(crate) fn release(&mut self, token: ScopeToken) -> bool {
        let index = token.depth.saturating_sub(1);
        match self.stack.get(index) {
            Some(entry) if entry.id == token.id => {}
            _ => {
                log::debug!("Collision scope {} was already released", token.depth);
                return false;
            }
        }

        if self.stack.len() > token.depth {
            log::warn!(
                "Releasing collision scope {} with {} scope(s) still open above it",
                token.depth,
                self.stack.len() - token.depth
            );
        }
        self.stack.truncate(index);
        log::debug!("Collision scope {} released", token.depth);
        true
    }
}

/// Keeps a scope pushed for as long as it lives
///
/// Dereferences to the whole [`CollisionScopes`] stack; dropping it restores
/// the previously current registry on every exit path, including early
/// returns and unwinding.
#[must_use = "the scope is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct ScopeGuard<'a> {
    scopes: &'a mut CollisionScopes,
    token: ScopeToken,
}

impl ScopeGuard<'_> {
    /// Stack depth at which this guard's scope sits
    pub fn scope_depth(&self) -> usize {
        self.token.depth
    }
}

impl Deref for ScopeGuard<'_> {
    type Target = CollisionScopes;

    fn deref(&self) -> &Self::Target {
        &*self.scopes
    }
}

impl DerefMut for ScopeGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.scopes
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        self.scopes.release(self.token);
    }
}
