//! Process-wide access to the collision scope stack
//!
//! Convenience layer for gameplay code that cannot easily thread a
//! [`CollisionScopes`] through every call. The stack is thread-local (the
//! collision core is single-threaded), and every entry point is a no-op when
//! no scope is active.
//!
//! A collision callback must not call back into [`CollisionManager::tick`];
//! doing so panics. Registration calls made from inside a callback are
//! ignored with a warning. Callbacks should use the
//! [`CollisionContext`](crate::physics::CollisionContext) they are given.
//! A scope guard dropped inside a callback is released as soon as the tick
//! returns.

use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::foundation::{Aabb, ObjectKey, Vec2};
use crate::physics::collidable::{Collidable, MovingCollidable};
use crate::physics::collision_system::{CollisionRegistry, TickReport};
use crate::physics::layers::Layer;
use crate::physics::scope::{CollisionScopes, ScopeToken};

thread_local! {
    static SCOPES: RefCell<CollisionScopes> = RefCell::new(CollisionScopes::new());

    /// Guards dropped while the stack was borrowed by a tick
    static DEFERRED_RELEASES: RefCell<Vec<ScopeToken>> = const { RefCell::new(Vec::new()) };
}

/// Release every guard that was dropped while the stack was busy
fn release_deferred(scopes: &mut CollisionScopes) {
    let deferred = DEFERRED_RELEASES.with(|deferred| std::mem::take(&mut *deferred.borrow_mut()));
    for token in deferred {
        scopes.release(token);
    }
}

/// Static entry points onto the thread's scope stack
pub struct CollisionManager;

/// Guard returned by [`CollisionManager::begin_scope`] and [`CollisionManager::suppress`]
///
/// Dropping it restores the previously current registry.
#[must_use = "the scope is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct CollisionManagerScope {
    token: ScopeToken,
    // Tied to the thread whose stack it was pushed on
    _not_send: PhantomData<*const ()>,
}

impl Drop for CollisionManagerScope {
    fn drop(&mut self) {
        let token = self.token;
        SCOPES.with(|scopes| match scopes.try_borrow_mut() {
            Ok(mut scopes) => {
                release_deferred(&mut scopes);
                scopes.release(token);
            }
            Err(_) => {
                log::debug!("Collision scope dropped during a collision tick; releasing after the tick");
                DEFERRED_RELEASES.with(|deferred| deferred.borrow_mut().push(token));
            }
        });
    }
}

impl CollisionManager {
    /// Push a fresh registry over `bounds` and make it current
    pub fn begin_scope(bounds: Aabb, reference_layer: Option<Layer>) -> CollisionManagerScope {
        let registry = CollisionRegistry::new(bounds);
        let registry = match reference_layer {
            Some(layer) => registry.with_reference_layer(layer),
            None => registry,
        };
        Self::begin_scope_with(registry)
    }

    /// Push an already configured registry and make it current
    pub fn begin_scope_with(registry: CollisionRegistry) -> CollisionManagerScope {
        let token = SCOPES.with(|scopes| {
            let mut scopes = scopes.borrow_mut();
            release_deferred(&mut scopes);
            scopes.push(Some(registry))
        });
        CollisionManagerScope {
            token,
            _not_send: PhantomData,
        }
    }

    /// Disable collision tracking until the guard is dropped
    pub fn suppress() -> CollisionManagerScope {
        let token = SCOPES.with(|scopes| {
            let mut scopes = scopes.borrow_mut();
            release_deferred(&mut scopes);
            scopes.push(None)
        });
        CollisionManagerScope {
            token,
            _not_send: PhantomData,
        }
    }

    /// True if a registry is current
    pub fn is_active() -> bool {
        SCOPES.with(|scopes| scopes.try_borrow().map_or(true, |scopes| scopes.is_active()))
    }

    /// Run `f` against the current registry, if any
    ///
    /// Returns `None` when no registry is current or when called from inside
    /// a collision callback.
    pub fn with_current<R>(f: impl FnOnce(&mut CollisionRegistry) -> R) -> Option<R> {
        SCOPES.with(|scopes| {
            let Ok(mut scopes) = scopes.try_borrow_mut() else {
                log::warn!("Collision registry accessed during a collision tick; ignored");
                return None;
            };
            let result = scopes.current_mut().map(f);
            release_deferred(&mut scopes);
            result
        })
    }

    /// Register a static object with the current registry
    pub fn register_static<T: Collidable + 'static>(object: &Rc<RefCell<T>>) -> Option<ObjectKey> {
        Self::with_current(|registry| registry.register_static(object))
    }

    /// Register a moving object with the current registry
    pub fn register_moving<T: MovingCollidable + 'static>(object: &Rc<RefCell<T>>) -> Option<ObjectKey> {
        Self::with_current(|registry| registry.register_moving(object))
    }

    /// Unregister from the current registry
    pub fn unregister(key: ObjectKey) -> bool {
        Self::with_current(|registry| registry.unregister(key)).unwrap_or(false)
    }

    /// Queue a removal on the current registry
    pub fn queue_pending_removal(key: ObjectKey) {
        Self::with_current(|registry| registry.queue_pending_removal(key));
    }

    /// Broad-phase candidates from the current registry
    pub fn retrieve(key: ObjectKey) -> Vec<ObjectKey> {
        Self::with_current(|registry| registry.candidates(key)).unwrap_or_default()
    }

    /// Move the camera used by the current registry's layer conversion
    pub fn set_camera_position(camera: Vec2) {
        Self::with_current(|registry| registry.set_camera_position(camera));
    }

    /// Convert through the current registry (identity when none)
    pub fn convert_world_position(position: Vec2, from: &Layer) -> Vec2 {
        Self::with_current(|registry| registry.convert_world_position(position, from)).unwrap_or(position)
    }

    /// Convert through the current registry (identity when none)
    pub fn convert_screen_position(position: Vec2) -> Vec2 {
        Self::with_current(|registry| registry.convert_screen_position(position)).unwrap_or(position)
    }

    /// Tick the current registry
    ///
    /// # Panics
    ///
    /// Panics if called from inside a collision callback.
    pub fn tick(delta_time: f32) -> Option<TickReport> {
        SCOPES.with(|scopes| {
            let Ok(mut scopes) = scopes.try_borrow_mut() else {
                log::error!("CollisionManager::tick called re-entrantly from a collision callback");
                panic!("re-entrant collision tick: tick must not be called from a collision callback");
            };
            let report = scopes.tick(delta_time);
            release_deferred(&mut scopes);
            report
        })
    }

    /// Number of pushed scopes on this thread
    pub fn depth() -> usize {
        SCOPES.with(|scopes| scopes.try_borrow().map_or(0, |scopes| scopes.depth()))
    }
}
