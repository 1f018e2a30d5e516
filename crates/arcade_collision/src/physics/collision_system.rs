//! Collision registry and broad-phase resolver
//!
//! The registry owns a spatial index and non-owning handles to every
//! registered object. Each [`CollisionRegistry::tick`]:
//!
//! 1. snapshots the moving objects,
//! 2. clears the index and reinserts every live object at its current box,
//! 3. for each moving object, vertical axis first and then horizontal, asks
//!    the index for candidates, classifies overlaps against the object's
//!    previous box and notifies both participants,
//! 4. flushes removals queued by callbacks.
//!
//! The index is rebuilt from scratch every tick. That keeps queries exactly in
//! step with the current frame but costs O(n log n) per tick regardless of how
//! many objects moved; it is sized for a single level with dozens to a few
//! hundred colliders.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::foundation::collections::ObjectMap;
use crate::foundation::{Aabb, ObjectKey, Vec2};
use crate::physics::collidable::{identity_of, ColliderRead, ColliderRef, Collidable, MovingCollidable};
use crate::physics::collision_event::{Axis, CollisionEvent};
use crate::physics::context::CollisionContext;
use crate::physics::layers::{Layer, LayerSpace};
use crate::physics::narrow_phase::classify;
use crate::spatial::{Quadtree, QuadtreeConfig, SpatialIndex};

/// Registered object plus the allocation identity used to reject duplicates
#[derive(Debug)]
struct RegisteredCollider {
    collider: ColliderRef,
    identity: usize,
}

/// Outcome of one [`CollisionRegistry::tick`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Contacts dispatched (each one notifies both participants)
    pub collisions: usize,
    /// Objects removed by the end-of-tick flush
    pub removed: Vec<ObjectKey>,
}

/// Collision registry for one gameplay scope (typically a level)
pub struct CollisionRegistry {
    index: Box<dyn SpatialIndex>,
    objects: ObjectMap<RegisteredCollider>,
    identities: HashMap<usize, ObjectKey>,
    /// Moving objects in registration order
    moving: Vec<ObjectKey>,
    layer_space: Option<LayerSpace>,
}

impl CollisionRegistry {
    /// Registry backed by a default quadtree over `bounds`
    pub fn new(bounds: Aabb) -> Self {
        Self::with_config(bounds, QuadtreeConfig::default())
    }

    /// Registry backed by a quadtree with explicit split limits
    pub fn with_config(bounds: Aabb, config: QuadtreeConfig) -> Self {
        Self::with_index(Box::new(Quadtree::with_config(bounds, config)))
    }

    /// Registry backed by any spatial index
    pub fn with_index(index: Box<dyn SpatialIndex>) -> Self {
        log::debug!("Created collision registry over {:?}", index.bounds());
        Self {
            index,
            objects: ObjectMap::with_key(),
            identities: HashMap::new(),
            moving: Vec::new(),
            layer_space: None,
        }
    }

    /// Compute collision in `layer`'s coordinate space
    #[must_use]
    pub fn with_reference_layer(mut self, layer: Layer) -> Self {
        self.layer_space = Some(LayerSpace::new(layer));
        self
    }

    /// Track an object that never moves on its own (tiles, walls, platforms)
    ///
    /// Registering the same object twice returns the existing key.
    pub fn register_static<T: Collidable + 'static>(&mut self, object: &Rc<RefCell<T>>) -> ObjectKey {
        self.register(identity_of(object), ColliderRef::new_static(object))
    }

    /// Track an object that moves and gets resolved every tick
    ///
    /// Registering the same object twice returns the existing key.
    pub fn register_moving<T: MovingCollidable + 'static>(&mut self, object: &Rc<RefCell<T>>) -> ObjectKey {
        self.register(identity_of(object), ColliderRef::new_moving(object))
    }

    /// Stop tracking an object; returns `false` if it was not registered
    pub fn unregister(&mut self, key: ObjectKey) -> bool {
        let Some(entry) = self.objects.remove(key) else {
            return false;
        };

        self.identities.remove(&entry.identity);
        if entry.collider.is_moving() {
            self.moving.retain(|&moving| moving != key);
        }
        self.index.remove(key);
        log::trace!("Unregistered collider {key:?}");
        true
    }

    /// Check if a key refers to a registered object
    pub fn is_registered(&self, key: ObjectKey) -> bool {
        self.objects.contains_key(key)
    }

    /// Check if a key refers to a registered moving object
    pub fn is_moving(&self, key: ObjectKey) -> bool {
        self.objects
            .get(key)
            .is_some_and(|entry| entry.collider.is_moving())
    }

    /// Number of registered objects
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Number of registered moving objects
    pub fn moving_count(&self) -> usize {
        self.moving.len()
    }

    /// Re-index one object at its current bounding box
    pub fn refresh(&mut self, key: ObjectKey) {
        let Some(entry) = self.objects.get(key) else {
            return;
        };
        if let ColliderRead::Live(state) = entry.collider.read() {
            self.index.update(key, state.bounds);
        }
    }

    /// Broad-phase candidates for an object, as of the last rebuild
    pub fn candidates(&self, key: ObjectKey) -> Vec<ObjectKey> {
        self.index.retrieve(key)
    }

    /// Objects that may overlap an area, as of the last rebuild
    pub fn query_area(&self, area: &Aabb) -> Vec<ObjectKey> {
        self.index.query_area(area)
    }

    /// Mark an object for removal at the end of the next tick
    pub fn queue_pending_removal(&mut self, key: ObjectKey) {
        self.index.queue_pending_removal(key);
    }

    /// Flush queued removals now, dropping them from the index and the registry
    pub fn apply_pending_removals(&mut self) -> Vec<ObjectKey> {
        let removed = self.index.apply_pending_removals();
        for &key in &removed {
            self.unregister(key);
        }
        removed
    }

    /// The spatial index (for diagnostics and debug drawing)
    pub fn spatial_index(&self) -> &dyn SpatialIndex {
        self.index.as_ref()
    }

    /// Layer space, if a reference layer was configured
    pub fn layer_space(&self) -> Option<&LayerSpace> {
        self.layer_space.as_ref()
    }

    /// Update the camera used for layer conversion (no-op without a reference layer)
    pub fn set_camera_position(&mut self, camera: Vec2) {
        if let Some(space) = self.layer_space.as_mut() {
            space.set_camera_position(camera);
        }
    }

    /// Map a world position on `from` into collision space (identity without a reference layer)
    pub fn convert_world_position(&self, position: Vec2, from: &Layer) -> Vec2 {
        self.layer_space
            .as_ref()
            .map_or(position, |space| space.convert_world_position(position, from))
    }

    /// Map a screen position into collision space (identity without a reference layer)
    pub fn convert_screen_position(&self, position: Vec2) -> Vec2 {
        self.layer_space
            .as_ref()
            .map_or(position, |space| space.convert_screen_position(position))
    }

    /// Run one broad + narrow phase pass and notify colliding objects
    pub fn tick(&mut self, delta_time: f32) -> TickReport {
        let moving = self.moving.clone();
        self.rebuild_index();

        let mut ctx = CollisionContext::new(delta_time);
        let mut collisions = 0;
        for &key in &moving {
            for axis in Axis::RESOLUTION_ORDER {
                collisions += self.resolve_axis(key, axis, &mut ctx);
            }
        }

        for key in ctx.take_pending_removals() {
            self.index.queue_pending_removal(key);
        }
        let removed = self.apply_pending_removals();

        log::trace!(
            "Collision tick: {} objects, {} moving, {} contacts, {} removed",
            self.objects.len(),
            moving.len(),
            collisions,
            removed.len()
        );

        TickReport { collisions, removed }
    }

    fn register(&mut self, identity: usize, collider: ColliderRef) -> ObjectKey {
        if let Some(&existing) = self.identities.get(&identity) {
            let alive = self
                .objects
                .get(existing)
                .is_some_and(|entry| entry.collider.is_alive());
            if alive {
                return existing;
            }
            // The old object was dropped and its address reused
            self.unregister(existing);
        }

        let is_moving = collider.is_moving();
        let initial = collider.read();
        let key = self.objects.insert(RegisteredCollider { collider, identity });
        self.identities.insert(identity, key);
        if is_moving {
            self.moving.push(key);
        }
        if let ColliderRead::Live(state) = initial {
            self.index.insert(key, state.bounds);
        }

        log::trace!(
            "Registered {} collider {key:?}",
            if is_moving { "moving" } else { "static" }
        );
        key
    }

    /// Clear the index and reinsert every live object at its current box
    fn rebuild_index(&mut self) {
        self.index.clear();

        let mut dropped = Vec::new();
        for (key, entry) in &self.objects {
            match entry.collider.read() {
                ColliderRead::Live(state) => {
                    self.index.insert(key, state.bounds);
                }
                ColliderRead::Dropped => dropped.push(key),
                ColliderRead::Busy => {
                    log::warn!("Collider {key:?} is borrowed during rebuild; left out of this tick");
                }
            }
        }

        for key in dropped {
            log::debug!("Pruning dropped collider {key:?}");
            self.unregister(key);
        }
    }

    /// Resolve one moving object along one axis group; returns contacts dispatched
    fn resolve_axis(&self, key: ObjectKey, axis: Axis, ctx: &mut CollisionContext) -> usize {
        let Some(source) = self.objects.get(key) else {
            return 0;
        };

        let mut dispatched = 0;
        for target_key in self.index.retrieve(key) {
            // Callbacks may move the source, so read it fresh for every candidate
            let ColliderRead::Live(current) = source.collider.read() else {
                break;
            };
            let Some(previous) = current.previous else {
                break;
            };
            if !current.active {
                break;
            }

            let Some(target) = self.objects.get(target_key) else {
                continue;
            };
            let ColliderRead::Live(obstacle) = target.collider.read() else {
                continue;
            };
            if !obstacle.active {
                continue;
            }

            let Some(contact) = classify(&previous, &current.bounds, &obstacle.bounds, axis) else {
                continue;
            };

            let event = CollisionEvent {
                source: key,
                obstacle: target_key,
                obstacle_kind: obstacle.kind,
                direction: contact.direction,
                offset: contact.offset,
            };
            source.collider.dispatch(&event, ctx);
            target.collider.dispatch(&event.mirrored(current.kind), ctx);
            dispatched += 1;
        }
        dispatched
    }
}

impl std::fmt::Debug for CollisionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollisionRegistry")
            .field("bounds", &self.index.bounds())
            .field("objects", &self.objects.len())
            .field("moving", &self.moving.len())
            .field("layer_space", &self.layer_space)
            .finish()
    }
}
