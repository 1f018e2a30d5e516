//! Scope stack and global manager behavior

use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use super::{level_bounds, Body};
use crate::foundation::logging;
use crate::foundation::{Aabb, ObjectKey, Vec2};
use crate::physics::{
    Collidable, CollisionContext, CollisionEvent, CollisionManager, CollisionManagerScope, CollisionRegistry,
    CollisionScopes, Layer, MovingCollidable,
};

fn landing_pair() -> (Rc<RefCell<Body>>, Rc<RefCell<Body>>) {
    let block = Body::fixed(Aabb::new(100.0, 100.0, 40.0, 40.0));
    let faller = Body::moving(Aabb::new(100.0, 50.0, 20.0, 20.0), Aabb::new(100.0, 95.0, 20.0, 20.0));
    (block, faller)
}

#[test]
fn test_nested_scopes_restore_previous_registry() {
    logging::init_for_tests();
    let mut scopes = CollisionScopes::new();
    let tile = Body::fixed(Aabb::new(0.0, 600.0, 32.0, 32.0));
    let other = Body::fixed(Aabb::new(64.0, 64.0, 32.0, 32.0));
    let room = Aabb::new(0.0, 0.0, 320.0, 240.0);

    {
        let mut level_a = scopes.begin_scope(level_bounds(), None);
        let a_key = level_a.register_static(&tile).expect("scope A is active");

        {
            let mut level_b = level_a.begin_scope(room, None);
            assert_eq!(level_b.depth(), 2);
            assert_eq!(level_b.scope_depth(), 2);
            assert_eq!(level_b.current().map(CollisionRegistry::object_count), Some(0));

            level_b.register_static(&other);
            assert_eq!(level_b.current().map(CollisionRegistry::object_count), Some(1));
        }

        // Back on A, untouched by B's registrations
        assert_eq!(level_a.depth(), 1);
        let current = level_a.current().expect("scope A is current again");
        assert_eq!(current.object_count(), 1);
        assert!(current.is_registered(a_key));
        assert_eq!(current.spatial_index().bounds(), level_bounds());
    }

    assert_eq!(scopes.depth(), 0);
    assert!(!scopes.is_active());
    assert!(scopes.register_static(&tile).is_none());
    assert!(scopes.tick(0.016).is_none());
}

#[test]
fn test_suppressed_scope_disables_tracking() {
    let mut scopes = CollisionScopes::new();
    let (block, faller) = landing_pair();

    let mut level = scopes.begin_scope(level_bounds(), None);
    level.register_static(&block);
    let faller_key = level.register_moving(&faller).expect("level is active");

    {
        let mut cutscene = level.suppress();
        assert!(!cutscene.is_active());
        assert!(cutscene.tick(0.016).is_none());
        assert!(cutscene.retrieve(faller_key).is_empty());
        assert!(!cutscene.unregister(faller_key));
    }
    assert!(faller.borrow().events.is_empty());

    let report = level.tick(0.016).expect("level is active again");
    assert_eq!(report.collisions, 1);
    assert_eq!(faller.borrow().events.len(), 1);
}

fn load_level(scopes: &mut CollisionScopes, fail: bool) -> Result<usize, String> {
    let level = scopes.begin_scope(level_bounds(), None);
    if fail {
        return Err("missing tileset".to_string());
    }
    Ok(level.depth())
}

#[test]
fn test_scope_released_on_early_return() {
    let mut scopes = CollisionScopes::new();

    assert_eq!(load_level(&mut scopes, false), Ok(1));
    assert_eq!(scopes.depth(), 0);

    assert!(load_level(&mut scopes, true).is_err());
    assert_eq!(scopes.depth(), 0);
}

#[test]
fn test_scope_released_on_unwind() {
    let mut scopes = CollisionScopes::new();

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let _level = scopes.begin_scope(level_bounds(), None);
        panic!("level script failed");
    }));

    assert!(result.is_err());
    assert_eq!(scopes.depth(), 0);
}

#[test]
fn test_scope_conversions_use_current_layer() {
    let mut scopes = CollisionScopes::new();
    let position = Vec2::new(5.0, 6.0);
    assert_eq!(scopes.convert_screen_position(position), position);

    let mut level = scopes.begin_scope(level_bounds(), Some(Layer::default()));
    level.set_camera_position(Vec2::new(100.0, 0.0));
    assert_eq!(level.convert_screen_position(position), Vec2::new(105.0, 6.0));
    assert_eq!(level.convert_world_position(position, &Layer::default()), position);
}

#[test]
fn test_manager_is_noop_without_scope() {
    assert!(!CollisionManager::is_active());

    let (block, _) = landing_pair();
    assert!(CollisionManager::register_static(&block).is_none());
    assert!(CollisionManager::tick(0.016).is_none());

    let position = Vec2::new(3.0, 4.0);
    assert_eq!(CollisionManager::convert_screen_position(position), position);
}

#[test]
fn test_manager_scope_lifecycle() {
    let (block, faller) = landing_pair();
    {
        let _level = CollisionManager::begin_scope(level_bounds(), None);
        assert!(CollisionManager::is_active());
        assert_eq!(CollisionManager::depth(), 1);

        let block_key = CollisionManager::register_static(&block).expect("level is active");
        let faller_key = CollisionManager::register_moving(&faller).expect("level is active");

        let report = CollisionManager::tick(0.016).expect("level is active");
        assert_eq!(report.collisions, 1);
        assert_eq!(CollisionManager::retrieve(faller_key), vec![block_key]);

        {
            let _paused = CollisionManager::suppress();
            assert!(!CollisionManager::is_active());
            assert!(CollisionManager::tick(0.016).is_none());
        }

        assert!(CollisionManager::unregister(block_key));
        assert_eq!(CollisionManager::with_current(|registry| registry.object_count()), Some(1));
    }

    assert!(!CollisionManager::is_active());
    assert_eq!(CollisionManager::depth(), 0);
}

/// Misbehaving collider that reaches back into the global manager
struct Meddler {
    previous: Aabb,
    bounds: Aabb,
    child: Rc<RefCell<Body>>,
    registered_child: Option<Option<ObjectKey>>,
    tick_again: bool,
}

impl Collidable for Meddler {
    fn bounding_box(&self) -> Aabb {
        self.bounds
    }

    fn handle_collision(&mut self, _event: &CollisionEvent, _ctx: &mut CollisionContext) {
        self.registered_child = Some(CollisionManager::register_static(&self.child));
        if self.tick_again {
            CollisionManager::tick(0.016);
        }
    }
}

impl MovingCollidable for Meddler {
    fn previous_bounding_box(&self) -> Aabb {
        self.previous
    }
}

fn meddler(tick_again: bool) -> Rc<RefCell<Meddler>> {
    Rc::new(RefCell::new(Meddler {
        previous: Aabb::new(100.0, 50.0, 20.0, 20.0),
        bounds: Aabb::new(100.0, 95.0, 20.0, 20.0),
        child: Body::fixed(Aabb::new(0.0, 0.0, 8.0, 8.0)),
        registered_child: None,
        tick_again,
    }))
}

#[test]
fn test_manager_ignores_registration_from_callback() {
    let (block, _) = landing_pair();
    let meddler = meddler(false);

    let _level = CollisionManager::begin_scope(level_bounds(), None);
    CollisionManager::register_static(&block);
    CollisionManager::register_moving(&meddler);

    let report = CollisionManager::tick(0.016).expect("level is active");
    assert_eq!(report.collisions, 1);
    assert_eq!(meddler.borrow().registered_child, Some(None));
    assert_eq!(CollisionManager::with_current(|registry| registry.object_count()), Some(2));
}

#[test]
fn test_manager_reentrant_tick_panics() {
    logging::init_for_tests();
    let (block, _) = landing_pair();
    let meddler = meddler(true);

    let level = CollisionManager::begin_scope(level_bounds(), None);
    CollisionManager::register_static(&block);
    CollisionManager::register_moving(&meddler);

    let result = panic::catch_unwind(|| CollisionManager::tick(0.016));
    assert!(result.is_err());

    // The outer borrow was released while unwinding
    drop(level);
    assert_eq!(CollisionManager::depth(), 0);
}

#[test]
fn test_manager_out_of_order_release_keeps_newer_scopes() {
    logging::init_for_tests();

    let a = CollisionManager::begin_scope(level_bounds(), None);
    let b = CollisionManager::begin_scope(level_bounds(), None);

    // Releasing the outer scope first pops both
    drop(a);
    assert_eq!(CollisionManager::depth(), 0);

    let c = CollisionManager::begin_scope(level_bounds(), None);
    let d = CollisionManager::suppress();
    assert_eq!(CollisionManager::depth(), 2);

    // b's scope is already gone; its guard must not pop d
    drop(b);
    assert_eq!(CollisionManager::depth(), 2);
    assert!(!CollisionManager::is_active());

    drop(d);
    assert!(CollisionManager::is_active());
    drop(c);
    assert_eq!(CollisionManager::depth(), 0);
}

/// Collider that owns a scope guard and lets go of it on its first contact
struct ScopeHolder {
    previous: Aabb,
    bounds: Aabb,
    scope: Option<CollisionManagerScope>,
}

impl Collidable for ScopeHolder {
    fn bounding_box(&self) -> Aabb {
        self.bounds
    }

    fn handle_collision(&mut self, _event: &CollisionEvent, _ctx: &mut CollisionContext) {
        self.scope.take();
    }
}

impl MovingCollidable for ScopeHolder {
    fn previous_bounding_box(&self) -> Aabb {
        self.previous
    }
}

#[test]
fn test_manager_scope_dropped_in_callback_released_after_tick() {
    logging::init_for_tests();

    let (block, _) = landing_pair();
    let holder = Rc::new(RefCell::new(ScopeHolder {
        previous: Aabb::new(100.0, 50.0, 20.0, 20.0),
        bounds: Aabb::new(100.0, 95.0, 20.0, 20.0),
        scope: None,
    }));

    let _level = CollisionManager::begin_scope(level_bounds(), None);
    let room = CollisionManager::begin_scope(level_bounds(), None);
    CollisionManager::register_static(&block);
    CollisionManager::register_moving(&holder);
    holder.borrow_mut().scope = Some(room);
    assert_eq!(CollisionManager::depth(), 2);

    let report = CollisionManager::tick(0.016).expect("room is active");
    assert_eq!(report.collisions, 1);
    assert!(holder.borrow().scope.is_none());

    // The room was popped once the tick let go of the stack
    assert_eq!(CollisionManager::depth(), 1);
    assert_eq!(CollisionManager::with_current(|registry| registry.object_count()), Some(0));
}
