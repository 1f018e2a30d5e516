//! Coordinate conversion between parallax layers
//!
//! A rendering layer scrolls at `parallax` times the camera speed. Objects
//! drawn on one layer but collided on another need their positions mapped
//! through screen space: `screen = world - camera * parallax`.

use crate::foundation::Vec2;

/// Scroll behavior of a rendering layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layer {
    /// Per-axis scroll rate relative to the camera (1.0 = moves with the world)
    pub parallax: Vec2,
}

impl Layer {
    /// Layer with a per-axis scroll rate
    pub fn new(parallax: Vec2) -> Self {
        Self { parallax }
    }

    /// Layer that scrolls at the same rate on both axes
    pub fn uniform(rate: f32) -> Self {
        Self::new(Vec2::new(rate, rate))
    }

    /// World position on this layer -> screen position
    pub fn world_to_screen(&self, world: Vec2, camera: Vec2) -> Vec2 {
        world - camera.component_mul(&self.parallax)
    }

    /// Screen position -> world position on this layer
    pub fn screen_to_world(&self, screen: Vec2, camera: Vec2) -> Vec2 {
        screen + camera.component_mul(&self.parallax)
    }
}

impl Default for Layer {
    fn default() -> Self {
        Self::uniform(1.0)
    }
}

/// The collision layer's coordinate space plus the current camera position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerSpace {
    reference: Layer,
    camera: Vec2,
}

impl LayerSpace {
    /// Space anchored to `reference`, camera at the origin
    pub fn new(reference: Layer) -> Self {
        Self {
            reference,
            camera: Vec2::zeros(),
        }
    }

    /// Layer collision is computed in
    pub fn reference(&self) -> &Layer {
        &self.reference
    }

    /// Current camera position
    pub fn camera_position(&self) -> Vec2 {
        self.camera
    }

    /// Move the camera (call once per frame before ticking)
    pub fn set_camera_position(&mut self, camera: Vec2) {
        self.camera = camera;
    }

    /// Map a world position on `from` into the reference layer's world space
    pub fn convert_world_position(&self, position: Vec2, from: &Layer) -> Vec2 {
        let screen = from.world_to_screen(position, self.camera);
        self.reference.screen_to_world(screen, self.camera)
    }

    /// Map a screen position into the reference layer's world space
    pub fn convert_screen_position(&self, position: Vec2) -> Vec2 {
        self.reference.screen_to_world(position, self.camera)
    }
}
