//! Math utilities and types
//!
//! Collision runs in 2D screen space: `x` grows to the right and `y` grows
//! downward, so "top" is the smaller `y`.

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;
