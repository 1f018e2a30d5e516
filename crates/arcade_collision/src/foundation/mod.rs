//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types and the screen-space rectangle
//! - Handle types for arena-style storage
//! - Logging utilities

pub mod aabb;
pub mod collections;
pub mod logging;
pub mod math;

pub use aabb::Aabb;
pub use collections::{NodeKey, ObjectKey};
pub use math::Vec2;
