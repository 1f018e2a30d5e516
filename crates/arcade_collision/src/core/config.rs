//! # Collision Configuration
//!
//! Tunables for the spatial index plus the default world bounds a level
//! scope is created with. Loadable from TOML or RON through [`Config`].

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};
use crate::foundation::Aabb;
use crate::spatial::QuadtreeConfig;

/// Default level bounds (a 25x20 grid of 32px tiles)
pub const DEFAULT_WORLD_BOUNDS: Aabb = Aabb::new(0.0, 0.0, 800.0, 640.0);

/// Top-level collision configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Quadtree split policy
    pub quadtree: QuadtreeConfig,

    /// Region covered by a level's spatial index
    pub world_bounds: Aabb,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            quadtree: QuadtreeConfig::default(),
            world_bounds: DEFAULT_WORLD_BOUNDS,
        }
    }
}

impl Config for CollisionConfig {}

impl CollisionConfig {
    /// Check that the values describe a usable index
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quadtree.max_objects == 0 {
            return Err(ConfigError::Invalid(
                "quadtree.max_objects must be at least 1".to_string(),
            ));
        }
        if self.world_bounds.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "world_bounds must have positive area, got {:?}",
                self.world_bounds
            )));
        }
        Ok(())
    }
}
