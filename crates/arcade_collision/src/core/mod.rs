//! # Core Module
//!
//! Shared configuration for the collision subsystems.

pub mod config;

pub use config::CollisionConfig;
pub use crate::config::{Config, ConfigError};
