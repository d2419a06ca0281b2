//! Configuration module for traffic-cli
//!
//! This module provides configuration management including:
//! - Platform path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::TrafficPaths;
pub use settings::Settings;
