//! Configuration module for MedExp
//!
//! - Data directory resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::MedexpPaths;
pub use settings::Settings;
