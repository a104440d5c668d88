//! Core types, errors, configuration and small math helpers

pub mod config;
pub mod error;
pub mod math;
pub mod types;

pub use config::TacticsConfig;
pub use error::{Result, WarroomError};
