pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{AvailabilityClient, FileRecorder};
pub use core::{checker::AvailabilityChecker, engine::ScanEngine, generator::NumberGenerator};
pub use utils::error::{Result, ScanError};
