// src/lib.rs

#![no_std] // Specify no_std at the crate root

// must come first so the logging macros are visible to every module below
mod fmt;

pub mod common;
pub mod driver;

// Re-export key types for convenience
pub use common::{ModelDescriptor, Reading, TfLidarError, Transport};
pub use driver::{Binding, DriverConfig, HandleError, TfLidar};
