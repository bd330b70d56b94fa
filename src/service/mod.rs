// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer: the configuration snapshot, its builder, the converter
//! registry and the injection engine.

pub mod builder;
pub mod configuration;
mod injector;
pub mod registry;

// Re-export commonly used types
pub use builder::ConfigurationBuilder;
pub use configuration::Configuration;
pub use registry::ConverterRegistry;
