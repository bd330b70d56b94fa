// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing implementations of the ports.
//!
//! This module contains the option-file parser, the file readers, the
//! command-line source and the built-in type converters.

#[cfg(feature = "cli")]
pub mod cli;
pub mod converters;
pub mod file_system;
pub mod options_file;

// Re-export adapters based on feature flags
#[cfg(feature = "cli")]
pub use cli::CommandLineAdapter;
pub use file_system::{FsFileReader, InMemoryFileReader};
pub use options_file::OptionsFileParser;
