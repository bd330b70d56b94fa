// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the trait definitions (ports) that define the interfaces
//! for parsing option sources, reading files and converting values. These traits
//! are implemented by adapters in the adapters layer.

pub mod converter;
pub mod file_reader;
pub mod parser;

// Re-export commonly used types
pub use converter::{ConversionContext, ConverterKey, TypeConverter};
pub use file_reader::{FileReader, FileType};
pub use parser::ConfigParser;
