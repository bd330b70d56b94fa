// SPDX-License-Identifier: MIT OR Apache-2.0

//! Option files, typed converters and option injection.
//!
//! This crate reads option values from an INI-like file format (with sections,
//! line continuation and `#include`), from command-line arguments and from
//! code, merges them into an immutable [`Configuration`](service::Configuration),
//! and injects typed, validated values into the options that a type declares.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: option declarations, value types and errors
//!   (`OptionSpec`, `ClassSpec`, `OptionValue`, `TimeSpan`, `ConfigError`)
//! - **Ports**: trait definitions (`ConfigParser`, `FileReader`, `TypeConverter`)
//! - **Adapters**: the option-file parser, file readers, the command-line
//!   source and the built-in converters
//! - **Service**: the configuration snapshot, its builder, the converter
//!   registry and the injection engine
//!
//! # Option files
//!
//! ```text
//! # comment
//! // comment
//! #include common.properties
//!
//! [analysis]
//! threads = 4
//! timeout = 90s
//! files = a.c, \
//!         b.c
//! ```
//!
//! # Feature Flags
//!
//! - `cli`: Enable command-line argument support (default)
//!
//! # Quick Start
//!
//! ```rust
//! use optcfg::prelude::*;
//!
//! #[derive(Debug)]
//! struct Analysis {
//!     threads: i32,
//!     verbose: bool,
//! }
//!
//! impl Configurable for Analysis {
//!     fn options() -> ClassSpec<Self> {
//!         ClassSpec::new("analysis")
//!             .option(
//!                 OptionSpec::field("threads", |a: &Analysis| &a.threads, |a, v| a.threads = v)
//!                     .secondary(IntegerOption::min(1)),
//!             )
//!             .option(OptionSpec::field("verbose", |a: &Analysis| &a.verbose, |a, v| a.verbose = v))
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! let config = Configuration::builder()
//!     .load_from_string("[analysis]\nthreads = 8\n", None, "inline")?
//!     .build()?;
//!
//! let mut analysis = Analysis { threads: 1, verbose: false };
//! config.inject(&mut analysis)?;
//! assert_eq!(analysis.threads, 8);
//! assert!(config.get_unused_properties().is_empty());
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{
        ClassOption, ClassSpec, ConfigError, Configurable, FileKind, FileOption, IntegerOption,
        OptionSpec, OptionValue, Result, SetterError, TimeSpan, TimeSpanOption, TimeUnit,
    };
    pub use crate::ports::{ConfigParser, ConverterKey, TypeConverter};
    pub use crate::service::{Configuration, ConfigurationBuilder, ConverterRegistry};

    // Re-export adapters based on feature flags
    #[cfg(feature = "cli")]
    pub use crate::adapters::CommandLineAdapter;
    pub use crate::adapters::OptionsFileParser;
}
