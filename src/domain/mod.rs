// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core types and logic.
//!
//! This module contains the option declarations, the value types options
//! convert to, and the error taxonomy. It is independent of file systems and
//! converters and defines the fundamental concepts used throughout the library.

pub mod charset;
pub mod class_catalog;
pub mod errors;
pub mod option_name;
pub mod option_spec;
pub mod option_value;
pub mod parsed_options;
pub mod path_template;
pub mod rational;
pub mod time_span;
pub mod usage;

// Re-export commonly used types
pub use charset::Charset;
pub use class_catalog::{ClassCatalog, ClassRef, Factory, RegisteredClass};
pub use errors::{ConfigError, ParseErrorKind, Result};
pub use option_name::OptionName;
pub use option_spec::{
    ClassOption, ClassSpec, Configurable, FileKind, FileOption, IntegerOption, OptionSpec,
    SecondaryKind, SecondaryOption, SetterError, TimeSpanOption,
};
pub use option_value::{CollectionKind, Multiset, OptionKind, OptionType, OptionValue, TypeKey};
pub use parsed_options::{OptionSource, ParsedOptions};
pub use path_template::PathTemplate;
pub use rational::Rational;
pub use time_span::{TimeSpan, TimeUnit};
pub use usage::UsageTracker;
