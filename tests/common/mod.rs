// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared fixtures for the integration tests.

use optcfg::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A builder with its own registry, so that secure mode or registered
/// classes do not leak between tests.
#[allow(dead_code)]
pub fn isolated_builder() -> ConfigurationBuilder {
    let mut builder = ConfigurationBuilder::new();
    builder.with_registry(Arc::new(ConverterRegistry::new()));
    builder
}

/// Builds an isolated configuration from key/value pairs.
#[allow(dead_code)]
pub fn config_of(options: &[(&str, &str)]) -> Configuration {
    isolated_builder()
        .set_options(options.iter().copied())
        .build()
        .expect("configuration should build")
}

/// Writes `content` to `dir/name` and returns the path.
#[allow(dead_code)]
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent directories");
    }
    std::fs::write(&path, content).expect("write option file");
    path
}

/// Options with a deprecated prefix and a deprecated name.
#[derive(Debug, Default, Clone, PartialEq)]
#[allow(dead_code)]
pub struct Renamed {
    pub name: String,
    pub legacy: i32,
}

impl Configurable for Renamed {
    fn options() -> ClassSpec<Self> {
        ClassSpec::new("prefix")
            .deprecated_prefix("deprecated")
            .option(
                OptionSpec::field("name", |r: &Renamed| &r.name, |r, v| r.name = v)
                    .deprecated_name("deprecated"),
            )
            .option(
                OptionSpec::field("legacy", |r: &Renamed| &r.legacy, |r, v| r.legacy = v)
                    .deprecated(),
            )
    }
}
