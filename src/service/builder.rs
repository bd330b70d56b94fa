// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builder for [`Configuration`].
//!
//! Values are layered in call order: a later `set_option` or file load
//! overrides earlier values of the same option. `copy_from` starts from an
//! existing configuration and must come first.

use super::configuration::{Configuration, ConfigurationOptions, ConverterOverrides};
use super::registry::ConverterRegistry;
use crate::adapters::converters::{FileConverterOptions, FileTypeConverter};
use crate::adapters::{FsFileReader, OptionsFileParser};
use crate::domain::{ConfigError, OptionSource, ParsedOptions, Result, UsageTracker};
use crate::ports::{ConfigParser, ConverterKey, FileReader, TypeConverter};
use directories::ProjectDirs;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// The configuration a builder was copied from.
#[derive(Clone, Debug, Default)]
struct Base {
    usage: UsageTracker,
    properties: Arc<BTreeMap<String, String>>,
}

/// Builder for constructing a [`Configuration`].
///
/// A successful `build` resets the builder, so it can be reused for another
/// configuration.
///
/// # Examples
///
/// ```rust
/// use optcfg::service::ConfigurationBuilder;
///
/// # fn main() -> optcfg::domain::Result<()> {
/// let config = ConfigurationBuilder::new()
///     .set_option("solver.threads", "2")
///     .load_from_string("[solver]\nname = greedy\n", None, "inline")?
///     .build()?;
/// assert_eq!(config.get_property("solver.name").as_deref(), Some("greedy"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct ConfigurationBuilder {
    properties: BTreeMap<String, String>,
    sources: BTreeMap<String, OptionSource>,
    prefix: String,
    overrides: ConverterOverrides,
    registry: Option<Arc<ConverterRegistry>>,
    reader: Option<Arc<dyn FileReader>>,
    base: Option<Base>,
    modified: bool,
}

impl ConfigurationBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a single option.
    pub fn set_option(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let name = name.into();
        self.sources.insert(name.clone(), OptionSource::Manual);
        self.properties.insert(name, value.into());
        self.modified = true;
        self
    }

    /// Sets several options.
    pub fn set_options<I, K, V>(&mut self, options: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in options {
            self.set_option(name, value);
        }
        self
    }

    /// Sets all options of a parsed source, keeping their sources.
    pub fn set_parsed_options(&mut self, options: ParsedOptions) -> &mut Self {
        let (properties, sources) = options.into_parts();
        self.properties.extend(properties);
        self.sources.extend(sources);
        self.modified = true;
        self
    }

    /// Removes an option, including one inherited through `copy_from`.
    pub fn clear_option(&mut self, name: &str) -> &mut Self {
        self.properties.remove(name);
        self.sources.remove(name);
        self.modified = true;
        self
    }

    /// Starts from all values of `other`.
    ///
    /// Prefix, converter overrides, registry and file reader are inherited, and
    /// the new configuration shares the unused and deprecated tracking of
    /// `other`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::BuilderState`] unless this is the first call on
    /// the builder.
    pub fn copy_from(&mut self, other: &Configuration) -> Result<&mut Self> {
        if self.modified {
            return Err(ConfigError::BuilderState {
                message: "copy_from must be called before any other builder method".to_string(),
            });
        }
        self.properties = (*other.properties).clone();
        self.sources = (*other.sources).clone();
        self.prefix = other.prefix.clone();
        if let Some(overrides) = &other.overrides {
            self.overrides = (**overrides).clone();
        }
        self.registry = Some(Arc::clone(&other.registry));
        self.reader = Some(Arc::clone(&other.reader));
        self.base = Some(Base {
            usage: other.usage.clone(),
            properties: Arc::clone(&other.properties),
        });
        self.modified = true;
        Ok(self)
    }

    /// Copies a single option, with its source, from `other`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::BuilderState`] if `other` does not define the option.
    pub fn copy_option_from(&mut self, other: &Configuration, name: &str) -> Result<&mut Self> {
        let value = other
            .properties
            .get(name)
            .ok_or_else(|| ConfigError::BuilderState {
                message: format!("option {name} is not set in the configuration to copy from"),
            })?;
        self.properties.insert(name.to_string(), value.clone());
        let source = other
            .sources
            .get(name)
            .cloned()
            .unwrap_or(OptionSource::Manual);
        self.sources.insert(name.to_string(), source);
        self.modified = true;
        Ok(self)
    }

    /// Sets the lookup prefix; a separating `.` is appended if missing.
    pub fn set_prefix(&mut self, prefix: &str) -> &mut Self {
        self.prefix = super::configuration::normalize_prefix(prefix);
        self.modified = true;
        self
    }

    /// Uses `converter` for `key` instead of the registry's converter, in this
    /// configuration only.
    pub fn add_converter(&mut self, key: ConverterKey, converter: Arc<dyn TypeConverter>) -> &mut Self {
        self.overrides.insert(key, converter);
        self.modified = true;
        self
    }

    /// Uses `registry` instead of the global registry.
    pub fn with_registry(&mut self, registry: Arc<ConverterRegistry>) -> &mut Self {
        self.registry = Some(registry);
        self
    }

    /// Reads option files, and checks file options, through `reader`.
    pub fn with_file_reader(&mut self, reader: Arc<dyn FileReader>) -> &mut Self {
        self.reader = Some(reader);
        self
    }

    fn reader(&self) -> Arc<dyn FileReader> {
        match &self.reader {
            Some(reader) => Arc::clone(reader),
            None => Arc::new(FsFileReader::new()),
        }
    }

    /// Loads an option file. Its values override values set before.
    ///
    /// # Errors
    ///
    /// Fails if the file or one of its includes cannot be read or parsed.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        let parser = OptionsFileParser::with_reader(self.reader());
        let options = parser.parse_file(path.as_ref())?;
        tracing::debug!(
            "Loaded {} options from {}",
            options.len(),
            path.as_ref().display()
        );
        Ok(self.set_parsed_options(options))
    }

    /// Loads options in file syntax from a string.
    ///
    /// Includes are resolved against `base_dir`; `source_name` names the
    /// string in error messages and serves as the source of its options.
    pub fn load_from_string(
        &mut self,
        content: &str,
        base_dir: Option<&Path>,
        source_name: &str,
    ) -> Result<&mut Self> {
        let parser = OptionsFileParser::with_reader(self.reader());
        let options = parser.parse(content, base_dir, source_name)?;
        Ok(self.set_parsed_options(options))
    }

    /// Loads `file_name` from the platform configuration directory of the
    /// application, if it exists.
    ///
    /// Returns whether a file was loaded.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use optcfg::service::ConfigurationBuilder;
    ///
    /// # fn main() -> optcfg::domain::Result<()> {
    /// let mut builder = ConfigurationBuilder::new();
    /// if !builder.load_from_default_location("myapp", "com.example", "options.properties")? {
    ///     println!("no option file found");
    /// }
    /// let config = builder.build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn load_from_default_location(
        &mut self,
        app_name: &str,
        qualifier: &str,
        file_name: &str,
    ) -> Result<bool> {
        let proj_dirs =
            ProjectDirs::from(qualifier, "", app_name).ok_or_else(|| ConfigError::Read {
                path: file_name.into(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "failed to determine project directories",
                ),
            })?;

        let path = proj_dirs.config_dir().join(file_name);
        if self.reader().file_type(&path).is_none() {
            tracing::debug!("No option file at {}", path.display());
            return Ok(false);
        }
        self.load_from_file(&path)?;
        Ok(true)
    }

    /// Builds the configuration and resets the builder.
    ///
    /// # Errors
    ///
    /// Fails if the options of the configuration itself (`output.path`,
    /// `rootDirectory`, `log.usedOptions.export`, ...) have invalid values.
    /// The builder keeps its state in that case.
    pub fn build(&mut self) -> Result<Configuration> {
        let config = self.clone().into_configuration()?;
        *self = Self::default();
        Ok(config)
    }

    fn into_configuration(self) -> Result<Configuration> {
        let builder = self;
        let registry = builder.registry.unwrap_or_else(ConverterRegistry::global);
        let reader = match builder.reader {
            Some(reader) => reader,
            None => Arc::new(FsFileReader::new()),
        };

        let usage = match builder.base {
            Some(base) => {
                let added = builder
                    .properties
                    .iter()
                    .filter(|(key, value)| base.properties.get(*key) != Some(*value))
                    .map(|(key, _)| key.clone());
                base.usage.add_unused(added);
                base.usage
            }
            None => UsageTracker::with_unused(builder.properties.keys().cloned()),
        };

        let overrides = if builder.overrides.is_empty() {
            None
        } else {
            Some(Arc::new(builder.overrides))
        };

        let secure_mode = registry.is_secure_mode();
        let mut config = Configuration {
            properties: Arc::new(builder.properties),
            sources: Arc::new(builder.sources),
            prefix: builder.prefix,
            overrides,
            file_converter: Arc::new(FileTypeConverter::from_defaults(
                secure_mode,
                Arc::clone(&reader),
            )),
            registry,
            usage,
            reader,
            own_options: ConfigurationOptions::default(),
        };

        let mut file_options = FileConverterOptions::default();
        config.inject(&mut file_options)?;
        config.file_converter = Arc::new(FileTypeConverter::new(
            &file_options,
            secure_mode,
            Arc::clone(&config.reader),
        )?);

        let mut own_options = ConfigurationOptions::default();
        config.inject(&mut own_options)?;
        config.own_options = own_options;

        tracing::debug!(
            "Built configuration with {} options",
            config.properties.len()
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryFileReader;
    use crate::domain::{OptionType, OptionValue, TypeKey};
    use crate::ports::ConversionContext;
    use std::collections::BTreeSet;

    fn builder() -> ConfigurationBuilder {
        let mut builder = ConfigurationBuilder::new();
        builder.with_registry(Arc::new(ConverterRegistry::new()));
        builder
    }

    #[test]
    fn test_later_values_win() {
        let config = builder()
            .set_option("a", "1")
            .set_options([("a", "2"), ("b", "3")])
            .build()
            .unwrap();
        assert_eq!(config.get_property("a").as_deref(), Some("2"));
        assert_eq!(config.get_property("b").as_deref(), Some("3"));
    }

    #[test]
    fn test_build_resets() {
        let mut builder = builder();
        builder.set_option("a", "1").set_prefix("x");
        let first = builder.build().unwrap();
        assert_eq!(first.prefix(), "x.");
        let second = builder.build().unwrap();
        assert!(!second.has_property("a"));
        assert_eq!(second.prefix(), "");
    }

    #[test]
    fn test_failed_build_keeps_state() {
        let mut builder = builder();
        builder.set_option("a", "1").set_option("log.usedOptions.export", "maybe");
        assert!(builder.build().is_err());

        builder.set_option("log.usedOptions.export", "false");
        let config = builder.build().unwrap();
        assert_eq!(config.get_property("a").as_deref(), Some("1"));
    }

    #[test]
    fn test_copy_from_must_come_first() {
        let base = builder().set_option("a", "1").build().unwrap();
        let mut builder = ConfigurationBuilder::new();
        builder.set_option("b", "2");
        let error = builder.copy_from(&base).unwrap_err();
        assert!(matches!(error, ConfigError::BuilderState { .. }));
    }

    #[test]
    fn test_copy_from_shares_usage() {
        let base = builder().set_option("a", "1").set_option("b", "2").build().unwrap();
        let derived = ConfigurationBuilder::new()
            .copy_from(&base)
            .unwrap()
            .set_option("c", "3")
            .clear_option("b")
            .build()
            .unwrap();
        assert!(Arc::ptr_eq(base.registry(), derived.registry()));
        assert!(!derived.has_property("b"));

        derived.get_property("a");
        assert_eq!(
            base.get_unused_properties(),
            BTreeSet::from(["b".to_string(), "c".to_string()])
        );
    }

    #[test]
    fn test_copy_option_from() {
        let base = builder().set_option("a", "1").build().unwrap();
        let config = builder()
            .copy_option_from(&base, "a")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.get_property("a").as_deref(), Some("1"));
        let error = builder().copy_option_from(&base, "missing").unwrap_err();
        assert!(error.to_string().contains("missing"));
    }

    #[test]
    fn test_load_from_file_with_reader() {
        let reader = Arc::new(
            InMemoryFileReader::new()
                .with_file("/conf/main.properties", "#include extra.properties\na = 1\n")
                .with_file("/conf/extra.properties", "a = 0\nb = 2\n"),
        );
        let config = builder()
            .with_file_reader(reader)
            .load_from_file("/conf/main.properties")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.get_property("a").as_deref(), Some("1"));
        assert_eq!(config.get_property("b").as_deref(), Some("2"));
    }

    #[test]
    fn test_load_from_missing_file() {
        let error = builder()
            .with_file_reader(Arc::new(InMemoryFileReader::new()))
            .load_from_file("/nowhere.properties")
            .unwrap_err();
        assert!(matches!(error, ConfigError::Read { .. }));
    }

    #[test]
    fn test_own_file_options() {
        let config = builder()
            .set_option("output.path", "results")
            .set_option("output.disable", "true")
            .build()
            .unwrap();
        assert_eq!(
            config.file_converter().output_directory(),
            Path::new("./results")
        );
        assert!(config.file_converter().is_output_disabled());
        assert!(config.get_unused_properties().is_empty());
    }

    #[test]
    fn test_unsafe_output_path_in_secure_mode() {
        let registry = Arc::new(ConverterRegistry::new());
        registry.enable_secure_mode();
        let error = ConfigurationBuilder::new()
            .with_registry(registry)
            .set_option("output.path", "../elsewhere")
            .build()
            .unwrap_err();
        assert!(error.to_string().contains("forbidden in safe mode"));
    }

    #[test]
    fn test_converter_override() {
        #[derive(Debug)]
        struct Inverted;

        impl TypeConverter for Inverted {
            fn convert(
                &self,
                _ctx: &ConversionContext<'_>,
                value: &str,
                _target: &OptionType,
            ) -> Result<OptionValue> {
                Ok(OptionValue::Bool(value != "true"))
            }
        }

        let config = builder()
            .add_converter(ConverterKey::Type(TypeKey::Bool), Arc::new(Inverted))
            .set_option("flag", "true")
            .build()
            .unwrap();
        let converter = config.converter_for(None, &OptionType::Bool);
        assert_eq!(
            converter
                .convert(&ConversionContext::new("flag"), "true", &OptionType::Bool)
                .unwrap(),
            OptionValue::Bool(false)
        );
        assert!(config.registry().get(ConverterKey::Type(TypeKey::Bool)).is_none());
    }
}
