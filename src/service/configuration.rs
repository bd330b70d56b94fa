// SPDX-License-Identifier: MIT OR Apache-2.0

//! The immutable configuration snapshot.
//!
//! A [`Configuration`] holds the merged option values and their sources, the
//! prefix used for lookups, any converter overrides and the per-configuration
//! file converter. Values are injected into [`Configurable`] types through
//! [`Configuration::inject`]. Which supplied options were never looked up, and
//! which were set through deprecated names, is tracked across all
//! configurations derived from one another.

use super::builder::ConfigurationBuilder;
use super::injector::Injector;
use super::registry::ConverterRegistry;
use crate::adapters::converters::FileTypeConverter;
use crate::adapters::FsFileReader;
use crate::domain::{
    ClassSpec, Configurable, OptionSource, OptionSpec, OptionType, Result, SecondaryKind,
    SecondaryOption, UsageTracker,
};
use crate::ports::{ConverterKey, FileReader, TypeConverter};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Write as _;
use std::sync::Arc;

/// Converters that replace the registry's for one configuration.
pub(crate) type ConverterOverrides = HashMap<ConverterKey, Arc<dyn TypeConverter>>;

/// Options of the configuration itself, injected when it is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ConfigurationOptions {
    pub(crate) export_used_options: bool,
}

impl Configurable for ConfigurationOptions {
    fn options() -> ClassSpec<Self> {
        ClassSpec::new("log.usedOptions").option(
            OptionSpec::field(
                "export_used_options",
                |o: &Self| &o.export_used_options,
                |o, v| o.export_used_options = v,
            )
            .name("export")
            .secure()
            .description("all used options are printed"),
        )
    }
}

/// A value found by a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FoundValue {
    pub(crate) value: String,
    pub(crate) source: Option<OptionSource>,
}

/// An immutable set of option values.
///
/// Cloning is cheap; clones share the values and the usage tracking.
///
/// # Examples
///
/// ```rust
/// use optcfg::prelude::*;
///
/// # fn main() -> Result<()> {
/// let config = Configuration::builder()
///     .set_option("analysis.threads", "4")
///     .set_option("unused.option", "x")
///     .build()?;
/// assert_eq!(config.get_property("analysis.threads").as_deref(), Some("4"));
/// assert!(config.get_unused_properties().contains("unused.option"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Configuration {
    pub(crate) properties: Arc<BTreeMap<String, String>>,
    pub(crate) sources: Arc<BTreeMap<String, OptionSource>>,
    pub(crate) prefix: String,
    pub(crate) overrides: Option<Arc<ConverterOverrides>>,
    pub(crate) file_converter: Arc<FileTypeConverter>,
    pub(crate) registry: Arc<ConverterRegistry>,
    pub(crate) usage: UsageTracker,
    pub(crate) reader: Arc<dyn FileReader>,
    pub(crate) own_options: ConfigurationOptions,
}

impl Configuration {
    /// Creates a new builder.
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::new()
    }

    /// A configuration without any values, using the global registry.
    pub fn default_configuration() -> Configuration {
        let registry = ConverterRegistry::global();
        let reader: Arc<dyn FileReader> = Arc::new(FsFileReader::new());
        Configuration {
            properties: Arc::new(BTreeMap::new()),
            sources: Arc::new(BTreeMap::new()),
            prefix: String::new(),
            overrides: None,
            file_converter: Arc::new(FileTypeConverter::from_defaults(
                registry.is_secure_mode(),
                Arc::clone(&reader),
            )),
            registry,
            usage: UsageTracker::new(),
            reader,
            own_options: ConfigurationOptions::default(),
        }
    }

    /// Builds a configuration from `--key=value` command-line arguments.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use optcfg::prelude::*;
    ///
    /// # fn main() -> Result<()> {
    /// let config = Configuration::from_cmd_line_arguments(["--solver.threads=2"])?;
    /// assert!(config.has_property("solver.threads"));
    /// # Ok(())
    /// # }
    /// ```
    #[cfg(feature = "cli")]
    pub fn from_cmd_line_arguments<I, S>(args: I) -> Result<Configuration>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        use crate::adapters::CommandLineAdapter;
        let adapter = CommandLineAdapter::from_args(args)?;
        let mut builder = Self::builder();
        builder.set_parsed_options(adapter.into_parsed_options());
        builder.build()
    }

    /// Switches secure mode on for every configuration using the global registry.
    pub fn enable_secure_mode_globally() {
        ConverterRegistry::global().enable_secure_mode();
    }

    /// Returns a view of this configuration that looks up options below `prefix`
    /// first.
    ///
    /// The view shares values and usage tracking with this configuration.
    pub fn copy_with_new_prefix(&self, prefix: &str) -> Configuration {
        let mut copy = self.clone();
        copy.prefix = normalize_prefix(prefix);
        copy
    }

    /// The lookup prefix, `""` or ending in `.`.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The registry this configuration converts with.
    pub fn registry(&self) -> &Arc<ConverterRegistry> {
        &self.registry
    }

    /// The file converter of this configuration.
    pub fn file_converter(&self) -> &FileTypeConverter {
        &self.file_converter
    }

    /// True if the option is defined, with or without the prefix.
    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(&format!("{}{name}", self.prefix))
            || (!self.prefix.is_empty() && self.properties.contains_key(name))
    }

    /// The value of an option, looked up with and then without the prefix.
    ///
    /// Looked-up names no longer count as unused.
    pub fn get_property(&self, name: &str) -> Option<String> {
        self.lookup(name).map(|found| found.value)
    }

    /// Options that were supplied but never looked up.
    pub fn get_unused_properties(&self) -> BTreeSet<String> {
        self.usage.unused()
    }

    /// Options that were set through a deprecated name.
    pub fn get_deprecated_properties(&self) -> BTreeSet<String> {
        self.usage.deprecated()
    }

    /// All values as `key = value` lines, sorted by key.
    pub fn as_properties_string(&self) -> String {
        let mut result = String::new();
        for (key, value) in self.properties.iter() {
            let _ = writeln!(result, "{key} = {value}");
        }
        result
    }

    /// Injects option values into `target`, using its current values as defaults.
    ///
    /// # Errors
    ///
    /// Fails on invalid values, missing required options, secure-mode
    /// violations and wrong option declarations. Options processed before the
    /// failing one keep their new values.
    pub fn inject<T: Configurable>(&self, target: &mut T) -> Result<()> {
        let spec = T::options();
        self.inject_spec(target, &spec)
    }

    /// Injects option values into `target`, taking defaults from `defaults`.
    pub fn inject_with_defaults<T: Configurable>(&self, target: &mut T, defaults: &T) -> Result<()> {
        let spec = T::options();
        Injector::new(self).inject(target, &spec, Some(defaults))
    }

    /// Injects option values into `target` according to an explicit declaration.
    pub fn inject_spec<T>(&self, target: &mut T, spec: &ClassSpec<T>) -> Result<()> {
        Injector::new(self).inject(target, spec, None)
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<FoundValue> {
        let prefixed = format!("{}{name}", self.prefix);
        self.usage.mark_used(&prefixed);
        if let Some(found) = self.found(&prefixed) {
            return Some(found);
        }
        if self.prefix.is_empty() {
            return None;
        }
        self.usage.mark_used(name);
        self.found(name)
    }

    fn found(&self, key: &str) -> Option<FoundValue> {
        self.properties.get(key).map(|value| FoundValue {
            value: value.clone(),
            source: self.sources.get(key).cloned(),
        })
    }

    pub(crate) fn usage(&self) -> &UsageTracker {
        &self.usage
    }

    pub(crate) fn exports_used_options(&self) -> bool {
        self.own_options.export_used_options
    }

    /// Selects the converter for an option: annotation converters first, then
    /// type converters, overrides before the registry.
    pub(crate) fn converter_for(
        &self,
        secondary: Option<&SecondaryOption>,
        element: &OptionType,
    ) -> Arc<dyn TypeConverter> {
        let overridden = |key: ConverterKey| {
            self.overrides
                .as_ref()
                .and_then(|overrides| overrides.get(&key).cloned())
        };

        if let Some(secondary) = secondary {
            let key = ConverterKey::Secondary(secondary.kind());
            if let Some(converter) = overridden(key) {
                return converter;
            }
            if secondary.kind() == SecondaryKind::File {
                return Arc::clone(&self.file_converter) as Arc<dyn TypeConverter>;
            }
            if let Some(converter) = self.registry.get(key) {
                return converter;
            }
        }

        let key = ConverterKey::Type(element.key());
        overridden(key)
            .or_else(|| self.registry.get(key))
            .unwrap_or_else(|| self.registry.base_converter())
    }
}

/// Appends the separating `.` to a non-empty prefix.
pub(crate) fn normalize_prefix(prefix: &str) -> String {
    if prefix.is_empty() || prefix.ends_with('.') {
        prefix.to_string()
    } else {
        format!("{prefix}.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{IntegerOption, TypeKey};

    fn config(options: &[(&str, &str)]) -> Configuration {
        let mut builder = Configuration::builder();
        builder.with_registry(Arc::new(ConverterRegistry::new()));
        for (key, value) in options {
            builder.set_option(*key, *value);
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_default_configuration_is_empty() {
        let config = Configuration::default_configuration();
        assert!(config.get_unused_properties().is_empty());
        assert_eq!(config.prefix(), "");
        assert_eq!(config.as_properties_string(), "");
    }

    #[test]
    fn test_prefixed_lookup_falls_back() {
        let config = config(&[("a.x", "1"), ("x", "2"), ("y", "3")]).copy_with_new_prefix("a");
        assert_eq!(config.prefix(), "a.");
        assert_eq!(config.get_property("x").as_deref(), Some("1"));
        assert_eq!(config.get_property("y").as_deref(), Some("3"));
        assert!(config.has_property("x"));
        assert!(!config.has_property("z"));
        // the unprefixed "x" was never needed
        assert_eq!(
            config.get_unused_properties(),
            BTreeSet::from(["x".to_string()])
        );
    }

    #[test]
    fn test_prefix_copy_shares_usage() {
        let base = config(&[("a.x", "1")]);
        let copy = base.copy_with_new_prefix("a.");
        assert_eq!(copy.prefix(), "a.");
        copy.get_property("x");
        assert!(base.get_unused_properties().is_empty());
    }

    #[test]
    fn test_properties_string_sorted() {
        let config = config(&[("b", "2"), ("a", "1")]);
        assert_eq!(config.as_properties_string(), "a = 1\nb = 2\n");
    }

    #[test]
    fn test_converter_selection() {
        let config = config(&[]);
        let integer = SecondaryOption::Integer(IntegerOption::default());
        let converter = config.converter_for(Some(&integer), &OptionType::Int);
        assert!(format!("{converter:?}").contains("IntegerTypeConverter"));
        let converter = config.converter_for(None, &OptionType::Int);
        assert!(format!("{converter:?}").contains("BaseTypeConverter"));
        let converter = config.converter_for(None, &OptionType::Class { bound: None });
        assert!(format!("{converter:?}").contains("ClassTypeConverter"));
        assert!(config.registry().get(ConverterKey::Type(TypeKey::Int)).is_none());
    }

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(normalize_prefix(""), "");
        assert_eq!(normalize_prefix("a"), "a.");
        assert_eq!(normalize_prefix("a."), "a.");
    }
}
