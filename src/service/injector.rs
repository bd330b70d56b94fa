// SPDX-License-Identifier: MIT OR Apache-2.0

//! The injection engine.
//!
//! For every option a type declares, the engine checks the declaration, looks
//! the value up (current name first, then the deprecated forms), validates the
//! raw string, converts it with the selected converter and writes the result
//! through the option's setter. Options without a value receive their converted
//! default. Injection stops at the first error; options processed before it
//! keep their new values.

use super::configuration::{Configuration, FoundValue};
use crate::domain::{
    ClassSpec, ConfigError, OptionName, OptionSpec, OptionType, OptionValue, Result,
    SecondaryOption, SetterError, TypeKey,
};
use crate::ports::ConversionContext;
use regex::Regex;

/// Injects option values of one configuration.
#[derive(Debug)]
pub(crate) struct Injector<'c> {
    config: &'c Configuration,
}

impl<'c> Injector<'c> {
    pub(crate) fn new(config: &'c Configuration) -> Self {
        Injector { config }
    }

    /// Injects all options of `spec` into `target`.
    ///
    /// Defaults are read from `defaults` if given, otherwise from `target`.
    pub(crate) fn inject<T>(
        &self,
        target: &mut T,
        spec: &ClassSpec<T>,
        defaults: Option<&T>,
    ) -> Result<()> {
        tracing::debug!(
            "Injecting {} options with prefix '{}'",
            spec.options().len(),
            spec.prefix()
        );
        for option in spec.options() {
            self.inject_option(target, spec, option, defaults)?;
        }
        Ok(())
    }

    fn inject_option<T>(
        &self,
        target: &mut T,
        class: &ClassSpec<T>,
        option: &OptionSpec<T>,
        defaults: Option<&T>,
    ) -> Result<()> {
        let name = OptionName::qualify(class.prefix(), option.option_name());
        let regexp = check_declaration(&name, option)?;

        let default = match defaults {
            Some(defaults) => option.read(defaults),
            None => option.read(target),
        };
        let found = self.lookup(class, option, &name);

        if found.is_some() && !option.is_secure() && self.config.registry().is_secure_mode() {
            return Err(ConfigError::invalid(format!(
                "Configuration option {name} was specified, but is not allowed in secure mode."
            )));
        }

        let value = match found {
            Some(found) => self.convert(&name, option, regexp.as_ref(), found)?,
            None if option.is_required() => {
                return Err(ConfigError::invalid(format!(
                    "Required configuration option {name} is missing."
                )));
            }
            // setter methods without a value are not called
            None => match &default {
                Some(default) => self.convert_default(&name, option, default.clone())?,
                None => return Ok(()),
            },
        };

        let current = match defaults {
            Some(_) => option.read(target),
            None => default,
        };
        if current.as_ref() == Some(&value) {
            tracing::trace!("Option {} keeps its value {}", name, value);
            return Ok(());
        }

        tracing::trace!("Setting option {} to {}", name, value);
        let shown = value.to_string();
        option.write(target, value).map_err(|error| match error {
            SetterError::Invalid(message) => ConfigError::invalid(format!(
                "Invalid value '{shown}' for option {name}: {message}"
            )),
            SetterError::Failed(source) => ConfigError::SetterFailed {
                option: name.clone(),
                source,
            },
        })
    }

    /// Finds the value under the current name and the deprecated names and
    /// reconciles them.
    fn lookup<T>(
        &self,
        class: &ClassSpec<T>,
        option: &OptionSpec<T>,
        name: &str,
    ) -> Option<FoundValue> {
        let current = self.config.lookup(name);
        // all deprecated forms are looked up, which marks each of them used
        let mut deprecated: Vec<(String, FoundValue)> = match class.get_deprecated_prefix() {
            Some(prefix) => option
                .deprecated_option_name()
                .into_iter()
                .chain(std::iter::once(option.option_name()))
                .map(|local| OptionName::qualify(prefix, local))
                .filter(|candidate| candidate != name)
                .filter_map(|candidate| self.config.lookup(&candidate).map(|f| (candidate, f)))
                .collect(),
            None => Vec::new(),
        };

        let usage = self.config.usage();
        for (deprecated_name, _) in &deprecated {
            usage.mark_deprecated(deprecated_name.clone());
        }

        let result = match current {
            Some(current) => Some(current),
            None if deprecated.is_empty() => None,
            None => {
                let (deprecated_name, found) = deprecated.remove(0);
                tracing::warn!(
                    "Using deprecated name {} for option {}, please use the new name instead",
                    deprecated_name,
                    name
                );
                Some(found)
            }
        };
        if let Some(chosen) = &result {
            for (deprecated_name, found) in &deprecated {
                if found.value != chosen.value {
                    tracing::warn!(
                        "Option {} is set to '{}', ignoring the value '{}' of its deprecated name {}",
                        name,
                        chosen.value,
                        found.value,
                        deprecated_name
                    );
                }
            }
        }

        if option.is_deprecated() && result.is_some() {
            tracing::warn!("Option {} is deprecated", name);
            usage.mark_deprecated(name);
        }
        result
    }

    fn convert<T>(
        &self,
        name: &str,
        option: &OptionSpec<T>,
        regexp: Option<&Regex>,
        found: FoundValue,
    ) -> Result<OptionValue> {
        let FoundValue { value: raw, source } = found;

        let allowed = option.allowed_values();
        if !allowed.is_empty() && !allowed.contains(&raw) {
            return Err(ConfigError::invalid(format!(
                "Invalid value '{raw}' for option {name}: value is not one of the allowed values [{}]",
                allowed.join(", ")
            )));
        }
        if let Some(regexp) = regexp {
            if !regexp.is_match(&raw) {
                return Err(ConfigError::invalid(format!(
                    "Invalid value '{raw}' for option {name}: value does not match the pattern {}",
                    option.get_regexp().unwrap_or_default()
                )));
            }
        }

        let option_type = option.option_type();
        let element = option_type.element();
        let raw = if option.uppercases() || element.is_enum() {
            raw.to_uppercase()
        } else {
            raw
        };

        if self.config.exports_used_options() {
            tracing::info!("Option {} = {}", name, raw);
        }

        let secondary = option.secondary_options().first();
        let converter = self.config.converter_for(secondary, element);
        let ctx = ConversionContext::new(name)
            .with_secondary(secondary)
            .with_source(source.as_ref());

        let Some(kind) = option_type.collection_kind() else {
            return converter.convert(&ctx, &raw, element);
        };
        let mut items: Vec<OptionValue> = Vec::new();
        for part in raw.split(',').map(str::trim).filter(|part| !part.is_empty()) {
            let item = converter.convert(&ctx, part, element)?;
            if kind.deduplicates() && items.contains(&item) {
                continue;
            }
            items.push(item);
        }
        Ok(OptionValue::Collection(items))
    }

    fn convert_default<T>(
        &self,
        name: &str,
        option: &OptionSpec<T>,
        default: OptionValue,
    ) -> Result<OptionValue> {
        let secondary = option.secondary_options().first();
        let converter = self
            .config
            .converter_for(secondary, option.option_type().element());
        let ctx = ConversionContext::new(name).with_secondary(secondary);
        converter.convert_default(&ctx, default, option.option_type())
    }
}

/// Rejects declarations the engine cannot handle and compiles the value
/// restriction, anchored to the whole value.
fn check_declaration<T>(name: &str, option: &OptionSpec<T>) -> Result<Option<Regex>> {
    if !OptionName::is_valid(name) {
        return Err(ConfigError::unsupported(
            name,
            "the name does not follow the option-name grammar",
        ));
    }

    let option_type = option.option_type();
    let element = option_type.element();
    if matches!(element, OptionType::Collection { .. }) {
        return Err(ConfigError::unsupported(
            name,
            "collections of collections are not supported",
        ));
    }

    match option.secondary_options() {
        [] => {
            if matches!(element.key(), TypeKey::Path | TypeKey::PathTemplate) {
                return Err(ConfigError::unsupported(
                    name,
                    "path options need a FileOption annotation",
                ));
            }
        }
        [secondary] => {
            let kind = secondary.kind();
            if !kind.applicable_types().contains(&element.key()) {
                return Err(ConfigError::unsupported(
                    name,
                    format!("{kind} cannot be used with options of type {:?}", element.key()),
                ));
            }
            if let SecondaryOption::File(file) = secondary {
                if file.kind.is_output()
                    && !option.is_nullable()
                    && option_type.collection_kind().is_none()
                {
                    return Err(ConfigError::unsupported(
                        name,
                        "output file options must be nullable so that output can be disabled",
                    ));
                }
            }
        }
        more => {
            return Err(ConfigError::unsupported(
                name,
                format!("at most one secondary option is allowed, found {}", more.len()),
            ));
        }
    }

    option
        .get_regexp()
        .map(|pattern| {
            Regex::new(&format!("^(?:{pattern})$")).map_err(|e| {
                ConfigError::unsupported(name, format!("invalid regular expression: {e}"))
            })
        })
        .transpose()
}
