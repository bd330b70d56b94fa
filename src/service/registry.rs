// SPDX-License-Identifier: MIT OR Apache-2.0

//! The converter registry.
//!
//! A [`ConverterRegistry`] holds the converters used by every configuration
//! built against it, the catalog of classes that class options may name, and
//! the secure-mode switch. Configurations share the registry through an `Arc`;
//! [`ConverterRegistry::global`] is the registry used unless another one is
//! given to the builder.

use crate::adapters::converters::{
    BaseTypeConverter, ClassTypeConverter, IntegerTypeConverter, TimeSpanTypeConverter,
};
use crate::domain::{ClassCatalog, RegisteredClass, SecondaryKind, TypeKey};
use crate::ports::{ConverterKey, TypeConverter};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

static GLOBAL_REGISTRY: Lazy<Arc<ConverterRegistry>> =
    Lazy::new(|| Arc::new(ConverterRegistry::new()));

/// Converters, classes and the secure-mode flag shared by configurations.
///
/// # Examples
///
/// ```rust
/// use optcfg::service::ConverterRegistry;
/// use optcfg::ports::ConverterKey;
/// use optcfg::domain::SecondaryKind;
///
/// let registry = ConverterRegistry::new();
/// assert!(registry.get(ConverterKey::Secondary(SecondaryKind::Integer)).is_some());
/// assert!(!registry.is_secure_mode());
/// registry.enable_secure_mode();
/// assert!(registry.is_secure_mode());
/// ```
#[derive(Debug)]
pub struct ConverterRegistry {
    converters: RwLock<HashMap<ConverterKey, Arc<dyn TypeConverter>>>,
    base: Arc<dyn TypeConverter>,
    catalog: Arc<ClassCatalog>,
    secure_mode: AtomicBool,
}

impl ConverterRegistry {
    /// Creates a registry with the built-in converters and an empty class catalog.
    pub fn new() -> Self {
        let catalog = Arc::new(ClassCatalog::new());
        let class_converter: Arc<dyn TypeConverter> =
            Arc::new(ClassTypeConverter::new(Arc::clone(&catalog)));

        let mut converters: HashMap<ConverterKey, Arc<dyn TypeConverter>> = HashMap::new();
        converters.insert(
            ConverterKey::Secondary(SecondaryKind::Integer),
            Arc::new(IntegerTypeConverter),
        );
        converters.insert(
            ConverterKey::Secondary(SecondaryKind::TimeSpan),
            Arc::new(TimeSpanTypeConverter),
        );
        converters.insert(
            ConverterKey::Secondary(SecondaryKind::Class),
            Arc::clone(&class_converter),
        );
        converters.insert(ConverterKey::Type(TypeKey::Class), Arc::clone(&class_converter));
        converters.insert(ConverterKey::Type(TypeKey::Factory), class_converter);

        ConverterRegistry {
            converters: RwLock::new(converters),
            base: Arc::new(BaseTypeConverter),
            catalog,
            secure_mode: AtomicBool::new(false),
        }
    }

    /// The process-wide default registry.
    pub fn global() -> Arc<ConverterRegistry> {
        Arc::clone(&GLOBAL_REGISTRY)
    }

    /// Registers a converter, replacing any converter for the same key.
    pub fn register(&self, key: ConverterKey, converter: Arc<dyn TypeConverter>) {
        let mut converters = self
            .converters
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        tracing::debug!("Registering converter for {}", key);
        converters.insert(key, converter);
    }

    /// The converter registered for `key`.
    pub fn get(&self, key: ConverterKey) -> Option<Arc<dyn TypeConverter>> {
        let converters = self
            .converters
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        converters.get(&key).cloned()
    }

    /// The converter for plain value types.
    pub fn base_converter(&self) -> Arc<dyn TypeConverter> {
        Arc::clone(&self.base)
    }

    /// The catalog class options are resolved in.
    pub fn catalog(&self) -> &Arc<ClassCatalog> {
        &self.catalog
    }

    /// Adds a class to the catalog.
    pub fn register_class(&self, class: RegisteredClass) {
        self.catalog.register(class);
    }

    /// Switches secure mode on. It cannot be switched off again.
    pub fn enable_secure_mode(&self) {
        if !self.secure_mode.swap(true, Ordering::SeqCst) {
            tracing::info!("Secure mode enabled");
        }
    }

    /// True once secure mode was enabled.
    pub fn is_secure_mode(&self) -> bool {
        self.secure_mode.load(Ordering::SeqCst)
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OptionType, OptionValue, Result};
    use crate::ports::ConversionContext;

    #[derive(Debug)]
    struct Constant;

    impl TypeConverter for Constant {
        fn convert(
            &self,
            _ctx: &ConversionContext<'_>,
            _value: &str,
            _target: &OptionType,
        ) -> Result<OptionValue> {
            Ok(OptionValue::Int(42))
        }
    }

    #[test]
    fn test_defaults() {
        let registry = ConverterRegistry::new();
        for key in [
            ConverterKey::Secondary(SecondaryKind::Integer),
            ConverterKey::Secondary(SecondaryKind::TimeSpan),
            ConverterKey::Secondary(SecondaryKind::Class),
            ConverterKey::Type(TypeKey::Class),
            ConverterKey::Type(TypeKey::Factory),
        ] {
            assert!(registry.get(key).is_some(), "missing {key}");
        }
        assert!(registry.get(ConverterKey::Type(TypeKey::Int)).is_none());
        assert!(registry.catalog().is_empty());
    }

    #[test]
    fn test_register_replaces() {
        let registry = ConverterRegistry::new();
        registry.register(ConverterKey::Type(TypeKey::Int), Arc::new(Constant));
        let converter = registry.get(ConverterKey::Type(TypeKey::Int)).unwrap();
        let value = converter
            .convert(&ConversionContext::new("x"), "1", &OptionType::Int)
            .unwrap();
        assert_eq!(value, OptionValue::Int(42));
    }

    #[test]
    fn test_secure_mode_is_sticky() {
        let registry = ConverterRegistry::new();
        registry.enable_secure_mode();
        registry.enable_secure_mode();
        assert!(registry.is_secure_mode());
    }

    #[test]
    fn test_catalog_is_shared_with_class_converter() {
        let registry = ConverterRegistry::new();
        registry.register_class(RegisteredClass::new("x.Impl"));
        let converter = registry.get(ConverterKey::Type(TypeKey::Class)).unwrap();
        let value = converter
            .convert(
                &ConversionContext::new("impl"),
                "x.Impl",
                &OptionType::Class { bound: None },
            )
            .unwrap();
        assert_eq!(value.to_string(), "x.Impl");
    }

    #[test]
    fn test_global_is_shared() {
        assert!(Arc::ptr_eq(&ConverterRegistry::global(), &ConverterRegistry::global()));
    }
}
