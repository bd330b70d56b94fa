// SPDX-License-Identifier: MIT OR Apache-2.0

//! Converter for class and factory options.

use super::{invalid_value, unsupported_target};
use crate::domain::{ClassCatalog, ClassRef, OptionType, OptionValue, Result, SecondaryOption};
use crate::ports::{ConversionContext, TypeConverter};
use std::sync::Arc;

/// Looks up class names in a [`ClassCatalog`].
///
/// The name is tried as given first, then with each package prefix of the
/// option's class annotation in front of it.
///
/// # Examples
///
/// ```rust
/// use optcfg::adapters::converters::ClassTypeConverter;
/// use optcfg::domain::{ClassCatalog, ClassOption, OptionType, RegisteredClass, SecondaryOption};
/// use optcfg::ports::{ConversionContext, TypeConverter};
/// use std::sync::Arc;
///
/// let catalog = Arc::new(ClassCatalog::new());
/// catalog.register(RegisteredClass::new("solver.strategy.Greedy").implements("solver.Strategy"));
///
/// let annotation = SecondaryOption::from(ClassOption::with_prefixes(["solver.strategy"]));
/// let ctx = ConversionContext::new("solver.strategy").with_secondary(Some(&annotation));
/// let target = OptionType::Class { bound: Some("solver.Strategy".into()) };
/// let value = ClassTypeConverter::new(catalog).convert(&ctx, "Greedy", &target).unwrap();
/// assert_eq!(value.to_string(), "solver.strategy.Greedy");
/// ```
#[derive(Debug, Clone)]
pub struct ClassTypeConverter {
    catalog: Arc<ClassCatalog>,
}

impl ClassTypeConverter {
    /// Creates a converter resolving names in `catalog`.
    pub fn new(catalog: Arc<ClassCatalog>) -> Self {
        ClassTypeConverter { catalog }
    }

    fn lookup(&self, name: &str, prefixes: &[String]) -> Option<ClassRef> {
        std::iter::once(name.to_string())
            .chain(prefixes.iter().map(|prefix| format!("{prefix}.{name}")))
            .find_map(|candidate| self.catalog.lookup(&candidate))
    }
}

impl TypeConverter for ClassTypeConverter {
    fn convert(
        &self,
        ctx: &ConversionContext<'_>,
        value: &str,
        target: &OptionType,
    ) -> Result<OptionValue> {
        let prefixes: &[String] = match ctx.secondary {
            Some(SecondaryOption::Class(annotation)) => annotation.package_prefixes.as_slice(),
            _ => &[],
        };

        let class = self
            .lookup(value, prefixes)
            .ok_or_else(|| invalid_value(ctx, value, "class not found"))?;

        match target {
            OptionType::Class { bound } => {
                if let Some(bound) = bound {
                    if !class.is_subtype_of(bound) {
                        return Err(invalid_value(
                            ctx,
                            value,
                            format!("class {} is not a subtype of {bound}", class.name()),
                        ));
                    }
                }
                Ok(OptionValue::Class(class))
            }
            OptionType::Factory {
                interface,
                interface_name,
            } => {
                if class.has_factory(*interface) {
                    Ok(OptionValue::Class(class))
                } else {
                    Err(invalid_value(
                        ctx,
                        value,
                        format!(
                            "class {} provides no factory of type {interface_name}",
                            class.name()
                        ),
                    ))
                }
            }
            other => Err(unsupported_target(ctx, "ClassTypeConverter", other)),
        }
    }
}
