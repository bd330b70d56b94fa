// SPDX-License-Identifier: MIT OR Apache-2.0

//! Option declarations.
//!
//! A type that receives options implements [`Configurable`] and returns a
//! [`ClassSpec`] listing its options. Each [`OptionSpec`] names an option, carries
//! its metadata (secure, required, allowed values, ...) and holds the closures
//! used to read the current default and to write the converted value.
//!
//! # Examples
//!
//! ```
//! use optcfg::domain::option_spec::{ClassSpec, Configurable, IntegerOption, OptionSpec};
//!
//! struct Solver {
//!     threads: i32,
//!     name: String,
//! }
//!
//! impl Configurable for Solver {
//!     fn options() -> ClassSpec<Self> {
//!         ClassSpec::new("solver")
//!             .option(
//!                 OptionSpec::field("threads", |s: &Solver| &s.threads, |s, v| s.threads = v)
//!                     .description("number of worker threads")
//!                     .secondary(IntegerOption::range(1, 64)),
//!             )
//!             .option(OptionSpec::field("name", |s: &Solver| &s.name, |s, v| s.name = v).secure())
//!     }
//! }
//!
//! let spec = Solver::options();
//! assert_eq!(spec.options().len(), 2);
//! assert!(spec.options()[1].is_secure());
//! ```

use crate::domain::option_value::{OptionKind, OptionType, OptionValue, TypeKey};
use crate::domain::time_span::TimeUnit;
use std::fmt;
use thiserror::Error;

/// Error returned by an option setter.
#[derive(Debug, Error)]
pub enum SetterError {
    /// The value is not acceptable; reported as a configuration error.
    #[error("{0}")]
    Invalid(String),
    /// The setter failed for another reason.
    #[error(transparent)]
    Failed(Box<dyn std::error::Error + Send + Sync>),
}

/// What a file option refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// A file written by the program, placed in the output directory.
    OutputFile,
    /// A directory written by the program, placed in the output directory.
    OutputDirectory,
    /// A file that must exist and be readable.
    RequiredInputFile,
    /// A file that may or may not exist.
    OptionalInputFile,
}

impl FileKind {
    /// True for the kinds resolved under the output directory.
    pub fn is_output(self) -> bool {
        matches!(self, FileKind::OutputFile | FileKind::OutputDirectory)
    }
}

/// Range restriction for integer options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntegerOption {
    /// Smallest accepted value
    pub min: i64,
    /// Largest accepted value
    pub max: i64,
}

impl IntegerOption {
    /// Accepts values in `min..=max`.
    pub fn range(min: i64, max: i64) -> Self {
        IntegerOption { min, max }
    }

    /// Accepts values of at least `min`.
    pub fn min(min: i64) -> Self {
        IntegerOption { min, max: i64::MAX }
    }

    /// Accepts values of at most `max`.
    pub fn max(max: i64) -> Self {
        IntegerOption { min: i64::MIN, max }
    }
}

impl Default for IntegerOption {
    fn default() -> Self {
        IntegerOption::range(i64::MIN, i64::MAX)
    }
}

/// Time-span annotation: values carry a unit suffix and are stored in `code_unit`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeSpanOption {
    /// Unit of the value stored in integer fields
    pub code_unit: TimeUnit,
    /// Unit assumed when the user gives no suffix
    pub default_user_unit: TimeUnit,
    /// Smallest accepted value, in `code_unit`
    pub min: i64,
    /// Largest accepted value, in `code_unit`
    pub max: i64,
}

impl TimeSpanOption {
    /// Creates an unrestricted annotation.
    pub fn new(code_unit: TimeUnit, default_user_unit: TimeUnit) -> Self {
        TimeSpanOption {
            code_unit,
            default_user_unit,
            min: i64::MIN,
            max: i64::MAX,
        }
    }

    /// Restricts the value, given in `code_unit`, to `min..=max`.
    pub fn range(mut self, min: i64, max: i64) -> Self {
        self.min = min;
        self.max = max;
        self
    }
}

/// File annotation, required on every path and path-template option.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileOption {
    /// What the path refers to
    pub kind: FileKind,
}

impl FileOption {
    /// Creates the annotation.
    pub fn new(kind: FileKind) -> Self {
        FileOption { kind }
    }
}

/// Class annotation: package prefixes tried in front of unqualified class names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassOption {
    /// Prefixes tried in order
    pub package_prefixes: Vec<String>,
}

impl ClassOption {
    /// Creates the annotation with the given prefixes.
    pub fn with_prefixes<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ClassOption {
            package_prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }
}

/// Discriminant of a [`SecondaryOption`], used to select converters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SecondaryKind {
    /// [`IntegerOption`]
    Integer,
    /// [`TimeSpanOption`]
    TimeSpan,
    /// [`FileOption`]
    File,
    /// [`ClassOption`]
    Class,
}

impl SecondaryKind {
    /// The (element) types the annotation may be attached to.
    pub fn applicable_types(self) -> &'static [TypeKey] {
        match self {
            SecondaryKind::Integer => &[TypeKey::Int, TypeKey::Long],
            SecondaryKind::TimeSpan => &[TypeKey::Int, TypeKey::Long, TypeKey::TimeSpan],
            SecondaryKind::File => &[TypeKey::Path, TypeKey::PathTemplate],
            SecondaryKind::Class => &[TypeKey::Class, TypeKey::Factory],
        }
    }
}

impl fmt::Display for SecondaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SecondaryKind::Integer => "IntegerOption",
            SecondaryKind::TimeSpan => "TimeSpanOption",
            SecondaryKind::File => "FileOption",
            SecondaryKind::Class => "ClassOption",
        };
        f.write_str(name)
    }
}

/// An annotation refining how an option value is converted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SecondaryOption {
    /// Integer range
    Integer(IntegerOption),
    /// Time span with units
    TimeSpan(TimeSpanOption),
    /// File path handling
    File(FileOption),
    /// Class lookup
    Class(ClassOption),
}

impl SecondaryOption {
    /// The discriminant.
    pub fn kind(&self) -> SecondaryKind {
        match self {
            SecondaryOption::Integer(_) => SecondaryKind::Integer,
            SecondaryOption::TimeSpan(_) => SecondaryKind::TimeSpan,
            SecondaryOption::File(_) => SecondaryKind::File,
            SecondaryOption::Class(_) => SecondaryKind::Class,
        }
    }
}

impl From<IntegerOption> for SecondaryOption {
    fn from(option: IntegerOption) -> Self {
        SecondaryOption::Integer(option)
    }
}

impl From<TimeSpanOption> for SecondaryOption {
    fn from(option: TimeSpanOption) -> Self {
        SecondaryOption::TimeSpan(option)
    }
}

impl From<FileOption> for SecondaryOption {
    fn from(option: FileOption) -> Self {
        SecondaryOption::File(option)
    }
}

impl From<ClassOption> for SecondaryOption {
    fn from(option: ClassOption) -> Self {
        SecondaryOption::Class(option)
    }
}

type Getter<T> = Box<dyn Fn(&T) -> OptionValue>;
type Setter<T> = Box<dyn Fn(&mut T, OptionValue) -> Result<(), SetterError>>;

/// The declaration of one option of `T`.
pub struct OptionSpec<T> {
    member: String,
    name: Option<String>,
    deprecated_name: Option<String>,
    description: String,
    secure: bool,
    required: bool,
    to_uppercase: bool,
    deprecated: bool,
    regexp: Option<String>,
    values: Vec<String>,
    option_type: OptionType,
    nullable: bool,
    secondary: Vec<SecondaryOption>,
    getter: Option<Getter<T>>,
    setter: Setter<T>,
}

fn type_mismatch(value: &OptionValue, target: &str) -> SetterError {
    SetterError::Failed(format!("converted value '{value}' does not fit type {target}").into())
}

impl<T> OptionSpec<T> {
    /// Declares a field option.
    ///
    /// `get` exposes the current value, which is the default when no value is
    /// configured; `set` stores the converted value.
    pub fn field<V: OptionKind>(
        member: impl Into<String>,
        get: impl Fn(&T) -> &V + 'static,
        set: impl Fn(&mut T, V) + 'static,
    ) -> Self {
        let getter: Getter<T> = Box::new(move |target| get(target).to_value());
        let setter: Setter<T> = Box::new(move |target, value| {
            let typed = V::from_value(value.clone())
                .ok_or_else(|| type_mismatch(&value, std::any::type_name::<V>()))?;
            set(target, typed);
            Ok(())
        });
        Self::with_accessors::<V>(member.into(), Some(getter), setter)
    }

    /// Declares a setter-method option.
    ///
    /// Methods have no default: when no value is configured they are not called.
    pub fn method<V: OptionKind>(
        member: impl Into<String>,
        set: impl Fn(&mut T, V) -> Result<(), SetterError> + 'static,
    ) -> Self {
        let setter: Setter<T> = Box::new(move |target, value| {
            let typed = V::from_value(value.clone())
                .ok_or_else(|| type_mismatch(&value, std::any::type_name::<V>()))?;
            set(target, typed)
        });
        Self::with_accessors::<V>(member.into(), None, setter)
    }

    fn with_accessors<V: OptionKind>(
        member: String,
        getter: Option<Getter<T>>,
        setter: Setter<T>,
    ) -> Self {
        OptionSpec {
            member,
            name: None,
            deprecated_name: None,
            description: String::new(),
            secure: false,
            required: false,
            to_uppercase: false,
            deprecated: false,
            regexp: None,
            values: Vec::new(),
            option_type: V::option_type(),
            nullable: V::nullable(),
            secondary: Vec::new(),
            getter,
            setter,
        }
    }

    /// Uses `name` instead of the member name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Also accepts the option under `name` below the deprecated prefix.
    pub fn deprecated_name(mut self, name: impl Into<String>) -> Self {
        self.deprecated_name = Some(name.into());
        self
    }

    /// Sets the documentation text.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Allows the option in secure mode.
    pub fn secure(mut self) -> Self {
        self.secure = true;
        self
    }

    /// Makes a missing value an error.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Uppercases the value before it is checked and converted.
    pub fn to_uppercase(mut self) -> Self {
        self.to_uppercase = true;
        self
    }

    /// Restricts the raw value to a full match of `regexp`.
    pub fn regexp(mut self, regexp: impl Into<String>) -> Self {
        self.regexp = Some(regexp.into());
        self
    }

    /// Restricts the raw value to one of `values`.
    pub fn values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Marks the option itself as deprecated.
    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    /// Adds a secondary annotation.
    pub fn secondary(mut self, option: impl Into<SecondaryOption>) -> Self {
        self.secondary.push(option.into());
        self
    }

    /// Requires named classes to be subtypes of `bound`; only meaningful for class options.
    pub fn subtype_of(mut self, bound: impl Into<String>) -> Self {
        let bound = bound.into();
        match &mut self.option_type {
            OptionType::Class { bound: b } => *b = Some(bound),
            OptionType::Collection { element, .. } => {
                if let OptionType::Class { bound: b } = element.as_mut() {
                    *b = Some(bound);
                }
            }
            _ => {}
        }
        self
    }

    /// The member (field or method) name.
    pub fn member(&self) -> &str {
        &self.member
    }

    /// The option name: the explicit name, or the member name.
    pub fn option_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.member)
    }

    /// The deprecated name, if any.
    pub fn deprecated_option_name(&self) -> Option<&str> {
        self.deprecated_name.as_deref()
    }

    /// The documentation text.
    pub fn get_description(&self) -> &str {
        &self.description
    }

    /// True if the option may be set in secure mode.
    pub fn is_secure(&self) -> bool {
        self.secure
    }

    /// True if the option must be set.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// True if the value is uppercased before conversion.
    pub fn uppercases(&self) -> bool {
        self.to_uppercase
    }

    /// True if the option itself is deprecated.
    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    /// The full-match restriction, if any.
    pub fn get_regexp(&self) -> Option<&str> {
        self.regexp.as_deref()
    }

    /// The whitelist; empty means unrestricted.
    pub fn allowed_values(&self) -> &[String] {
        &self.values
    }

    /// The declared type.
    pub fn option_type(&self) -> &OptionType {
        &self.option_type
    }

    /// True if the option may hold no value.
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// The secondary annotations.
    pub fn secondary_options(&self) -> &[SecondaryOption] {
        &self.secondary
    }

    /// True for setter-method options.
    pub fn is_method(&self) -> bool {
        self.getter.is_none()
    }

    pub(crate) fn read(&self, target: &T) -> Option<OptionValue> {
        self.getter.as_ref().map(|get| get(target))
    }

    pub(crate) fn write(&self, target: &mut T, value: OptionValue) -> Result<(), SetterError> {
        (self.setter)(target, value)
    }
}

impl<T> fmt::Debug for OptionSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionSpec")
            .field("member", &self.member)
            .field("name", &self.name)
            .field("type", &self.option_type)
            .field("secure", &self.secure)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

/// The option declarations of a type, with their common prefix.
pub struct ClassSpec<T> {
    prefix: String,
    deprecated_prefix: Option<String>,
    description: String,
    options: Vec<OptionSpec<T>>,
}

impl<T> ClassSpec<T> {
    /// Creates a declaration with the given prefix; `""` means no prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        ClassSpec {
            prefix: prefix.into(),
            deprecated_prefix: None,
            description: String::new(),
            options: Vec::new(),
        }
    }

    /// Also accepts every option below `prefix`, with a warning.
    pub fn deprecated_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.deprecated_prefix = Some(prefix.into());
        self
    }

    /// Sets the documentation text.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Appends an option.
    pub fn option(mut self, option: OptionSpec<T>) -> Self {
        self.options.push(option);
        self
    }

    /// The prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The deprecated prefix; `None` disables deprecated lookups.
    pub fn get_deprecated_prefix(&self) -> Option<&str> {
        self.deprecated_prefix.as_deref()
    }

    /// The documentation text.
    pub fn get_description(&self) -> &str {
        &self.description
    }

    /// The options in declaration order.
    pub fn options(&self) -> &[OptionSpec<T>] {
        &self.options
    }
}

impl<T> fmt::Debug for ClassSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassSpec")
            .field("prefix", &self.prefix)
            .field("deprecated_prefix", &self.deprecated_prefix)
            .field("options", &self.options)
            .finish()
    }
}

/// A type whose options can be injected from a configuration.
pub trait Configurable: Sized {
    /// The option declarations of this type.
    fn options() -> ClassSpec<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[derive(Default)]
    struct Target {
        level: i64,
        out: Option<PathBuf>,
        seen: Vec<String>,
    }

    #[test]
    fn test_field_reads_and_writes() {
        let spec = OptionSpec::field("level", |t: &Target| &t.level, |t, v| t.level = v);
        let mut target = Target {
            level: 3,
            ..Target::default()
        };
        assert_eq!(spec.read(&target), Some(OptionValue::Long(3)));
        spec.write(&mut target, OptionValue::Long(9)).unwrap();
        assert_eq!(target.level, 9);
        assert!(!spec.is_method());
        assert!(!spec.is_nullable());
    }

    #[test]
    fn test_wrong_value_shape_fails() {
        let spec = OptionSpec::field("level", |t: &Target| &t.level, |t, v| t.level = v);
        let mut target = Target::default();
        let error = spec.write(&mut target, OptionValue::Str("x".into())).unwrap_err();
        assert!(matches!(error, SetterError::Failed(_)));
    }

    #[test]
    fn test_method_has_no_getter() {
        let spec = OptionSpec::method("seen", |t: &mut Target, v: String| {
            if v.is_empty() {
                return Err(SetterError::Invalid("empty".into()));
            }
            t.seen.push(v);
            Ok(())
        });
        let mut target = Target::default();
        assert!(spec.is_method());
        assert_eq!(spec.read(&target), None);
        spec.write(&mut target, OptionValue::Str("a".into())).unwrap();
        assert!(matches!(
            spec.write(&mut target, OptionValue::Str(String::new())),
            Err(SetterError::Invalid(_))
        ));
        assert_eq!(target.seen, vec!["a"]);
    }

    #[test]
    fn test_nullable_and_names() {
        let spec = OptionSpec::field("out", |t: &Target| &t.out, |t, v| t.out = v)
            .name("output.file")
            .deprecated_name("outFile")
            .secondary(FileOption::new(FileKind::OutputFile));
        assert!(spec.is_nullable());
        assert_eq!(spec.option_name(), "output.file");
        assert_eq!(spec.member(), "out");
        assert_eq!(spec.deprecated_option_name(), Some("outFile"));
        assert_eq!(spec.secondary_options()[0].kind(), SecondaryKind::File);
    }

    #[test]
    fn test_subtype_of_sets_bound() {
        use crate::domain::class_catalog::ClassRef;

        struct Holder {
            classes: Vec<ClassRef>,
        }
        let spec = OptionSpec::field("classes", |h: &Holder| &h.classes, |h, v| h.classes = v)
            .subtype_of("x.Iface");
        assert_eq!(
            spec.option_type().element(),
            &OptionType::Class {
                bound: Some("x.Iface".into())
            }
        );
    }

    #[test]
    fn test_secondary_applicability() {
        assert!(SecondaryKind::TimeSpan.applicable_types().contains(&TypeKey::TimeSpan));
        assert!(!SecondaryKind::Integer.applicable_types().contains(&TypeKey::Double));
        assert_eq!(SecondaryKind::File.to_string(), "FileOption");
    }

    #[test]
    fn test_class_spec_defaults() {
        let spec: ClassSpec<Target> = ClassSpec::new("analysis");
        assert_eq!(spec.prefix(), "analysis");
        assert_eq!(spec.get_deprecated_prefix(), None);
        let spec = spec.deprecated_prefix("");
        assert_eq!(spec.get_deprecated_prefix(), Some(""));
    }
}
