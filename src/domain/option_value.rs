// SPDX-License-Identifier: MIT OR Apache-2.0

//! Declared option types, dynamic option values and the typed bridge between them.
//!
//! Converters work on [`OptionValue`], a dynamic value shaped by the declared
//! [`OptionType`]. The [`OptionKind`] trait connects both to concrete Rust types,
//! so that a `u32` field, for instance, never has to look at an `OptionValue`.

use crate::domain::charset::Charset;
use crate::domain::class_catalog::{ClassRef, Factory};
use crate::domain::path_template::PathTemplate;
use crate::domain::rational::Rational;
use crate::domain::time_span::TimeSpan;
use regex::Regex;
use std::any::TypeId;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::hash::Hash;
use std::path::PathBuf;
use tracing::Level;

/// The kind of container an option is declared as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    /// A fixed-size boxed slice.
    Array,
    /// An ordered list keeping duplicates.
    List,
    /// A set keeping the first occurrence of each element.
    Set,
    /// A set ordered by its elements.
    SortedSet,
    /// A set of enum constants, ordered by declaration.
    EnumSet,
    /// A bag counting occurrences.
    Multiset,
}

impl CollectionKind {
    /// True if the container drops repeated elements.
    pub fn deduplicates(self) -> bool {
        matches!(
            self,
            CollectionKind::Set | CollectionKind::SortedSet | CollectionKind::EnumSet
        )
    }
}

/// The coarse type of an option, used to select converters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeKey {
    /// `bool`
    Bool,
    /// `i32`
    Int,
    /// `i64`
    Long,
    /// `f64`
    Double,
    /// `String`
    Str,
    /// Any enum declared through [`impl_option_enum!`](crate::impl_option_enum)
    Enum,
    /// [`Charset`]
    Charset,
    /// [`tracing::Level`]
    Level,
    /// [`regex::Regex`]
    Pattern,
    /// [`Rational`]
    Rational,
    /// [`TimeSpan`]
    TimeSpan,
    /// [`PathBuf`]
    Path,
    /// [`PathTemplate`]
    PathTemplate,
    /// [`ClassRef`]
    Class,
    /// [`Factory`]
    Factory,
    /// Any container
    Collection,
}

/// The declared type of an option.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OptionType {
    /// `bool`
    Bool,
    /// `i32`
    Int,
    /// `i64`
    Long,
    /// `f64`
    Double,
    /// `String`
    Str,
    /// An enum with the given constant names.
    Enum {
        /// Type name, for messages
        name: &'static str,
        /// Declared constant names
        variants: &'static [&'static str],
    },
    /// [`Charset`]
    Charset,
    /// [`tracing::Level`]
    Level,
    /// [`regex::Regex`]
    Pattern,
    /// [`Rational`]
    Rational,
    /// [`TimeSpan`]
    TimeSpan,
    /// [`PathBuf`]
    Path,
    /// [`PathTemplate`]
    PathTemplate,
    /// A registered class, optionally required to implement `bound`.
    Class {
        /// Required supertype
        bound: Option<String>,
    },
    /// A factory of the given interface type, looked up on a registered class.
    Factory {
        /// Type id of the factory interface
        interface: TypeId,
        /// Type name of the factory interface, for messages
        interface_name: &'static str,
    },
    /// A container of `element`s.
    Collection {
        /// The container kind
        kind: CollectionKind,
        /// The element type
        element: Box<OptionType>,
    },
}

impl OptionType {
    /// The converter-selection key of this type.
    pub fn key(&self) -> TypeKey {
        match self {
            OptionType::Bool => TypeKey::Bool,
            OptionType::Int => TypeKey::Int,
            OptionType::Long => TypeKey::Long,
            OptionType::Double => TypeKey::Double,
            OptionType::Str => TypeKey::Str,
            OptionType::Enum { .. } => TypeKey::Enum,
            OptionType::Charset => TypeKey::Charset,
            OptionType::Level => TypeKey::Level,
            OptionType::Pattern => TypeKey::Pattern,
            OptionType::Rational => TypeKey::Rational,
            OptionType::TimeSpan => TypeKey::TimeSpan,
            OptionType::Path => TypeKey::Path,
            OptionType::PathTemplate => TypeKey::PathTemplate,
            OptionType::Class { .. } => TypeKey::Class,
            OptionType::Factory { .. } => TypeKey::Factory,
            OptionType::Collection { .. } => TypeKey::Collection,
        }
    }

    /// The element type of a container, or the type itself.
    pub fn element(&self) -> &OptionType {
        match self {
            OptionType::Collection { element, .. } => element,
            other => other,
        }
    }

    /// The container kind, if this is a container.
    pub fn collection_kind(&self) -> Option<CollectionKind> {
        match self {
            OptionType::Collection { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// True for enum types.
    pub fn is_enum(&self) -> bool {
        matches!(self, OptionType::Enum { .. })
    }
}

/// A converted option value.
#[derive(Clone, Debug)]
pub enum OptionValue {
    /// No value; only nullable options accept it.
    Absent,
    /// A boolean
    Bool(bool),
    /// A 32-bit integer
    Int(i32),
    /// A 64-bit integer
    Long(i64),
    /// A float
    Double(f64),
    /// A string
    Str(String),
    /// The constant name of an enum value
    Enum(String),
    /// A charset
    Charset(Charset),
    /// A log level
    Level(Level),
    /// A compiled regular expression
    Pattern(Regex),
    /// A rational number
    Rational(Rational),
    /// A time span
    TimeSpan(TimeSpan),
    /// A file system path
    Path(PathBuf),
    /// A path template
    PathTemplate(PathTemplate),
    /// A registered class (also used for factory options)
    Class(ClassRef),
    /// The elements of a container, in input order
    Collection(Vec<OptionValue>),
}

impl PartialEq for OptionValue {
    fn eq(&self, other: &Self) -> bool {
        use OptionValue::*;
        match (self, other) {
            (Absent, Absent) => true,
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Long(a), Long(b)) => a == b,
            (Double(a), Double(b)) => a == b,
            (Str(a), Str(b)) | (Enum(a), Enum(b)) => a == b,
            (Charset(a), Charset(b)) => a == b,
            (Level(a), Level(b)) => a == b,
            (Pattern(a), Pattern(b)) => a.as_str() == b.as_str(),
            (Rational(a), Rational(b)) => a == b,
            (TimeSpan(a), TimeSpan(b)) => a == b,
            (Path(a), Path(b)) => a == b,
            (PathTemplate(a), PathTemplate(b)) => a == b,
            (Class(a), Class(b)) => a == b,
            (Collection(a), Collection(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Absent => f.write_str("<none>"),
            OptionValue::Bool(v) => write!(f, "{v}"),
            OptionValue::Int(v) => write!(f, "{v}"),
            OptionValue::Long(v) => write!(f, "{v}"),
            OptionValue::Double(v) => write!(f, "{v}"),
            OptionValue::Str(v) | OptionValue::Enum(v) => f.write_str(v),
            OptionValue::Charset(v) => write!(f, "{v}"),
            OptionValue::Level(v) => write!(f, "{v}"),
            OptionValue::Pattern(v) => f.write_str(v.as_str()),
            OptionValue::Rational(v) => write!(f, "{v}"),
            OptionValue::TimeSpan(v) => write!(f, "{v}"),
            OptionValue::Path(v) => write!(f, "{}", v.display()),
            OptionValue::PathTemplate(v) => write!(f, "{v}"),
            OptionValue::Class(v) => write!(f, "{v}"),
            OptionValue::Collection(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

/// A Rust type that can be the type of an option.
///
/// Implementations exist for the primitive option types, the value types of this
/// crate, `Option<T>` (nullable options) and the supported containers. Enums
/// implement it through [`impl_option_enum!`](crate::impl_option_enum).
pub trait OptionKind: Sized + 'static {
    /// The declared type.
    fn option_type() -> OptionType;

    /// Converts a current value into its dynamic form.
    fn to_value(&self) -> OptionValue;

    /// Converts a dynamic value back; `None` if the value has the wrong shape.
    fn from_value(value: OptionValue) -> Option<Self>;

    /// True if the option may hold "no value".
    fn nullable() -> bool {
        false
    }
}

macro_rules! simple_option_kind {
    ($ty:ty, $option_type:ident, $variant:ident) => {
        impl OptionKind for $ty {
            fn option_type() -> OptionType {
                OptionType::$option_type
            }

            fn to_value(&self) -> OptionValue {
                OptionValue::$variant(self.clone())
            }

            fn from_value(value: OptionValue) -> Option<Self> {
                match value {
                    OptionValue::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

simple_option_kind!(bool, Bool, Bool);
simple_option_kind!(i32, Int, Int);
simple_option_kind!(i64, Long, Long);
simple_option_kind!(f64, Double, Double);
simple_option_kind!(String, Str, Str);
simple_option_kind!(Charset, Charset, Charset);
simple_option_kind!(Level, Level, Level);
simple_option_kind!(Regex, Pattern, Pattern);
simple_option_kind!(Rational, Rational, Rational);
simple_option_kind!(TimeSpan, TimeSpan, TimeSpan);
simple_option_kind!(PathBuf, Path, Path);
simple_option_kind!(PathTemplate, PathTemplate, PathTemplate);

impl OptionKind for ClassRef {
    fn option_type() -> OptionType {
        OptionType::Class { bound: None }
    }

    fn to_value(&self) -> OptionValue {
        OptionValue::Class(self.clone())
    }

    fn from_value(value: OptionValue) -> Option<Self> {
        match value {
            OptionValue::Class(class) => Some(class),
            _ => None,
        }
    }
}

impl<F: ?Sized + Send + Sync + 'static> OptionKind for Factory<F> {
    fn option_type() -> OptionType {
        OptionType::Factory {
            interface: TypeId::of::<F>(),
            interface_name: std::any::type_name::<F>(),
        }
    }

    fn to_value(&self) -> OptionValue {
        OptionValue::Class(self.class().clone())
    }

    fn from_value(value: OptionValue) -> Option<Self> {
        match value {
            OptionValue::Class(class) => Factory::from_class(&class),
            _ => None,
        }
    }
}

impl<T: OptionKind> OptionKind for Option<T> {
    fn option_type() -> OptionType {
        T::option_type()
    }

    fn to_value(&self) -> OptionValue {
        match self {
            Some(v) => v.to_value(),
            None => OptionValue::Absent,
        }
    }

    fn from_value(value: OptionValue) -> Option<Self> {
        match value {
            OptionValue::Absent => Some(None),
            other => T::from_value(other).map(Some),
        }
    }

    fn nullable() -> bool {
        true
    }
}

fn collection_type<T: OptionKind>(kind: CollectionKind) -> OptionType {
    OptionType::Collection {
        kind,
        element: Box::new(T::option_type()),
    }
}

fn collection_items<T: OptionKind>(value: OptionValue) -> Option<Vec<T>> {
    match value {
        OptionValue::Collection(items) => items.into_iter().map(T::from_value).collect(),
        _ => None,
    }
}

fn collection_value<'a, T: OptionKind + 'a>(items: impl Iterator<Item = &'a T>) -> OptionValue {
    OptionValue::Collection(items.map(OptionKind::to_value).collect())
}

impl<T: OptionKind> OptionKind for Vec<T> {
    fn option_type() -> OptionType {
        collection_type::<T>(CollectionKind::List)
    }

    fn to_value(&self) -> OptionValue {
        collection_value(self.iter())
    }

    fn from_value(value: OptionValue) -> Option<Self> {
        collection_items(value)
    }
}

impl<T: OptionKind> OptionKind for Box<[T]> {
    fn option_type() -> OptionType {
        collection_type::<T>(CollectionKind::Array)
    }

    fn to_value(&self) -> OptionValue {
        collection_value(self.iter())
    }

    fn from_value(value: OptionValue) -> Option<Self> {
        collection_items(value).map(Vec::into_boxed_slice)
    }
}

impl<T: OptionKind + Eq + Hash> OptionKind for HashSet<T> {
    fn option_type() -> OptionType {
        collection_type::<T>(CollectionKind::Set)
    }

    fn to_value(&self) -> OptionValue {
        collection_value(self.iter())
    }

    fn from_value(value: OptionValue) -> Option<Self> {
        collection_items(value).map(|items| items.into_iter().collect())
    }
}

impl<T: OptionKind + Ord> OptionKind for BTreeSet<T> {
    fn option_type() -> OptionType {
        let kind = if T::option_type().is_enum() {
            CollectionKind::EnumSet
        } else {
            CollectionKind::SortedSet
        };
        collection_type::<T>(kind)
    }

    fn to_value(&self) -> OptionValue {
        collection_value(self.iter())
    }

    fn from_value(value: OptionValue) -> Option<Self> {
        collection_items(value).map(|items| items.into_iter().collect())
    }
}

/// A bag of elements counting how often each occurs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Multiset<T: Ord> {
    counts: BTreeMap<T, usize>,
}

impl<T: Ord> Multiset<T> {
    /// Creates an empty multiset.
    pub fn new() -> Self {
        Multiset {
            counts: BTreeMap::new(),
        }
    }

    /// Adds one occurrence of `item`.
    pub fn insert(&mut self, item: T) {
        *self.counts.entry(item).or_insert(0) += 1;
    }

    /// How often `item` occurs.
    pub fn count(&self, item: &T) -> usize {
        self.counts.get(item).copied().unwrap_or(0)
    }

    /// Total number of occurrences.
    pub fn len(&self) -> usize {
        self.counts.values().sum()
    }

    /// True if the multiset holds nothing.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Distinct elements with their counts, in element order.
    pub fn iter(&self) -> impl Iterator<Item = (&T, usize)> {
        self.counts.iter().map(|(item, count)| (item, *count))
    }
}

impl<T: Ord> Default for Multiset<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> FromIterator<T> for Multiset<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut multiset = Multiset::new();
        for item in iter {
            multiset.insert(item);
        }
        multiset
    }
}

impl<T: OptionKind + Ord> OptionKind for Multiset<T> {
    fn option_type() -> OptionType {
        collection_type::<T>(CollectionKind::Multiset)
    }

    fn to_value(&self) -> OptionValue {
        OptionValue::Collection(
            self.iter()
                .flat_map(|(item, count)| std::iter::repeat(item.to_value()).take(count))
                .collect(),
        )
    }

    fn from_value(value: OptionValue) -> Option<Self> {
        collection_items(value).map(|items| items.into_iter().collect())
    }
}

/// Implements [`OptionKind`] for a fieldless enum.
///
/// Each variant is mapped to the constant name used in option values. Values are
/// uppercased before they are matched, so constant names should be uppercase.
///
/// # Examples
///
/// ```
/// use optcfg::impl_option_enum;
/// use optcfg::domain::option_value::{OptionKind, OptionValue};
///
/// #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// enum Strategy {
///     Eager,
///     Lazy,
/// }
///
/// impl_option_enum!(Strategy { Eager => "EAGER", Lazy => "LAZY" });
///
/// assert_eq!(Strategy::Lazy.to_value(), OptionValue::Enum("LAZY".to_string()));
/// assert_eq!(Strategy::from_value(OptionValue::Enum("EAGER".into())), Some(Strategy::Eager));
/// ```
#[macro_export]
macro_rules! impl_option_enum {
    ($ty:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $crate::domain::option_value::OptionKind for $ty {
            fn option_type() -> $crate::domain::option_value::OptionType {
                $crate::domain::option_value::OptionType::Enum {
                    name: stringify!($ty),
                    variants: &[$($name),+],
                }
            }

            fn to_value(&self) -> $crate::domain::option_value::OptionValue {
                let name = match self {
                    $($ty::$variant => $name,)+
                };
                $crate::domain::option_value::OptionValue::Enum(name.to_string())
            }

            fn from_value(value: $crate::domain::option_value::OptionValue) -> Option<Self> {
                match value {
                    $crate::domain::option_value::OptionValue::Enum(name) => match name.as_str() {
                        $($name => Some($ty::$variant),)+
                        _ => None,
                    },
                    _ => None,
                }
            }
        }
    };
}
