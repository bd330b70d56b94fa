// SPDX-License-Identifier: MIT OR Apache-2.0

//! A catalog of named implementation classes.
//!
//! Options can name an implementation by a dotted class name, for example
//! `analysis.strategy = refinement.Lazy`. The embedding application registers
//! every selectable implementation in a [`ClassCatalog`] together with the
//! interfaces it implements and, optionally, factories producing instances.

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// One registered implementation.
///
/// # Examples
///
/// ```
/// use optcfg::domain::class_catalog::RegisteredClass;
/// use std::sync::Arc;
///
/// type MakeGreeting = dyn Fn() -> String + Send + Sync;
///
/// let class = RegisteredClass::new("greeting.English")
///     .implements("greeting.Greeting")
///     .with_factory::<MakeGreeting>(Arc::new(|| "hello".to_string()));
///
/// assert!(class.is_subtype_of("greeting.Greeting"));
/// let make = class.factory::<MakeGreeting>().unwrap();
/// assert_eq!(make(), "hello");
/// ```
pub struct RegisteredClass {
    name: String,
    supertypes: BTreeSet<String>,
    factories: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl RegisteredClass {
    /// Creates a class entry with the given fully-qualified name.
    pub fn new(name: impl Into<String>) -> Self {
        RegisteredClass {
            name: name.into(),
            supertypes: BTreeSet::new(),
            factories: HashMap::new(),
        }
    }

    /// Declares that this class implements (is a subtype of) `supertype`.
    pub fn implements(mut self, supertype: impl Into<String>) -> Self {
        self.supertypes.insert(supertype.into());
        self
    }

    /// Registers a factory of interface type `F` for this class.
    pub fn with_factory<F: ?Sized + Send + Sync + 'static>(mut self, factory: Arc<F>) -> Self {
        self.factories.insert(TypeId::of::<F>(), Arc::new(factory));
        self
    }

    /// The fully-qualified name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True if this class is `supertype` itself or declared to implement it.
    pub fn is_subtype_of(&self, supertype: &str) -> bool {
        self.name == supertype || self.supertypes.contains(supertype)
    }

    /// Returns the factory registered for interface type `F`.
    pub fn factory<F: ?Sized + 'static>(&self) -> Option<Arc<F>> {
        self.factories
            .get(&TypeId::of::<F>())
            .and_then(|any| any.downcast_ref::<Arc<F>>())
            .cloned()
    }

    pub(crate) fn has_factory(&self, interface: TypeId) -> bool {
        self.factories.contains_key(&interface)
    }
}

impl fmt::Debug for RegisteredClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredClass")
            .field("name", &self.name)
            .field("supertypes", &self.supertypes)
            .field("factories", &self.factories.len())
            .finish()
    }
}

/// A shared reference to a registered class, as produced by class options.
#[derive(Clone, Debug)]
pub struct ClassRef(Arc<RegisteredClass>);

impl ClassRef {
    /// The fully-qualified class name.
    pub fn name(&self) -> &str {
        self.0.name()
    }

    /// See [`RegisteredClass::is_subtype_of`].
    pub fn is_subtype_of(&self, supertype: &str) -> bool {
        self.0.is_subtype_of(supertype)
    }

    /// See [`RegisteredClass::factory`].
    pub fn factory<F: ?Sized + 'static>(&self) -> Option<Arc<F>> {
        self.0.factory::<F>()
    }

    pub(crate) fn has_factory(&self, interface: TypeId) -> bool {
        self.0.has_factory(interface)
    }
}

impl PartialEq for ClassRef {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl fmt::Display for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A factory of interface type `F` selected by a class option.
pub struct Factory<F: ?Sized> {
    class: ClassRef,
    factory: Arc<F>,
}

impl<F: ?Sized + 'static> Factory<F> {
    /// Looks up the factory of type `F` registered for `class`.
    pub fn from_class(class: &ClassRef) -> Option<Self> {
        class.factory::<F>().map(|factory| Factory {
            class: class.clone(),
            factory,
        })
    }

    /// The class that provided the factory.
    pub fn class(&self) -> &ClassRef {
        &self.class
    }

    /// The factory itself.
    pub fn get(&self) -> &Arc<F> {
        &self.factory
    }
}

impl<F: ?Sized> Clone for Factory<F> {
    fn clone(&self) -> Self {
        Factory {
            class: self.class.clone(),
            factory: Arc::clone(&self.factory),
        }
    }
}

impl<F: ?Sized> fmt::Debug for Factory<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Factory").field(&self.class.name()).finish()
    }
}

/// The set of classes that class options may name.
#[derive(Debug, Default)]
pub struct ClassCatalog {
    classes: RwLock<BTreeMap<String, ClassRef>>,
}

impl ClassCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a class, replacing any class registered under the same name.
    pub fn register(&self, class: RegisteredClass) {
        let mut classes = self.classes.write().unwrap_or_else(PoisonError::into_inner);
        classes.insert(class.name.clone(), ClassRef(Arc::new(class)));
    }

    /// Looks up a class by its fully-qualified name.
    pub fn lookup(&self, name: &str) -> Option<ClassRef> {
        let classes = self.classes.read().unwrap_or_else(PoisonError::into_inner);
        classes.get(name).cloned()
    }

    /// Number of registered classes.
    pub fn len(&self) -> usize {
        self.classes.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// True if no class is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
