//! The process-wide class pool.
//!
//! The pool is the single source of truth for resolving the by-name links class models
//! keep to their superclass and interfaces. Storage is ordered by qualified name so
//! iteration is deterministic.
//!
//! # Thread Safety
//!
//! Registration and lookup are safe for concurrent use (lock-free ordered map).
//! Concurrent *structural mutation of the same named class* is not serialized here;
//! callers that edit one class from several threads must provide their own discipline.

use crossbeam_skiplist::SkipMap;

use crate::{
    codegen::{ClassDefiner, ClassLoader, DefinedClass},
    model::{AccessFlags, ClassRc, JvmClass, OBJECT_CLASS},
    Error, Result,
};
use std::sync::Arc;

/// A name-keyed registry of class models.
///
/// Every pool is seeded with the hierarchy root ([`OBJECT_CLASS`]) so superclass chains
/// terminate naturally.
///
/// # Examples
///
/// ```rust
/// use classweave::model::{ClassBuilder, ClassPool};
///
/// let pool = ClassPool::new();
/// ClassBuilder::new("com.example.Service").public().build(&pool)?;
///
/// let class = pool.get("com.example.Service")?;
/// assert_eq!(class.name(), "com.example.Service");
/// assert!(pool.get("com.example.Missing").is_err());
/// # Ok::<(), classweave::Error>(())
/// ```
pub struct ClassPool {
    classes: SkipMap<String, ClassRc>,
}

impl ClassPool {
    /// Create a new pool, seeded with the hierarchy root
    #[must_use]
    pub fn new() -> Self {
        let pool = ClassPool {
            classes: SkipMap::new(),
        };
        let object = JvmClass::new(OBJECT_CLASS, AccessFlags::PUBLIC, None);
        pool.classes.insert(object.name().to_string(), object);
        pool
    }

    /// Look up a class by qualified name
    pub fn get(&self, name: &str) -> Result<ClassRc> {
        self.lookup(name)
            .ok_or_else(|| Error::ClassNotFound(name.to_string()))
    }

    /// Look up a class by qualified name, `None` when absent
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<ClassRc> {
        self.classes.get(name).map(|entry| entry.value().clone())
    }

    /// Whether a class with the given name is registered
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// The hierarchy root every pool is seeded with
    #[must_use]
    pub fn object_class(&self) -> ClassRc {
        self.lookup(OBJECT_CLASS)
            .expect("pool is always seeded with the hierarchy root")
    }

    /// Register a class model under its qualified name.
    ///
    /// Fails when the name is already taken.
    pub fn register(&self, class: ClassRc) -> Result<ClassRc> {
        if self.contains(class.name()) {
            return Err(Error::ClassExists(class.name().to_string()));
        }
        self.classes.insert(class.name().to_string(), class.clone());
        Ok(class)
    }

    /// Number of registered classes (including the seeded root)
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the pool holds no classes at all (never true in practice: the root is seeded)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Iterate all registered classes in name order
    pub fn iter(&self) -> impl Iterator<Item = ClassRc> + '_ {
        self.classes.iter().map(|entry| entry.value().clone())
    }

    /// Materialize a class model: freeze it, emit its class-file bytes and define them
    /// through `definer` into the delegation of `parent`.
    ///
    /// After this call the model is frozen; further structural edits require defrosting.
    pub fn materialize(
        &self,
        class: &ClassRc,
        definer: &dyn ClassDefiner,
        parent: &Arc<ClassLoader>,
    ) -> Result<Arc<DefinedClass>> {
        class.freeze();
        let bytes = class.to_bytes()?;
        definer.define_class(parent, Some(class.name()), &bytes)
    }
}

impl Default for ClassPool {
    fn default() -> Self {
        Self::new()
    }
}
