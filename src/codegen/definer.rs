//! Class definition into loader namespaces.
//!
//! A [`ClassLoader`] is a namespace of defined classes with parent-first delegation,
//! mimicking JVM loader semantics at the model level. The [`SafeClassDefiner`] keeps
//! at most one generated child loader per parent, synchronizes definition per class
//! name, and rejects redefinition of an already-visible name.

use std::sync::{Arc, Mutex, Weak};

use dashmap::DashMap;

use crate::{Error, Result};

/// The result of defining class-file bytes into a loader.
#[derive(Debug, Clone)]
pub struct DefinedClass {
    name: Option<String>,
    bytecode: Vec<u8>,
}

impl DefinedClass {
    /// The qualified name the class was defined under, `None` for anonymous definitions
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The class-file bytes that were defined
    #[must_use]
    pub fn bytecode(&self) -> &[u8] {
        &self.bytecode
    }
}

/// A namespace of defined classes with parent-first delegation.
///
/// The parent link is weak: a loader never keeps its parent alive, and a generated
/// child loader can be reclaimed together with its parent.
pub struct ClassLoader {
    name: String,
    parent: Option<Weak<ClassLoader>>,
    defined: DashMap<String, Arc<DefinedClass>>,
    anonymous: boxcar::Vec<Arc<DefinedClass>>,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl ClassLoader {
    /// The root loader of a delegation
    #[must_use]
    pub fn bootstrap() -> Arc<Self> {
        Arc::new(ClassLoader {
            name: "bootstrap".to_string(),
            parent: None,
            defined: DashMap::new(),
            anonymous: boxcar::Vec::new(),
            locks: DashMap::new(),
        })
    }

    /// A named child of `parent`
    #[must_use]
    pub fn child_of(parent: &Arc<ClassLoader>, name: impl Into<String>) -> Arc<Self> {
        Arc::new(ClassLoader {
            name: name.into(),
            parent: Some(Arc::downgrade(parent)),
            defined: DashMap::new(),
            anonymous: boxcar::Vec::new(),
            locks: DashMap::new(),
        })
    }

    /// This loader's name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parent loader, if it is still alive
    #[must_use]
    pub fn parent(&self) -> Option<Arc<ClassLoader>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    /// The per-name lock object definition of that name must hold
    #[must_use]
    pub fn class_loading_lock(&self, name: &str) -> Arc<Mutex<()>> {
        self.locks.entry(name.to_string()).or_default().clone()
    }

    /// Find a defined class, delegating to the parent first
    #[must_use]
    pub fn find(&self, name: &str) -> Option<Arc<DefinedClass>> {
        if let Some(parent) = self.parent() {
            if let Some(found) = parent.find(name) {
                return Some(found);
            }
        }
        self.defined.get(name).map(|entry| entry.value().clone())
    }

    /// Whether a class of that name is visible through this loader's delegation
    #[must_use]
    pub fn has_class(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Define class bytes under `name` (or anonymously for `None`).
    ///
    /// Named definition holds the per-name class-loading lock for the duration of the
    /// visibility check and the insertion.
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyDefined`] when a class of that name is already visible;
    /// [`Error::LockError`] when the per-name lock is poisoned.
    pub fn define(&self, name: Option<&str>, bytecode: &[u8]) -> Result<Arc<DefinedClass>> {
        match name {
            Some(name) => {
                let lock = self.class_loading_lock(name);
                let _guard = lock.lock().map_err(|_| Error::LockError)?;

                if self.has_class(name) {
                    return Err(Error::AlreadyDefined(name.to_string()));
                }
                let defined = Arc::new(DefinedClass {
                    name: Some(name.to_string()),
                    bytecode: bytecode.to_vec(),
                });
                self.defined.insert(name.to_string(), defined.clone());
                Ok(defined)
            }
            None => {
                let defined = Arc::new(DefinedClass {
                    name: None,
                    bytecode: bytecode.to_vec(),
                });
                self.anonymous.push(defined.clone());
                Ok(defined)
            }
        }
    }
}

/// A service defining class-file bytes into the delegation of a parent loader.
pub trait ClassDefiner: Send + Sync {
    /// Define `bytecode` under `name` (anonymously for `None`) so it becomes visible
    /// through `parent`'s delegation
    fn define_class(
        &self,
        parent: &Arc<ClassLoader>,
        name: Option<&str>,
        bytecode: &[u8],
    ) -> Result<Arc<DefinedClass>>;
}

struct LoaderSlot {
    parent: Weak<ClassLoader>,
    loader: Arc<ClassLoader>,
}

/// A [`ClassDefiner`] maintaining one generated child loader per parent.
///
/// The child-loader map is keyed by parent identity and populated atomically; slots
/// whose parent has been dropped are purged opportunistically, releasing the child
/// with it. A second definition of a name already visible through the child fails
/// fast with [`Error::AlreadyDefined`] instead of silently returning the existing
/// class.
#[derive(Default)]
pub struct SafeClassDefiner {
    loaders: DashMap<usize, LoaderSlot>,
}

impl SafeClassDefiner {
    /// Create a definer with no generated loaders yet
    #[must_use]
    pub fn new() -> Self {
        SafeClassDefiner::default()
    }

    /// Number of live generated loaders
    #[must_use]
    pub fn loader_count(&self) -> usize {
        self.loaders.len()
    }

    fn generated_loader(&self, parent: &Arc<ClassLoader>) -> Arc<ClassLoader> {
        self.loaders.retain(|_, slot| slot.parent.strong_count() > 0);

        let key = Arc::as_ptr(parent) as usize;
        self.loaders
            .entry(key)
            .or_insert_with(|| LoaderSlot {
                parent: Arc::downgrade(parent),
                loader: ClassLoader::child_of(parent, format!("generated[{}]", parent.name())),
            })
            .loader
            .clone()
    }
}

impl ClassDefiner for SafeClassDefiner {
    fn define_class(
        &self,
        parent: &Arc<ClassLoader>,
        name: Option<&str>,
        bytecode: &[u8],
    ) -> Result<Arc<DefinedClass>> {
        self.generated_loader(parent).define(name, bytecode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redefinition_fails_fast() {
        let parent = ClassLoader::bootstrap();
        let definer = SafeClassDefiner::new();

        definer
            .define_class(&parent, Some("com.example.Gen$0"), &[0xCA])
            .unwrap();
        let second = definer.define_class(&parent, Some("com.example.Gen$0"), &[0xCA]);
        assert!(matches!(
            second,
            Err(Error::AlreadyDefined(name)) if name == "com.example.Gen$0"
        ));
    }

    #[test]
    fn test_one_generated_loader_per_parent() {
        let parent = ClassLoader::bootstrap();
        let definer = SafeClassDefiner::new();

        let first = definer
            .define_class(&parent, Some("com.example.Gen$0"), &[1])
            .unwrap();
        let second = definer
            .define_class(&parent, Some("com.example.Gen$1"), &[2])
            .unwrap();
        assert_eq!(definer.loader_count(), 1);
        assert_eq!(first.name(), Some("com.example.Gen$0"));
        assert_eq!(second.name(), Some("com.example.Gen$1"));
    }

    #[test]
    fn test_parent_visibility_blocks_redefinition() {
        let parent = ClassLoader::bootstrap();
        parent.define(Some("com.example.Present"), &[1]).unwrap();

        let definer = SafeClassDefiner::new();
        let result = definer.define_class(&parent, Some("com.example.Present"), &[2]);
        assert!(matches!(result, Err(Error::AlreadyDefined(_))));
    }

    #[test]
    fn test_stale_parents_are_purged() {
        let definer = SafeClassDefiner::new();
        {
            let parent = ClassLoader::bootstrap();
            definer
                .define_class(&parent, Some("com.example.Gen$0"), &[1])
                .unwrap();
            assert_eq!(definer.loader_count(), 1);
        }

        let fresh = ClassLoader::bootstrap();
        definer
            .define_class(&fresh, Some("com.example.Gen$0"), &[1])
            .unwrap();
        assert_eq!(definer.loader_count(), 1);
    }

    #[test]
    fn test_anonymous_definitions_never_collide() {
        let parent = ClassLoader::bootstrap();
        let definer = SafeClassDefiner::new();

        let first = definer.define_class(&parent, None, &[1]).unwrap();
        let second = definer.define_class(&parent, None, &[1]).unwrap();
        assert!(first.name().is_none());
        assert!(second.name().is_none());
    }
}
