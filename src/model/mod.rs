//! In-memory class models and the pool that owns them.
//!
//! This module provides the mutable, pre-materialization representation of a JVM class:
//!
//! - [`JvmClass`]: a single class or interface model with structural mutators
//! - [`ClassPool`]: the process-wide, name-keyed registry of models
//! - [`ClassBuilder`]: fluent construction of new models into a pool
//! - [`Field`], [`Method`], [`Constructor`]: member models
//! - [`AccessFlags`]: the typed view over raw JVM flag words
//!
//! Models are shared as [`ClassRc`] and mutated through interior locks; member lists are
//! append-only. A model may be **frozen** (after materialization), after which structural
//! edits fail with [`Error::Frozen`](crate::Error::Frozen) until it is explicitly defrosted.
//!
//! # Examples
//!
//! ```rust
//! use classweave::model::{AccessFlags, ClassBuilder, ClassPool, Field};
//!
//! let pool = ClassPool::new();
//! let class = ClassBuilder::new("com.example.Point")
//!     .public()
//!     .field(Field::new("x", "I", AccessFlags::PRIVATE))
//!     .field(Field::new("y", "I", AccessFlags::PRIVATE))
//!     .build(&pool)?;
//!
//! assert_eq!(class.super_name().as_deref(), Some("java.lang.Object"));
//! assert_eq!(class.fields.count(), 2);
//! # Ok::<(), classweave::Error>(())
//! ```

mod builder;
mod flags;
mod member;
mod pool;

use std::sync::{
    atomic::{AtomicBool, AtomicU32, Ordering},
    Arc, RwLock,
};

pub use builder::ClassBuilder;
pub use flags::AccessFlags;
pub use member::{
    ClassRef, ConstantValue, Constructor, ConstructorKind, ConstructorRc, Field, FieldRc, Method,
    MethodBody, MethodRc,
};
pub use pool::ClassPool;

use crate::{mirror::MirrorMarkers, Error, Result};

/// Reference to a [`JvmClass`]
pub type ClassRc = Arc<JvmClass>;
/// A vector that holds [`FieldRc`] instances
pub type FieldList = Arc<boxcar::Vec<FieldRc>>;
/// A vector that holds [`MethodRc`] instances
pub type MethodList = Arc<boxcar::Vec<MethodRc>>;
/// A vector that holds [`ConstructorRc`] instances
pub type ConstructorList = Arc<boxcar::Vec<ConstructorRc>>;

/// Qualified name of the hierarchy root every pool is seeded with
pub const OBJECT_CLASS: &str = "java.lang.Object";

/// An association between a field name and the initializer expression evaluated for it.
///
/// Mirrors the per-class initializer list that backs field declarations whose initial
/// value is not a compile-time constant.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInit {
    /// Name of the initialized field
    pub field: String,
    /// Source-level initializer expression
    pub expression: String,
}

/// A mutable class model.
///
/// Holds everything a class file header and member section would: flags, the superclass
/// name, implemented interface names, fields, methods, constructors (instance constructors
/// and the class initializer share one declaration list), plus the field-initializer
/// association list and the per-class mirror markers consumed by the mirroring engine.
///
/// Superclass and interface links are stored *by qualified name* and resolved through the
/// owning [`ClassPool`], so a model can reference classes that are registered later.
pub struct JvmClass {
    name: String,
    flags: AtomicU32,
    super_name: RwLock<Option<String>>,
    interfaces: RwLock<Vec<String>>,
    /// All fields this class declares
    pub fields: FieldList,
    /// All methods this class declares
    pub methods: MethodList,
    /// All constructors and class initializers this class declares
    pub constructors: ConstructorList,
    field_inits: RwLock<Vec<FieldInit>>,
    mirror: RwLock<MirrorMarkers>,
    frozen: AtomicBool,
}

impl JvmClass {
    /// Create a new class model.
    ///
    /// `super_name` is `None` only for the hierarchy root; [`ClassBuilder`] defaults it
    /// to [`OBJECT_CLASS`] for everything else.
    pub fn new(name: impl Into<String>, flags: AccessFlags, super_name: Option<&str>) -> ClassRc {
        Arc::new(JvmClass {
            name: name.into(),
            flags: AtomicU32::new(flags.bits()),
            super_name: RwLock::new(super_name.map(str::to_string)),
            interfaces: RwLock::new(Vec::new()),
            fields: Arc::new(boxcar::Vec::new()),
            methods: Arc::new(boxcar::Vec::new()),
            constructors: Arc::new(boxcar::Vec::new()),
            field_inits: RwLock::new(Vec::new()),
            mirror: RwLock::new(MirrorMarkers::default()),
            frozen: AtomicBool::new(false),
        })
    }

    /// Qualified name in dot form (`com.example.Foo`)
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Qualified name in internal form (`com/example/Foo`)
    #[must_use]
    pub fn internal_name(&self) -> String {
        self.name.replace('.', "/")
    }

    /// Typed view of the class flags
    #[must_use]
    pub fn flags(&self) -> AccessFlags {
        AccessFlags::from_bits_truncate(self.flags.load(Ordering::Relaxed))
    }

    /// Whether this model describes an interface
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.flags().is_interface()
    }

    /// The superclass name, `None` only for the hierarchy root
    #[must_use]
    pub fn super_name(&self) -> Option<String> {
        self.super_name.read().expect("super lock poisoned").clone()
    }

    /// Replace the superclass
    pub fn set_super_name(&self, name: impl Into<String>) -> Result<()> {
        self.ensure_unfrozen()?;
        *self.super_name.write().expect("super lock poisoned") = Some(name.into());
        Ok(())
    }

    /// Names of the directly implemented interfaces, in declaration order
    #[must_use]
    pub fn interface_names(&self) -> Vec<String> {
        self.interfaces
            .read()
            .expect("interfaces lock poisoned")
            .clone()
    }

    /// Append an implemented interface. Duplicates are tolerated.
    pub fn add_interface(&self, name: impl Into<String>) -> Result<()> {
        self.ensure_unfrozen()?;
        self.interfaces
            .write()
            .expect("interfaces lock poisoned")
            .push(name.into());
        Ok(())
    }

    /// Replace the implemented-interfaces list as a whole
    pub fn set_interfaces(&self, names: Vec<String>) -> Result<()> {
        self.ensure_unfrozen()?;
        *self.interfaces.write().expect("interfaces lock poisoned") = names;
        Ok(())
    }

    /// Add a declared field.
    ///
    /// Fails on frozen classes and when a field of the same name already exists.
    pub fn add_field(self: &Arc<Self>, field: Field) -> Result<FieldRc> {
        self.ensure_unfrozen()?;
        for (_, existing) in self.fields.iter() {
            if existing.name() == field.name() {
                return Err(Error::DuplicateMember {
                    class: self.name.clone(),
                    member: field.signature(),
                });
            }
        }

        let field = Arc::new(field);
        field.attach_to(self);
        self.fields.push(field.clone());
        Ok(field)
    }

    /// Add a declared method.
    ///
    /// Fails on frozen classes and when a method of the same name and descriptor
    /// already exists (overloads are fine).
    pub fn add_method(self: &Arc<Self>, method: Method) -> Result<MethodRc> {
        self.ensure_unfrozen()?;
        for (_, existing) in self.methods.iter() {
            if existing.name() == method.name() && existing.descriptor() == method.descriptor() {
                return Err(Error::DuplicateMember {
                    class: self.name.clone(),
                    member: method.signature(),
                });
            }
        }

        let method = Arc::new(method);
        method.attach_to(self);
        self.methods.push(method.clone());
        Ok(method)
    }

    /// Add a declared constructor or class initializer.
    ///
    /// Fails on frozen classes and when a constructor with the same kind and descriptor
    /// already exists.
    pub fn add_constructor(self: &Arc<Self>, constructor: Constructor) -> Result<ConstructorRc> {
        self.ensure_unfrozen()?;
        for (_, existing) in self.constructors.iter() {
            if existing.kind() == constructor.kind()
                && existing.descriptor() == constructor.descriptor()
            {
                return Err(Error::DuplicateMember {
                    class: self.name.clone(),
                    member: constructor.signature(),
                });
            }
        }

        let constructor = Arc::new(constructor);
        constructor.attach_to(self);
        self.constructors.push(constructor.clone());
        Ok(constructor)
    }

    /// Record an initializer expression for a named field in the association list
    pub fn add_field_initializer(
        &self,
        field: impl Into<String>,
        expression: impl Into<String>,
    ) -> Result<()> {
        self.ensure_unfrozen()?;
        self.field_inits
            .write()
            .expect("field inits lock poisoned")
            .push(FieldInit {
                field: field.into(),
                expression: expression.into(),
            });
        Ok(())
    }

    /// Look up the association-list initializer for a named field, first match wins
    #[must_use]
    pub fn field_initializer_for(&self, field: &str) -> Option<String> {
        self.field_inits
            .read()
            .expect("field inits lock poisoned")
            .iter()
            .find(|init| init.field == field)
            .map(|init| init.expression.clone())
    }

    /// The per-class mirror markers
    #[must_use]
    pub fn mirror_markers(&self) -> MirrorMarkers {
        *self.mirror.read().expect("mirror lock poisoned")
    }

    /// Replace the per-class mirror markers
    pub fn set_mirror_markers(&self, markers: MirrorMarkers) {
        *self.mirror.write().expect("mirror lock poisoned") = markers;
    }

    /// Whether this model is frozen
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Relaxed)
    }

    /// Freeze this model against structural edits
    pub fn freeze(&self) {
        self.frozen.store(true, Ordering::Relaxed);
    }

    /// Make a frozen model editable again
    pub fn defrost(&self) {
        self.frozen.store(false, Ordering::Relaxed);
    }

    fn ensure_unfrozen(&self) -> Result<()> {
        if self.is_frozen() {
            return Err(Error::Frozen(self.name.clone()));
        }
        Ok(())
    }

    /// All publicly visible fields, including inherited ones.
    ///
    /// Walks the superclass chain; a field declared closer to `self` shadows
    /// same-named fields further up.
    pub fn visible_fields(self: &Arc<Self>, pool: &ClassPool) -> Result<Vec<FieldRc>> {
        let mut collected: Vec<FieldRc> = Vec::new();
        let mut current = Some(self.clone());
        while let Some(class) = current {
            for (_, field) in class.fields.iter() {
                if field.flags().is_public()
                    && !collected.iter().any(|f| f.name() == field.name())
                {
                    collected.push(field.clone());
                }
            }
            current = match class.super_name() {
                Some(name) => Some(pool.get(&name)?),
                None => None,
            };
        }
        Ok(collected)
    }

    /// All publicly visible methods, including those inherited from superclasses and
    /// interfaces. A signature collected closer to `self` wins over duplicates.
    pub fn visible_methods(self: &Arc<Self>, pool: &ClassPool) -> Result<Vec<MethodRc>> {
        let mut collected: Vec<MethodRc> = Vec::new();
        let mut pending: Vec<ClassRc> = vec![self.clone()];
        let mut visited: Vec<String> = Vec::new();

        while let Some(class) = pending.pop() {
            if visited.iter().any(|name| name == class.name()) {
                continue;
            }
            visited.push(class.name().to_string());

            for (_, method) in class.methods.iter() {
                if method.flags().is_public()
                    && !collected.iter().any(|m| {
                        m.name() == method.name() && m.descriptor() == method.descriptor()
                    })
                {
                    collected.push(method.clone());
                }
            }

            // interfaces are pushed first so the superclass chain is drained before them
            for name in class.interface_names().iter().rev() {
                pending.push(pool.get(name)?);
            }
            if let Some(name) = class.super_name() {
                pending.push(pool.get(&name)?);
            }
        }
        Ok(collected)
    }

    /// Whether this class is, or transitively implements, the named interface.
    ///
    /// Walks the superclass chain and the full interface graph through `pool`.
    pub fn implements(self: &Arc<Self>, pool: &ClassPool, interface: &str) -> Result<bool> {
        if self.name() == interface {
            return Ok(true);
        }

        let mut pending: Vec<ClassRc> = vec![self.clone()];
        let mut visited: Vec<String> = Vec::new();
        while let Some(class) = pending.pop() {
            if visited.iter().any(|name| name == class.name()) {
                continue;
            }
            visited.push(class.name().to_string());

            for name in class.interface_names() {
                if name == interface {
                    return Ok(true);
                }
                pending.push(pool.get(&name)?);
            }
            if let Some(name) = class.super_name() {
                pending.push(pool.get(&name)?);
            }
        }
        Ok(false)
    }

    /// Emit this model as version-52 class-file bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        crate::codegen::write_class(self)
    }
}
