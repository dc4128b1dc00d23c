//! Interface-implementation splicing over the class pool.
//!
//! The [`Splicer`] is the low-level copy facade: given a target class, a set of
//! interfaces and a set of implementation classes, it makes the target implement the
//! interfaces and copies over every implementation method whose declaring class is one
//! of the interfaces or transitively implements one. Field copying is optional and
//! resolves initializers the same way field mirroring does.
//!
//! # Examples
//!
//! ```rust
//! use classweave::model::{AccessFlags, ClassBuilder, ClassPool, Method};
//! use classweave::splice::Splicer;
//!
//! let pool = ClassPool::new();
//! ClassBuilder::new("com.example.Closeable")
//!     .interface()
//!     .method(Method::new("close", "()V", AccessFlags::PUBLIC | AccessFlags::ABSTRACT))
//!     .build(&pool)?;
//! ClassBuilder::new("com.example.FileHandle")
//!     .implements("com.example.Closeable")
//!     .method(Method::new("close", "()V", AccessFlags::PUBLIC))
//!     .build(&pool)?;
//! ClassBuilder::new("com.example.Session").build(&pool)?;
//!
//! let splicer = Splicer::new(&pool);
//! let session = splicer
//!     .injection("com.example.Session")?
//!     .interface("com.example.Closeable")?
//!     .implementation("com.example.FileHandle")?
//!     .inject()?;
//!
//! assert_eq!(session.interface_names(), vec!["com.example.Closeable".to_string()]);
//! assert_eq!(session.methods.count(), 1);
//! # Ok::<(), classweave::Error>(())
//! ```

use crate::{
    mirror::{ConstructorMirrorer, FieldMirrorer, MethodMirrorer},
    model::{ClassPool, ClassRc, ConstructorRc, FieldRc, MethodRc},
    Result,
};

/// Low-level member copy facade above a [`ClassPool`].
pub struct Splicer<'a> {
    pool: &'a ClassPool,
}

impl<'a> Splicer<'a> {
    /// Create a splicer over `pool`
    #[must_use]
    pub fn new(pool: &'a ClassPool) -> Self {
        Splicer { pool }
    }

    /// The pool this splicer resolves names through
    #[must_use]
    pub fn pool(&self) -> &ClassPool {
        self.pool
    }

    /// Structurally copy `method` onto `target`
    pub fn copy_method(&self, method: &MethodRc, target: &ClassRc) -> Result<MethodRc> {
        MethodMirrorer::new(method.clone()).mirror(target)
    }

    /// Structurally copy `constructor` onto `target`
    pub fn copy_constructor(
        &self,
        constructor: &ConstructorRc,
        target: &ClassRc,
    ) -> Result<ConstructorRc> {
        ConstructorMirrorer::new(constructor.clone()).mirror(target)
    }

    /// Structurally copy `field` onto `target`, resolving its initializer: the directly
    /// attached expression wins, else the declaring class's association list is
    /// consulted, else the copy carries none.
    pub fn copy_field(&self, field: &FieldRc, target: &ClassRc) -> Result<FieldRc> {
        FieldMirrorer::new(field.clone()).mirror(target)
    }

    /// Implement all given interfaces in the target class using those classes which do
    /// also implement them.
    ///
    /// The target's implemented-interfaces list is *replaced* by `interfaces`. For every
    /// implementation class, each declared method whose declaring class is among the
    /// interfaces or transitively implements one is copied onto the target; each method
    /// is copied at most once. With `copy_fields`, every declared field of each
    /// implementation is copied as well.
    pub fn inject(
        &self,
        target: &ClassRc,
        interfaces: &[ClassRc],
        implementations: &[ClassRc],
        copy_fields: bool,
    ) -> Result<ClassRc> {
        target.set_interfaces(interfaces.iter().map(|i| i.name().to_string()).collect())?;

        for implementation in implementations {
            if copy_fields {
                for (_, field) in implementation.fields.iter() {
                    self.copy_field(field, target)?;
                }
            }

            'methods: for (_, method) in implementation.methods.iter() {
                let declaring = method
                    .declaring()
                    .unwrap_or_else(|| implementation.clone());
                for interface in interfaces {
                    if declaring.name() == interface.name()
                        || declaring.implements(self.pool, interface.name())?
                    {
                        self.copy_method(method, target)?;
                        continue 'methods;
                    }
                }
            }
        }

        Ok(target.clone())
    }

    /// By-name variant of [`Splicer::inject`]; every name is resolved through the pool
    pub fn inject_by_name(
        &self,
        target: &str,
        interfaces: &[&str],
        implementations: &[&str],
        copy_fields: bool,
    ) -> Result<ClassRc> {
        let target = self.pool.get(target)?;
        let interfaces = interfaces
            .iter()
            .map(|name| self.pool.get(name))
            .collect::<Result<Vec<_>>>()?;
        let implementations = implementations
            .iter()
            .map(|name| self.pool.get(name))
            .collect::<Result<Vec<_>>>()?;
        self.inject(&target, &interfaces, &implementations, copy_fields)
    }

    /// Start an injection builder for the named target class
    pub fn injection(&self, target: &str) -> Result<InjectionBuilder<'_>> {
        Ok(InjectionBuilder {
            pool: self.pool,
            target: self.pool.get(target)?,
            interfaces: Vec::new(),
            implementations: Vec::new(),
            copy_fields: false,
        })
    }
}

/// Builder collecting the pieces of one [`Splicer::inject`] call.
pub struct InjectionBuilder<'a> {
    pool: &'a ClassPool,
    target: ClassRc,
    interfaces: Vec<ClassRc>,
    implementations: Vec<ClassRc>,
    copy_fields: bool,
}

impl InjectionBuilder<'_> {
    /// Add an interface by qualified name
    pub fn interface(mut self, name: &str) -> Result<Self> {
        self.interfaces.push(self.pool.get(name)?);
        Ok(self)
    }

    /// Add an implementation class by qualified name
    pub fn implementation(mut self, name: &str) -> Result<Self> {
        self.implementations.push(self.pool.get(name)?);
        Ok(self)
    }

    /// Also copy the implementations' declared fields
    #[must_use]
    pub fn copy_fields(mut self, copy: bool) -> Self {
        self.copy_fields = copy;
        self
    }

    /// Perform the injection
    pub fn inject(self) -> Result<ClassRc> {
        Splicer::new(self.pool).inject(
            &self.target,
            &self.interfaces,
            &self.implementations,
            self.copy_fields,
        )
    }
}
