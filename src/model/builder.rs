//! Fluent construction of class models.

use crate::{
    mirror::{MirrorMarkers, MirroringPolicy},
    model::{
        AccessFlags, ClassPool, ClassRc, Constructor, Field, FieldInit, JvmClass, Method,
        OBJECT_CLASS,
    },
    Result,
};

/// Builder for registering a new [`JvmClass`] into a [`ClassPool`].
///
/// Classes default to extending [`OBJECT_CLASS`] with empty flags; interfaces are built
/// with [`ClassBuilder::interface`].
///
/// # Examples
///
/// ```rust
/// use classweave::model::{AccessFlags, ClassBuilder, ClassPool, Field, Method};
///
/// let pool = ClassPool::new();
/// let class = ClassBuilder::new("com.example.Counter")
///     .public()
///     .implements("com.example.Resettable")
///     .field(Field::new("count", "I", AccessFlags::PRIVATE))
///     .method(Method::new("reset", "()V", AccessFlags::PUBLIC))
///     .field_initializer("count", "0")
///     .build(&pool)?;
///
/// assert!(class.flags().is_public());
/// assert_eq!(class.interface_names(), vec!["com.example.Resettable".to_string()]);
/// # Ok::<(), classweave::Error>(())
/// ```
pub struct ClassBuilder {
    name: String,
    flags: AccessFlags,
    super_name: Option<String>,
    interfaces: Vec<String>,
    fields: Vec<Field>,
    methods: Vec<Method>,
    constructors: Vec<Constructor>,
    field_inits: Vec<FieldInit>,
    markers: MirrorMarkers,
}

impl ClassBuilder {
    /// Start building a class with the given qualified name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        ClassBuilder {
            name: name.into(),
            flags: AccessFlags::empty(),
            super_name: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            field_inits: Vec::new(),
            markers: MirrorMarkers::default(),
        }
    }

    /// Set the `PUBLIC` flag
    #[must_use]
    pub fn public(mut self) -> Self {
        self.flags |= AccessFlags::PUBLIC;
        self
    }

    /// Set the `FINAL` flag
    #[must_use]
    pub fn final_class(mut self) -> Self {
        self.flags |= AccessFlags::FINAL;
        self
    }

    /// Set the `ABSTRACT` flag
    #[must_use]
    pub fn abstract_class(mut self) -> Self {
        self.flags |= AccessFlags::ABSTRACT;
        self
    }

    /// Build an interface instead of a class
    #[must_use]
    pub fn interface(mut self) -> Self {
        self.flags |= AccessFlags::INTERFACE | AccessFlags::ABSTRACT;
        self
    }

    /// Set the superclass by qualified name
    #[must_use]
    pub fn extends(mut self, name: impl Into<String>) -> Self {
        self.super_name = Some(name.into());
        self
    }

    /// Append a directly implemented interface by qualified name
    #[must_use]
    pub fn implements(mut self, name: impl Into<String>) -> Self {
        self.interfaces.push(name.into());
        self
    }

    /// Add a declared field
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a declared method
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }

    /// Add a declared constructor or class initializer
    #[must_use]
    pub fn constructor(mut self, constructor: Constructor) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// Record an initializer expression for a named field
    #[must_use]
    pub fn field_initializer(
        mut self,
        field: impl Into<String>,
        expression: impl Into<String>,
    ) -> Self {
        self.field_inits.push(FieldInit {
            field: field.into(),
            expression: expression.into(),
        });
        self
    }

    /// Set the catch-all mirror marker applying to every member category
    #[must_use]
    pub fn mirror_all(mut self, policy: MirroringPolicy) -> Self {
        self.markers.all = Some(policy);
        self
    }

    /// Set the fields-specific mirror marker
    #[must_use]
    pub fn mirror_fields(mut self, policy: MirroringPolicy) -> Self {
        self.markers.fields = Some(policy);
        self
    }

    /// Set the methods-specific mirror marker
    #[must_use]
    pub fn mirror_methods(mut self, policy: MirroringPolicy) -> Self {
        self.markers.methods = Some(policy);
        self
    }

    /// Set the constructors-specific mirror marker
    #[must_use]
    pub fn mirror_constructors(mut self, policy: MirroringPolicy) -> Self {
        self.markers.constructors = Some(policy);
        self
    }

    /// Set whether class initializers are mirrored
    #[must_use]
    pub fn mirror_class_initializers(mut self, mirror: bool) -> Self {
        self.markers.initializers = Some(mirror);
        self
    }

    /// Register the finished model into `pool` and return it.
    ///
    /// Interfaces get no superclass link; classes default to [`OBJECT_CLASS`].
    pub fn build(self, pool: &ClassPool) -> Result<ClassRc> {
        let super_name = if self.flags.is_interface() {
            self.super_name
        } else {
            Some(self.super_name.unwrap_or_else(|| OBJECT_CLASS.to_string()))
        };

        let class = JvmClass::new(self.name, self.flags, super_name.as_deref());
        for name in self.interfaces {
            class.add_interface(name)?;
        }
        for field in self.fields {
            class.add_field(field)?;
        }
        for method in self.methods {
            class.add_method(method)?;
        }
        for constructor in self.constructors {
            class.add_constructor(constructor)?;
        }
        for init in self.field_inits {
            class.add_field_initializer(init.field, init.expression)?;
        }
        class.set_mirror_markers(self.markers);

        pool.register(class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_object_superclass() {
        let pool = ClassPool::new();
        let class = ClassBuilder::new("com.example.Plain").build(&pool).unwrap();
        assert_eq!(class.super_name().as_deref(), Some(OBJECT_CLASS));
    }

    #[test]
    fn test_interface_has_no_superclass() {
        let pool = ClassPool::new();
        let iface = ClassBuilder::new("com.example.Marker")
            .interface()
            .build(&pool)
            .unwrap();
        assert!(iface.is_interface());
        assert!(iface.super_name().is_none());
    }

    #[test]
    fn test_markers_are_attached() {
        let pool = ClassPool::new();
        let class = ClassBuilder::new("com.example.Mirrored")
            .mirror_all(MirroringPolicy::None)
            .mirror_fields(MirroringPolicy::All)
            .build(&pool)
            .unwrap();

        let markers = class.mirror_markers();
        assert_eq!(markers.all, Some(MirroringPolicy::None));
        assert_eq!(markers.fields, Some(MirroringPolicy::All));
        assert_eq!(markers.methods, None);
    }
}
