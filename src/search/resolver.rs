//! Predicate-driven member resolution on top of the hierarchy walkers.

use crate::{
    handle::{ConstructorHandle, FieldHandle, HandleCache, MethodHandle},
    model::{ClassPool, ClassRc, ConstructorRc, FieldRc, MethodRc},
    search::{walker, ClassMember, SearchOutcome},
    Error, Result,
};
use std::sync::Arc;

/// Resolves fields, methods and constructors across a class hierarchy.
///
/// Each resolution builds a probe that scans a single class's *declared* members
/// against the caller's predicate (first match in declaration order wins) and hands it
/// to the appropriate walker: methods use the interface-inclusive walk (methods commonly
/// come from interface declarations), fields and constructors the superclass-only walk.
///
/// The handle cache is injected so wrapped accessors return reference-identical handles
/// for repeated resolutions of the same member.
///
/// # Examples
///
/// ```rust
/// use classweave::handle::HandleCache;
/// use classweave::model::{AccessFlags, ClassBuilder, ClassPool, Field};
/// use classweave::search::MemberResolver;
///
/// let pool = ClassPool::new();
/// let handles = HandleCache::new();
/// ClassBuilder::new("com.example.Base")
///     .field(Field::new("shared", "I", AccessFlags::PROTECTED))
///     .build(&pool)?;
/// let derived = ClassBuilder::new("com.example.Derived")
///     .extends("com.example.Base")
///     .build(&pool)?;
///
/// let resolver = MemberResolver::new(&pool, &handles);
/// let member = resolver.field_by_name(&derived, "shared")?.expect("inherited field");
/// assert_eq!(member.owner().name(), "com.example.Base");
/// # Ok::<(), classweave::Error>(())
/// ```
pub struct MemberResolver<'a> {
    pool: &'a ClassPool,
    handles: &'a HandleCache,
}

impl<'a> MemberResolver<'a> {
    /// Create a resolver over `pool`, caching wrapped members in `handles`
    #[must_use]
    pub fn new(pool: &'a ClassPool, handles: &'a HandleCache) -> Self {
        MemberResolver { pool, handles }
    }

    /// Dig for a field matching `predicate`, walking the superclass chain up to `bound`
    /// (inclusive; `None` walks to the root)
    pub fn dig_for_field(
        &self,
        class: &ClassRc,
        predicate: impl Fn(&FieldRc) -> bool,
        bound: Option<&ClassRc>,
    ) -> Result<Option<ClassMember<FieldRc>>> {
        walker::dig(
            self.pool,
            class,
            &mut |owner: &ClassRc| {
                for (_, field) in owner.fields.iter() {
                    if predicate(field) {
                        return Ok(Some(SearchOutcome::of(field.clone())));
                    }
                }
                Ok(None)
            },
            bound,
        )
    }

    /// Dig for a method matching `predicate`, walking superclasses and interfaces up to
    /// `bound`
    pub fn dig_for_method(
        &self,
        class: &ClassRc,
        predicate: impl Fn(&MethodRc) -> bool,
        bound: Option<&ClassRc>,
    ) -> Result<Option<ClassMember<MethodRc>>> {
        walker::dig_with_interfaces(
            self.pool,
            class,
            &mut |owner: &ClassRc| {
                for (_, method) in owner.methods.iter() {
                    if predicate(method) {
                        return Ok(Some(SearchOutcome::of(method.clone())));
                    }
                }
                Ok(None)
            },
            bound,
        )
    }

    /// Dig for an instance constructor matching `predicate`, walking the superclass
    /// chain up to `bound`. Class initializers are never considered.
    pub fn dig_for_constructor(
        &self,
        class: &ClassRc,
        predicate: impl Fn(&ConstructorRc) -> bool,
        bound: Option<&ClassRc>,
    ) -> Result<Option<ClassMember<ConstructorRc>>> {
        walker::dig(
            self.pool,
            class,
            &mut |owner: &ClassRc| {
                for (_, constructor) in owner.constructors.iter() {
                    if constructor.is_constructor() && predicate(constructor) {
                        return Ok(Some(SearchOutcome::of(constructor.clone())));
                    }
                }
                Ok(None)
            },
            bound,
        )
    }

    /// Any field with the given name, anywhere up the superclass chain
    pub fn field_by_name(
        &self,
        class: &ClassRc,
        name: &str,
    ) -> Result<Option<ClassMember<FieldRc>>> {
        self.dig_for_field(class, |field| field.name() == name, None)
    }

    /// Any method with the given name, anywhere in the hierarchy including interfaces
    pub fn method_by_name(
        &self,
        class: &ClassRc,
        name: &str,
    ) -> Result<Option<ClassMember<MethodRc>>> {
        self.dig_for_method(class, |method| method.name() == name, None)
    }

    /// Any constructor with the given descriptor, anywhere up the superclass chain
    pub fn constructor_by_descriptor(
        &self,
        class: &ClassRc,
        descriptor: &str,
    ) -> Result<Option<ClassMember<ConstructorRc>>> {
        self.dig_for_constructor(class, |ctor| ctor.descriptor() == descriptor, None)
    }

    /// Like [`MemberResolver::field_by_name`], but absence is an error
    pub fn require_field(&self, class: &ClassRc, name: &str) -> Result<FieldRc> {
        self.field_by_name(class, name)?
            .and_then(ClassMember::into_value)
            .ok_or_else(|| Error::MemberNotFound {
                kind: "field",
                name: name.to_string(),
                class: class.name().to_string(),
            })
    }

    /// Like [`MemberResolver::method_by_name`], but absence is an error
    pub fn require_method(&self, class: &ClassRc, name: &str) -> Result<MethodRc> {
        self.method_by_name(class, name)?
            .and_then(ClassMember::into_value)
            .ok_or_else(|| Error::MemberNotFound {
                kind: "method",
                name: name.to_string(),
                class: class.name().to_string(),
            })
    }

    /// Like [`MemberResolver::constructor_by_descriptor`], but absence is an error
    pub fn require_constructor(&self, class: &ClassRc, descriptor: &str) -> Result<ConstructorRc> {
        self.constructor_by_descriptor(class, descriptor)?
            .and_then(ClassMember::into_value)
            .ok_or_else(|| Error::MemberNotFound {
                kind: "constructor",
                name: descriptor.to_string(),
                class: class.name().to_string(),
            })
    }

    /// Resolve a field by name and wrap it in its cached access-checked handle
    pub fn field_handle(&self, class: &ClassRc, name: &str) -> Result<Arc<FieldHandle>> {
        Ok(self.handles.field(&self.require_field(class, name)?))
    }

    /// Resolve a method by name and wrap it in its cached access-checked handle
    pub fn method_handle(&self, class: &ClassRc, name: &str) -> Result<Arc<MethodHandle>> {
        Ok(self.handles.method(&self.require_method(class, name)?))
    }

    /// Resolve a constructor by descriptor and wrap it in its cached access-checked handle
    pub fn constructor_handle(
        &self,
        class: &ClassRc,
        descriptor: &str,
    ) -> Result<Arc<ConstructorHandle>> {
        Ok(self
            .handles
            .constructor(&self.require_constructor(class, descriptor)?))
    }
}
