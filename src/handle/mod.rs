//! Access-checked member handles and their cache.
//!
//! A handle is the *checked* surface over a member model: reads and writes through it
//! honour JVM-style access rules (non-public members reject callers, `final` fields
//! reject writes) unless the handle's accessibility override is in force. The raw model
//! mutators remain unchecked — they are the bytecode-editing surface.
//!
//! Handles are obtained through [`HandleCache`], which guarantees that resolving the
//! same underlying member twice yields the *same* handle instance (so an accessibility
//! override taken out by one caller is observed consistently), while holding its
//! entries weakly so it never pins members in memory.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Weak,
};

use dashmap::{mapref::entry::Entry, DashMap};

use crate::{
    model::{ConstantValue, ConstructorRc, FieldRc, MethodBody, MethodRc},
    Error, Result,
};

/// A reflective-style object whose access checks can be temporarily suppressed.
pub trait Accessible {
    /// Whether the accessibility override is currently in force
    fn is_accessible(&self) -> bool;

    /// Switch the accessibility override on or off
    fn set_accessible(&self, accessible: bool);
}

/// Access-checked view over a [`FieldRc`].
pub struct FieldHandle {
    field: FieldRc,
    accessible: AtomicBool,
}

impl FieldHandle {
    fn new(field: FieldRc) -> Self {
        FieldHandle {
            field,
            accessible: AtomicBool::new(false),
        }
    }

    /// The underlying field model
    #[must_use]
    pub fn field(&self) -> &FieldRc {
        &self.field
    }

    /// Read the field's compile-time constant.
    ///
    /// # Errors
    ///
    /// [`Error::AccessDenied`] when the field is not public and the accessibility
    /// override is not in force.
    pub fn get(&self) -> Result<Option<ConstantValue>> {
        self.check_access()?;
        Ok(self.field.constant())
    }

    /// Write the field's compile-time constant.
    ///
    /// # Errors
    ///
    /// [`Error::AccessDenied`] as for [`FieldHandle::get`], and [`Error::FinalField`]
    /// while the field's `final` flag is in place (clearing it is the job of
    /// [`crate::access::with_field_access`]).
    pub fn set(&self, value: Option<ConstantValue>) -> Result<()> {
        self.check_access()?;
        if self.field.flags().is_final() {
            return Err(Error::FinalField {
                field: self.field.signature(),
            });
        }
        self.field.set_constant(value);
        Ok(())
    }

    fn check_access(&self) -> Result<()> {
        if self.field.flags().is_public() || self.is_accessible() {
            return Ok(());
        }
        Err(Error::AccessDenied {
            member: self.field.signature(),
        })
    }
}

impl Accessible for FieldHandle {
    fn is_accessible(&self) -> bool {
        self.accessible.load(Ordering::Relaxed)
    }

    fn set_accessible(&self, accessible: bool) {
        self.accessible.store(accessible, Ordering::Relaxed);
    }
}

/// Access-checked view over a [`MethodRc`].
pub struct MethodHandle {
    method: MethodRc,
    accessible: AtomicBool,
}

impl MethodHandle {
    fn new(method: MethodRc) -> Self {
        MethodHandle {
            method,
            accessible: AtomicBool::new(false),
        }
    }

    /// The underlying method model
    #[must_use]
    pub fn method(&self) -> &MethodRc {
        &self.method
    }

    /// Read the method body
    pub fn body(&self) -> Result<Option<MethodBody>> {
        self.check_access()?;
        Ok(self.method.body())
    }

    /// Replace the method body
    pub fn set_body(&self, body: Option<MethodBody>) -> Result<()> {
        self.check_access()?;
        self.method.set_body(body);
        Ok(())
    }

    fn check_access(&self) -> Result<()> {
        if self.method.flags().is_public() || self.is_accessible() {
            return Ok(());
        }
        Err(Error::AccessDenied {
            member: self.method.signature(),
        })
    }
}

impl Accessible for MethodHandle {
    fn is_accessible(&self) -> bool {
        self.accessible.load(Ordering::Relaxed)
    }

    fn set_accessible(&self, accessible: bool) {
        self.accessible.store(accessible, Ordering::Relaxed);
    }
}

/// Access-checked view over a [`ConstructorRc`].
pub struct ConstructorHandle {
    constructor: ConstructorRc,
    accessible: AtomicBool,
}

impl ConstructorHandle {
    fn new(constructor: ConstructorRc) -> Self {
        ConstructorHandle {
            constructor,
            accessible: AtomicBool::new(false),
        }
    }

    /// The underlying constructor model
    #[must_use]
    pub fn constructor(&self) -> &ConstructorRc {
        &self.constructor
    }

    /// Read the constructor body
    pub fn body(&self) -> Result<Option<MethodBody>> {
        self.check_access()?;
        Ok(self.constructor.body())
    }

    /// Replace the constructor body
    pub fn set_body(&self, body: Option<MethodBody>) -> Result<()> {
        self.check_access()?;
        self.constructor.set_body(body);
        Ok(())
    }

    fn check_access(&self) -> Result<()> {
        if self.constructor.flags().is_public() || self.is_accessible() {
            return Ok(());
        }
        Err(Error::AccessDenied {
            member: self.constructor.signature(),
        })
    }
}

impl Accessible for ConstructorHandle {
    fn is_accessible(&self) -> bool {
        self.accessible.load(Ordering::Relaxed)
    }

    fn set_accessible(&self, accessible: bool) {
        self.accessible.store(accessible, Ordering::Relaxed);
    }
}

/// Weak-valued handle cache.
///
/// Maps member identity (the `Arc` pointer of the model) to its handle. Population is
/// atomic per key, so two concurrent resolutions of one member can never observe two
/// distinct handles; values are weak so a handle (and the member it wraps) can be
/// reclaimed once no caller holds it.
///
/// Per the caching design of this crate, the cache is a plain injectable value rather
/// than a process-wide singleton — tests and embedders create one per scope.
#[derive(Default)]
pub struct HandleCache {
    fields: DashMap<usize, Weak<FieldHandle>>,
    methods: DashMap<usize, Weak<MethodHandle>>,
    constructors: DashMap<usize, Weak<ConstructorHandle>>,
}

impl HandleCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        HandleCache::default()
    }

    /// The cached handle for `field`, created on first use
    #[must_use]
    pub fn field(&self, field: &FieldRc) -> Arc<FieldHandle> {
        let key = Arc::as_ptr(field) as usize;
        match self.fields.entry(key) {
            Entry::Occupied(mut occupied) => match occupied.get().upgrade() {
                Some(handle) => handle,
                None => {
                    let handle = Arc::new(FieldHandle::new(field.clone()));
                    occupied.insert(Arc::downgrade(&handle));
                    handle
                }
            },
            Entry::Vacant(vacant) => {
                let handle = Arc::new(FieldHandle::new(field.clone()));
                vacant.insert(Arc::downgrade(&handle));
                handle
            }
        }
    }

    /// The cached handle for `method`, created on first use
    #[must_use]
    pub fn method(&self, method: &MethodRc) -> Arc<MethodHandle> {
        let key = Arc::as_ptr(method) as usize;
        match self.methods.entry(key) {
            Entry::Occupied(mut occupied) => match occupied.get().upgrade() {
                Some(handle) => handle,
                None => {
                    let handle = Arc::new(MethodHandle::new(method.clone()));
                    occupied.insert(Arc::downgrade(&handle));
                    handle
                }
            },
            Entry::Vacant(vacant) => {
                let handle = Arc::new(MethodHandle::new(method.clone()));
                vacant.insert(Arc::downgrade(&handle));
                handle
            }
        }
    }

    /// The cached handle for `constructor`, created on first use
    #[must_use]
    pub fn constructor(&self, constructor: &ConstructorRc) -> Arc<ConstructorHandle> {
        let key = Arc::as_ptr(constructor) as usize;
        match self.constructors.entry(key) {
            Entry::Occupied(mut occupied) => match occupied.get().upgrade() {
                Some(handle) => handle,
                None => {
                    let handle = Arc::new(ConstructorHandle::new(constructor.clone()));
                    occupied.insert(Arc::downgrade(&handle));
                    handle
                }
            },
            Entry::Vacant(vacant) => {
                let handle = Arc::new(ConstructorHandle::new(constructor.clone()));
                vacant.insert(Arc::downgrade(&handle));
                handle
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AccessFlags, Field};

    #[test]
    fn test_cache_returns_identical_handle() {
        let cache = HandleCache::new();
        let field = Arc::new(Field::new("value", "I", AccessFlags::PRIVATE));

        let first = cache.field(&field);
        let second = cache.field(&field);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_cache_does_not_pin_handles() {
        let cache = HandleCache::new();
        let field = Arc::new(Field::new("value", "I", AccessFlags::PRIVATE));

        let first = cache.field(&field);
        let first_ptr = Arc::as_ptr(&first);
        drop(first);

        // the weak entry is dead now; a fresh handle is created in place
        let second = cache.field(&field);
        let _ = first_ptr;
        assert_eq!(Arc::strong_count(&second), 1);
    }

    #[test]
    fn test_private_field_rejects_unoverridden_access() {
        let cache = HandleCache::new();
        let field = Arc::new(Field::new("secret", "I", AccessFlags::PRIVATE));
        let handle = cache.field(&field);

        assert!(matches!(handle.get(), Err(Error::AccessDenied { .. })));

        handle.set_accessible(true);
        assert!(handle.get().is_ok());
        handle.set_accessible(false);
    }

    #[test]
    fn test_final_field_rejects_writes() {
        let cache = HandleCache::new();
        let field = Arc::new(Field::new(
            "constant",
            "I",
            AccessFlags::PUBLIC | AccessFlags::FINAL,
        ));
        let handle = cache.field(&field);

        assert!(matches!(
            handle.set(Some(ConstantValue::Int(1))),
            Err(Error::FinalField { .. })
        ));
    }
}
