//! Scoped, guaranteed-restoring access overrides.
//!
//! [`with_access`] runs an operation with a handle's accessibility override in force
//! and restores the previous state afterwards, whatever the operation's outcome.
//! [`with_field_access`] additionally defeats a field's `final` flag for the duration
//! of the operation by patching the raw modifiers word — the restore nesting is fixed:
//! accessibility is restored first (inner), the modifiers word second (outer).
//! Reversing that order could leave a field permanently non-final if the operation
//! fails between the two restores.
//!
//! Restores run from drop guards, so they also hold across panics. Errors raised by
//! the operation propagate unmodified after the restores have run.
//!
//! # Examples
//!
//! ```rust
//! use classweave::access;
//! use classweave::handle::{Accessible, HandleCache};
//! use classweave::model::{AccessFlags, ConstantValue, Field};
//! use std::sync::Arc;
//!
//! let cache = HandleCache::new();
//! let field = Arc::new(
//!     Field::new("limit", "I", AccessFlags::PRIVATE | AccessFlags::FINAL)
//!         .with_constant(ConstantValue::Int(10)),
//! );
//! let handle = cache.field(&field);
//!
//! // a direct write is rejected twice over: private and final
//! assert!(handle.set(Some(ConstantValue::Int(20))).is_err());
//!
//! access::with_field_access(&handle, |h| h.set(Some(ConstantValue::Int(20))))?;
//!
//! // both the final flag and the accessibility override are back in place
//! assert!(field.flags().is_final());
//! assert!(!handle.is_accessible());
//! assert_eq!(field.constant(), Some(ConstantValue::Int(20)));
//! # Ok::<(), classweave::Error>(())
//! ```

use crate::{
    handle::{Accessible, FieldHandle},
    model::{AccessFlags, FieldRc},
    Result,
};

struct AccessRestore<'a, H: Accessible>(&'a H);

impl<H: Accessible> Drop for AccessRestore<'_, H> {
    fn drop(&mut self) {
        self.0.set_accessible(false);
    }
}

struct FlagsRestore<'a> {
    field: &'a FieldRc,
    original: u32,
}

impl Drop for FlagsRestore<'_> {
    fn drop(&mut self) {
        self.field.store_raw_flags(self.original);
    }
}

/// Run `operation` with the handle's accessibility override in force.
///
/// When the handle is already accessible the operation runs directly and nothing is
/// restored afterwards; otherwise the override is switched on for the duration of the
/// call and switched back off regardless of outcome.
pub fn with_access<H, R, F>(handle: &H, operation: F) -> Result<R>
where
    H: Accessible,
    F: FnOnce(&H) -> Result<R>,
{
    if handle.is_accessible() {
        return operation(handle);
    }

    handle.set_accessible(true);
    let _restore = AccessRestore(handle);
    operation(handle)
}

/// Run `operation` on a field handle with both accessibility and, when needed, the
/// field's `final` flag suspended.
///
/// The `final` bit is cleared through the raw modifiers word before the scoped access
/// begins and the original word is restored after the accessibility override has been
/// reset (outer restore).
pub fn with_field_access<R, F>(handle: &FieldHandle, operation: F) -> Result<R>
where
    F: FnOnce(&FieldHandle) -> Result<R>,
{
    let original = handle.field().raw_flags();
    if AccessFlags::from_bits_truncate(original).is_final() {
        handle
            .field()
            .store_raw_flags(original & !AccessFlags::FINAL.bits());
        let _modifiers = FlagsRestore {
            field: handle.field(),
            original,
        };
        return with_access(handle, operation);
    }

    with_access(handle, operation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        handle::HandleCache,
        model::{AccessFlags, ConstantValue, Field},
        Error,
    };
    use std::sync::Arc;

    fn private_final_field() -> Arc<Field> {
        Arc::new(
            Field::new("id", "J", AccessFlags::PRIVATE | AccessFlags::FINAL)
                .with_constant(ConstantValue::Long(1)),
        )
    }

    #[test]
    fn test_access_restored_after_success() {
        let cache = HandleCache::new();
        let field = private_final_field();
        let handle = cache.field(&field);

        let value = with_field_access(&handle, |h| h.get()).unwrap();
        assert_eq!(value, Some(ConstantValue::Long(1)));
        assert!(!handle.is_accessible());
        assert!(field.flags().is_final());
    }

    #[test]
    fn test_access_restored_after_failure() {
        let cache = HandleCache::new();
        let field = private_final_field();
        let handle = cache.field(&field);

        let result: Result<()> = with_field_access(&handle, |_| {
            Err(Error::Error("operation failed".to_string()))
        });
        assert!(result.is_err());
        assert!(!handle.is_accessible());
        assert!(field.flags().is_final());
        assert!(field.flags().is_private());
    }

    #[test]
    fn test_write_through_override_lands() {
        let cache = HandleCache::new();
        let field = private_final_field();
        let handle = cache.field(&field);

        with_field_access(&handle, |h| h.set(Some(ConstantValue::Long(99)))).unwrap();
        assert_eq!(field.constant(), Some(ConstantValue::Long(99)));
        assert!(field.flags().is_final());
    }

    #[test]
    fn test_already_accessible_handle_is_left_accessible() {
        let cache = HandleCache::new();
        let field = Arc::new(Field::new("open", "I", AccessFlags::PRIVATE));
        let handle = cache.field(&field);

        handle.set_accessible(true);
        with_access(&handle, |h| h.get()).unwrap();
        assert!(handle.is_accessible());
    }
}
