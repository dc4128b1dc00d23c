//! Convenient re-exports of the most commonly used types and traits.
//!
//! This module provides a curated selection of the most frequently used types
//! from across the classweave library, allowing for convenient glob imports.

pub use crate::access::{with_access, with_field_access};
pub use crate::codegen::{
    AccessorGenerator, ClassDefiner, ClassLoader, ClassNameSupplier, DefinedClass,
    NameSupplierCache, SafeClassDefiner,
};
pub use crate::handle::{Accessible, ConstructorHandle, FieldHandle, HandleCache, MethodHandle};
pub use crate::mirror::{
    MirrorConfig, MirrorEngine, MirroringPolicy, MirroringTask, SuperclassPolicy,
};
pub use crate::model::{
    AccessFlags, ClassBuilder, ClassPool, ClassRc, ConstantValue, Constructor, Field, JvmClass,
    Method, MethodBody, OBJECT_CLASS,
};
pub use crate::search::{ClassMember, MemberResolver, SearchOutcome};
pub use crate::splice::Splicer;
pub use crate::{Error, Result};
