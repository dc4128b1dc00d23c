use thiserror::Error;

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// The taxonomy follows the failure modes of the engine: lookups that miss, structural
/// conflicts while editing class models, access-control rejections, and class-definition
/// collisions. Search misses are *not* errors (they surface as `Option`); only callers that
/// require presence convert absence into [`Error::MemberNotFound`].
///
/// No operation in this crate retries; every error is surfaced synchronously to the caller.
#[derive(Error, Debug)]
pub enum Error {
    /// No class with the given qualified name is registered in the pool.
    ///
    /// Raised by pool lookups and by hierarchy walks that encounter a superclass or
    /// interface name whose model was never registered.
    #[error("class not found in pool - {0}")]
    ClassNotFound(String),

    /// A class with the given qualified name is already registered in the pool.
    #[error("class already present in pool - {0}")]
    ClassExists(String),

    /// A member lookup that requires presence found nothing within the search bound.
    #[error("no {kind} named '{name}' found in hierarchy of {class}")]
    MemberNotFound {
        /// Member category that was searched for ("field", "method" or "constructor")
        kind: &'static str,
        /// The name (or descriptor) the search was keyed on
        name: String,
        /// The class the search started from
        class: String,
    },

    /// An attempt was made to add a member whose signature already exists on the class.
    #[error("duplicate member {member} in class {class}")]
    DuplicateMember {
        /// The class being edited
        class: String,
        /// The conflicting member signature
        member: String,
    },

    /// The class model is frozen and the requested edit is not allowed.
    ///
    /// Freezing happens on materialization; a mirroring task may defrost a frozen
    /// target when explicitly permitted to.
    #[error("{0} is frozen and defrosting is not allowed")]
    Frozen(String),

    /// More than one non-interface delegator was supplied and the conflict policy forbids it.
    #[error("conflicting superclasses for {target}: {existing} is already set, cannot attach {conflicting}")]
    SuperclassConflict {
        /// The class being mirrored onto
        target: String,
        /// The superclass that is already attached
        existing: String,
        /// The superclass whose attachment was rejected
        conflicting: String,
    },

    /// A member was read or written through a handle without sufficient accessibility.
    #[error("member {member} is not accessible")]
    AccessDenied {
        /// Signature of the rejected member
        member: String,
    },

    /// A write was attempted on a field whose `final` flag is still in place.
    #[error("field {field} is final and cannot be written")]
    FinalField {
        /// Signature of the rejected field
        field: String,
    },

    /// A generated class name was defined twice in the same loader delegation.
    #[error("class {0} is already defined")]
    AlreadyDefined(String),

    /// A class-file emission limit was exceeded (constant pool or code size overflow).
    #[error("class file emission failed - {0}")]
    Emission(String),

    /// Failed to lock target.
    ///
    /// Raised when a per-name definition lock is poisoned by a panicking holder.
    #[error("failed to lock target")]
    LockError,

    /// Generic error for miscellaneous failures.
    ///
    /// Used primarily by caller-supplied probes and mirroring callbacks that have no
    /// more specific variant to report.
    #[error("{0}")]
    Error(String),
}
