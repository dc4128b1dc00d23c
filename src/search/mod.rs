//! Hierarchy-aware member search.
//!
//! Three layers build on each other:
//!
//! - [`SearchOutcome`] / [`ClassMember`]: the value objects a probe and a finished
//!   search produce
//! - [`walker`]: the recursive ancestor walk with its two traversal modes
//! - [`MemberResolver`]: predicate-driven field/method/constructor resolution plus
//!   by-name conveniences
//!
//! The central distinction: a probe returning `None` means *"nothing here, keep
//! walking"*, while a probe returning a [`SearchOutcome`] means *"stop, this is the
//! answer"* — even when the outcome's payload is itself empty.

pub mod walker;

mod resolver;

pub use resolver::MemberResolver;

use crate::model::ClassRc;

/// An immutable value container which may hold a value (including an empty slot).
///
/// Returned by probes to signal that the search is over. [`SearchOutcome::empty`]
/// still terminates a walk; it merely reports that the located slot carries no value.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome<T> {
    value: Option<T>,
}

impl<T> SearchOutcome<T> {
    /// An outcome carrying `value`
    pub fn of(value: T) -> Self {
        SearchOutcome { value: Some(value) }
    }

    /// An outcome carrying nothing — the search still stops
    #[must_use]
    pub fn empty() -> Self {
        SearchOutcome { value: None }
    }

    /// Whether the outcome carries no value
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    /// Borrow the carried value
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Consume the outcome, yielding the carried value
    #[must_use]
    pub fn into_value(self) -> Option<T> {
        self.value
    }
}

/// A member located somewhere in a class hierarchy.
///
/// `owner` is the specific class or interface the member was found *in*, which is not
/// necessarily the class the search started from.
#[derive(Debug, Clone)]
pub struct ClassMember<R> {
    owner: ClassRc,
    value: Option<R>,
}

impl<R> ClassMember<R> {
    /// Pair an owner with the (possibly empty) found value
    pub fn new(owner: ClassRc, value: Option<R>) -> Self {
        ClassMember { owner, value }
    }

    /// The class or interface the member was located in
    #[must_use]
    pub fn owner(&self) -> &ClassRc {
        &self.owner
    }

    /// Borrow the located member
    #[must_use]
    pub fn value(&self) -> Option<&R> {
        self.value.as_ref()
    }

    /// Consume, yielding the located member
    #[must_use]
    pub fn into_value(self) -> Option<R> {
        self.value
    }

    /// Consume, yielding both owner and member
    #[must_use]
    pub fn into_parts(self) -> (ClassRc, Option<R>) {
        (self.owner, self.value)
    }
}
