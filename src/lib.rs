// Copyright 2025 The classweave contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]

//! # classweave
//!
//! An in-memory JVM class model engine: hierarchy-aware member resolution, scoped
//! access overrides, policy-driven member mirroring between class models, and
//! synthesis of small version-52 accessor classes with safe definition into loader
//! namespaces.
//!
//! ## Features
//!
//! - **🔍 Hierarchy-aware member search** - Predicate-driven field/method/constructor
//!   resolution with bounded superclass and interface walks
//! - **🔓 Scoped access overrides** - Guaranteed-restoring suppression of access
//!   checks, including defeating `final` on fields
//! - **🪞 Member mirroring** - Copy fields, methods, constructors and class
//!   initializers between classes under per-category policies
//! - **🔧 Class synthesis** - Emit version-52 class files and define generated
//!   accessor classes with per-name definition locking
//! - **🛡️ Memory safe** - Weak-valued caches, no process-wide singletons, explicit
//!   error handling throughout
//!
//! ## Quick Start
//!
//! ```rust
//! use classweave::prelude::*;
//!
//! let pool = ClassPool::new();
//! let handles = HandleCache::new();
//!
//! ClassBuilder::new("com.example.Base")
//!     .field(Field::new("state", "I", AccessFlags::PROTECTED))
//!     .build(&pool)?;
//! let derived = ClassBuilder::new("com.example.Derived")
//!     .extends("com.example.Base")
//!     .build(&pool)?;
//!
//! // resolve an inherited member; the owner is the class that declares it
//! let resolver = MemberResolver::new(&pool, &handles);
//! let member = resolver.field_by_name(&derived, "state")?.expect("inherited");
//! assert_eq!(member.owner().name(), "com.example.Base");
//! # Ok::<(), classweave::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`model`] - Class models, member models, the class pool and its builder
//! - [`search`] - The hierarchy walkers and the member-resolution facade
//! - [`access`] - Scoped accessibility and `final`-defeating overrides
//! - [`handle`] - Access-checked member handles and their weak-valued cache
//! - [`mirror`] - Mirroring policies, the member-classification engine and the
//!   one-shot mirroring task
//! - [`splice`] - Interface-implementation splicing over the pool
//! - [`codegen`] - Class-file emission, accessor synthesis and safe class definition
//!
//! ## Concurrency
//!
//! The core operations — hierarchy walks, mirroring-task execution, splicing — are
//! synchronous and single-threaded. The shared infrastructure around them (the class
//! pool, the handle cache, the name-supplier cache, the definer's loader map) is safe
//! for concurrent use; mutating the *same* class model from several threads at once is
//! the caller's responsibility to serialize.
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, Error>`](Result). Search misses are not
//! errors; they surface as `Option` and only the `require_*` accessors convert absence
//! into [`Error::MemberNotFound`]. Nothing is retried anywhere.

pub(crate) mod error;

/// Shared functionality which is used in unit- and integration-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use classweave::prelude::*;
///
/// let pool = ClassPool::new();
/// assert!(pool.contains("java.lang.Object"));
/// ```
pub mod prelude;

/// Scoped, guaranteed-restoring access overrides
pub mod access;

/// Class-file emission, accessor synthesis, name supply and safe class definition
pub mod codegen;

/// Access-checked member handles and their weak-valued cache
pub mod handle;

/// Policy-driven member mirroring between class models
pub mod mirror;

/// Class models, member models, the class pool and its builder
pub mod model;

/// Hierarchy walkers and the member-resolution facade
pub mod search;

/// Interface-implementation splicing over the class pool
pub mod splice;

/// `classweave` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always
/// [`Error`]. Used consistently throughout the crate for all fallible operations.
pub type Result<T> = std::result::Result<T, Error>;

/// `classweave` Error type
///
/// The main error type for all operations in this crate.
pub use error::Error;

/// The class pool, main entry point for assembling and resolving class models.
///
/// See [`model::ClassPool`].
pub use model::ClassPool;
