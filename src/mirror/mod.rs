//! Policy-driven member mirroring between class models.
//!
//! Mirroring copies members — fields, methods, constructors, class initializers — from
//! one or more *implementation* classes onto a *target* class, optionally attaching
//! *delegator* interfaces and a superclass to the target along the way.
//!
//! The pieces:
//!
//! - [`MirroringPolicy`] / [`MirrorMarkers`] / [`MirrorConfig`]: what gets selected,
//!   per member category
//! - [`MirrorEngine`]: turns an implementation class plus its configuration into
//!   concrete mirrorers
//! - [`FieldMirrorer`] / [`MethodMirrorer`] / [`ConstructorMirrorer`]: single-member
//!   copy operations
//! - [`MirroringTask`]: the ordered, one-shot unit of work applying everything to the
//!   target
//!
//! # Examples
//!
//! ```rust
//! use classweave::mirror::{MirrorEngine, MirroringPolicy, MirroringTask};
//! use classweave::model::{AccessFlags, ClassBuilder, ClassPool, Method};
//!
//! let pool = ClassPool::new();
//! let greeter = ClassBuilder::new("com.example.Greeter")
//!     .interface()
//!     .method(Method::new("greet", "()V", AccessFlags::PUBLIC | AccessFlags::ABSTRACT))
//!     .build(&pool)?;
//! let implementation = ClassBuilder::new("com.example.GreeterImpl")
//!     .implements("com.example.Greeter")
//!     .mirror_all(MirroringPolicy::All)
//!     .method(Method::new("greet", "()V", AccessFlags::PUBLIC))
//!     .build(&pool)?;
//! let target = ClassBuilder::new("com.example.Target").build(&pool)?;
//!
//! let engine = MirrorEngine::new(&pool);
//! let task = engine
//!     .task_builder_from(
//!         MirroringTask::builder(target.clone()),
//!         &[greeter],
//!         &[implementation],
//!     )?
//!     .build();
//! task.run()?;
//!
//! assert_eq!(target.interface_names(), vec!["com.example.Greeter".to_string()]);
//! assert_eq!(target.methods.count(), 1);
//! # Ok::<(), classweave::Error>(())
//! ```

mod engine;
mod mirrorer;
mod policy;
mod task;

pub use engine::MirrorEngine;
pub use mirrorer::{ConstructorMirrorer, FieldMirrorer, MethodMirrorer};
pub use policy::{MirrorConfig, MirrorMarkers, MirroringPolicy};
pub use task::{MirrorCallback, MirroringTask, MirroringTaskBuilder, SuperclassPolicy};
