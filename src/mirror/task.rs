//! The one-shot mirroring task.

use strum::Display;

use crate::{
    mirror::{ConstructorMirrorer, FieldMirrorer, MethodMirrorer},
    model::{ClassRc, OBJECT_CLASS},
    Error, Result,
};

/// Resolves the case where more than one non-interface delegator is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SuperclassPolicy {
    /// Reject the second superclass, naming both
    Fail,
    /// Silently keep the first-attached superclass
    UseFirst,
    /// Replace the superclass; the most recently accepted one wins
    UseLast,
}

impl Default for SuperclassPolicy {
    fn default() -> Self {
        SuperclassPolicy::Fail
    }
}

/// A post-mirroring side-effect hook.
pub type MirrorCallback = Box<dyn FnOnce(&ClassRc) -> Result<()> + Send>;

/// An ordered, one-shot unit of mirroring work.
///
/// Built once via [`MirroringTask::builder`] and consumed by [`MirroringTask::run`]:
///
/// 1. a frozen target is defrosted when allowed, rejected otherwise;
/// 2. delegators are attached — interfaces unconditionally, classes as the superclass
///    subject to the [`SuperclassPolicy`];
/// 3. mirrorers are applied in fixed order: methods, fields, constructors, class
///    initializers;
/// 4. callbacks run in registration order.
///
/// Attaching a superclass never splices constructor-chain calls into the target's
/// existing constructors; instances of a mirrored class are only as initialized as its
/// own constructors make them.
pub struct MirroringTask {
    target: ClassRc,
    allow_defrost: bool,
    delegators: Vec<ClassRc>,
    superclass_policy: SuperclassPolicy,
    fields: Vec<FieldMirrorer>,
    methods: Vec<MethodMirrorer>,
    constructors: Vec<ConstructorMirrorer>,
    initializers: Vec<ConstructorMirrorer>,
    callbacks: Vec<MirrorCallback>,
    fail_on_callback_error: bool,
}

impl MirroringTask {
    /// Start building a task mutating `target`
    #[must_use]
    pub fn builder(target: ClassRc) -> MirroringTaskBuilder {
        MirroringTaskBuilder {
            target,
            allow_defrost: false,
            delegators: Vec::new(),
            superclass_policy: SuperclassPolicy::default(),
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            initializers: Vec::new(),
            callbacks: Vec::new(),
            fail_on_callback_error: true,
        }
    }

    /// The class this task mutates
    #[must_use]
    pub fn target(&self) -> &ClassRc {
        &self.target
    }

    /// Execute the task, consuming it.
    ///
    /// # Errors
    ///
    /// [`Error::Frozen`] when the target is frozen and defrosting is not allowed;
    /// [`Error::SuperclassConflict`] under [`SuperclassPolicy::Fail`] — raised before
    /// any member is mirrored; any error from a mirrorer; any error from a callback
    /// when callback failures are fatal.
    pub fn run(self) -> Result<()> {
        if self.target.is_frozen() {
            if self.allow_defrost {
                self.target.defrost();
            } else {
                return Err(Error::Frozen(self.target.name().to_string()));
            }
        }

        for delegator in &self.delegators {
            if delegator.is_interface() {
                self.target.add_interface(delegator.name())?;
                continue;
            }

            let existing = self.target.super_name();
            let unset = matches!(existing.as_deref(), None | Some(OBJECT_CLASS));
            if unset {
                self.target.set_super_name(delegator.name())?;
            } else {
                match self.superclass_policy {
                    SuperclassPolicy::Fail => {
                        return Err(Error::SuperclassConflict {
                            target: self.target.name().to_string(),
                            existing: existing.unwrap_or_default(),
                            conflicting: delegator.name().to_string(),
                        });
                    }
                    SuperclassPolicy::UseFirst => {}
                    SuperclassPolicy::UseLast => {
                        self.target.set_super_name(delegator.name())?;
                    }
                }
            }
        }

        for method in &self.methods {
            method.mirror(&self.target)?;
        }
        for field in &self.fields {
            field.mirror(&self.target)?;
        }
        for constructor in &self.constructors {
            constructor.mirror(&self.target)?;
        }
        for initializer in &self.initializers {
            initializer.mirror(&self.target)?;
        }

        for callback in self.callbacks {
            if let Err(error) = callback(&self.target) {
                if self.fail_on_callback_error {
                    return Err(error);
                }
            }
        }

        Ok(())
    }
}

/// Builder for [`MirroringTask`].
pub struct MirroringTaskBuilder {
    target: ClassRc,
    allow_defrost: bool,
    delegators: Vec<ClassRc>,
    superclass_policy: SuperclassPolicy,
    fields: Vec<FieldMirrorer>,
    methods: Vec<MethodMirrorer>,
    constructors: Vec<ConstructorMirrorer>,
    initializers: Vec<ConstructorMirrorer>,
    callbacks: Vec<MirrorCallback>,
    fail_on_callback_error: bool,
}

impl MirroringTaskBuilder {
    /// Permit defrosting a frozen target
    #[must_use]
    pub fn allow_defrost(mut self, allow: bool) -> Self {
        self.allow_defrost = allow;
        self
    }

    /// Attach one delegator (an interface to implement or a superclass candidate)
    #[must_use]
    pub fn delegator(mut self, delegator: ClassRc) -> Self {
        self.delegators.push(delegator);
        self
    }

    /// Attach several delegators, in order
    #[must_use]
    pub fn delegators(mut self, delegators: impl IntoIterator<Item = ClassRc>) -> Self {
        self.delegators.extend(delegators);
        self
    }

    /// Choose how a second superclass candidate is resolved
    #[must_use]
    pub fn superclass_policy(mut self, policy: SuperclassPolicy) -> Self {
        self.superclass_policy = policy;
        self
    }

    /// Add one field mirrorer
    #[must_use]
    pub fn field(mut self, mirrorer: FieldMirrorer) -> Self {
        self.fields.push(mirrorer);
        self
    }

    /// Add several field mirrorers
    #[must_use]
    pub fn fields(mut self, mirrorers: impl IntoIterator<Item = FieldMirrorer>) -> Self {
        self.fields.extend(mirrorers);
        self
    }

    /// Add one method mirrorer
    #[must_use]
    pub fn method(mut self, mirrorer: MethodMirrorer) -> Self {
        self.methods.push(mirrorer);
        self
    }

    /// Add several method mirrorers
    #[must_use]
    pub fn methods(mut self, mirrorers: impl IntoIterator<Item = MethodMirrorer>) -> Self {
        self.methods.extend(mirrorers);
        self
    }

    /// Add one constructor mirrorer
    #[must_use]
    pub fn constructor(mut self, mirrorer: ConstructorMirrorer) -> Self {
        self.constructors.push(mirrorer);
        self
    }

    /// Add several constructor mirrorers
    #[must_use]
    pub fn constructors(
        mut self,
        mirrorers: impl IntoIterator<Item = ConstructorMirrorer>,
    ) -> Self {
        self.constructors.extend(mirrorers);
        self
    }

    /// Add one class-initializer mirrorer
    #[must_use]
    pub fn initializer(mut self, mirrorer: ConstructorMirrorer) -> Self {
        self.initializers.push(mirrorer);
        self
    }

    /// Add several class-initializer mirrorers
    #[must_use]
    pub fn initializers(
        mut self,
        mirrorers: impl IntoIterator<Item = ConstructorMirrorer>,
    ) -> Self {
        self.initializers.extend(mirrorers);
        self
    }

    /// Register a post-mirroring callback; callbacks run in registration order
    #[must_use]
    pub fn callback(
        mut self,
        callback: impl FnOnce(&ClassRc) -> Result<()> + Send + 'static,
    ) -> Self {
        self.callbacks.push(Box::new(callback));
        self
    }

    /// Whether a callback error aborts the task (default) or is swallowed so the
    /// remaining callbacks still run
    #[must_use]
    pub fn fail_on_callback_error(mut self, fail: bool) -> Self {
        self.fail_on_callback_error = fail;
        self
    }

    /// Finish building the task
    #[must_use]
    pub fn build(self) -> MirroringTask {
        MirroringTask {
            target: self.target,
            allow_defrost: self.allow_defrost,
            delegators: self.delegators,
            superclass_policy: self.superclass_policy,
            fields: self.fields,
            methods: self.methods,
            constructors: self.constructors,
            initializers: self.initializers,
            callbacks: self.callbacks,
            fail_on_callback_error: self.fail_on_callback_error,
        }
    }
}
