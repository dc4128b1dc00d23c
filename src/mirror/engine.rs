//! Collects member mirrorers from implementation classes according to their
//! resolved mirroring configuration.

use crate::{
    mirror::{
        ConstructorMirrorer, FieldMirrorer, MethodMirrorer, MirrorConfig, MirroringPolicy,
        MirroringTaskBuilder,
    },
    model::{ClassPool, ClassRc, ConstructorRc, FieldRc, MethodRc},
    Result,
};

/// Classifies the members of implementation classes and produces the mirrorers a
/// [`MirroringTask`](crate::mirror::MirroringTask) will apply.
///
/// For the `Implementing` policy a member is eligible iff its declaring class is among,
/// or transitively implements, one of the configured interfaces.
pub struct MirrorEngine<'a> {
    pool: &'a ClassPool,
}

impl<'a> MirrorEngine<'a> {
    /// Create an engine resolving hierarchy links through `pool`
    #[must_use]
    pub fn new(pool: &'a ClassPool) -> Self {
        MirrorEngine { pool }
    }

    /// Field mirrorers of `class` under `config`.
    ///
    /// Every selected field that carries an initializer-expression override produces a
    /// mirrorer honouring it; a blank override falls back to the association-list
    /// lookup at mirror time.
    pub fn field_mirrorers(
        &self,
        class: &ClassRc,
        config: &MirrorConfig,
        interfaces: &[ClassRc],
    ) -> Result<Vec<FieldMirrorer>> {
        if config.fields == MirroringPolicy::None {
            return Ok(Vec::new());
        }

        let fields: Vec<FieldRc> = match config.fields {
            MirroringPolicy::Visible => class.visible_fields(self.pool)?,
            MirroringPolicy::All => class.fields.iter().map(|(_, f)| f.clone()).collect(),
            MirroringPolicy::Implementing => {
                let mut selected = Vec::new();
                for (_, field) in class.fields.iter() {
                    if self.member_implements(field.declaring(), interfaces)? {
                        selected.push(field.clone());
                    }
                }
                selected
            }
            _ => class
                .fields
                .iter()
                .filter(|(_, f)| f.is_mirrored())
                .map(|(_, f)| f.clone())
                .collect(),
        };

        Ok(fields
            .into_iter()
            .map(|field| {
                let expression = field.mirror_initializer().map(str::to_string);
                match expression {
                    Some(expression) => FieldMirrorer::with_initializer(field, expression),
                    None => FieldMirrorer::new(field),
                }
            })
            .collect())
    }

    /// Method mirrorers of `class` under `config`
    pub fn method_mirrorers(
        &self,
        class: &ClassRc,
        config: &MirrorConfig,
        interfaces: &[ClassRc],
    ) -> Result<Vec<MethodMirrorer>> {
        if config.methods == MirroringPolicy::None {
            return Ok(Vec::new());
        }

        let methods: Vec<MethodRc> = match config.methods {
            MirroringPolicy::Visible => class.visible_methods(self.pool)?,
            MirroringPolicy::All => class.methods.iter().map(|(_, m)| m.clone()).collect(),
            MirroringPolicy::Implementing => {
                let mut selected = Vec::new();
                for (_, method) in class.methods.iter() {
                    if self.member_implements(method.declaring(), interfaces)? {
                        selected.push(method.clone());
                    }
                }
                selected
            }
            _ => class
                .methods
                .iter()
                .filter(|(_, m)| m.is_mirrored())
                .map(|(_, m)| m.clone())
                .collect(),
        };

        Ok(methods.into_iter().map(MethodMirrorer::new).collect())
    }

    /// Instance-constructor mirrorers of `class` under `config`.
    ///
    /// Class initializers are never selected here; see
    /// [`MirrorEngine::initializer_mirrorers`].
    pub fn constructor_mirrorers(
        &self,
        class: &ClassRc,
        config: &MirrorConfig,
        interfaces: &[ClassRc],
    ) -> Result<Vec<ConstructorMirrorer>> {
        if config.constructors == MirroringPolicy::None {
            return Ok(Vec::new());
        }

        let constructors: Vec<ConstructorRc> = match config.constructors {
            MirroringPolicy::Visible => class
                .constructors
                .iter()
                .filter(|(_, c)| c.is_constructor() && c.flags().is_public())
                .map(|(_, c)| c.clone())
                .collect(),
            MirroringPolicy::All => class
                .constructors
                .iter()
                .filter(|(_, c)| c.is_constructor())
                .map(|(_, c)| c.clone())
                .collect(),
            MirroringPolicy::Implementing => {
                let mut selected = Vec::new();
                for (_, constructor) in class.constructors.iter() {
                    if constructor.is_constructor()
                        && self.member_implements(constructor.declaring(), interfaces)?
                    {
                        selected.push(constructor.clone());
                    }
                }
                selected
            }
            _ => class
                .constructors
                .iter()
                .filter(|(_, c)| c.is_constructor() && c.is_mirrored())
                .map(|(_, c)| c.clone())
                .collect(),
        };

        Ok(constructors
            .into_iter()
            .map(ConstructorMirrorer::new)
            .collect())
    }

    /// Class-initializer mirrorers of `class`, empty unless the configuration
    /// enables them
    #[must_use]
    pub fn initializer_mirrorers(
        &self,
        class: &ClassRc,
        config: &MirrorConfig,
    ) -> Vec<ConstructorMirrorer> {
        if !config.initializers {
            return Vec::new();
        }
        class
            .constructors
            .iter()
            .filter(|(_, c)| c.is_class_initializer())
            .map(|(_, c)| ConstructorMirrorer::new(c.clone()))
            .collect()
    }

    /// Extend `builder` with the delegators and with every mirrorer the
    /// implementation classes produce under their own resolved configurations.
    pub fn task_builder_from(
        &self,
        mut builder: MirroringTaskBuilder,
        delegators: &[ClassRc],
        implementations: &[ClassRc],
    ) -> Result<MirroringTaskBuilder> {
        builder = builder.delegators(delegators.iter().cloned());

        let interfaces: Vec<ClassRc> = delegators
            .iter()
            .filter(|d| d.is_interface())
            .cloned()
            .collect();

        for implementation in implementations {
            let config = MirrorConfig::resolve(implementation);
            builder = builder
                .fields(self.field_mirrorers(implementation, &config, &interfaces)?)
                .methods(self.method_mirrorers(implementation, &config, &interfaces)?)
                .constructors(self.constructor_mirrorers(implementation, &config, &interfaces)?)
                .initializers(self.initializer_mirrorers(implementation, &config));
        }

        Ok(builder)
    }

    fn member_implements(
        &self,
        declaring: Option<ClassRc>,
        interfaces: &[ClassRc],
    ) -> Result<bool> {
        let Some(declaring) = declaring else {
            return Ok(false);
        };
        for interface in interfaces {
            if declaring.implements(self.pool, interface.name())? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
