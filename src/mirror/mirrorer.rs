//! Member mirrorers: one-member copy operations closing over their source.

use crate::{
    model::{ClassRc, ConstructorRc, FieldRc, MethodRc},
    Result,
};

/// Copies one field onto an arbitrary target class.
///
/// An explicit initializer expression takes precedence; otherwise the copy keeps the
/// source field's directly attached initializer, falling back to the declaring class's
/// field-initializer association list.
#[derive(Debug, Clone)]
pub struct FieldMirrorer {
    source: FieldRc,
    initializer: Option<String>,
}

impl FieldMirrorer {
    /// Mirrorer for `source` with no initializer override
    #[must_use]
    pub fn new(source: FieldRc) -> Self {
        FieldMirrorer {
            source,
            initializer: None,
        }
    }

    /// Mirrorer for `source` with an explicit initializer expression.
    ///
    /// A blank expression is treated as "no override".
    #[must_use]
    pub fn with_initializer(source: FieldRc, expression: impl Into<String>) -> Self {
        let expression = expression.into();
        FieldMirrorer {
            source,
            initializer: (!expression.is_empty()).then_some(expression),
        }
    }

    /// The field this mirrorer copies
    #[must_use]
    pub fn source(&self) -> &FieldRc {
        &self.source
    }

    /// Copy the source field onto `target`
    pub fn mirror(&self, target: &ClassRc) -> Result<FieldRc> {
        let initializer = match &self.initializer {
            Some(expression) => Some(expression.clone()),
            // the structural copy itself carries a directly attached initializer,
            // so the association list is only consulted when there is none
            None => match self.source.initializer() {
                Some(_) => None,
                None => self
                    .source
                    .declaring()
                    .and_then(|class| class.field_initializer_for(self.source.name())),
            },
        };
        target.add_field(self.source.structural_copy(initializer))
    }
}

/// Copies one method onto an arbitrary target class.
#[derive(Debug, Clone)]
pub struct MethodMirrorer {
    source: MethodRc,
}

impl MethodMirrorer {
    /// Mirrorer for `source`
    #[must_use]
    pub fn new(source: MethodRc) -> Self {
        MethodMirrorer { source }
    }

    /// The method this mirrorer copies
    #[must_use]
    pub fn source(&self) -> &MethodRc {
        &self.source
    }

    /// Copy the source method onto `target`
    pub fn mirror(&self, target: &ClassRc) -> Result<MethodRc> {
        target.add_method(self.source.structural_copy())
    }
}

/// Copies one constructor or class initializer onto an arbitrary target class.
#[derive(Debug, Clone)]
pub struct ConstructorMirrorer {
    source: ConstructorRc,
}

impl ConstructorMirrorer {
    /// Mirrorer for `source`
    #[must_use]
    pub fn new(source: ConstructorRc) -> Self {
        ConstructorMirrorer { source }
    }

    /// The constructor this mirrorer copies
    #[must_use]
    pub fn source(&self) -> &ConstructorRc {
        &self.source
    }

    /// Copy the source constructor onto `target`
    pub fn mirror(&self, target: &ClassRc) -> Result<ConstructorRc> {
        target.add_constructor(self.source.structural_copy())
    }
}
