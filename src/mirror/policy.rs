//! Mirroring policies and their per-class resolution.

use strum::Display;

use crate::model::JvmClass;

/// How members of one category are selected for mirroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum MirroringPolicy {
    /// No members should be mirrored
    None,
    /// Only visible (public, including inherited) members should be mirrored
    Visible,
    /// Only members related to implementing one of the configured interfaces
    /// should be mirrored
    Implementing,
    /// Only individually marked members should be mirrored
    Annotated,
    /// Each member should be mirrored
    All,
}

impl Default for MirroringPolicy {
    /// The value a category marker carries when set without an explicit policy
    fn default() -> Self {
        MirroringPolicy::All
    }
}

/// Per-class mirror markers, as attached to a [`JvmClass`].
///
/// `all` is the catch-all marker; category-specific markers override it. A category
/// with no marker at all resolves to [`MirroringPolicy::Annotated`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MirrorMarkers {
    /// Catch-all policy for every category unless overridden
    pub all: Option<MirroringPolicy>,
    /// Fields-specific policy
    pub fields: Option<MirroringPolicy>,
    /// Methods-specific policy
    pub methods: Option<MirroringPolicy>,
    /// Constructors-specific policy
    pub constructors: Option<MirroringPolicy>,
    /// Whether class initializers are mirrored
    pub initializers: Option<bool>,
}

/// The fully resolved mirroring configuration of one implementation class.
///
/// This is the explicit value the engine works from; it can be resolved from a class's
/// markers via [`MirrorConfig::resolve`] or constructed directly, which keeps the
/// engine independent of any particular metadata mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MirrorConfig {
    /// Policy applied to fields
    pub fields: MirroringPolicy,
    /// Policy applied to methods
    pub methods: MirroringPolicy,
    /// Policy applied to instance constructors
    pub constructors: MirroringPolicy,
    /// Whether class initializers are mirrored
    pub initializers: bool,
}

impl MirrorConfig {
    /// Resolve the configuration from a class's markers.
    ///
    /// Precedence per category: category-specific marker, else the catch-all marker,
    /// else [`MirroringPolicy::Annotated`]. Class-initializer mirroring defaults to off.
    #[must_use]
    pub fn resolve(class: &JvmClass) -> Self {
        let markers = class.mirror_markers();
        let fallback = markers.all.unwrap_or(MirroringPolicy::Annotated);
        MirrorConfig {
            fields: markers.fields.unwrap_or(fallback),
            methods: markers.methods.unwrap_or(fallback),
            constructors: markers.constructors.unwrap_or(fallback),
            initializers: markers.initializers.unwrap_or(false),
        }
    }

    /// A configuration applying one policy to every member category
    #[must_use]
    pub fn uniform(policy: MirroringPolicy) -> Self {
        MirrorConfig {
            fields: policy,
            methods: policy,
            constructors: policy,
            initializers: false,
        }
    }
}

impl Default for MirrorConfig {
    fn default() -> Self {
        MirrorConfig::uniform(MirroringPolicy::Annotated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClassBuilder, ClassPool};

    #[test]
    fn test_unmarked_class_resolves_to_annotated() {
        let pool = ClassPool::new();
        let class = ClassBuilder::new("com.example.Bare").build(&pool).unwrap();

        let config = MirrorConfig::resolve(&class);
        assert_eq!(config.fields, MirroringPolicy::Annotated);
        assert_eq!(config.methods, MirroringPolicy::Annotated);
        assert_eq!(config.constructors, MirroringPolicy::Annotated);
        assert!(!config.initializers);
    }

    #[test]
    fn test_category_marker_overrides_catch_all() {
        let pool = ClassPool::new();
        let class = ClassBuilder::new("com.example.Marked")
            .mirror_all(MirroringPolicy::None)
            .mirror_fields(MirroringPolicy::All)
            .build(&pool)
            .unwrap();

        let config = MirrorConfig::resolve(&class);
        assert_eq!(config.fields, MirroringPolicy::All);
        assert_eq!(config.methods, MirroringPolicy::None);
        assert_eq!(config.constructors, MirroringPolicy::None);
    }

    #[test]
    fn test_marker_default_value_is_all() {
        assert_eq!(MirroringPolicy::default(), MirroringPolicy::All);
    }
}
