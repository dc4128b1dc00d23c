//! Field, method and constructor models.
//!
//! Members are shared as `Arc` values ([`FieldRc`], [`MethodRc`], [`ConstructorRc`]) and carry
//! a weak back-reference to their declaring class through [`ClassRef`], preventing reference
//! cycles between a class and its member lists. Flags live in an atomic word so scoped
//! overrides can patch and restore them in place.

use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc, OnceLock, RwLock, Weak,
};

use crate::model::{AccessFlags, ClassRc, JvmClass};

/// Reference to a [`Field`]
pub type FieldRc = Arc<Field>;
/// Reference to a [`Method`]
pub type MethodRc = Arc<Method>;
/// Reference to a [`Constructor`]
pub type ConstructorRc = Arc<Constructor>;

/// A smart reference to a [`JvmClass`] that automatically handles weak references
/// to prevent circular reference memory leaks while providing a clean API
#[derive(Clone, Debug)]
pub struct ClassRef {
    weak_ref: Weak<JvmClass>,
}

impl ClassRef {
    /// Create a new `ClassRef` from a strong reference
    pub fn new(strong_ref: &ClassRc) -> Self {
        Self {
            weak_ref: Arc::downgrade(strong_ref),
        }
    }

    /// Get a strong reference to the class, returning `None` if the class has been dropped
    #[must_use]
    pub fn upgrade(&self) -> Option<ClassRc> {
        self.weak_ref.upgrade()
    }

    /// Get the qualified name of the referenced class (if still alive)
    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.upgrade().map(|c| c.name().to_string())
    }

    /// Check if the referenced class is still alive
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.weak_ref.strong_count() > 0
    }
}

impl From<ClassRc> for ClassRef {
    fn from(strong_ref: ClassRc) -> Self {
        Self::new(&strong_ref)
    }
}

/// A compile-time constant attached to a field (the `ConstantValue` attribute).
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    /// `int`, `short`, `char`, `byte` or `boolean` constant
    Int(i32),
    /// `long` constant
    Long(i64),
    /// `float` constant
    Float(f32),
    /// `double` constant
    Double(f64),
    /// `java.lang.String` constant
    Str(String),
}

/// The body of a method or constructor (the `Code` attribute).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MethodBody {
    /// Maximum operand stack depth
    pub max_stack: u16,
    /// Number of local variable slots
    pub max_locals: u16,
    /// Raw JVM bytecode of the body
    pub code: Vec<u8>,
}

/// A field of a class model.
///
/// The `mirrored` marker and `mirror_initializer` override configure how the mirroring
/// engine treats this field when the declaring class resolves to the `Annotated` policy
/// (and the initializer override applies under every policy).
#[derive(Debug)]
pub struct Field {
    name: String,
    descriptor: String,
    flags: AtomicU32,
    constant: RwLock<Option<ConstantValue>>,
    initializer: RwLock<Option<String>>,
    mirrored: bool,
    mirror_initializer: Option<String>,
    declaring: OnceLock<ClassRef>,
}

impl Field {
    /// Create a new field with the given name, type descriptor (e.g. `"I"`,
    /// `"Ljava/lang/String;"`) and flags.
    pub fn new(name: impl Into<String>, descriptor: impl Into<String>, flags: AccessFlags) -> Self {
        Field {
            name: name.into(),
            descriptor: descriptor.into(),
            flags: AtomicU32::new(flags.bits()),
            constant: RwLock::new(None),
            initializer: RwLock::new(None),
            mirrored: false,
            mirror_initializer: None,
            declaring: OnceLock::new(),
        }
    }

    /// Attach a compile-time constant to this field
    #[must_use]
    pub fn with_constant(self, value: ConstantValue) -> Self {
        *self.constant.write().expect("constant lock poisoned") = Some(value);
        self
    }

    /// Attach an initializer expression directly to this field
    #[must_use]
    pub fn with_initializer(self, expression: impl Into<String>) -> Self {
        *self.initializer.write().expect("initializer lock poisoned") = Some(expression.into());
        self
    }

    /// Mark this field as individually eligible for mirroring
    #[must_use]
    pub fn mirrored(mut self) -> Self {
        self.mirrored = true;
        self
    }

    /// Mark this field as mirror-eligible with an explicit initializer-expression override
    #[must_use]
    pub fn mirrored_with_initializer(mut self, expression: impl Into<String>) -> Self {
        self.mirrored = true;
        self.mirror_initializer = Some(expression.into());
        self
    }

    /// Field name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field type descriptor
    #[must_use]
    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    /// Typed view of the current flags word
    #[must_use]
    pub fn flags(&self) -> AccessFlags {
        AccessFlags::from_bits_truncate(self.raw_flags())
    }

    /// The raw flags word, exactly as stored
    #[must_use]
    pub fn raw_flags(&self) -> u32 {
        self.flags.load(Ordering::Relaxed)
    }

    /// Replace the raw flags word.
    ///
    /// This is the modifiers back-door used by scoped access overrides; callers are
    /// responsible for restoring the original value.
    pub fn store_raw_flags(&self, raw: u32) {
        self.flags.store(raw, Ordering::Relaxed);
    }

    /// The attached compile-time constant, if any
    #[must_use]
    pub fn constant(&self) -> Option<ConstantValue> {
        self.constant.read().expect("constant lock poisoned").clone()
    }

    /// Replace the compile-time constant.
    ///
    /// This is a structural edit on the model and performs no access checking; the
    /// checked surface is [`crate::handle::FieldHandle`].
    pub fn set_constant(&self, value: Option<ConstantValue>) {
        *self.constant.write().expect("constant lock poisoned") = value;
    }

    /// The directly attached initializer expression, if any
    #[must_use]
    pub fn initializer(&self) -> Option<String> {
        self.initializer
            .read()
            .expect("initializer lock poisoned")
            .clone()
    }

    /// Whether this field carries the per-member mirror marker
    #[must_use]
    pub fn is_mirrored(&self) -> bool {
        self.mirrored
    }

    /// The per-member initializer-expression override, if any
    #[must_use]
    pub fn mirror_initializer(&self) -> Option<&str> {
        self.mirror_initializer.as_deref()
    }

    /// The class this field is declared in
    #[must_use]
    pub fn declaring(&self) -> Option<ClassRc> {
        self.declaring.get().and_then(ClassRef::upgrade)
    }

    pub(crate) fn attach_to(&self, class: &ClassRc) {
        self.declaring.set(ClassRef::new(class)).ok();
    }

    /// `owner.name:descriptor` rendering used in error messages
    #[must_use]
    pub fn signature(&self) -> String {
        match self.declaring.get().and_then(ClassRef::name) {
            Some(owner) => format!("{}.{}:{}", owner, self.name, self.descriptor),
            None => format!("{}:{}", self.name, self.descriptor),
        }
    }

    /// Structural copy of this field, detached from any declaring class.
    ///
    /// When `initializer` is given it replaces the copied field's directly attached
    /// initializer expression.
    #[must_use]
    pub fn structural_copy(&self, initializer: Option<String>) -> Field {
        Field {
            name: self.name.clone(),
            descriptor: self.descriptor.clone(),
            flags: AtomicU32::new(self.raw_flags()),
            constant: RwLock::new(self.constant()),
            initializer: RwLock::new(initializer.or_else(|| self.initializer())),
            mirrored: self.mirrored,
            mirror_initializer: self.mirror_initializer.clone(),
            declaring: OnceLock::new(),
        }
    }
}

/// A method of a class model.
#[derive(Debug)]
pub struct Method {
    name: String,
    descriptor: String,
    flags: AtomicU32,
    body: RwLock<Option<MethodBody>>,
    mirrored: bool,
    declaring: OnceLock<ClassRef>,
}

impl Method {
    /// Create a new method with the given name, method descriptor (e.g. `"(I)V"`) and flags
    pub fn new(name: impl Into<String>, descriptor: impl Into<String>, flags: AccessFlags) -> Self {
        Method {
            name: name.into(),
            descriptor: descriptor.into(),
            flags: AtomicU32::new(flags.bits()),
            body: RwLock::new(None),
            mirrored: false,
            declaring: OnceLock::new(),
        }
    }

    /// Attach a body to this method
    #[must_use]
    pub fn with_body(self, body: MethodBody) -> Self {
        *self.body.write().expect("body lock poisoned") = Some(body);
        self
    }

    /// Mark this method as individually eligible for mirroring
    #[must_use]
    pub fn mirrored(mut self) -> Self {
        self.mirrored = true;
        self
    }

    /// Method name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Method descriptor
    #[must_use]
    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    /// Typed view of the current flags word
    #[must_use]
    pub fn flags(&self) -> AccessFlags {
        AccessFlags::from_bits_truncate(self.flags.load(Ordering::Relaxed))
    }

    /// The method body, if one is attached
    #[must_use]
    pub fn body(&self) -> Option<MethodBody> {
        self.body.read().expect("body lock poisoned").clone()
    }

    /// Replace the method body. Structural edit, no access checking.
    pub fn set_body(&self, body: Option<MethodBody>) {
        *self.body.write().expect("body lock poisoned") = body;
    }

    /// Whether this method carries the per-member mirror marker
    #[must_use]
    pub fn is_mirrored(&self) -> bool {
        self.mirrored
    }

    /// The class this method is declared in
    #[must_use]
    pub fn declaring(&self) -> Option<ClassRc> {
        self.declaring.get().and_then(ClassRef::upgrade)
    }

    pub(crate) fn attach_to(&self, class: &ClassRc) {
        self.declaring.set(ClassRef::new(class)).ok();
    }

    /// `owner.name:descriptor` rendering used in error messages
    #[must_use]
    pub fn signature(&self) -> String {
        match self.declaring.get().and_then(ClassRef::name) {
            Some(owner) => format!("{}.{}{}", owner, self.name, self.descriptor),
            None => format!("{}{}", self.name, self.descriptor),
        }
    }

    /// Structural copy of this method, detached from any declaring class
    #[must_use]
    pub fn structural_copy(&self) -> Method {
        Method {
            name: self.name.clone(),
            descriptor: self.descriptor.clone(),
            flags: AtomicU32::new(self.flags.load(Ordering::Relaxed)),
            body: RwLock::new(self.body()),
            mirrored: self.mirrored,
            declaring: OnceLock::new(),
        }
    }
}

/// Distinguishes instance constructors from the class initializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructorKind {
    /// An `<init>` instance constructor
    Instance,
    /// The `<clinit>` static class initializer
    ClassInitializer,
}

/// A constructor or class initializer of a class model.
///
/// Both kinds live in the same declaration list of the class; callers filter on
/// [`Constructor::is_constructor`] / [`Constructor::is_class_initializer`].
#[derive(Debug)]
pub struct Constructor {
    kind: ConstructorKind,
    descriptor: String,
    flags: AtomicU32,
    body: RwLock<Option<MethodBody>>,
    mirrored: bool,
    declaring: OnceLock<ClassRef>,
}

impl Constructor {
    /// Create a new instance constructor with the given descriptor (e.g. `"(I)V"`) and flags
    pub fn new(descriptor: impl Into<String>, flags: AccessFlags) -> Self {
        Constructor {
            kind: ConstructorKind::Instance,
            descriptor: descriptor.into(),
            flags: AtomicU32::new(flags.bits()),
            body: RwLock::new(None),
            mirrored: false,
            declaring: OnceLock::new(),
        }
    }

    /// Create a class initializer (`static {}` block)
    pub fn class_initializer() -> Self {
        Constructor {
            kind: ConstructorKind::ClassInitializer,
            descriptor: "()V".to_string(),
            flags: AtomicU32::new(AccessFlags::STATIC.bits()),
            body: RwLock::new(None),
            mirrored: false,
            declaring: OnceLock::new(),
        }
    }

    /// Attach a body to this constructor
    #[must_use]
    pub fn with_body(self, body: MethodBody) -> Self {
        *self.body.write().expect("body lock poisoned") = Some(body);
        self
    }

    /// Mark this constructor as individually eligible for mirroring
    #[must_use]
    pub fn mirrored(mut self) -> Self {
        self.mirrored = true;
        self
    }

    /// The special method name of this member (`<init>` or `<clinit>`)
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self.kind {
            ConstructorKind::Instance => "<init>",
            ConstructorKind::ClassInitializer => "<clinit>",
        }
    }

    /// The kind of this member
    #[must_use]
    pub fn kind(&self) -> ConstructorKind {
        self.kind
    }

    /// Whether this is an instance constructor
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.kind == ConstructorKind::Instance
    }

    /// Whether this is the class initializer
    #[must_use]
    pub fn is_class_initializer(&self) -> bool {
        self.kind == ConstructorKind::ClassInitializer
    }

    /// Constructor descriptor
    #[must_use]
    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    /// Typed view of the current flags word
    #[must_use]
    pub fn flags(&self) -> AccessFlags {
        AccessFlags::from_bits_truncate(self.flags.load(Ordering::Relaxed))
    }

    /// The body, if one is attached
    #[must_use]
    pub fn body(&self) -> Option<MethodBody> {
        self.body.read().expect("body lock poisoned").clone()
    }

    /// Replace the body. Structural edit, no access checking.
    pub fn set_body(&self, body: Option<MethodBody>) {
        *self.body.write().expect("body lock poisoned") = body;
    }

    /// Whether this constructor carries the per-member mirror marker
    #[must_use]
    pub fn is_mirrored(&self) -> bool {
        self.mirrored
    }

    /// The class this constructor is declared in
    #[must_use]
    pub fn declaring(&self) -> Option<ClassRc> {
        self.declaring.get().and_then(ClassRef::upgrade)
    }

    pub(crate) fn attach_to(&self, class: &ClassRc) {
        self.declaring.set(ClassRef::new(class)).ok();
    }

    /// `owner.<init>descriptor` rendering used in error messages
    #[must_use]
    pub fn signature(&self) -> String {
        match self.declaring.get().and_then(ClassRef::name) {
            Some(owner) => format!("{}.{}{}", owner, self.name(), self.descriptor),
            None => format!("{}{}", self.name(), self.descriptor),
        }
    }

    /// Structural copy of this constructor, detached from any declaring class
    #[must_use]
    pub fn structural_copy(&self) -> Constructor {
        Constructor {
            kind: self.kind,
            descriptor: self.descriptor.clone(),
            flags: AtomicU32::new(self.flags.load(Ordering::Relaxed)),
            body: RwLock::new(self.body()),
            mirrored: self.mirrored,
            declaring: OnceLock::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_structural_copy_replaces_initializer() {
        let field = Field::new("counter", "I", AccessFlags::PRIVATE).with_initializer("0");
        let copy = field.structural_copy(Some("42".to_string()));

        assert_eq!(copy.name(), "counter");
        assert_eq!(copy.initializer().as_deref(), Some("42"));
        assert_eq!(field.initializer().as_deref(), Some("0"));
    }

    #[test]
    fn test_field_structural_copy_keeps_initializer() {
        let field = Field::new("counter", "I", AccessFlags::PRIVATE).with_initializer("0");
        let copy = field.structural_copy(None);
        assert_eq!(copy.initializer().as_deref(), Some("0"));
    }

    #[test]
    fn test_flags_backdoor_roundtrip() {
        let field = Field::new("id", "J", AccessFlags::PRIVATE | AccessFlags::FINAL);
        let original = field.raw_flags();

        field.store_raw_flags(original & !AccessFlags::FINAL.bits());
        assert!(!field.flags().is_final());
        assert!(field.flags().is_private());

        field.store_raw_flags(original);
        assert!(field.flags().is_final());
    }

    #[test]
    fn test_constructor_kinds() {
        let ctor = Constructor::new("(I)V", AccessFlags::PUBLIC);
        assert!(ctor.is_constructor());
        assert_eq!(ctor.name(), "<init>");

        let clinit = Constructor::class_initializer();
        assert!(clinit.is_class_initializer());
        assert_eq!(clinit.name(), "<clinit>");
        assert!(clinit.flags().is_static());
    }
}
