//! Empty-constructor accessor synthesis.
//!
//! For a target class `C`, generates a small helper class extending the privileged
//! accessor base, implementing the single-method capability interface, whose
//! `newInstance` body allocates `C` and invokes `java/lang/Object.<init>` on it —
//! skipping `C`'s own constructor chain entirely. The privileged superclass is what
//! makes the verifier accept that mismatched constructor call.
//!
//! Every generated class receives a globally unique name from the per-prefix
//! incrementing supplier and is defined through a [`ClassDefiner`].

use std::sync::Arc;

use crate::{
    codegen::{
        classfile::{code_attribute, put_u16, put_u32, ConstantPoolBuilder, CLASS_FILE_MAJOR},
        opcodes, ClassDefiner, ClassLoader, ClassNameSupplier, DefinedClass,
        IncrementingNameSupplier, NameSupplierCache,
    },
    model::{AccessFlags, ClassRc, MethodBody},
    Result,
};

/// Internal name of the privileged base class generated accessors extend
pub const PRIVILEGED_ACCESSOR_BASE: &str = "sun/reflect/MagicAccessorImpl";

/// Internal name of the capability interface generated accessors implement
pub const EMPTY_CONSTRUCTOR_ACCESSOR_INTERFACE: &str = "classweave/runtime/EmptyConstructorAccessor";

/// Default base prefix for generated accessor names
pub const DEFAULT_ACCESSOR_BASE_NAME: &str = "classweave.runtime.generated.EmptyConstructorAccessor$";

/// Synthesizes empty-constructor accessor classes and defines them.
pub struct AccessorGenerator {
    definer: Arc<dyn ClassDefiner>,
    names: Arc<IncrementingNameSupplier>,
}

impl AccessorGenerator {
    /// Create a generator using the default accessor name prefix
    #[must_use]
    pub fn new(definer: Arc<dyn ClassDefiner>, names: &NameSupplierCache) -> Self {
        Self::with_base_name(definer, names, DEFAULT_ACCESSOR_BASE_NAME)
    }

    /// Create a generator drawing names from the given prefix
    #[must_use]
    pub fn with_base_name(
        definer: Arc<dyn ClassDefiner>,
        names: &NameSupplierCache,
        base: &str,
    ) -> Self {
        AccessorGenerator {
            definer,
            names: names.supplier(base),
        }
    }

    /// Generate and define an accessor whose `newInstance` allocates `target` without
    /// running any of its constructors.
    pub fn empty_constructor_accessor(
        &self,
        target: &ClassRc,
        parent: &Arc<ClassLoader>,
    ) -> Result<Arc<DefinedClass>> {
        let dot_name = self.names.next_name();
        let internal_name = dot_name.replace('.', "/");
        let bytes = emit_accessor(&internal_name, &target.internal_name())?;
        self.definer.define_class(parent, Some(&dot_name), &bytes)
    }
}

fn emit_accessor(internal_name: &str, target_internal_name: &str) -> Result<Vec<u8>> {
    let mut cp = ConstantPoolBuilder::new();

    let this_index = cp.class(internal_name)?;
    let super_index = cp.class(PRIVILEGED_ACCESSOR_BASE)?;
    let interface_index = cp.class(EMPTY_CONSTRUCTOR_ACCESSOR_INTERFACE)?;

    let super_init = cp.method_ref(PRIVILEGED_ACCESSOR_BASE, "<init>", "()V")?;
    let object_init = cp.method_ref("java/lang/Object", "<init>", "()V")?;
    let target_index = cp.class(target_internal_name)?;

    // <init>()V : aload_0; invokespecial super.<init>; return
    let mut init_code = vec![opcodes::ALOAD_0, opcodes::INVOKESPECIAL];
    init_code.extend_from_slice(&super_init.to_be_bytes());
    init_code.push(opcodes::RETURN);
    let init_body = MethodBody {
        max_stack: 1,
        max_locals: 1,
        code: init_code,
    };

    // newInstance()Ljava/lang/Object; : new target; dup; invokespecial Object.<init>; areturn
    let mut new_instance_code = vec![opcodes::NEW];
    new_instance_code.extend_from_slice(&target_index.to_be_bytes());
    new_instance_code.push(opcodes::DUP);
    new_instance_code.push(opcodes::INVOKESPECIAL);
    new_instance_code.extend_from_slice(&object_init.to_be_bytes());
    new_instance_code.push(opcodes::ARETURN);
    let new_instance_body = MethodBody {
        max_stack: 2,
        max_locals: 2,
        code: new_instance_code,
    };

    let mut methods = Vec::new();
    for (name, descriptor, body) in [
        ("<init>", "()V", &init_body),
        ("newInstance", "()Ljava/lang/Object;", &new_instance_body),
    ] {
        put_u16(&mut methods, AccessFlags::PUBLIC.bits() as u16);
        let name_index = cp.utf8(name)?;
        let descriptor_index = cp.utf8(descriptor)?;
        put_u16(&mut methods, name_index);
        put_u16(&mut methods, descriptor_index);
        put_u16(&mut methods, 1);
        methods.extend_from_slice(&code_attribute(&mut cp, body)?);
    }

    let mut buf = Vec::new();
    put_u32(&mut buf, 0xCAFE_BABE);
    put_u16(&mut buf, 0);
    put_u16(&mut buf, CLASS_FILE_MAJOR);
    put_u16(&mut buf, cp.count());
    cp.write(&mut buf);
    put_u16(
        &mut buf,
        (AccessFlags::PUBLIC | AccessFlags::SUPER).bits() as u16,
    );
    put_u16(&mut buf, this_index);
    put_u16(&mut buf, super_index);
    put_u16(&mut buf, 1);
    put_u16(&mut buf, interface_index);
    put_u16(&mut buf, 0); // fields
    put_u16(&mut buf, 2); // methods
    buf.extend_from_slice(&methods);
    put_u16(&mut buf, 0); // class attributes

    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        codegen::SafeClassDefiner,
        model::{ClassBuilder, ClassPool},
    };

    #[test]
    fn test_accessor_names_are_unique() {
        let pool = ClassPool::new();
        let target = ClassBuilder::new("com.example.Widget").build(&pool).unwrap();

        let names = NameSupplierCache::new();
        let parent = ClassLoader::bootstrap();
        let generator = AccessorGenerator::new(Arc::new(SafeClassDefiner::new()), &names);

        let first = generator
            .empty_constructor_accessor(&target, &parent)
            .unwrap();
        let second = generator
            .empty_constructor_accessor(&target, &parent)
            .unwrap();
        assert_ne!(first.name(), second.name());
    }

    #[test]
    fn test_accessor_bytes_reference_the_target() {
        let bytes = emit_accessor("gen/Accessor$0", "com/example/Widget").unwrap();

        assert_eq!(&bytes[0..4], &[0xCA, 0xFE, 0xBA, 0xBE]);
        assert_eq!(u16::from_be_bytes([bytes[6], bytes[7]]), CLASS_FILE_MAJOR);

        let needle = b"com/example/Widget";
        assert!(bytes
            .windows(needle.len())
            .any(|window| window == needle));
        let base = PRIVILEGED_ACCESSOR_BASE.as_bytes();
        assert!(bytes.windows(base.len()).any(|window| window == base));
    }
}
