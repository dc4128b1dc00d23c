//! Integration tests for name generation, class definition, accessor synthesis and
//! materialization.

use classweave::codegen::{
    AccessorGenerator, ClassDefiner, ClassLoader, ClassNameSupplier, NameSupplierCache,
    SafeClassDefiner, CLASS_FILE_MAJOR, EMPTY_CONSTRUCTOR_ACCESSOR_INTERFACE,
    PRIVILEGED_ACCESSOR_BASE,
};
use classweave::handle::HandleCache;
use classweave::model::{AccessFlags, ClassBuilder, ClassPool, ConstantValue, Field, Method, MethodBody};
use classweave::search::MemberResolver;
use classweave::{Error, Result};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

#[test]
fn test_generated_names_are_unique_across_threads() {
    let cache = Arc::new(NameSupplierCache::new());

    let mut join_handles = Vec::new();
    for _ in 0..4 {
        let cache = cache.clone();
        join_handles.push(thread::spawn(move || {
            let supplier = cache.supplier("com.example.Gen$");
            (0..25)
                .map(|_| supplier.next_name())
                .collect::<Vec<String>>()
        }));
    }

    let mut seen = HashSet::new();
    for handle in join_handles {
        for name in handle.join().unwrap() {
            assert!(seen.insert(name), "a generated name was handed out twice");
        }
    }
    assert_eq!(seen.len(), 100);
}

#[test]
fn test_handle_cache_is_idempotent() -> Result<()> {
    let pool = ClassPool::new();
    let handles = HandleCache::new();
    let class = ClassBuilder::new("com.example.Cached")
        .field(Field::new("value", "I", AccessFlags::PRIVATE))
        .method(Method::new("get", "()I", AccessFlags::PUBLIC))
        .build(&pool)?;

    let resolver = MemberResolver::new(&pool, &handles);
    let first = resolver.field_handle(&class, "value")?;
    let second = resolver.field_handle(&class, "value")?;
    assert!(Arc::ptr_eq(&first, &second));

    let first = resolver.method_handle(&class, "get")?;
    let second = resolver.method_handle(&class, "get")?;
    assert!(Arc::ptr_eq(&first, &second));
    Ok(())
}

#[test]
fn test_concurrent_resolution_yields_one_handle() -> Result<()> {
    let pool = Arc::new(ClassPool::new());
    let handles = Arc::new(HandleCache::new());
    ClassBuilder::new("com.example.Raced")
        .field(Field::new("value", "I", AccessFlags::PRIVATE))
        .build(&pool)?;
    let field = {
        let class = pool.get("com.example.Raced")?;
        let (_, field) = class.fields.iter().next().unwrap();
        field.clone()
    };

    let mut join_handles = Vec::new();
    for _ in 0..8 {
        let handles = handles.clone();
        let field = field.clone();
        join_handles.push(thread::spawn(move || handles.field(&field)));
    }

    let resolved: Vec<_> = join_handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .collect();
    for handle in &resolved[1..] {
        assert!(Arc::ptr_eq(&resolved[0], handle));
    }
    Ok(())
}

#[test]
fn test_definer_rejects_concurrent_redefinition() {
    let parent = ClassLoader::bootstrap();
    let definer = Arc::new(SafeClassDefiner::new());

    let mut join_handles = Vec::new();
    for _ in 0..8 {
        let parent = parent.clone();
        let definer = definer.clone();
        join_handles.push(thread::spawn(move || {
            definer
                .define_class(&parent, Some("com.example.Contended"), &[0xCA, 0xFE])
                .is_ok()
        }));
    }

    let successes = join_handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();
    assert_eq!(successes, 1, "exactly one definition may win");
}

#[test]
fn test_accessor_generation_end_to_end() -> Result<()> {
    let pool = ClassPool::new();
    let target = ClassBuilder::new("com.example.Widget")
        .public()
        .build(&pool)?;

    let names = NameSupplierCache::new();
    let definer: Arc<dyn ClassDefiner> = Arc::new(SafeClassDefiner::new());
    let parent = ClassLoader::bootstrap();
    let generator = AccessorGenerator::new(definer, &names);

    let defined = generator.empty_constructor_accessor(&target, &parent)?;
    let name = defined.name().expect("accessors are defined by name");
    assert!(name.starts_with("classweave.runtime.generated.EmptyConstructorAccessor$"));

    let bytes = defined.bytecode();
    assert_eq!(&bytes[0..4], &[0xCA, 0xFE, 0xBA, 0xBE]);
    assert_eq!(
        u16::from_be_bytes([bytes[6], bytes[7]]),
        CLASS_FILE_MAJOR
    );
    for needle in [
        "com/example/Widget",
        PRIVILEGED_ACCESSOR_BASE,
        EMPTY_CONSTRUCTOR_ACCESSOR_INTERFACE,
        "newInstance",
    ] {
        let needle = needle.as_bytes();
        assert!(
            bytes.windows(needle.len()).any(|window| window == needle),
            "generated class file should reference {}",
            String::from_utf8_lossy(needle)
        );
    }

    // the same generator keeps producing fresh names
    let second = generator.empty_constructor_accessor(&target, &parent)?;
    assert_ne!(defined.name(), second.name());
    Ok(())
}

#[test]
fn test_materialize_freezes_and_defines() -> Result<()> {
    let pool = ClassPool::new();
    let class = ClassBuilder::new("com.example.Materialized")
        .public()
        .field(
            Field::new(
                "VERSION",
                "I",
                AccessFlags::PUBLIC | AccessFlags::STATIC | AccessFlags::FINAL,
            )
            .with_constant(ConstantValue::Int(3)),
        )
        .method(
            Method::new("noop", "()V", AccessFlags::PUBLIC).with_body(MethodBody {
                max_stack: 0,
                max_locals: 1,
                code: vec![0xB1],
            }),
        )
        .build(&pool)?;

    let definer = SafeClassDefiner::new();
    let parent = ClassLoader::bootstrap();
    let defined = pool.materialize(&class, &definer, &parent)?;

    assert!(class.is_frozen());
    assert_eq!(defined.name(), Some("com.example.Materialized"));
    assert_eq!(&defined.bytecode()[0..4], &[0xCA, 0xFE, 0xBA, 0xBE]);

    // frozen models reject further edits until defrosted
    let rejected = class.add_interface("com.example.Late");
    assert!(matches!(rejected, Err(Error::Frozen(_))));
    class.defrost();
    class.add_interface("com.example.Late")?;

    // a second materialization of the same name collides in the loader
    class.freeze();
    let again = pool.materialize(&class, &definer, &parent);
    assert!(matches!(again, Err(Error::AlreadyDefined(_))));
    Ok(())
}

#[test]
fn test_emitted_bytes_contain_member_names() -> Result<()> {
    let pool = ClassPool::new();
    let class = ClassBuilder::new("com.example.Emission")
        .public()
        .field(Field::new("counter", "J", AccessFlags::PRIVATE))
        .method(Method::new("tick", "()V", AccessFlags::PUBLIC))
        .build(&pool)?;

    let bytes = class.to_bytes()?;
    for needle in ["com/example/Emission", "java/lang/Object", "counter", "tick", "()V"] {
        let needle = needle.as_bytes();
        assert!(bytes.windows(needle.len()).any(|window| window == needle));
    }
    Ok(())
}
