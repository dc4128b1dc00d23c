use crate::model::{AccessFlags, ClassBuilder, ClassPool, ClassRc, Field, Method};

// Object <- First <- Second <- Third, with a member declared on First only
pub fn linear_hierarchy(pool: &ClassPool) -> (ClassRc, ClassRc, ClassRc) {
    let first = ClassBuilder::new("com.example.First")
        .public()
        .field(Field::new("root_value", "I", AccessFlags::PRIVATE))
        .method(Method::new("identify", "()Ljava/lang/String;", AccessFlags::PUBLIC))
        .build(pool)
        .unwrap();
    let second = ClassBuilder::new("com.example.Second")
        .public()
        .extends("com.example.First")
        .build(pool)
        .unwrap();
    let third = ClassBuilder::new("com.example.Third")
        .public()
        .extends("com.example.Second")
        .build(pool)
        .unwrap();
    (first, second, third)
}

// Fourth extends Second and implements Deep (extends Root) plus Side;
// each interface declares one method of its own
pub fn interface_hierarchy(pool: &ClassPool) -> (ClassRc, ClassRc, ClassRc, ClassRc) {
    linear_hierarchy(pool);

    let root = ClassBuilder::new("com.example.Root")
        .interface()
        .method(Method::new("alpha", "()V", AccessFlags::PUBLIC | AccessFlags::ABSTRACT))
        .build(pool)
        .unwrap();
    let deep = ClassBuilder::new("com.example.Deep")
        .interface()
        .implements("com.example.Root")
        .method(Method::new("beta", "()V", AccessFlags::PUBLIC | AccessFlags::ABSTRACT))
        .build(pool)
        .unwrap();
    let side = ClassBuilder::new("com.example.Side")
        .interface()
        .method(Method::new("gamma", "()V", AccessFlags::PUBLIC | AccessFlags::ABSTRACT))
        .build(pool)
        .unwrap();
    let fourth = ClassBuilder::new("com.example.Fourth")
        .public()
        .extends("com.example.Second")
        .implements("com.example.Deep")
        .implements("com.example.Side")
        .build(pool)
        .unwrap();
    (root, deep, side, fourth)
}
