//! Version-52 class-file emission.
//!
//! A deduplicating [`ConstantPoolBuilder`] plus [`write_class`], which materializes a
//! [`JvmClass`] model into class-file bytes. The layout follows JVMS §4: constant pool,
//! class header, fields with `ConstantValue` attributes, methods with `Code`
//! attributes.

use std::collections::HashMap;

use crate::{
    model::{ConstantValue, JvmClass, MethodBody, AccessFlags, OBJECT_CLASS},
    Error, Result,
};

/// Class file major version emitted by this module (Java 8)
pub const CLASS_FILE_MAJOR: u16 = 52;

const TAG_UTF8: u8 = 1;
const TAG_INTEGER: u8 = 3;
const TAG_FLOAT: u8 = 4;
const TAG_LONG: u8 = 5;
const TAG_DOUBLE: u8 = 6;
const TAG_CLASS: u8 = 7;
const TAG_STRING: u8 = 8;
const TAG_METHOD_REF: u8 = 10;
const TAG_NAME_AND_TYPE: u8 = 12;

#[derive(Debug, Clone, PartialEq)]
enum CpEntry {
    // index 0 and the trailing slot of 8-byte constants
    Unusable,
    Utf8(String),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Class { name_index: u16 },
    String { string_index: u16 },
    MethodRef { class_index: u16, name_and_type_index: u16 },
    NameAndType { name_index: u16, descriptor_index: u16 },
}

/// A builder for the constant pool of a class.
///
/// Deduplicates `Utf8`, `Class`, `String`, `NameAndType` and `Methodref` entries;
/// 8-byte constants occupy two indices as the format requires.
#[derive(Debug, Default)]
pub struct ConstantPoolBuilder {
    cp: Vec<CpEntry>,
    utf8: HashMap<String, u16>,
    class: HashMap<String, u16>,
    string: HashMap<String, u16>,
    name_and_type: HashMap<(String, String), u16>,
    method_ref: HashMap<(String, String, String), u16>,
}

impl ConstantPoolBuilder {
    /// Creates a new, empty `ConstantPoolBuilder`.
    ///
    /// The constant pool starts with a dummy entry at index 0, as per JVM spec.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cp: vec![CpEntry::Unusable],
            ..Default::default()
        }
    }

    /// The `constant_pool_count` value for the header
    #[must_use]
    pub fn count(&self) -> u16 {
        self.cp.len() as u16
    }

    /// Adds a UTF-8 string to the constant pool if it doesn't exist.
    ///
    /// Returns the index of the entry.
    pub fn utf8(&mut self, value: &str) -> Result<u16> {
        if let Some(index) = self.utf8.get(value) {
            return Ok(*index);
        }
        let index = self.push(CpEntry::Utf8(value.to_string()))?;
        self.utf8.insert(value.to_string(), index);
        Ok(index)
    }

    /// Adds a Class constant (by internal name) to the pool
    pub fn class(&mut self, internal_name: &str) -> Result<u16> {
        if let Some(index) = self.class.get(internal_name) {
            return Ok(*index);
        }
        let name_index = self.utf8(internal_name)?;
        let index = self.push(CpEntry::Class { name_index })?;
        self.class.insert(internal_name.to_string(), index);
        Ok(index)
    }

    /// Adds a String constant (a string literal) to the pool
    pub fn string(&mut self, value: &str) -> Result<u16> {
        if let Some(index) = self.string.get(value) {
            return Ok(*index);
        }
        let string_index = self.utf8(value)?;
        let index = self.push(CpEntry::String { string_index })?;
        self.string.insert(value.to_string(), index);
        Ok(index)
    }

    /// Adds a NameAndType constant to the pool
    pub fn name_and_type(&mut self, name: &str, descriptor: &str) -> Result<u16> {
        let key = (name.to_string(), descriptor.to_string());
        if let Some(index) = self.name_and_type.get(&key) {
            return Ok(*index);
        }
        let name_index = self.utf8(name)?;
        let descriptor_index = self.utf8(descriptor)?;
        let index = self.push(CpEntry::NameAndType {
            name_index,
            descriptor_index,
        })?;
        self.name_and_type.insert(key, index);
        Ok(index)
    }

    /// Adds a Methodref constant to the pool
    pub fn method_ref(&mut self, owner: &str, name: &str, descriptor: &str) -> Result<u16> {
        let key = (owner.to_string(), name.to_string(), descriptor.to_string());
        if let Some(index) = self.method_ref.get(&key) {
            return Ok(*index);
        }
        let class_index = self.class(owner)?;
        let name_and_type_index = self.name_and_type(name, descriptor)?;
        let index = self.push(CpEntry::MethodRef {
            class_index,
            name_and_type_index,
        })?;
        self.method_ref.insert(key, index);
        Ok(index)
    }

    /// Adds an Integer constant to the pool
    pub fn integer(&mut self, value: i32) -> Result<u16> {
        self.push(CpEntry::Integer(value))
    }

    /// Adds a Float constant to the pool
    pub fn float(&mut self, value: f32) -> Result<u16> {
        self.push(CpEntry::Float(value))
    }

    /// Adds a Long constant to the pool (occupies two indices)
    pub fn long(&mut self, value: i64) -> Result<u16> {
        let index = self.push(CpEntry::Long(value))?;
        self.push(CpEntry::Unusable)?;
        Ok(index)
    }

    /// Adds a Double constant to the pool (occupies two indices)
    pub fn double(&mut self, value: f64) -> Result<u16> {
        let index = self.push(CpEntry::Double(value))?;
        self.push(CpEntry::Unusable)?;
        Ok(index)
    }

    /// Adds the loadable constant for a field's `ConstantValue` attribute
    pub fn constant(&mut self, value: &ConstantValue) -> Result<u16> {
        match value {
            ConstantValue::Int(v) => self.integer(*v),
            ConstantValue::Long(v) => self.long(*v),
            ConstantValue::Float(v) => self.float(*v),
            ConstantValue::Double(v) => self.double(*v),
            ConstantValue::Str(v) => self.string(v),
        }
    }

    fn push(&mut self, entry: CpEntry) -> Result<u16> {
        if self.cp.len() >= u16::MAX as usize {
            return Err(Error::Emission("constant pool overflow".to_string()));
        }
        let index = self.cp.len() as u16;
        self.cp.push(entry);
        Ok(index)
    }

    pub(crate) fn write(&self, buf: &mut Vec<u8>) {
        for entry in &self.cp {
            match entry {
                CpEntry::Unusable => {}
                CpEntry::Utf8(value) => {
                    buf.push(TAG_UTF8);
                    put_u16(buf, value.len() as u16);
                    buf.extend_from_slice(value.as_bytes());
                }
                CpEntry::Integer(value) => {
                    buf.push(TAG_INTEGER);
                    buf.extend_from_slice(&value.to_be_bytes());
                }
                CpEntry::Float(value) => {
                    buf.push(TAG_FLOAT);
                    buf.extend_from_slice(&value.to_be_bytes());
                }
                CpEntry::Long(value) => {
                    buf.push(TAG_LONG);
                    buf.extend_from_slice(&value.to_be_bytes());
                }
                CpEntry::Double(value) => {
                    buf.push(TAG_DOUBLE);
                    buf.extend_from_slice(&value.to_be_bytes());
                }
                CpEntry::Class { name_index } => {
                    buf.push(TAG_CLASS);
                    put_u16(buf, *name_index);
                }
                CpEntry::String { string_index } => {
                    buf.push(TAG_STRING);
                    put_u16(buf, *string_index);
                }
                CpEntry::MethodRef {
                    class_index,
                    name_and_type_index,
                } => {
                    buf.push(TAG_METHOD_REF);
                    put_u16(buf, *class_index);
                    put_u16(buf, *name_and_type_index);
                }
                CpEntry::NameAndType {
                    name_index,
                    descriptor_index,
                } => {
                    buf.push(TAG_NAME_AND_TYPE);
                    put_u16(buf, *name_index);
                    put_u16(buf, *descriptor_index);
                }
            }
        }
    }
}

pub(crate) fn put_u16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_be_bytes());
}

pub(crate) fn put_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_be_bytes());
}

/// Serialize a `Code` attribute (name index, length, maxs, bytecode, no exception
/// table, no nested attributes).
pub(crate) fn code_attribute(cp: &mut ConstantPoolBuilder, body: &MethodBody) -> Result<Vec<u8>> {
    if body.code.len() > u32::MAX as usize / 2 {
        return Err(Error::Emission("method body too large".to_string()));
    }

    let name_index = cp.utf8("Code")?;
    let mut attr = Vec::with_capacity(body.code.len() + 18);
    put_u16(&mut attr, name_index);
    put_u32(&mut attr, 12 + body.code.len() as u32);
    put_u16(&mut attr, body.max_stack);
    put_u16(&mut attr, body.max_locals);
    put_u32(&mut attr, body.code.len() as u32);
    attr.extend_from_slice(&body.code);
    put_u16(&mut attr, 0); // exception_table_length
    put_u16(&mut attr, 0); // attributes_count
    Ok(attr)
}

/// Emit `class` as version-52 class-file bytes.
///
/// Fields carry a `ConstantValue` attribute when a constant is attached; methods and
/// constructors carry a `Code` attribute when a body is attached. Interface models
/// (and any model without an explicit superclass, other than the hierarchy root) are
/// emitted extending `java/lang/Object` as the format requires.
pub fn write_class(class: &JvmClass) -> Result<Vec<u8>> {
    let mut cp = ConstantPoolBuilder::new();

    let this_index = cp.class(&class.internal_name())?;
    let super_index = match class.super_name() {
        Some(name) => cp.class(&name.replace('.', "/"))?,
        None if class.name() == OBJECT_CLASS => 0,
        None => cp.class("java/lang/Object")?,
    };

    let mut interface_indices = Vec::new();
    for name in class.interface_names() {
        interface_indices.push(cp.class(&name.replace('.', "/"))?);
    }

    // member sections are serialized first so the constant pool is complete
    let mut field_section = Vec::new();
    let mut field_count: u16 = 0;
    for (_, field) in class.fields.iter() {
        put_u16(&mut field_section, (field.raw_flags() & 0xFFFF) as u16);
        let name_index = cp.utf8(field.name())?;
        let descriptor_index = cp.utf8(field.descriptor())?;
        put_u16(&mut field_section, name_index);
        put_u16(&mut field_section, descriptor_index);

        match field.constant() {
            Some(constant) => {
                put_u16(&mut field_section, 1);
                let attr_name = cp.utf8("ConstantValue")?;
                let value_index = cp.constant(&constant)?;
                put_u16(&mut field_section, attr_name);
                put_u32(&mut field_section, 2);
                put_u16(&mut field_section, value_index);
            }
            None => put_u16(&mut field_section, 0),
        }
        field_count += 1;
    }

    let mut method_section = Vec::new();
    let mut method_count: u16 = 0;
    let emit_method = |cp: &mut ConstantPoolBuilder,
                           section: &mut Vec<u8>,
                           flags: u16,
                           name: &str,
                           descriptor: &str,
                           body: Option<MethodBody>|
     -> Result<()> {
        put_u16(section, flags);
        let name_index = cp.utf8(name)?;
        let descriptor_index = cp.utf8(descriptor)?;
        put_u16(section, name_index);
        put_u16(section, descriptor_index);
        match body {
            Some(body) => {
                put_u16(section, 1);
                section.extend_from_slice(&code_attribute(cp, &body)?);
            }
            None => put_u16(section, 0),
        }
        Ok(())
    };

    for (_, method) in class.methods.iter() {
        emit_method(
            &mut cp,
            &mut method_section,
            (method.flags().bits() & 0xFFFF) as u16,
            method.name(),
            method.descriptor(),
            method.body(),
        )?;
        method_count += 1;
    }
    for (_, constructor) in class.constructors.iter() {
        emit_method(
            &mut cp,
            &mut method_section,
            (constructor.flags().bits() & 0xFFFF) as u16,
            constructor.name(),
            constructor.descriptor(),
            constructor.body(),
        )?;
        method_count += 1;
    }

    let mut class_flags = class.flags();
    if !class_flags.is_interface() {
        class_flags |= AccessFlags::SUPER;
    }

    let mut buf = Vec::new();
    put_u32(&mut buf, 0xCAFE_BABE);
    put_u16(&mut buf, 0); // minor
    put_u16(&mut buf, CLASS_FILE_MAJOR);
    put_u16(&mut buf, cp.count());
    cp.write(&mut buf);
    put_u16(&mut buf, (class_flags.bits() & 0xFFFF) as u16);
    put_u16(&mut buf, this_index);
    put_u16(&mut buf, super_index);
    put_u16(&mut buf, interface_indices.len() as u16);
    for index in interface_indices {
        put_u16(&mut buf, index);
    }
    put_u16(&mut buf, field_count);
    buf.extend_from_slice(&field_section);
    put_u16(&mut buf, method_count);
    buf.extend_from_slice(&method_section);
    put_u16(&mut buf, 0); // class attributes

    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AccessFlags, ClassBuilder, ClassPool, ConstantValue, Field};

    #[test]
    fn test_constant_pool_deduplicates() {
        let mut cp = ConstantPoolBuilder::new();
        let a = cp.utf8("greet").unwrap();
        let b = cp.utf8("greet").unwrap();
        assert_eq!(a, b);

        let c1 = cp.class("com/example/A").unwrap();
        let c2 = cp.class("com/example/A").unwrap();
        assert_eq!(c1, c2);
    }

    #[test]
    fn test_long_occupies_two_slots() {
        let mut cp = ConstantPoolBuilder::new();
        let long_index = cp.long(42).unwrap();
        let next = cp.utf8("after").unwrap();
        assert_eq!(next, long_index + 2);
    }

    #[test]
    fn test_emitted_header() {
        let pool = ClassPool::new();
        let class = ClassBuilder::new("com.example.Emitted")
            .public()
            .field(
                Field::new(
                    "LIMIT",
                    "I",
                    AccessFlags::PUBLIC | AccessFlags::STATIC | AccessFlags::FINAL,
                )
                .with_constant(ConstantValue::Int(10)),
            )
            .build(&pool)
            .unwrap();

        let bytes = write_class(&class).unwrap();
        assert_eq!(&bytes[0..4], &[0xCA, 0xFE, 0xBA, 0xBE]);
        assert_eq!(u16::from_be_bytes([bytes[4], bytes[5]]), 0);
        assert_eq!(u16::from_be_bytes([bytes[6], bytes[7]]), CLASS_FILE_MAJOR);
    }
}
