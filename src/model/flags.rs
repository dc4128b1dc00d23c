//! JVM access flag handling for classes and members.
//!
//! Flags are stored on models as a raw `u32` word so that scoped overrides (clearing the
//! `final` bit through [`crate::access`]) can patch and restore the exact original value.
//! This module provides the typed view over that word.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Access and property flags of a class, field or method (JVMS §4.1, §4.5, §4.6).
    ///
    /// Flag values overlap between contexts exactly as in the class file format;
    /// context determines which bits are meaningful.
    pub struct AccessFlags: u32 {
        /// Declared `public`
        const PUBLIC = 0x0001;
        /// Declared `private`
        const PRIVATE = 0x0002;
        /// Declared `protected`
        const PROTECTED = 0x0004;
        /// Declared `static`
        const STATIC = 0x0008;
        /// Declared `final`
        const FINAL = 0x0010;
        /// Class: treat superclass methods specially on `invokespecial`
        const SUPER = 0x0020;
        /// Method: declared `synchronized` (same bit as `SUPER`)
        const SYNCHRONIZED = 0x0020;
        /// Field: declared `volatile`
        const VOLATILE = 0x0040;
        /// Method: bridge method generated by the compiler (same bit as `VOLATILE`)
        const BRIDGE = 0x0040;
        /// Field: declared `transient`
        const TRANSIENT = 0x0080;
        /// Method: declared with variable arity (same bit as `TRANSIENT`)
        const VARARGS = 0x0080;
        /// Method: declared `native`
        const NATIVE = 0x0100;
        /// Class: is an interface
        const INTERFACE = 0x0200;
        /// Declared `abstract`
        const ABSTRACT = 0x0400;
        /// Method: declared `strictfp`
        const STRICT = 0x0800;
        /// Not present in source code
        const SYNTHETIC = 0x1000;
        /// Class: declared as an annotation type
        const ANNOTATION = 0x2000;
        /// Class or field: declared as an enum
        const ENUM = 0x4000;
    }
}

impl AccessFlags {
    /// Whether the `PUBLIC` bit is set
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.contains(AccessFlags::PUBLIC)
    }

    /// Whether the `PRIVATE` bit is set
    #[must_use]
    pub fn is_private(&self) -> bool {
        self.contains(AccessFlags::PRIVATE)
    }

    /// Whether the `FINAL` bit is set
    #[must_use]
    pub fn is_final(&self) -> bool {
        self.contains(AccessFlags::FINAL)
    }

    /// Whether the `STATIC` bit is set
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.contains(AccessFlags::STATIC)
    }

    /// Whether the `INTERFACE` bit is set
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.contains(AccessFlags::INTERFACE)
    }

    /// Whether the `ABSTRACT` bit is set
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.contains(AccessFlags::ABSTRACT)
    }
}

impl Default for AccessFlags {
    fn default() -> Self {
        AccessFlags::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_predicates() {
        let flags = AccessFlags::PUBLIC | AccessFlags::STATIC | AccessFlags::FINAL;
        assert!(flags.is_public());
        assert!(flags.is_static());
        assert!(flags.is_final());
        assert!(!flags.is_private());
        assert!(!flags.is_interface());
    }

    #[test]
    fn test_raw_roundtrip() {
        let flags = AccessFlags::PRIVATE | AccessFlags::FINAL;
        let raw = flags.bits();
        assert_eq!(AccessFlags::from_bits_truncate(raw), flags);

        // clearing the final bit through the raw word leaves the rest intact
        let cleared = AccessFlags::from_bits_truncate(raw & !AccessFlags::FINAL.bits());
        assert!(cleared.is_private());
        assert!(!cleared.is_final());
    }

    #[test]
    fn test_shared_bit_aliases() {
        assert_eq!(AccessFlags::SUPER.bits(), AccessFlags::SYNCHRONIZED.bits());
        assert_eq!(AccessFlags::VOLATILE.bits(), AccessFlags::BRIDGE.bits());
    }
}
