use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassFileError {
    #[error("class file is truncated at offset {0}")]
    Truncated(usize),
    #[error("{0} bytes remain past the end of the class structure")]
    TrailingBytes(usize),
    #[error("invalid magic identifier: 0x{0:X}")]
    BadMagic(u32),
    #[error("unsupported major version {got}, the maximum is {max}")]
    UnsupportedVersion { got: u16, max: u16 },
    #[error("unknown constant pool tag {tag} at entry #{index}")]
    UnknownCpTag { tag: u8, index: u16 },
    #[error("constant pool index {index} is out of range")]
    CpIndexOutOfRange { index: u16 },
    #[error("constant pool entry #{index} is a {found}, expected a {expected}")]
    CpVariantMismatch {
        index: u16,
        expected: &'static str,
        found: &'static str,
    },
    #[error("constant pool holds {got} entries, expected {expected}")]
    CpSizeMismatch { expected: u16, got: usize },
    #[error("constant pool entry #{index} points to an invalid slot in the {pool} pool")]
    BadSlot { index: u16, pool: &'static str },
    #[error("missing dummy entry after the long or double constant at entry #{0}")]
    MissingDummy(u16),
    #[error("UTF8 constant at entry #{index} contains the invalid byte 0x{byte:02X}")]
    BadUtf8Byte { index: u16, byte: u8 },
    #[error("method reference at entry #{index} names an invalid method {name:?}")]
    BadMethodName { index: u16, name: String },
    #[error("constant pool entry #{index} holds an invalid descriptor {descriptor:?}")]
    BadDescriptor { index: u16, descriptor: String },
    #[error("method handle at entry #{index} has reference kind {kind}, expected 1 through 9")]
    BadMethodHandleKind { index: u16, kind: u8 },
    #[error("field #{index} does not resolve to UTF8 name and descriptor entries")]
    BadFieldSlot { index: usize },
    #[error("field #{index} has an invalid name {name:?}")]
    BadFieldName { index: usize, name: String },
    #[error("field {name:?} has an invalid descriptor {descriptor:?}")]
    BadFieldDescriptor { name: String, descriptor: String },
    #[error("attribute {name} has length {got}, expected {want}")]
    BadAttributeLength { name: String, got: u32, want: u32 },
}
