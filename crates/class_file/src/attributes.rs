use crate::{Attribute, ConstantPool};

/// Attribute table shared by the class itself, its fields, and its methods.
/// Attribute bodies are opaque byte slabs at this level; only their declared
/// lengths are validated, and only for attributes whose shape is fixed.
#[derive(Debug, Clone, PartialEq)]
pub struct Attributes(pub Vec<Attribute>);

impl Attributes {
    pub fn find_by_name(&self, name: &str, constant_pool: &ConstantPool) -> Option<&Attribute> {
        self.0.iter().find(|a| {
            constant_pool
                .utf8_at(a.attribute_name_index)
                .map(|utf8| utf8.as_bytes() == name.as_bytes())
                .unwrap_or(false)
        })
    }
}

/// Required body length of the attributes whose layout is a single fixed
/// item, per JVMS 4.7. A mismatch is a format error.
pub(crate) fn known_attribute_length(name: &[u8]) -> Option<u32> {
    match name {
        b"ConstantValue" | b"SourceFile" | b"Signature" | b"NestHost" => Some(2),
        b"Deprecated" | b"Synthetic" => Some(0),
        _ => None,
    }
}
