use std::borrow::Cow;

use crate::{
    attributes::Attributes, constant_pool::ConstantPool, parser::Parser, AccessFlags, ParseConfig,
    Result,
};

/// A fully parsed class file. Everything is owned; the source buffer can be
/// dropped as soon as parsing returns.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedClass {
    pub minor_version: u16,
    pub major_version: u16,
    pub constant_pool: ConstantPool,
    pub access_flags: AccessFlags,
    pub this_class: u16,
    pub super_class: u16,
    pub interfaces: Vec<u16>,
    pub fields: Vec<FieldInfo>,
    pub methods: Vec<MethodInfo>,
    pub attributes: Attributes,
}

impl ParsedClass {
    pub fn parse(buf: &[u8], config: ParseConfig) -> Result<ParsedClass> {
        Parser::new(buf, config).parse()
    }

    /// The binary name of the class this file defines.
    pub fn class_name(&self) -> Result<Cow<'_, str>> {
        self.class_name_at(self.this_class)
    }

    /// The binary name of the direct superclass. `None` only for the class
    /// Object, the one class without a superclass.
    pub fn super_class_name(&self) -> Result<Option<Cow<'_, str>>> {
        if self.super_class == 0 {
            return Ok(None);
        }
        self.class_name_at(self.super_class).map(Some)
    }

    fn class_name_at(&self, index: u16) -> Result<Cow<'_, str>> {
        let name_index = self.constant_pool.class_ref_at(index)?;
        let utf8 = self.constant_pool.utf8_at(name_index)?;
        Ok(utf8.to_string_lossy())
    }

    pub fn field_name(&self, field: &FieldInfo) -> Result<Cow<'_, str>> {
        Ok(self.constant_pool.utf8_at(field.name_index)?.to_string_lossy())
    }

    pub fn field_descriptor(&self, field: &FieldInfo) -> Result<Cow<'_, str>> {
        Ok(self
            .constant_pool
            .utf8_at(field.descriptor_index)?
            .to_string_lossy())
    }

    pub fn method_name(&self, method: &MethodInfo) -> Result<Cow<'_, str>> {
        Ok(self.constant_pool.utf8_at(method.name_index)?.to_string_lossy())
    }

    pub fn method_descriptor(&self, method: &MethodInfo) -> Result<Cow<'_, str>> {
        Ok(self
            .constant_pool
            .utf8_at(method.descriptor_index)?
            .to_string_lossy())
    }
}

/// A field of the class. `name_index` and `descriptor_index` are constant
/// pool indices, stored as read; that they resolve to UTF8 entries is
/// established by the format check, not the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    pub access_flags: AccessFlags,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub attributes: Attributes,
}

/// A method of the class, carried with the same name and descriptor
/// indices as a field.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodInfo {
    pub access_flags: AccessFlags,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub attributes: Attributes,
}
