use std::io;

use byteorder::{BigEndian, WriteBytesExt};

use crate::{
    attributes::Attributes,
    class_file::ParsedClass,
    constant_pool::{ConstantPool, EntryTag},
    AccessFlags,
};

type Endian = BigEndian;

impl ParsedClass {
    /// Serializes the class back into the class file format. The dummy
    /// slots after long and double constants are implied by their tags and
    /// are not written. A class that parsed successfully always serializes;
    /// a hand-assembled one with dangling slots reports `InvalidInput`.
    pub fn write_to<W: WriteBytesExt>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u32::<Endian>(0xCAFEBABE)?;
        writer.write_u16::<Endian>(self.minor_version)?;
        writer.write_u16::<Endian>(self.major_version)?;

        write_constant_pool(&self.constant_pool, writer)?;

        writer.write_u16::<Endian>(self.access_flags.bits())?;
        writer.write_u16::<Endian>(self.this_class)?;
        writer.write_u16::<Endian>(self.super_class)?;

        writer.write_u16::<Endian>(self.interfaces.len() as u16)?;
        for &interface in &self.interfaces {
            writer.write_u16::<Endian>(interface)?;
        }

        writer.write_u16::<Endian>(self.fields.len() as u16)?;
        for field in &self.fields {
            write_member(
                field.access_flags,
                field.name_index,
                field.descriptor_index,
                &field.attributes,
                writer,
            )?;
        }

        writer.write_u16::<Endian>(self.methods.len() as u16)?;
        for method in &self.methods {
            write_member(
                method.access_flags,
                method.name_index,
                method.descriptor_index,
                &method.attributes,
                writer,
            )?;
        }

        write_attributes(&self.attributes, writer)?;

        Ok(())
    }

    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        Ok(buf)
    }
}

fn write_constant_pool<W: WriteBytesExt>(pool: &ConstantPool, writer: &mut W) -> io::Result<()> {
    writer.write_u16::<Endian>(pool.count())?;
    for (_, entry) in pool.iter() {
        match entry.tag {
            EntryTag::Dummy => {}
            EntryTag::Utf8 => {
                let utf8 = pool.utf8(entry.slot).ok_or_else(|| dangling("utf8"))?;
                writer.write_u8(1)?;
                writer.write_u16::<Endian>(utf8.as_bytes().len() as u16)?;
                writer.write_all(utf8.as_bytes())?;
            }
            EntryTag::Integer => {
                let value = *pool
                    .integers()
                    .get(entry.slot)
                    .ok_or_else(|| dangling("integer"))?;
                writer.write_u8(3)?;
                writer.write_i32::<Endian>(value)?;
            }
            EntryTag::Float => {
                let value = *pool
                    .floats()
                    .get(entry.slot)
                    .ok_or_else(|| dangling("float"))?;
                writer.write_u8(4)?;
                writer.write_u32::<Endian>(value.to_bits())?;
            }
            EntryTag::Long => {
                let value = *pool
                    .longs()
                    .get(entry.slot)
                    .ok_or_else(|| dangling("long"))?;
                writer.write_u8(5)?;
                writer.write_i64::<Endian>(value)?;
            }
            EntryTag::Double => {
                let value = *pool
                    .doubles()
                    .get(entry.slot)
                    .ok_or_else(|| dangling("double"))?;
                writer.write_u8(6)?;
                writer.write_u64::<Endian>(value.to_bits())?;
            }
            EntryTag::Class => {
                let name_index = pool.class_ref(entry.slot).ok_or_else(|| dangling("class"))?;
                writer.write_u8(7)?;
                writer.write_u16::<Endian>(name_index)?;
            }
            EntryTag::String => {
                let string_index = pool
                    .string_ref(entry.slot)
                    .ok_or_else(|| dangling("string"))?;
                writer.write_u8(8)?;
                writer.write_u16::<Endian>(string_index)?;
            }
            EntryTag::FieldRef => {
                let ref_info = pool
                    .field_ref(entry.slot)
                    .ok_or_else(|| dangling("field reference"))?;
                writer.write_u8(9)?;
                writer.write_u16::<Endian>(ref_info.class_index)?;
                writer.write_u16::<Endian>(ref_info.name_and_type_index)?;
            }
            EntryTag::MethodRef => {
                let ref_info = pool
                    .method_ref(entry.slot)
                    .ok_or_else(|| dangling("method reference"))?;
                writer.write_u8(10)?;
                writer.write_u16::<Endian>(ref_info.class_index)?;
                writer.write_u16::<Endian>(ref_info.name_and_type_index)?;
            }
            EntryTag::InterfaceMethodRef => {
                let ref_info = pool
                    .interface_method_ref(entry.slot)
                    .ok_or_else(|| dangling("interface method reference"))?;
                writer.write_u8(11)?;
                writer.write_u16::<Endian>(ref_info.class_index)?;
                writer.write_u16::<Endian>(ref_info.name_and_type_index)?;
            }
            EntryTag::NameAndType => {
                let info = pool
                    .name_and_type(entry.slot)
                    .ok_or_else(|| dangling("name-and-type"))?;
                writer.write_u8(12)?;
                writer.write_u16::<Endian>(info.name_index)?;
                writer.write_u16::<Endian>(info.descriptor_index)?;
            }
            EntryTag::MethodHandle => {
                let info = pool
                    .method_handle(entry.slot)
                    .ok_or_else(|| dangling("method handle"))?;
                writer.write_u8(15)?;
                writer.write_u8(info.reference_kind)?;
                writer.write_u16::<Endian>(info.reference_index)?;
            }
            EntryTag::MethodType => {
                let descriptor_index = pool
                    .method_type(entry.slot)
                    .ok_or_else(|| dangling("method type"))?;
                writer.write_u8(16)?;
                writer.write_u16::<Endian>(descriptor_index)?;
            }
            EntryTag::InvokeDynamic => {
                let info = pool
                    .invoke_dynamic(entry.slot)
                    .ok_or_else(|| dangling("invoke-dynamic"))?;
                writer.write_u8(18)?;
                writer.write_u16::<Endian>(info.bootstrap_method_attr_index)?;
                writer.write_u16::<Endian>(info.name_and_type_index)?;
            }
        }
    }

    Ok(())
}

fn write_member<W: WriteBytesExt>(
    access_flags: AccessFlags,
    name_index: u16,
    descriptor_index: u16,
    attributes: &Attributes,
    writer: &mut W,
) -> io::Result<()> {
    writer.write_u16::<Endian>(access_flags.bits())?;
    writer.write_u16::<Endian>(name_index)?;
    writer.write_u16::<Endian>(descriptor_index)?;
    write_attributes(attributes, writer)?;
    Ok(())
}

fn write_attributes<W: WriteBytesExt>(attributes: &Attributes, writer: &mut W) -> io::Result<()> {
    writer.write_u16::<Endian>(attributes.0.len() as u16)?;
    for attribute in &attributes.0 {
        writer.write_u16::<Endian>(attribute.attribute_name_index)?;
        writer.write_u32::<Endian>(attribute.info.len() as u32)?;
        writer.write_all(&attribute.info)?;
    }
    Ok(())
}

fn dangling(pool: &'static str) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("dangling {} pool slot", pool),
    )
}
