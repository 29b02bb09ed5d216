use log::trace;

use crate::{
    class_file::ParsedClass,
    constant_pool::{ConstantPool, EntryTag},
    ClassFileError, ParseConfig, Result,
};

/// Validates the constraints that need the whole constant pool and field
/// table in view, per JVMS 4.8 checks (4) and (5). Purely a read over the
/// parsed class; calling it twice yields the same result.
pub fn format_check(class: &ParsedClass, config: &ParseConfig) -> Result<()> {
    validate_constant_pool(&class.constant_pool)?;
    validate_fields(class)?;

    if config.trace_format_check {
        let name = class
            .class_name()
            .unwrap_or_else(|_| "<unresolved>".into());
        trace!("Class {} has been format-checked.", name);
    }

    Ok(())
}

/// Sweeps every usable constant pool entry once, in slot order, and checks
/// the constraints of JVMS 4.4 that parsing alone cannot establish. Entries
/// referenced by another entry are validated where the sweep reaches them;
/// the referencing entry only checks that the target exists and has the
/// right variant.
fn validate_constant_pool(pool: &ConstantPool) -> Result<()> {
    let count = pool.count();
    if pool.entries().len() != count as usize {
        return Err(ClassFileError::CpSizeMismatch {
            expected: count,
            got: pool.entries().len(),
        });
    }
    match pool.entry(0) {
        Some(entry) if entry.tag == EntryTag::Dummy => {}
        _ => return Err(ClassFileError::MissingDummy(0)),
    }

    let mut j = 1usize;
    while j < count as usize {
        let entry = pool.entries()[j];
        match entry.tag {
            EntryTag::Dummy => {}
            EntryTag::Utf8 => {
                let utf8 = pool
                    .utf8(entry.slot)
                    .ok_or(bad_slot(j as u16, "utf8"))?;
                // No byte may be zero, and none may lie in 0xF0..=0xFF.
                for &byte in utf8.as_bytes() {
                    if byte == 0x00 || byte >= 0xF0 {
                        return Err(ClassFileError::BadUtf8Byte { index: j as u16, byte });
                    }
                }
            }
            EntryTag::Integer => {
                if entry.slot >= pool.integers().len() {
                    return Err(bad_slot(j as u16, "integer"));
                }
            }
            EntryTag::Float => {
                if entry.slot >= pool.floats().len() {
                    return Err(bad_slot(j as u16, "float"));
                }
            }
            EntryTag::Long => {
                if entry.slot >= pool.longs().len() {
                    return Err(bad_slot(j as u16, "long"));
                }
                match pool.entry((j + 1) as u16) {
                    Some(next) if next.tag == EntryTag::Dummy => {}
                    _ => return Err(ClassFileError::MissingDummy(j as u16)),
                }
                j += 1;
            }
            EntryTag::Double => {
                if entry.slot >= pool.doubles().len() {
                    return Err(bad_slot(j as u16, "double"));
                }
                match pool.entry((j + 1) as u16) {
                    Some(next) if next.tag == EntryTag::Dummy => {}
                    _ => return Err(ClassFileError::MissingDummy(j as u16)),
                }
                j += 1;
            }
            EntryTag::Class => {
                let name_index = pool.class_ref(entry.slot).ok_or(bad_slot(j as u16, "class"))?;
                pool.utf8_at(name_index)?;
            }
            EntryTag::String => {
                let string_index = pool
                    .string_ref(entry.slot)
                    .ok_or(bad_slot(j as u16, "string"))?;
                pool.utf8_at(string_index)?;
            }
            EntryTag::FieldRef => {
                let field_ref = pool
                    .field_ref(entry.slot)
                    .ok_or(bad_slot(j as u16, "field reference"))?;
                pool.class_ref_at(field_ref.class_index)?;
                pool.name_and_type_at(field_ref.name_and_type_index)?;
            }
            EntryTag::MethodRef => {
                let method_ref = pool
                    .method_ref(entry.slot)
                    .ok_or(bad_slot(j as u16, "method reference"))?;
                pool.class_ref_at(method_ref.class_index)?;
                let name_and_type = pool.name_and_type_at(method_ref.name_and_type_index)?;
                // A method named through a MethodRef may only start with '<'
                // if it is exactly <init>.
                let name = pool.utf8_at(name_and_type.name_index)?;
                if name.as_bytes().first() == Some(&b'<') && name.as_bytes() != b"<init>" {
                    return Err(ClassFileError::BadMethodName {
                        index: j as u16,
                        name: name.to_string_lossy().into_owned(),
                    });
                }
            }
            EntryTag::InterfaceMethodRef => {
                let method_ref = pool
                    .interface_method_ref(entry.slot)
                    .ok_or(bad_slot(j as u16, "interface method reference"))?;
                let name_index = pool.class_ref_at(method_ref.class_index)?;
                pool.utf8_at(name_index)?;
                // Whether the referenced class really is an interface cannot
                // be decided until the class graph is linked.
                pool.name_and_type_at(method_ref.name_and_type_index)?;
            }
            EntryTag::NameAndType => {
                let name_and_type = pool
                    .name_and_type(entry.slot)
                    .ok_or(bad_slot(j as u16, "name-and-type"))?;
                pool.utf8_at(name_and_type.name_index)?;
                let descriptor = pool.utf8_at(name_and_type.descriptor_index)?;
                if !descriptor
                    .as_bytes()
                    .first()
                    .map_or(false, |&b| is_descriptor_start(b))
                {
                    return Err(ClassFileError::BadDescriptor {
                        index: j as u16,
                        descriptor: descriptor.to_string_lossy().into_owned(),
                    });
                }
            }
            EntryTag::MethodHandle => {
                let handle = pool
                    .method_handle(entry.slot)
                    .ok_or(bad_slot(j as u16, "method handle"))?;
                if !(1..=9).contains(&handle.reference_kind) {
                    return Err(ClassFileError::BadMethodHandleKind {
                        index: j as u16,
                        kind: handle.reference_kind,
                    });
                }
            }
            EntryTag::MethodType => {
                let descriptor_index = pool
                    .method_type(entry.slot)
                    .ok_or(bad_slot(j as u16, "method type"))?;
                let descriptor = pool.utf8_at(descriptor_index)?;
                if descriptor.as_bytes().first() != Some(&b'(') {
                    return Err(ClassFileError::BadDescriptor {
                        index: j as u16,
                        descriptor: descriptor.to_string_lossy().into_owned(),
                    });
                }
            }
            EntryTag::InvokeDynamic => {
                let invoke_dynamic = pool
                    .invoke_dynamic(entry.slot)
                    .ok_or(bad_slot(j as u16, "invoke-dynamic"))?;
                // The bootstrap method index is matched against the
                // BootstrapMethods attribute in a later pass.
                pool.name_and_type_at(invoke_dynamic.name_and_type_index)?;
            }
        }
        j += 1;
    }

    Ok(())
}

/// Checks every field's name and descriptor: both indices must resolve to
/// UTF8 entries, the name may not start with a digit or contain a space,
/// and the descriptor must open with a valid type letter.
fn validate_fields(class: &ParsedClass) -> Result<()> {
    let pool = &class.constant_pool;
    for (i, field) in class.fields.iter().enumerate() {
        let name = pool
            .utf8_at(field.name_index)
            .map_err(|_| ClassFileError::BadFieldSlot { index: i })?;
        let descriptor = pool
            .utf8_at(field.descriptor_index)
            .map_err(|_| ClassFileError::BadFieldSlot { index: i })?;

        let name_bytes = name.as_bytes();
        if name_bytes.first().map_or(false, u8::is_ascii_digit) {
            return Err(ClassFileError::BadFieldName {
                index: i,
                name: name.to_string_lossy().into_owned(),
            });
        }
        if name_bytes.contains(&b' ') {
            return Err(ClassFileError::BadFieldName {
                index: i,
                name: name.to_string_lossy().into_owned(),
            });
        }

        if !descriptor
            .as_bytes()
            .first()
            .map_or(false, |&b| is_descriptor_start(b))
        {
            return Err(ClassFileError::BadFieldDescriptor {
                name: name.to_string_lossy().into_owned(),
                descriptor: descriptor.to_string_lossy().into_owned(),
            });
        }
    }

    Ok(())
}

// JVMS 4.3.2: B C D F I J L S Z [ open a field descriptor; a method
// descriptor opens with a parenthesis.
fn is_descriptor_start(b: u8) -> bool {
    matches!(
        b,
        b'(' | b'B' | b'C' | b'D' | b'F' | b'I' | b'J' | b'L' | b'S' | b'Z' | b'['
    )
}

fn bad_slot(index: u16, pool: &'static str) -> ClassFileError {
    ClassFileError::BadSlot { index, pool }
}
