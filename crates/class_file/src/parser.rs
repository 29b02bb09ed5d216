use crate::{
    attributes::{known_attribute_length, Attributes},
    class_file::{FieldInfo, MethodInfo, ParsedClass},
    constant_pool::{ConstantPool, InvokeDynamicInfo, MethodHandleInfo, NameAndTypeInfo, RefInfo},
    raw_reader::RawReader,
    AccessFlags, Attribute, ClassFileError, ParseConfig, Result,
};

/// Drives the raw reader through the ClassFile grammar of JVMS 4.1.
/// Parsing is fail-fast: the first structural error aborts the parse and no
/// partial class is ever returned. Checks that need the whole pool in view
/// belong to the format check, not here.
pub struct Parser<'a> {
    r: RawReader<'a>,
    config: ParseConfig,
}

impl<'a> Parser<'a> {
    pub fn new(buf: &'a [u8], config: ParseConfig) -> Self {
        Self {
            r: RawReader::new(buf),
            config,
        }
    }

    pub fn parse(mut self) -> Result<ParsedClass> {
        self.parse_magic_identifier()?;
        let (major_version, minor_version) = self.parse_version()?;

        let constant_pool = self.parse_constant_pool()?;
        let access_flags = AccessFlags::from_bits_truncate(self.r.read_u2()?);
        let this_class = self.r.read_u2()?;
        let super_class = self.r.read_u2()?;

        let interfaces_count = self.r.read_u2()?;
        let interfaces = (0..interfaces_count)
            .map(|_| self.r.read_u2())
            .collect::<Result<Vec<_>>>()?;

        let fields_count = self.r.read_u2()?;
        let fields = (0..fields_count)
            .map(|_| self.parse_field_info(&constant_pool))
            .collect::<Result<Vec<_>>>()?;

        let methods_count = self.r.read_u2()?;
        let methods = (0..methods_count)
            .map(|_| self.parse_method_info(&constant_pool))
            .collect::<Result<Vec<_>>>()?;

        let attributes_count = self.r.read_u2()?;
        let attributes = self.parse_attributes(attributes_count, &constant_pool)?;

        if !self.r.eof() {
            return Err(ClassFileError::TrailingBytes(self.r.remaining()));
        }

        Ok(ParsedClass {
            minor_version,
            major_version,
            constant_pool,
            access_flags,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            attributes,
        })
    }

    fn parse_magic_identifier(&mut self) -> Result<()> {
        match self.r.read_u4()? {
            0xCAFEBABE => Ok(()),
            magic_identifier => Err(ClassFileError::BadMagic(magic_identifier)),
        }
    }

    fn parse_version(&mut self) -> Result<(u16, u16)> {
        let minor = self.r.read_u2()?;
        let major = self.r.read_u2()?;
        if major > self.config.max_java_version_raw {
            return Err(ClassFileError::UnsupportedVersion {
                got: major,
                max: self.config.max_java_version_raw,
            });
        }
        Ok((major, minor))
    }

    fn parse_constant_pool(&mut self) -> Result<ConstantPool> {
        let constant_pool_count = self.r.read_u2()?;
        let mut pool = ConstantPool::new(constant_pool_count);

        // Long and double constants occupy two slots; the extra slot is
        // filled with a dummy entry and stepped over here.
        let mut j = 1usize;
        while j < constant_pool_count as usize {
            let tag = self.r.read_u1()?;
            match tag {
                1 => {
                    let length = self.r.read_u2()?;
                    let bytes = self.r.read_bytes(length as usize)?;
                    pool.push_utf8(bytes);
                }
                3 => pool.push_integer(self.r.read_u4()? as i32),
                4 => pool.push_float(f32::from_bits(self.r.read_u4()?)),
                5 => {
                    let high_bytes = self.r.read_u4()?;
                    let low_bytes = self.r.read_u4()?;
                    pool.push_long(((high_bytes as i64) << 32) | low_bytes as i64);
                    pool.push_dummy();
                    j += 1;
                }
                6 => {
                    let high_bytes = self.r.read_u4()?;
                    let low_bytes = self.r.read_u4()?;
                    pool.push_double(f64::from_bits(
                        ((high_bytes as u64) << 32) | low_bytes as u64,
                    ));
                    pool.push_dummy();
                    j += 1;
                }
                7 => {
                    let name_index = self.r.read_u2()?;
                    pool.push_class_ref(name_index);
                }
                8 => {
                    let string_index = self.r.read_u2()?;
                    pool.push_string_ref(string_index);
                }
                9 => {
                    let ref_info = self.parse_ref_info()?;
                    pool.push_field_ref(ref_info);
                }
                10 => {
                    let ref_info = self.parse_ref_info()?;
                    pool.push_method_ref(ref_info);
                }
                11 => {
                    let ref_info = self.parse_ref_info()?;
                    pool.push_interface_method_ref(ref_info);
                }
                12 => {
                    let name_index = self.r.read_u2()?;
                    let descriptor_index = self.r.read_u2()?;
                    pool.push_name_and_type(NameAndTypeInfo {
                        name_index,
                        descriptor_index,
                    });
                }
                15 => {
                    let reference_kind = self.r.read_u1()?;
                    let reference_index = self.r.read_u2()?;
                    pool.push_method_handle(MethodHandleInfo {
                        reference_kind,
                        reference_index,
                    });
                }
                16 => {
                    let descriptor_index = self.r.read_u2()?;
                    pool.push_method_type(descriptor_index);
                }
                18 => {
                    let bootstrap_method_attr_index = self.r.read_u2()?;
                    let name_and_type_index = self.r.read_u2()?;
                    pool.push_invoke_dynamic(InvokeDynamicInfo {
                        bootstrap_method_attr_index,
                        name_and_type_index,
                    });
                }
                _ => {
                    return Err(ClassFileError::UnknownCpTag {
                        tag,
                        index: j as u16,
                    })
                }
            }
            j += 1;
        }

        Ok(pool)
    }

    fn parse_field_info(&mut self, constant_pool: &ConstantPool) -> Result<FieldInfo> {
        let access_flags = AccessFlags::from_bits_truncate(self.r.read_u2()?);
        let name_index = self.r.read_u2()?;
        let descriptor_index = self.r.read_u2()?;
        let attributes_count = self.r.read_u2()?;
        let attributes = self.parse_attributes(attributes_count, constant_pool)?;

        Ok(FieldInfo {
            access_flags,
            name_index,
            descriptor_index,
            attributes,
        })
    }

    fn parse_method_info(&mut self, constant_pool: &ConstantPool) -> Result<MethodInfo> {
        let access_flags = AccessFlags::from_bits_truncate(self.r.read_u2()?);
        let name_index = self.r.read_u2()?;
        let descriptor_index = self.r.read_u2()?;
        let attributes_count = self.r.read_u2()?;
        let attributes = self.parse_attributes(attributes_count, constant_pool)?;

        Ok(MethodInfo {
            access_flags,
            name_index,
            descriptor_index,
            attributes,
        })
    }

    fn parse_ref_info(&mut self) -> Result<RefInfo> {
        let class_index = self.r.read_u2()?;
        let name_and_type_index = self.r.read_u2()?;

        Ok(RefInfo {
            class_index,
            name_and_type_index,
        })
    }

    fn parse_attribute(&mut self, constant_pool: &ConstantPool) -> Result<Attribute> {
        let attribute_name_index = self.r.read_u2()?;
        let name = constant_pool.utf8_at(attribute_name_index)?;
        let attribute_length = self.r.read_u4()?;
        if let Some(want) = known_attribute_length(name.as_bytes()) {
            if attribute_length != want {
                return Err(ClassFileError::BadAttributeLength {
                    name: name.to_string_lossy().into_owned(),
                    got: attribute_length,
                    want,
                });
            }
        }
        let info = self.r.read_bytes(attribute_length as usize)?;

        Ok(Attribute {
            attribute_name_index,
            info,
        })
    }

    fn parse_attributes(
        &mut self,
        attributes_count: u16,
        constant_pool: &ConstantPool,
    ) -> Result<Attributes> {
        (0..attributes_count)
            .map(|_| self.parse_attribute(constant_pool))
            .collect::<Result<Vec<_>>>()
            .map(Attributes)
    }
}

#[cfg(test)]
mod parse_magic_identifier_tests {
    use super::*;

    #[test]
    fn it_should_accept_the_correct_identifier() {
        assert!(Parser::new(&[0xCA, 0xFE, 0xBA, 0xBE], ParseConfig::default())
            .parse_magic_identifier()
            .is_ok());
    }

    #[test]
    fn it_should_fail_if_there_is_not_enough_data() {
        assert_eq!(
            Parser::new(&[0xCA, 0xFE, 0xBA], ParseConfig::default()).parse_magic_identifier(),
            Err(ClassFileError::Truncated(0))
        );
    }

    #[test]
    fn it_should_fail_if_the_magic_identifier_is_incorrect() {
        assert_eq!(
            Parser::new(&[0xCA, 0xFE, 0xDE, 0xAD], ParseConfig::default())
                .parse_magic_identifier(),
            Err(ClassFileError::BadMagic(0xCAFEDEAD))
        );
    }
}


#[cfg(test)]
mod parse_constant_pool_tests {
    use super::*;
    use crate::constant_pool::EntryTag;

    #[test]
    fn it_should_reject_an_unknown_tag() {
        // count = 2, then tag 19 (Module), rejected at this tier
        assert_eq!(
            Parser::new(&[0x00, 0x02, 0x13], ParseConfig::default()).parse_constant_pool(),
            Err(ClassFileError::UnknownCpTag { tag: 19, index: 1 })
        );
    }

    #[test]
    fn it_should_pad_longs_with_a_dummy_slot() {
        // count = 3, long 0x0000000100000002
        let bytes = [
            0x00, 0x03, 0x05, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x02,
        ];
        let pool = Parser::new(&bytes, ParseConfig::default())
            .parse_constant_pool()
            .unwrap();
        assert_eq!(pool.longs(), &[0x0000000100000002]);
        assert_eq!(pool.entry(2).unwrap().tag, EntryTag::Dummy);
        assert_eq!(pool.entries().len(), 3);
    }
}
