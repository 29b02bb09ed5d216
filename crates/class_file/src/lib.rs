// https://docs.oracle.com/javase/specs/jvms/se11/html/jvms-4.html

mod access_flags;
pub mod attributes;
mod class_file;
mod config;
pub mod constant_pool;
mod error;
mod format_check;
mod parser;
mod raw_reader;
mod writer;

use std::fmt;

pub use access_flags::AccessFlags;
pub use attributes::Attributes;
pub use class_file::{FieldInfo, MethodInfo, ParsedClass};
pub use config::{ParseConfig, MAX_JAVA_VERSION_RAW};
pub use constant_pool::ConstantPool;
pub use error::ClassFileError;
pub use format_check::format_check;
pub use parser::Parser;
pub use raw_reader::RawReader;

pub type Result<T, E = ClassFileError> = std::result::Result<T, E>;

#[derive(Clone, PartialEq)]
pub struct Attribute {
    pub attribute_name_index: u16,
    pub info: Vec<u8>,
}
impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("attribute_name_index", &self.attribute_name_index)
            .field("info", &format!("({} bytes)", self.info.len()))
            .finish()
    }
}
