use jolt_class_file::ClassFileError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    #[error("class {0} was not found on the classpath")]
    NotFound(String),
    #[error(transparent)]
    ClassFile(#[from] ClassFileError),
}
