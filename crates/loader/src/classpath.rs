use std::{
    fs::File,
    ops::Deref,
    path::{Path, PathBuf},
};

use memmap::Mmap;

use crate::LoaderError;

/// An ordered list of classpath roots, searched front to back. Roots are
/// plain directories holding `.class` files laid out by package.
pub struct Classpath {
    roots: Vec<PathBuf>,
}

impl Classpath {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    /// Resolves a binary class name such as `java/lang/String` to the bytes
    /// of its `.class` artifact, taken from the first root that has it.
    pub fn locate(&self, class_name: &str) -> Result<ClassBytes, LoaderError> {
        for root in &self.roots {
            let path = class_file_path(root, class_name);
            if path.is_file() {
                let file = File::open(&path)?;
                let mmap = unsafe { Mmap::map(&file)? };
                return Ok(ClassBytes { mmap });
            }
        }

        Err(LoaderError::NotFound(class_name.to_owned()))
    }
}

fn class_file_path(root: &Path, class_name: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    path.extend(class_name.split('/'));
    path.set_extension("class");
    path
}

/// Memory-mapped contents of a located class file. The mapping lives as
/// long as this value; the parser copies what it keeps, so the mapping can
/// be dropped once parsing returns.
pub struct ClassBytes {
    mmap: Mmap,
}

impl Deref for ClassBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.mmap
    }
}

impl AsRef<[u8]> for ClassBytes {
    fn as_ref(&self) -> &[u8] {
        &self.mmap
    }
}

#[cfg(test)]
mod class_file_path_tests {
    use super::*;

    #[test]
    fn it_should_map_package_separators_to_directories() {
        assert_eq!(
            class_file_path(Path::new("/cp"), "java/lang/String"),
            Path::new("/cp/java/lang/String.class")
        );
    }

    #[test]
    fn it_should_handle_unpackaged_classes() {
        assert_eq!(
            class_file_path(Path::new("/cp"), "Main"),
            Path::new("/cp/Main.class")
        );
    }
}
