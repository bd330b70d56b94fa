// SPDX-License-Identifier: MIT OR Apache-2.0

//! File-access trait definition.
//!
//! The parser and the file converter never touch the file system directly; they
//! go through a [`FileReader`], so that tests and embedding applications can
//! supply files from memory.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// What kind of entry a path refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileType {
    /// A regular file
    File,
    /// A directory
    Directory,
    /// Anything else (device, socket, ...)
    Other,
}

/// A trait for read access to files.
///
/// Missing files must be reported as [`io::ErrorKind::NotFound`].
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; one reader is shared by all
/// configurations built from the same builder.
pub trait FileReader: Send + Sync + fmt::Debug {
    /// Reads a whole file as UTF-8.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Returns the canonical, absolute form of an existing path.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;

    /// Returns the type of the entry at `path`, or `None` if nothing exists there.
    fn file_type(&self, path: &Path) -> Option<FileType>;

    /// Checks that `path` is a readable file.
    ///
    /// The default implementation reads the file.
    fn check_readable(&self, path: &Path) -> io::Result<()> {
        self.read_to_string(path).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct OneFile;

    impl FileReader for OneFile {
        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            if path == Path::new("/only") {
                Ok("a = 1".to_string())
            } else {
                Err(io::Error::new(io::ErrorKind::NotFound, "no such file"))
            }
        }

        fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
            Ok(path.to_path_buf())
        }

        fn file_type(&self, path: &Path) -> Option<FileType> {
            (path == Path::new("/only")).then_some(FileType::File)
        }
    }

    #[test]
    fn test_default_check_readable() {
        assert!(OneFile.check_readable(Path::new("/only")).is_ok());
        let error = OneFile.check_readable(Path::new("/other")).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::NotFound);
    }
}
