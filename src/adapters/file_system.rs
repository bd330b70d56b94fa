// SPDX-License-Identifier: MIT OR Apache-2.0

//! File readers backed by the real file system and by memory.

use crate::ports::{FileReader, FileType};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Maximum allowed size of an option file (10MB)
/// This prevents denial of service attacks via extremely large files
pub const MAX_OPTION_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Reads files from the local file system.
///
/// # Examples
///
/// ```rust
/// use optcfg::adapters::FsFileReader;
/// use optcfg::ports::{FileReader, FileType};
/// use std::path::Path;
///
/// let reader = FsFileReader::new();
/// assert_eq!(reader.file_type(Path::new("/definitely/not/here")), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FsFileReader;

impl FsFileReader {
    /// Creates a new file-system reader.
    pub fn new() -> Self {
        FsFileReader
    }
}

impl FileReader for FsFileReader {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        // Check file size before reading to prevent DoS via large files
        let metadata = fs::metadata(path)?;
        if metadata.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is a directory", path.display()),
            ));
        }
        if metadata.len() > MAX_OPTION_FILE_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Option file too large: {} bytes (max {} bytes)",
                    metadata.len(),
                    MAX_OPTION_FILE_SIZE
                ),
            ));
        }
        fs::read_to_string(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        path.canonicalize()
    }

    fn file_type(&self, path: &Path) -> Option<FileType> {
        let metadata = fs::metadata(path).ok()?;
        Some(if metadata.is_file() {
            FileType::File
        } else if metadata.is_dir() {
            FileType::Directory
        } else {
            FileType::Other
        })
    }

    fn check_readable(&self, path: &Path) -> io::Result<()> {
        if self.file_type(path) == Some(FileType::Directory) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is a directory", path.display()),
            ));
        }
        fs::File::open(path).map(|_| ())
    }
}

/// Serves files from memory.
///
/// Relative paths are resolved against `/`; the parent directories of every
/// file exist implicitly.
///
/// # Examples
///
/// ```rust
/// use optcfg::adapters::InMemoryFileReader;
/// use optcfg::ports::FileReader;
/// use std::path::Path;
///
/// let reader = InMemoryFileReader::new().with_file("/conf/main.properties", "a = 1");
/// assert_eq!(reader.read_to_string(Path::new("/conf/../conf/main.properties")).unwrap(), "a = 1");
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryFileReader {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
}

impl InMemoryFileReader {
    /// Creates an empty reader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file.
    pub fn with_file(mut self, path: impl AsRef<Path>, content: impl Into<String>) -> Self {
        let path = normalize(path.as_ref());
        self.add_parents(&path);
        self.files.insert(path, content.into());
        self
    }

    /// Adds an (empty) directory.
    pub fn with_directory(mut self, path: impl AsRef<Path>) -> Self {
        let path = normalize(path.as_ref());
        self.add_parents(&path);
        self.directories.insert(path);
        self
    }

    fn add_parents(&mut self, path: &Path) {
        for ancestor in path.ancestors().skip(1) {
            self.directories.insert(ancestor.to_path_buf());
        }
    }

    fn not_found(path: &Path) -> io::Error {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        )
    }
}

impl FileReader for InMemoryFileReader {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(&normalize(path))
            .cloned()
            .ok_or_else(|| Self::not_found(path))
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        let normalized = normalize(path);
        if self.files.contains_key(&normalized) || self.directories.contains(&normalized) {
            Ok(normalized)
        } else {
            Err(Self::not_found(path))
        }
    }

    fn file_type(&self, path: &Path) -> Option<FileType> {
        let normalized = normalize(path);
        if self.files.contains_key(&normalized) {
            Some(FileType::File)
        } else if self.directories.contains(&normalized) {
            Some(FileType::Directory)
        } else {
            None
        }
    }
}

/// Makes `path` absolute (relative to `/`) and removes `.` and `..` lexically.
fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::from("/");
    for component in path.components() {
        match component {
            Component::ParentDir => {
                result.pop();
            }
            Component::Normal(part) => result.push(part),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_fs_reader_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "x = 1").unwrap();
        let reader = FsFileReader::new();
        assert_eq!(reader.read_to_string(file.path()).unwrap(), "x = 1");
        assert_eq!(reader.file_type(file.path()), Some(FileType::File));
        assert!(reader.check_readable(file.path()).is_ok());
    }

    #[test]
    fn test_fs_reader_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.properties");
        let reader = FsFileReader::new();
        let error = reader.read_to_string(&missing).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::NotFound);
        assert!(reader.canonicalize(&missing).is_err());
        assert_eq!(reader.file_type(&missing), None);
    }

    #[test]
    fn test_fs_reader_rejects_directory() {
        let dir = tempfile::tempdir().unwrap();
        let reader = FsFileReader::new();
        assert_eq!(reader.file_type(dir.path()), Some(FileType::Directory));
        assert!(reader.read_to_string(dir.path()).is_err());
        assert!(reader.check_readable(dir.path()).is_err());
    }

    #[test]
    fn test_fs_reader_too_large() {
        let file = NamedTempFile::new().unwrap();
        file.as_file().set_len(MAX_OPTION_FILE_SIZE + 1).unwrap();
        let reader = FsFileReader::new();
        let error = reader.read_to_string(file.path()).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::InvalidData);
        assert!(error.to_string().contains("too large"));
    }

    #[test]
    fn test_in_memory_paths() {
        let reader = InMemoryFileReader::new()
            .with_file("conf/a.properties", "a = 1")
            .with_directory("/out");
        assert_eq!(reader.file_type(Path::new("/conf")), Some(FileType::Directory));
        assert_eq!(
            reader.file_type(Path::new("/conf/a.properties")),
            Some(FileType::File)
        );
        assert_eq!(reader.file_type(Path::new("/out")), Some(FileType::Directory));
        assert_eq!(
            reader.canonicalize(Path::new("/conf/./x/../a.properties")).unwrap(),
            PathBuf::from("/conf/a.properties")
        );
        assert_eq!(
            reader.read_to_string(Path::new("/nope")).unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("a/../../b")), PathBuf::from("/b"));
        assert_eq!(normalize(Path::new("/a/./b/")), PathBuf::from("/a/b"));
    }
}
