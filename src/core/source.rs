use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;

/// Where the walk gets directory listings from.
pub trait DirSource {
    /// Entry names directly inside `path`, in the order the source yields them.
    fn list(&self, path: &Path) -> io::Result<Vec<OsString>>;

    /// Whether `path` is a directory, following symbolic links. Unreadable
    /// paths count as not a directory.
    fn is_dir(&self, path: &Path) -> bool;
}

/// The real filesystem. Listing order is whatever `read_dir` returns.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsSource;

impl DirSource for FsSource {
    fn list(&self, path: &Path) -> io::Result<Vec<OsString>> {
        fs::read_dir(path)?
            .map(|entry| entry.map(|de| de.file_name()))
            .collect()
    }

    fn is_dir(&self, path: &Path) -> bool {
        fs::metadata(path).map(|md| md.is_dir()).unwrap_or(false)
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    /// Fixed-order listings for tests that depend on sibling order.
    #[derive(Default)]
    pub struct MemorySource {
        dirs: HashMap<PathBuf, Vec<OsString>>,
    }

    impl MemorySource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn dir(mut self, path: &str, names: &[&str]) -> Self {
            self.dirs.insert(
                PathBuf::from(path),
                names.iter().map(OsString::from).collect(),
            );
            self
        }
    }

    impl DirSource for MemorySource {
        fn list(&self, path: &Path) -> io::Result<Vec<OsString>> {
            self.dirs.get(path).cloned().ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, format!("{} not found", path.display()))
            })
        }

        fn is_dir(&self, path: &Path) -> bool {
            self.dirs.contains_key(path)
        }
    }
}
