//! File metadata lookup
//!
//! The listing code only consumes `MetadataRecord`s; where they come from is
//! behind the `MetadataSource` trait. `FsMetadataSource` is the filesystem
//! implementation used by the server binary.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

/// Read-only metadata for a single path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRecord {
    /// `ls -l` style mode string, e.g. `-rw-r--r--`
    pub permissions: String,
    pub size: u64,
    pub modified: SystemTime,
    /// Path as requested by the client
    pub path: String,
}

/// Source of metadata records, queried fresh on every request
pub trait MetadataSource: Send + Sync {
    /// Looks up a single path
    fn stat(&self, path: &str) -> io::Result<MetadataRecord>;

    /// Paths to list for `path`: its children when it is a directory, the
    /// path itself otherwise
    fn entries(&self, path: &str) -> io::Result<Vec<String>>;
}

/// Filesystem-backed metadata source rooted at a directory
#[derive(Debug, Clone)]
pub struct FsMetadataSource {
    root: PathBuf,
}

impl FsMetadataSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a client path below the root. Parent components are refused.
    fn resolve(&self, path: &str) -> io::Result<PathBuf> {
        let mut resolved = self.root.clone();
        for component in Path::new(path).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir | Component::RootDir => {}
                Component::ParentDir | Component::Prefix(_) => {
                    return Err(io::Error::new(
                        io::ErrorKind::PermissionDenied,
                        "path escapes the server root",
                    ));
                }
            }
        }
        Ok(resolved)
    }
}

impl MetadataSource for FsMetadataSource {
    fn stat(&self, path: &str) -> io::Result<MetadataRecord> {
        let metadata = fs::metadata(self.resolve(path)?)?;

        Ok(MetadataRecord {
            permissions: permission_string(&metadata),
            size: metadata.len(),
            modified: metadata.modified()?,
            path: path.to_string(),
        })
    }

    fn entries(&self, path: &str) -> io::Result<Vec<String>> {
        let real_path = self.resolve(path)?;
        if !fs::metadata(&real_path)?.is_dir() {
            return Ok(vec![path.to_string()]);
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&real_path)? {
            let name = entry?.file_name().to_string_lossy().to_string();
            names.push(if path.is_empty() || path == "." {
                name
            } else {
                format!("{}/{}", path.trim_end_matches('/'), name)
            });
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(unix)]
fn permission_string(metadata: &fs::Metadata) -> String {
    use std::os::unix::fs::PermissionsExt;
    render_mode(metadata.is_dir(), metadata.permissions().mode())
}

#[cfg(not(unix))]
fn permission_string(metadata: &fs::Metadata) -> String {
    let mode = if metadata.permissions().readonly() { 0o444 } else { 0o666 };
    render_mode(metadata.is_dir(), mode)
}

/// Renders the low nine mode bits the way `ls -l` does
pub fn render_mode(is_dir: bool, mode: u32) -> String {
    const FLAGS: [(u32, char); 9] = [
        (0o400, 'r'),
        (0o200, 'w'),
        (0o100, 'x'),
        (0o040, 'r'),
        (0o020, 'w'),
        (0o010, 'x'),
        (0o004, 'r'),
        (0o002, 'w'),
        (0o001, 'x'),
    ];

    let mut rendered = String::with_capacity(10);
    rendered.push(if is_dir { 'd' } else { '-' });
    for (bit, flag) in FLAGS {
        rendered.push(if mode & bit != 0 { flag } else { '-' });
    }
    rendered
}
