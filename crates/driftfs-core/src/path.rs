//! Virtual, scheme-qualified paths.

use std::fmt;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::VfsError;

/// A forward-slash, scheme-qualified identifier for an entry
/// (`scheme://path`).
///
/// The stored path always uses forward slashes regardless of the host
/// OS; whether it is absolute is defined by the scheme's backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VfsPath {
    scheme: CompactString,
    path: String,
}

impl VfsPath {
    /// Create a path from a scheme and a slash-delimited path.
    ///
    /// Backslashes are normalized to forward slashes so that native
    /// Windows paths can be fed in directly.
    pub fn new(scheme: impl Into<CompactString>, path: impl Into<String>) -> Self {
        let mut path = path.into();
        if path.contains('\\') {
            path = path.replace('\\', "/");
        }
        Self {
            scheme: scheme.into(),
            path,
        }
    }

    /// Parse a `scheme://path` string.
    pub fn parse(s: &str) -> Result<Self, VfsError> {
        match s.split_once("://") {
            Some((scheme, path)) if !scheme.is_empty() => Ok(Self::new(scheme, path)),
            _ => Err(VfsError::InvalidArgument {
                message: format!("not a scheme-qualified path: {s}"),
            }),
        }
    }

    /// The scheme, without the `://` separator.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// The slash-delimited path after the scheme.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Append a child name.
    pub fn join(&self, name: &str) -> Self {
        let path = if self.path.is_empty() || self.path.ends_with('/') {
            format!("{}{}", self.path, name)
        } else {
            format!("{}/{}", self.path, name)
        };
        Self {
            scheme: self.scheme.clone(),
            path,
        }
    }

    /// The parent directory, or `None` for a root.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.path.trim_end_matches('/');
        if trimmed.is_empty() {
            return None;
        }
        let cut = trimmed.rfind('/')?;
        // Keep the slash for filesystem roots such as "/" or "C:/".
        let parent = &self.path[..=cut];
        let parent = if parent.len() > 1 && !parent.ends_with(":/") {
            parent.trim_end_matches('/')
        } else {
            parent
        };
        Some(Self {
            scheme: self.scheme.clone(),
            path: parent.to_owned(),
        })
    }

    /// The last path component, or the whole path if there is none.
    pub fn name(&self) -> &str {
        let trimmed = self.path.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(cut) => &trimmed[cut + 1..],
            None => trimmed,
        }
    }
}

impl fmt::Display for VfsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roundtrip() {
        let p = VfsPath::parse("file:///home/user/doc.txt").unwrap();
        assert_eq!(p.scheme(), "file");
        assert_eq!(p.path(), "/home/user/doc.txt");
        assert_eq!(p.to_string(), "file:///home/user/doc.txt");
    }

    #[test]
    fn parse_rejects_schemeless() {
        assert!(VfsPath::parse("/home/user").is_err());
        assert!(VfsPath::parse("://x").is_err());
    }

    #[test]
    fn join_and_name() {
        let dir = VfsPath::new("file", "/a/b");
        let child = dir.join("c.txt");
        assert_eq!(child.path(), "/a/b/c.txt");
        assert_eq!(child.name(), "c.txt");
        assert_eq!(dir.name(), "b");
    }

    #[test]
    fn join_onto_root() {
        let root = VfsPath::new("file", "/");
        assert_eq!(root.join("etc").path(), "/etc");
    }

    #[test]
    fn parent_chain() {
        let p = VfsPath::new("file", "/a/b/c");
        let b = p.parent().unwrap();
        assert_eq!(b.path(), "/a/b");
        let a = b.parent().unwrap();
        assert_eq!(a.path(), "/a");
        let root = a.parent().unwrap();
        assert_eq!(root.path(), "/");
        assert!(root.parent().is_none());
    }

    #[test]
    fn windows_separators_normalized() {
        let p = VfsPath::new("file", r"C:\Users\me");
        assert_eq!(p.path(), "C:/Users/me");
        assert_eq!(p.name(), "me");
        assert_eq!(p.parent().unwrap().path(), "C:/Users");
    }

    #[test]
    fn drive_root_parent() {
        let p = VfsPath::new("file", "C:/Users");
        assert_eq!(p.parent().unwrap().path(), "C:/");
    }
}
