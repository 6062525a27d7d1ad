//! Normalized path handling for git-relative paths

use std::path::{Path, PathBuf};

/// A path normalized to use forward slashes internally.
///
/// Git index entries, prefix contexts and filter patterns all use forward
/// slashes regardless of platform, so tree-relative paths are carried in
/// this form and converted to native paths only at I/O boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    ///
    /// Converts backslashes to forward slashes for internal storage.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        let normalized = path_str.replace('\\', "/");
        Self { inner: normalized }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Get the parent directory.
    ///
    /// A single relative component such as `.gitignore` has no parent.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(idx) if idx > 0 => Some(Self {
                inner: trimmed[..idx].to_string(),
            }),
            Some(0) => Some(Self {
                inner: "/".to_string(),
            }),
            _ => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Render this tree-relative path as an anchored prefix context.
    ///
    /// `sub/dir` becomes `/sub/dir`; the root itself becomes the empty string.
    pub fn to_anchored(&self) -> String {
        let trimmed = self.inner.trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{}", trimmed)
        }
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_of_nested_ignore_file() {
        let path = NormalizedPath::new("src/gen/.gitignore");
        assert_eq!(path.parent().unwrap().as_str(), "src/gen");
    }

    #[test]
    fn root_level_file_has_no_parent() {
        assert!(NormalizedPath::new(".gitignore").parent().is_none());
    }

    #[test]
    fn anchored_form_adds_single_leading_slash() {
        assert_eq!(NormalizedPath::new("sub").to_anchored(), "/sub");
        assert_eq!(NormalizedPath::new("a/b/").to_anchored(), "/a/b");
        assert_eq!(NormalizedPath::new("").to_anchored(), "");
    }

    #[test]
    fn backslashes_are_normalized() {
        let path = NormalizedPath::new("sub\\dir\\.gitignore");
        assert_eq!(path.as_str(), "sub/dir/.gitignore");
        assert_eq!(path.file_name(), Some(".gitignore"));
    }
}
