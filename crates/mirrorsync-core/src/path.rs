//! Relative paths and file sets used as comparison keys across trees.

use std::collections::HashSet;
use std::collections::hash_set;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Leading character that marks a file as hidden.
pub const HIDDEN_MARKER: char = '.';

/// Separator used in the canonical form of a [`RelativePath`].
const SEPARATOR: &str = "/";

/// Whether a file name starts with [`HIDDEN_MARKER`].
///
/// Works on the raw name, so names that are not valid UTF-8 are classified
/// too.
pub fn is_hidden_name(name: &OsStr) -> bool {
    name.as_encoded_bytes().first() == Some(&(HIDDEN_MARKER as u8))
}

/// A file path relative to a tree root.
///
/// Components are always joined with `/`, so the same file under two
/// different roots produces the same key. Names are kept as raw OS strings,
/// so files whose names are not valid UTF-8 are compared exactly like any
/// other. Two relative paths are equal iff their raw forms are equal; no
/// case folding or normalization is done.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelativePath(OsString);

impl RelativePath {
    /// Create a relative path from its canonical `/`-separated form.
    pub fn new(path: impl Into<OsString>) -> Self {
        Self(path.into())
    }

    /// Strip `root` from `path` and build the canonical key.
    ///
    /// Returns `None` when `path` is not under `root` or when it is `root`
    /// itself.
    pub fn from_root(root: &Path, path: &Path) -> Option<Self> {
        let stripped = path.strip_prefix(root).ok()?;

        let mut key = OsString::new();
        for component in stripped.components() {
            let Component::Normal(part) = component else {
                return None;
            };
            if !key.is_empty() {
                key.push(SEPARATOR);
            }
            key.push(part);
        }

        if key.is_empty() { None } else { Some(Self(key)) }
    }

    /// The canonical form.
    pub fn as_os_str(&self) -> &OsStr {
        &self.0
    }

    /// The final component.
    pub fn file_name(&self) -> &OsStr {
        Path::new(&self.0).file_name().unwrap_or(self.as_os_str())
    }

    /// Whether the final component starts with [`HIDDEN_MARKER`].
    pub fn is_hidden(&self) -> bool {
        is_hidden_name(self.file_name())
    }

    /// Re-anchor this path under `root` using native separators.
    pub fn to_native(&self, root: &Path) -> PathBuf {
        let mut path = root.to_path_buf();
        for part in Path::new(&self.0).components() {
            path.push(part);
        }
        path
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_string_lossy())
    }
}

impl From<&str> for RelativePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// The set of regular files found under a root.
///
/// Built fresh every cycle. Iteration order is unspecified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSet {
    paths: HashSet<RelativePath>,
}

impl FileSet {
    /// Create an empty file set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a path. Returns `false` if it was already present.
    pub fn insert(&mut self, path: RelativePath) -> bool {
        self.paths.insert(path)
    }

    /// Check membership.
    pub fn contains(&self, path: &RelativePath) -> bool {
        self.paths.contains(path)
    }

    /// Number of files.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Iterate over members in unspecified order.
    pub fn iter(&self) -> hash_set::Iter<'_, RelativePath> {
        self.paths.iter()
    }

    /// Paths present in exactly one of `self` and `other`.
    pub fn symmetric_difference<'a>(
        &'a self,
        other: &'a FileSet,
    ) -> impl Iterator<Item = &'a RelativePath> {
        self.paths.symmetric_difference(&other.paths)
    }

    /// Members sorted by their string form.
    pub fn sorted(&self) -> Vec<&RelativePath> {
        let mut paths: Vec<_> = self.paths.iter().collect();
        paths.sort();
        paths
    }
}

impl FromIterator<RelativePath> for FileSet {
    fn from_iter<I: IntoIterator<Item = RelativePath>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<&'a str> for FileSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(RelativePath::from).collect()
    }
}

impl IntoIterator for FileSet {
    type Item = RelativePath;
    type IntoIter = hash_set::IntoIter<RelativePath>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.into_iter()
    }
}

impl<'a> IntoIterator for &'a FileSet {
    type Item = &'a RelativePath;
    type IntoIter = hash_set::Iter<'a, RelativePath>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}
