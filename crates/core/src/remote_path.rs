//! Paths in the remote Disk tree

use crate::error::{Error, Result};
use std::fmt;

/// Separator between remote path segments
pub const SEPARATOR: char = '/';

/// A non-empty, slash-delimited location on the Disk.
///
/// Paths may carry a root such as `disk:/` or `app:/`, a bare leading `/`,
/// or no root at all. The string is kept as given and only decomposed when
/// ancestors are needed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemotePath(String);

impl RemotePath {
    pub fn new(path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        if path.trim().is_empty() {
            return Err(Error::InvalidInput("Remote path cannot be empty".to_string()));
        }
        Ok(Self(path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The root prefix (`disk:/`, `app:`, `/` or empty)
    pub fn root(&self) -> &str {
        split_root(&self.0).0
    }

    /// Non-empty path components after the root, in order
    pub fn segments(&self) -> Vec<&str> {
        split_root(&self.0)
            .1
            .split(SEPARATOR)
            .filter(|segment| !segment.is_empty())
            .collect()
    }

    /// Every proper ancestor, root-to-leaf, rejoined with a single separator.
    ///
    /// `disk:/a/b/c.txt` yields `disk:/a` then `disk:/a/b`.
    pub fn ancestors(&self) -> Vec<String> {
        let root = self.root();
        let segments = self.segments();
        let parents = segments.len().saturating_sub(1);

        let mut prefix = root.to_string();
        let mut ancestors = Vec::with_capacity(parents);
        for (i, segment) in segments.iter().take(parents).enumerate() {
            if i > 0 {
                prefix.push(SEPARATOR);
            }
            prefix.push_str(segment);
            ancestors.push(prefix.clone());
        }
        ancestors
    }
}

/// Split `path` into its root and the remainder.
///
/// A scheme is the text before the first `:` that precedes any `/`; it is
/// kept together with one following `/`, if present.
fn split_root(path: &str) -> (&str, &str) {
    let scheme_end = match (path.find(':'), path.find(SEPARATOR)) {
        (Some(colon), Some(slash)) if colon < slash => colon + 1,
        (Some(colon), None) => colon + 1,
        _ => 0,
    };

    let rest = &path[scheme_end..];
    let root_end = if rest.starts_with(SEPARATOR) {
        scheme_end + 1
    } else {
        scheme_end
    };

    (&path[..root_end], &path[root_end..])
}

impl fmt::Display for RemotePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RemotePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for RemotePath {
    type Error = Error;

    fn try_from(path: &str) -> Result<Self> {
        Self::new(path)
    }
}

impl TryFrom<String> for RemotePath {
    type Error = Error;

    fn try_from(path: String) -> Result<Self> {
        Self::new(path)
    }
}
