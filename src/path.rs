//! The storage agnostic path model used for navigation.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

const SEPARATOR: &str = "/";
const PARENT: &str = "..";
const CURRENT: &str = ".";

/// A path in the virtual file system a user sees, made of ordered, non-empty segments below the
/// root `/`.
///
/// Navigation never escapes the root: a `..` at the root fails. Callers that want to probe a
/// path before committing to it navigate on a [`clone`](Clone::clone) and only replace the
/// original once the probe succeeded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VirtualPath {
    segments: Vec<String>,
}

/// Returned when parsing a path that would climb above the root.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("path climbs above the root: {0}")]
pub struct OutsideRoot(pub String);

impl VirtualPath {
    /// The root path `/`.
    pub fn root() -> Self {
        VirtualPath::default()
    }

    /// Moves to `path`. Absolute paths start over from the root; relative paths are applied to
    /// the current segments. An empty path succeeds without changes.
    ///
    /// Returns `false` if a `..` segment would climb above the root. Segments processed before
    /// that point stay applied.
    pub fn navigate(&mut self, path: &str) -> bool {
        if path.is_empty() {
            return true;
        }
        if path.starts_with(SEPARATOR) {
            self.segments.clear();
        }
        for segment in path.split(SEPARATOR).filter(|s| !s.is_empty()) {
            match segment {
                PARENT => {
                    if !self.navigate_up() {
                        return false;
                    }
                }
                CURRENT => {}
                _ => self.segments.push(segment.to_string()),
            }
        }
        true
    }

    /// Moves to the parent. Returns `false` at the root.
    pub fn navigate_up(&mut self) -> bool {
        self.segments.pop().is_some()
    }

    /// The segments from the root down.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns `true` for `/`.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The last segment, or `None` for the root.
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// The parent path, or `None` for the root.
    pub fn parent(&self) -> Option<VirtualPath> {
        let mut parent = self.clone();
        parent.navigate_up().then_some(parent)
    }

    /// Returns `true` if `self` is `other` or lies below it.
    pub fn starts_with(&self, other: &VirtualPath) -> bool {
        self.segments.starts_with(&other.segments)
    }
}

impl Display for VirtualPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", SEPARATOR, self.segments.join(SEPARATOR))
    }
}

impl FromStr for VirtualPath {
    type Err = OutsideRoot;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut path = VirtualPath::root();
        if path.navigate(s) { Ok(path) } else { Err(OutsideRoot(s.to_string())) }
    }
}
