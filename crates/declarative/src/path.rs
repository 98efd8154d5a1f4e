//! Dotted field paths
//!
//! A [`FieldPath`] names a node in a configuration tree by the sequence of
//! mapping keys leading to it (`stateful_node.compute.os_disk`). Both the
//! type registry and the exclusion mask are keyed by these paths.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Location of a node in a configuration tree
///
/// Always holds at least one segment, and no segment is empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Start a new path at a top-level field
    pub fn root(segment: impl Into<String>) -> Self {
        Self {
            segments: vec![segment.into()],
        }
    }

    /// Parse the dotted wire form (`a.b.c`)
    pub fn parse(dotted: &str) -> Result<Self> {
        let segments: Vec<String> = dotted.split('.').map(str::to_string).collect();

        if segments.iter().any(String::is_empty) {
            return Err(Error::InvalidPath(dotted.to_string()));
        }

        Ok(Self { segments })
    }

    /// Path of a direct child of this node
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// Number of segments
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// All segments, root first
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Final segment (the key inside the parent mapping)
    pub fn last(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }

    /// Segments leading to the parent mapping
    pub fn parent_segments(&self) -> &[String] {
        &self.segments[..self.segments.len() - 1]
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl FromStr for FieldPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Parse a list of dotted paths, failing on the first malformed one
pub fn parse_all<S: AsRef<str>>(dotted: &[S]) -> Result<Vec<FieldPath>> {
    dotted.iter().map(|p| FieldPath::parse(p.as_ref())).collect()
}
