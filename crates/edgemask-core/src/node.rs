//! Node kinds of the typed graph and the type-spec parser shared by both filters.

use crate::error::RuleError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of a node in the graph.
///
/// Discriminants are contiguous from zero and used directly as table indices,
/// so variants must only ever be appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum NodeType {
    /// File content (blob).
    #[serde(rename = "cnt")]
    Content = 0,
    /// Directory listing.
    #[serde(rename = "dir")]
    Directory = 1,
    /// Commit.
    #[serde(rename = "rev")]
    Revision = 2,
    /// Annotated tag.
    #[serde(rename = "rel")]
    Release = 3,
    /// Snapshot of all branches of an origin at one point in time.
    #[serde(rename = "snp")]
    Snapshot = 4,
    /// Software origin (a repository URL).
    #[serde(rename = "ori")]
    Origin = 5,
}

impl NodeType {
    /// Number of node kinds; the side length of every filter table.
    pub const COUNT: usize = 6;

    /// Wildcard accepted wherever a type spec is expected.
    pub const WILDCARD: &'static str = "*";

    /// Separator between names in a multi-type spec (`rev+rel`).
    pub const LIST_SEPARATOR: char = '+';

    /// Returns all node types in ordinal order.
    #[inline]
    pub fn all() -> [NodeType; Self::COUNT] {
        [
            Self::Content,
            Self::Directory,
            Self::Revision,
            Self::Release,
            Self::Snapshot,
            Self::Origin,
        ]
    }

    /// Stable ordinal of this type, always `< COUNT`.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`NodeType::index`].
    pub fn from_index(index: usize) -> Option<Self> {
        Self::all().get(index).copied()
    }

    /// Canonical three-letter name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Content => "cnt",
            Self::Directory => "dir",
            Self::Revision => "rev",
            Self::Release => "rel",
            Self::Snapshot => "snp",
            Self::Origin => "ori",
        }
    }

    /// Resolve one side of a clause into concrete node types.
    ///
    /// Accepts `*` (every type, in ordinal order), an exact name, or a
    /// `+`-separated list of those. Names are matched exactly: no case folding
    /// and no whitespace trimming. Duplicates collapse, first occurrence wins.
    pub fn parse_spec(field: &str) -> Result<Vec<NodeType>, RuleError> {
        let mut types = Vec::new();
        for token in field.split(Self::LIST_SEPARATOR) {
            if token == Self::WILDCARD {
                for t in Self::all() {
                    if !types.contains(&t) {
                        types.push(t);
                    }
                }
                continue;
            }
            let t = token
                .parse::<NodeType>()
                .map_err(|_| RuleError::UnknownNodeType {
                    field: field.to_string(),
                })?;
            if !types.contains(&t) {
                types.push(t);
            }
        }
        Ok(types)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = RuleError;

    /// Parse a single exact name. Wildcards and lists are handled by
    /// [`NodeType::parse_spec`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| RuleError::UnknownNodeType {
                field: s.to_string(),
            })
    }
}
