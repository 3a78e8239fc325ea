//! Node-type restriction: which kinds of node a traversal may visit.

use crate::error::RuleError;
use crate::node::NodeType;
use std::fmt;
use std::str::FromStr;

/// Set of node types a traversal is allowed to visit.
///
/// Rule grammar mirrors [`crate::edges::EdgeTypeFilter`]: `*` allows every
/// type without a lookup, a missing or empty rule allows none, anything else
/// is a comma-separated list of type specs (`cnt`, `rev+rel`, `*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeTypeFilter {
    /// `None` means unrestricted.
    mask: Option<[bool; NodeType::COUNT]>,
}

impl NodeTypeFilter {
    /// Compile a node rule. `None` and `""` deny every node type.
    pub fn new(rule: Option<&str>) -> Result<Self, RuleError> {
        let rule = match rule {
            None | Some("") => return Ok(Self::deny_all()),
            Some(NodeType::WILDCARD) => return Ok(Self::unrestricted()),
            Some(r) => r,
        };

        let mut mask = [false; NodeType::COUNT];
        for spec in rule.split(',') {
            for t in NodeType::parse_spec(spec)? {
                mask[t.index()] = true;
            }
        }
        Ok(Self { mask: Some(mask) })
    }

    pub fn unrestricted() -> Self {
        Self { mask: None }
    }

    pub fn deny_all() -> Self {
        Self {
            mask: Some([false; NodeType::COUNT]),
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        self.mask.is_none()
    }

    /// Whether nodes of type `node_type` may be visited.
    #[inline]
    pub fn is_allowed(&self, node_type: NodeType) -> bool {
        match &self.mask {
            None => true,
            Some(mask) => mask[node_type.index()],
        }
    }

    /// Allowed types in ordinal order.
    pub fn allowed_types(&self) -> Vec<NodeType> {
        NodeType::all()
            .into_iter()
            .filter(|t| self.is_allowed(*t))
            .collect()
    }
}

impl FromStr for NodeTypeFilter {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(Some(s))
    }
}

impl TryFrom<String> for NodeTypeFilter {
    type Error = RuleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NodeTypeFilter> for String {
    fn from(filter: NodeTypeFilter) -> Self {
        filter.to_string()
    }
}

/// Renders a rule that compiles back into an equal filter.
impl fmt::Display for NodeTypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unrestricted() {
            return f.write_str(NodeType::WILDCARD);
        }
        let names: Vec<&str> = self.allowed_types().into_iter().map(NodeType::as_str).collect();
        f.write_str(&names.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_allows_everything() {
        let filter = NodeTypeFilter::new(Some("*")).unwrap();
        assert!(filter.is_unrestricted());
        assert!(NodeType::all().into_iter().all(|t| filter.is_allowed(t)));
    }

    #[test]
    fn test_missing_or_empty_denies_everything() {
        for rule in [None, Some("")] {
            let filter = NodeTypeFilter::new(rule).unwrap();
            assert!(!filter.is_unrestricted());
            assert!(filter.allowed_types().is_empty());
        }
    }

    #[test]
    fn test_list_of_specs() {
        let filter: NodeTypeFilter = "cnt,rev+rel".parse().unwrap();
        assert_eq!(
            filter.allowed_types(),
            vec![NodeType::Content, NodeType::Revision, NodeType::Release]
        );
        assert!(!filter.is_allowed(NodeType::Directory));
    }

    #[test]
    fn test_wildcard_inside_list_is_not_unrestricted() {
        let filter: NodeTypeFilter = "cnt,*".parse().unwrap();
        assert!(!filter.is_unrestricted());
        assert_eq!(filter.allowed_types().len(), NodeType::COUNT);
    }

    #[test]
    fn test_unknown_type_is_reported() {
        let err = "cnt,blob".parse::<NodeTypeFilter>().unwrap_err();
        assert_eq!(err.offending(), "blob");
    }

    #[test]
    fn test_display_reparses() {
        for rule in ["*", "", "ori,snp", "dir+cnt"] {
            let filter: NodeTypeFilter = rule.parse().unwrap();
            let again: NodeTypeFilter = filter.to_string().parse().unwrap();
            assert_eq!(filter, again, "rule {:?}", rule);
        }
        assert_eq!("snp,ori,snp".parse::<NodeTypeFilter>().unwrap().to_string(), "snp,ori");
    }
}
