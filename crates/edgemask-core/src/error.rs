//! Errors raised while compiling traversal rules.

/// A rule string that cannot be compiled into a filter.
///
/// Every variant echoes the offending text verbatim so callers can report it
/// back to whoever wrote the rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// `position` is 1-based within `rule`, so an empty clause left by a
    /// stray comma can still be located.
    #[error("cannot parse edge type {clause:?} (clause {position} of {rule:?}): expected `src:dst`")]
    MalformedClause {
        clause: String,
        position: usize,
        rule: String,
    },
    #[error("unknown node type {field:?}: expected one of cnt, dir, rev, rel, snp, ori or `*`")]
    UnknownNodeType { field: String },
}

impl RuleError {
    /// The clause or field that failed to parse.
    pub fn offending(&self) -> &str {
        match self {
            Self::MalformedClause { clause, .. } => clause,
            Self::UnknownNodeType { field } => field,
        }
    }
}
