//! Edge-type restriction: which (source type, destination type) pairs a
//! traversal may follow.
//!
//! A rule is compiled once into a dense `COUNT × COUNT` table, then queried on
//! every candidate edge of a walk. The query is a single branch plus an array
//! index and never allocates.
//!
//! Grammar:
//!
//! - `*`: unrestricted, no table at all;
//! - missing or empty: every edge forbidden (note the asymmetry with `*`);
//! - `src:dst[,src:dst...]`: each side is an exact name
//!   (`cnt`, `dir`, `rev`, `rel`, `snp`, `ori`), `*`, or a `+` list (`rev+rel`).

use crate::error::RuleError;
use crate::node::NodeType;
use crate::nodes::NodeTypeFilter;
use std::fmt;
use std::str::FromStr;

type Table = [[bool; NodeType::COUNT]; NodeType::COUNT];

/// A parsed but not yet compiled edge rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeRule {
    /// `*`: follow every edge.
    Unrestricted,
    /// Explicit allow-list. Zero clauses denies everything.
    Clauses(Vec<EdgeClause>),
}

/// One `src:dst` segment, with both sides resolved to concrete types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeClause {
    pub sources: Vec<NodeType>,
    pub targets: Vec<NodeType>,
}

impl EdgeClause {
    /// Parse the `position`-th (1-based) clause of `rule`.
    fn parse(rule: &str, position: usize, clause: &str) -> Result<Self, RuleError> {
        let mut fields = clause.split(':');
        let (Some(src), Some(dst), None) = (fields.next(), fields.next(), fields.next()) else {
            return Err(RuleError::MalformedClause {
                clause: clause.to_string(),
                position,
                rule: rule.to_string(),
            });
        };
        Ok(Self {
            sources: NodeType::parse_spec(src)?,
            targets: NodeType::parse_spec(dst)?,
        })
    }
}

impl EdgeRule {
    /// Parse a rule string. `None` and `""` yield zero clauses.
    pub fn parse(rule: Option<&str>) -> Result<Self, RuleError> {
        match rule {
            None | Some("") => Ok(Self::Clauses(Vec::new())),
            Some(NodeType::WILDCARD) => Ok(Self::Unrestricted),
            Some(rule) => rule
                .split(',')
                .enumerate()
                .map(|(i, clause)| EdgeClause::parse(rule, i + 1, clause))
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Clauses),
        }
    }
}

/// Compiled edge-type restriction.
///
/// Immutable once built and `Copy`, so a single instance can be shared by any
/// number of traversal threads without synchronization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EdgeTypeFilter {
    /// `None` means unrestricted; `table[src][dst]` otherwise.
    table: Option<Table>,
}

impl EdgeTypeFilter {
    /// Parse and compile a rule. `None` and `""` deny every edge.
    pub fn new(rule: Option<&str>) -> Result<Self, RuleError> {
        EdgeRule::parse(rule).map(|rule| Self::compile(&rule))
    }

    pub fn compile(rule: &EdgeRule) -> Self {
        let clauses = match rule {
            EdgeRule::Unrestricted => {
                tracing::debug!("edge restriction: unrestricted");
                return Self::unrestricted();
            }
            EdgeRule::Clauses(clauses) => clauses,
        };

        let mut table = [[false; NodeType::COUNT]; NodeType::COUNT];
        for clause in clauses {
            for src in &clause.sources {
                for dst in &clause.targets {
                    table[src.index()][dst.index()] = true;
                }
            }
        }

        let filter = Self { table: Some(table) };
        tracing::debug!(
            clauses = clauses.len(),
            allowed = filter.allowed_count(),
            "compiled edge restriction"
        );
        filter
    }

    pub fn unrestricted() -> Self {
        Self { table: None }
    }

    pub fn deny_all() -> Self {
        Self {
            table: Some([[false; NodeType::COUNT]; NodeType::COUNT]),
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        self.table.is_none()
    }

    /// Whether an edge from a `src` node to a `dst` node may be followed.
    #[inline]
    pub fn is_allowed(&self, src: NodeType, dst: NodeType) -> bool {
        match &self.table {
            None => true,
            Some(table) => table[src.index()][dst.index()],
        }
    }

    /// Permitted pairs, ordered by source then destination ordinal.
    pub fn allowed_pairs(&self) -> impl Iterator<Item = (NodeType, NodeType)> + '_ {
        NodeType::all()
            .into_iter()
            .flat_map(|src| NodeType::all().into_iter().map(move |dst| (src, dst)))
            .filter(|&(src, dst)| self.is_allowed(src, dst))
    }

    pub fn allowed_count(&self) -> usize {
        self.allowed_pairs().count()
    }

    /// The filter to use on the transposed graph: `dst -> src` is allowed
    /// exactly when `src -> dst` was.
    pub fn reversed(&self) -> Self {
        let Some(table) = &self.table else {
            return Self::unrestricted();
        };
        let mut transposed = [[false; NodeType::COUNT]; NodeType::COUNT];
        for (src, row) in table.iter().enumerate() {
            for (dst, &allowed) in row.iter().enumerate() {
                transposed[dst][src] = allowed;
            }
        }
        Self {
            table: Some(transposed),
        }
    }

    /// Additionally forbid every edge touching a node type `nodes` rejects.
    pub fn restrict_nodes(&self, nodes: &NodeTypeFilter) -> Self {
        if nodes.is_unrestricted() {
            return *self;
        }
        let mut table = [[false; NodeType::COUNT]; NodeType::COUNT];
        for (src, dst) in self.allowed_pairs() {
            table[src.index()][dst.index()] = nodes.is_allowed(src) && nodes.is_allowed(dst);
        }
        Self { table: Some(table) }
    }
}

impl FromStr for EdgeTypeFilter {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(Some(s))
    }
}

impl TryFrom<String> for EdgeTypeFilter {
    type Error = RuleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EdgeTypeFilter> for String {
    fn from(filter: EdgeTypeFilter) -> Self {
        filter.to_string()
    }
}

/// Renders a canonical rule that compiles back into an equal filter. Rows
/// that allow every destination collapse to `src:*`.
impl fmt::Display for EdgeTypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(table) = &self.table else {
            return f.write_str(NodeType::WILDCARD);
        };

        let mut clauses = Vec::new();
        for src in NodeType::all() {
            let row = &table[src.index()];
            if row.iter().all(|&allowed| allowed) {
                clauses.push(format!("{}:{}", src, NodeType::WILDCARD));
                continue;
            }
            for dst in NodeType::all() {
                if row[dst.index()] {
                    clauses.push(format!("{}:{}", src, dst));
                }
            }
        }
        f.write_str(&clauses.join(","))
    }
}

/// Format a filter as a source (rows) × destination (columns) grid.
pub fn format_matrix(filter: &EdgeTypeFilter) -> String {
    let mut out = String::from("src\\dst");
    for dst in NodeType::all() {
        out.push_str(&format!(" {}", dst));
    }
    out.push('\n');
    for src in NodeType::all() {
        out.push_str(&format!("{:<7}", src.as_str()));
        for dst in NodeType::all() {
            let mark = if filter.is_allowed(src, dst) { "x" } else { "." };
            out.push_str(&format!(" {:>3}", mark));
        }
        out.push('\n');
    }
    out
}
