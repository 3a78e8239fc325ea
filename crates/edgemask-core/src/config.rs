//! Traversal restriction settings.
//!
//! Load order: `.edgemask/config.toml` → environment variables → defaults.

use crate::edges::EdgeTypeFilter;
use crate::error::RuleError;
use crate::nodes::NodeTypeFilter;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TraversalConfig {
    pub traversal: FilterConfig,
}

/// Rule strings applied to every walk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Edge restriction rule, e.g. `"rev:rev,rev:dir,dir:*"`.
    /// An empty string forbids every edge; `"*"` allows all of them.
    pub edges: String,
    /// Node restriction rule, e.g. `"rev,dir,cnt"`.
    pub nodes: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            edges: "*".to_string(),
            nodes: "*".to_string(),
        }
    }
}

/// Helper to parse an env var and apply it to a config field.
fn env_override<T: std::str::FromStr>(var: &str, target: &mut T) {
    if let Ok(v) = std::env::var(var)
        && let Ok(n) = v.parse()
    {
        tracing::info!("{} overrides configured value", var);
        *target = n;
    }
}

impl TraversalConfig {
    /// Load config from `.edgemask/config.toml` in the project root, with env var overrides.
    /// Falls back to defaults if no config file exists. Both rules are compiled
    /// before returning, so a config that loads always yields valid filters.
    pub fn load(project_root: &Path) -> Result<Self> {
        let config_path = project_root.join(".edgemask").join("config.toml");

        let mut config = if config_path.exists() {
            tracing::debug!("loading config from {}", config_path.display());
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("failed to read {}", config_path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("failed to parse {}", config_path.display()))?
        } else {
            Self::default()
        };

        env_override("EDGEMASK_EDGES", &mut config.traversal.edges);
        env_override("EDGEMASK_NODES", &mut config.traversal.nodes);

        config
            .edge_filter()
            .with_context(|| format!("invalid edge restriction {:?}", config.traversal.edges))?;
        config
            .node_filter()
            .with_context(|| format!("invalid node restriction {:?}", config.traversal.nodes))?;

        Ok(config)
    }

    pub fn edge_filter(&self) -> Result<EdgeTypeFilter, RuleError> {
        self.traversal.edges.parse()
    }

    pub fn node_filter(&self) -> Result<NodeTypeFilter, RuleError> {
        self.traversal.nodes.parse()
    }

    /// Edge filter with the node restriction folded in.
    pub fn effective_filter(&self) -> Result<EdgeTypeFilter, RuleError> {
        Ok(self.edge_filter()?.restrict_nodes(&self.node_filter()?))
    }
}
