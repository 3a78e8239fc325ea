//! Edge and node type restrictions for walks over a typed graph.
//!
//! Provides the node kind enumeration ([`node::NodeType`]), the edge filter
//! compiled from a `src:dst` rule string ([`edges::EdgeTypeFilter`]), its
//! node-level sibling ([`nodes::NodeTypeFilter`]) and TOML configuration.

pub mod config;
pub mod edges;
pub mod error;
pub mod node;
pub mod nodes;
