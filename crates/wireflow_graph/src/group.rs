// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node groups: categorical labels with a display color.

use serde::{Deserialize, Serialize};

/// Default display color for new groups
pub const DEFAULT_GROUP_COLOR: &str = "#47a5d3";

/// Unique identifier for a node group, assigned monotonically by the
/// graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId(pub u32);

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A label shared by many nodes. Membership lives on the node side
/// (`Node::group`); removing a group does not remove its nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeGroup {
    /// Unique group id
    pub id: GroupId,
    /// Display title
    pub title: String,
    /// Display color as a hex string, e.g. `#47a5d3`
    pub color: String,
}

impl NodeGroup {
    /// Create a new group with the default color
    pub fn new(id: GroupId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            color: DEFAULT_GROUP_COLOR.to_owned(),
        }
    }
}
