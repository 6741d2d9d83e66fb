// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection (edge) definitions for the graph.

use crate::node::NodeId;
use crate::row::RowId;
use serde::{Deserialize, Serialize};

/// One end of a connection: a data row on a specific node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    /// Node owning the row
    pub node: NodeId,
    /// Row on that node
    pub row: RowId,
}

impl Endpoint {
    /// Create a new endpoint
    pub fn new(node: NodeId, row: RowId) -> Self {
        Self { node, row }
    }
}

/// A directed edge owned by its source node: `(owner, row) -> to`.
///
/// The source node id is implicit; a node's `connections` list only ever
/// contains edges whose source row belongs to that node's own rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Source row on the owning node
    pub row: RowId,
    /// Target endpoint
    pub to: Endpoint,
}

impl Connection {
    /// Create a new connection
    pub fn new(row: RowId, to: Endpoint) -> Self {
        Self { row, to }
    }

    /// Check for an exact edge match
    pub fn matches(&self, row: RowId, to: Endpoint) -> bool {
        self.row == row && self.to == to
    }

    /// Check whether this edge feeds the given sink
    pub fn targets(&self, node: NodeId, row: RowId) -> bool {
        self.to.node == node && self.to.row == row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets() {
        let c = Connection::new(RowId(0), Endpoint::new(NodeId(2), RowId(1)));
        assert!(c.targets(NodeId(2), RowId(1)));
        assert!(!c.targets(NodeId(2), RowId(0)));
        assert!(!c.targets(NodeId(1), RowId(1)));
    }
}
