// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the graph model.

use crate::connection::Connection;
use crate::geometry::Position;
use crate::group::GroupId;
use crate::row::{DataRow, RowId, RowValue};
use serde::{Deserialize, Serialize};

/// Unique identifier for a node, assigned monotonically by the graph and
/// never reused within a session (deletion does not renumber).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Node capability kind.
///
/// A channel both receives and re-sends, so values can flow through it
/// transitively (sender -> channel -> receiver).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Emits values; rows are editable literals
    Sender,
    /// Consumes values; rows display what flows in
    Receiver,
    /// Both sender and receiver
    Channel,
}

impl NodeKind {
    /// Whether rows on this node can act as connection sources
    pub fn can_send(self) -> bool {
        matches!(self, Self::Sender | Self::Channel)
    }

    /// Whether rows on this node can act as connection sinks
    pub fn can_receive(self) -> bool {
        matches!(self, Self::Receiver | Self::Channel)
    }

    /// Decode the integer drop-payload encoding (SENDER=1, RECEIVER=2,
    /// CHANNEL=3). Unknown values yield `None`.
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(Self::Sender),
            2 => Some(Self::Receiver),
            3 => Some(Self::Channel),
            _ => None,
        }
    }

    /// Encode for the drop-payload contract
    pub fn as_raw(self) -> u8 {
        match self {
            Self::Sender => 1,
            Self::Receiver => 2,
            Self::Channel => 3,
        }
    }

    /// Display label for the kind
    pub fn label(self) -> &'static str {
        match self {
            Self::Sender => "SENDER",
            Self::Receiver => "RECEIVER",
            Self::Channel => "CHANNEL",
        }
    }
}

/// A node instance in the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique instance id
    pub id: NodeId,
    /// Display title (user-editable)
    pub title: String,
    /// Capability kind
    pub kind: NodeKind,
    /// Position in canvas-local units
    pub position: Position,
    /// Ordered data rows; order is insertion order and drives connector
    /// vertical placement
    pub rows: Vec<DataRow>,
    /// Outbound edges owned by this node
    pub connections: Vec<Connection>,
    /// Optional group membership (categorical, not ownership)
    pub group: Option<GroupId>,
    /// Whether the node body is collapsed in the UI
    pub collapsed: bool,
}

impl Node {
    /// Create a new empty node
    pub fn new(id: NodeId, title: impl Into<String>, kind: NodeKind, position: Position) -> Self {
        Self {
            id,
            title: title.into(),
            kind,
            position,
            rows: Vec::new(),
            connections: Vec::new(),
            group: None,
            collapsed: false,
        }
    }

    /// Get a row by id
    pub fn row(&self, row_id: RowId) -> Option<&DataRow> {
        self.rows.iter().find(|r| r.id == row_id)
    }

    /// Get a mutable row by id
    pub fn row_mut(&mut self, row_id: RowId) -> Option<&mut DataRow> {
        self.rows.iter_mut().find(|r| r.id == row_id)
    }

    /// Index of a row within the ordered row list
    pub fn row_index(&self, row_id: RowId) -> Option<usize> {
        self.rows.iter().position(|r| r.id == row_id)
    }

    /// Append a new row with a fresh in-node id, a generated title and a
    /// numeric zero value. Returns the new row's id.
    pub fn add_row(&mut self) -> RowId {
        let id = RowId(self.rows.iter().map(|r| r.id.0 + 1).max().unwrap_or(0));
        let title = format!("data_#{}", id.0);
        self.rows.push(DataRow::new(id, title, RowValue::Number(0.0)));
        id
    }

    /// Whether any outbound edge starts at the given row
    pub fn sends_from(&self, row_id: RowId) -> bool {
        self.connections.iter().any(|c| c.row == row_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_capabilities() {
        assert!(NodeKind::Sender.can_send());
        assert!(!NodeKind::Sender.can_receive());
        assert!(!NodeKind::Receiver.can_send());
        assert!(NodeKind::Receiver.can_receive());
        assert!(NodeKind::Channel.can_send());
        assert!(NodeKind::Channel.can_receive());
    }

    #[test]
    fn test_raw_round_trip() {
        for kind in [NodeKind::Sender, NodeKind::Receiver, NodeKind::Channel] {
            assert_eq!(NodeKind::from_raw(kind.as_raw()), Some(kind));
        }
        assert_eq!(NodeKind::from_raw(0), None);
        assert_eq!(NodeKind::from_raw(4), None);
    }

    #[test]
    fn test_add_row_assigns_fresh_ids() {
        let mut node = Node::new(NodeId(0), "n", NodeKind::Sender, Position::ZERO);
        let a = node.add_row();
        let b = node.add_row();
        assert_ne!(a, b);
        assert_eq!(node.rows.len(), 2);
        assert_eq!(node.row(a).unwrap().value, RowValue::Number(0.0));
    }
}
