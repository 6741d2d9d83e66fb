// SPDX-License-Identifier: MIT OR Apache-2.0
//! The graph aggregate: the single owner of node, connection and group
//! state. Every mutation funnels through a named operation here.

use crate::connection::{Connection, Endpoint};
use crate::geometry::Position;
use crate::group::{GroupId, NodeGroup};
use crate::node::{Node, NodeId, NodeKind};
use crate::row::{RowId, RowValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Canvas-space offset applied to cloned nodes so the copy is visibly
/// distinct from its source.
pub const CLONE_OFFSET: Position = Position { x: 100.0, y: 100.0 };

/// A node graph with groups, selection and monotonic id allocation.
///
/// Node storage order is the render z-order: selecting a node moves it to
/// the end so it draws on top.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Graph {
    nodes: IndexMap<NodeId, Node>,
    groups: IndexMap<GroupId, NodeGroup>,
    active: Option<NodeId>,
    next_node: u64,
    next_group: u32,
}

impl Graph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self {
            nodes: IndexMap::new(),
            groups: IndexMap::new(),
            active: None,
            next_node: 0,
            next_group: 0,
        }
    }

    // --- nodes ---

    /// Add a node at a canvas-local position. Ids are monotonic and never
    /// reused after deletion.
    pub fn add_node(&mut self, kind: NodeKind, position: Position) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;

        let title = format!("node_{:02}", id.0);
        self.nodes.insert(id, Node::new(id, title, kind, position));
        tracing::debug!(node = %id, ?kind, "added node");
        id
    }

    /// Clone a node: copies rows, kind, group and collapse state, resets
    /// connections, and assigns a fresh id and title. The copy is placed
    /// at a fixed visual offset from the source.
    pub fn clone_node(&mut self, source: NodeId) -> Option<NodeId> {
        let src = self.nodes.get(&source)?.clone();

        let id = NodeId(self.next_node);
        self.next_node += 1;

        let mut node = Node::new(
            id,
            format!("node_{:02}", id.0),
            src.kind,
            src.position + CLONE_OFFSET,
        );
        node.rows = src.rows;
        node.group = src.group;
        node.collapsed = src.collapsed;

        self.nodes.insert(id, node);
        tracing::debug!(node = %id, source = %source, "cloned node");
        Some(id)
    }

    /// Remove a node, cascade-pruning every remaining node's connections
    /// that target it. Survivor z-order is preserved.
    pub fn remove_node(&mut self, id: NodeId) -> Option<Node> {
        let removed = self.nodes.shift_remove(&id)?;

        for node in self.nodes.values_mut() {
            node.connections.retain(|c| c.to.node != id);
        }
        if self.active == Some(id) {
            self.active = None;
        }

        tracing::debug!(node = %id, "removed node");
        Some(removed)
    }

    /// Get a node by id
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Get a mutable node by id
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// All nodes in render z-order (back to front)
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// All node ids in render z-order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // --- selection ---

    /// Mark a node active and raise it to the top of the render order.
    /// No-op for unknown ids.
    pub fn select(&mut self, id: NodeId) {
        let Some(index) = self.nodes.get_index_of(&id) else {
            return;
        };
        self.nodes.move_index(index, self.nodes.len() - 1);
        self.active = Some(id);
    }

    /// Clear the active marker
    pub fn deselect(&mut self) {
        self.active = None;
    }

    /// Currently active node, if any
    pub fn active(&self) -> Option<NodeId> {
        self.active
    }

    // --- connections ---

    /// Connect a source row to a target row.
    ///
    /// State is untouched on any `Err`: self-connections, duplicate edges,
    /// unknown nodes or rows, and capability violations all leave the
    /// graph exactly as it was.
    pub fn connect(
        &mut self,
        src_node: NodeId,
        src_row: RowId,
        dst_node: NodeId,
        dst_row: RowId,
    ) -> Result<(), ConnectError> {
        if src_node == dst_node {
            return Err(ConnectError::SelfConnection(src_node));
        }

        let source = self
            .nodes
            .get(&src_node)
            .ok_or(ConnectError::NodeNotFound(src_node))?;
        let target = self
            .nodes
            .get(&dst_node)
            .ok_or(ConnectError::NodeNotFound(dst_node))?;

        if source.row(src_row).is_none() {
            return Err(ConnectError::RowNotFound {
                node: src_node,
                row: src_row,
            });
        }
        if target.row(dst_row).is_none() {
            return Err(ConnectError::RowNotFound {
                node: dst_node,
                row: dst_row,
            });
        }

        if !source.kind.can_send() {
            return Err(ConnectError::CannotSend(src_node));
        }
        if !target.kind.can_receive() {
            return Err(ConnectError::CannotReceive(dst_node));
        }

        let to = Endpoint::new(dst_node, dst_row);
        if source.connections.iter().any(|c| c.matches(src_row, to)) {
            return Err(ConnectError::Duplicate);
        }

        if let Some(node) = self.nodes.get_mut(&src_node) {
            node.connections.push(Connection::new(src_row, to));
        }
        tracing::debug!(
            from = %src_node, from_row = %src_row,
            to = %dst_node, to_row = %dst_row,
            "connected rows"
        );
        Ok(())
    }

    /// Remove the first edge matching the given endpoints. Returns whether
    /// an edge was removed; a missing edge is not an error.
    pub fn disconnect(
        &mut self,
        src_node: NodeId,
        src_row: RowId,
        dst_node: NodeId,
        dst_row: RowId,
    ) -> bool {
        let Some(node) = self.nodes.get_mut(&src_node) else {
            return false;
        };

        let to = Endpoint::new(dst_node, dst_row);
        let Some(index) = node.connections.iter().position(|c| c.matches(src_row, to)) else {
            return false;
        };

        node.connections.remove(index);
        tracing::debug!(
            from = %src_node, from_row = %src_row,
            to = %dst_node, to_row = %dst_row,
            "disconnected rows"
        );
        true
    }

    /// Total number of edges across all nodes
    pub fn connection_count(&self) -> usize {
        self.nodes.values().map(|n| n.connections.len()).sum()
    }

    /// Whether any edge feeds the given sink row
    pub fn has_inbound(&self, node: NodeId, row: RowId) -> bool {
        self.nodes
            .values()
            .any(|n| n.connections.iter().any(|c| c.targets(node, row)))
    }

    // --- targeted node updates ---

    /// Move a node to a new canvas-local position
    pub fn set_position(&mut self, id: NodeId, position: Position) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.position = position;
        }
    }

    /// Rename a node
    pub fn set_title(&mut self, id: NodeId, title: impl Into<String>) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.title = title.into();
        }
    }

    /// Edit a row's stored value. The value's variant must match the
    /// variant chosen at row creation.
    pub fn set_row_value(
        &mut self,
        id: NodeId,
        row_id: RowId,
        value: RowValue,
    ) -> Result<(), RowEditError> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(RowEditError::NodeNotFound(id))?;
        let row = node.row_mut(row_id).ok_or(RowEditError::RowNotFound {
            node: id,
            row: row_id,
        })?;

        if !row.value.same_kind(&value) {
            return Err(RowEditError::TypeMismatch);
        }
        row.value = value;
        Ok(())
    }

    /// Rename a row
    pub fn set_row_title(
        &mut self,
        id: NodeId,
        row_id: RowId,
        title: impl Into<String>,
    ) -> Result<(), RowEditError> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(RowEditError::NodeNotFound(id))?;
        let row = node.row_mut(row_id).ok_or(RowEditError::RowNotFound {
            node: id,
            row: row_id,
        })?;
        row.title = title.into();
        Ok(())
    }

    /// Append a fresh default row to a node
    pub fn add_row(&mut self, id: NodeId) -> Option<RowId> {
        self.nodes.get_mut(&id).map(Node::add_row)
    }

    /// Assign or clear a node's group. Assignment to an unknown group is
    /// ignored.
    pub fn set_group(&mut self, id: NodeId, group: Option<GroupId>) {
        if let Some(g) = group {
            if !self.groups.contains_key(&g) {
                return;
            }
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.group = group;
        }
    }

    /// Toggle a node's collapsed state
    pub fn toggle_collapsed(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.collapsed = !node.collapsed;
        }
    }

    // --- groups ---

    /// Create a new group with a generated title and the default color
    pub fn add_group(&mut self) -> GroupId {
        let id = GroupId(self.next_group);
        self.next_group += 1;

        let title = format!("Group {:02}", id.0);
        self.groups.insert(id, NodeGroup::new(id, title));
        id
    }

    /// Get a group by id
    pub fn group(&self, id: GroupId) -> Option<&NodeGroup> {
        self.groups.get(&id)
    }

    /// Get a mutable group by id
    pub fn group_mut(&mut self, id: GroupId) -> Option<&mut NodeGroup> {
        self.groups.get_mut(&id)
    }

    /// All groups in creation order
    pub fn groups(&self) -> impl Iterator<Item = &NodeGroup> {
        self.groups.values()
    }

    /// Nodes belonging to a group
    pub fn nodes_in_group(&self, group: GroupId) -> impl Iterator<Item = &Node> {
        self.nodes
            .values()
            .filter(move |n| n.group == Some(group))
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

/// Error when creating a connection. The graph is never mutated when one
/// of these is returned.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConnectError {
    /// Node not found
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// Row not found on the named node
    #[error("Row {row} not found on node {node}")]
    RowNotFound {
        /// Node that was searched
        node: NodeId,
        /// Missing row id
        row: RowId,
    },

    /// Source and target are the same node
    #[error("Self-connection not allowed on node {0}")]
    SelfConnection(NodeId),

    /// An identical edge already exists
    #[error("Edge already exists")]
    Duplicate,

    /// Source node kind cannot send
    #[error("Node {0} cannot send")]
    CannotSend(NodeId),

    /// Target node kind cannot receive
    #[error("Node {0} cannot receive")]
    CannotReceive(NodeId),
}

/// Error when editing a row
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum RowEditError {
    /// Node not found
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// Row not found on the named node
    #[error("Row {row} not found on node {node}")]
    RowNotFound {
        /// Node that was searched
        node: NodeId,
        /// Missing row id
        row: RowId,
    },

    /// New value's variant differs from the row's variant
    #[error("Row value type mismatch")]
    TypeMismatch,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sender_with_row(graph: &mut Graph, value: f64) -> (NodeId, RowId) {
        let id = graph.add_node(NodeKind::Sender, Position::ZERO);
        let row = graph.add_row(id).unwrap();
        graph
            .set_row_value(id, row, RowValue::Number(value))
            .unwrap();
        (id, row)
    }

    fn receiver_with_row(graph: &mut Graph) -> (NodeId, RowId) {
        let id = graph.add_node(NodeKind::Receiver, Position::ZERO);
        let row = graph.add_row(id).unwrap();
        (id, row)
    }

    #[test]
    fn test_duplicate_connect_is_idempotent() {
        let mut graph = Graph::new();
        let (a, d0) = sender_with_row(&mut graph, 1.0);
        let (b, d1) = receiver_with_row(&mut graph);

        assert!(graph.connect(a, d0, b, d1).is_ok());
        assert_eq!(graph.connect(a, d0, b, d1), Err(ConnectError::Duplicate));
        assert_eq!(graph.node(a).unwrap().connections.len(), 1);
    }

    #[test]
    fn test_self_connection_rejected() {
        let mut graph = Graph::new();
        let id = graph.add_node(NodeKind::Channel, Position::ZERO);
        let row = graph.add_row(id).unwrap();

        assert_eq!(
            graph.connect(id, row, id, row),
            Err(ConnectError::SelfConnection(id))
        );
        assert_eq!(graph.connection_count(), 0);
    }

    #[test]
    fn test_capability_checks() {
        let mut graph = Graph::new();
        let (sender, s0) = sender_with_row(&mut graph, 1.0);
        let (receiver, r0) = receiver_with_row(&mut graph);

        // Receivers cannot act as sources, senders cannot act as sinks.
        assert_eq!(
            graph.connect(receiver, r0, sender, s0),
            Err(ConnectError::CannotSend(receiver))
        );
        assert_eq!(graph.connection_count(), 0);
    }

    #[test]
    fn test_remove_node_prunes_dangling_edges() {
        let mut graph = Graph::new();
        let (a, d0) = sender_with_row(&mut graph, 1.0);
        let (b, d1) = receiver_with_row(&mut graph);

        graph.connect(a, d0, b, d1).unwrap();
        graph.remove_node(b);

        assert!(graph.node(a).unwrap().connections.is_empty());
    }

    #[test]
    fn test_node_ids_are_monotonic_and_not_reused() {
        let mut graph = Graph::new();
        let a = graph.add_node(NodeKind::Sender, Position::ZERO);
        let b = graph.add_node(NodeKind::Sender, Position::ZERO);
        graph.remove_node(b);
        let c = graph.add_node(NodeKind::Sender, Position::ZERO);

        assert!(c.0 > b.0);
        assert!(b.0 > a.0);
    }

    #[test]
    fn test_clone_resets_connections_and_reassigns_id() {
        let mut graph = Graph::new();
        let (a, d0) = sender_with_row(&mut graph, 5.0);
        let (b, d1) = receiver_with_row(&mut graph);
        graph.connect(a, d0, b, d1).unwrap();

        let copy = graph.clone_node(a).unwrap();
        let cloned = graph.node(copy).unwrap();

        assert_ne!(copy, a);
        assert_ne!(copy, b);
        assert!(cloned.connections.is_empty());
        assert_eq!(cloned.rows, graph.node(a).unwrap().rows);
        assert_eq!(
            cloned.position,
            graph.node(a).unwrap().position + CLONE_OFFSET
        );
    }

    #[test]
    fn test_select_raises_z_order() {
        let mut graph = Graph::new();
        let a = graph.add_node(NodeKind::Sender, Position::ZERO);
        let b = graph.add_node(NodeKind::Sender, Position::ZERO);
        let c = graph.add_node(NodeKind::Sender, Position::ZERO);

        graph.select(a);
        let order: Vec<_> = graph.node_ids().collect();
        assert_eq!(order, vec![b, c, a]);
        assert_eq!(graph.active(), Some(a));

        graph.deselect();
        assert_eq!(graph.active(), None);
    }

    #[test]
    fn test_disconnect_missing_edge_is_noop() {
        let mut graph = Graph::new();
        let (a, d0) = sender_with_row(&mut graph, 1.0);
        let (b, d1) = receiver_with_row(&mut graph);

        assert!(!graph.disconnect(a, d0, b, d1));

        graph.connect(a, d0, b, d1).unwrap();
        assert!(graph.disconnect(a, d0, b, d1));
        assert!(!graph.disconnect(a, d0, b, d1));
        assert_eq!(graph.connection_count(), 0);
    }

    #[test]
    fn test_row_value_edit_is_type_checked() {
        let mut graph = Graph::new();
        let (a, d0) = sender_with_row(&mut graph, 1.0);

        assert_eq!(
            graph.set_row_value(a, d0, RowValue::Text("nope".into())),
            Err(RowEditError::TypeMismatch)
        );
        assert!(graph.set_row_value(a, d0, RowValue::Number(2.0)).is_ok());
        assert_eq!(
            graph.node(a).unwrap().row(d0).unwrap().value,
            RowValue::Number(2.0)
        );
    }

    #[test]
    fn test_group_assignment_requires_existing_group() {
        let mut graph = Graph::new();
        let a = graph.add_node(NodeKind::Sender, Position::ZERO);

        graph.set_group(a, Some(GroupId(7)));
        assert_eq!(graph.node(a).unwrap().group, None);

        let g = graph.add_group();
        graph.set_group(a, Some(g));
        assert_eq!(graph.node(a).unwrap().group, Some(g));
        assert_eq!(graph.nodes_in_group(g).count(), 1);
    }

    #[test]
    fn test_remove_active_node_clears_selection() {
        let mut graph = Graph::new();
        let a = graph.add_node(NodeKind::Sender, Position::ZERO);
        graph.select(a);
        graph.remove_node(a);
        assert_eq!(graph.active(), None);
    }
}
