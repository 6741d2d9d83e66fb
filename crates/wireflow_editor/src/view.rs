// SPDX-License-Identifier: MIT OR Apache-2.0
//! Render-model construction.
//!
//! [`GraphEditor::view`] flattens the current session into plain data the
//! presentation layer can draw without touching the graph: nodes in
//! z-order with resolved row values, connection paths in canvas units,
//! and the live rubber-band line while a connection drag is in flight.
//! The renderer applies the camera transform itself, so every coordinate
//! here is canvas-local.

use crate::connector::{ConnectorDirection, ConnectorId, ConnectorRef};
use crate::layout::{connector_anchor, Measurable};
use crate::path::{bezier_path, stepped_path, PathCommand};
use crate::session::{GraphEditor, Interaction};
use wireflow_graph::{effective_value, Camera, NodeId, NodeKind, Position, RowId, RowValue, Size};

/// How a committed connection relates to the active node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionHighlight {
    /// Neither endpoint is on the active node
    Normal,
    /// Starts at the active node
    Outgoing,
    /// Ends at the active node
    Incoming,
}

/// One data row, ready to draw
#[derive(Debug, Clone)]
pub struct RowView {
    /// Row id within its node
    pub id: RowId,
    /// Row title
    pub title: String,
    /// Value to display, with upstream contributions applied
    pub value: RowValue,
    /// Whether the row accepts direct edits
    pub editable: bool,
    /// Inbound connector handle
    pub in_connector: ConnectorId,
    /// Outbound connector handle
    pub out_connector: ConnectorId,
    /// Whether any edge feeds this row
    pub in_connected: bool,
    /// Whether any edge starts at this row
    pub out_connected: bool,
}

/// One node, ready to draw
#[derive(Debug, Clone)]
pub struct NodeView {
    /// Node id
    pub id: NodeId,
    /// Display title
    pub title: String,
    /// Capability kind
    pub kind: NodeKind,
    /// Canvas-local position
    pub position: Position,
    /// Measured size
    pub size: Size,
    /// Whether this is the active node
    pub selected: bool,
    /// Whether the node body is collapsed
    pub collapsed: bool,
    /// Group accent color, if the node belongs to a group
    pub group_color: Option<String>,
    /// Rows in display order
    pub rows: Vec<RowView>,
}

/// One committed connection, ready to draw
#[derive(Debug, Clone)]
pub struct ConnectionView {
    /// Source connector
    pub from: ConnectorRef,
    /// Sink connector
    pub to: ConnectorRef,
    /// Stepped path in canvas units
    pub path: Vec<PathCommand>,
    /// Relation to the active node
    pub highlight: ConnectionHighlight,
}

/// The rubber-band line of an in-flight connection drag
#[derive(Debug, Clone)]
pub struct PendingConnection {
    /// Source connector
    pub from: ConnectorRef,
    /// Smooth path from the source anchor to the cursor, in canvas units
    pub path: Vec<PathCommand>,
}

/// Complete render model for one frame
#[derive(Debug, Clone)]
pub struct GraphView {
    /// Camera to apply as the canvas transform
    pub camera: Camera,
    /// Whether panning is locked
    pub locked: bool,
    /// Nodes back to front
    pub nodes: Vec<NodeView>,
    /// Committed connections
    pub connections: Vec<ConnectionView>,
    /// Rubber-band line, present only while a connection drag has moved
    pub pending: Option<PendingConnection>,
}

impl GraphEditor {
    /// Build the render model for the current state.
    ///
    /// Registers connector ids for every visible row as a side effect, so
    /// the presentation layer can hand them back in pointer events.
    pub fn view(&mut self, measure: &dyn Measurable) -> GraphView {
        let active = self.graph.active();

        let mut nodes = Vec::with_capacity(self.graph.node_count());
        for id in self.graph.node_ids().collect::<Vec<_>>() {
            if let Some(node_view) = self.node_view(id, active, measure) {
                nodes.push(node_view);
            }
        }

        let connections = self.connection_views(active, measure);
        let pending = self.pending_connection();

        GraphView {
            camera: self.camera,
            locked: self.locked,
            nodes,
            connections,
            pending,
        }
    }

    fn node_view(
        &mut self,
        id: NodeId,
        active: Option<NodeId>,
        measure: &dyn Measurable,
    ) -> Option<NodeView> {
        let node = self.graph.node(id)?;
        let size = measure.measure(id);
        let editable = node.kind == NodeKind::Sender;
        let group_color = node
            .group
            .and_then(|g| self.graph.group(g))
            .map(|g| g.color.clone());

        let row_ids: Vec<RowId> = node.rows.iter().map(|r| r.id).collect();
        let mut rows = Vec::with_capacity(row_ids.len());
        for row_id in row_ids {
            let in_connector = self
                .connectors
                .register(ConnectorRef::new(ConnectorDirection::In, id, row_id));
            let out_connector = self
                .connectors
                .register(ConnectorRef::new(ConnectorDirection::Out, id, row_id));

            let node = self.graph.node(id)?;
            let row = node.row(row_id)?;
            let value = effective_value(&self.graph, id, row_id)?;

            rows.push(RowView {
                id: row_id,
                title: row.title.clone(),
                value,
                editable,
                in_connector,
                out_connector,
                in_connected: self.graph.has_inbound(id, row_id),
                out_connected: node.sends_from(row_id),
            });
        }

        let node = self.graph.node(id)?;
        Some(NodeView {
            id,
            title: node.title.clone(),
            kind: node.kind,
            position: node.position,
            size,
            selected: active == Some(id),
            collapsed: node.collapsed,
            group_color,
            rows,
        })
    }

    fn connection_views(
        &self,
        active: Option<NodeId>,
        measure: &dyn Measurable,
    ) -> Vec<ConnectionView> {
        let mut views = Vec::new();

        for node in self.graph.nodes() {
            for connection in &node.connections {
                let Some(target) = self.graph.node(connection.to.node) else {
                    continue;
                };
                let Some(src_index) = node.row_index(connection.row) else {
                    continue;
                };
                let Some(dst_index) = target.row_index(connection.to.row) else {
                    continue;
                };

                let from = ConnectorRef::new(ConnectorDirection::Out, node.id, connection.row);
                let to =
                    ConnectorRef::new(ConnectorDirection::In, connection.to.node, connection.to.row);

                let p0 = connector_anchor(
                    node,
                    src_index,
                    ConnectorDirection::Out,
                    measure.measure(node.id),
                );
                let p1 = connector_anchor(
                    target,
                    dst_index,
                    ConnectorDirection::In,
                    measure.measure(target.id),
                );

                let highlight = if active == Some(node.id) {
                    ConnectionHighlight::Outgoing
                } else if active == Some(connection.to.node) {
                    ConnectionHighlight::Incoming
                } else {
                    ConnectionHighlight::Normal
                };

                views.push(ConnectionView {
                    from,
                    to,
                    path: stepped_path(p0, p1),
                    highlight,
                });
            }
        }

        views
    }

    fn pending_connection(&self) -> Option<PendingConnection> {
        let Interaction::Connecting {
            from,
            anchor,
            cursor,
            drag,
        } = &self.interaction
        else {
            return None;
        };
        if drag.state() != crate::drag::DragState::Move {
            return None;
        }

        let cursor_canvas = self.camera.screen_to_canvas(*cursor);
        Some(PendingConnection {
            from: *from,
            path: bezier_path(*anchor, cursor_canvas),
        })
    }
}
