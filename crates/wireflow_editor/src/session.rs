// SPDX-License-Identifier: MIT OR Apache-2.0
//! The editor session: pointer gestures, camera control, and the bridge
//! from interaction events to graph mutations.
//!
//! All operations are synchronous and run to completion within one event
//! callback; gestures cannot interleave because a new press is ignored
//! while another gesture is in flight.

use crate::connector::{ConnectorDirection, ConnectorId, ConnectorRef, ConnectorRegistry};
use crate::drag::{DragController, DragState, PointerButton};
use crate::layout::{connector_anchor, Measurable};
use wireflow_graph::{Camera, Graph, GroupId, Node, NodeId, NodeKind, Position, RowId};

/// What the pointer went down on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressTarget {
    /// The canvas background
    Background,
    /// A node body
    Node(NodeId),
    /// A connector handle
    Connector(ConnectorId),
}

/// Current gesture mode
#[derive(Debug, Clone)]
pub enum Interaction {
    /// No gesture in flight
    Idle,
    /// Panning the camera from a background drag
    Panning {
        /// Background drag session
        drag: DragController<ConnectorId>,
    },
    /// Dragging a node across the canvas
    DraggingNode {
        /// Node being moved
        node: NodeId,
        /// Node drag session (zoom-compensated)
        drag: DragController<ConnectorId>,
    },
    /// Dragging a rubber-band connection out of a connector
    Connecting {
        /// Source connector
        from: ConnectorRef,
        /// Canvas-local anchor of the source connector
        anchor: Position,
        /// Live screen-space cursor position
        cursor: Position,
        /// Connector drag session, used to tell a click from a drag
        drag: DragController<ConnectorId>,
    },
}

/// The interactive graph editor: owns the graph, camera, connector
/// registry and interaction state, and translates pointer gestures into
/// model updates.
#[derive(Debug)]
pub struct GraphEditor {
    pub(crate) graph: Graph,
    pub(crate) camera: Camera,
    pub(crate) connectors: ConnectorRegistry,
    pub(crate) interaction: Interaction,
    pub(crate) locked: bool,
    canvas_origin: Position,
}

impl GraphEditor {
    /// Create an empty editor session
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
            camera: Camera::new(),
            connectors: ConnectorRegistry::new(),
            interaction: Interaction::Idle,
            locked: false,
            canvas_origin: Position::ZERO,
        }
    }

    /// Screen origin of the canvas element, subtracted from incoming
    /// screen coordinates
    pub fn set_canvas_origin(&mut self, origin: Position) {
        self.canvas_origin = origin;
    }

    /// The underlying graph
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Mutable access to the underlying graph
    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    /// Current camera
    pub fn camera(&self) -> Camera {
        self.camera
    }

    /// Current interaction mode
    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    /// Whether camera panning is locked
    pub fn locked(&self) -> bool {
        self.locked
    }

    /// Lock or unlock camera panning
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// Flip the pan lock
    pub fn toggle_locked(&mut self) {
        self.locked = !self.locked;
    }

    // --- camera controls ---

    /// Step zoom in (control button); suppressed while locked
    pub fn zoom_in(&mut self) {
        if !self.locked {
            self.camera.zoom_in();
        }
    }

    /// Step zoom out (control button); suppressed while locked
    pub fn zoom_out(&mut self) {
        if !self.locked {
            self.camera.zoom_out();
        }
    }

    /// Wheel event at a screen-space cursor. Zoom recentres on the
    /// cursor and stays live even while the pan lock is on.
    pub fn wheel(&mut self, cursor: Position, scroll_delta: f32) {
        self.camera.wheel_zoom(cursor, scroll_delta);
    }

    /// Reset the view onto a node
    pub fn focus_node(&mut self, node: NodeId) {
        if let Some(n) = self.graph.node(node) {
            self.camera.focus_on(n.position);
        }
    }

    // --- node lifecycle ---

    /// Node-bank drop: decode the integer payload into a kind and create
    /// the node at the canvas-local point under the cursor (screen point
    /// minus canvas origin minus camera offset). Malformed payloads are
    /// not a drop.
    pub fn drop_payload(&mut self, raw: u8, screen: Position) -> Option<NodeId> {
        let Some(kind) = NodeKind::from_raw(raw) else {
            tracing::debug!(raw, "ignoring malformed node-bank payload");
            return None;
        };

        let position = screen - self.canvas_origin - self.camera.offset;
        Some(self.graph.add_node(kind, position))
    }

    /// Remove a node and forget its connectors
    pub fn remove_node(&mut self, node: NodeId) -> Option<Node> {
        let removed = self.graph.remove_node(node);
        if removed.is_some() {
            self.connectors.prune_node(node);
        }
        removed
    }

    /// Clone a node (context-menu action)
    pub fn clone_node(&mut self, node: NodeId) -> Option<NodeId> {
        self.graph.clone_node(node)
    }

    /// Assign a node to a group (context-menu action)
    pub fn assign_group(&mut self, node: NodeId, group: Option<GroupId>) {
        self.graph.set_group(node, group);
    }

    // --- pointer gestures ---

    /// Pointer press over a target. Starts at most one gesture; presses
    /// during an in-flight gesture are ignored.
    pub fn pointer_pressed(
        &mut self,
        target: PressTarget,
        button: PointerButton,
        pointer: Position,
        measure: &dyn Measurable,
    ) {
        if !matches!(self.interaction, Interaction::Idle) {
            return;
        }

        match target {
            PressTarget::Background => {
                self.graph.deselect();

                let mut drag = DragController::new(self.camera.offset.x, self.camera.offset.y)
                    .with_external_offset(self.camera.offset);
                drag.press(button, pointer, Position::ZERO);
                if drag.state() == DragState::Active {
                    self.interaction = Interaction::Panning { drag };
                }
            }
            PressTarget::Node(id) => {
                let Some(node) = self.graph.node(id) else {
                    return;
                };

                let origin = self.camera.canvas_to_screen(node.position);
                let mut drag = DragController::new(node.position.x, node.position.y)
                    .with_external_offset(Position::ZERO - self.camera.offset)
                    .with_zoom(self.camera.zoom);
                drag.press(button, pointer, origin);
                if drag.state() == DragState::Active {
                    self.graph.select(id);
                    self.interaction = Interaction::DraggingNode { node: id, drag };
                }
            }
            PressTarget::Connector(id) => {
                let Some(from) = self.connectors.resolve(id) else {
                    return;
                };
                let Some(node) = self.graph.node(from.node) else {
                    return;
                };
                let Some(row_index) = node.row_index(from.row) else {
                    return;
                };

                let size = measure.measure(from.node);
                let anchor = connector_anchor(node, row_index, from.direction, size);

                let mut drag = DragController::new(pointer.x, pointer.y);
                drag.press(button, pointer, pointer);
                if drag.state() == DragState::Active {
                    self.interaction = Interaction::Connecting {
                        from,
                        anchor,
                        cursor: pointer,
                        drag,
                    };
                }
            }
        }
    }

    /// Pointer movement while a gesture may be in flight
    pub fn pointer_moved(&mut self, pointer: Position) {
        match &mut self.interaction {
            Interaction::Idle => {}
            Interaction::Panning { drag } => {
                drag.motion(pointer);
                if !self.locked {
                    self.camera.offset = drag.position();
                }
            }
            Interaction::DraggingNode { node, drag } => {
                drag.motion(pointer);
                let position = drag.position();
                self.graph.set_position(*node, position);
            }
            Interaction::Connecting { cursor, drag, .. } => {
                drag.motion(pointer);
                *cursor = pointer;
            }
        }
    }

    /// Pointer release. `below` identifies the connector currently under
    /// the pointer, if any; a release over a valid opposite-direction
    /// connector commits the pending connection, anything else discards
    /// it silently.
    pub fn pointer_released(&mut self, below: Option<ConnectorId>) {
        let interaction = std::mem::replace(&mut self.interaction, Interaction::Idle);

        match interaction {
            Interaction::Idle => {}
            Interaction::Panning { mut drag } | Interaction::DraggingNode { mut drag, .. } => {
                drag.release(below);
            }
            Interaction::Connecting { from, mut drag, .. } => {
                let Some(target_id) = drag.release(below) else {
                    return;
                };
                let Some(target) = self.connectors.resolve(target_id) else {
                    return;
                };
                self.commit_connection(from, target);
            }
        }
    }

    /// Commit a drag-created connection, normalizing so the `Out` side is
    /// the source. Rejected connections (same direction, self-connection,
    /// duplicates, capability mismatches) are discarded.
    fn commit_connection(&mut self, from: ConnectorRef, to: ConnectorRef) {
        let (source, sink) = match (from.direction, to.direction) {
            (ConnectorDirection::Out, ConnectorDirection::In) => (from, to),
            (ConnectorDirection::In, ConnectorDirection::Out) => (to, from),
            _ => return,
        };

        if let Err(e) = self
            .graph
            .connect(source.node, source.row, sink.node, sink.row)
        {
            tracing::debug!(error = %e, "discarding pending connection");
        }
    }

    // --- convenience for building rows/connectors ---

    /// Register (or look up) the connector id for a row endpoint
    pub fn connector_id(
        &mut self,
        direction: ConnectorDirection,
        node: NodeId,
        row: RowId,
    ) -> ConnectorId {
        self.connectors
            .register(ConnectorRef::new(direction, node, row))
    }
}

impl Default for GraphEditor {
    fn default() -> Self {
        Self::new()
    }
}
