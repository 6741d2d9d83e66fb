// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node layout measurement and connector anchor placement.

use crate::connector::ConnectorDirection;
use wireflow_graph::{Node, NodeId, Position, Size};

/// Height of the node title header, in canvas units
pub const NODE_HEADER_HEIGHT: f32 = 22.0;
/// Vertical pitch of one data row
pub const ROW_HEIGHT: f32 = 24.0;
/// Radius of the connector handle
pub const CONNECTOR_RADIUS: f32 = 4.0;
/// Fallback node size when no measurement is available
pub const DEFAULT_NODE_SIZE: Size = Size {
    width: 180.0,
    height: 96.0,
};

/// Measurement capability implemented by the presentation layer.
///
/// Node dimensions are only known after the renderer has laid the node
/// out; the core never assumes a specific retained layout tree and asks
/// through this interface instead.
pub trait Measurable {
    /// Measured size of the rendered node
    fn measure(&self, node: NodeId) -> Size;
}

/// Uniform measurement for headless use and tests
#[derive(Debug, Clone, Copy)]
pub struct FixedMeasure(pub Size);

impl Default for FixedMeasure {
    fn default() -> Self {
        Self(DEFAULT_NODE_SIZE)
    }
}

impl Measurable for FixedMeasure {
    fn measure(&self, _node: NodeId) -> Size {
        self.0
    }
}

/// Canvas-local anchor position of a connector.
///
/// `In` connectors sit on the node's left edge, `Out` connectors on the
/// right; rows stack under the header in insertion order.
pub fn connector_anchor(
    node: &Node,
    row_index: usize,
    direction: ConnectorDirection,
    size: Size,
) -> Position {
    let x = match direction {
        ConnectorDirection::In => node.position.x,
        ConnectorDirection::Out => node.position.x + size.width,
    };
    let y = node.position.y
        + NODE_HEADER_HEIGHT
        + row_index as f32 * ROW_HEIGHT
        + ROW_HEIGHT * 0.5;
    Position::new(x, y)
}
