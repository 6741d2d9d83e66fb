// SPDX-License-Identifier: MIT OR Apache-2.0
//! Interactive editing layer for wireflow graphs.
//!
//! Sits between a presentation layer (which owns real pointer events and
//! rendering) and the `wireflow_graph` model. The presentation layer
//! feeds pointer presses, motion, releases, wheel events and drag-drop
//! payloads into a [`GraphEditor`]; the editor runs the gesture state
//! machines, mutates the graph, and hands back a [`GraphView`] render
//! model each frame.
//!
//! Nothing here draws. Paths are command lists ([`PathCommand`]), node
//! sizes come from the renderer through the [`Measurable`] trait, and
//! connector hit targets are opaque [`ConnectorId`]s the renderer
//! attaches to its own elements.

pub mod connector;
pub mod drag;
pub mod layout;
pub mod path;
pub mod session;
pub mod view;

pub use connector::{ConnectorDirection, ConnectorId, ConnectorRef, ConnectorRegistry};
pub use drag::{DragController, DragState, PointerButton};
pub use layout::{connector_anchor, FixedMeasure, Measurable};
pub use path::{bezier_path, flatten, stepped_path, PathCommand};
pub use session::{GraphEditor, Interaction, PressTarget};
pub use view::{
    ConnectionHighlight, ConnectionView, GraphView, NodeView, PendingConnection, RowView,
};
