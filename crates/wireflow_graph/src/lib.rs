// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node graph model for wireflow.
//!
//! This crate owns the authoritative graph state for a visual node-graph
//! editor: nodes with ordered data rows, directed row-to-row connections,
//! node groups, selection, the camera (pan + zoom), and the recursive
//! value-resolution engine that computes a row's effective displayed
//! value from its upstream connections.
//!
//! ## Architecture
//!
//! All state is plain data with named mutation operations on [`Graph`];
//! invalid operations leave the graph untouched. Resolution is a pure
//! function of current graph state, recomputed on read. The interactive
//! layer (pointer gestures, connectors, view snapshots) lives in the
//! `wireflow_editor` crate.

pub mod camera;
pub mod connection;
pub mod geometry;
pub mod graph;
pub mod group;
pub mod node;
pub mod resolve;
pub mod row;

pub use camera::Camera;
pub use connection::{Connection, Endpoint};
pub use geometry::{Position, Size};
pub use graph::{ConnectError, Graph, RowEditError};
pub use group::{GroupId, NodeGroup};
pub use node::{Node, NodeId, NodeKind};
pub use resolve::{effective_value, resolve};
pub use row::{DataRow, RowId, RowValue};
