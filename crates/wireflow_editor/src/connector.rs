// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connector identity: the handshake between drag-release and the
//! graph's connect operation.
//!
//! Each connector is a structured `(direction, node, row)` triple exposed
//! to the presentation layer through an opaque generated id. Resolving an
//! unknown id yields `None` ("no drop target"), never a parse error.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wireflow_graph::{NodeId, RowId};

/// Which side of a connection a connector represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectorDirection {
    /// Receives values (left edge of a node)
    In,
    /// Sends values (right edge of a node)
    Out,
}

/// Structured identity of one connector endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectorRef {
    /// Connector side
    pub direction: ConnectorDirection,
    /// Owning node
    pub node: NodeId,
    /// Bound data row
    pub row: RowId,
}

impl ConnectorRef {
    /// Create a connector reference
    pub fn new(direction: ConnectorDirection, node: NodeId, row: RowId) -> Self {
        Self {
            direction,
            node,
            row,
        }
    }
}

/// Opaque element identifier handed to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectorId(Uuid);

impl ConnectorId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Typed side-channel mapping generated element ids back to structured
/// connector references, replacing string-encoded composite identifiers.
///
/// Both directions are keyed maps: registration happens for every row on
/// every view rebuild and must not scan the registry.
#[derive(Debug, Clone, Default)]
pub struct ConnectorRegistry {
    entries: IndexMap<ConnectorId, ConnectorRef>,
    ids: IndexMap<ConnectorRef, ConnectorId>,
}

impl ConnectorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connector, returning its stable id. Registering the
    /// same reference again returns the existing id.
    pub fn register(&mut self, connector: ConnectorRef) -> ConnectorId {
        if let Some(id) = self.ids.get(&connector) {
            return *id;
        }
        let id = ConnectorId::generate();
        self.entries.insert(id, connector);
        self.ids.insert(connector, id);
        id
    }

    /// Decode an element id back into its connector reference. Unknown
    /// ids are simply not a drop target.
    pub fn resolve(&self, id: ConnectorId) -> Option<ConnectorRef> {
        self.entries.get(&id).copied()
    }

    /// Look up the id previously generated for a reference
    pub fn id_of(&self, connector: &ConnectorRef) -> Option<ConnectorId> {
        self.ids.get(connector).copied()
    }

    /// Drop all connectors belonging to a removed node
    pub fn prune_node(&mut self, node: NodeId) {
        self.entries.retain(|_, c| c.node != node);
        self.ids.retain(|c, _| c.node != node);
    }

    /// Number of registered connectors
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = ConnectorRegistry::new();
        let c = ConnectorRef::new(ConnectorDirection::Out, NodeId(1), RowId(0));

        let a = registry.register(c);
        let b = registry.register(c);
        assert_eq!(a, b);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_resolve_round_trip() {
        let mut registry = ConnectorRegistry::new();
        let c = ConnectorRef::new(ConnectorDirection::In, NodeId(2), RowId(3));

        let id = registry.register(c);
        assert_eq!(registry.resolve(id), Some(c));
    }

    #[test]
    fn test_unknown_id_is_no_drop_target() {
        let registry = ConnectorRegistry::new();
        assert_eq!(registry.resolve(ConnectorId::generate()), None);
    }

    #[test]
    fn test_connector_ref_usable_as_map_key() {
        let mut seen = std::collections::HashSet::new();
        seen.insert(ConnectorRef::new(ConnectorDirection::Out, NodeId(1), RowId(0)));
        seen.insert(ConnectorRef::new(ConnectorDirection::In, NodeId(1), RowId(0)));
        seen.insert(ConnectorRef::new(ConnectorDirection::Out, NodeId(1), RowId(0)));
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_id_of_tracks_registrations() {
        let mut registry = ConnectorRegistry::new();
        let a = ConnectorRef::new(ConnectorDirection::Out, NodeId(1), RowId(0));
        let b = ConnectorRef::new(ConnectorDirection::In, NodeId(2), RowId(1));

        assert_eq!(registry.id_of(&a), None);
        let id_a = registry.register(a);
        let id_b = registry.register(b);
        assert_eq!(registry.id_of(&a), Some(id_a));
        assert_eq!(registry.id_of(&b), Some(id_b));
        assert_ne!(id_a, id_b);
    }

    #[test]
    fn test_pruned_ref_registers_fresh() {
        let mut registry = ConnectorRegistry::new();
        let c = ConnectorRef::new(ConnectorDirection::Out, NodeId(1), RowId(0));

        let old = registry.register(c);
        registry.prune_node(NodeId(1));
        assert_eq!(registry.id_of(&c), None);

        // Re-registering after a prune must not resurrect the stale id.
        let fresh = registry.register(c);
        assert_ne!(fresh, old);
        assert_eq!(registry.resolve(old), None);
        assert_eq!(registry.resolve(fresh), Some(c));
    }

    #[test]
    fn test_prune_node_removes_its_connectors() {
        let mut registry = ConnectorRegistry::new();
        let kept = registry.register(ConnectorRef::new(
            ConnectorDirection::Out,
            NodeId(1),
            RowId(0),
        ));
        let dropped = registry.register(ConnectorRef::new(
            ConnectorDirection::In,
            NodeId(2),
            RowId(0),
        ));

        registry.prune_node(NodeId(2));
        assert!(registry.resolve(kept).is_some());
        assert!(registry.resolve(dropped).is_none());
    }
}
