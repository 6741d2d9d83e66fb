// SPDX-License-Identifier: MIT OR Apache-2.0
//! Effective-value resolution over the connection graph.
//!
//! Connections model unidirectional data flow (sender -> receiver), and
//! channels both receive and re-send, so a sink row's displayed value is
//! the live aggregate of everything feeding it rather than its stored
//! literal. Resolution is recomputed on every read; nothing is cached.

use crate::graph::Graph;
use crate::node::NodeId;
use crate::row::{RowId, RowValue};
use std::collections::HashSet;

/// Resolve the upstream aggregate flowing into `(node, row)`.
///
/// Walks the connection graph backward from the sink, recursing through
/// each contributor so values flow transitively across channels. Returns
/// `None` ("no override") when nothing feeds the row, including for stale
/// node ids. Revisited `(node, row)` pairs contribute nothing, which
/// bounds recursion on cyclic graphs.
pub fn resolve(graph: &Graph, node: NodeId, row: RowId) -> Option<RowValue> {
    let mut visited = HashSet::new();
    upstream(graph, node, row, &mut visited)
}

/// Resolve the effective displayed value for `(node, row)`: the stored
/// literal combined with the upstream aggregate (numeric sum onto numeric
/// rows, lone text pass-through onto text rows). `None` only when the
/// node or row does not exist.
pub fn effective_value(graph: &Graph, node: NodeId, row: RowId) -> Option<RowValue> {
    let stored = graph.node(node)?.row(row)?.value.clone();
    match resolve(graph, node, row) {
        Some(aggregate) => Some(stored.combine(&aggregate)),
        None => Some(stored),
    }
}

fn upstream(
    graph: &Graph,
    target_node: NodeId,
    target_row: RowId,
    visited: &mut HashSet<(NodeId, RowId)>,
) -> Option<RowValue> {
    if !visited.insert((target_node, target_row)) {
        return None;
    }

    let mut contributions = Vec::new();
    for source in graph.nodes() {
        for connection in source
            .connections
            .iter()
            .filter(|c| c.targets(target_node, target_row))
        {
            let Some(row) = source.row(connection.row) else {
                continue;
            };

            // A contributor's own effective value: its stored literal plus
            // whatever flows into it further upstream.
            let value = match upstream(graph, source.id, connection.row, visited) {
                Some(aggregate) => row.value.combine(&aggregate),
                None => row.value.clone(),
            };
            contributions.push(value);
        }
    }

    combine(contributions)
}

/// Aggregate simultaneous contributors: the first contributor seeds the
/// accumulator and numeric values are summed onto it. Text values are
/// ignored when mixed with numbers (numeric-only aggregation policy).
fn combine(mut values: Vec<RowValue>) -> Option<RowValue> {
    if values.is_empty() {
        return None;
    }
    if values.len() == 1 {
        return values.pop();
    }

    let mut sum = 0.0;
    let mut any_number = false;
    for value in &values {
        if let Some(n) = value.as_number() {
            sum += n;
            any_number = true;
        }
    }

    if any_number {
        Some(RowValue::Number(sum))
    } else {
        Some(values.swap_remove(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Position;
    use crate::node::NodeKind;

    fn node_with_row(graph: &mut Graph, kind: NodeKind, value: RowValue) -> (NodeId, RowId) {
        let id = graph.add_node(kind, Position::ZERO);
        let row = graph.add_row(id).unwrap();
        if let RowValue::Number(_) = value {
            graph.set_row_value(id, row, value).unwrap();
        } else {
            // Replace the default numeric row with a text one.
            let node = graph.node_mut(id).unwrap();
            node.row_mut(row).unwrap().value = value;
        }
        (id, row)
    }

    #[test]
    fn test_chain_propagates_through_channel() {
        let mut graph = Graph::new();
        let (s1, s1r) = node_with_row(&mut graph, NodeKind::Sender, RowValue::Number(5.0));
        let (c1, c1r) = node_with_row(&mut graph, NodeKind::Channel, RowValue::Number(0.0));
        let (r1, r1r) = node_with_row(&mut graph, NodeKind::Receiver, RowValue::Number(0.0));

        graph.connect(s1, s1r, c1, c1r).unwrap();
        graph.connect(c1, c1r, r1, r1r).unwrap();

        assert_eq!(
            effective_value(&graph, r1, r1r),
            Some(RowValue::Number(5.0))
        );
    }

    #[test]
    fn test_two_senders_sum() {
        let mut graph = Graph::new();
        let (s1, s1r) = node_with_row(&mut graph, NodeKind::Sender, RowValue::Number(5.0));
        let (s2, s2r) = node_with_row(&mut graph, NodeKind::Sender, RowValue::Number(8.0));
        let (r1, r1r) = node_with_row(&mut graph, NodeKind::Receiver, RowValue::Number(0.0));

        graph.connect(s1, s1r, r1, r1r).unwrap();
        graph.connect(s2, s2r, r1, r1r).unwrap();

        assert_eq!(
            effective_value(&graph, r1, r1r),
            Some(RowValue::Number(13.0))
        );
    }

    #[test]
    fn test_edit_propagates_without_connection_changes() {
        let mut graph = Graph::new();
        let (s1, s1r) = node_with_row(&mut graph, NodeKind::Sender, RowValue::Number(5.0));
        let (c1, c1r) = node_with_row(&mut graph, NodeKind::Channel, RowValue::Number(0.0));
        let (r1, r1r) = node_with_row(&mut graph, NodeKind::Receiver, RowValue::Number(0.0));

        graph.connect(s1, s1r, c1, c1r).unwrap();
        graph.connect(c1, c1r, r1, r1r).unwrap();
        assert_eq!(
            effective_value(&graph, r1, r1r),
            Some(RowValue::Number(5.0))
        );

        graph.set_row_value(s1, s1r, RowValue::Number(10.0)).unwrap();
        assert_eq!(
            effective_value(&graph, r1, r1r),
            Some(RowValue::Number(10.0))
        );
    }

    #[test]
    fn test_resolution_is_pure() {
        let mut graph = Graph::new();
        let (s1, s1r) = node_with_row(&mut graph, NodeKind::Sender, RowValue::Number(7.0));
        let (r1, r1r) = node_with_row(&mut graph, NodeKind::Receiver, RowValue::Number(0.0));
        graph.connect(s1, s1r, r1, r1r).unwrap();

        let first = resolve(&graph, r1, r1r);
        let second = resolve(&graph, r1, r1r);
        assert_eq!(first, second);
        assert_eq!(first, Some(RowValue::Number(7.0)));
    }

    #[test]
    fn test_unconnected_row_has_no_override() {
        let mut graph = Graph::new();
        let (s1, s1r) = node_with_row(&mut graph, NodeKind::Sender, RowValue::Number(5.0));

        assert_eq!(resolve(&graph, s1, s1r), None);
        assert_eq!(
            effective_value(&graph, s1, s1r),
            Some(RowValue::Number(5.0))
        );
    }

    #[test]
    fn test_stale_node_id_yields_sentinel() {
        let mut graph = Graph::new();
        let (s1, s1r) = node_with_row(&mut graph, NodeKind::Sender, RowValue::Number(5.0));
        graph.remove_node(s1);

        assert_eq!(resolve(&graph, s1, s1r), None);
        assert_eq!(effective_value(&graph, s1, s1r), None);
    }

    #[test]
    fn test_cycle_terminates() {
        let mut graph = Graph::new();
        let (c1, c1r) = node_with_row(&mut graph, NodeKind::Channel, RowValue::Number(1.0));
        let (c2, c2r) = node_with_row(&mut graph, NodeKind::Channel, RowValue::Number(2.0));

        graph.connect(c1, c1r, c2, c2r).unwrap();
        graph.connect(c2, c2r, c1, c1r).unwrap();

        // The revisit guard cuts the loop after one unrolling: each side
        // sees the other's stored literal plus its own, and terminates.
        assert_eq!(resolve(&graph, c1, c1r), Some(RowValue::Number(3.0)));
        assert_eq!(resolve(&graph, c2, c2r), Some(RowValue::Number(3.0)));
    }

    #[test]
    fn test_lone_text_contribution_passes_through() {
        let mut graph = Graph::new();
        let (s1, s1r) = node_with_row(&mut graph, NodeKind::Sender, RowValue::Text("hi".into()));
        let (r1, r1r) = node_with_row(&mut graph, NodeKind::Receiver, RowValue::Text(String::new()));

        graph.connect(s1, s1r, r1, r1r).unwrap();

        assert_eq!(
            effective_value(&graph, r1, r1r),
            Some(RowValue::Text("hi".into()))
        );
    }

    #[test]
    fn test_mixed_contributors_sum_numbers_only() {
        let mut graph = Graph::new();
        let (s1, s1r) = node_with_row(&mut graph, NodeKind::Sender, RowValue::Number(5.0));
        let (s2, s2r) = node_with_row(&mut graph, NodeKind::Sender, RowValue::Text("x".into()));
        let (r1, r1r) = node_with_row(&mut graph, NodeKind::Receiver, RowValue::Number(0.0));

        graph.connect(s1, s1r, r1, r1r).unwrap();
        graph.connect(s2, s2r, r1, r1r).unwrap();

        assert_eq!(
            effective_value(&graph, r1, r1r),
            Some(RowValue::Number(5.0))
        );
    }
}
