//! Property-based tests for path construction and filter semantics

use std::collections::BTreeMap;

use proptest::prelude::*;
use structx::{fields, iterate_object, Field, FieldFilter, Walk};

#[derive(Debug, Clone, Walk)]
pub struct Node {
    pub label: String,
    pub weight: i64,
}

#[derive(Debug, Clone, Walk)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub groups: BTreeMap<String, Node>,
    pub scores: Vec<u32>,
}

fn node_strategy() -> impl Strategy<Value = Node> {
    ("[a-z]{0,8}", any::<i64>()).prop_map(|(label, weight)| Node { label, weight })
}

fn graph_strategy() -> impl Strategy<Value = Graph> {
    (
        prop::collection::vec(node_strategy(), 0..20),
        prop::collection::btree_map("[a-z0-9]{1,6}", node_strategy(), 0..10),
        prop::collection::vec(any::<u32>(), 0..10),
    )
        .prop_map(|(nodes, groups, scores)| Graph {
            nodes,
            groups,
            scores,
        })
}

proptest! {
    #[test]
    fn every_struct_leaf_is_recorded_once(graph in graph_strategy()) {
        let values = fields(&graph);

        // Two leaves per node; scalar sequences contribute nothing.
        prop_assert_eq!(values.len(), 2 * (graph.nodes.len() + graph.groups.len()));

        for (index, node) in graph.nodes.iter().enumerate() {
            let path = format!("Graph.nodes[{}].weight", index);
            prop_assert_eq!(values.get_as::<i64>(&path).unwrap(), &node.weight);
        }
        for (key, node) in &graph.groups {
            let path = format!("Graph.groups[{}].label", key);
            prop_assert_eq!(values.get_as::<String>(&path).unwrap(), &node.label);
        }
        prop_assert!(values.paths().iter().all(|path| !path.starts_with("Graph.scores")));
    }

    #[test]
    fn repeated_walks_are_idempotent(graph in graph_strategy()) {
        prop_assert_eq!(fields(&graph), fields(&graph));
    }

    #[test]
    fn failing_filter_stops_at_the_nth_leaf(graph in graph_strategy(), fail_at in 0usize..50) {
        let total = fields(&graph).len();

        let mut seen = 0usize;
        let mut filter = |_: &str, _: &Field<'_>| -> Result<(), usize> {
            if seen == fail_at {
                return Err(seen);
            }
            seen += 1;
            Ok(())
        };
        let mut filters: [&mut FieldFilter<'_, usize>; 1] = [&mut filter];
        let result = iterate_object(&graph, &mut filters);
        drop(filters);

        if fail_at < total {
            prop_assert_eq!(result.unwrap_err(), fail_at);
            prop_assert_eq!(seen, fail_at);
        } else {
            prop_assert_eq!(result.unwrap().len(), total);
            prop_assert_eq!(seen, total);
        }
    }
}
