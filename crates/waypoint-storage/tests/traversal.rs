//! Traversals over the in-memory graph

use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use waypoint_core::{
    Direction, Error, Node, NodeId, Order, Properties, ReturnableEvaluator, StopEvaluator,
    TraversalDescriptor, TraversalNode, RETURN_ALL_BUT_START_NODE, RETURN_ALL_NODES,
};
use waypoint_storage::{FailingGraph, MemoryGraph, StorageError};

fn named(graph: &MemoryGraph, name: &str) -> Node {
    let mut properties = Properties::new();
    properties.insert("name".to_string(), json!(name));
    graph.create_node(properties).unwrap()
}

fn link(graph: &MemoryGraph, from: &Node, rel_type: &str, to: &Node) {
    graph
        .create_relationship(from.id, to.id, rel_type, Properties::new())
        .unwrap();
}

fn name_of(node: &TraversalNode) -> String {
    node.node().property_str("name").unwrap_or_default().to_string()
}

fn collect(
    traversal: impl Iterator<Item = waypoint_core::Result<TraversalNode>>,
) -> Vec<TraversalNode> {
    traversal.map(|n| n.unwrap()).collect()
}

struct Matrix {
    graph: MemoryGraph,
    thomas: Node,
}

fn matrix() -> Matrix {
    let graph = MemoryGraph::new();
    let thomas = named(&graph, "Thomas Anderson");
    let trinity = named(&graph, "Trinity");
    let morpheus = named(&graph, "Morpheus");
    let cypher = named(&graph, "Cypher");
    let smith = named(&graph, "Agent Smith");
    let architect = named(&graph, "The Architect");

    link(&graph, &thomas, "knows", &trinity);
    link(&graph, &trinity, "loves", &thomas);
    link(&graph, &thomas, "knows", &morpheus);
    link(&graph, &morpheus, "knows", &trinity);
    link(&graph, &morpheus, "knows", &cypher);
    link(&graph, &cypher, "knows", &smith);
    link(&graph, &smith, "coded_by", &architect);

    Matrix { graph, thomas }
}

#[test]
fn test_friends_of_thomas() {
    let matrix = matrix();
    let friends = TraversalDescriptor::builder("friends")
        .relationship(matrix.graph.registry().outgoing("knows").unwrap())
        .returnable(RETURN_ALL_BUT_START_NODE)
        .build()
        .unwrap();

    let found: HashMap<String, u32> = collect(friends.traverse(&matrix.graph, matrix.thomas.clone()).unwrap())
        .iter()
        .map(|n| (name_of(n), n.depth()))
        .collect();

    let expected: HashMap<String, u32> = [
        ("Trinity", 1),
        ("Morpheus", 1),
        ("Cypher", 2),
        ("Agent Smith", 3),
    ]
    .into_iter()
    .map(|(name, depth)| (name.to_string(), depth))
    .collect();
    assert_eq!(found, expected);
}

#[test]
fn test_hackers_in_the_matrix() {
    let matrix = matrix();
    let registry = matrix.graph.registry();
    let coded_by = registry.type_for("coded_by").unwrap();

    let hackers = TraversalDescriptor::builder("hackers")
        .depth_first()
        .relationship(registry.outgoing("knows").unwrap())
        .relationship(registry.with_direction(&coded_by, Direction::Outgoing))
        .is_returnable(move |position| {
            Ok(!position.is_start()
                && position
                    .last_relationship()
                    .is_some_and(|rel| rel.rel_type() == &coded_by))
        })
        .build()
        .unwrap();

    let found = collect(hackers.traverse(&matrix.graph, matrix.thomas.clone()).unwrap());
    assert_eq!(found.len(), 1);
    assert_eq!(name_of(&found[0]), "The Architect");
    assert_eq!(found[0].depth(), 4);
}

#[test]
fn test_descriptor_is_reusable() {
    let matrix = matrix();
    let friends = TraversalDescriptor::builder("friends")
        .relationship(matrix.graph.registry().outgoing("knows").unwrap())
        .build()
        .unwrap();

    let first = collect(friends.traverse(&matrix.graph, matrix.thomas.clone()).unwrap());
    let second = collect(friends.traverse(&matrix.graph, matrix.thomas.clone()).unwrap());
    let ids = |nodes: &[TraversalNode]| nodes.iter().map(|n| n.id()).collect::<Vec<_>>();
    assert_eq!(ids(&first), ids(&second));
    assert_eq!(first.len(), 5);
}

fn triangle() -> (MemoryGraph, Node, Node, Node) {
    let graph = MemoryGraph::new();
    let a = named(&graph, "A");
    let b = named(&graph, "B");
    let c = named(&graph, "C");
    link(&graph, &a, "knows", &b);
    link(&graph, &b, "knows", &c);
    link(&graph, &a, "knows", &c);
    (graph, a, b, c)
}

#[test]
fn test_triangle_yields_each_node_once() {
    let (graph, a, _, _) = triangle();
    let descriptor = TraversalDescriptor::builder("triangle")
        .relationship(graph.registry().outgoing("knows").unwrap())
        .returnable(RETURN_ALL_BUT_START_NODE)
        .build()
        .unwrap();

    let names: Vec<String> = collect(descriptor.traverse(&graph, a).unwrap())
        .iter()
        .map(name_of)
        .collect();
    assert_eq!(names, vec!["B", "C"]);
}

#[test]
fn test_stop_at_depth_never_expands_frontier() {
    let (graph, a, b, c) = triangle();
    let descriptor = TraversalDescriptor::builder("neighbours")
        .relationship(graph.registry().outgoing("knows").unwrap())
        .stop(StopEvaluator::at_depth(1).unwrap())
        .build()
        .unwrap();
    let failing = FailingGraph::new(graph);

    let found = collect(descriptor.traverse(&failing, a.clone()).unwrap());
    assert!(found.iter().all(|n| n.depth() <= 1));
    assert_eq!(found.len(), 3);
    assert_eq!(failing.expanded_nodes(), vec![a.id]);
    assert!(!failing.expanded_nodes().contains(&b.id));
    assert!(!failing.expanded_nodes().contains(&c.id));
}

#[test]
fn test_start_node_first_in_breadth_first() {
    let (graph, a, _, _) = triangle();
    let descriptor = TraversalDescriptor::builder("all")
        .relationship(graph.registry().outgoing("knows").unwrap())
        .returnable(RETURN_ALL_NODES)
        .build()
        .unwrap();

    let found = collect(descriptor.traverse(&graph, a.clone()).unwrap());
    assert_eq!(found[0].id(), a.id);
    assert_eq!(found[0].depth(), 0);
    assert!(found[0].position().is_start());
}

fn chain(last: &str) -> (MemoryGraph, Vec<Node>) {
    let graph = MemoryGraph::new();
    let nodes: Vec<Node> = ["n0", "n1", "n2", "n3", "n4"]
        .iter()
        .map(|name| named(&graph, name))
        .collect();
    for pair in nodes.windows(2).take(3) {
        link(&graph, &pair[0], "knows", &pair[1]);
    }
    link(&graph, &nodes[3], last, &nodes[4]);
    (graph, nodes)
}

#[test]
fn test_last_hop_type_in_both_orders() {
    for order in [Order::BreadthFirst, Order::DepthFirst] {
        let (graph, nodes) = chain("coded_by");
        let registry = graph.registry();
        let coded_by = registry.type_for("coded_by").unwrap();

        let descriptor = TraversalDescriptor::builder("coders")
            .order(order)
            .relationship(registry.outgoing("knows").unwrap())
            .relationship(registry.outgoing("coded_by").unwrap())
            .returnable(ReturnableEvaluator::when(move |position| {
                position
                    .last_relationship()
                    .is_some_and(|rel| rel.rel_type() == &coded_by)
            }))
            .build()
            .unwrap();

        let found = collect(descriptor.traverse(&graph, nodes[0].clone()).unwrap());
        assert_eq!(found.len(), 1, "order {}", order);
        assert_eq!(found[0].id(), nodes[4].id);
        assert_eq!(found[0].depth(), 4);
        assert_eq!(
            found[0].position().previous_node().map(|n| n.id),
            Some(nodes[3].id)
        );
    }
}

#[test]
fn test_breadth_first_levels_are_ordered() {
    let graph = MemoryGraph::new();
    let root = named(&graph, "root");
    let mut level_one = Vec::new();
    for i in 0..3 {
        let child = named(&graph, &format!("c{}", i));
        link(&graph, &root, "child", &child);
        level_one.push(child);
    }
    for (i, parent) in level_one.iter().enumerate() {
        let grandchild = named(&graph, &format!("g{}", i));
        link(&graph, parent, "child", &grandchild);
    }

    let descriptor = TraversalDescriptor::builder("tree")
        .relationship(graph.registry().outgoing("child").unwrap())
        .build()
        .unwrap();
    let depths: Vec<u32> = collect(descriptor.traverse(&graph, root).unwrap())
        .iter()
        .map(|n| n.depth())
        .collect();
    assert_eq!(depths, vec![0, 1, 1, 1, 2, 2, 2]);
}

#[test]
fn test_depth_first_exhausts_path() {
    let graph = MemoryGraph::new();
    let root = named(&graph, "root");
    let left = named(&graph, "left");
    let right = named(&graph, "right");
    let leaf = named(&graph, "leaf");
    link(&graph, &root, "child", &left);
    link(&graph, &root, "child", &right);
    link(&graph, &left, "child", &leaf);

    let descriptor = TraversalDescriptor::builder("tree")
        .depth_first()
        .relationship(graph.registry().outgoing("child").unwrap())
        .build()
        .unwrap();
    let names: Vec<String> = collect(descriptor.traverse(&graph, root).unwrap())
        .iter()
        .map(name_of)
        .collect();
    assert_eq!(names, vec!["root", "left", "leaf", "right"]);
}

#[test]
fn test_cycle_terminates() {
    let graph = MemoryGraph::new();
    let ring: Vec<Node> = (0..4).map(|i| named(&graph, &format!("r{}", i))).collect();
    for i in 0..ring.len() {
        link(&graph, &ring[i], "next", &ring[(i + 1) % ring.len()]);
    }

    let descriptor = TraversalDescriptor::builder("ring")
        .relationship(graph.registry().both("next").unwrap())
        .build()
        .unwrap();
    let mut ids: Vec<NodeId> = collect(descriptor.traverse(&graph, ring[0].clone()).unwrap())
        .iter()
        .map(|n| n.id())
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 4);
}

#[test]
fn test_returned_count_seen_by_evaluator() {
    let (graph, a, _, _) = triangle();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&seen);
    let descriptor = TraversalDescriptor::builder("counted")
        .relationship(graph.registry().outgoing("knows").unwrap())
        .is_returnable(move |position| {
            recorder.lock().unwrap().push(position.returned_count());
            Ok(position.depth() > 0)
        })
        .build()
        .unwrap();

    let counts: Vec<u64> = collect(descriptor.traverse(&graph, a).unwrap())
        .iter()
        .map(|n| n.position().returned_count())
        .collect();
    // A rejected at 0, B accepted at 0, C accepted at 1; the second path to C is skipped
    assert_eq!(*seen.lock().unwrap(), vec![0, 0, 1]);
    assert_eq!(counts, vec![1, 2]);
}

#[test]
fn test_injected_failure_surfaces_and_fuses() {
    let (graph, a, b, _) = triangle();
    let descriptor = TraversalDescriptor::builder("failing")
        .relationship(graph.registry().outgoing("knows").unwrap())
        .build()
        .unwrap();
    let failing = FailingGraph::new(graph);
    failing.fail_on(b.id);

    let mut traversal = descriptor.traverse(&failing, a).unwrap();
    assert!(traversal.next().unwrap().is_ok());
    let b_node = traversal.next().unwrap().unwrap();
    assert_eq!(b_node.id(), b.id);

    let err = traversal.next().unwrap().unwrap_err();
    match err {
        Error::TraversalIo { node, source } => {
            assert_eq!(node, b.id);
            assert!(source.downcast_ref::<StorageError>().is_some());
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(traversal.next().is_none());
    assert!(traversal.is_finished());
}

#[test]
fn test_snapshot_roundtrip_preserves_traversal() {
    let matrix = matrix();
    let restored = MemoryGraph::from_snapshot(matrix.graph.snapshot().unwrap()).unwrap();
    let start = restored
        .find_node("name", &json!("Thomas Anderson"))
        .unwrap()
        .unwrap();

    let descriptor = TraversalDescriptor::builder("friends")
        .relationship(restored.registry().outgoing("knows").unwrap())
        .returnable(RETURN_ALL_BUT_START_NODE)
        .build()
        .unwrap();
    assert_eq!(collect(descriptor.traverse(&restored, start).unwrap()).len(), 4);
}
