//! Level 6: Scalability Tests
//!
//! Tests that large networks stay consistent under bulk edits.

mod common;

use slint_node_network::{Network, NetworkEditor, Point};

const CHAIN_LENGTH: usize = 500;

#[test]
fn test_large_chain_is_consistent() {
    let network = Network::new();
    let nodes = common::chain(&network, CHAIN_LENGTH);

    assert_eq!(network.nodes().len(), CHAIN_LENGTH);
    assert_eq!(network.connections().len(), CHAIN_LENGTH - 1);
    assert_eq!(network.check_committed(), Ok(()));
    assert_eq!(nodes[1].attached_connections().len(), 2);
}

#[test]
fn test_moving_every_node_updates_every_wire() {
    let network = Network::new();
    let nodes = common::chain(&network, CHAIN_LENGTH);

    for node in &nodes {
        node.move_by(0.0, 50.0);
    }

    for connection in network.connections().iter() {
        assert_eq!(connection.source_hotspot().y, 80.0);
        assert_eq!(connection.dest_hotspot().y, 80.0);
    }
    assert_eq!(network.check_committed(), Ok(()));
}

#[test]
fn test_clearing_large_network() {
    let network = Network::new();
    let nodes = common::chain(&network, CHAIN_LENGTH);

    assert_eq!(network.connections().clear(), CHAIN_LENGTH - 1);
    assert_eq!(network.nodes().clear(), CHAIN_LENGTH);

    for node in &nodes {
        assert!(node.attached_connections().is_empty());
    }
    assert_eq!(network.check_committed(), Ok(()));
}

#[test]
fn test_deleting_every_other_node() {
    let editor = NetworkEditor::new(Network::new());
    let nodes = common::chain(editor.network(), 100);

    for node in nodes.iter().step_by(2) {
        editor.delete_node(node);
    }

    assert_eq!(editor.network().nodes().len(), 50);
    assert!(editor.network().connections().is_empty());
    assert_eq!(editor.network().check_committed(), Ok(()));
}

#[test]
fn test_select_all_and_drag() {
    let editor = NetworkEditor::default();
    let nodes: Vec<_> = (0..CHAIN_LENGTH)
        .map(|i| editor.create_node(format!("N{i}"), Point::new(i as f64, 0.0)))
        .collect();

    editor.select_nodes(&nodes);
    assert_eq!(editor.commit_drag(1.0, 1.0), CHAIN_LENGTH);
    assert_eq!(nodes[CHAIN_LENGTH - 1].position(), Point::new(CHAIN_LENGTH as f64, 1.0));
}
