//! Common test utilities for integration tests.

#![allow(dead_code)]

use slint_node_network::{
    Connection, ConnectionProperty, Connector, ConnectorProperty, Network, Node, NodeProperty,
    ObservableCollection, Point,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Install a `tracing` subscriber honouring `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Records every event of interest, in delivery order.
#[derive(Default, Clone)]
pub struct EventRecorder {
    /// One entry per `items_added` batch.
    pub added: Rc<RefCell<Vec<usize>>>,
    /// One entry per `items_removed` batch.
    pub removed: Rc<RefCell<Vec<usize>>>,
    pub node: Rc<RefCell<Vec<NodeProperty>>>,
    pub connector: Rc<RefCell<Vec<ConnectorProperty>>>,
    pub connection: Rc<RefCell<Vec<ConnectionProperty>>>,
    pub hotspots: Rc<RefCell<Vec<Point>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record batch sizes of a collection.
    pub fn watch_collection<T: Clone + PartialEq + 'static>(&self, collection: &ObservableCollection<T>) {
        collection.items_added().subscribe({
            let added = self.added.clone();
            move |items: &[T]| added.borrow_mut().push(items.len())
        });
        collection.items_removed().subscribe({
            let removed = self.removed.clone();
            move |items: &[T]| removed.borrow_mut().push(items.len())
        });
    }

    pub fn watch_node(&self, node: &Node) {
        let log = self.node.clone();
        node.property_changed()
            .subscribe(move |p| log.borrow_mut().push(*p));
    }

    /// Record property changes and hotspot values of a connector.
    pub fn watch_connector(&self, connector: &Connector) {
        let log = self.connector.clone();
        connector
            .property_changed()
            .subscribe(move |p| log.borrow_mut().push(*p));
        let hotspots = self.hotspots.clone();
        connector
            .hotspot_changed()
            .subscribe(move |p| hotspots.borrow_mut().push(*p));
    }

    pub fn watch_connection(&self, connection: &Connection) {
        let log = self.connection.clone();
        connection
            .property_changed()
            .subscribe(move |p| log.borrow_mut().push(*p));
    }

    /// Clear all recorded events.
    pub fn clear(&self) {
        self.added.borrow_mut().clear();
        self.removed.borrow_mut().clear();
        self.node.borrow_mut().clear();
        self.connector.borrow_mut().clear();
        self.connection.borrow_mut().clear();
        self.hotspots.borrow_mut().clear();
    }
}

/// A node with one connector per `(name, offset)` pair, added to `network`.
pub fn add_node(network: &Network, name: &str, position: Point, connectors: &[(&str, Point)]) -> Node {
    let node = Node::with_position(name, position);
    node.connectors().extend(
        connectors
            .iter()
            .map(|&(name, offset)| Connector::new(name).with_offset(offset)),
    );
    network.nodes().push(node.clone());
    node
}

pub fn connector(node: &Node, name: &str) -> Connector {
    node.find_connector(name)
        .unwrap_or_else(|| panic!("node `{}` has no connector `{name}`", node.name()))
}

/// The two-node scenario: A at (0,0) with connector A1 at offset (10,10),
/// B at (100,0) with connector B1 at offset (0,10), and K wiring A1 to B1.
pub struct TwoNodeScenario {
    pub network: Network,
    pub a: Node,
    pub b: Node,
    pub a1: Connector,
    pub b1: Connector,
    pub k: Connection,
}

impl TwoNodeScenario {
    pub fn new() -> Self {
        let network = Network::new();
        let a = add_node(&network, "A", Point::new(0.0, 0.0), &[("A1", Point::new(10.0, 10.0))]);
        let b = add_node(&network, "B", Point::new(100.0, 0.0), &[("B1", Point::new(0.0, 10.0))]);
        let a1 = connector(&a, "A1");
        let b1 = connector(&b, "B1");
        let k = network.connect(&a1, &b1);
        Self { network, a, b, a1, b1, k }
    }
}

/// A chain of `count` nodes, each wired from its `out` to the next one's `in`.
pub fn chain(network: &Network, count: usize) -> Vec<Node> {
    let nodes: Vec<Node> = (0..count)
        .map(|i| {
            add_node(
                network,
                &format!("N{i}"),
                Point::new(i as f64 * 200.0, 0.0),
                &[("in", Point::new(0.0, 30.0)), ("out", Point::new(120.0, 30.0))],
            )
        })
        .collect();
    for pair in nodes.windows(2) {
        network.connect(&connector(&pair[0], "out"), &connector(&pair[1], "in"));
    }
    nodes
}
