//! The top-level aggregate: every node and every connection of a diagram.

use crate::collection::ObservableCollection;
use crate::connection::{Connection, ConnectionState, End};
use crate::connector::Connector;
use crate::error::InvariantViolation;
use crate::node::Node;
use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

#[derive(Default)]
struct NetworkInner {
    nodes: OnceCell<ObservableCollection<Node>>,
    connections: OnceCell<ObservableCollection<Connection>>,
}

/// A network of nodes and the connections between them.
///
/// `Network` is a shared handle: clones see the same collections. Removing
/// a connection from [`connections`](Self::connections) detaches both of its
/// ends, so no connector keeps a back-reference to a connection that left the
/// network.
///
/// Node removal does not cascade. Callers remove a node's
/// [`attached_connections`](Node::attached_connections) first and the node
/// afterwards; [`NetworkEditor::delete_node`](crate::NetworkEditor::delete_node)
/// does exactly that.
#[derive(Clone, Default)]
pub struct Network(Rc<NetworkInner>);

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    /// All nodes, created on first access.
    pub fn nodes(&self) -> &ObservableCollection<Node> {
        self.0.nodes.get_or_init(ObservableCollection::new)
    }

    /// All connections, created on first access.
    pub fn connections(&self) -> &ObservableCollection<Connection> {
        self.0.connections.get_or_init(|| {
            let connections = ObservableCollection::new();
            connections
                .items_removed()
                .subscribe(|removed: &[Connection]| {
                    tracing::debug!(count = removed.len(), "detaching removed connections");
                    for connection in removed {
                        connection.detach_all();
                    }
                });
            connections
        })
    }

    /// Wire `source` to `dest` with a new connection and add it.
    pub fn connect(&self, source: &Connector, dest: &Connector) -> Connection {
        let connection = Connection::between(source, dest);
        self.connections().push(connection.clone());
        connection
    }

    /// First node called `name`.
    pub fn find_node(&self, name: &str) -> Option<Node> {
        self.nodes().iter().find(|n| n.name() == name)
    }

    pub fn selected_nodes(&self) -> Vec<Node> {
        self.nodes().iter().filter(Node::is_selected).collect()
    }

    /// Walk the whole graph and report the first broken invariant.
    ///
    /// Half-attached connections pass: they are legitimate while a wire is
    /// being dragged. Use [`check_committed`](Self::check_committed) once no
    /// gesture is in progress.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let nodes = self.nodes().to_vec();

        for node in &nodes {
            for connector in node.connectors().iter() {
                if connector.parent_node().as_ref() != Some(node) {
                    return Err(InvariantViolation::OrphanedConnector {
                        node: node.name(),
                        connector: connector.name(),
                    });
                }
                if let Some(connection) = connector.attached_connection() {
                    if connection.end_of(&connector).is_none() {
                        return Err(InvariantViolation::StaleAttachment {
                            connector: connector.name(),
                        });
                    }
                }
            }
        }

        for connection in self.connections().iter() {
            for end in [End::Source, End::Dest] {
                let Some(connector) = connection.connector(end) else {
                    continue;
                };
                if connector.attached_connection().as_ref() != Some(&connection) {
                    return Err(InvariantViolation::EndpointNotAttached {
                        end,
                        connector: connector.name(),
                    });
                }
                let (cached, live) = (connection.hotspot(end), connector.hotspot());
                if cached != live {
                    return Err(InvariantViolation::StaleHotspot { end, cached, live });
                }
                let on_network_node = connector
                    .parent_node()
                    .is_some_and(|node| nodes.contains(&node));
                if !on_network_node {
                    return Err(InvariantViolation::DanglingEndpoint {
                        end,
                        connector: connector.name(),
                    });
                }
            }
        }

        Ok(())
    }

    /// [`check_invariants`](Self::check_invariants), plus every connection
    /// must be attached at both ends.
    pub fn check_committed(&self) -> Result<(), InvariantViolation> {
        self.check_invariants()?;
        for connection in self.connections().iter() {
            let state = connection.state();
            if state != ConnectionState::Attached {
                return Err(InvariantViolation::Uncommitted { state });
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Network")
            .field("nodes", &self.nodes().len())
            .field("connections", &self.connections().len())
            .finish()
    }
}
