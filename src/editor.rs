//! Editing commands on top of a [`Network`].
//!
//! The model types only keep themselves consistent. [`NetworkEditor`] adds
//! the gestures a diagram UI needs: creating and deleting nodes, dragging a
//! new wire out of a connector and dropping it on another one, and the usual
//! click/shift-click selection.
//!
//! # Example
//!
//! ```
//! use slint_node_network::{NetworkEditor, Network, Point};
//!
//! let editor = NetworkEditor::new(Network::new());
//! let a = editor.create_node("A", Point::new(0.0, 0.0));
//! let b = editor.create_node("B", Point::new(300.0, 0.0));
//!
//! let out = a.find_connector("Out1").unwrap();
//! let input = b.find_connector("In1").unwrap();
//!
//! editor.begin_connection_drag(&out, out.hotspot());
//! editor.update_connection_drag(Point::new(150.0, 40.0)).unwrap();
//! let wire = editor.complete_connection_drag(Some(&input)).unwrap().unwrap();
//!
//! assert_eq!(wire.dest_hotspot(), input.hotspot());
//! assert!(editor.network().check_committed().is_ok());
//! ```

use crate::connection::{Connection, End};
use crate::connector::{Connector, ConnectorType};
use crate::error::EditorError;
use crate::network::Network;
use crate::node::Node;
use crate::point::Point;
use crate::validate::{BasicConnectionValidator, ConnectionValidator, ValidationError};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Geometry and connector layout of nodes made by
/// [`NetworkEditor::create_node`].
#[derive(Debug, Clone, PartialEq)]
pub struct EditorSettings {
    /// Output connectors sit on the right edge, this far from the node origin.
    pub node_width: f64,
    /// Vertical offset of the first connector on each side.
    pub connector_top: f64,
    /// Vertical distance between consecutive connectors.
    pub connector_spacing: f64,
    pub input_connectors: Vec<String>,
    pub output_connectors: Vec<String>,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            node_width: 120.0,
            connector_top: 30.0,
            connector_spacing: 20.0,
            input_connectors: vec!["In1".into(), "In2".into()],
            output_connectors: vec!["Out1".into(), "Out2".into()],
        }
    }
}

/// A wire being dragged out of `anchor`; `free_end` follows the pointer.
struct WireDrag {
    connection: Connection,
    anchor: Connector,
    free_end: End,
}

/// Commands for interactive editing of a [`Network`].
///
/// Clone this editor to share it across UI callbacks; clones share the
/// network, the settings, the validator and the drag in progress.
#[derive(Clone)]
pub struct NetworkEditor {
    network: Network,
    settings: Rc<RefCell<EditorSettings>>,
    validator: Rc<RefCell<Box<dyn ConnectionValidator>>>,
    drag: Rc<RefCell<Option<WireDrag>>>,
}

impl Default for NetworkEditor {
    fn default() -> Self {
        Self::new(Network::new())
    }
}

impl NetworkEditor {
    /// Create an editor with default settings. Wires are checked with
    /// [`BasicConnectionValidator`].
    pub fn new(network: Network) -> Self {
        Self::with_settings(network, EditorSettings::default())
    }

    pub fn with_settings(network: Network, settings: EditorSettings) -> Self {
        Self {
            network,
            settings: Rc::new(RefCell::new(settings)),
            validator: Rc::new(RefCell::new(Box::new(BasicConnectionValidator))),
            drag: Rc::new(RefCell::new(None)),
        }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn settings(&self) -> EditorSettings {
        self.settings.borrow().clone()
    }

    /// Applies to nodes created afterwards.
    pub fn set_settings(&self, settings: EditorSettings) {
        *self.settings.borrow_mut() = settings;
    }

    /// Replace the rule deciding which wires may be completed.
    pub fn set_validator<V: ConnectionValidator + 'static>(&self, validator: V) {
        *self.validator.borrow_mut() = Box::new(validator);
    }

    // === Nodes ===

    /// Create a node at `position` with the configured input and output
    /// connectors and add it to the network.
    pub fn create_node(&self, name: impl Into<String>, position: Point) -> Node {
        let node = Node::with_position(name, position);
        let connectors = {
            let settings = self.settings.borrow();
            let row = |i: usize| settings.connector_top + i as f64 * settings.connector_spacing;
            let inputs = settings.input_connectors.iter().enumerate().map(|(i, name)| {
                Connector::input(name.as_str()).with_offset(Point::new(0.0, row(i)))
            });
            let outputs = settings.output_connectors.iter().enumerate().map(|(i, name)| {
                Connector::output(name.as_str())
                    .with_offset(Point::new(settings.node_width, row(i)))
            });
            inputs.chain(outputs).collect::<Vec<_>>()
        };
        node.connectors().extend(connectors);
        self.network.nodes().push(node.clone());
        tracing::debug!(node = %node.name(), %position, "node created");
        node
    }

    /// Remove `node` together with every connection attached to it.
    ///
    /// Connections go first, so no remaining connection references a
    /// connector of a node that left the network.
    pub fn delete_node(&self, node: &Node) {
        let anchored_here = self
            .drag
            .borrow()
            .as_ref()
            .is_some_and(|drag| drag.anchor.parent_node().as_ref() == Some(node));
        if anchored_here {
            self.drag.borrow_mut().take();
        }

        let removed = self
            .network
            .connections()
            .remove_all(node.attached_connections());
        self.network.nodes().remove(node);
        tracing::debug!(node = %node.name(), connections = removed, "node deleted");
    }

    /// Delete every selected node. Returns how many were deleted.
    pub fn delete_selected_nodes(&self) -> usize {
        let selected = self.network.selected_nodes();
        for node in &selected {
            self.delete_node(node);
        }
        selected.len()
    }

    /// Remove `connection` from the network, which detaches it.
    pub fn delete_connection(&self, connection: &Connection) -> bool {
        let is_dragged = self
            .drag
            .borrow()
            .as_ref()
            .is_some_and(|drag| drag.connection == *connection);
        if is_dragged {
            self.drag.borrow_mut().take();
        }
        self.network.connections().remove(connection)
    }

    // === Wiring gesture ===

    /// Start dragging a new wire out of `connector`.
    ///
    /// Any wire already on `connector` is removed. The new connection is
    /// attached at `connector` and added to the network half-attached; its
    /// free end starts at `pointer`. Dragging from an input makes the input
    /// the destination, anything else becomes the source.
    ///
    /// A drag still in progress is cancelled first.
    pub fn begin_connection_drag(&self, connector: &Connector, pointer: Point) -> Connection {
        self.cancel_connection_drag();

        if let Some(existing) = connector.attached_connection() {
            self.network.connections().remove(&existing);
            // Also covers a wire that never made it into the network
            existing.detach_all();
        }

        let connection = Connection::new();
        let (anchored_end, free_end) = match connector.connector_type() {
            ConnectorType::Input => (End::Dest, End::Source),
            ConnectorType::Output | ConnectorType::Undefined => (End::Source, End::Dest),
        };
        connection.set_connector(anchored_end, Some(connector));
        connection.set_hotspot(free_end, pointer);
        self.network.connections().push(connection.clone());

        tracing::debug!(
            connector = %connector.name(),
            %free_end,
            %pointer,
            "connection drag started"
        );
        *self.drag.borrow_mut() = Some(WireDrag {
            connection: connection.clone(),
            anchor: connector.clone(),
            free_end,
        });
        connection
    }

    /// Move the free end of the dragged wire to `pointer`.
    pub fn update_connection_drag(&self, pointer: Point) -> Result<(), EditorError> {
        let (connection, free_end) = self
            .drag
            .borrow()
            .as_ref()
            .map(|drag| (drag.connection.clone(), drag.free_end))
            .ok_or(EditorError::NoActiveDrag)?;
        tracing::trace!(%pointer, "connection drag moved");
        connection.set_hotspot(free_end, pointer);
        Ok(())
    }

    /// Finish the drag over `target`, or over empty space when `None`.
    ///
    /// Dropping on nothing removes the wire and returns `Ok(None)`. Dropping
    /// on the connector the drag started from, or on one the validator
    /// refuses, removes the wire and returns [`EditorError::Rejected`]. Otherwise any wire already on `target` is
    /// removed and the dragged wire is attached to it.
    pub fn complete_connection_drag(
        &self,
        target: Option<&Connector>,
    ) -> Result<Option<Connection>, EditorError> {
        let drag = self.drag.borrow_mut().take().ok_or(EditorError::NoActiveDrag)?;

        let Some(target) = target else {
            tracing::debug!("connection dropped on empty space");
            self.network.connections().remove(&drag.connection);
            return Ok(None);
        };

        // Dropping back on the anchor would leave the wire half attached
        if *target == drag.anchor {
            tracing::debug!(dropped_on = %target.name(), "connection dropped on its anchor");
            self.network.connections().remove(&drag.connection);
            return Err(ValidationError::SameConnector.into());
        }

        let (from, to) = match drag.free_end {
            End::Dest => (&drag.anchor, target),
            End::Source => (target, &drag.anchor),
        };
        if let Err(error) = self.validator.borrow().validate(from, to) {
            tracing::debug!(%error, dropped_on = %target.name(), "connection rejected");
            self.network.connections().remove(&drag.connection);
            return Err(error.into());
        }

        if let Some(existing) = target.attached_connection() {
            if existing != drag.connection {
                self.network.connections().remove(&existing);
            }
        }
        drag.connection.set_connector(drag.free_end, Some(target));
        tracing::debug!(
            from = %from.name(),
            to = %to.name(),
            "connection completed"
        );
        Ok(Some(drag.connection))
    }

    /// Abandon the drag in progress, removing its wire. Returns whether a
    /// drag was in progress.
    pub fn cancel_connection_drag(&self) -> bool {
        let Some(drag) = self.drag.borrow_mut().take() else {
            return false;
        };
        tracing::debug!(connector = %drag.anchor.name(), "connection drag cancelled");
        self.network.connections().remove(&drag.connection);
        true
    }

    /// The wire being dragged, if any.
    pub fn dragged_connection(&self) -> Option<Connection> {
        self.drag.borrow().as_ref().map(|drag| drag.connection.clone())
    }

    // === Selection ===

    /// Select `node` in response to a click.
    ///
    /// With shift held the node's selection is toggled. Without it the node
    /// becomes the only selected node; clicking the sole selected node
    /// changes nothing.
    pub fn handle_node_click(&self, node: &Node, shift_held: bool) {
        if shift_held {
            node.set_selected(!node.is_selected());
            return;
        }
        let selected = self.network.selected_nodes();
        if selected.len() == 1 && selected[0] == *node {
            return;
        }
        for other in selected.iter().filter(|other| *other != node) {
            other.set_selected(false);
        }
        node.set_selected(true);
    }

    pub fn clear_selection(&self) {
        for node in self.network.selected_nodes() {
            node.set_selected(false);
        }
    }

    /// Make exactly `nodes` selected, e.g. after a box selection.
    pub fn select_nodes<'a, I>(&self, nodes: I)
    where
        I: IntoIterator<Item = &'a Node>,
    {
        let wanted: Vec<&Node> = nodes.into_iter().collect();
        for node in self.network.nodes().iter() {
            node.set_selected(wanted.contains(&&node));
        }
    }

    pub fn selected_nodes(&self) -> Vec<Node> {
        self.network.selected_nodes()
    }

    /// Move every selected node by the drag delta. Returns how many moved.
    pub fn commit_drag(&self, delta_x: f64, delta_y: f64) -> usize {
        let selected = self.network.selected_nodes();
        for node in &selected {
            node.move_by(delta_x, delta_y);
        }
        tracing::debug!(count = selected.len(), delta_x, delta_y, "nodes moved");
        selected.len()
    }
}

impl fmt::Debug for NetworkEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkEditor")
            .field("network", &self.network)
            .field("settings", &*self.settings.borrow())
            .field("dragging", &self.drag.borrow().is_some())
            .finish()
    }
}
