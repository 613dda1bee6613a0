//! Attachment points on nodes.

use crate::connection::{Connection, ConnectionInner};
use crate::event::Event;
use crate::node::{Node, NodeInner};
use crate::point::Point;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

/// Direction of a connector, used by connection validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectorType {
    /// Compatible with any other connector.
    #[default]
    Undefined,
    Input,
    Output,
}

/// Field reported by [`Connector::property_changed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectorProperty {
    Name,
    Offset,
    Hotspot,
    AttachedConnection,
    ParentNode,
}

pub(crate) struct ConnectorInner {
    name: RefCell<String>,
    connector_type: ConnectorType,
    offset: Cell<Point>,
    hotspot: Cell<Point>,
    attached_connection: RefCell<Weak<ConnectionInner>>,
    parent_node: RefCell<Weak<NodeInner>>,
    hotspot_changed: Event<Point>,
    property_changed: Event<ConnectorProperty>,
}

/// A named attachment point on a node where at most one connection ends.
///
/// `Connector` is a shared handle; clones refer to the same connector and
/// equality is identity. The node owning the connector and the connection
/// attached to it are held as weak back-references, maintained by
/// [`Node`] and [`Connection`] respectively.
///
/// The hotspot is the connector's anchor in canvas space. While the
/// connector belongs to a node it is kept at `node position + offset`; the
/// layout layer may also set it directly with [`set_hotspot`](Self::set_hotspot).
#[derive(Clone)]
pub struct Connector(pub(crate) Rc<ConnectorInner>);

impl Connector {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_type(name, ConnectorType::Undefined)
    }

    pub fn input(name: impl Into<String>) -> Self {
        Self::with_type(name, ConnectorType::Input)
    }

    pub fn output(name: impl Into<String>) -> Self {
        Self::with_type(name, ConnectorType::Output)
    }

    pub fn with_type(name: impl Into<String>, connector_type: ConnectorType) -> Self {
        Connector(Rc::new(ConnectorInner {
            name: RefCell::new(name.into()),
            connector_type,
            offset: Cell::new(Point::ORIGIN),
            hotspot: Cell::new(Point::ORIGIN),
            attached_connection: RefCell::new(Weak::new()),
            parent_node: RefCell::new(Weak::new()),
            hotspot_changed: Event::new(),
            property_changed: Event::new(),
        }))
    }

    /// Builder-style offset for freshly created connectors.
    pub fn with_offset(self, offset: Point) -> Self {
        self.set_offset(offset);
        self
    }

    pub fn name(&self) -> String {
        self.0.name.borrow().clone()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        let name = name.into();
        if *self.0.name.borrow() == name {
            return;
        }
        *self.0.name.borrow_mut() = name;
        self.0.property_changed.emit(&ConnectorProperty::Name);
    }

    pub fn connector_type(&self) -> ConnectorType {
        self.0.connector_type
    }

    /// Position relative to the owning node's top-left corner.
    pub fn offset(&self) -> Point {
        self.0.offset.get()
    }

    /// Change the offset and re-anchor the hotspot if the connector has a node.
    pub fn set_offset(&self, offset: Point) {
        if self.0.offset.get() == offset {
            return;
        }
        self.0.offset.set(offset);
        self.0.property_changed.emit(&ConnectorProperty::Offset);
        self.reanchor();
    }

    pub fn hotspot(&self) -> Point {
        self.0.hotspot.get()
    }

    /// Move the anchor point. Fires [`hotspot_changed`](Self::hotspot_changed)
    /// (which attached connections listen to) and then `property_changed`.
    pub fn set_hotspot(&self, hotspot: Point) {
        if self.0.hotspot.get() == hotspot {
            return;
        }
        self.0.hotspot.set(hotspot);
        tracing::trace!(connector = %self.0.name.borrow(), %hotspot, "hotspot changed");
        self.0.hotspot_changed.emit(&hotspot);
        self.0.property_changed.emit(&ConnectorProperty::Hotspot);
    }

    /// The connection currently attached, if any.
    pub fn attached_connection(&self) -> Option<Connection> {
        self.0.attached_connection.borrow().upgrade().map(Connection)
    }

    pub fn is_attached(&self) -> bool {
        self.0.attached_connection.borrow().strong_count() > 0
    }

    /// Set the back-reference. Only [`Connection`] calls this, as part of
    /// attaching or detaching; it performs no consistency checks itself.
    pub(crate) fn set_attached_connection(&self, connection: Option<&Connection>) {
        if self.attached_connection().as_ref() == connection {
            return;
        }
        *self.0.attached_connection.borrow_mut() = match connection {
            Some(connection) => Rc::downgrade(&connection.0),
            None => Weak::new(),
        };
        self.0
            .property_changed
            .emit(&ConnectorProperty::AttachedConnection);
    }

    /// Drop a back-reference to a connection that no longer exists, without
    /// notifying anyone. Used while that connection is being destroyed.
    pub(crate) fn release_dead_connection(&self) {
        let mut attached = self.0.attached_connection.borrow_mut();
        if attached.strong_count() == 0 {
            *attached = Weak::new();
        }
    }

    /// The node owning this connector, if any.
    pub fn parent_node(&self) -> Option<Node> {
        self.0.parent_node.borrow().upgrade().map(Node)
    }

    /// Set the owner back-reference. Only the node's connector collection
    /// handlers call this.
    pub(crate) fn set_parent_node(&self, node: Option<&Node>) {
        if self.parent_node().as_ref() == node {
            return;
        }
        *self.0.parent_node.borrow_mut() = match node {
            Some(node) => Rc::downgrade(&node.0),
            None => Weak::new(),
        };
        self.0.property_changed.emit(&ConnectorProperty::ParentNode);
        self.reanchor();
    }

    /// Snap the hotspot to `node position + offset`. No-op without a node.
    pub(crate) fn reanchor(&self) {
        if let Some(node) = self.parent_node() {
            self.set_hotspot(node.position() + self.offset());
        }
    }

    /// Fired with the new hotspot whenever it changes.
    pub fn hotspot_changed(&self) -> &Event<Point> {
        &self.0.hotspot_changed
    }

    pub fn property_changed(&self) -> &Event<ConnectorProperty> {
        &self.0.property_changed
    }

    pub fn ptr_eq(&self, other: &Connector) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Connector {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Connector {}

impl Hash for Connector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Rc::as_ptr(&self.0).hash(state);
    }
}

impl fmt::Debug for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connector")
            .field("name", &*self.0.name.borrow())
            .field("type", &self.0.connector_type)
            .field("hotspot", &self.0.hotspot.get())
            .field("attached", &self.is_attached())
            .finish()
    }
}
