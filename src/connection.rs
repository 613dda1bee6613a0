//! Directed edges between two connectors.
//!
//! A [`Connection`] links a source connector to a destination connector and
//! caches each endpoint's hotspot so the rendering layer can draw the wire
//! without looking up the connectors. Assigning an endpoint is the central
//! state transition of the model:
//!
//! 1. the previous connector at that end (if any) is detached: its
//!    back-reference is cleared and its hotspot subscription dropped;
//! 2. the new connector is detached from whatever connection it was on;
//! 3. the new connector is attached: back-reference set, hotspot subscribed,
//!    current hotspot copied into the cache;
//! 4. an endpoint property change is emitted.
//!
//! From then on every hotspot move of the connector is pushed into the
//! cached value, so moving a node updates all wires touching it.
//!
//! ```text
//!   Unattached ──set one end──▶ HalfAttached ──set other end──▶ Attached
//!        ▲                          │  ▲                            │
//!        └──────clear end───────────┘  └─────────clear end──────────┘
//! ```

use crate::connector::Connector;
use crate::event::{Event, SubscriptionId};
use crate::node::Node;
use crate::point::Point;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

/// One of the two ends of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum End {
    Source,
    Dest,
}

impl End {
    pub fn opposite(self) -> End {
        match self {
            End::Source => End::Dest,
            End::Dest => End::Source,
        }
    }

    fn connector_property(self) -> ConnectionProperty {
        match self {
            End::Source => ConnectionProperty::SourceConnector,
            End::Dest => ConnectionProperty::DestConnector,
        }
    }

    fn hotspot_property(self) -> ConnectionProperty {
        match self {
            End::Source => ConnectionProperty::SourceHotspot,
            End::Dest => ConnectionProperty::DestHotspot,
        }
    }
}

impl fmt::Display for End {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            End::Source => f.write_str("source"),
            End::Dest => f.write_str("destination"),
        }
    }
}

/// How many ends of a connection are attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// Neither end attached.
    Unattached,
    /// Exactly one end attached; only valid while a wire is being dragged.
    HalfAttached,
    /// Both ends attached.
    Attached,
}

/// Field reported by [`Connection::property_changed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionProperty {
    SourceConnector,
    DestConnector,
    SourceHotspot,
    DestHotspot,
}

struct Endpoint {
    connector: Connector,
    subscription: SubscriptionId,
}

pub(crate) struct ConnectionInner {
    source: RefCell<Option<Endpoint>>,
    dest: RefCell<Option<Endpoint>>,
    source_hotspot: Cell<Point>,
    dest_hotspot: Cell<Point>,
    property_changed: Event<ConnectionProperty>,
    self_weak: Weak<ConnectionInner>,
}

impl ConnectionInner {
    fn slot(&self, end: End) -> &RefCell<Option<Endpoint>> {
        match end {
            End::Source => &self.source,
            End::Dest => &self.dest,
        }
    }

    pub(crate) fn hotspot_cell(&self, end: End) -> &Cell<Point> {
        match end {
            End::Source => &self.source_hotspot,
            End::Dest => &self.dest_hotspot,
        }
    }
}

impl Drop for ConnectionInner {
    fn drop(&mut self) {
        // Last handle gone while still attached: unhook quietly.
        for slot in [&self.source, &self.dest] {
            if let Some(endpoint) = slot.borrow_mut().take() {
                endpoint
                    .connector
                    .hotspot_changed()
                    .unsubscribe(endpoint.subscription);
                endpoint.connector.release_dead_connection();
            }
        }
    }
}

/// A directed edge from a source connector to a destination connector.
///
/// `Connection` is a shared handle with identity equality. It references
/// its connectors without owning their lifetime; the connectors point back
/// to it weakly. Either end may be unset, which is how a wire is represented
/// while the user is still dragging it.
#[derive(Clone)]
pub struct Connection(pub(crate) Rc<ConnectionInner>);

impl Default for Connection {
    fn default() -> Self {
        Self::new()
    }
}

impl Connection {
    /// Create an unattached connection.
    pub fn new() -> Self {
        Connection(Rc::new_cyclic(|weak| ConnectionInner {
            source: RefCell::new(None),
            dest: RefCell::new(None),
            source_hotspot: Cell::new(Point::ORIGIN),
            dest_hotspot: Cell::new(Point::ORIGIN),
            property_changed: Event::new(),
            self_weak: weak.clone(),
        }))
    }

    /// Create a connection attached at both ends.
    pub fn between(source: &Connector, dest: &Connector) -> Self {
        let connection = Self::new();
        connection.set_source_connector(Some(source));
        connection.set_dest_connector(Some(dest));
        connection
    }

    pub fn source_connector(&self) -> Option<Connector> {
        self.connector(End::Source)
    }

    pub fn dest_connector(&self) -> Option<Connector> {
        self.connector(End::Dest)
    }

    pub fn connector(&self, end: End) -> Option<Connector> {
        self.0
            .slot(end)
            .borrow()
            .as_ref()
            .map(|endpoint| endpoint.connector.clone())
    }

    pub fn set_source_connector(&self, connector: Option<&Connector>) {
        self.set_connector(End::Source, connector);
    }

    pub fn set_dest_connector(&self, connector: Option<&Connector>) {
        self.set_connector(End::Dest, connector);
    }

    /// Attach `connector` at `end`, or detach that end when `None`.
    ///
    /// Assigning the connector already at `end` does nothing. A connector
    /// that is attached to another connection (or to this connection's other
    /// end) is detached from there first, so a connector never ends up on two
    /// connections.
    pub fn set_connector(&self, end: End, connector: Option<&Connector>) {
        if self.connector(end).as_ref() == connector {
            return;
        }
        self.detach(end);
        if let Some(connector) = connector {
            self.attach(end, connector);
        }
        self.0.property_changed.emit(&end.connector_property());
    }

    /// Detach both ends.
    pub fn detach_all(&self) {
        self.set_connector(End::Source, None);
        self.set_connector(End::Dest, None);
    }

    fn detach(&self, end: End) {
        let Some(endpoint) = self.0.slot(end).borrow_mut().take() else {
            return;
        };
        debug_assert!(
            endpoint.connector.attached_connection().as_ref() == Some(self),
            "connector `{}` is not attached to the connection detaching it",
            endpoint.connector.name()
        );
        endpoint
            .connector
            .hotspot_changed()
            .unsubscribe(endpoint.subscription);
        endpoint.connector.set_attached_connection(None);
        tracing::debug!(%end, connector = %endpoint.connector.name(), "connector detached");
    }

    fn attach(&self, end: End, connector: &Connector) {
        if let Some(previous) = connector.attached_connection() {
            let previous_end = previous.end_of(connector);
            debug_assert!(
                previous_end.is_some(),
                "connector `{}` back-references a connection that does not reference it",
                connector.name()
            );
            match previous_end {
                Some(previous_end) => {
                    tracing::debug!(
                        connector = %connector.name(),
                        "moving connector off its previous connection"
                    );
                    previous.set_connector(previous_end, None);
                }
                None => {
                    tracing::warn!(connector = %connector.name(), "clearing stale connection back-reference");
                    connector.set_attached_connection(None);
                }
            }
        }

        let weak = self.0.self_weak.clone();
        let subscription = connector.hotspot_changed().subscribe(move |hotspot| {
            if let Some(inner) = weak.upgrade() {
                Connection(inner).sync_hotspot(end, *hotspot);
            }
        });
        *self.0.slot(end).borrow_mut() = Some(Endpoint {
            connector: connector.clone(),
            subscription,
        });
        connector.set_attached_connection(Some(self));
        self.sync_hotspot(end, connector.hotspot());
        tracing::debug!(%end, connector = %connector.name(), "connector attached");
    }

    pub fn source_hotspot(&self) -> Point {
        self.0.source_hotspot.get()
    }

    pub fn dest_hotspot(&self) -> Point {
        self.0.dest_hotspot.get()
    }

    /// Cached hotspot of `end`.
    pub fn hotspot(&self, end: End) -> Point {
        self.0.hotspot_cell(end).get()
    }

    pub fn set_source_hotspot(&self, hotspot: Point) {
        self.set_hotspot(End::Source, hotspot);
    }

    pub fn set_dest_hotspot(&self, hotspot: Point) {
        self.set_hotspot(End::Dest, hotspot);
    }

    /// Move the free end of a wire, e.g. while it is being dragged.
    ///
    /// An attached end always mirrors its connector's hotspot, so setting it
    /// here is a contract violation; release builds ignore the call.
    pub fn set_hotspot(&self, end: End, hotspot: Point) {
        let attached = self.connector(end);
        debug_assert!(
            attached.is_none(),
            "cannot set the {end} hotspot: connector `{}` is attached there",
            attached.as_ref().map(Connector::name).unwrap_or_default()
        );
        if let Some(connector) = attached {
            tracing::warn!(%end, connector = %connector.name(), "ignoring hotspot of attached end");
            return;
        }
        self.sync_hotspot(end, hotspot);
    }

    /// Store `hotspot` in the cache of `end` and notify.
    fn sync_hotspot(&self, end: End, hotspot: Point) {
        self.0.hotspot_cell(end).set(hotspot);
        self.0.property_changed.emit(&end.hotspot_property());
    }

    pub fn state(&self) -> ConnectionState {
        match (
            self.0.source.borrow().is_some(),
            self.0.dest.borrow().is_some(),
        ) {
            (true, true) => ConnectionState::Attached,
            (false, false) => ConnectionState::Unattached,
            _ => ConnectionState::HalfAttached,
        }
    }

    /// Which end `connector` is attached at, if any.
    pub fn end_of(&self, connector: &Connector) -> Option<End> {
        [End::Source, End::Dest]
            .into_iter()
            .find(|&end| self.connector(end).as_ref() == Some(connector))
    }

    /// The connector at the opposite end from `connector`.
    pub fn other_end(&self, connector: &Connector) -> Option<Connector> {
        self.end_of(connector)
            .and_then(|end| self.connector(end.opposite()))
    }

    pub fn source_node(&self) -> Option<Node> {
        self.source_connector()?.parent_node()
    }

    pub fn dest_node(&self) -> Option<Node> {
        self.dest_connector()?.parent_node()
    }

    pub fn property_changed(&self) -> &Event<ConnectionProperty> {
        &self.0.property_changed
    }

    pub fn ptr_eq(&self, other: &Connection) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Connection {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Connection {}

impl Hash for Connection {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Rc::as_ptr(&self.0).hash(state);
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("source", &self.source_connector().map(|c| c.name()))
            .field("dest", &self.dest_connector().map(|c| c.name()))
            .field("source_hotspot", &self.source_hotspot())
            .field("dest_hotspot", &self.dest_hotspot())
            .finish()
    }
}
