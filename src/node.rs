use crate::collection::ObservableCollection;
use crate::connection::Connection;
use crate::connector::Connector;
use crate::event::Event;
use crate::point::Point;
use std::cell::{Cell, OnceCell, RefCell};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

/// Field reported by [`Node::property_changed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeProperty {
    Name,
    X,
    Y,
    IsSelected,
}

pub(crate) struct NodeInner {
    name: RefCell<String>,
    x: Cell<f64>,
    y: Cell<f64>,
    is_selected: Cell<bool>,
    connectors: OnceCell<ObservableCollection<Connector>>,
    property_changed: Event<NodeProperty>,
    self_weak: Weak<NodeInner>,
}

/// A node in the diagram: a name, a position, a selection flag and the
/// connectors wires attach to.
///
/// `Node` is a shared handle with identity equality. It owns its connectors
/// through [`connectors`](Self::connectors); adding a connector there makes
/// this node its parent and anchors its hotspot, removing it clears the
/// parent again. Moving the node re-anchors every connector, which in turn
/// updates every attached connection.
///
/// All setters are guarded: assigning the current value emits nothing.
#[derive(Clone)]
pub struct Node(pub(crate) Rc<NodeInner>);

impl Default for Node {
    fn default() -> Self {
        Self::new("")
    }
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_position(name, Point::ORIGIN)
    }

    pub fn with_position(name: impl Into<String>, position: Point) -> Self {
        let name = name.into();
        Node(Rc::new_cyclic(|weak| NodeInner {
            name: RefCell::new(name),
            x: Cell::new(position.x),
            y: Cell::new(position.y),
            is_selected: Cell::new(false),
            connectors: OnceCell::new(),
            property_changed: Event::new(),
            self_weak: weak.clone(),
        }))
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
        self.0.property_changed.emit(&NodeProperty::Name);
    }

    pub fn x(&self) -> f64 {
        self.0.x.get()
    }

    pub fn set_x(&self, x: f64) {
        if self.0.x.get() == x {
            return;
        }
        self.0.x.set(x);
        self.reanchor_connectors();
        self.0.property_changed.emit(&NodeProperty::X);
    }

    pub fn y(&self) -> f64 {
        self.0.y.get()
    }

    pub fn set_y(&self, y: f64) {
        if self.0.y.get() == y {
            return;
        }
        self.0.y.set(y);
        self.reanchor_connectors();
        self.0.property_changed.emit(&NodeProperty::Y);
    }

    pub fn position(&self) -> Point {
        Point::new(self.x(), self.y())
    }

    /// Set both coordinates; emits one event per coordinate that changed.
    pub fn set_position(&self, position: Point) {
        self.set_x(position.x);
        self.set_y(position.y);
    }

    pub fn move_by(&self, dx: f64, dy: f64) {
        self.set_position(self.position().offset(dx, dy));
    }

    pub fn is_selected(&self) -> bool {
        self.0.is_selected.get()
    }

    pub fn set_selected(&self, selected: bool) {
        if self.0.is_selected.get() == selected {
            return;
        }
        self.0.is_selected.set(selected);
        self.0.property_changed.emit(&NodeProperty::IsSelected);
    }

    /// The node's connectors, created on first access.
    pub fn connectors(&self) -> &ObservableCollection<Connector> {
        self.0.connectors.get_or_init(|| {
            let connectors = ObservableCollection::new();
            connectors.items_added().subscribe({
                let weak = self.0.self_weak.clone();
                move |added: &[Connector]| {
                    if let Some(inner) = weak.upgrade() {
                        Node(inner).adopt_connectors(added);
                    }
                }
            });
            connectors.items_removed().subscribe({
                let weak = self.0.self_weak.clone();
                move |removed: &[Connector]| {
                    if let Some(inner) = weak.upgrade() {
                        Node(inner).release_connectors(removed);
                    }
                }
            });
            connectors
        })
    }

    /// First connector called `name`.
    pub fn find_connector(&self, name: &str) -> Option<Connector> {
        self.connectors().iter().find(|c| c.name() == name)
    }

    /// Every connection attached to one of this node's connectors, each
    /// listed once. Computed on every call.
    pub fn attached_connections(&self) -> Vec<Connection> {
        let mut attached: Vec<Connection> = Vec::new();
        for connector in self.connectors().iter() {
            if let Some(connection) = connector.attached_connection() {
                if !attached.contains(&connection) {
                    attached.push(connection);
                }
            }
        }
        attached
    }

    pub fn property_changed(&self) -> &Event<NodeProperty> {
        &self.0.property_changed
    }

    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn adopt_connectors(&self, added: &[Connector]) {
        for connector in added {
            let previous = connector.parent_node().filter(|owner| owner != self);
            debug_assert!(
                previous.is_none(),
                "connector `{}` already belongs to node `{}`",
                connector.name(),
                previous.as_ref().map(Node::name).unwrap_or_default()
            );
            if let Some(previous) = previous {
                tracing::warn!(
                    connector = %connector.name(),
                    previous = %previous.name(),
                    node = %self.name(),
                    "connector added to a second node"
                );
            }
            connector.set_parent_node(Some(self));
        }
    }

    fn release_connectors(&self, removed: &[Connector]) {
        for connector in removed {
            if connector.parent_node().as_ref() == Some(self) {
                connector.set_parent_node(None);
            }
        }
    }

    fn reanchor_connectors(&self) {
        if let Some(connectors) = self.0.connectors.get() {
            for connector in connectors.iter() {
                connector.reanchor();
            }
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Rc::as_ptr(&self.0).hash(state);
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &*self.0.name.borrow())
            .field("x", &self.x())
            .field("y", &self.y())
            .field("selected", &self.is_selected())
            .field("connectors", &self.0.connectors.get().map_or(0, |c| c.len()))
            .finish()
    }
}
