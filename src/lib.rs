//! # Slint Node Network
//!
//! An observable node/connector/connection model for building interactive
//! node-network editors with Slint: data flow diagrams, shader graphs, state
//! machines and any other diagram made of boxes and wires.
//!
//! The model keeps itself consistent. Connectors know which node they belong
//! to and which connection they are attached to; connections cache the
//! hotspot of each end and follow it when a node moves; removing a
//! connection from a [`Network`] detaches it. A UI layer only observes the
//! model and forwards gestures.
//!
//! ## Quick Start
//!
//! ```
//! use slint_node_network::{Connector, Network, Node, Point};
//!
//! let network = Network::new();
//!
//! let a = Node::with_position("A", Point::new(0.0, 0.0));
//! let out = Connector::output("out").with_offset(Point::new(120.0, 40.0));
//! a.connectors().push(out.clone());
//!
//! let b = Node::with_position("B", Point::new(300.0, 0.0));
//! let input = Connector::input("in").with_offset(Point::new(0.0, 40.0));
//! b.connectors().push(input.clone());
//!
//! network.nodes().extend([a.clone(), b]);
//! let wire = network.connect(&out, &input);
//!
//! a.set_x(50.0);
//! assert_eq!(wire.source_hotspot(), Point::new(170.0, 40.0));
//!
//! network.connections().remove(&wire);
//! assert!(!out.is_attached());
//! ```
//!
//! ## Core Types
//!
//! - [`ObservableCollection`] - Ordered collection with batched add/remove events
//! - [`Node`] - Positioned, selectable owner of connectors
//! - [`Connector`] - Attachment point with a hotspot that follows its node
//! - [`Connection`] - Wire between two connectors, possibly half attached
//! - [`Network`] - All nodes and connections of a diagram
//!
//! ## Editing
//!
//! - [`NetworkEditor`] - Node creation and deletion, wire dragging, selection
//! - [`ConnectionValidator`] - Rules for which connectors may be wired
//! - `layout::arrange` - Sugiyama layout (requires the `layout` feature)
//!
//! Every collection is a [`slint::Model`], so it can be bound to a `for`
//! repeater directly through [`ObservableCollection::model`].

pub mod collection;
pub mod connection;
pub mod connector;
pub mod editor;
pub mod error;
pub mod event;
pub mod network;
pub mod node;
pub mod point;
pub mod validate;

#[cfg(feature = "layout")]
pub mod layout;

pub use collection::ObservableCollection;
pub use connection::{Connection, ConnectionProperty, ConnectionState, End};
pub use connector::{Connector, ConnectorProperty, ConnectorType};
pub use editor::{EditorSettings, NetworkEditor};
pub use error::{EditorError, InvariantViolation};
pub use event::{Event, SubscriptionId};
pub use network::Network;
pub use node::{Node, NodeProperty};
pub use point::Point;
pub use validate::{
    BasicConnectionValidator, CompositeValidator, ConnectionValidator, NoDuplicatesValidator,
    ValidationError,
};
