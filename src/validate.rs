//! Rules deciding whether two connectors may be wired together.
//!
//! The model itself accepts any pair of connectors; these validators are for
//! the gesture layer, which checks a proposed wire before committing it (see
//! [`NetworkEditor::complete_connection_drag`](crate::NetworkEditor::complete_connection_drag)).
//!
//! # Example
//!
//! ```
//! use slint_node_network::{
//!     BasicConnectionValidator, CompositeValidator, ConnectionValidator, Connector,
//!     NoDuplicatesValidator, ValidationError,
//! };
//!
//! let validator = CompositeValidator::new()
//!     .add(BasicConnectionValidator)
//!     .add(NoDuplicatesValidator);
//!
//! let a = Connector::output("a");
//! let b = Connector::output("b");
//! assert_eq!(
//!     validator.validate(&a, &b),
//!     Err(ValidationError::IncompatibleDirection)
//! );
//! ```

use crate::connector::{Connector, ConnectorType};
use thiserror::Error;

/// Why a proposed connection was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("cannot connect a connector to itself")]
    SameConnector,
    #[error("cannot connect connectors on the same node")]
    SameNode,
    #[error("must connect an input to an output")]
    IncompatibleDirection,
    #[error("connectors are already connected to each other")]
    DuplicateConnection,
    #[error("{0}")]
    Custom(String),
}

/// A rule for wiring `from` (the source end) to `to` (the destination end).
///
/// Closures with the matching signature are validators too.
pub trait ConnectionValidator {
    fn validate(&self, from: &Connector, to: &Connector) -> Result<(), ValidationError>;
}

impl<F> ConnectionValidator for F
where
    F: Fn(&Connector, &Connector) -> Result<(), ValidationError>,
{
    fn validate(&self, from: &Connector, to: &Connector) -> Result<(), ValidationError> {
        self(from, to)
    }
}

/// Standard rules:
/// 1. a connector cannot be wired to itself
/// 2. both connectors must be on different nodes
/// 3. an input cannot feed an input, nor an output an output
///
/// [`ConnectorType::Undefined`] is compatible with every type.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicConnectionValidator;

impl ConnectionValidator for BasicConnectionValidator {
    fn validate(&self, from: &Connector, to: &Connector) -> Result<(), ValidationError> {
        if from == to {
            return Err(ValidationError::SameConnector);
        }

        if let (Some(a), Some(b)) = (from.parent_node(), to.parent_node()) {
            if a == b {
                return Err(ValidationError::SameNode);
            }
        }

        match (from.connector_type(), to.connector_type()) {
            (ConnectorType::Input, ConnectorType::Input)
            | (ConnectorType::Output, ConnectorType::Output) => {
                Err(ValidationError::IncompatibleDirection)
            }
            _ => Ok(()),
        }
    }
}

/// Refuses a pair that is already wired together.
///
/// Useful when validating an arbitrary pair, e.g. before
/// [`Network::connect`](crate::Network::connect). A connector holds at most
/// one connection and a drag starts by removing the anchor's wire, so during
/// [`NetworkEditor`](crate::NetworkEditor) drags this never fires; the
/// editor's default validator leaves it out.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDuplicatesValidator;

impl ConnectionValidator for NoDuplicatesValidator {
    fn validate(&self, from: &Connector, to: &Connector) -> Result<(), ValidationError> {
        match (from.attached_connection(), to.attached_connection()) {
            (Some(a), Some(b)) if a == b => Err(ValidationError::DuplicateConnection),
            _ => Ok(()),
        }
    }
}

/// Runs several validators in order; the first refusal wins.
#[derive(Default)]
pub struct CompositeValidator {
    validators: Vec<Box<dyn ConnectionValidator>>,
}

impl CompositeValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<V: ConnectionValidator + 'static>(mut self, validator: V) -> Self {
        self.validators.push(Box::new(validator));
        self
    }
}

impl ConnectionValidator for CompositeValidator {
    fn validate(&self, from: &Connector, to: &Connector) -> Result<(), ValidationError> {
        self.validators
            .iter()
            .try_for_each(|validator| validator.validate(from, to))
    }
}
