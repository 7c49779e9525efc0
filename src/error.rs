//! Error types for the table, the graph and the command layer.
//!
//! "Not found" is never an error anywhere in the crate; lookups return
//! `Option`.

use crate::graph::NodeKind;
use thiserror::Error;

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum TableError {
    #[error("initial capacity must be positive")]
    InvalidCapacity,
    #[error("key cannot be empty")]
    EmptyKey,
    #[error("table is full, cannot insert key: {key} (capacity {capacity})")]
    TableFull { key: String, capacity: usize },
}

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum GraphError {
    #[error("name cannot be empty")]
    EmptyName,
    #[error("cannot create self-edge")]
    SelfEdge,
    #[error("node is not part of this graph")]
    UnknownNode,
}

/// Failures of a single command line. `Display` is the message shown to
/// the user.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    #[error("Error: Input cannot be null or empty")]
    EmptyInsert,
    #[error("Error: Invalid insert format. Use: Artist<SEP>Song")]
    InvalidInsertFormat,
    #[error("Error: {0} name cannot be empty")]
    EmptyName(NodeKind),
    #[error("Invalid remove format")]
    InvalidRemoveFormat,
    #[error("Invalid remove type: {0}")]
    InvalidRemoveType(String),
    #[error("Invalid print option: {0}")]
    InvalidPrintOption(String),
    #[error("Error processing insert: {0}")]
    Table(#[from] TableError),
    #[error("Error processing insert: {0}")]
    Graph(#[from] GraphError),
}
