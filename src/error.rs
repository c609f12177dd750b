//! Error taxonomy for mapping, validation, persistence and transfer operations.
//!
//! Every public operation returns one of these typed errors instead of aborting.
//! [`TransferError`] is the umbrella type returned by [`Session`](crate::state::Session)
//! methods; the component errors convert into it with `?`.

use crate::models::{BoneId, Side};
use camino::Utf8PathBuf;
use thiserror::Error;

/// The mapping does not fit the skeletons or action it is checked against
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Mapping has no resolved {0} bones")]
    NoMappedBones(Side),

    #[error("{side} bone '{bone}' does not exist in skeleton '{skeleton}'")]
    MissingBone {
        side: Side,
        bone: String,
        skeleton: String,
    },

    #[error("Action '{action}' animates bone '{bone}' which is not a source in the mapping")]
    UnmappedActionBone { action: String, bone: String },

    #[error("Mapping is incomplete: {unresolved} of {total} entries have no target")]
    Incomplete { unresolved: usize, total: usize },
}

/// Input data is not in the shape the core expects
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    #[error("Data path {path:?} splits into {parts} parts on '\"', expected 3")]
    MalformedDataPath { path: String, parts: usize },

    #[error("Duplicate source bone name '{0}'")]
    DuplicateSource(String),

    #[error("Mapping entry source must not be empty")]
    EmptySource,

    #[error("No mapping entry with source '{0}'")]
    UnknownSource(String),

    #[error("Bone '{bone}' references unknown parent '{parent}'")]
    UnknownParent { bone: String, parent: String },

    #[error("Bone '{bone}' references parent {parent}, which is not in the skeleton")]
    UnknownParentId { bone: String, parent: BoneId },
}

/// Reading or writing a mapping document failed
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Mapping file not found or unreadable: {path}")]
    NotFound {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Mapping document {origin} is malformed: {message}")]
    Malformed { origin: String, message: String },

    #[error("Failed to serialize mapping document: {0}")]
    Serialize(String),

    #[error("Failed to write mapping file: {path}")]
    Write {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// An operation was invoked with inputs it cannot act on
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("Expected one or two skeletons, got {0}")]
    InvalidSelection(usize),

    #[error("No action selected")]
    NoActionSelected,
}

/// Any failure surfaced by a session operation
#[derive(Error, Debug)]
pub enum TransferError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Structural(#[from] StructuralError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    State(#[from] StateError),
}
