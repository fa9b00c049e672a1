//! Error types and handling for form-tree and show-item operations

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for tcaform operations
#[derive(Debug, Error)]
pub enum TcaError {
    /// A `--xxx--` item whose token is not `div`, `palette` or `linebreak`
    #[error("Unknown special item '--{token}--' in show-item entry '{item}'")]
    UnknownSpecialItem { token: String, item: String },

    /// A known special item used where the grammar does not allow it
    #[error("Special item '{item}' is not allowed inside {context}")]
    MisplacedSpecialItem { item: String, context: String },

    /// Two distinct nodes requested under one id
    #[error("Id collision: '{id}' is already used by a {existing} node, cannot create a {requested}")]
    IdCollision {
        id: String,
        existing: String,
        requested: String,
    },

    #[error("Node not found: '{id}'")]
    NodeNotFound { id: String },

    /// Position string that does not follow the position grammar
    #[error("Invalid position '{position}': {reason}")]
    InvalidPosition { position: String, reason: String },

    /// Node kind cannot live inside the requested container
    #[error("A {child} node cannot be placed {location}")]
    InvalidNesting { child: String, location: String },

    /// Input dictionary does not have the expected table shape
    #[error("Invalid table document '{table}': {message}")]
    InvalidDocument { table: String, message: String },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Grammar,
    Structure,
    Position,
    Document,
    Config,
    Io,
    Internal,
}

impl TcaError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            TcaError::UnknownSpecialItem { .. } => ErrorKind::Grammar,
            TcaError::MisplacedSpecialItem { .. } => ErrorKind::Grammar,
            TcaError::IdCollision { .. } => ErrorKind::Structure,
            TcaError::InvalidNesting { .. } => ErrorKind::Structure,
            TcaError::NodeNotFound { .. } => ErrorKind::Position,
            TcaError::InvalidPosition { .. } => ErrorKind::Position,
            TcaError::InvalidDocument { .. } => ErrorKind::Document,
            TcaError::Json(_) => ErrorKind::Document,
            TcaError::ConfigError { .. } => ErrorKind::Config,
            TcaError::IoError { .. } => ErrorKind::Io,
            TcaError::InternalError { .. } => ErrorKind::Internal,
        }
    }

    /// Check if this error is recoverable (the caller may continue with other nodes or tables)
    ///
    /// Grammar errors abort the whole table and id collisions are caller bugs,
    /// so neither is recoverable.
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Position | ErrorKind::Document)
    }

    /// Create an unknown special item error
    pub fn unknown_special_item(token: impl Into<String>, item: impl Into<String>) -> Self {
        Self::UnknownSpecialItem {
            token: token.into(),
            item: item.into(),
        }
    }

    /// Create a misplaced special item error
    pub fn misplaced_special_item(item: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MisplacedSpecialItem {
            item: item.into(),
            context: context.into(),
        }
    }

    /// Create a node-not-found error
    pub fn node_not_found(id: impl Into<String>) -> Self {
        Self::NodeNotFound { id: id.into() }
    }

    /// Create an invalid position error
    pub fn invalid_position(position: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPosition {
            position: position.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid document error
    pub fn invalid_document(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Create an internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for TcaError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::new(),
            source: err,
        }
    }
}
