use thiserror::Error;

/// Structural violations found by [`Port::validate`](crate::core::Port::validate).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("ID is required")]
    EmptyId,

    #[error("name is required")]
    EmptyName,
}

/// Every failure the ports services report.
#[derive(Error, Debug)]
pub enum PortsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Malformed input at line {line} column {column}: {message}")]
    MalformedInput {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("nil port given")]
    MissingPort,

    #[error("validate port: {0}")]
    Validation(#[from] ValidationError),

    #[error("Internal consistency error: {0}")]
    InternalConsistency(String),

    #[error("store port with ID {id} in ports service: {source}")]
    StorePort {
        id: String,
        #[source]
        source: Box<PortsError>,
    },

    #[error("{operation} call failed: {status}")]
    Rpc {
        operation: &'static str,
        #[source]
        status: tonic::Status,
    },

    #[error("Server error: {0}")]
    Server(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Async task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Result type alias for ports operations
pub type Result<T> = std::result::Result<T, PortsError>;

impl PortsError {
    /// Creates a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a new connection error
    pub fn connection<S: Into<String>>(msg: S) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a new server error
    pub fn server<S: Into<String>>(msg: S) -> Self {
        Self::Server(msg.into())
    }

    /// Creates a new internal consistency error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::InternalConsistency(msg.into())
    }

    /// Wraps a decoder error, keeping its position in the input.
    pub fn malformed(err: &serde_json::Error) -> Self {
        Self::MalformedInput {
            message: err.to_string(),
            line: err.line(),
            column: err.column(),
        }
    }

    /// Wraps a failed RPC with the operation that issued it.
    pub fn rpc(operation: &'static str, status: tonic::Status) -> Self {
        Self::Rpc { operation, status }
    }

    /// Wraps a store failure with the ID of the record being stored.
    pub fn store_port<S: Into<String>>(id: S, source: PortsError) -> Self {
        Self::StorePort {
            id: id.into(),
            source: Box::new(source),
        }
    }

    /// Returns the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Connection(_) => "connection",
            Self::MalformedInput { .. } => "malformed_input",
            Self::MissingPort | Self::Validation(_) => "validation",
            Self::InternalConsistency(_) => "internal",
            Self::StorePort { source, .. } => source.category(),
            Self::Rpc { .. } => "rpc",
            Self::Server(_) => "server",
            Self::Io(_) => "io",
            Self::Join(_) => "async",
        }
    }
}

impl From<PortsError> for tonic::Status {
    fn from(err: PortsError) -> Self {
        match err {
            PortsError::MissingPort | PortsError::Validation(_) => {
                tonic::Status::invalid_argument(err.to_string())
            },
            PortsError::Rpc { status, .. } => status,
            other => tonic::Status::internal(other.to_string()),
        }
    }
}
