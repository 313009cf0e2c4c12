use thiserror::Error;

/// Main error type for EVSE driver operations
#[derive(Error, Debug)]
pub enum EvseError {
    #[error("Connection error: {0}")]
    Connection(#[from] std::io::Error),

    #[error("Timeout")]
    Timeout,

    #[error("Protocol error: {0}")]
    Protocol(String),

    /// A decoded charge-point status code outside the known table.
    #[error("Invalid status: {0}")]
    InvalidStatus(u16),

    /// Per-read transient condition on an otherwise-capable operation.
    ///
    /// Distinct from capability absence: the capability was probed present,
    /// but this particular read carries no usable value.
    #[error("Not available")]
    NotAvailable,

    /// Construction-time authorization failure.
    #[error("Sponsorship required")]
    SponsorRequired,

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<serde_json::Error> for EvseError {
    fn from(err: serde_json::Error) -> Self {
        EvseError::InvalidData(err.to_string())
    }
}

/// Result type alias for EVSE driver operations
pub type EvseResult<T> = Result<T, EvseError>;
