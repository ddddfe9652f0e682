//! Error types shared by every solver.

/// Possible errors
#[derive(Debug, thiserror::Error)]
pub enum VrpError {
    /// Customer or vehicle counts that no solver can work with
    #[error("invalid instance: {0}")]
    InvalidInstance(String),

    /// Solver parameters out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The brute force enumeration was refused by its size guard
    #[error("computation aborted: {customers} customers exceeds the exact solver limit of {limit}")]
    ComputationAborted { customers: usize, limit: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = core::result::Result<T, VrpError>;

impl VrpError {
    pub(crate) fn invalid_instance(msg: impl Into<String>) -> Self {
        VrpError::InvalidInstance(msg.into())
    }
}
