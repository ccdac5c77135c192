use thiserror::Error;

/// Errors surfaced by table editing and the remote operations around it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// A precondition for a request failed locally. No request was sent.
    #[error("{0}")]
    Validation(String),

    /// The backend rejected a request. The message is shown to the user.
    #[error("{0}")]
    Remote(String),

    /// Cell edit outside the visible window.
    #[error("cell ({row}, {col}) is outside the {rows}x{cols} table")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// A save was requested while another one is still pending.
    #[error("a save is already in progress")]
    Busy,
}

impl TableError {
    pub fn validation(msg: impl Into<String>) -> Self {
        TableError::Validation(msg.into())
    }

    pub fn remote(msg: impl Into<String>) -> Self {
        TableError::Remote(msg.into())
    }
}
