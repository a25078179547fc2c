use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
///
/// These only surface during start-up and terminal handling; explorer and
/// store failures are reported through [`ExplorerError`] and [`StoreError`].
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from the terminal or the local filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Invalid path provided by the user.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Configuration that cannot be turned into a running session.
    #[error("Config error: {0}")]
    Config(String),

    /// HTTP client construction errors.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Failures reported by a remote file store.
///
/// `Clone` + `PartialEq` so a failure can be kept on the directory it
/// belongs to and compared in tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The path no longer exists on the store.
    #[error("not found: {0}")]
    NotFound(String),

    /// The session token is missing, expired or invalid.
    #[error("unauthorized")]
    Unauthorized,

    /// A create call hit an existing entry.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Network or server hiccup; a fresh user action may succeed.
    #[error("temporarily unavailable: {0}")]
    Transient(String),

    /// Concurrent edit detected. Not produced by the stores in this crate yet.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The store refused the request for another reason.
    #[error("rejected: {0}")]
    Rejected(String),
}

/// Client-side validation failures, caught before any store call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("invalid name: {0}")]
    InvalidName(String),

    #[error("'{0}' already exists here")]
    DuplicateName(String),

    #[error("not a directory: {0}")]
    NotADirectory(String),

    #[error("unknown path: {0}")]
    UnknownPath(String),

    #[error("the project root cannot be deleted")]
    RootNotDeletable,
}

/// Errors returned synchronously by explorer operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExplorerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
