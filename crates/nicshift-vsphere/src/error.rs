//! Error types for the vSphere migration crate.

use std::fmt;

/// Categorised error kinds.
#[derive(Debug, Clone)]
pub enum VsphereErrorKind {
    /// vCenter unreachable, request failed mid-flight, or session dropped
    ConnectionError,
    /// Authentication failed (401)
    AuthenticationError,
    /// Named VM / network missing from inventory, or 404 from the API
    NotFound,
    /// A submitted task reached its Error terminal state on vCenter
    TaskFault,
    /// HTTP / API error with status code
    ApiError(u16),
    /// Timeout
    Timeout,
    /// JSON parse / deserialization error
    ParseError,
    /// Generic
    Other,
}

/// Crate error type carrying a kind + human-readable message.
#[derive(Debug, Clone)]
pub struct VsphereError {
    pub kind: VsphereErrorKind,
    pub message: String,
}

impl VsphereError {
    pub fn new(kind: VsphereErrorKind, msg: impl Into<String>) -> Self {
        Self { kind, message: msg.into() }
    }

    pub fn connection(msg: impl Into<String>) -> Self {
        Self::new(VsphereErrorKind::ConnectionError, msg)
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        Self::new(VsphereErrorKind::AuthenticationError, msg)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(VsphereErrorKind::NotFound, msg)
    }

    pub fn task_fault(msg: impl Into<String>) -> Self {
        Self::new(VsphereErrorKind::TaskFault, msg)
    }

    pub fn api(status: u16, msg: impl Into<String>) -> Self {
        Self::new(VsphereErrorKind::ApiError(status), msg)
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::new(VsphereErrorKind::ParseError, msg)
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::new(VsphereErrorKind::Timeout, msg)
    }

    /// Whether this error is fatal to a whole batch run (transport-level)
    /// rather than isolated to the row that triggered it.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.kind,
            VsphereErrorKind::ConnectionError
                | VsphereErrorKind::AuthenticationError
                | VsphereErrorKind::Timeout
        )
    }
}

impl fmt::Display for VsphereError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)
    }
}

impl std::error::Error for VsphereError {}

impl From<VsphereError> for String {
    fn from(e: VsphereError) -> String {
        e.to_string()
    }
}

impl From<reqwest::Error> for VsphereError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::timeout(format!("HTTP timeout: {e}"))
        } else if e.is_connect() {
            Self::connection(format!("Connection failed: {e}"))
        } else {
            Self::connection(format!("HTTP error: {e}"))
        }
    }
}

impl From<serde_json::Error> for VsphereError {
    fn from(e: serde_json::Error) -> Self {
        Self::parse(format!("JSON parse error: {e}"))
    }
}

/// Convenience alias.
pub type VsphereResult<T> = Result<T, VsphereError>;
