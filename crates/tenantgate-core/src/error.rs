//! Shared error type across tenantgate crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed config.
    BadRequest,
    /// Subject does not authenticate as the requested tenant.
    AuthFailed,
    /// Not allowed by policy or tenant status.
    NotAllowed,
    /// Unknown tenant.
    NotFound,
    /// A plan quota is exhausted.
    QuotaExceeded,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::AuthFailed => "AUTH_FAILED",
            ClientCode::NotAllowed => "NOT_ALLOWED",
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::QuotaExceeded => "QUOTA_EXCEEDED",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, TenantGateError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum TenantGateError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("auth failed")]
    AuthFailed,
    #[error("not allowed: {0}")]
    NotAllowed(String),
    #[error("tenant not found: {0}")]
    NotFound(String),
    #[error("quota exceeded: {kind} limit {limit}")]
    QuotaExceeded { kind: &'static str, limit: u32 },
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl TenantGateError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            TenantGateError::BadRequest(_) => ClientCode::BadRequest,
            TenantGateError::AuthFailed => ClientCode::AuthFailed,
            TenantGateError::NotAllowed(_) => ClientCode::NotAllowed,
            TenantGateError::NotFound(_) => ClientCode::NotFound,
            TenantGateError::QuotaExceeded { .. } => ClientCode::QuotaExceeded,
            TenantGateError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            TenantGateError::Internal(_) => ClientCode::Internal,
        }
    }
}
