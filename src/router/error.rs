//! Routing error taxonomy.

use thiserror::Error;

use crate::events::decode::DecodeError;
use crate::tenant::context::TenantNotBound;

/// Errors that may escape `route()`.
///
/// Delivery failures never appear here; they are recorded as outcomes on
/// the affected records. Claim conflicts stay inside the store layer: the
/// losing worker aborts without side effects.
#[derive(Debug, Error)]
pub enum RouteError {
    /// Malformed payload. The message is dropped, never retried.
    #[error("failed to decode bus payload: {0}")]
    Deserialization(#[from] DecodeError),

    /// Tenant metadata missing. Retryable via bus redelivery, since the
    /// cause may be transient metadata loss.
    #[error(transparent)]
    TenantNotBound(#[from] TenantNotBound),
}

impl RouteError {
    /// Whether bus redelivery may succeed where this attempt failed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, RouteError::Deserialization(_))
    }
}
