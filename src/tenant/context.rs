//! Per-unit-of-work tenant binding.
//!
//! # Responsibilities
//! - Hold the active tenant for exactly one unit of work
//! - Fail fast when a tenant-scoped operation runs unbound
//!
//! # Design Decisions
//! - Explicit value threaded through calls, never thread-local state;
//!   isolation between concurrent units of work is by construction
//! - `require()` returns an error rather than defaulting to a partition

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tenant identifier (partition key) for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(pub u32);

impl From<u32> for TenantId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raised when a tenant-scoped operation runs with no tenant bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no tenant bound for the current unit of work")]
pub struct TenantNotBound;

/// The active tenant binding for one unit of work.
///
/// Created fresh per inbound message. Callers that `bind()` must guarantee
/// `clear()` runs on every exit path of the unit of work.
#[derive(Debug, Default)]
pub struct TenantContext {
    current: Option<TenantId>,
}

impl TenantContext {
    /// Create an unbound context.
    pub fn new() -> Self {
        Self { current: None }
    }

    /// Bind the active tenant.
    pub fn bind(&mut self, tenant: TenantId) {
        self.current = Some(tenant);
    }

    /// The bound tenant, if any.
    pub fn current(&self) -> Option<TenantId> {
        self.current
    }

    /// The bound tenant, or `TenantNotBound` when unset.
    pub fn require(&self) -> Result<TenantId, TenantNotBound> {
        self.current.ok_or(TenantNotBound)
    }

    /// Unbind the active tenant.
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Whether a tenant is currently bound.
    pub fn is_bound(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_and_clear() {
        let mut ctx = TenantContext::new();
        assert!(!ctx.is_bound());
        assert_eq!(ctx.require(), Err(TenantNotBound));

        ctx.bind(TenantId(7));
        assert_eq!(ctx.current(), Some(TenantId(7)));
        assert_eq!(ctx.require(), Ok(TenantId(7)));

        ctx.clear();
        assert!(!ctx.is_bound());
        assert_eq!(ctx.require(), Err(TenantNotBound));
    }

    #[test]
    fn test_rebind_replaces() {
        let mut ctx = TenantContext::new();
        ctx.bind(TenantId(1));
        ctx.bind(TenantId(2));
        assert_eq!(ctx.current(), Some(TenantId(2)));
    }
}
