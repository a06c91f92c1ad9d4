//! Tenant isolation subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound message
//!     → router binds TenantContext (event body or transport header)
//!     → tenant-scoped operations call require() before touching data
//!     → router clears the context on every exit path
//!
//! Template rendering (upstream):
//!     → language.rs (locale lookup, preference order preserved)
//! ```
//!
//! # Design Decisions
//! - Context is a per-unit-of-work value, not ambient global state
//! - Dependent operations fail fast with TenantNotBound when unbound
//! - Language catalog is read-only after startup

pub mod context;
pub mod language;

pub use context::{TenantContext, TenantId, TenantNotBound};
pub use language::{LanguageCatalog, TenantLanguageConfig};
