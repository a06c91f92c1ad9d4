//! Event routing subsystem.
//!
//! # Data Flow
//! ```text
//! BusMessage
//!     → router.rs route(): decode → classify
//!     → bind TenantContext (event body or transport header)
//!     → EscalationExpander | direct nudge target
//!     → per target: PENDING record → dispatcher (retry/timeout) → SENT|FAILED
//!     → clear TenantContext (every path)
//! ```
//!
//! # Design Decisions
//! - Unknown event types are skipped outcomes, not errors
//! - Routing success and delivery success are distinct results
//! - Fan-out targets are independent; no ordering between them

pub mod error;
#[allow(clippy::module_inception)]
pub mod router;

pub use error::RouteError;
pub use router::{EventRouter, RouteOutcome, SkipReason};
