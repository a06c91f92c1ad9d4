//! Notification persistence subsystem.
//!
//! # Data Flow
//! ```text
//! Router creates PENDING record (tenant required)
//!     → claim (exclusive per-record lock)
//!     → dispatch attempt(s)
//!     → complete(outcome) → SENT | FAILED (terminal)
//! ```
//!
//! # Design Decisions
//! - The store is the only shared mutable resource in the core
//! - Forward-only status machine; terminal states are immutable
//! - Message-id bookkeeping makes duplicate bus deliveries no-ops

pub mod record;
#[allow(clippy::module_inception)]
pub mod store;

pub use record::{NotificationRecord, NotificationStatus};
pub use store::{NotificationStore, RecordClaim, StoreError};
