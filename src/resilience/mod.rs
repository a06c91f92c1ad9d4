//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatch attempt:
//!     → per-attempt timeout (treated as TransientFailure on expiry)
//!     → on TransientFailure: backoff.rs (jittered delay), then retry
//!     → after max_attempts: record goes FAILED, no further retry
//! ```
//!
//! # Design Decisions
//! - Every transport call has a deadline
//! - Jittered backoff prevents thundering herd
//! - Retry budget is per record; exhaustion is terminal

pub mod backoff;

pub use backoff::{calculate_backoff, RetryPolicy};
