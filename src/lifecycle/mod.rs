//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Load config → Validate → Build store/dispatchers/router → Start consumer
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop consuming → Drain in-flight routing → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful drain
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then core, then the consumer
//! - Drain, don't cancel: in-flight sends finish or hit their timeout

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
