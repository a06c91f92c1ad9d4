//! Message bus adapter subsystem.
//!
//! # Data Flow
//! ```text
//! External bus (at-least-once, duplicates possible)
//!     → message.rs (envelope: id, headers, payload)
//!     → consumer.rs (worker loop, one unit of work per message)
//!     → router
//!
//! Retryable routing errors:
//!     → consumer republishes with a redelivery-count header (bounded)
//! ```
//!
//! # Design Decisions
//! - The adapter contract is deliberately narrow: consume and publish
//! - Tenant metadata for escalations travels as a transport header
//! - Redelivery stands in for the external bus's retry/DLT policy

pub mod consumer;
pub mod message;

pub use consumer::{channel, BusProducer, ConsumerLoop};
pub use message::{BusMessage, REDELIVERY_HEADER, TENANT_HEADER};
