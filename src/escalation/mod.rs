//! Escalation subsystem.
//!
//! # Data Flow
//! ```text
//! EscalationEvent (from decode)
//!     → expander.rs (tier cutoff, dedup, ordering)
//!     → Vec<DeliveryTarget> (officer first, operators in input order)
//!     → router fan-out
//! ```

pub mod expander;

pub use expander::expand;
