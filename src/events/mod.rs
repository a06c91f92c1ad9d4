//! Domain events subsystem.
//!
//! # Data Flow
//! ```text
//! Raw bus payload (JSON)
//!     → decode.rs (discriminator inspection, typed deserialization)
//!     → Event::{Escalation, Nudge, Unknown}
//!     → router (exhaustive match)
//! ```
//!
//! # Design Decisions
//! - Tagged sum type forces exhaustive handling at compile time
//! - Unknown event types are data, not errors (forward compatibility)

pub mod decode;
pub mod types;

pub use decode::{decode_event, DecodeError};
pub use types::{EscalationEvent, Event, NudgeEvent, OperatorEscalationDetail};
