//! Delivery channel subsystem.
//!
//! # Data Flow
//! ```text
//! DeliveryTarget (from expander / nudge handling)
//!     → registry.rs (dispatcher lookup by channel tag)
//!     → webhook.rs | email.rs | whatsapp.rs (transport call)
//!     → DispatchOutcome {Delivered, TransientFailure, PermanentFailure}
//! ```
//!
//! # Design Decisions
//! - One dispatcher per channel, behind a single capability trait
//! - Delivery failures are outcome values; dispatchers never panic or
//!   return errors for them
//! - Channel selection is purely tag-driven; no fallback substitution

pub mod email;
pub mod outcome;
pub mod registry;
pub mod webhook;
pub mod whatsapp;

pub use email::EmailDispatcher;
pub use outcome::{Channel, DeliveryTarget, DispatchOutcome, MalformedTarget};
pub use registry::{ChannelDispatcher, DispatcherRegistry};
pub use webhook::WebhookDispatcher;
pub use whatsapp::WhatsAppDispatcher;
