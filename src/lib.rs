//! Multi-Tenant Notification Routing Library

pub mod bus;
pub mod config;
pub mod dispatch;
pub mod escalation;
pub mod events;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod router;
pub mod store;
pub mod tenant;

pub use config::schema::RouterConfig;
pub use lifecycle::Shutdown;
pub use router::EventRouter;
