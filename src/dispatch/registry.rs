//! Channel dispatcher registry.
//!
//! # Responsibilities
//! - Hold one dispatcher per channel tag
//! - Look up the dispatcher for a target's channel
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Lookup table keyed by channel tag; no inheritance hierarchies
//! - No fallback channel substitution: a missing dispatcher is an
//!   explicit permanent condition for the caller to record

use std::collections::HashMap;
use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::dispatch::outcome::{Channel, DeliveryTarget, DispatchOutcome, MalformedTarget};

/// Capability of one delivery channel: send a message, report an outcome.
pub trait ChannelDispatcher: Send + Sync {
    /// The channel tag this dispatcher handles.
    fn channel(&self) -> Channel;

    /// Attempt one delivery.
    ///
    /// Ordinary failures come back as `DispatchOutcome`; only a malformed
    /// target is an error.
    fn send<'a>(
        &'a self,
        target: &'a DeliveryTarget,
    ) -> BoxFuture<'a, Result<DispatchOutcome, MalformedTarget>>;
}

/// Lookup table of dispatchers keyed by channel.
#[derive(Clone, Default)]
pub struct DispatcherRegistry {
    dispatchers: HashMap<Channel, Arc<dyn ChannelDispatcher>>,
}

impl DispatcherRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dispatcher under its channel tag, replacing any previous
    /// registration for that channel.
    pub fn register(mut self, dispatcher: Arc<dyn ChannelDispatcher>) -> Self {
        self.dispatchers.insert(dispatcher.channel(), dispatcher);
        self
    }

    /// The dispatcher for a channel, if one is registered.
    pub fn get(&self, channel: Channel) -> Option<Arc<dyn ChannelDispatcher>> {
        self.dispatchers.get(&channel).cloned()
    }

    /// Registered channel tags, for startup logging.
    pub fn channels(&self) -> Vec<Channel> {
        self.dispatchers.keys().copied().collect()
    }
}
