//! Bus message envelope.

use std::collections::HashMap;

/// Transport header carrying the tenant for events that lack a tenant
/// field in their body (escalations). Attached by the producing gateway.
pub const TENANT_HEADER: &str = "x-tenant-id";

/// Transport header counting redeliveries of this message.
pub const REDELIVERY_HEADER: &str = "x-redelivery-count";

/// One opaque message from the bus: a payload plus transport metadata.
///
/// The bus guarantees at-least-once delivery, so the same `id` may be
/// observed more than once.
#[derive(Debug, Clone)]
pub struct BusMessage {
    /// Message identifier, stable across redeliveries.
    pub id: String,
    /// Transport metadata (headers).
    pub headers: HashMap<String, String>,
    /// Raw event payload (JSON).
    pub payload: Vec<u8>,
}

impl BusMessage {
    pub fn new(id: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            headers: HashMap::new(),
            payload: payload.into(),
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_string(), value.into());
        self
    }

    /// Tenant id from transport metadata, if present and well-formed.
    pub fn tenant_header(&self) -> Option<u32> {
        self.headers.get(TENANT_HEADER)?.trim().parse().ok()
    }

    /// How many times the bus has redelivered this message.
    pub fn redelivery_count(&self) -> u32 {
        self.headers
            .get(REDELIVERY_HEADER)
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    /// The same message stamped with an incremented redelivery count.
    pub fn redelivered(mut self) -> Self {
        let next = self.redelivery_count() + 1;
        self.headers
            .insert(REDELIVERY_HEADER.to_string(), next.to_string());
        self
    }
}
