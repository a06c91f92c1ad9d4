//! In-memory notification store with per-record claims.
//!
//! # Responsibilities
//! - Own every record created by the routing pipeline
//! - Enforce at-most-one-writer per record via claims
//! - Track which bus messages were already routed (idempotency)
//!
//! # Design Decisions
//! - Claims are logical locks: a claim must be held to apply an outcome,
//!   and concurrent claimers abort with ClaimConflict instead of waiting
//! - Message ids are remembered so duplicate bus deliveries create no
//!   second set of records

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use thiserror::Error;
use uuid::Uuid;

use crate::dispatch::outcome::{DeliveryTarget, DispatchOutcome};
use crate::store::record::{NotificationRecord, NotificationStatus};
use crate::tenant::context::{TenantContext, TenantNotBound};

/// Store access failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record {0} not found")]
    NotFound(Uuid),

    #[error("record {0} is claimed by another worker")]
    ClaimConflict(Uuid),
}

/// Thread-safe store of notification records.
#[derive(Clone, Default)]
pub struct NotificationStore {
    records: Arc<DashMap<Uuid, NotificationRecord>>,
    claims: Arc<DashMap<Uuid, ()>>,
    routed_messages: Arc<DashMap<String, Vec<Uuid>>>,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pending record for a target under the bound tenant.
    ///
    /// Fails fast when no tenant is bound; records never default to a
    /// partition.
    pub fn create(
        &self,
        ctx: &TenantContext,
        target: &DeliveryTarget,
    ) -> Result<Uuid, TenantNotBound> {
        let tenant = ctx.require()?;
        let record = NotificationRecord::pending(tenant, target);
        let id = record.id;
        self.records.insert(id, record);
        Ok(id)
    }

    /// Read a record by id.
    pub fn get(&self, id: Uuid) -> Option<NotificationRecord> {
        self.records.get(&id).map(|r| r.value().clone())
    }

    /// Claim a record for exclusive update.
    ///
    /// The claim is released when the returned guard drops. A second
    /// claimer gets `ClaimConflict` and must abort without side effects.
    pub fn claim(&self, id: Uuid) -> Result<RecordClaim<'_>, StoreError> {
        if !self.records.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }
        match self.claims.entry(id) {
            Entry::Occupied(_) => Err(StoreError::ClaimConflict(id)),
            Entry::Vacant(entry) => {
                entry.insert(());
                Ok(RecordClaim { store: self, id })
            }
        }
    }

    /// Remember a bus message id; returns false when it was seen before.
    ///
    /// The first routing of a message wins. Duplicate deliveries from the
    /// at-least-once bus observe `false` and create no records.
    pub fn begin_message(&self, message_id: &str) -> bool {
        match self.routed_messages.entry(message_id.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(Vec::new());
                true
            }
        }
    }

    /// Associate a created record with the message that produced it.
    pub fn attach_to_message(&self, message_id: &str, record_id: Uuid) {
        if let Some(mut ids) = self.routed_messages.get_mut(message_id) {
            ids.push(record_id);
        }
    }

    /// Records created while routing a message.
    pub fn records_for_message(&self, message_id: &str) -> Vec<NotificationRecord> {
        self.routed_messages
            .get(message_id)
            .map(|ids| ids.iter().filter_map(|id| self.get(*id)).collect())
            .unwrap_or_default()
    }

    /// Count records by status, for ops reporting.
    pub fn count_by_status(&self, status: NotificationStatus) -> usize {
        self.records.iter().filter(|r| r.value().status == status).count()
    }

    fn release(&self, id: Uuid) {
        self.claims.remove(&id);
    }

    fn apply(&self, id: Uuid, outcome: &DispatchOutcome) -> NotificationStatus {
        let mut record = match self.records.get_mut(&id) {
            Some(record) => record,
            // Claimed records exist by construction; a missing one means
            // the claim outlived the store contents.
            None => return NotificationStatus::Failed,
        };
        match outcome {
            DispatchOutcome::Delivered => record.mark_sent(),
            DispatchOutcome::TransientFailure(reason)
            | DispatchOutcome::PermanentFailure(reason) => record.mark_failed(reason),
        }
    }
}

/// Exclusive, scope-bound ownership of one record for an update.
pub struct RecordClaim<'a> {
    store: &'a NotificationStore,
    id: Uuid,
}

impl RecordClaim<'_> {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Status of the claimed record.
    pub fn status(&self) -> NotificationStatus {
        self.store
            .get(self.id)
            .map(|r| r.status)
            .unwrap_or(NotificationStatus::Failed)
    }

    /// Apply a terminal dispatch outcome and return the resulting status.
    ///
    /// Already-terminal records are left untouched.
    pub fn complete(self, outcome: &DispatchOutcome) -> NotificationStatus {
        self.store.apply(self.id, outcome)
    }
}

impl Drop for RecordClaim<'_> {
    fn drop(&mut self) {
        self.store.release(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::outcome::Channel;
    use crate::tenant::context::TenantId;

    fn target() -> DeliveryTarget {
        DeliveryTarget {
            recipient: "+911234".into(),
            subject: "s".into(),
            body: "b".into(),
            channel: Channel::WhatsApp,
        }
    }

    fn bound_ctx() -> TenantContext {
        let mut ctx = TenantContext::new();
        ctx.bind(TenantId(7));
        ctx
    }

    #[test]
    fn test_create_requires_tenant() {
        let store = NotificationStore::new();
        let ctx = TenantContext::new();
        assert_eq!(store.create(&ctx, &target()), Err(TenantNotBound));
    }

    #[test]
    fn test_create_and_complete() {
        let store = NotificationStore::new();
        let id = store.create(&bound_ctx(), &target()).unwrap();

        let claim = store.claim(id).unwrap();
        assert_eq!(claim.status(), NotificationStatus::Pending);
        let status = claim.complete(&DispatchOutcome::Delivered);
        assert_eq!(status, NotificationStatus::Sent);

        let record = store.get(id).unwrap();
        assert_eq!(record.tenant_id, TenantId(7));
        assert!(record.sent_at.is_some());
    }

    #[test]
    fn test_concurrent_claim_conflicts() {
        let store = NotificationStore::new();
        let id = store.create(&bound_ctx(), &target()).unwrap();

        let first = store.claim(id).unwrap();
        assert!(matches!(store.claim(id), Err(StoreError::ClaimConflict(_))));
        drop(first);

        // Released on drop.
        assert!(store.claim(id).is_ok());
    }

    #[test]
    fn test_terminal_status_sticks() {
        let store = NotificationStore::new();
        let id = store.create(&bound_ctx(), &target()).unwrap();

        store
            .claim(id)
            .unwrap()
            .complete(&DispatchOutcome::PermanentFailure("rejected".into()));

        let status = store.claim(id).unwrap().complete(&DispatchOutcome::Delivered);
        assert_eq!(status, NotificationStatus::Failed);
        assert!(store.get(id).unwrap().sent_at.is_none());
    }

    #[test]
    fn test_claim_missing_record() {
        let store = NotificationStore::new();
        assert!(matches!(
            store.claim(Uuid::new_v4()),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_message_idempotency() {
        let store = NotificationStore::new();
        assert!(store.begin_message("msg-1"));
        assert!(!store.begin_message("msg-1"));
        assert!(store.begin_message("msg-2"));

        let id = store.create(&bound_ctx(), &target()).unwrap();
        store.attach_to_message("msg-1", id);
        assert_eq!(store.records_for_message("msg-1").len(), 1);
        assert!(store.records_for_message("msg-3").is_empty());
    }
}
