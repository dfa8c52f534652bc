use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gatehouse_core::TenantId;

use crate::AggregateEvent;

/// Envelope for an event, containing multi-tenant + aggregate metadata.
///
/// This is the unit handed to an event bus.
///
/// Notes:
/// - **Multi-tenancy** is carried here via `tenant_id`.
/// - `aggregate_key` is the aggregate's key inside its tenant (username,
///   group name, role name or tenant id).
/// - `payload` is the typed domain event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: Uuid,
    tenant_id: TenantId,

    aggregate_type: String,
    aggregate_key: String,

    event_type: String,
    version: u32,

    payload: E,
}

impl<E> EventEnvelope<E> {
    pub fn new(
        event_id: Uuid,
        tenant_id: TenantId,
        aggregate_type: impl Into<String>,
        aggregate_key: impl Into<String>,
        event_type: impl Into<String>,
        version: u32,
        payload: E,
    ) -> Self {
        Self {
            event_id,
            tenant_id,
            aggregate_type: aggregate_type.into(),
            aggregate_key: aggregate_key.into(),
            event_type: event_type.into(),
            version,
            payload,
        }
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    pub fn aggregate_type(&self) -> &str {
        &self.aggregate_type
    }

    pub fn aggregate_key(&self) -> &str {
        &self.aggregate_key
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}

impl<E: AggregateEvent> EventEnvelope<E> {
    /// Wrap an aggregate event, deriving the metadata from the event itself.
    pub fn seal(payload: E) -> Self {
        Self::new(
            Uuid::now_v7(),
            payload.tenant_id(),
            payload.aggregate_type(),
            payload.aggregate_key(),
            payload.event_type(),
            payload.version(),
            payload,
        )
    }
}

impl<E: Serialize> EventEnvelope<E> {
    /// JSON form handed to external publishers.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}
