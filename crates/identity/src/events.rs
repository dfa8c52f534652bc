//! The closed set of identity events and the publishing port.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gatehouse_core::{DomainError, DomainResult, TenantId};
use gatehouse_events::{AggregateEvent, Event, EventBus, EventEnvelope, TenantScoped};

use crate::group::GroupEvent;
use crate::role::RoleEvent;
use crate::tenant::TenantEvent;
use crate::user::UserEvent;

/// Every event an identity aggregate can record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentityEvent {
    Tenant(TenantEvent),
    User(UserEvent),
    Group(GroupEvent),
    Role(RoleEvent),
}

impl From<TenantEvent> for IdentityEvent {
    fn from(value: TenantEvent) -> Self {
        IdentityEvent::Tenant(value)
    }
}

impl From<UserEvent> for IdentityEvent {
    fn from(value: UserEvent) -> Self {
        IdentityEvent::User(value)
    }
}

impl From<GroupEvent> for IdentityEvent {
    fn from(value: GroupEvent) -> Self {
        IdentityEvent::Group(value)
    }
}

impl From<RoleEvent> for IdentityEvent {
    fn from(value: RoleEvent) -> Self {
        IdentityEvent::Role(value)
    }
}

impl IdentityEvent {
    /// Convert a drained batch of aggregate events.
    pub fn batch<E: Into<IdentityEvent>>(events: Vec<E>) -> Vec<IdentityEvent> {
        events.into_iter().map(Into::into).collect()
    }

    fn inner(&self) -> &dyn AggregateEventRef {
        match self {
            IdentityEvent::Tenant(e) => e,
            IdentityEvent::User(e) => e,
            IdentityEvent::Group(e) => e,
            IdentityEvent::Role(e) => e,
        }
    }
}

/// Object-safe view over the per-aggregate event enums.
trait AggregateEventRef {
    fn event_type(&self) -> &'static str;
    fn version(&self) -> u32;
    fn occurred_at(&self) -> DateTime<Utc>;
    fn tenant_id(&self) -> TenantId;
    fn aggregate_type(&self) -> &'static str;
    fn aggregate_key(&self) -> String;
}

impl<E: AggregateEvent> AggregateEventRef for E {
    fn event_type(&self) -> &'static str {
        Event::event_type(self)
    }

    fn version(&self) -> u32 {
        Event::version(self)
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        Event::occurred_at(self)
    }

    fn tenant_id(&self) -> TenantId {
        TenantScoped::tenant_id(self)
    }

    fn aggregate_type(&self) -> &'static str {
        AggregateEvent::aggregate_type(self)
    }

    fn aggregate_key(&self) -> String {
        AggregateEvent::aggregate_key(self)
    }
}

impl Event for IdentityEvent {
    fn event_type(&self) -> &'static str {
        self.inner().event_type()
    }

    fn version(&self) -> u32 {
        self.inner().version()
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.inner().occurred_at()
    }
}

impl TenantScoped for IdentityEvent {
    fn tenant_id(&self) -> TenantId {
        self.inner().tenant_id()
    }
}

impl AggregateEvent for IdentityEvent {
    fn aggregate_type(&self) -> &'static str {
        self.inner().aggregate_type()
    }

    fn aggregate_key(&self) -> String {
        self.inner().aggregate_key()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Publishing
// ─────────────────────────────────────────────────────────────────────────────

/// Fire-and-forget hand-off of recorded events.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: IdentityEvent) -> DomainResult<()>;

    /// Publish in order, stopping at the first failure.
    fn publish_all(&self, events: Vec<IdentityEvent>) -> DomainResult<()> {
        for event in events {
            self.publish(event)?;
        }
        Ok(())
    }
}

/// Publishes onto any event bus, sealing each event into an [`EventEnvelope`].
#[derive(Debug, Clone)]
pub struct BusPublisher<B> {
    bus: B,
}

impl<B> BusPublisher<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }
}

impl<B> EventPublisher for BusPublisher<B>
where
    B: EventBus<EventEnvelope<IdentityEvent>>,
{
    fn publish(&self, event: IdentityEvent) -> DomainResult<()> {
        let envelope = EventEnvelope::seal(event);
        tracing::debug!(
            tenant_id = %envelope.tenant_id(),
            event_type = envelope.event_type(),
            aggregate = envelope.aggregate_key(),
            "publishing identity event"
        );
        self.bus
            .publish(envelope)
            .map_err(|e| DomainError::internal(format!("event publication failed: {e:?}")))
    }
}
