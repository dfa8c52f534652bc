use chrono::{DateTime, Utc};

use crate::TenantScoped;

/// A domain-agnostic event.
///
/// Events are:
/// - **immutable** (treat them as facts)
/// - **versioned** (schema evolution)
/// - plain records: no behavior beyond describing themselves
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "identity.tenant.activated").
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32;

    /// When the event occurred (business time).
    fn occurred_at(&self) -> DateTime<Utc>;
}

/// An event recorded by a tenant-partitioned aggregate.
pub trait AggregateEvent: Event + TenantScoped {
    /// Kind of aggregate that recorded the event (e.g. "group").
    fn aggregate_type(&self) -> &'static str;

    /// Key of the aggregate within its tenant (username, group name, ...).
    fn aggregate_key(&self) -> String;
}
