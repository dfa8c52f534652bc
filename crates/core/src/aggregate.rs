//! Aggregate root trait and pending-event bookkeeping.

/// Aggregate root marker + minimal interface.
///
/// Aggregates here are state-based: mutators validate, change state and record
/// the domain events describing what happened. The application layer persists
/// the aggregate and then drains the recorded events to a publisher.
pub trait AggregateRoot {
    /// Strongly-typed aggregate key (partition key included).
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Closed set of events this aggregate can record.
    type Event: Clone + core::fmt::Debug;

    /// Returns the aggregate key.
    fn id(&self) -> Self::Id;

    /// Events recorded since the last drain, oldest first.
    fn pending_events(&self) -> &[Self::Event];

    /// Take ownership of the recorded events, leaving none pending.
    fn take_events(&mut self) -> Vec<Self::Event>;
}

/// Append-only buffer of events recorded by an aggregate.
///
/// Not part of the aggregate's value: two aggregates with the same state but
/// different pending events compare equal.
#[derive(Debug, Clone)]
pub struct EventRecorder<E> {
    events: Vec<E>,
}

impl<E> EventRecorder<E> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn record(&mut self, event: E) {
        self.events.push(event);
    }

    pub fn pending(&self) -> &[E] {
        &self.events
    }

    pub fn take(&mut self) -> Vec<E> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl<E> Default for EventRecorder<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> PartialEq for EventRecorder<E> {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl<E> Eq for EventRecorder<E> {}
