//! Domain events and their in-transaction subscribers.
//!
//! Engines publish a [`DomainEvent`] through an [`EventBus`] while still holding
//! the operation's transaction. Every subscriber sees the same connection, so a
//! subscriber error aborts the whole operation.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Serialize;
use std::sync::Arc;

use crate::error::Result;
use crate::memory::types::OwnerKey;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A personality trait moved by a reasoned adjustment.
    TraitAdjusted {
        owner: OwnerKey,
        trait_name: String,
        old_value: f64,
        new_value: f64,
        adjustment: f64,
        reason: String,
        at: DateTime<Utc>,
    },
}

/// Reacts to domain events inside the publisher's transaction.
pub trait EventSubscriber: Send + Sync {
    fn handle(&self, conn: &Connection, event: &DomainEvent) -> Result<()>;
}

/// Ordered fan-out of events to subscribers.
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Vec<Arc<dyn EventSubscriber>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: Arc<dyn EventSubscriber>) {
        self.subscribers.push(subscriber);
    }

    pub fn with_subscriber(mut self, subscriber: Arc<dyn EventSubscriber>) -> Self {
        self.subscribe(subscriber);
        self
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Deliver `event` to every subscriber in registration order, stopping at the first error.
    pub fn publish(&self, conn: &Connection, event: &DomainEvent) -> Result<()> {
        for subscriber in &self.subscribers {
            subscriber.handle(conn, event)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnimaError;
    use std::sync::Mutex;

    struct Recorder(Mutex<Vec<String>>);

    impl EventSubscriber for Recorder {
        fn handle(&self, _conn: &Connection, event: &DomainEvent) -> Result<()> {
            let DomainEvent::TraitAdjusted { trait_name, .. } = event;
            self.0.lock().unwrap().push(trait_name.clone());
            Ok(())
        }
    }

    struct Failing;

    impl EventSubscriber for Failing {
        fn handle(&self, _conn: &Connection, _event: &DomainEvent) -> Result<()> {
            Err(AnimaError::validation("subscriber refused"))
        }
    }

    fn event() -> DomainEvent {
        DomainEvent::TraitAdjusted {
            owner: OwnerKey::new("u1", "airi"),
            trait_name: "shyness".into(),
            old_value: 0.3,
            new_value: 0.31,
            adjustment: 0.01,
            reason: "test".into(),
            at: Utc::now(),
        }
    }

    #[test]
    fn publish_reaches_every_subscriber_in_order() {
        let conn = Connection::open_in_memory().unwrap();
        let first = Arc::new(Recorder(Mutex::new(Vec::new())));
        let second = Arc::new(Recorder(Mutex::new(Vec::new())));
        let bus = EventBus::new()
            .with_subscriber(first.clone())
            .with_subscriber(second.clone());

        bus.publish(&conn, &event()).unwrap();
        assert_eq!(*first.0.lock().unwrap(), vec!["shyness".to_string()]);
        assert_eq!(*second.0.lock().unwrap(), vec!["shyness".to_string()]);
    }

    #[test]
    fn publish_stops_at_first_error() {
        let conn = Connection::open_in_memory().unwrap();
        let after = Arc::new(Recorder(Mutex::new(Vec::new())));
        let bus = EventBus::new()
            .with_subscriber(Arc::new(Failing))
            .with_subscriber(after.clone());

        assert!(bus.publish(&conn, &event()).is_err());
        assert!(after.0.lock().unwrap().is_empty());
    }

    #[test]
    fn empty_bus_is_a_no_op() {
        let conn = Connection::open_in_memory().unwrap();
        let bus = EventBus::new();
        assert!(bus.is_empty());
        bus.publish(&conn, &event()).unwrap();
    }
}
