// Copyright (c) 2025 - Cowboy AI, Inc.
//! In-memory event store
//!
//! One global log plus per-aggregate indices into it. Used by tests and by
//! embedded deployments that rebuild from a snapshot elsewhere.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{EventStore, StoredEvent};
use crate::errors::{InfrastructureError, InfrastructureResult};
use crate::events::UtilityNetworkEvent;

#[derive(Default)]
struct Log {
    events: Vec<StoredEvent<UtilityNetworkEvent>>,
    streams: HashMap<Uuid, Vec<usize>>,
}

impl Log {
    fn version(&self, aggregate_id: Uuid) -> Option<u64> {
        self.streams
            .get(&aggregate_id)
            .map(|indices| indices.len() as u64)
    }

    fn stream(&self, aggregate_id: Uuid) -> impl Iterator<Item = &StoredEvent<UtilityNetworkEvent>> {
        self.streams
            .get(&aggregate_id)
            .into_iter()
            .flatten()
            .map(move |i| &self.events[*i])
    }
}

/// Event store keeping everything in process memory
#[derive(Default)]
pub struct InMemoryEventStore {
    log: RwLock<Log>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of events in the global log
    pub async fn len(&self) -> usize {
        self.log.read().await.events.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn append(
        &self,
        aggregate_id: Uuid,
        events: Vec<UtilityNetworkEvent>,
        expected_version: Option<u64>,
    ) -> InfrastructureResult<u64> {
        let mut log = self.log.write().await;
        let current_version = log.version(aggregate_id);

        if let Some(expected) = expected_version {
            let actual = current_version.unwrap_or(0);
            if actual != expected {
                return Err(InfrastructureError::ConcurrencyConflict {
                    aggregate_id,
                    expected,
                    actual,
                });
            }
        }

        if let Some(foreign) = events.iter().find(|e| e.aggregate_id() != aggregate_id) {
            return Err(InfrastructureError::StreamMismatch {
                event_id: foreign.event_id(),
                event_aggregate_id: foreign.aggregate_id(),
                stream_id: aggregate_id,
            });
        }

        let mut sequence = current_version.unwrap_or(0);

        for event in events {
            sequence += 1;
            let position = log.events.len() as u64 + 1;

            debug!(
                aggregate_id = %aggregate_id,
                sequence,
                position,
                event_type = event.event_type_name(),
                "Appending event"
            );

            let index = log.events.len();
            log.events
                .push(StoredEvent::from_event(event, sequence, position));
            log.streams.entry(aggregate_id).or_default().push(index);
        }

        Ok(sequence)
    }

    async fn read_events(
        &self,
        aggregate_id: Uuid,
    ) -> InfrastructureResult<Vec<StoredEvent<UtilityNetworkEvent>>> {
        let log = self.log.read().await;
        Ok(log.stream(aggregate_id).cloned().collect())
    }

    async fn read_events_from(
        &self,
        aggregate_id: Uuid,
        from_version: u64,
    ) -> InfrastructureResult<Vec<StoredEvent<UtilityNetworkEvent>>> {
        let log = self.log.read().await;
        Ok(log
            .stream(aggregate_id)
            .filter(|e| e.sequence >= from_version)
            .cloned()
            .collect())
    }

    async fn read_by_correlation(
        &self,
        correlation_id: Uuid,
    ) -> InfrastructureResult<Vec<StoredEvent<UtilityNetworkEvent>>> {
        let log = self.log.read().await;
        Ok(log
            .events
            .iter()
            .filter(|e| e.correlation_id == correlation_id)
            .cloned()
            .collect())
    }

    async fn get_version(&self, aggregate_id: Uuid) -> InfrastructureResult<Option<u64>> {
        Ok(self.log.read().await.version(aggregate_id))
    }

    async fn read_events_by_time_range(
        &self,
        aggregate_id: Uuid,
        from_time: DateTime<Utc>,
        to_time: DateTime<Utc>,
    ) -> InfrastructureResult<Vec<StoredEvent<UtilityNetworkEvent>>> {
        let log = self.log.read().await;
        Ok(log
            .stream(aggregate_id)
            .filter(|e| e.timestamp >= from_time && e.timestamp <= to_time)
            .cloned()
            .collect())
    }

    async fn read_all(
        &self,
        from_position: u64,
    ) -> InfrastructureResult<Vec<StoredEvent<UtilityNetworkEvent>>> {
        let log = self.log.read().await;
        Ok(log
            .events
            .iter()
            .filter(|e| e.position >= from_position)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NamingInfo;
    use crate::events::span_equipment::{SpanEquipmentEvent, SpanEquipmentNamingInfoChanged};
    use crate::events::EventHeader;

    fn naming_event(aggregate_id: Uuid, correlation_id: Uuid, at: &str, name: &str) -> UtilityNetworkEvent {
        UtilityNetworkEvent::SpanEquipment(SpanEquipmentEvent::NamingInfoChanged(
            SpanEquipmentNamingInfoChanged {
                header: EventHeader::new(aggregate_id, at.parse().unwrap(), correlation_id, None),
                naming_info: Some(NamingInfo::named(name)),
            },
        ))
    }

    #[tokio::test]
    async fn test_append_and_read_in_order() {
        let store = InMemoryEventStore::new();
        let id = Uuid::now_v7();
        let corr = Uuid::now_v7();

        let version = store
            .append(
                id,
                vec![
                    naming_event(id, corr, "2025-03-01T10:00:00Z", "a"),
                    naming_event(id, corr, "2025-03-01T10:00:01Z", "b"),
                ],
                Some(0),
            )
            .await
            .unwrap();

        assert_eq!(version, 2);
        assert_eq!(store.get_version(id).await.unwrap(), Some(2));

        let events = store.read_events(id).await.unwrap();
        let sequences: Vec<u64> = events.iter().map(|e| e.sequence).collect();
        assert_eq!(sequences, vec![1, 2]);

        let tail = store.read_events_from(id, 2).await.unwrap();
        assert_eq!(tail.len(), 1);
        assert_eq!(tail[0].sequence, 2);
    }

    #[tokio::test]
    async fn test_unknown_aggregate_has_no_version() {
        let store = InMemoryEventStore::new();
        assert_eq!(store.get_version(Uuid::now_v7()).await.unwrap(), None);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_stale_expected_version_is_rejected() {
        let store = InMemoryEventStore::new();
        let id = Uuid::now_v7();
        let corr = Uuid::now_v7();

        store
            .append(id, vec![naming_event(id, corr, "2025-03-01T10:00:00Z", "a")], Some(0))
            .await
            .unwrap();

        let result = store
            .append(id, vec![naming_event(id, corr, "2025-03-01T10:00:01Z", "b")], Some(0))
            .await;

        match result {
            Err(InfrastructureError::ConcurrencyConflict { expected, actual, .. }) => {
                assert_eq!(expected, 0);
                assert_eq!(actual, 1);
            }
            other => panic!("expected concurrency conflict, got {:?}", other),
        }
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_expected_version_on_missing_aggregate_is_rejected() {
        let store = InMemoryEventStore::new();
        let id = Uuid::now_v7();

        let result = store
            .append(id, vec![naming_event(id, id, "2025-03-01T10:00:00Z", "a")], Some(3))
            .await;

        assert!(matches!(
            result,
            Err(InfrastructureError::ConcurrencyConflict { actual: 0, .. })
        ));
    }

    #[tokio::test]
    async fn test_foreign_event_is_rejected() {
        let store = InMemoryEventStore::new();
        let id = Uuid::now_v7();
        let other = Uuid::now_v7();

        let result = store
            .append(id, vec![naming_event(other, id, "2025-03-01T10:00:00Z", "a")], None)
            .await;

        assert!(matches!(result, Err(InfrastructureError::StreamMismatch { .. })));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_global_log_and_correlation() {
        let store = InMemoryEventStore::new();
        let first = Uuid::now_v7();
        let second = Uuid::now_v7();
        let cut = Uuid::now_v7();
        let unrelated = Uuid::now_v7();

        store
            .append(first, vec![naming_event(first, cut, "2025-03-01T10:00:00Z", "a")], None)
            .await
            .unwrap();
        store
            .append(second, vec![naming_event(second, unrelated, "2025-03-01T10:00:01Z", "b")], None)
            .await
            .unwrap();
        store
            .append(second, vec![naming_event(second, cut, "2025-03-01T10:00:02Z", "c")], None)
            .await
            .unwrap();

        let all = store.read_all(1).await.unwrap();
        let positions: Vec<u64> = all.iter().map(|e| e.position).collect();
        assert_eq!(positions, vec![1, 2, 3]);

        let from_two = store.read_all(2).await.unwrap();
        assert_eq!(from_two.len(), 2);

        let correlated = store.read_by_correlation(cut).await.unwrap();
        let aggregates: Vec<Uuid> = correlated.iter().map(|e| e.aggregate_id).collect();
        assert_eq!(aggregates, vec![first, second]);
    }

    #[tokio::test]
    async fn test_time_range() {
        let store = InMemoryEventStore::new();
        let id = Uuid::now_v7();
        let corr = Uuid::now_v7();

        store
            .append(
                id,
                vec![
                    naming_event(id, corr, "2025-03-01T10:00:00Z", "a"),
                    naming_event(id, corr, "2025-03-01T11:00:00Z", "b"),
                    naming_event(id, corr, "2025-03-01T12:00:00Z", "c"),
                ],
                None,
            )
            .await
            .unwrap();

        let events = store
            .read_events_by_time_range(
                id,
                "2025-03-01T10:30:00Z".parse().unwrap(),
                "2025-03-01T12:00:00Z".parse().unwrap(),
            )
            .await
            .unwrap();

        let sequences: Vec<u64> = events.iter().map(|e| e.sequence).collect();
        assert_eq!(sequences, vec![2, 3]);
    }
}
