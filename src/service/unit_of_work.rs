// Copyright (c) 2025 - Cowboy AI, Inc.
//! Unit of Work
//!
//! Collects the writes of one command: event appends per aggregate stream
//! and the interest changes the route network must see. Appends run first
//! in recorded order, then interest changes in recorded order, so a lost
//! version race on the first append leaves the route network untouched.
//!
//! ```text
//! pre-check every expected version ──fail──> ConcurrencyConflict, nothing written
//!        ↓
//! step 1 ──fail──> error returned, nothing written
//!        ↓
//! step n ──fail──> panic (earlier steps are already durable)
//! ```

use tracing::{debug, error};
use uuid::Uuid;

use super::{ServiceError, ServiceResult};
use crate::domain::ValidatedRouteNetworkWalk;
use crate::event_store::EventStore;
use crate::events::UtilityNetworkEvent;
use crate::route_network::RouteNetworkGateway;

/// A change to an interest registered in the route network
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterestChange {
    RegisterWalk {
        interest_id: Uuid,
        walk: ValidatedRouteNetworkWalk,
    },
    RegisterNode {
        interest_id: Uuid,
        route_node_id: Uuid,
    },
    UpdateWalk {
        interest_id: Uuid,
        walk: ValidatedRouteNetworkWalk,
    },
    Unregister {
        interest_id: Uuid,
    },
}

#[derive(Debug, Clone)]
enum Step {
    Append {
        aggregate_id: Uuid,
        expected_version: u64,
        events: Vec<UtilityNetworkEvent>,
    },
    Interest(InterestChange),
}

/// Ordered writes of one command
#[derive(Debug, Clone, Default)]
pub struct UnitOfWork {
    steps: Vec<Step>,
}

impl UnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event to an aggregate stream loaded at `expected_version`
    ///
    /// Further events for the same aggregate join its first append.
    pub fn append(&mut self, aggregate_id: Uuid, expected_version: u64, event: impl Into<UtilityNetworkEvent>) {
        let event = event.into();

        for step in self.steps.iter_mut() {
            if let Step::Append {
                aggregate_id: id,
                events,
                ..
            } = step
            {
                if *id == aggregate_id {
                    events.push(event);
                    return;
                }
            }
        }

        self.steps.push(Step::Append {
            aggregate_id,
            expected_version,
            events: vec![event],
        });
    }

    pub fn change_interest(&mut self, change: InterestChange) {
        self.steps.push(Step::Interest(change));
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Events in the order they will be committed
    pub fn events(&self) -> impl Iterator<Item = &UtilityNetworkEvent> {
        self.steps.iter().flat_map(|step| match step {
            Step::Append { events, .. } => events.as_slice(),
            Step::Interest(_) => &[][..],
        })
    }

    /// Write every step and return the committed events in commit order
    ///
    /// # Panics
    ///
    /// Panics if a step fails after an earlier step has been written.
    pub async fn execute(
        self,
        store: &dyn EventStore,
        gateway: &dyn RouteNetworkGateway,
    ) -> ServiceResult<Vec<UtilityNetworkEvent>> {
        for step in &self.steps {
            if let Step::Append {
                aggregate_id,
                expected_version,
                ..
            } = step
            {
                let actual = store.get_version(*aggregate_id).await?.unwrap_or(0);
                if actual != *expected_version {
                    return Err(ServiceError::ConcurrencyConflict {
                        aggregate_id: *aggregate_id,
                        expected: *expected_version,
                        actual,
                    });
                }
            }
        }

        let (appends, interests): (Vec<Step>, Vec<Step>) = self
            .steps
            .into_iter()
            .partition(|step| matches!(step, Step::Append { .. }));

        let mut committed = Vec::new();

        for (index, step) in appends.into_iter().chain(interests).enumerate() {
            match run_step(step, store, gateway).await {
                Ok(events) => committed.extend(events),
                Err(err) if index == 0 => return Err(err),
                Err(err) => {
                    error!(
                        step = index,
                        committed = committed.len(),
                        error = %err,
                        "Unit of work failed after earlier steps were committed"
                    );
                    panic!("unit of work failed at step {index} after earlier steps were committed: {err}");
                }
            }
        }

        Ok(committed)
    }
}

async fn run_step(
    step: Step,
    store: &dyn EventStore,
    gateway: &dyn RouteNetworkGateway,
) -> ServiceResult<Vec<UtilityNetworkEvent>> {
    match step {
        Step::Append {
            aggregate_id,
            expected_version,
            events,
        } => {
            let version = store
                .append(aggregate_id, events.clone(), Some(expected_version))
                .await?;
            debug!(%aggregate_id, version, "Appended events");
            Ok(events)
        }
        Step::Interest(change) => {
            match change {
                InterestChange::RegisterWalk { interest_id, walk } => {
                    gateway.register_walk_of_interest(interest_id, &walk).await?;
                }
                InterestChange::RegisterNode {
                    interest_id,
                    route_node_id,
                } => {
                    gateway.register_node_of_interest(interest_id, route_node_id).await?;
                }
                InterestChange::UpdateWalk { interest_id, walk } => {
                    gateway.update_walk_of_interest(interest_id, &walk).await?;
                }
                InterestChange::Unregister { interest_id } => {
                    gateway.unregister_interest(interest_id).await?;
                }
            }
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::span_equipment::test_support::*;
    use crate::aggregate::span_equipment::{handle_change_naming_info, handle_place_in_route_network};
    use crate::aggregate::SpanEquipmentProperties;
    use crate::domain::NamingInfo;
    use crate::errors::InfrastructureResult;
    use crate::event_store::{InMemoryEventStore, StoredEvent};
    use crate::route_network::InMemoryRouteNetwork;
    use chrono::{DateTime, Utc};

    fn placement(span_equipment_id: Uuid) -> UtilityNetworkEvent {
        let state = crate::aggregate::SpanEquipmentState::default_for(span_equipment_id);
        handle_place_in_route_network(
            &state,
            &ctx(),
            &single_conduit_spec(),
            id(0x100),
            &walk(&[A, S1, B]),
            SpanEquipmentProperties::default(),
        )
        .unwrap()
        .into()
    }

    #[test]
    fn test_appends_for_same_aggregate_are_grouped() {
        let mut work = UnitOfWork::new();
        let state = placed_conduit(id(1), &[A, S1, B]);
        let renamed = handle_change_naming_info(&state, &ctx(), Some(NamingInfo::named("K1"))).unwrap();

        work.append(id(1), 0, placement(id(1)));
        work.change_interest(InterestChange::Unregister { interest_id: id(9) });
        work.append(id(1), 0, renamed);

        assert_eq!(work.steps.len(), 2);
        assert_eq!(work.events().count(), 2);
    }

    #[tokio::test]
    async fn test_version_mismatch_writes_nothing() {
        let store = InMemoryEventStore::new();
        let network = InMemoryRouteNetwork::from_segments(&[(S1, A, B)]).unwrap();

        let mut work = UnitOfWork::new();
        work.append(id(1), 0, placement(id(1)));
        work.append(id(2), 3, placement(id(2)));

        let result = work.execute(&store, &network).await;

        assert!(matches!(
            result,
            Err(ServiceError::ConcurrencyConflict { expected: 3, actual: 0, .. })
        ));
        assert_eq!(store.get_version(id(1)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_first_step_failure_is_returned() {
        let store = InMemoryEventStore::new();
        let network = InMemoryRouteNetwork::from_segments(&[(S1, A, B)]).unwrap();

        let mut work = UnitOfWork::new();
        work.change_interest(InterestChange::Unregister { interest_id: id(9) });

        assert!(matches!(
            work.execute(&store, &network).await,
            Err(ServiceError::RouteNetwork(_))
        ));
    }

    #[tokio::test]
    #[should_panic(expected = "after earlier steps were committed")]
    async fn test_failure_after_first_write_panics() {
        let store = InMemoryEventStore::new();
        let network = InMemoryRouteNetwork::from_segments(&[(S1, A, B)]).unwrap();

        let mut work = UnitOfWork::new();
        work.change_interest(InterestChange::Unregister { interest_id: id(9) });
        work.append(id(1), 0, placement(id(1)));

        let _ = work.execute(&store, &network).await;
    }

    /// Store whose version reads lag behind its appends, as when another
    /// writer commits between the pre-check and the append
    struct LaggingStore {
        inner: InMemoryEventStore,
    }

    #[async_trait::async_trait]
    impl EventStore for LaggingStore {
        async fn append(
            &self,
            aggregate_id: Uuid,
            events: Vec<UtilityNetworkEvent>,
            expected_version: Option<u64>,
        ) -> InfrastructureResult<u64> {
            self.inner.append(aggregate_id, events, expected_version).await
        }

        async fn read_events(&self, aggregate_id: Uuid) -> InfrastructureResult<Vec<StoredEvent<UtilityNetworkEvent>>> {
            self.inner.read_events(aggregate_id).await
        }

        async fn read_events_from(
            &self,
            aggregate_id: Uuid,
            from_version: u64,
        ) -> InfrastructureResult<Vec<StoredEvent<UtilityNetworkEvent>>> {
            self.inner.read_events_from(aggregate_id, from_version).await
        }

        async fn read_by_correlation(
            &self,
            correlation_id: Uuid,
        ) -> InfrastructureResult<Vec<StoredEvent<UtilityNetworkEvent>>> {
            self.inner.read_by_correlation(correlation_id).await
        }

        async fn get_version(&self, _aggregate_id: Uuid) -> InfrastructureResult<Option<u64>> {
            Ok(None)
        }

        async fn read_events_by_time_range(
            &self,
            aggregate_id: Uuid,
            from_time: DateTime<Utc>,
            to_time: DateTime<Utc>,
        ) -> InfrastructureResult<Vec<StoredEvent<UtilityNetworkEvent>>> {
            self.inner.read_events_by_time_range(aggregate_id, from_time, to_time).await
        }

        async fn read_all(&self, from_position: u64) -> InfrastructureResult<Vec<StoredEvent<UtilityNetworkEvent>>> {
            self.inner.read_all(from_position).await
        }
    }

    #[tokio::test]
    async fn test_lost_version_race_is_a_conflict_not_a_panic() {
        let store = LaggingStore {
            inner: InMemoryEventStore::new(),
        };
        store.inner.append(id(1), vec![placement(id(1))], Some(0)).await.unwrap();
        let network = InMemoryRouteNetwork::from_segments(&[(S1, A, B)]).unwrap();

        let mut work = UnitOfWork::new();
        work.change_interest(InterestChange::RegisterWalk {
            interest_id: id(0x200),
            walk: walk(&[A, S1, B]),
        });
        work.append(id(1), 0, placement(id(1)));

        let result = work.execute(&store, &network).await;

        assert!(matches!(
            result,
            Err(ServiceError::ConcurrencyConflict { expected: 0, actual: 1, .. })
        ));
        assert!(network.get_walk_of_interest(id(0x200)).await.is_err());
        assert_eq!(store.inner.get_version(id(1)).await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn test_committed_events_come_back_in_order() {
        let store = InMemoryEventStore::new();
        let network = InMemoryRouteNetwork::from_segments(&[(S1, A, B)]).unwrap();

        let mut work = UnitOfWork::new();
        work.change_interest(InterestChange::RegisterWalk {
            interest_id: id(0x100),
            walk: walk(&[A, S1, B]),
        });
        work.append(id(1), 0, placement(id(1)));
        work.append(id(2), 0, placement(id(2)));

        let events = work.execute(&store, &network).await.unwrap();

        assert_eq!(
            events.iter().map(|e| e.aggregate_id()).collect::<Vec<_>>(),
            vec![id(1), id(2)]
        );
        assert_eq!(store.get_version(id(2)).await.unwrap(), Some(1));
        assert!(network.get_walk_of_interest(id(0x100)).await.is_ok());
    }
}
