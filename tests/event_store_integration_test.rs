// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event Store Integration Tests
//!
//! Commands run through the service against the in-memory store, then the
//! stored log is read back: per stream, per correlation, by time and as a
//! whole to rebuild the projection from scratch.

mod fixtures;

use std::sync::Arc;

use chrono::Duration;
use cim_utility_network::events::{ChangeTypeEnum, UtilityNetworkEvent};
use cim_utility_network::service::InMemoryNotifier;
use cim_utility_network::{CommandContext, EventStore, UserContext, UtilityNetworkService};
use pretty_assertions::assert_eq;
use uuid::Uuid;

use fixtures::*;

const CONDUIT: Uuid = Uuid::from_u128(0x1_0001);
const CABLE: Uuid = Uuid::from_u128(0x2_0001);
const CABINET: Uuid = Uuid::from_u128(0x4_0001);
const CLOSURE: Uuid = Uuid::from_u128(0x5_0001);

const CUT_CORRELATION_ID: &str = "01934f4a-c001-7000-8000-00000000c0c0";

fn cut_ctx() -> CommandContext {
    CommandContext::new(
        parse_uuid(CUT_CORRELATION_ID),
        UserContext::new("fixture-user"),
        fixed_timestamp(),
    )
}

/// Cable affixed to a conduit from A to C, a closure at D and a cut at C
///
/// Returns the id of the cable remainder created by the cut.
async fn run_scenario(net: &TestNetwork) -> Uuid {
    net.place_conduit(CONDUIT, &[A, S1, B, S2, C]).await;
    net.place_cable(CABLE, &[A, S1, B, S2, C, S3, D]).await;
    let red = net.segment(CONDUIT, 1, 1).await;
    net.service
        .affix_span_equipment_to_parent(&ctx(), CABLE, red)
        .await
        .unwrap();

    let terminals = net.place_closure(CABINET, CLOSURE, D).await;
    let fiber = net.segment(CABLE, 1, 1).await;
    net.service
        .connect_cable_to_terminals(
            &ctx(),
            CABLE,
            D,
            &[cim_utility_network::events::span_equipment::SpanSegmentTerminalRef {
                span_segment_id: fiber,
                terminal_id: terminals[0],
            }],
        )
        .await
        .unwrap();

    net.service
        .cut_span_segments_at_route_node(&cut_ctx(), C, &[fiber])
        .await
        .unwrap();

    net.last_notification()
        .await
        .id_change_sets
        .iter()
        .find(|set| set.change_type == ChangeTypeEnum::Addition)
        .map(|set| set.id_list[0])
        .expect("cut reports the remainder cable")
}

#[tokio::test]
async fn test_rebuilt_projection_matches_live_projection() {
    let net = test_network().await;
    let remainder_id = run_scenario(&net).await;

    let rebuilt = UtilityNetworkService::new(
        net.store.clone(),
        net.route_network.clone(),
        Arc::new(InMemoryNotifier::new()),
        "UtilityNetworkRebuild",
    );
    let version = rebuilt.rebuild_projection().await.unwrap();

    assert_eq!(version, net.service.projection().version().await);

    let live = net.graph().await;
    let replayed = rebuilt.graph().await;
    for id in [CONDUIT, CABLE, remainder_id] {
        assert_eq!(replayed.try_get_span_equipment(id), live.try_get_span_equipment(id));
    }
    assert_eq!(replayed.try_get_node_container(CABINET), live.try_get_node_container(CABINET));
    assert_eq!(replayed.try_get_terminal_equipment(CLOSURE), live.try_get_terminal_equipment(CLOSURE));
    assert_eq!(replayed.span_equipment_count(), live.span_equipment_count());
}

#[tokio::test]
async fn test_rebuild_is_idempotent() {
    let net = test_network().await;
    run_scenario(&net).await;

    let first = net.service.rebuild_projection().await.unwrap();
    let second = net.service.rebuild_projection().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(net.service.projection().version().await, first);
}

#[tokio::test]
async fn test_cut_events_share_one_correlation() {
    let net = test_network().await;
    let remainder_id = run_scenario(&net).await;

    let events = net
        .store
        .read_by_correlation(parse_uuid(CUT_CORRELATION_ID))
        .await
        .unwrap();

    assert!(events.iter().any(|e| e.aggregate_id == CABLE));
    assert!(events.iter().any(|e| e.aggregate_id == remainder_id));
    assert!(events.iter().all(|e| e.correlation_id == parse_uuid(CUT_CORRELATION_ID)));
    assert!(events.windows(2).all(|w| w[0].position < w[1].position));

    let setup = net
        .store
        .read_by_correlation(parse_uuid(CORRELATION_ID_1))
        .await
        .unwrap();
    assert!(!setup.is_empty());
    assert!(setup.iter().all(|e| e.aggregate_id != remainder_id));
}

#[tokio::test]
async fn test_remainder_stream_starts_at_first_version() {
    let net = test_network().await;
    let remainder_id = run_scenario(&net).await;

    let events = net.store.read_events(remainder_id).await.unwrap();
    assert_eq!(events[0].sequence, 1);
    assert!(matches!(events[0].data, UtilityNetworkEvent::SpanEquipment(_)));
    assert_eq!(
        net.store.get_version(remainder_id).await.unwrap(),
        Some(events.len() as u64)
    );

    let tail = net.store.read_events_from(CABLE, 2).await.unwrap();
    assert!(tail.iter().all(|e| e.sequence >= 2));
    assert_eq!(
        net.store.get_version(CABLE).await.unwrap(),
        tail.last().map(|e| e.sequence)
    );
}

#[tokio::test]
async fn test_stored_events_carry_header_fields() {
    let net = test_network().await;
    run_scenario(&net).await;

    let events = net.store.read_events(CABLE).await.unwrap();
    let first = &events[0];

    assert_eq!(first.timestamp, fixed_timestamp());
    assert_eq!(first.event_type, first.data.event_type_name());
    assert_eq!(
        first.metadata,
        Some(serde_json::json!({ "user_name": "fixture-user" }))
    );
}

#[tokio::test]
async fn test_time_range_and_global_log() {
    let net = test_network().await;
    run_scenario(&net).await;

    let in_range = net
        .store
        .read_events_by_time_range(CABLE, fixed_timestamp(), fixed_timestamp())
        .await
        .unwrap();
    assert_eq!(in_range.len(), net.store.read_events(CABLE).await.unwrap().len());

    let before = net
        .store
        .read_events_by_time_range(
            CABLE,
            fixed_timestamp() - Duration::days(2),
            fixed_timestamp() - Duration::days(1),
        )
        .await
        .unwrap();
    assert!(before.is_empty());

    let log = net.store.read_all(1).await.unwrap();
    assert_eq!(log.len(), net.store.len().await);
    assert_eq!(log[0].position, 1);
    assert!(log.windows(2).all(|w| w[1].position == w[0].position + 1));

    let tail = net.store.read_all(log.len() as u64).await.unwrap();
    assert_eq!(tail.len(), 1);
}

#[tokio::test]
async fn test_stored_log_survives_json() {
    let net = test_network().await;
    run_scenario(&net).await;

    for stored in net.store.read_all(1).await.unwrap() {
        let json = serde_json::to_string(&stored.data).unwrap();
        let back: UtilityNetworkEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stored.data);
    }
}
