// Copyright (c) 2025 - Cowboy AI, Inc.
//! Node Container and Terminal Equipment Service Tests

mod fixtures;

use cim_utility_network::aggregate::{ErrorCode, TerminalEquipmentPlacement};
use cim_utility_network::domain::{NamingInfo, NodeContainerSide};
use cim_utility_network::service::{categories, entity_types};
use pretty_assertions::assert_eq;
use uuid::Uuid;

use fixtures::*;

const CONDUIT: Uuid = Uuid::from_u128(0x1_0001);
const CONDUIT_2: Uuid = Uuid::from_u128(0x1_0002);
const CABLE: Uuid = Uuid::from_u128(0x2_0001);
const CABINET: Uuid = Uuid::from_u128(0x4_0001);
const CABINET_2: Uuid = Uuid::from_u128(0x4_0002);
const RACK: Uuid = Uuid::from_u128(0x4_1001);
const CLOSURE: Uuid = Uuid::from_u128(0x5_0001);
const PATCH_PANEL: Uuid = Uuid::from_u128(0x5_0002);
const SECOND_PANEL: Uuid = Uuid::from_u128(0x5_0003);

async fn place_cabinet(net: &TestNetwork, node_container_id: Uuid, route_node_id: Uuid) {
    net.service
        .place_node_container_in_route_network(
            &ctx(),
            node_container_id,
            CABINET_SPEC,
            route_node_id,
            Some(MANUFACTURER_ID),
            Some(NamingInfo::named("Cabinet")),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_place_node_container() {
    let net = test_network().await;

    place_cabinet(&net, CABINET, B).await;

    let graph = net.graph().await;
    let container = graph.node_container_at(B).expect("container at B");
    assert_eq!(container.id, CABINET);
    assert_eq!(container.manufacturer_id, Some(MANUFACTURER_ID));

    let notification = net.last_notification().await;
    assert_eq!(notification.category, categories::NODE_CONTAINER_PLACED);
    assert_eq!(notification.id_change_sets[0].entity_type, entity_types::NODE_CONTAINER);
    assert_eq!(notification.affected_route_network_element_ids, vec![B]);
}

#[tokio::test]
async fn test_node_container_placement_rejections() {
    let net = test_network().await;
    place_cabinet(&net, CABINET, B).await;

    let err = net
        .service
        .place_node_container_in_route_network(&ctx(), CABINET_2, CABINET_SPEC, B, None, None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidCommand);

    let err = net
        .service
        .place_node_container_in_route_network(&ctx(), CABINET_2, CABINET_SPEC, S1, None, None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidCommand);

    let err = net
        .service
        .place_node_container_in_route_network(&ctx(), CABINET_2, CABINET_SPEC, C, Some(id(0xBAD)), None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ManufacturerNotInSpecification);

    assert!(net.graph().await.try_get_node_container(CABINET_2).is_none());
}

#[tokio::test]
async fn test_rack_mounted_terminal_equipment() {
    let net = test_network().await;
    place_cabinet(&net, CABINET, B).await;

    net.service
        .add_rack_to_node_container(&ctx(), CABINET, RACK, RACK_SPEC, "R1", 10)
        .await
        .unwrap();
    assert_eq!(net.last_notification().await.category, categories::RACK_ADDED);

    let err = net
        .service
        .add_rack_to_node_container(&ctx(), CABINET, id(0x4_1002), RACK_SPEC, "R1", 10)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::RackNameAlreadyExists);

    net.service
        .place_terminal_equipment_in_node_container(
            &ctx(),
            PATCH_PANEL,
            CLOSURE_SPEC,
            CABINET,
            TerminalEquipmentPlacement::Rack {
                rack_id: RACK,
                position_in_rack: 1,
                height_in_units: 2,
            },
            None,
        )
        .await
        .unwrap();

    let err = net
        .service
        .place_terminal_equipment_in_node_container(
            &ctx(),
            SECOND_PANEL,
            CLOSURE_SPEC,
            CABINET,
            TerminalEquipmentPlacement::Rack {
                rack_id: RACK,
                position_in_rack: 2,
                height_in_units: 1,
            },
            None,
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::RackSpaceOccupied);
    assert!(net.graph().await.try_get_terminal_equipment(SECOND_PANEL).is_none());

    let graph = net.graph().await;
    let container = graph.try_get_node_container(CABINET).unwrap();
    assert_eq!(container.racks[0].sub_rack_mounts.len(), 1);
    assert_eq!(container.racks[0].sub_rack_mounts[0].terminal_equipment_id, PATCH_PANEL);

    let panel = graph.try_get_terminal_equipment(PATCH_PANEL).unwrap();
    assert_eq!(panel.node_container_id, CABINET);
    assert_eq!(panel.terminal_structures.len(), 1);
    assert_eq!(panel.terminal_structures[0].terminals.len(), 4);
}

#[tokio::test]
async fn test_terminal_structures_follow_connections() {
    let net = test_network().await;
    net.place_cable(CABLE, &[A, S1, B]).await;
    let terminals = net.place_closure(CABINET, CLOSURE, B).await;
    let fiber = net.segment(CABLE, 1, 1).await;

    net.service
        .add_additional_terminal_structures(&ctx(), CLOSURE, SPLICE_TRAY_SPEC, 2)
        .await
        .unwrap();
    let closure = net.graph().await.try_get_terminal_equipment(CLOSURE).cloned().unwrap();
    assert_eq!(closure.terminal_structures.len(), 3);
    assert_eq!(net.last_notification().await.category, categories::TERMINAL_STRUCTURES_ADDED);

    net.service
        .connect_cable_to_terminals(
            &ctx(),
            CABLE,
            B,
            &[cim_utility_network::events::span_equipment::SpanSegmentTerminalRef {
                span_segment_id: fiber,
                terminal_id: terminals[0],
            }],
        )
        .await
        .unwrap();

    let err = net
        .service
        .remove_terminal_structure(&ctx(), CLOSURE, 0)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::TerminalStructureConnected);

    net.service
        .remove_terminal_structure(&ctx(), CLOSURE, 2)
        .await
        .unwrap();
    let closure = net.graph().await.try_get_terminal_equipment(CLOSURE).cloned().unwrap();
    assert!(closure.terminal_structures[2].deleted);
    assert!(!closure.terminal_structures[0].deleted);

    net.service
        .change_terminal_equipment_naming_info(&ctx(), CLOSURE, Some(NamingInfo::named("SC-1")))
        .await
        .unwrap();
    let notification = net.last_notification().await;
    assert_eq!(notification.category, categories::TERMINAL_EQUIPMENT_PROPERTIES_UPDATED);
    assert_eq!(notification.affected_route_network_element_ids, vec![B]);
}

#[tokio::test]
async fn test_container_with_content_cannot_be_removed() {
    let net = test_network().await;
    net.place_conduit(CONDUIT, &[A, S1, B, S2, C]).await;
    place_cabinet(&net, CABINET, B).await;

    net.service
        .affix_span_equipment_to_node_container(&ctx(), CONDUIT, CABINET, NodeContainerSide::West)
        .await
        .unwrap();
    assert_eq!(net.equipment(CONDUIT).await.node_container_affixes.len(), 1);

    let err = net.service.remove_node_container(&ctx(), CABINET).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NodeContainerNotEmpty);

    net.service
        .detach_span_equipment_from_node_container(&ctx(), CONDUIT, CABINET)
        .await
        .unwrap();
    assert_eq!(net.last_notification().await.category, categories::DETACHED_FROM_CONTAINER);

    net.service.remove_node_container(&ctx(), CABINET).await.unwrap();

    assert!(net.graph().await.node_container_at(B).is_none());
    assert_eq!(net.last_notification().await.category, categories::NODE_CONTAINER_REMOVED);
}

#[tokio::test]
async fn test_affixed_ends_are_connected_instead_of_merged() {
    let net = test_network().await;
    net.place_conduit(CONDUIT, &[A, S1, B]).await;
    net.place_conduit(CONDUIT_2, &[B, S2, C]).await;
    place_cabinet(&net, CABINET, B).await;
    net.service
        .affix_span_equipment_to_node_container(&ctx(), CONDUIT, CABINET, NodeContainerSide::West)
        .await
        .unwrap();

    let outer = net.segment(CONDUIT, 0, 1).await;
    let other_outer = net.segment(CONDUIT_2, 0, 1).await;
    net.service
        .connect_span_segments_at_route_node(&ctx(), B, &[outer, other_outer])
        .await
        .unwrap();

    assert_eq!(net.last_notification().await.category, categories::CONNECT);
    assert!(net.graph().await.try_get_span_equipment(CONDUIT_2).is_some());
    assert_eq!(
        net.equipment(CONDUIT).await.span_structures[0].span_segments[0].to_terminal_id,
        net.equipment(CONDUIT_2).await.span_structures[0].span_segments[0].from_terminal_id
    );
}
