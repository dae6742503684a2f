// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Cutting and Reverting Conduits
//!
//! A conduit from A to E is cut at any subset of its interior nodes, in any
//! order, then every cut is reverted in any order. The structure topology
//! must come back to one segment per structure spanning the whole walk, and
//! replaying the event log must give the same equipment at every step.

use std::sync::Arc;

use cim_utility_network::domain::SpanEquipment;
use cim_utility_network::service::InMemoryNotifier;
use cim_utility_network::UtilityNetworkService;
use proptest::prelude::*;
use uuid::Uuid;

use crate::fixtures::*;

const CONDUIT: Uuid = Uuid::from_u128(0x1_0001);
const A_TO_E: [Uuid; 9] = [A, S1, B, S2, C, S3, D, S4, E];

/// Route node at a node of interest index on `A_TO_E`
fn route_node(index: usize) -> Uuid {
    [A, B, C, D, E][index]
}

/// Interior nodes to cut at, and the order the cuts are reverted in
fn cut_plan() -> impl Strategy<Value = (Vec<usize>, Vec<usize>)> {
    prop::sample::subsequence(vec![1usize, 2, 3], 1..=3)
        .prop_shuffle()
        .prop_flat_map(|cuts| (Just(cuts.clone()), Just(cuts).prop_shuffle()))
}

/// Segment of a structure ending at a node of interest index
fn segment_ending_at(equipment: &SpanEquipment, structure_index: usize, index: usize) -> Option<Uuid> {
    equipment.span_structures[structure_index]
        .span_segments
        .iter()
        .find(|s| s.to_node_of_interest_index == index)
        .map(|s| s.id)
}

fn segment_starting_at(equipment: &SpanEquipment, structure_index: usize, index: usize) -> Option<Uuid> {
    equipment.span_structures[structure_index]
        .span_segments
        .iter()
        .find(|s| s.from_node_of_interest_index == index)
        .map(|s| s.id)
}

/// Equipment after the cuts, after the reverts, and as replayed from the log
struct Outcome {
    cut: SpanEquipment,
    reverted: SpanEquipment,
    replayed: SpanEquipment,
}

fn run(cuts: &[usize], reverts: &[usize]) -> Outcome {
    tokio_test::block_on(async {
        let net = test_network().await;
        net.place_conduit(CONDUIT, &A_TO_E).await;

        for &index in cuts {
            let conduit = net.equipment(CONDUIT).await;
            let crossing: Vec<Uuid> = conduit
                .active_structures()
                .filter_map(|(_, structure)| {
                    structure
                        .span_segments
                        .iter()
                        .find(|s| s.from_node_of_interest_index < index && s.to_node_of_interest_index > index)
                        .map(|s| s.id)
                })
                .collect();

            net.service
                .cut_span_segments_at_route_node(&ctx(), route_node(index), &crossing)
                .await
                .unwrap();
        }
        let cut = net.equipment(CONDUIT).await;

        for &index in reverts {
            let conduit = net.equipment(CONDUIT).await;
            let halves = [
                segment_ending_at(&conduit, 0, index).unwrap(),
                segment_starting_at(&conduit, 0, index).unwrap(),
            ];

            net.service
                .connect_span_segments_at_route_node(&ctx(), route_node(index), &halves)
                .await
                .unwrap();
        }
        let reverted = net.equipment(CONDUIT).await;

        let replay = UtilityNetworkService::new(
            net.store.clone(),
            net.route_network.clone(),
            Arc::new(InMemoryNotifier::new()),
            "UtilityNetworkReplay",
        );
        replay.rebuild_projection().await.unwrap();
        let replayed = replay
            .graph()
            .await
            .try_get_span_equipment(CONDUIT)
            .cloned()
            .unwrap();

        Outcome {
            cut,
            reverted,
            replayed,
        }
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: every cut adds one segment to every structure
    #[test]
    fn prop_cuts_split_every_structure((cuts, reverts) in cut_plan()) {
        let outcome = run(&cuts, &reverts);

        for (_, structure) in outcome.cut.active_structures() {
            prop_assert_eq!(structure.span_segments.len(), cuts.len() + 1);
        }
    }

    /// Property: segments of a structure tile the walk without gaps
    #[test]
    fn prop_cut_segments_are_contiguous((cuts, reverts) in cut_plan()) {
        let outcome = run(&cuts, &reverts);

        for (_, structure) in outcome.cut.active_structures() {
            let mut segments: Vec<_> = structure.span_segments.iter().collect();
            segments.sort_by_key(|s| s.from_node_of_interest_index);

            prop_assert_eq!(segments[0].from_node_of_interest_index, 0);
            prop_assert_eq!(segments[segments.len() - 1].to_node_of_interest_index, 4);
            for pair in segments.windows(2) {
                prop_assert_eq!(pair[0].to_node_of_interest_index, pair[1].from_node_of_interest_index);
            }
        }
    }

    /// Property: reverting every cut restores one segment per structure
    #[test]
    fn prop_reverting_all_cuts_restores_topology((cuts, reverts) in cut_plan()) {
        let outcome = run(&cuts, &reverts);

        for (_, structure) in outcome.reverted.active_structures() {
            prop_assert_eq!(structure.span_segments.len(), 1);
            prop_assert_eq!(structure.span_segments[0].from_node_of_interest_index, 0);
            prop_assert_eq!(structure.span_segments[0].to_node_of_interest_index, 4);
            prop_assert!(!structure.span_segments[0].is_connected());
        }
    }

    /// Property: the projection folded from the log equals the live one
    #[test]
    fn prop_replay_matches_live_projection((cuts, reverts) in cut_plan()) {
        let outcome = run(&cuts, &reverts);

        prop_assert_eq!(outcome.replayed, outcome.reverted);
    }
}
