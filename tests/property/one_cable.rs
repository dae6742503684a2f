// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Cable Occupancy
//!
//! An inner tube carries at most one cable, while the outer structure of a
//! multi-level conduit takes any number of them.

use cim_utility_network::aggregate::ErrorCode;
use proptest::prelude::*;
use uuid::Uuid;

use crate::fixtures::*;

const CONDUIT: Uuid = Uuid::from_u128(0x1_0001);
const A_TO_C: [Uuid; 5] = [A, S1, B, S2, C];

fn cable_id(n: usize) -> Uuid {
    id(0x2_0000 + n as u128)
}

/// Error codes of affixing `count` cables one after another to a structure
fn affix_cables(count: usize, structure_index: usize) -> Vec<Option<ErrorCode>> {
    tokio_test::block_on(async {
        let net = test_network().await;
        net.place_conduit(CONDUIT, &A_TO_C).await;
        let parent = net.segment(CONDUIT, structure_index, 1).await;

        let mut results = Vec::with_capacity(count);
        for n in 1..=count {
            net.place_cable(cable_id(n), &A_TO_C).await;
            let result = net
                .service
                .affix_span_equipment_to_parent(&ctx(), cable_id(n), parent)
                .await;
            results.push(result.err().map(|e| e.code()));
        }
        results
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Property: only the first cable lands in an inner tube
    #[test]
    fn prop_inner_tube_takes_one_cable(count in 2usize..6, tube in 1usize..=2) {
        let results = affix_cables(count, tube);

        prop_assert_eq!(results[0], None);
        for code in &results[1..] {
            prop_assert_eq!(*code, Some(ErrorCode::ConduitAlreadyContainsCable));
        }
    }

    /// Property: the outer structure takes every cable
    #[test]
    fn prop_outer_structure_takes_all_cables(count in 1usize..6) {
        let results = affix_cables(count, 0);

        prop_assert!(results.iter().all(Option::is_none));
    }

    /// Property: a detached cable frees the tube for the next one
    #[test]
    fn prop_detach_frees_inner_tube(tube in 1usize..=2) {
        let second = tokio_test::block_on(async {
            let net = test_network().await;
            net.place_conduit(CONDUIT, &A_TO_C).await;
            net.place_cable(cable_id(1), &A_TO_C).await;
            net.place_cable(cable_id(2), &A_TO_C).await;
            let parent = net.segment(CONDUIT, tube, 1).await;

            net.service
                .affix_span_equipment_to_parent(&ctx(), cable_id(1), parent)
                .await
                .unwrap();
            net.service
                .detach_span_equipment_from_parent(&ctx(), cable_id(1), parent)
                .await
                .unwrap();
            net.service
                .affix_span_equipment_to_parent(&ctx(), cable_id(2), parent)
                .await
                .err()
                .map(|e| e.code())
        });

        prop_assert_eq!(second, None);
    }
}
