// src/validation/test_support.rs

//! Shared fixtures for the rule tests.

use crate::models::{
    ArcheryGround, DraftAssignment, NewLane, NewTarget, Stake, StakeDistances, TargetId,
    TargetType,
};

/// Four 50 m lanes; targets 1-4 are groups 1-4, target 5 is a second group 1.
pub fn ground() -> ArcheryGround {
    let mut ground = ArcheryGround::new(1, "Waldparcours");
    for i in 1..=4 {
        ground
            .add_lane(NewLane {
                name: format!("Bahn {i}"),
                max_distance: 50.0,
                training_only: false,
                notes: String::new(),
            })
            .unwrap();
    }
    let targets = [
        ("Bär", TargetType::AnimalGroup1),
        ("Hirsch", TargetType::AnimalGroup2),
        ("Fuchs", TargetType::AnimalGroup3),
        ("Hase", TargetType::AnimalGroup4),
        ("Wildschwein", TargetType::AnimalGroup1),
    ];
    for (name, target_type) in targets {
        ground
            .add_target(NewTarget {
                name: name.to_string(),
                target_type: Some(target_type),
                zone_size_mm: None,
                image: None,
                training_only: false,
            })
            .unwrap();
    }
    ground
}

/// DSB_3D distances inside every range of the type.
pub fn valid_stakes(target_type: TargetType) -> StakeDistances {
    let (red, blue, yellow) = match target_type {
        TargetType::AnimalGroup1 => (30, 20, 15),
        TargetType::AnimalGroup2 => (20, 15, 10),
        TargetType::AnimalGroup3 => (15, 10, 8),
        TargetType::AnimalGroup4 => (10, 8, 4),
    };
    StakeDistances::from([(Stake::Red, red), (Stake::Blue, blue), (Stake::Yellow, yellow)])
}

fn fixture_type(target_id: TargetId) -> TargetType {
    match target_id {
        2 => TargetType::AnimalGroup2,
        3 => TargetType::AnimalGroup3,
        4 => TargetType::AnimalGroup4,
        _ => TargetType::AnimalGroup1,
    }
}

/// A row with valid DSB_3D stakes for the fixture target.
pub fn draft(round: u32, lane_id: u64, target_id: TargetId) -> DraftAssignment {
    DraftAssignment {
        round,
        lane_id,
        target_id,
        stakes: valid_stakes(fixture_type(target_id)),
    }
}

/// Lane `n` hosts target `n` in every round.
pub fn balanced_rounds(rounds: u32) -> Vec<DraftAssignment> {
    (1..=rounds)
        .flat_map(|round| (1..=4).map(move |n| draft(round, n, n)))
        .collect()
}
