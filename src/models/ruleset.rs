//! Ruleset catalog: target types, stakes and their distance tables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Category of a target deciding which stake ranges apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetType {
    AnimalGroup1,
    AnimalGroup2,
    AnimalGroup3,
    AnimalGroup4,
}

impl TargetType {
    pub const ALL: [TargetType; 4] = [
        TargetType::AnimalGroup1,
        TargetType::AnimalGroup2,
        TargetType::AnimalGroup3,
        TargetType::AnimalGroup4,
    ];

    /// Derive the animal group from the diameter of the killing zone in mm.
    pub fn from_zone_size(zone_size_mm: u32) -> Self {
        match zone_size_mm {
            0..=149 => TargetType::AnimalGroup4,
            150..=200 => TargetType::AnimalGroup3,
            201..=250 => TargetType::AnimalGroup2,
            _ => TargetType::AnimalGroup1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::AnimalGroup1 => "ANIMAL_GROUP_1",
            TargetType::AnimalGroup2 => "ANIMAL_GROUP_2",
            TargetType::AnimalGroup3 => "ANIMAL_GROUP_3",
            TargetType::AnimalGroup4 => "ANIMAL_GROUP_4",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TargetType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| AppError::validation(format!("Unknown target type '{s}'")))
    }
}

/// Named shooting marker in front of a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stake {
    Red,
    Blue,
    Yellow,
}

impl Stake {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stake::Red => "red",
            Stake::Blue => "blue",
            Stake::Yellow => "yellow",
        }
    }
}

impl fmt::Display for Stake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive distance range of a stake, in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StakeRange {
    pub stake: Stake,
    pub min: f64,
    pub max: f64,
}

impl StakeRange {
    const fn new(stake: Stake, min: f64, max: f64) -> Self {
        Self { stake, min, max }
    }

    /// Upper bound once the lane's physical maximum is taken into account.
    pub fn capped_max(&self, lane_max_distance: f64) -> f64 {
        self.max.min(lane_max_distance)
    }

    /// Whether `distance` is allowed on a lane reaching `lane_max_distance`.
    pub fn allows(&self, distance: u32, lane_max_distance: Option<f64>) -> bool {
        let max = match lane_max_distance {
            Some(lane_max) => self.capped_max(lane_max),
            None => self.max,
        };
        let distance = f64::from(distance);
        distance >= self.min && distance <= max
    }
}

/// Per-type stake table of a ruleset.
#[derive(Debug, Clone, Copy)]
struct TypeTable {
    target_type: TargetType,
    stakes: &'static [StakeRange],
}

use Stake::{Blue, Red, Yellow};

const DSB_3D: &[TypeTable] = &[
    TypeTable {
        target_type: TargetType::AnimalGroup1,
        stakes: &[
            StakeRange::new(Red, 20.0, 40.0),
            StakeRange::new(Blue, 15.0, 30.0),
            StakeRange::new(Yellow, 10.0, 20.0),
        ],
    },
    TypeTable {
        target_type: TargetType::AnimalGroup2,
        stakes: &[
            StakeRange::new(Red, 15.0, 30.0),
            StakeRange::new(Blue, 10.0, 25.0),
            StakeRange::new(Yellow, 5.0, 15.0),
        ],
    },
    TypeTable {
        target_type: TargetType::AnimalGroup3,
        stakes: &[
            StakeRange::new(Red, 10.0, 25.0),
            StakeRange::new(Blue, 5.0, 20.0),
            StakeRange::new(Yellow, 5.0, 10.0),
        ],
    },
    TypeTable {
        target_type: TargetType::AnimalGroup4,
        stakes: &[
            StakeRange::new(Red, 5.0, 15.0),
            StakeRange::new(Blue, 5.0, 10.0),
            StakeRange::new(Yellow, 3.0, 5.0),
        ],
    },
];

const WA_3D: &[TypeTable] = &[
    TypeTable {
        target_type: TargetType::AnimalGroup1,
        stakes: &[
            StakeRange::new(Red, 25.0, 45.0),
            StakeRange::new(Blue, 15.0, 30.0),
        ],
    },
    TypeTable {
        target_type: TargetType::AnimalGroup2,
        stakes: &[
            StakeRange::new(Red, 20.0, 35.0),
            StakeRange::new(Blue, 10.0, 25.0),
        ],
    },
    TypeTable {
        target_type: TargetType::AnimalGroup3,
        stakes: &[
            StakeRange::new(Red, 10.0, 25.0),
            StakeRange::new(Blue, 5.0, 20.0),
        ],
    },
    TypeTable {
        target_type: TargetType::AnimalGroup4,
        stakes: &[
            StakeRange::new(Red, 5.0, 15.0),
            StakeRange::new(Blue, 5.0, 10.0),
        ],
    },
];

/// Distance table a tournament is shot under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ruleset {
    #[serde(rename = "DSB_3D")]
    Dsb3d,
    #[serde(rename = "WA_3D")]
    Wa3d,
}

impl Ruleset {
    pub const ALL: [Ruleset; 2] = [Ruleset::Dsb3d, Ruleset::Wa3d];

    pub fn as_str(&self) -> &'static str {
        match self {
            Ruleset::Dsb3d => "DSB_3D",
            Ruleset::Wa3d => "WA_3D",
        }
    }

    fn tables(&self) -> &'static [TypeTable] {
        match self {
            Ruleset::Dsb3d => DSB_3D,
            Ruleset::Wa3d => WA_3D,
        }
    }

    /// Target types a tournament under this ruleset is built from.
    pub fn target_types(&self) -> Vec<TargetType> {
        self.tables().iter().map(|t| t.target_type).collect()
    }

    pub fn allows(&self, target_type: TargetType) -> bool {
        self.tables().iter().any(|t| t.target_type == target_type)
    }

    /// Stake ranges for a target type, `None` if the type is not allowed.
    pub fn stakes(&self, target_type: TargetType) -> Option<&'static [StakeRange]> {
        self.tables()
            .iter()
            .find(|t| t.target_type == target_type)
            .map(|t| t.stakes)
    }

    pub fn stake_range(&self, target_type: TargetType, stake: Stake) -> Option<StakeRange> {
        self.stakes(target_type)?
            .iter()
            .find(|r| r.stake == stake)
            .copied()
    }

    /// Shortest stake minimum of `target_type`; shorter lanes cannot host it.
    ///
    /// A lane reaching this may still be too short for a longer stake of the
    /// type. The stake draw reports that case.
    pub fn required_distance(&self, target_type: TargetType) -> Option<f64> {
        self.stakes(target_type)?
            .iter()
            .map(|r| r.min)
            .reduce(f64::min)
    }

    /// Shortest stake minimum over every type of the ruleset.
    pub fn minimum_distance(&self) -> f64 {
        self.tables()
            .iter()
            .flat_map(|t| t.stakes)
            .map(|r| r.min)
            .reduce(f64::min)
            .unwrap_or(0.0)
    }

    /// Whether every target type must appear equally often.
    pub fn requires_group_balance(&self) -> bool {
        matches!(self, Ruleset::Dsb3d)
    }
}

impl fmt::Display for Ruleset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ruleset {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.replace('-', "_");
        Ruleset::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| AppError::validation(format!("Unknown ruleset '{s}'")))
    }
}
