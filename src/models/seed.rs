//! Ground seed files: a TOML description of a venue's lanes and targets.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{ArcheryGround, GroundId, NewLane, NewTarget};

/// Root seed structure describing one archery ground.
///
/// ```toml
/// name = "Waldparcours"
///
/// [[lanes]]
/// name = "Bahn 1"
/// max_distance = 42.0
///
/// [[targets]]
/// name = "Hirsch"
/// zone_size_mm = 260
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundSeed {
    /// Ground display name
    pub name: String,

    /// Lanes in course order
    #[serde(default)]
    pub lanes: Vec<NewLane>,

    /// Targets; each needs a `target_type` or a `zone_size_mm`
    #[serde(default)]
    pub targets: Vec<NewTarget>,
}

impl GroundSeed {
    /// Load seed data from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate that seed data contains required fields.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Ground name is empty"));
        }
        if self.lanes.is_empty() {
            return Err(AppError::validation("No lanes defined in seed data"));
        }
        for target in &self.targets {
            target.resolve_type()?;
        }
        Ok(())
    }

    /// Build the ground, allocating lane and target ids in file order.
    pub fn into_ground(self, id: GroundId) -> Result<ArcheryGround> {
        let mut ground = ArcheryGround::new(id, self.name);
        for lane in self.lanes {
            ground.add_lane(lane)?;
        }
        for target in self.targets {
            ground.add_target(target)?;
        }
        Ok(ground)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TargetType;

    const SEED: &str = r#"
        name = "Waldparcours"

        [[lanes]]
        name = "Bahn 1"
        max_distance = 42.0

        [[lanes]]
        name = "Übungsbahn"
        max_distance = 18.5
        training_only = true
        notes = "next to the parking lot"

        [[targets]]
        name = "Hirsch"
        zone_size_mm = 260

        [[targets]]
        name = "Hase"
        target_type = "ANIMAL_GROUP_4"
    "#;

    #[test]
    fn test_parse_and_build_ground() {
        let seed: GroundSeed = toml::from_str(SEED).unwrap();
        seed.validate().unwrap();

        let ground = seed.into_ground(3).unwrap();
        assert_eq!(ground.id, 3);
        assert_eq!(ground.lanes.len(), 2);
        assert!(ground.lanes[1].training_only);
        assert_eq!(ground.targets[0].target_type, TargetType::AnimalGroup1);
        assert_eq!(ground.targets[1].target_type, TargetType::AnimalGroup4);
        assert_eq!(ground.targets[1].id, 2);
    }

    #[test]
    fn test_validate_requires_lanes() {
        let seed = GroundSeed {
            name: "Leer".to_string(),
            lanes: Vec::new(),
            targets: Vec::new(),
        };
        assert!(seed.validate().is_err());
    }
}
