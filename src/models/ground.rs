// src/models/ground.rs

//! Archery ground, shooting lane and target data structures.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::TargetType;

pub type GroundId = u64;
pub type LaneId = u64;
pub type TargetId = u64;

/// A physical shooting position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShootingLane {
    pub id: LaneId,

    /// Display name (e.g., "Bahn 7")
    pub name: String,

    /// Longest distance the terrain allows, in metres
    pub max_distance: f64,

    /// Only usable for training, excluded from tournaments by default
    #[serde(default)]
    pub training_only: bool,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

/// A physical 3D target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,

    pub name: String,

    pub target_type: TargetType,

    /// Reference to an uploaded picture of the target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default)]
    pub training_only: bool,

    /// Diameter of the killing zone in mm, if it was declared
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_size_mm: Option<u32>,
}

/// Fields for a lane that does not exist yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLane {
    pub name: String,
    pub max_distance: f64,
    #[serde(default)]
    pub training_only: bool,
    #[serde(default)]
    pub notes: String,
}

/// Fields for a target that does not exist yet.
///
/// The type is taken from `target_type` when given, otherwise derived from
/// `zone_size_mm`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTarget {
    pub name: String,
    #[serde(default)]
    pub target_type: Option<TargetType>,
    #[serde(default)]
    pub zone_size_mm: Option<u32>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub training_only: bool,
}

impl NewTarget {
    /// Resolve the target type, deriving it from the zone size if needed.
    pub fn resolve_type(&self) -> Result<TargetType> {
        match (self.target_type, self.zone_size_mm) {
            (Some(target_type), _) => Ok(target_type),
            (None, Some(zone_size)) => Ok(TargetType::from_zone_size(zone_size)),
            (None, None) => Err(AppError::validation(format!(
                "Target '{}' needs a target type or a zone size",
                self.name
            ))),
        }
    }
}

/// A venue with shooting lanes and targets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArcheryGround {
    pub id: GroundId,

    pub name: String,

    #[serde(default)]
    pub lanes: Vec<ShootingLane>,

    #[serde(default)]
    pub targets: Vec<Target>,
}

impl ArcheryGround {
    pub fn new(id: GroundId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            lanes: Vec::new(),
            targets: Vec::new(),
        }
    }

    pub fn lane(&self, id: LaneId) -> Option<&ShootingLane> {
        self.lanes.iter().find(|l| l.id == id)
    }

    pub fn target(&self, id: TargetId) -> Option<&Target> {
        self.targets.iter().find(|t| t.id == id)
    }

    /// Lanes usable for a tournament, optionally including training-only ones.
    pub fn lanes_for_tournament(&self, include_training_only: bool) -> Vec<&ShootingLane> {
        self.lanes
            .iter()
            .filter(|l| include_training_only || !l.training_only)
            .collect()
    }

    /// Targets of one type usable for a tournament.
    pub fn targets_of_type(
        &self,
        target_type: TargetType,
        include_training_only: bool,
    ) -> Vec<&Target> {
        self.targets
            .iter()
            .filter(|t| t.target_type == target_type)
            .filter(|t| include_training_only || !t.training_only)
            .collect()
    }

    /// Add a lane and return its new id.
    pub fn add_lane(&mut self, lane: NewLane) -> Result<LaneId> {
        validate_lane(&lane.name, lane.max_distance)?;
        let id = self.lanes.iter().map(|l| l.id).max().unwrap_or(0) + 1;
        self.lanes.push(ShootingLane {
            id,
            name: lane.name,
            max_distance: lane.max_distance,
            training_only: lane.training_only,
            notes: lane.notes,
        });
        Ok(id)
    }

    /// Replace the editable fields of an existing lane.
    pub fn update_lane(&mut self, id: LaneId, update: NewLane) -> Result<()> {
        validate_lane(&update.name, update.max_distance)?;
        let lane = self
            .lanes
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| AppError::not_found("Lane", id))?;
        lane.name = update.name;
        lane.max_distance = update.max_distance;
        lane.training_only = update.training_only;
        lane.notes = update.notes;
        Ok(())
    }

    /// Remove a lane. Assignments that still reference it are left alone.
    pub fn remove_lane(&mut self, id: LaneId) -> Result<ShootingLane> {
        let index = self
            .lanes
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| AppError::not_found("Lane", id))?;
        Ok(self.lanes.remove(index))
    }

    /// Add a target and return its new id.
    pub fn add_target(&mut self, target: NewTarget) -> Result<TargetId> {
        let target_type = target.resolve_type()?;
        let id = self.targets.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        self.targets.push(Target {
            id,
            name: target.name,
            target_type,
            image: target.image,
            training_only: target.training_only,
            zone_size_mm: target.zone_size_mm,
        });
        Ok(id)
    }

    /// Replace the editable fields of an existing target.
    pub fn update_target(&mut self, id: TargetId, update: NewTarget) -> Result<()> {
        let target_type = update.resolve_type()?;
        let target = self
            .targets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::not_found("Target", id))?;
        target.name = update.name;
        target.target_type = target_type;
        target.image = update.image;
        target.training_only = update.training_only;
        target.zone_size_mm = update.zone_size_mm;
        Ok(())
    }

    pub fn remove_target(&mut self, id: TargetId) -> Result<Target> {
        let index = self
            .targets
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| AppError::not_found("Target", id))?;
        Ok(self.targets.remove(index))
    }

    /// Count targets per type (training-only targets included).
    pub fn target_count_by_type(&self) -> Vec<(TargetType, usize)> {
        TargetType::ALL
            .into_iter()
            .map(|t| (t, self.targets.iter().filter(|x| x.target_type == t).count()))
            .collect()
    }
}

fn validate_lane(name: &str, max_distance: f64) -> Result<()> {
    if name.trim().is_empty() {
        return Err(AppError::validation("Lane name is empty"));
    }
    if !(max_distance > 0.0) {
        return Err(AppError::validation(format!(
            "Lane '{name}' needs a max distance > 0 (got {max_distance})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lane(name: &str, max_distance: f64) -> NewLane {
        NewLane {
            name: name.to_string(),
            max_distance,
            training_only: false,
            notes: String::new(),
        }
    }

    #[test]
    fn test_add_lane_allocates_ids() {
        let mut ground = ArcheryGround::new(1, "Waldparcours");
        let first = ground.add_lane(lane("Bahn 1", 30.0)).unwrap();
        let second = ground.add_lane(lane("Bahn 2", 45.0)).unwrap();
        assert_eq!((first, second), (1, 2));

        ground.remove_lane(first).unwrap();
        let third = ground.add_lane(lane("Bahn 3", 20.0)).unwrap();
        assert_eq!(third, 3);
    }

    #[test]
    fn test_add_lane_rejects_non_positive_distance() {
        let mut ground = ArcheryGround::new(1, "Waldparcours");
        assert!(ground.add_lane(lane("Bahn 1", 0.0)).is_err());
        assert!(ground.add_lane(lane("Bahn 1", f64::NAN)).is_err());
        assert!(ground.add_lane(lane(" ", 10.0)).is_err());
    }

    #[test]
    fn test_update_lane_in_place() {
        let mut ground = ArcheryGround::new(1, "Waldparcours");
        let id = ground.add_lane(lane("Bahn 1", 30.0)).unwrap();

        let mut update = lane("Bahn 1a", 35.0);
        update.training_only = true;
        ground.update_lane(id, update).unwrap();

        let updated = ground.lane(id).unwrap();
        assert_eq!(updated.name, "Bahn 1a");
        assert_eq!(updated.max_distance, 35.0);
        assert!(updated.training_only);
        assert!(ground.update_lane(99, lane("x", 1.0)).is_err());
    }

    #[test]
    fn test_add_target_derives_type_from_zone_size() {
        let mut ground = ArcheryGround::new(1, "Waldparcours");
        let id = ground
            .add_target(NewTarget {
                name: "Hirsch".to_string(),
                target_type: None,
                zone_size_mm: Some(260),
                image: None,
                training_only: false,
            })
            .unwrap();
        assert_eq!(
            ground.target(id).unwrap().target_type,
            TargetType::AnimalGroup1
        );

        let missing = ground.add_target(NewTarget {
            name: "Fuchs".to_string(),
            target_type: None,
            zone_size_mm: None,
            image: None,
            training_only: false,
        });
        assert!(missing.is_err());
    }

    #[test]
    fn test_training_only_filters() {
        let mut ground = ArcheryGround::new(1, "Waldparcours");
        ground.add_lane(lane("Bahn 1", 30.0)).unwrap();
        let mut training = lane("Übung", 30.0);
        training.training_only = true;
        ground.add_lane(training).unwrap();

        assert_eq!(ground.lanes_for_tournament(false).len(), 1);
        assert_eq!(ground.lanes_for_tournament(true).len(), 2);
    }

    fn target(name: &str, target_type: TargetType) -> NewTarget {
        NewTarget {
            name: name.to_string(),
            target_type: Some(target_type),
            zone_size_mm: None,
            image: None,
            training_only: false,
        }
    }

    #[test]
    fn test_update_target_rederives_type() {
        let mut ground = ArcheryGround::new(1, "Waldparcours");
        let id = ground.add_target(target("Fuchs", TargetType::AnimalGroup3)).unwrap();

        ground
            .update_target(
                id,
                NewTarget {
                    name: "Dachs".to_string(),
                    target_type: None,
                    zone_size_mm: Some(120),
                    image: Some("dachs.png".to_string()),
                    training_only: true,
                },
            )
            .unwrap();

        let updated = ground.target(id).unwrap();
        assert_eq!(updated.name, "Dachs");
        assert_eq!(updated.target_type, TargetType::AnimalGroup4);
        assert!(updated.training_only);
        assert!(matches!(
            ground.update_target(42, target("x", TargetType::AnimalGroup1)),
            Err(AppError::NotFound { .. })
        ));
    }

    #[test]
    fn test_remove_target_and_count_by_type() {
        let mut ground = ArcheryGround::new(1, "Waldparcours");
        let bear = ground.add_target(target("Bär", TargetType::AnimalGroup1)).unwrap();
        ground.add_target(target("Elch", TargetType::AnimalGroup1)).unwrap();
        ground.add_target(target("Hase", TargetType::AnimalGroup4)).unwrap();

        assert_eq!(
            ground.target_count_by_type(),
            vec![
                (TargetType::AnimalGroup1, 2),
                (TargetType::AnimalGroup2, 0),
                (TargetType::AnimalGroup3, 0),
                (TargetType::AnimalGroup4, 1),
            ]
        );

        assert_eq!(ground.remove_target(bear).unwrap().name, "Bär");
        assert!(ground.target(bear).is_none());
        assert!(ground.remove_target(bear).is_err());
        assert_eq!(ground.target_count_by_type()[0], (TargetType::AnimalGroup1, 1));
    }
}
