//! Storage abstractions for grounds and tournaments.
//!
//! ## Directory Structure
//!
//! ```text
//! storage/
//! ├── config.toml           # Planner configuration
//! ├── grounds/
//! │   └── {id}.json         # Archery ground with lanes and targets
//! └── tournaments/
//!     └── {id}.json         # Tournament with its current assignment set
//! ```

pub mod local;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{ArcheryGround, GroundId, Tournament, TournamentId};

pub use local::LocalStorage;

/// Metadata about a tournament write.
#[derive(Debug, Clone)]
pub struct WriteMetadata {
    /// Revision now stored
    pub revision: u64,
    /// Number of assignments written
    pub assignment_count: usize,
    /// Timestamp of the write
    pub timestamp: DateTime<Utc>,
}

/// Trait for ground and tournament storage backends.
#[async_trait]
pub trait TournamentStorage: Send + Sync {
    /// Load a ground, failing with `NotFound` if it does not exist.
    async fn load_ground(&self, id: GroundId) -> Result<ArcheryGround>;

    /// Store a new ground under a freshly allocated id.
    async fn insert_ground(&self, ground: ArcheryGround) -> Result<GroundId>;

    /// Overwrite an existing ground.
    async fn update_ground(&self, ground: &ArcheryGround) -> Result<()>;

    /// Load a tournament, failing with `NotFound` if it does not exist.
    async fn load_tournament(&self, id: TournamentId) -> Result<Tournament>;

    /// Store a new tournament under a freshly allocated id, at revision 1.
    async fn insert_tournament(&self, tournament: Tournament) -> Result<TournamentId>;

    /// Replace a stored tournament, assignments included, in one write.
    ///
    /// `tournament.revision` must match the stored revision, otherwise the
    /// save is rejected with `Conflict`. The stored revision is incremented.
    async fn save_tournament(&self, tournament: &Tournament) -> Result<WriteMetadata>;

    /// All stored tournaments, ordered by id.
    async fn list_tournaments(&self) -> Result<Vec<Tournament>>;
}
