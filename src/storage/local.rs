//! Local filesystem storage implementation.
//!
//! Every entity lives in its own JSON file. Writes go to a temporary file
//! that is renamed over the target, so a tournament's assignment set is
//! always replaced as a whole. Writers are serialized by an async mutex.
//!
//! ## Storage Layout
//!
//! ```text
//! {root}/
//! ├── grounds/
//! │   └── {id}.json
//! └── tournaments/
//!     └── {id}.json
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::{AppError, Result};
use crate::models::{ArcheryGround, GroundId, Tournament, TournamentId};
use crate::storage::{TournamentStorage, WriteMetadata};

const GROUNDS_DIR: &str = "grounds";
const TOURNAMENTS_DIR: &str = "tournaments";

/// Local filesystem storage backend.
#[derive(Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    fn ground_key(id: GroundId) -> String {
        format!("{GROUNDS_DIR}/{id}.json")
    }

    fn tournament_key(id: TournamentId) -> String {
        format!("{TOURNAMENTS_DIR}/{id}.json")
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Write JSON data.
    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(key, &bytes).await
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read JSON data.
    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_bytes(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Ids stored in a directory, ascending. Missing directory means none.
    async fn stored_ids(&self, dir: &str) -> Result<Vec<u64>> {
        let mut entries = match tokio::fs::read_dir(self.path(dir)).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(AppError::Io(e)),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<u64>().ok())
            {
                ids.push(id);
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }

    async fn next_id(&self, dir: &str) -> Result<u64> {
        let ids = self.stored_ids(dir).await?;
        Ok(ids.last().map_or(1, |max| max + 1))
    }
}

#[async_trait]
impl TournamentStorage for LocalStorage {
    async fn load_ground(&self, id: GroundId) -> Result<ArcheryGround> {
        self.read_json(&Self::ground_key(id))
            .await?
            .ok_or_else(|| AppError::not_found("Archery ground", id))
    }

    async fn insert_ground(&self, mut ground: ArcheryGround) -> Result<GroundId> {
        let _guard = self.write_lock.lock().await;

        let id = self.next_id(GROUNDS_DIR).await?;
        ground.id = id;
        self.write_json(&Self::ground_key(id), &ground).await?;

        log::info!(
            "Stored ground {} '{}' with {} lanes and {} targets",
            id,
            ground.name,
            ground.lanes.len(),
            ground.targets.len()
        );
        Ok(id)
    }

    async fn update_ground(&self, ground: &ArcheryGround) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let key = Self::ground_key(ground.id);
        if self.read_bytes(&key).await?.is_none() {
            return Err(AppError::not_found("Archery ground", ground.id));
        }
        self.write_json(&key, ground).await
    }

    async fn load_tournament(&self, id: TournamentId) -> Result<Tournament> {
        self.read_json(&Self::tournament_key(id))
            .await?
            .ok_or_else(|| AppError::not_found("Tournament", id))
    }

    async fn insert_tournament(&self, mut tournament: Tournament) -> Result<TournamentId> {
        let _guard = self.write_lock.lock().await;

        let id = self.next_id(TOURNAMENTS_DIR).await?;
        tournament.id = id;
        tournament.revision = 1;
        self.write_json(&Self::tournament_key(id), &tournament).await?;

        log::info!(
            "Stored tournament {} '{}' with {} assignments",
            id,
            tournament.name,
            tournament.assignments.len()
        );
        Ok(id)
    }

    async fn save_tournament(&self, tournament: &Tournament) -> Result<WriteMetadata> {
        let _guard = self.write_lock.lock().await;

        let key = Self::tournament_key(tournament.id);
        let stored: Tournament = self
            .read_json(&key)
            .await?
            .ok_or_else(|| AppError::not_found("Tournament", tournament.id))?;

        if stored.revision != tournament.revision {
            log::warn!(
                "Rejected stale save of tournament {} (revision {}, stored {})",
                tournament.id,
                tournament.revision,
                stored.revision
            );
            return Err(AppError::Conflict {
                tournament_id: tournament.id,
                expected: tournament.revision,
                found: stored.revision,
            });
        }

        let mut updated = tournament.clone();
        updated.revision = stored.revision + 1;
        self.write_json(&key, &updated).await?;

        log::info!(
            "Saved tournament {} at revision {} ({} assignments)",
            updated.id,
            updated.revision,
            updated.assignments.len()
        );
        Ok(WriteMetadata {
            revision: updated.revision,
            assignment_count: updated.assignments.len(),
            timestamp: Utc::now(),
        })
    }

    async fn list_tournaments(&self) -> Result<Vec<Tournament>> {
        let mut tournaments = Vec::new();
        for id in self.stored_ids(TOURNAMENTS_DIR).await? {
            if let Some(tournament) = self.read_json(&Self::tournament_key(id)).await? {
                tournaments.push(tournament);
            }
        }
        Ok(tournaments)
    }
}
