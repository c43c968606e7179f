//! Parcours CLI
//!
//! Local entry point working on a storage directory of JSON files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use parcours::{
    config::{load_config, load_ground_seed},
    error::{AppError, Result},
    models::{
        ArcheryGround, Config, DraftAssignment, GenerationOptions, NewLane, NewTarget, Ruleset,
        StakeDistances, TargetType, Tournament,
    },
    services::{DraftOutcome, GenerationRequest, TournamentPlanner},
    storage::{LocalStorage, TournamentStorage},
    utils::{log as out, planner_rng},
    validation::ValidationResult,
};

/// Parcours - 3D archery tournament planner
#[derive(Parser, Debug)]
#[command(
    name = "parcours",
    version,
    about = "Plans 3D archery tournaments on a shooting ground"
)]
struct Cli {
    /// Path to storage directory containing config and data files
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Flags overriding the configured generation options.
#[derive(Args, Debug)]
struct OptionFlags {
    /// Draw new stake distances every round
    #[arg(long)]
    randomize_stakes: bool,

    /// Also use training-only lanes and targets
    #[arg(long)]
    include_training_only: bool,

    /// Seed for reproducible runs (overrides config)
    #[arg(long)]
    seed: Option<u64>,
}

impl OptionFlags {
    fn options(&self, config: &Config) -> GenerationOptions {
        let defaults = config.generation.options();
        GenerationOptions {
            randomize_stakes_between_rounds: self.randomize_stakes
                || defaults.randomize_stakes_between_rounds,
            include_training_only: self.include_training_only || defaults.include_training_only,
        }
    }

    fn rng(&self, config: &Config) -> rand_chacha::ChaCha8Rng {
        planner_rng(self.seed.or(config.generation.seed))
    }
}

/// Editable lane fields.
#[derive(Args, Debug)]
struct LaneArgs {
    /// Lane name
    #[arg(long)]
    name: String,

    /// Longest shooting distance the lane allows (m)
    #[arg(long)]
    max_distance: f64,

    /// Only use the lane for training
    #[arg(long)]
    training_only: bool,

    #[arg(long, default_value = "")]
    notes: String,
}

impl From<LaneArgs> for NewLane {
    fn from(args: LaneArgs) -> Self {
        NewLane {
            name: args.name,
            max_distance: args.max_distance,
            training_only: args.training_only,
            notes: args.notes,
        }
    }
}

/// Editable target fields.
#[derive(Args, Debug)]
struct TargetArgs {
    /// Target name
    #[arg(long)]
    name: String,

    /// Target type (ANIMAL_GROUP_1..4); derived from the zone size when omitted
    #[arg(long)]
    target_type: Option<TargetType>,

    /// Kill zone size in millimetres
    #[arg(long)]
    zone_size: Option<u32>,

    /// Image reference
    #[arg(long)]
    image: Option<String>,

    /// Only use the target for training
    #[arg(long)]
    training_only: bool,
}

impl From<TargetArgs> for NewTarget {
    fn from(args: TargetArgs) -> Self {
        NewTarget {
            name: args.name,
            target_type: args.target_type,
            zone_size_mm: args.zone_size,
            image: args.image,
            training_only: args.training_only,
        }
    }
}

#[derive(Subcommand, Debug)]
enum GroundAction {
    /// Add a lane
    AddLane(LaneArgs),

    /// Replace a lane's fields
    UpdateLane {
        /// Lane id
        lane: u64,

        #[command(flatten)]
        fields: LaneArgs,
    },

    /// Remove a lane
    RemoveLane {
        /// Lane id
        lane: u64,
    },

    /// Add a target
    AddTarget(TargetArgs),

    /// Replace a target's fields
    UpdateTarget {
        /// Target id
        target: u64,

        #[command(flatten)]
        fields: TargetArgs,
    },

    /// Remove a target
    RemoveTarget {
        /// Target id
        target: u64,
    },
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import an archery ground from a TOML seed file
    ImportGround {
        /// Path to the seed file
        seed: PathBuf,
    },

    /// Show a stored ground, or edit its lanes and targets
    Ground {
        /// Ground id
        ground: u64,

        #[command(subcommand)]
        action: Option<GroundAction>,
    },

    /// Generate a new tournament on a ground
    Generate {
        /// Ground id
        #[arg(long)]
        ground: u64,

        /// Tournament name
        #[arg(long)]
        name: String,

        /// Event date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        /// Ruleset (DSB_3D, WA_3D); config default when omitted
        #[arg(long)]
        ruleset: Option<Ruleset>,

        /// Number of targets; config default when omitted
        #[arg(long)]
        targets: Option<u32>,

        #[command(flatten)]
        flags: OptionFlags,
    },

    /// Replace a tournament's assignments with a fresh generation run
    Regenerate {
        /// Tournament id
        tournament: u64,

        #[command(flatten)]
        flags: OptionFlags,
    },

    /// Check a stored tournament, or the configuration when no id is given
    Validate {
        /// Tournament id
        tournament: Option<u64>,
    },

    /// Validate a manually edited assignment list (JSON) and save it
    ApplyDraft {
        /// Tournament id
        tournament: u64,

        /// JSON file with `[{round, lane_id, target_id, stakes}]` rows
        draft: PathBuf,
    },

    /// Show a tournament, or list all tournaments when no id is given
    Show {
        /// Tournament id
        tournament: Option<u64>,
    },

    /// Print the stake distance tables of every ruleset
    Rulesets,
}

/// Initialize logging based on verbosity flag and configured level.
fn init_logging(verbose: bool, configured: &str) {
    let level = if verbose { "debug" } else { configured };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.storage_dir.join("config.toml");
    let configured_level = Config::load(&config_path)
        .map(|c| c.logging.level)
        .unwrap_or_else(|_| "info".to_string());
    init_logging(cli.verbose, &configured_level);

    let config = Arc::new(load_config(&config_path)?);
    log::debug!("Using storage directory {}", cli.storage_dir.display());

    let storage = LocalStorage::new(&cli.storage_dir);
    let planner = TournamentPlanner::new(Arc::clone(&config));

    match cli.command {
        Command::ImportGround { seed } => {
            let seed = load_ground_seed(&seed)?;
            let ground = seed.into_ground(0)?;
            let id = storage.insert_ground(ground).await?;
            log::info!("Imported ground {}", id);
        }

        Command::Ground { ground, action } => {
            let mut ground = storage.load_ground(ground).await?;
            if let Some(action) = action {
                edit_ground(&mut ground, action)?;
                storage.update_ground(&ground).await?;
            }
            print_ground(&ground);
        }

        Command::Generate {
            ground,
            name,
            date,
            ruleset,
            targets,
            flags,
        } => {
            let request = GenerationRequest {
                ground_id: ground,
                name,
                event_date: date,
                ruleset: ruleset.unwrap_or(config.generation.default_ruleset),
                target_count: targets.unwrap_or(config.generation.default_target_count),
                options: flags.options(&config),
            };
            let mut rng = flags.rng(&config);

            let id = planner.generate(&storage, request, &mut rng).await?;
            let tournament = storage.load_tournament(id).await?;
            print_tournament(&storage, &tournament).await?;
        }

        Command::Regenerate { tournament, flags } => {
            let mut rng = flags.rng(&config);
            let tournament = planner
                .regenerate(&storage, tournament, flags.options(&config), &mut rng)
                .await?;
            print_tournament(&storage, &tournament).await?;
        }

        Command::Validate { tournament: None } => {
            log::info!("Validating configuration...");
            config.validate()?;
            log::info!("✓ Config OK (ruleset {})", config.generation.default_ruleset);
        }

        Command::Validate {
            tournament: Some(id),
        } => {
            let result = planner.validate(&storage, id).await?;
            if result.is_valid() {
                log::info!("✓ Tournament {} passes every rule", id);
            } else {
                print_issues(&result);
                return Err(AppError::validation(format!(
                    "Tournament {} has {} issue(s)",
                    id,
                    result.len()
                )));
            }
        }

        Command::ApplyDraft { tournament, draft } => {
            let rows = read_draft(&draft)?;
            match planner.apply_draft(&storage, tournament, rows).await? {
                DraftOutcome::Saved(saved) => {
                    log::info!(
                        "Draft saved to tournament {} (revision {})",
                        saved.id,
                        saved.revision
                    );
                }
                DraftOutcome::Rejected(result) => {
                    print_issues(&result);
                    return Err(AppError::validation(format!(
                        "Draft rejected with {} issue(s)",
                        result.len()
                    )));
                }
            }
        }

        Command::Show { tournament: Some(id) } => {
            let tournament = storage.load_tournament(id).await?;
            print_tournament(&storage, &tournament).await?;
        }

        Command::Show { tournament: None } => {
            let tournaments = storage.list_tournaments().await?;
            if tournaments.is_empty() {
                log::info!("No tournaments stored yet.");
            }
            for t in tournaments {
                log::info!(
                    "#{} {} ({}, {}, {} targets, ground {})",
                    t.id,
                    t.name,
                    t.event_date,
                    t.ruleset,
                    t.number_of_targets,
                    t.ground_id
                );
            }
        }

        Command::Rulesets => print_rulesets(),
    }

    Ok(())
}

fn edit_ground(ground: &mut ArcheryGround, action: GroundAction) -> Result<()> {
    match action {
        GroundAction::AddLane(fields) => {
            let id = ground.add_lane(fields.into())?;
            log::info!("Added lane {} to ground {}", id, ground.id);
        }
        GroundAction::UpdateLane { lane, fields } => {
            ground.update_lane(lane, fields.into())?;
            log::info!("Updated lane {}", lane);
        }
        GroundAction::RemoveLane { lane } => {
            let removed = ground.remove_lane(lane)?;
            log::info!("Removed lane {} '{}'", lane, removed.name);
        }
        GroundAction::AddTarget(fields) => {
            let id = ground.add_target(fields.into())?;
            log::info!("Added target {} to ground {}", id, ground.id);
        }
        GroundAction::UpdateTarget { target, fields } => {
            ground.update_target(target, fields.into())?;
            log::info!("Updated target {}", target);
        }
        GroundAction::RemoveTarget { target } => {
            let removed = ground.remove_target(target)?;
            log::info!("Removed target {} '{}'", target, removed.name);
        }
    }
    Ok(())
}

fn read_draft(path: &Path) -> Result<Vec<DraftAssignment>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn format_stakes(stakes: &StakeDistances) -> String {
    stakes
        .iter()
        .map(|(stake, distance)| format!("{stake} {distance} m"))
        .collect::<Vec<_>>()
        .join(", ")
}

async fn print_tournament(storage: &LocalStorage, tournament: &Tournament) -> Result<()> {
    let ground = storage.load_ground(tournament.ground_id).await?;

    out::header(&format!(
        "#{} {} - {} ({})",
        tournament.id, tournament.name, tournament.event_date, tournament.ruleset
    ));
    for round in 1..=tournament.round_count() {
        log::info!("Round {}", round);
        let mut assignments: Vec<_> = tournament.assignments_in_round(round).collect();
        assignments.sort_by_key(|a| a.lane_id);
        for a in assignments {
            let lane = ground
                .lane(a.lane_id)
                .map_or_else(|| format!("#{}", a.lane_id), |l| l.name.clone());
            let target = ground.target(a.target_id).map_or_else(
                || format!("#{}", a.target_id),
                |t| format!("{} [{}]", t.name, t.target_type),
            );
            out::sub_item(&format!(
                "{lane}: {target} - {}",
                format_stakes(&a.stakes)
            ));
        }
    }
    out::summary(
        "Tournament",
        &[
            ("Ground", ground.name.clone()),
            ("Rounds", tournament.round_count().to_string()),
            ("Assignments", tournament.assignments.len().to_string()),
            ("Revision", tournament.revision.to_string()),
        ],
    );
    Ok(())
}

fn print_ground(ground: &ArcheryGround) {
    out::header(&format!("#{} {}", ground.id, ground.name));
    log::info!("Lanes");
    for lane in &ground.lanes {
        let training = if lane.training_only { " (training)" } else { "" };
        out::sub_item(&format!(
            "{} {}: up to {} m{training}",
            lane.id, lane.name, lane.max_distance
        ));
    }
    log::info!("Targets");
    for target in &ground.targets {
        let training = if target.training_only { " (training)" } else { "" };
        out::sub_item(&format!(
            "{} {} [{}]{training}",
            target.id, target.name, target.target_type
        ));
    }
    let counts = ground
        .target_count_by_type()
        .into_iter()
        .map(|(target_type, count)| (target_type.as_str(), count.to_string()))
        .collect::<Vec<_>>();
    out::summary("Targets per type", &counts);
}

fn print_issues(result: &ValidationResult) {
    for (row, issues) in result.issues_by_row() {
        match row {
            Some(row) => log::warn!("Row {}:", row),
            None => log::warn!("Whole tournament:"),
        }
        for issue in issues {
            log::warn!("    [{}] {}", issue.rule, issue.message);
        }
    }
}

fn print_rulesets() {
    for ruleset in Ruleset::ALL {
        out::header(&format!(
            "{} (group balance {})",
            ruleset,
            if ruleset.requires_group_balance() {
                "required"
            } else {
                "not required"
            }
        ));
        for target_type in ruleset.target_types() {
            let ranges = ruleset
                .stakes(target_type)
                .unwrap_or_default()
                .iter()
                .map(|r| format!("{} {}-{} m", r.stake, r.min, r.max))
                .collect::<Vec<_>>()
                .join(", ");
            let required = ruleset.required_distance(target_type).unwrap_or(0.0);
            out::sub_item(&format!(
                "{target_type}: {ranges} (lanes from {required} m)"
            ));
        }
    }
}
