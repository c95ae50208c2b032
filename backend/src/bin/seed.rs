//! Seed data generator for the Diet Tracker database
//!
//! Usage:
//!   diet-tracker-seed prepare
//!   diet-tracker-seed execute Routine 20 --children 4
//!   diet-tracker-seed execute DietFoodDetail 50 --reuse-parents
//!   diet-tracker-seed admin

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use diet_tracker_backend::config::AppConfig;
use diet_tracker_backend::db;
use diet_tracker_backend::seed::{
    self, InMemorySeedStore, PgSeedStore, SeedEngine, SeedOptions, SeedReport, TemplateSet,
};
use diet_tracker_backend::services::AdministratorService;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "diet-tracker-seed",
    about = "Generate relation-aware synthetic data for the Diet Tracker database"
)]
struct Cli {
    /// Directory holding the seed-<model>.json template files (overrides seed.templates_dir)
    #[arg(long)]
    templates_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write or update one template file per model
    Prepare,

    /// Seed records of a model and its relations
    Execute {
        /// Model name, e.g. Routine or DietFoodDetail
        model: String,

        /// Number of target records
        #[arg(allow_negative_numbers = true)]
        count: i64,

        /// hasMany children per target record (defaults to configuration)
        #[arg(long)]
        children: Option<usize>,

        /// Attach belongsTo relations to existing rows instead of creating parents
        #[arg(long)]
        reuse_parents: bool,

        /// Generate in memory without touching the database
        #[arg(long)]
        dry_run: bool,

        /// Seed the random generator for reproducible data
        #[arg(long)]
        rng_seed: Option<u64>,
    },

    /// Create the administrator account from configuration
    Admin,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "diet_tracker_backend=debug,diet_tracker_seed=debug"
    } else {
        "diet_tracker_backend=info,diet_tracker_seed=info"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;
    let templates_dir = cli
        .templates_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.seed.templates_dir));

    match cli.command {
        Command::Prepare => {
            let outcomes = seed::prepare(&templates_dir).await?;
            for outcome in outcomes {
                info!(
                    model = outcome.model,
                    path = %outcome.path.display(),
                    created = outcome.created,
                    added = ?outcome.added,
                    dropped = ?outcome.dropped,
                    "Template ready"
                );
            }
        }
        Command::Execute {
            model,
            count,
            children,
            reuse_parents,
            dry_run,
            rng_seed,
        } => {
            let templates = TemplateSet::load(&templates_dir)
                .await
                .with_context(|| format!("loading templates from {}", templates_dir.display()))?;
            let options = SeedOptions {
                children_per_record: children.unwrap_or(config.seed.children_per_record),
                reuse_parents,
                rng_seed,
            };

            let report = if dry_run {
                let store = Arc::new(InMemorySeedStore::new());
                SeedEngine::new(store, templates, options)
                    .seed(&model, count)
                    .await?
            } else {
                let pool = db::create_pool(&config.database).await?;
                db::run_migrations(&pool).await?;
                let store = Arc::new(PgSeedStore::new(pool));
                SeedEngine::new(store, templates, options)
                    .seed(&model, count)
                    .await?
            };
            print_report(&report, dry_run)?;
        }
        Command::Admin => {
            let pool = db::create_pool(&config.database).await?;
            db::run_migrations(&pool).await?;

            let created = AdministratorService::bootstrap(&pool, &config.admin).await?;
            if created {
                println!("Administrator {} created", config.admin.email);
            } else {
                println!("Administrator {} already exists, skipped", config.admin.email);
            }
        }
    }

    Ok(())
}

fn print_report(report: &SeedReport, dry_run: bool) -> Result<()> {
    if dry_run {
        println!("Dry run, nothing was written");
    }
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
