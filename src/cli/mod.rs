pub mod context;
pub mod tree_commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};
use rusqlite::Connection;
use tracing::debug;

use crate::config::ReunionConfig;
use crate::db::schema;
use crate::error::ReunionResult;
use crate::model::RootPolicy;
use context::CLIContext;

/// Family reunion tree: keep track of who descends from whom
#[derive(Parser, Debug)]
#[command(name = "reunion")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Database file path (default from config: .data/reunion.db)
    #[arg(short, long, global = true, env = "REUNION_DB", value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    /// Config file (default: ./reunion.toml if present)
    #[arg(short, long, global = true, env = "REUNION_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Which members count as tree roots (overrides the config file)
    #[arg(long, global = true, value_enum)]
    pub roots: Option<RootPolicy>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the whole family tree
    Tree,

    /// Show one member and everyone below them
    Show { id: i64 },

    /// Add a member, optionally under a parent
    Add {
        name: String,
        /// ADULT, CHILD or INFANT
        #[arg(short, long)]
        age_group: String,
        /// Id of the parent member
        #[arg(short, long)]
        parent: Option<i64>,
        /// Explicit generation instead of parent's + 1
        #[arg(short, long)]
        generation: Option<u32>,
    },

    /// Add a founder (a generation-0 root)
    AddFounder {
        name: String,
        #[arg(short, long, default_value = "ADULT")]
        age_group: String,
    },

    /// Rename a member or change its age group
    Update {
        id: i64,
        name: String,
        #[arg(short, long)]
        age_group: String,
        /// Overwrite the stored generation (descendants are not touched)
        #[arg(short, long)]
        generation: Option<u32>,
    },

    /// Move a member (and its subtree) under another parent
    Move {
        id: i64,
        /// New parent id; leave out to make the member a root
        #[arg(short, long)]
        parent: Option<i64>,
    },

    /// Delete a member together with all descendants
    Delete { id: i64 },

    /// Load the demo family into an empty database
    Seed,
}

/// Open the store described by flags and config, then run one command.
pub fn run(cli: &Cli) -> ReunionResult<()> {
    let config = ReunionConfig::load(cli.config.as_deref())?;
    let db_path = cli.file.clone().unwrap_or(config.database.path);
    let policy = cli.roots.unwrap_or(config.tree.root_policy);

    if let Some(dir) = db_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    debug!(db = %db_path.display(), ?policy, "opening store");

    let conn = Connection::open(&db_path)?;
    schema::initialize(&conn)?;

    let ctx = CLIContext::new(conn, policy, cli.json);
    execute(&ctx, &cli.command)
}

pub fn execute(ctx: &CLIContext, command: &Commands) -> ReunionResult<()> {
    match command {
        Commands::Tree => tree_commands::tree(ctx),
        Commands::Show { id } => tree_commands::show(ctx, *id),
        Commands::Add {
            name,
            age_group,
            parent,
            generation,
        } => tree_commands::add(ctx, name, age_group, *parent, *generation),
        Commands::AddFounder { name, age_group } => tree_commands::add_founder(ctx, name, age_group),
        Commands::Update {
            id,
            name,
            age_group,
            generation,
        } => tree_commands::update(ctx, *id, name, age_group, *generation),
        Commands::Move { id, parent } => tree_commands::move_to(ctx, *id, *parent),
        Commands::Delete { id } => tree_commands::delete(ctx, *id),
        Commands::Seed => tree_commands::seed(ctx),
    }
}
