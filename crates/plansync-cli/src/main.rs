mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, task::TaskSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "plansync",
    about = "Keep plan.json and plan.md in sync: load, heal, migrate, and update task status",
    version,
    propagate_version = true
)]
struct Cli {
    /// Plan root (default: nearest directory holding plan.json or plan.md)
    #[arg(long, global = true, env = "PLANSYNC_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Log healing decisions at info level
    #[arg(long, global = true, short = 'v')]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the plan (healing files as needed) and print a summary
    Show,

    /// Load the plan and report which repair, if any, was applied
    Heal,

    /// Strict read of plan.json with no side effects
    Inspect,

    /// Print the derived plan.md for the current plan.json without writing
    Render,

    /// Parse a legacy markdown plan and print the recovered plan as JSON
    Migrate {
        /// Path to the legacy markdown file
        file: PathBuf,
        /// Swarm id to use when the file has no `Swarm:` line
        #[arg(long)]
        swarm: Option<String>,
    },

    /// Inspect and update tasks
    Task {
        #[command(subcommand)]
        subcommand: TaskSubcommand,
    },

    /// Inspect the plansync.yaml configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Show => cmd::show::run(&root, cli.json),
        Commands::Heal => cmd::heal::run(&root, cli.json),
        Commands::Inspect => cmd::inspect::run(&root, cli.json),
        Commands::Render => cmd::render::run(&root),
        Commands::Migrate { file, swarm } => cmd::migrate::run(&file, swarm.as_deref()),
        Commands::Task { subcommand } => cmd::task::run(&root, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
