//! CLI argument parsing via `clap`.

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "cmapgen",
    version,
    about = "Generate C++ colormap tables",
    long_about = "cmapgen: turn a colormap catalog into static C++ color tables, a name enum, and group lists.\n\nConfiguration precedence: CLI > cmapgen.toml > defaults.",
    after_help = "Examples:\n  cmapgen generate\n  cmapgen generate --out-dir lib/goomutils/include/goomutils/colordata --check\n  cmapgen generate --style map --catalog maps/*.toml\n  cmapgen list --output json",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Args, Clone, Default)]
/// Options shared by commands that read the catalog.
pub struct CatalogArgs {
    #[arg(long, help = "Repository root (default: current dir)")]
    pub repo_root: Option<String>,
    #[arg(long = "catalog", help = "Catalog file or glob; repeatable (replaces configured catalogs)")]
    pub catalogs: Vec<String>,
    #[arg(long, action = clap::ArgAction::SetTrue, help = "Skip the built-in catalog")]
    pub no_builtin: bool,
    #[arg(long, help = "Output layout: enum|map (default: enum)")]
    pub style: Option<String>,
    #[arg(long, help = "Output mode: human|json (default: human)")]
    pub output: Option<String>,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current cmapgen version.")]
    Version,
    /// Generate tables
    #[command(
        about = "Generate colormap tables",
        long_about = "Sample every used colormap and write per-map headers, the catalog table, and group tables. Unchanged files are not rewritten.",
        after_help = "Examples:\n  cmapgen generate --dry-run\n  cmapgen generate --check --output json"
    )]
    Generate {
        #[command(flatten)]
        common: CatalogArgs,
        #[arg(long, help = "Directory receiving the generated files")]
        out_dir: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Preview planned writes without changing files")]
        dry_run: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Exit non-zero if any file would change (implies no writes)")]
        check: bool,
    },
    /// Show the group partition
    #[command(
        about = "List groups",
        long_about = "Print every group and its members as they would be generated, without sampling or writing."
    )]
    List {
        #[command(flatten)]
        common: CatalogArgs,
    },
}
