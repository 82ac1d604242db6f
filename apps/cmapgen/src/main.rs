//! cmapgen CLI binary entry point.
//! Resolves configuration, loads the catalog, and delegates to the library.

use clap::Parser;
use cmapgen::cli::{CatalogArgs, Cli, Commands};
use cmapgen::config::{self, CliOverrides, Effective};
use cmapgen::generate::{self, Mode};
use cmapgen::source::Catalog;
use cmapgen::utils::{error_prefix, info_prefix, note_prefix, warn_prefix};
use cmapgen::{builder, output};

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", error_prefix(), message);
    std::process::exit(2);
}

fn resolve(common: &CatalogArgs, out_dir: Option<&str>) -> (Effective, Catalog) {
    let eff = config::resolve_effective(&CliOverrides {
        repo_root: common.repo_root.as_deref(),
        catalogs: &common.catalogs,
        no_builtin: common.no_builtin,
        out_dir,
        style: common.style.as_deref(),
        output: common.output.as_deref(),
    })
    .unwrap_or_else(|e| fail(e));
    if !eff.config_found && eff.output != "json" {
        eprintln!("{} No cmapgen.toml found; using defaults.", note_prefix());
    }
    if !eff.catalogs.is_empty() && eff.output != "json" {
        eprintln!(
            "{} Merging {} catalog file(s){}",
            info_prefix(),
            eff.catalogs.len(),
            if eff.builtin { " over the built-in catalog" } else { "" }
        );
    }
    let catalog = Catalog::load(eff.builtin, &eff.catalogs[..]).unwrap_or_else(|e| fail(e));
    (eff, catalog)
}

fn main() {
    let cli = Cli::parse();
    cmapgen::utils::init_tracing(cli.verbose);
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Generate {
            common,
            out_dir,
            dry_run,
            check,
        } => {
            let (eff, catalog) = resolve(&common, out_dir.as_deref());
            if check && dry_run && eff.output != "json" {
                eprintln!("{} both --check and --dry-run given; using --check", warn_prefix());
            }
            let mode = if check {
                Mode::Check
            } else if dry_run {
                Mode::DryRun
            } else {
                Mode::Write
            };
            let report = generate::run_generate(&catalog, &eff.settings, mode)
                .unwrap_or_else(|e| fail(e));
            output::print_generate(&report, &eff.output, mode);
            if mode == Mode::Check && report.summary.changed > 0 {
                std::process::exit(1);
            }
        }
        Commands::List { common } => {
            let (eff, catalog) = resolve(&common, None);
            let s = &eff.settings;
            let plan = builder::plan(&catalog, &s.groups, s.sort, &s.reverse_suffix)
                .unwrap_or_else(|e| fail(e));
            output::print_groups(&plan.partition.groups, &eff.output);
        }
    }
}
