//! Output rendering for the generate and list commands.
//!
//! Supports `human` (default) and `json` outputs. The JSON form includes
//! per-file fields, group membership, and a top-level summary.

use crate::generate::Mode;
use crate::models::{GenerateReport, GroupSummary};
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

/// Print generation results in the requested format.
pub fn print_generate(report: &GenerateReport, output: &str, mode: Mode) {
    match output {
        "json" => println!("{}", pretty(&compose_generate_json(report, mode))),
        _ => {
            let color = use_colors(output);
            for f in &report.files {
                if f.wrote {
                    if color {
                        println!("{} {}", "✏️  wrote:".green().bold(), f.file.bold());
                    } else {
                        println!("✏️  wrote: {}", f.file);
                    }
                } else if f.changed {
                    let label = match mode {
                        Mode::Check => "✖ out of date:",
                        _ => "would write:",
                    };
                    if color {
                        println!("{} {}", label.yellow().bold(), f.file);
                    } else {
                        println!("{} {}", label, f.file);
                    }
                } else if color {
                    println!("{} {}", "unchanged:".bright_black(), f.file);
                } else {
                    println!("unchanged: {}", f.file);
                }
            }
            let s = &report.summary;
            let summary = format!(
                "Summary: maps={} files={} changed={} wrote={} uncategorized={}",
                s.maps, s.files, s.changed, s.wrote, s.uncategorized
            );
            if color {
                println!("{}", summary.bold());
            } else {
                println!("{}", summary);
            }
        }
    }
}

/// Print group membership, one group per block.
pub fn print_groups(groups: &[GroupSummary], output: &str) {
    match output {
        "json" => println!("{}", pretty(&compose_groups_json(groups))),
        _ => {
            let color = use_colors(output);
            for g in groups {
                let head = format!("{} ({})", g.name, g.members.len());
                if color {
                    println!("{}", head.cyan().bold());
                } else {
                    println!("{}", head);
                }
                for m in &g.members {
                    println!("  {}", m);
                }
            }
        }
    }
}

fn pretty(v: &JsonVal) -> String {
    serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string())
}

/// Compose generate JSON object (pure) for testing/snapshot purposes.
pub fn compose_generate_json(report: &GenerateReport, mode: Mode) -> JsonVal {
    let mode = match mode {
        Mode::Write => "write",
        Mode::DryRun => "dry-run",
        Mode::Check => "check",
    };
    json!({
        "mode": mode,
        "results": report.files,
        "groups": compose_groups_json(&report.groups),
        "uncategorized": report.uncategorized,
        "summary": report.summary,
    })
}

/// Compose group JSON: an ordered object of group name to members.
pub fn compose_groups_json(groups: &[GroupSummary]) -> JsonVal {
    let mut map = serde_json::Map::new();
    for g in groups {
        map.insert(g.name.clone(), json!(g.members));
    }
    JsonVal::Object(map)
}
