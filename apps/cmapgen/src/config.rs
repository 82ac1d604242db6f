//! Configuration discovery and effective settings resolution.
//!
//! cmapgen reads `cmapgen.toml|yaml|yml` from the repository root (or closest
//! ancestor) and merges it with CLI flags to produce an `Effective` config.
//! Defaults:
//! - `out_dir`: `/tmp/colordata`
//! - `style`: `enum`
//! - `output`: `human`
//! - `builtin`: true, `catalogs`: none
//! - `emit.sampling|sort|symbols`: derived from `style`
//! - `groups`: the default group table
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::builder::{GroupDef, Sampling, SortOrder, SymbolStyle};
use crate::emit::Style;
use crate::error::{Error, Result};
use crate::generate::Settings;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_NAMES: [&str; 3] = ["cmapgen.toml", "cmapgen.yaml", "cmapgen.yml"];

#[derive(Debug, Default, Deserialize, Clone)]
/// Code-emission section under `[emit]`.
pub struct EmitCfg {
    pub namespace: Option<String>,
    pub include_reldir: Option<String>,
    pub lib_name: Option<String>,
    pub enum_name: Option<String>,
    pub final_include_reldir: Option<String>,
    /// Header and source locations in the consuming tree; used to derive
    /// `final_include_reldir` when it is not given.
    pub header_dir: Option<String>,
    pub source_dir: Option<String>,
    pub sampling: Option<SamplingCfg>,
    pub sort: Option<String>,    // casefold|raw
    pub symbols: Option<String>, // safe|raw
    pub reverse_suffix: Option<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
/// `sampling = "native"` or `sampling = 256`.
pub enum SamplingCfg {
    Count(usize),
    Word(String),
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `cmapgen.toml|yaml`.
pub struct CmapgenConfig {
    pub out_dir: Option<String>,
    pub style: Option<String>,
    pub output: Option<String>,
    pub catalogs: Option<Vec<String>>,
    pub builtin: Option<bool>,
    pub emit: Option<EmitCfg>,
    pub groups: Option<Vec<GroupDef>>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub config_found: bool,
    pub output: String,
    pub builtin: bool,
    pub catalogs: Vec<PathBuf>,
    pub settings: Settings,
}

#[derive(Debug, Default, Clone)]
/// CLI-provided overrides; `None`/empty means "not given".
pub struct CliOverrides<'a> {
    pub repo_root: Option<&'a str>,
    pub catalogs: &'a [String],
    pub no_builtin: bool,
    pub out_dir: Option<&'a str>,
    pub style: Option<&'a str>,
    pub output: Option<&'a str>,
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `cmapgen.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_NAMES.iter().any(|n| cur.join(n).exists()) {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `CmapgenConfig` from `cmapgen.toml` or `cmapgen.yaml|yml` if present.
pub fn load_config(root: &Path) -> Result<Option<CmapgenConfig>> {
    let toml_path = root.join(CONFIG_NAMES[0]);
    if toml_path.exists() {
        let s = fs::read_to_string(&toml_path).map_err(|e| Error::io(&toml_path, e))?;
        let cfg: CmapgenConfig = toml::from_str(&s).map_err(|e| Error::Config {
            message: format!("{}: {}", toml_path.display(), e),
        })?;
        return Ok(Some(cfg));
    }
    for yml in &CONFIG_NAMES[1..] {
        let p = root.join(yml);
        if p.exists() {
            let s = fs::read_to_string(&p).map_err(|e| Error::io(&p, e))?;
            let cfg: CmapgenConfig = serde_yaml::from_str(&s).map_err(|e| Error::Config {
                message: format!("{}: {}", p.display(), e),
            })?;
            return Ok(Some(cfg));
        }
    }
    Ok(None)
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(cli: &CliOverrides<'_>) -> Result<Effective> {
    let start = PathBuf::from(cli.repo_root.unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let loaded = load_config(&repo_root)?;
    let config_found = loaded.is_some();
    let cfg = loaded.unwrap_or_default();

    let style_str = cli
        .style
        .map(|s| s.to_string())
        .or(cfg.style)
        .unwrap_or_else(|| "enum".to_string());
    let style = Style::parse(&style_str).ok_or_else(|| Error::Config {
        message: format!("unknown style '{}' (expected enum|map)", style_str),
    })?;
    let mut settings = Settings::for_style(style);

    let output = cli
        .output
        .map(|s| s.to_string())
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());
    if output != "human" && output != "json" {
        return Err(Error::Config {
            message: format!("unknown output '{}' (expected human|json)", output),
        });
    }

    if let Some(dir) = cli.out_dir.map(|s| s.to_string()).or(cfg.out_dir) {
        settings.out_dir = repo_root.join(dir);
    }

    let builtin = !cli.no_builtin && cfg.builtin.unwrap_or(true);
    let patterns = if cli.catalogs.is_empty() {
        cfg.catalogs.unwrap_or_default()
    } else {
        cli.catalogs.to_vec()
    };
    let catalogs = expand_catalogs(&repo_root, &patterns)?;

    if let Some(groups) = cfg.groups {
        settings.groups = groups;
    }

    let emit = cfg.emit.unwrap_or_default();
    let names = &mut settings.names;
    if let Some(v) = emit.namespace {
        names.namespace = v;
    }
    if let Some(v) = emit.include_reldir {
        names.include_reldir = v;
    }
    if let Some(v) = emit.lib_name {
        names.lib_name = v;
    }
    if let Some(v) = emit.enum_name {
        names.enum_name = v;
    }
    names.final_include_reldir = match (emit.final_include_reldir, emit.header_dir, emit.source_dir)
    {
        (Some(v), _, _) => v,
        (None, Some(h), Some(s)) => relative_include(&h, &s)?,
        _ => format!("../include/{}/{}", names.lib_name, names.include_reldir),
    };

    if let Some(s) = emit.sampling {
        settings.sampling = parse_sampling(&s)?;
    }
    if let Some(s) = emit.sort {
        settings.sort = match s.as_str() {
            "casefold" => SortOrder::CaseFold,
            "raw" => SortOrder::Raw,
            other => {
                return Err(Error::Config {
                    message: format!("unknown sort '{}' (expected casefold|raw)", other),
                })
            }
        };
    }
    if let Some(s) = emit.symbols {
        settings.symbols = match s.as_str() {
            "safe" => SymbolStyle::Safe,
            "raw" => SymbolStyle::Raw,
            other => {
                return Err(Error::Config {
                    message: format!("unknown symbols '{}' (expected safe|raw)", other),
                })
            }
        };
    }
    if let Some(s) = emit.reverse_suffix {
        settings.reverse_suffix = s;
    }

    Ok(Effective {
        repo_root,
        config_found,
        output,
        builtin,
        catalogs,
        settings,
    })
}

fn parse_sampling(s: &SamplingCfg) -> Result<Sampling> {
    match s {
        SamplingCfg::Count(0) => Err(Error::Config {
            message: "sampling count must be positive".into(),
        }),
        SamplingCfg::Count(n) => Ok(Sampling::Fixed(*n)),
        SamplingCfg::Word(w) if w == "native" => Ok(Sampling::Native),
        SamplingCfg::Word(w) => w
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .map(Sampling::Fixed)
            .ok_or_else(|| Error::Config {
                message: format!("unknown sampling '{}' (expected native or a count)", w),
            }),
    }
}

/// Include path of `header_dir` as seen from `source_dir`, with `/` separators.
fn relative_include(header_dir: &str, source_dir: &str) -> Result<String> {
    let rel = pathdiff::diff_paths(header_dir, source_dir).ok_or_else(|| Error::Config {
        message: format!(
            "cannot express '{}' relative to '{}'",
            header_dir, source_dir
        ),
    })?;
    Ok(rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join("/"))
}

/// Expand catalog glob patterns relative to `root`. A literal path that does
/// not exist is kept so loading reports it.
fn expand_catalogs(root: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for pat in patterns {
        let abs = root.join(pat);
        let pattern = abs.to_string_lossy().to_string();
        let entries = glob::glob(&pattern).map_err(|e| Error::Config {
            message: format!("bad catalog pattern '{}': {}", pat, e),
        })?;
        let mut matched: Vec<PathBuf> = entries.flatten().collect();
        if matched.is_empty() && !pat.contains(['*', '?', '[']) {
            matched.push(abs);
        }
        matched.sort();
        for m in matched {
            if !out.contains(&m) {
                out.push(m);
            }
        }
    }
    Ok(out)
}
