//! Generation run: plan, sample, render, then write or check each artifact.
//!
//! All sampling happens before the first write, so an unknown colormap or
//! an unusable symbol aborts the run with nothing touched on disk. Files whose
//! contents already match are left alone.

use crate::builder::{self, GroupDef, Sampling, SortOrder, SymbolStyle};
use crate::emit::{self, EmitNames, Style};
use crate::error::{Error, Result};
use crate::models::{FileAction, GenerateReport, Summary};
use crate::source::ColormapSource;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Fixed sample count used by the map layout.
pub const FIXED_SAMPLES: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Write,
    /// Report what would change without writing.
    DryRun,
    /// Like `DryRun`; callers exit non-zero when anything would change.
    Check,
}

#[derive(Debug, Clone)]
/// Everything one run needs besides the catalog.
pub struct Settings {
    pub out_dir: PathBuf,
    pub style: Style,
    pub sampling: Sampling,
    pub sort: SortOrder,
    pub symbols: SymbolStyle,
    pub reverse_suffix: String,
    pub groups: Vec<GroupDef>,
    pub names: EmitNames,
}

impl Settings {
    /// Defaults tied to a layout: `enum` samples at native resolution with
    /// case-folded order; `map` uses 256 samples and raw order. Both use safe
    /// symbols; the map layout still keys `allMaps` by the raw name.
    pub fn for_style(style: Style) -> Self {
        let (sampling, sort) = match style {
            Style::Enum => (Sampling::Native, SortOrder::CaseFold),
            Style::Map => (Sampling::Fixed(FIXED_SAMPLES), SortOrder::Raw),
        };
        Settings {
            out_dir: PathBuf::from("/tmp/colordata"),
            style,
            sampling,
            sort,
            symbols: SymbolStyle::Safe,
            reverse_suffix: "_r".to_string(),
            groups: builder::default_groups(),
            names: EmitNames::default(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings::for_style(Style::Enum)
    }
}

/// Generate every artifact for `source` into `settings.out_dir`.
pub fn run_generate<S: ColormapSource + ?Sized>(
    source: &S,
    settings: &Settings,
    mode: Mode,
) -> Result<GenerateReport> {
    let plan = builder::plan(
        source,
        &settings.groups,
        settings.sort,
        &settings.reverse_suffix,
    )?;
    let uncategorized = plan.partition.uncategorized().to_vec();
    if !uncategorized.is_empty() {
        warn!(
            count = uncategorized.len(),
            names = %uncategorized.join(","),
            "uncategorised maps"
        );
    }

    let sampled = plan
        .used
        .iter()
        .map(|name| builder::sample(source, name, settings.sampling, settings.symbols))
        .collect::<Result<Vec<_>>>()?;

    let mut owners: HashMap<&str, &str> = HashMap::new();
    for m in &sampled {
        if let Some(first) = owners.insert(m.symbol.as_str(), m.name.as_str()) {
            return Err(Error::DuplicateSymbol {
                symbol: m.symbol.clone(),
                first: first.to_string(),
                second: m.name.clone(),
            });
        }
    }

    let artifacts = emit::render_all(
        settings.style,
        &settings.names,
        &sampled,
        &plan.partition,
    );

    if mode == Mode::Write {
        fs::create_dir_all(&settings.out_dir).map_err(|e| Error::io(&settings.out_dir, e))?;
    }
    let mut files = Vec::with_capacity(artifacts.len());
    for a in &artifacts {
        let path = settings.out_dir.join(&a.file_name);
        let changed = match fs::read(&path) {
            Ok(old) => old != a.contents.as_bytes(),
            Err(e) if e.kind() == ErrorKind::NotFound => true,
            Err(e) => return Err(Error::io(&path, e)),
        };
        let mut wrote = false;
        if changed && mode == Mode::Write {
            fs::write(&path, &a.contents).map_err(|e| Error::io(&path, e))?;
            wrote = true;
            debug!(file = %path.display(), "wrote");
        }
        files.push(FileAction {
            file: path.to_string_lossy().to_string(),
            changed,
            wrote,
        });
    }

    let summary = Summary {
        maps: sampled.len(),
        files: files.len(),
        changed: files.iter().filter(|f| f.changed).count(),
        wrote: files.iter().filter(|f| f.wrote).count(),
        uncategorized: uncategorized.len(),
    };
    info!(
        maps = summary.maps,
        changed = summary.changed,
        wrote = summary.wrote,
        "generation finished"
    );
    Ok(GenerateReport {
        files,
        groups: plan.partition.groups,
        uncategorized,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::{ALL_MAPS_CPP, ALL_MAPS_H, COLOR_MAP_ENUM_H};
    use crate::source::{Catalog, Colormap};
    use tempfile::tempdir;

    fn two_stop() -> Colormap {
        Colormap::Segmented {
            stops: vec![(0.0, [0.0, 0.0, 0.0]), (1.0, [1.0, 1.0, 1.0])],
            n: 256,
        }
    }

    fn example_catalog() -> Catalog {
        let mut cat = Catalog::empty();
        cat.insert("viridis", two_stop(), true);
        cat.insert("cool", two_stop(), true);
        cat.insert(
            "Wistia",
            Colormap::Listed {
                colors: vec![[0.9, 1.0, 0.5], [1.0, 0.5, 0.0]],
            },
            true,
        );
        cat
    }

    fn settings(out: PathBuf, style: Style) -> Settings {
        let mut s = Settings::for_style(style);
        s.out_dir = out;
        s.groups = vec![GroupDef {
            name: "sequential2".into(),
            category: None,
            extra: vec!["Wistia".into()],
        }];
        s
    }

    #[test]
    fn test_generate_writes_enum_layout() {
        let tmp = tempdir().unwrap();
        let out = tmp.path().join("colordata");
        let s = settings(out.clone(), Style::Enum);
        let report = run_generate(&example_catalog(), &s, Mode::Write).unwrap();

        assert_eq!(report.summary.maps, 3);
        assert_eq!(report.summary.files, 6);
        assert_eq!(report.summary.wrote, 6);
        assert_eq!(report.uncategorized, vec!["cool", "viridis"]);
        for f in ["cool.h", "viridis.h", "Wistia.h", COLOR_MAP_ENUM_H, ALL_MAPS_H, ALL_MAPS_CPP] {
            assert!(out.join(f).exists(), "{} missing", f);
        }
        assert!(!out.join("viridis_r.h").exists());

        // native resolution: listed Wistia has two entries, segmented maps 256
        let wistia = fs::read_to_string(out.join("Wistia.h")).unwrap();
        assert_eq!(wistia.matches("f },").count(), 2);
        let cool = fs::read_to_string(out.join("cool.h")).unwrap();
        assert_eq!(cool.matches("f },").count(), 256);

        let cpp = fs::read_to_string(out.join(ALL_MAPS_CPP)).unwrap();
        assert!(cpp.contains("sequential2Maps = {\n    ColorMapName::Wistia,\n  };"));
        assert!(cpp.contains(
            "ungroupedMaps = {\n    ColorMapName::cool,\n    ColorMapName::viridis,\n  };"
        ));
    }

    #[test]
    fn test_second_run_is_unchanged_and_byte_identical() {
        let tmp = tempdir().unwrap();
        let s = settings(tmp.path().to_path_buf(), Style::Enum);
        let cat = example_catalog();
        run_generate(&cat, &s, Mode::Write).unwrap();
        let first = fs::read_to_string(tmp.path().join(ALL_MAPS_CPP)).unwrap();
        let report = run_generate(&cat, &s, Mode::Check).unwrap();
        assert_eq!(report.summary.changed, 0);
        let again = fs::read_to_string(tmp.path().join(ALL_MAPS_CPP)).unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn test_dry_run_and_check_do_not_write() {
        let tmp = tempdir().unwrap();
        let out = tmp.path().join("never");
        let s = settings(out.clone(), Style::Map);
        for mode in [Mode::DryRun, Mode::Check] {
            let report = run_generate(&example_catalog(), &s, mode).unwrap();
            assert_eq!(report.summary.changed, report.summary.files);
            assert_eq!(report.summary.wrote, 0);
        }
        assert!(!out.exists());
    }

    #[test]
    fn test_map_layout_uses_fixed_samples() {
        let tmp = tempdir().unwrap();
        let s = settings(tmp.path().to_path_buf(), Style::Map);
        let report = run_generate(&example_catalog(), &s, Mode::Write).unwrap();
        assert_eq!(report.summary.files, 5);
        let wistia = fs::read_to_string(tmp.path().join("Wistia.h")).unwrap();
        assert_eq!(wistia.matches("f },").count(), FIXED_SAMPLES);
        assert!(!tmp.path().join(COLOR_MAP_ENUM_H).exists());
    }

    #[test]
    fn test_map_layout_runs_on_builtin_catalog() {
        let tmp = tempdir().unwrap();
        let mut s = Settings::for_style(Style::Map);
        s.out_dir = tmp.path().to_path_buf();
        let cat = Catalog::builtin().unwrap();
        let report = run_generate(&cat, &s, Mode::Write).unwrap();
        assert_eq!(report.summary.maps, 89);
        let header = fs::read_to_string(tmp.path().join("pink_black_green_w3c_.h")).unwrap();
        assert!(header.contains("std::vector<vivid::srgb_t> pink_black_green_w3c_ = {"));
        assert_eq!(header.matches("f },").count(), FIXED_SAMPLES);
        let cpp = fs::read_to_string(tmp.path().join(ALL_MAPS_CPP)).unwrap();
        assert!(cpp.contains(
            "{ \"pink_black_green(w3c)\", colordata::pink_black_green_w3c_ },"
        ));
        assert!(cpp.contains("#include \"colordata/pink_black_green_w3c_.h\""));
    }

    #[test]
    fn test_unreadable_existing_file_is_an_io_error() {
        let tmp = tempdir().unwrap();
        let s = settings(tmp.path().to_path_buf(), Style::Enum);
        // a directory where a header should be cannot be read as a file
        fs::create_dir(tmp.path().join("cool.h")).unwrap();
        let err = run_generate(&example_catalog(), &s, Mode::Check).unwrap_err();
        assert!(matches!(err, Error::Io { ref path, .. } if path.ends_with("cool.h")));
    }

    #[test]
    fn test_non_utf8_existing_file_is_reported_changed() {
        let tmp = tempdir().unwrap();
        let s = settings(tmp.path().to_path_buf(), Style::Enum);
        fs::write(tmp.path().join("cool.h"), [0xff, 0xfe, 0x00]).unwrap();
        let report = run_generate(&example_catalog(), &s, Mode::Check).unwrap();
        let cool = report.files.iter().find(|f| f.file.ends_with("cool.h")).unwrap();
        assert!(cool.changed);
        assert!(!cool.wrote);
    }

    #[test]
    fn test_unknown_group_member_aborts_before_writing() {
        let tmp = tempdir().unwrap();
        let out = tmp.path().join("out");
        let mut s = settings(out.clone(), Style::Enum);
        s.groups[0].extra.push("missing".into());
        let err = run_generate(&example_catalog(), &s, Mode::Write).unwrap_err();
        assert!(matches!(err, Error::UnknownColormap { ref name } if name == "missing"));
        assert!(!out.exists());
    }

    #[test]
    fn test_symbol_collision_is_rejected() {
        let tmp = tempdir().unwrap();
        let mut cat = Catalog::empty();
        cat.insert("a(b)", two_stop(), false);
        cat.insert("a_b_", two_stop(), false);
        let mut s = settings(tmp.path().to_path_buf(), Style::Enum);
        s.groups.clear();
        let err = run_generate(&cat, &s, Mode::Write).unwrap_err();
        assert!(matches!(err, Error::DuplicateSymbol { .. }));
    }

    #[test]
    fn test_builtin_catalog_generates_without_uncategorized() {
        let tmp = tempdir().unwrap();
        let mut s = Settings::default();
        s.out_dir = tmp.path().to_path_buf();
        let cat = Catalog::builtin().unwrap();
        let report = run_generate(&cat, &s, Mode::DryRun).unwrap();
        assert!(report.uncategorized.is_empty());
        assert_eq!(report.summary.maps, 89);
        assert!(report
            .files
            .iter()
            .any(|f| f.file.ends_with("pink_black_green_w3c_.h")));
    }
}
