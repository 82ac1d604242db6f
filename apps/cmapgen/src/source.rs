//! Colormap source: the catalog every generation step reads from.
//!
//! A `Catalog` is built once per run and passed by reference. It starts from
//! the embedded built-in catalog (or empty) and merges user catalog files on
//! top. Each definition is either:
//! - `listed`: an explicit color list; native resolution is its length.
//! - `segmented`: color stops on `[0, 1]`, linearly interpolated and sampled
//!   at `n` evenly spaced points (default 256).
//!
//! Unless disabled per entry, every definition also registers a reversed
//! `<name>_r` variant, so the combined set carries the same redundant
//! duplicates the builder later filters out.

use crate::error::{Error, Result};
use crate::models::catalog::{CatalogFile, ColorSpec, ColormapDef, MapKind};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Embedded default catalog.
pub const BUILTIN: &str = include_str!("../assets/builtin.toml");

/// Default native resolution for segmented maps.
pub const DEFAULT_N: usize = 256;

/// Suffix used when registering reversed variants.
pub const REVERSED_SUFFIX: &str = "_r";

pub type Rgb = [f64; 3];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Name lists a source can enumerate.
pub enum Category {
    All,
    Sequential,
    Sequential2,
    Diverging,
    DivergingBlack,
    Qualitative,
    Misc,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::All => "all",
            Category::Sequential => "sequential",
            Category::Sequential2 => "sequential2",
            Category::Diverging => "diverging",
            Category::DivergingBlack => "diverging_black",
            Category::Qualitative => "qualitative",
            Category::Misc => "misc",
        }
    }
}

/// Provider of named colormaps.
pub trait ColormapSource {
    /// Names listed under `category`, in source order.
    fn category(&self, category: Category) -> Vec<String>;
    /// Look up a colormap by exact name.
    fn get(&self, name: &str) -> Result<&Colormap>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Colormap {
    Listed { colors: Vec<Rgb> },
    Segmented { stops: Vec<(f64, Rgb)>, n: usize },
}

impl Colormap {
    /// Native resolution.
    pub fn len(&self) -> usize {
        match self {
            Colormap::Listed { colors } => colors.len(),
            Colormap::Segmented { n, .. } => *n,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Color at lookup-table `index`. Out-of-range indices clamp to the last entry.
    pub fn at(&self, index: usize) -> Rgb {
        match self {
            Colormap::Listed { colors } => {
                let i = index.min(colors.len().saturating_sub(1));
                colors.get(i).copied().unwrap_or([0.0; 3])
            }
            Colormap::Segmented { stops, n } => {
                let t = if *n <= 1 {
                    0.0
                } else {
                    (index as f64 / (*n - 1) as f64).min(1.0)
                };
                interpolate(stops, t)
            }
        }
    }

    pub fn reversed(&self) -> Colormap {
        match self {
            Colormap::Listed { colors } => Colormap::Listed {
                colors: colors.iter().rev().copied().collect(),
            },
            Colormap::Segmented { stops, n } => Colormap::Segmented {
                stops: stops.iter().rev().map(|(p, c)| (1.0 - p, *c)).collect(),
                n: *n,
            },
        }
    }
}

fn interpolate(stops: &[(f64, Rgb)], t: f64) -> Rgb {
    let (first, last) = match (stops.first(), stops.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => return [0.0; 3],
    };
    if t <= first.0 {
        return first.1;
    }
    if t >= last.0 {
        return last.1;
    }
    for pair in stops.windows(2) {
        let (p0, c0) = pair[0];
        let (p1, c1) = pair[1];
        if t >= p0 && t <= p1 {
            let f = if p1 > p0 { (t - p0) / (p1 - p0) } else { 0.0 };
            return [
                c0[0] + (c1[0] - c0[0]) * f,
                c0[1] + (c1[1] - c0[1]) * f,
                c0[2] + (c1[2] - c0[2]) * f,
            ];
        }
    }
    last.1
}

#[derive(Debug, Default, Clone)]
/// TOML-backed colormap catalog.
pub struct Catalog {
    maps: BTreeMap<String, Colormap>,
    categories: BTreeMap<Category, Vec<String>>,
}

impl Catalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Catalog parsed from the embedded definitions.
    pub fn builtin() -> Result<Self> {
        let mut cat = Self::empty();
        cat.merge_str(BUILTIN, Path::new("<builtin>"))?;
        Ok(cat)
    }

    /// Start from the built-in catalog (when `builtin`) and merge `paths` in order.
    pub fn load<P: AsRef<Path>>(builtin: bool, paths: &[P]) -> Result<Self> {
        let mut cat = if builtin { Self::builtin()? } else { Self::empty() };
        for p in paths {
            cat.merge_file(p.as_ref())?;
        }
        Ok(cat)
    }

    pub fn merge_file(&mut self, path: &Path) -> Result<()> {
        let s = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        self.merge_str(&s, path)
    }

    /// Merge one catalog document. Later definitions replace earlier ones.
    pub fn merge_str(&mut self, s: &str, origin: &Path) -> Result<()> {
        let file: CatalogFile = toml::from_str(s).map_err(|e| Error::Catalog {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })?;
        for def in &file.colormaps {
            let map = build_colormap(def)?;
            self.insert(&def.name, map, def.reversed);
        }
        let c = file.categories;
        for (cat, names) in [
            (Category::Sequential, c.sequential),
            (Category::Sequential2, c.sequential2),
            (Category::Diverging, c.diverging),
            (Category::DivergingBlack, c.diverging_black),
            (Category::Qualitative, c.qualitative),
            (Category::Misc, c.misc),
        ] {
            for name in names {
                self.add_to_category(cat, &name);
            }
        }
        Ok(())
    }

    /// Register `map` under `name`, plus its reversed variant when `with_reversed`.
    pub fn insert(&mut self, name: &str, map: Colormap, with_reversed: bool) {
        if with_reversed {
            self.maps
                .insert(format!("{}{}", name, REVERSED_SUFFIX), map.reversed());
        }
        self.maps.insert(name.to_string(), map);
    }

    pub fn add_to_category(&mut self, category: Category, name: &str) {
        if category == Category::All {
            return;
        }
        let list = self.categories.entry(category).or_default();
        if !list.iter().any(|n| n == name) {
            list.push(name.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}

impl ColormapSource for Catalog {
    fn category(&self, category: Category) -> Vec<String> {
        match category {
            Category::All => self.maps.keys().cloned().collect(),
            other => self.categories.get(&other).cloned().unwrap_or_default(),
        }
    }

    fn get(&self, name: &str) -> Result<&Colormap> {
        self.maps.get(name).ok_or_else(|| Error::UnknownColormap {
            name: name.to_string(),
        })
    }
}

fn build_colormap(def: &ColormapDef) -> Result<Colormap> {
    if def.colors.is_empty() {
        return Err(Error::EmptyColormap {
            name: def.name.clone(),
        });
    }
    let colors = def
        .colors
        .iter()
        .map(|c| parse_color(&def.name, c))
        .collect::<Result<Vec<_>>>()?;
    match def.kind {
        MapKind::Listed => Ok(Colormap::Listed { colors }),
        MapKind::Segmented => {
            let positions = match &def.positions {
                Some(p) => {
                    if p.len() != colors.len() {
                        return Err(Error::InvalidDefinition {
                            name: def.name.clone(),
                            message: format!(
                                "{} positions for {} colors",
                                p.len(),
                                colors.len()
                            ),
                        });
                    }
                    if p.windows(2).any(|w| w[1] < w[0])
                        || p.iter().any(|v| !(0.0..=1.0).contains(v))
                    {
                        return Err(Error::InvalidDefinition {
                            name: def.name.clone(),
                            message: "positions must be ascending within [0, 1]".into(),
                        });
                    }
                    p.clone()
                }
                None if colors.len() == 1 => vec![0.0],
                None => (0..colors.len())
                    .map(|i| i as f64 / (colors.len() - 1) as f64)
                    .collect(),
            };
            let n = def.n.unwrap_or(DEFAULT_N);
            if n == 0 {
                return Err(Error::InvalidDefinition {
                    name: def.name.clone(),
                    message: "sample count n must be positive".into(),
                });
            }
            Ok(Colormap::Segmented {
                stops: positions.into_iter().zip(colors).collect(),
                n,
            })
        }
    }
}

/// Parse `#RRGGBB` or a float triple into channels in `[0, 1]`.
pub fn parse_color(name: &str, spec: &ColorSpec) -> Result<Rgb> {
    let invalid = |value: String| Error::InvalidColor {
        name: name.to_string(),
        value,
    };
    match spec {
        ColorSpec::Hex(hex) => {
            let trimmed = hex.trim().trim_start_matches('#');
            if trimmed.len() != 6 || !trimmed.is_ascii() {
                return Err(invalid(hex.clone()));
            }
            let mut rgb = [0.0; 3];
            for (i, ch) in rgb.iter_mut().enumerate() {
                let v = u8::from_str_radix(&trimmed[i * 2..i * 2 + 2], 16)
                    .map_err(|_| invalid(hex.clone()))?;
                *ch = v as f64 / 255.0;
            }
            Ok(rgb)
        }
        ColorSpec::Rgb(rgb) => {
            if rgb.iter().any(|v| !v.is_finite() || !(0.0..=1.0).contains(v)) {
                return Err(invalid(format!("{:?}", rgb)));
            }
            Ok(*rgb)
        }
    }
}
