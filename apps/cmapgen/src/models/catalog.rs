//! Catalog file schema: category name lists plus colormap definitions.

use serde::Deserialize;

#[derive(Deserialize, Default)]
/// Top-level catalog file.
pub struct CatalogFile {
    #[serde(default)]
    pub categories: Categories,
    #[serde(default, rename = "colormap")]
    pub colormaps: Vec<ColormapDef>,
}

#[derive(Deserialize, Default)]
/// Built-in category lists. The combined set is implied by the definitions.
pub struct Categories {
    #[serde(default)]
    pub sequential: Vec<String>,
    #[serde(default)]
    pub sequential2: Vec<String>,
    #[serde(default)]
    pub diverging: Vec<String>,
    #[serde(default)]
    pub diverging_black: Vec<String>,
    #[serde(default)]
    pub qualitative: Vec<String>,
    #[serde(default)]
    pub misc: Vec<String>,
}

#[derive(Deserialize)]
/// A single `[[colormap]]` entry.
pub struct ColormapDef {
    pub name: String,
    #[serde(default)]
    pub kind: MapKind,
    /// Native resolution of a segmented map (default 256). Ignored for listed maps.
    #[serde(default)]
    pub n: Option<usize>,
    pub colors: Vec<ColorSpec>,
    /// Stop positions in `[0, 1]`; evenly spaced when absent.
    #[serde(default)]
    pub positions: Option<Vec<f64>>,
    /// Register a `<name>_r` variant alongside.
    #[serde(default = "default_true")]
    pub reversed: bool,
}

#[derive(Deserialize, Default, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum MapKind {
    #[default]
    Segmented,
    Listed,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(untagged)]
/// `"#RRGGBB"` or `[r, g, b]` with channels in `[0, 1]`.
pub enum ColorSpec {
    Hex(String),
    Rgb([f64; 3]),
}

fn default_true() -> bool {
    true
}
