//! Catalog builder: collects, filters, samples, and partitions colormap names.
//!
//! Partitioning tags each used name with the first group (in configured
//! order) whose source list contains it, then buckets by tag. Used names no
//! group claims end up in the trailing `ungrouped` bucket, so every used
//! name lands in exactly one group.

use crate::error::{Error, Result};
use crate::models::GroupSummary;
use crate::source::{Category, ColormapSource, Rgb};
use crate::utils;
use serde::Deserialize;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

/// Name of the catch-all group appended after the configured ones.
pub const UNGROUPED: &str = "ungrouped";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Case-insensitive, ties broken by raw byte order.
    #[default]
    CaseFold,
    Raw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sampling {
    /// One sample per entry of the map's native lookup table.
    Native,
    Fixed(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolStyle {
    /// `(` and `)` rewritten to `_`.
    Safe,
    Raw,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
/// A configured group: an optional catalog category plus extra names.
pub struct GroupDef {
    pub name: String,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub extra: Vec<String>,
}

impl GroupDef {
    fn new(name: &str, category: Option<Category>, extra: &[&str]) -> Self {
        GroupDef {
            name: name.to_string(),
            category,
            extra: extra.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Default group table, in claim order.
pub fn default_groups() -> Vec<GroupDef> {
    vec![
        GroupDef::new(
            "perc_unif_sequential",
            None,
            &["viridis", "plasma", "inferno", "magma", "cividis"],
        ),
        GroupDef::new("sequential", Some(Category::Sequential), &[]),
        GroupDef::new(
            "sequential2",
            Some(Category::Sequential2),
            &["binary", "gist_gray", "gist_yarg", "Wistia"],
        ),
        GroupDef::new("diverging", Some(Category::Diverging), &[]),
        GroupDef::new("diverging_black", Some(Category::DivergingBlack), &[]),
        GroupDef::new(
            "qualitative",
            Some(Category::Qualitative),
            &["tab10", "tab20", "tab20b", "tab20c"],
        ),
        GroupDef::new("misc", Some(Category::Misc), &[]),
        GroupDef::new("cyclic", None, &["twilight", "twilight_shifted", "hsv"]),
    ]
}

#[derive(Debug, Clone, PartialEq)]
/// A group with its resolved, sorted source list.
pub struct GroupSource {
    pub name: String,
    pub names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
/// Final group membership; the last entry is always `ungrouped`.
pub struct Partition {
    pub groups: Vec<GroupSummary>,
}

impl Partition {
    /// Used names no configured group claimed.
    pub fn uncategorized(&self) -> &[String] {
        self.groups
            .last()
            .filter(|g| g.name == UNGROUPED)
            .map(|g| g.members.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SampledColormap {
    pub name: String,
    pub symbol: String,
    pub colors: Vec<Rgb>,
}

#[derive(Debug, Clone)]
/// Everything a run decides before sampling.
pub struct Plan {
    pub all: Vec<String>,
    pub used: Vec<String>,
    pub partition: Partition,
}

pub fn compare_names(a: &str, b: &str, sort: SortOrder) -> Ordering {
    match sort {
        SortOrder::CaseFold => a.to_lowercase().cmp(&b.to_lowercase()).then(a.cmp(b)),
        SortOrder::Raw => a.cmp(b),
    }
}

fn sorted_unique(names: impl IntoIterator<Item = String>, sort: SortOrder) -> Vec<String> {
    let set: BTreeSet<String> = names.into_iter().collect();
    let mut out: Vec<String> = set.into_iter().collect();
    out.sort_by(|a, b| compare_names(a, b, sort));
    out
}

/// Symbol used for the generated table and enum value.
pub fn symbol_name(name: &str, style: SymbolStyle) -> String {
    match style {
        SymbolStyle::Safe => name.replace(['(', ')'], "_"),
        SymbolStyle::Raw => name.to_string(),
    }
}

/// Resolve each group's source list: category names plus extras, de-duplicated and sorted.
pub fn resolve_groups<S: ColormapSource + ?Sized>(
    source: &S,
    defs: &[GroupDef],
    sort: SortOrder,
) -> Result<Vec<GroupSource>> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(defs.len());
    for def in defs {
        if def.name == UNGROUPED {
            return Err(Error::Config {
                message: format!("group name '{}' is reserved", UNGROUPED),
            });
        }
        if !utils::is_identifier(&def.name) {
            return Err(Error::Config {
                message: format!("group name '{}' is not a valid identifier", def.name),
            });
        }
        if !seen.insert(def.name.as_str()) {
            return Err(Error::Config {
                message: format!("group '{}' is defined twice", def.name),
            });
        }
        let mut names = def
            .category
            .map(|c| source.category(c))
            .unwrap_or_default();
        names.extend(def.extra.iter().cloned());
        out.push(GroupSource {
            name: def.name.clone(),
            names: sorted_unique(names, sort),
        });
    }
    Ok(out)
}

/// Every name in the combined catalog plus every group member, de-duplicated and sorted.
pub fn collect_all_names<S: ColormapSource + ?Sized>(
    source: &S,
    groups: &[GroupSource],
    sort: SortOrder,
) -> Vec<String> {
    let mut names = source.category(Category::All);
    for g in groups {
        names.extend(g.names.iter().cloned());
    }
    sorted_unique(names, sort)
}

/// Drop reversed duplicates, keeping input order.
pub fn filter_usable(names: &[String], reverse_suffix: &str) -> Vec<String> {
    names
        .iter()
        .filter(|n| reverse_suffix.is_empty() || !n.ends_with(reverse_suffix))
        .cloned()
        .collect()
}

/// Tag each used name with the first group that lists it, then bucket by tag.
pub fn partition_into_groups(used: &[String], groups: &[GroupSource]) -> Partition {
    let used_set: HashSet<&str> = used.iter().map(String::as_str).collect();
    let mut tags: HashMap<&str, usize> = HashMap::new();
    for (gi, g) in groups.iter().enumerate() {
        for name in &g.names {
            if used_set.contains(name.as_str()) {
                tags.entry(name.as_str()).or_insert(gi);
            }
        }
    }

    let mut out = Vec::with_capacity(groups.len() + 1);
    for (gi, g) in groups.iter().enumerate() {
        let mut seen = HashSet::new();
        let members = g
            .names
            .iter()
            .filter(|n| tags.get(n.as_str()) == Some(&gi) && seen.insert(n.as_str()))
            .cloned()
            .collect();
        out.push(GroupSummary {
            name: g.name.clone(),
            members,
        });
    }
    let ungrouped = used
        .iter()
        .filter(|n| !tags.contains_key(n.as_str()))
        .cloned()
        .collect();
    out.push(GroupSummary {
        name: UNGROUPED.to_string(),
        members: ungrouped,
    });
    Partition { groups: out }
}

/// Build the name universe, the used list, and the partition.
pub fn plan<S: ColormapSource + ?Sized>(
    source: &S,
    defs: &[GroupDef],
    sort: SortOrder,
    reverse_suffix: &str,
) -> Result<Plan> {
    let groups = resolve_groups(source, defs, sort)?;
    let all = collect_all_names(source, &groups, sort);
    let used = filter_usable(&all, reverse_suffix);
    let partition = partition_into_groups(&used, &groups);
    debug!(
        all = all.len(),
        used = used.len(),
        groups = partition.groups.len(),
        "planned catalog"
    );
    Ok(Plan {
        all,
        used,
        partition,
    })
}

/// Evaluate `name` at every index of its sample range.
pub fn sample<S: ColormapSource + ?Sized>(
    source: &S,
    name: &str,
    sampling: Sampling,
    symbols: SymbolStyle,
) -> Result<SampledColormap> {
    let map = source.get(name)?;
    let symbol = symbol_name(name, symbols);
    if !utils::is_identifier(&symbol) {
        return Err(Error::InvalidSymbol {
            name: name.to_string(),
            symbol,
        });
    }
    let count = match sampling {
        Sampling::Native => map.len(),
        Sampling::Fixed(n) => n,
    };
    Ok(SampledColormap {
        name: name.to_string(),
        symbol,
        colors: (0..count).map(|i| map.at(i)).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{Catalog, Colormap};

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn two_stop() -> Colormap {
        Colormap::Segmented {
            stops: vec![(0.0, [0.0, 0.0, 0.0]), (1.0, [1.0, 1.0, 1.0])],
            n: 256,
        }
    }

    fn example_catalog() -> Catalog {
        let mut cat = Catalog::empty();
        cat.insert("viridis", two_stop(), true);
        cat.insert("cool", two_stop(), false);
        cat.insert("Wistia", two_stop(), false);
        cat
    }

    #[test]
    fn test_spec_example_partition() {
        let cat = example_catalog();
        let defs = vec![GroupDef::new("sequential2", None, &["Wistia"])];
        let p = plan(&cat, &defs, SortOrder::CaseFold, "_r").unwrap();
        assert!(p.all.contains(&"viridis_r".to_string()));
        assert_eq!(p.used, names(&["cool", "viridis", "Wistia"]));
        assert_eq!(p.partition.groups[0].name, "sequential2");
        assert_eq!(p.partition.groups[0].members, names(&["Wistia"]));
        assert_eq!(p.partition.groups[1].name, UNGROUPED);
        assert_eq!(p.partition.uncategorized(), &names(&["cool", "viridis"])[..]);
    }

    #[test]
    fn test_sort_orders() {
        let input = names(&["b", "A", "a", "C"]);
        assert_eq!(
            sorted_unique(input.clone(), SortOrder::CaseFold),
            names(&["A", "a", "b", "C"])
        );
        assert_eq!(
            sorted_unique(input, SortOrder::Raw),
            names(&["A", "C", "a", "b"])
        );
    }

    #[test]
    fn test_filter_usable_drops_reverse_suffix_and_keeps_order() {
        let all = names(&["zeta", "cool_r", "alpha", "hot_r", "hot"]);
        assert_eq!(filter_usable(&all, "_r"), names(&["zeta", "alpha", "hot"]));
    }

    #[test]
    fn test_first_group_claims_shared_name() {
        let used = names(&["hsv", "jet", "twilight"]);
        let groups = vec![
            GroupSource {
                name: "misc".into(),
                names: names(&["hsv", "jet"]),
            },
            GroupSource {
                name: "cyclic".into(),
                names: names(&["hsv", "twilight"]),
            },
        ];
        let p = partition_into_groups(&used, &groups);
        assert_eq!(p.groups[0].members, names(&["hsv", "jet"]));
        assert_eq!(p.groups[1].members, names(&["twilight"]));
        assert!(p.uncategorized().is_empty());

        // Reversing claim order moves the shared name.
        let swapped: Vec<GroupSource> = groups.into_iter().rev().collect();
        let p = partition_into_groups(&used, &swapped);
        assert_eq!(p.groups[0].members, names(&["hsv", "twilight"]));
        assert_eq!(p.groups[1].members, names(&["jet"]));
    }

    #[test]
    fn test_filtered_group_members_are_skipped() {
        let used = names(&["cool"]);
        let groups = vec![GroupSource {
            name: "sequential2".into(),
            names: names(&["cool", "cool_r", "missing"]),
        }];
        let p = partition_into_groups(&used, &groups);
        assert_eq!(p.groups[0].members, names(&["cool"]));
    }

    #[test]
    fn test_builtin_partition_is_exact() {
        let cat = Catalog::builtin().unwrap();
        let p = plan(&cat, &default_groups(), SortOrder::CaseFold, "_r").unwrap();
        let mut seen = HashSet::new();
        for g in &p.partition.groups {
            for m in &g.members {
                assert!(seen.insert(m.clone()), "{} in two groups", m);
                assert!(!m.ends_with("_r"));
            }
        }
        let used: HashSet<String> = p.used.iter().cloned().collect();
        assert_eq!(seen, used);
        // hsv is listed by misc and cyclic; misc comes first
        let misc = p.partition.groups.iter().find(|g| g.name == "misc").unwrap();
        assert!(misc.members.contains(&"hsv".to_string()));
        assert!(p.partition.uncategorized().is_empty());
    }

    #[test]
    fn test_plan_is_deterministic() {
        let cat = Catalog::builtin().unwrap();
        let a = plan(&cat, &default_groups(), SortOrder::CaseFold, "_r").unwrap();
        let b = plan(&cat, &default_groups(), SortOrder::CaseFold, "_r").unwrap();
        assert_eq!(a.used, b.used);
        assert_eq!(a.partition, b.partition);
    }

    #[test]
    fn test_sample_counts() {
        let mut cat = Catalog::empty();
        cat.insert("grey", two_stop(), false);
        cat.insert(
            "duo",
            Colormap::Listed {
                colors: vec![[1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
            },
            false,
        );
        let s = sample(&cat, "grey", Sampling::Fixed(256), SymbolStyle::Safe).unwrap();
        assert_eq!(s.colors.len(), 256);
        let s = sample(&cat, "duo", Sampling::Native, SymbolStyle::Safe).unwrap();
        assert_eq!(s.colors.len(), 2);
        let s = sample(&cat, "duo", Sampling::Fixed(4), SymbolStyle::Safe).unwrap();
        assert_eq!(s.colors[3], [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_sample_unknown_name_fails() {
        let cat = Catalog::empty();
        let err = sample(&cat, "nope", Sampling::Native, SymbolStyle::Safe).unwrap_err();
        assert!(matches!(err, Error::UnknownColormap { .. }));
    }

    #[test]
    fn test_symbols() {
        assert_eq!(
            symbol_name("pink_black_green(w3c)", SymbolStyle::Safe),
            "pink_black_green_w3c_"
        );
        let mut cat = Catalog::empty();
        cat.insert("a(b)", two_stop(), false);
        assert!(sample(&cat, "a(b)", Sampling::Native, SymbolStyle::Safe).is_ok());
        let err = sample(&cat, "a(b)", Sampling::Native, SymbolStyle::Raw).unwrap_err();
        assert!(matches!(err, Error::InvalidSymbol { .. }));
    }

    #[test]
    fn test_group_definitions_are_validated() {
        let cat = Catalog::empty();
        for defs in [
            vec![GroupDef::new(UNGROUPED, None, &[])],
            vec![GroupDef::new("bad-name", None, &[])],
            vec![GroupDef::new("a", None, &[]), GroupDef::new("a", None, &[])],
        ] {
            assert!(matches!(
                resolve_groups(&cat, &defs, SortOrder::CaseFold),
                Err(Error::Config { .. })
            ));
        }
    }
}
