//! C++ text emission for sampled colormaps and group tables.
//!
//! Two layouts are supported:
//! - `Style::Enum`: `colormap_enums.h` declares `enum class ColorMapName`,
//!   `allMaps` is a fixed-size `std::array` of `(symbol, table)` pairs and
//!   group tables hold enum values.
//! - `Style::Map`: `allMaps` is a `std::map` keyed by colormap name and group
//!   tables hold quoted names. No enum header is written.
//!
//! Every artifact is rendered to a `String`; writing is the caller's job.

use crate::builder::{Partition, SampledColormap};
use crate::models::GroupSummary;
use std::collections::HashMap;

pub const ALL_MAPS_H: &str = "all_maps.h";
pub const ALL_MAPS_CPP: &str = "all_maps.cpp";
pub const COLOR_MAP_ENUM_H: &str = "colormap_enums.h";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    #[default]
    Enum,
    Map,
}

impl Style {
    pub fn parse(s: &str) -> Option<Style> {
        match s.trim().to_ascii_lowercase().as_str() {
            "enum" => Some(Style::Enum),
            "map" => Some(Style::Map),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Identifiers and include paths baked into the generated code.
pub struct EmitNames {
    pub namespace: String,
    pub include_reldir: String,
    pub lib_name: String,
    pub enum_name: String,
    /// Include directory of the headers as seen from `all_maps.cpp`.
    pub final_include_reldir: String,
}

impl Default for EmitNames {
    fn default() -> Self {
        let include_reldir = "colordata".to_string();
        let lib_name = "goomutils".to_string();
        EmitNames {
            namespace: "colordata".to_string(),
            final_include_reldir: format!("../include/{}/{}", lib_name, include_reldir),
            include_reldir,
            lib_name,
            enum_name: "ColorMapName".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub contents: String,
}

/// Format one channel the way the tables expect: width 9, five decimals, `f` suffix.
pub fn format_channel(v: f64) -> String {
    format!("{:9.5}f", v)
}

/// Header declaring the static table for one colormap.
pub fn emit_per_map_table(sampled: &SampledColormap, names: &EmitNames) -> String {
    let mut s = String::new();
    s.push_str("#pragma once\n");
    s.push('\n');
    s.push_str("#include \"vivid/types.h\"\n");
    s.push_str("#include <vector>\n");
    s.push('\n');
    s.push_str(&format!("namespace {} {{\n", names.namespace));
    s.push('\n');
    s.push_str(&format!(
        "  static const std::vector<vivid::srgb_t> {} = {{\n",
        sampled.symbol
    ));
    for c in &sampled.colors {
        s.push_str(&format!(
            "    {{ {}, {}, {} }},\n",
            format_channel(c[0]),
            format_channel(c[1]),
            format_channel(c[2])
        ));
    }
    s.push_str("  };\n");
    s.push('\n');
    s.push_str(&format!("}} // {}\n", names.namespace));
    s
}

/// `enum class` with one value per used map, in catalog order.
pub fn emit_name_enum(sampled: &[SampledColormap], names: &EmitNames) -> String {
    let mut s = String::new();
    s.push_str("#pragma once\n");
    s.push('\n');
    s.push_str(&format!("enum class {} {{\n", names.enum_name));
    for m in sampled {
        s.push_str(&format!("  {},\n", m.symbol));
    }
    s.push_str("};\n");
    s
}

/// `all_maps.h`: extern declarations for the catalog table and every group.
pub fn emit_catalog_header(
    style: Style,
    names: &EmitNames,
    groups: &[GroupSummary],
    num_maps: usize,
) -> String {
    let mut s = String::new();
    s.push_str("#pragma once\n");
    s.push('\n');
    if style == Style::Enum {
        s.push_str(&format!(
            "#include \"{}/{}\"\n",
            names.lib_name, COLOR_MAP_ENUM_H
        ));
        s.push('\n');
    }
    s.push_str("#include \"vivid/types.h\"\n");
    s.push('\n');
    push_std_includes(&mut s, style);
    s.push('\n');
    s.push_str(&format!("namespace {} {{\n", names.namespace));
    s.push('\n');
    match style {
        Style::Enum => {
            s.push_str(&format!(
                "  // array of raw maps matching elements of enum '{}'\n",
                names.enum_name
            ));
            s.push_str(&format!(
                "  extern const std::array<std::pair<std::string, std::vector<vivid::srgb_t>>, {}> allMaps;\n",
                num_maps
            ));
        }
        Style::Map => {
            s.push_str(
                "  extern const std::map<std::string, std::vector<vivid::srgb_t>> allMaps;\n",
            );
        }
    }
    s.push('\n');
    let elem = group_element_type(style, names);
    for g in groups {
        s.push_str(&format!(
            "  extern const std::vector<{}> {}Maps;\n",
            elem, g.name
        ));
    }
    s.push('\n');
    s.push_str(&format!("}} // {}\n", names.namespace));
    s
}

/// Group table definitions, one `std::vector` per group in partition order.
pub fn emit_group_tables(
    style: Style,
    names: &EmitNames,
    groups: &[GroupSummary],
    sampled: &[SampledColormap],
) -> String {
    let symbols: HashMap<&str, &str> = sampled
        .iter()
        .map(|m| (m.name.as_str(), m.symbol.as_str()))
        .collect();
    let elem = group_element_type(style, names);
    let mut s = String::new();
    for g in groups {
        s.push_str(&format!("  const std::vector<{}> {}Maps = {{\n", elem, g.name));
        for m in &g.members {
            match style {
                Style::Enum => {
                    // group members are always a subset of the sampled maps
                    let sym = symbols[m.as_str()];
                    s.push_str(&format!("    {}::{},\n", names.enum_name, sym));
                }
                Style::Map => s.push_str(&format!("    \"{}\",\n", m)),
            }
        }
        s.push_str("  };\n");
    }
    s
}

/// `all_maps.cpp`: per-map includes, the catalog table, and the group tables.
pub fn emit_catalog_table(
    style: Style,
    names: &EmitNames,
    sampled: &[SampledColormap],
    partition: &Partition,
) -> String {
    let mut s = String::new();
    match style {
        Style::Enum => {
            s.push_str(&format!(
                "#include \"{}/{}\"\n",
                names.final_include_reldir, ALL_MAPS_H
            ));
            s.push('\n');
            s.push_str(&format!(
                "#include \"{}/{}\"\n",
                names.lib_name, COLOR_MAP_ENUM_H
            ));
            s.push('\n');
            for m in sampled {
                s.push_str(&format!(
                    "#include \"{}/{}.h\"\n",
                    names.final_include_reldir, m.symbol
                ));
            }
        }
        Style::Map => {
            s.push_str(&format!("#include \"{}\"\n", ALL_MAPS_H));
            s.push('\n');
            for m in sampled {
                s.push_str(&format!(
                    "#include \"{}/{}.h\"\n",
                    names.include_reldir, m.symbol
                ));
            }
        }
    }
    s.push('\n');
    s.push_str("#include \"vivid/types.h\"\n");
    s.push('\n');
    push_std_includes(&mut s, style);
    s.push('\n');
    s.push_str(&format!("namespace {} {{\n", names.namespace));
    s.push('\n');
    match style {
        Style::Enum => {
            s.push_str(&format!(
                "  const std::array<std::pair<std::string, std::vector<vivid::srgb_t>>, {}> allMaps = {{\n",
                sampled.len()
            ));
            for m in sampled {
                s.push_str(&format!(
                    "    std::make_pair(\"{}\", {}::{}),\n",
                    m.symbol, names.namespace, m.symbol
                ));
            }
        }
        Style::Map => {
            s.push_str(
                "  const std::map<std::string, std::vector<vivid::srgb_t>> allMaps = {\n",
            );
            for m in sampled {
                s.push_str(&format!(
                    "    {{ \"{}\", {}::{} }},\n",
                    m.name, names.namespace, m.symbol
                ));
            }
        }
    }
    s.push_str("  };\n");
    s.push('\n');
    s.push_str(&emit_group_tables(style, names, &partition.groups, sampled));
    s.push('\n');
    s.push_str(&format!("}} // {}\n", names.namespace));
    s
}

/// Render every artifact of one run, per-map headers first.
pub fn render_all(
    style: Style,
    names: &EmitNames,
    sampled: &[SampledColormap],
    partition: &Partition,
) -> Vec<Artifact> {
    let mut out: Vec<Artifact> = sampled
        .iter()
        .map(|m| Artifact {
            file_name: format!("{}.h", m.symbol),
            contents: emit_per_map_table(m, names),
        })
        .collect();
    if style == Style::Enum {
        out.push(Artifact {
            file_name: COLOR_MAP_ENUM_H.to_string(),
            contents: emit_name_enum(sampled, names),
        });
    }
    out.push(Artifact {
        file_name: ALL_MAPS_H.to_string(),
        contents: emit_catalog_header(style, names, &partition.groups, sampled.len()),
    });
    out.push(Artifact {
        file_name: ALL_MAPS_CPP.to_string(),
        contents: emit_catalog_table(style, names, sampled, partition),
    });
    out
}

fn group_element_type(style: Style, names: &EmitNames) -> String {
    match style {
        Style::Enum => names.enum_name.clone(),
        Style::Map => "std::string".to_string(),
    }
}

fn push_std_includes(s: &mut String, style: Style) {
    let headers: &[&str] = match style {
        Style::Enum => &["array", "string", "utility", "vector"],
        Style::Map => &["map", "string", "vector"],
    };
    for h in headers {
        s.push_str(&format!("#include <{}>\n", h));
    }
}
