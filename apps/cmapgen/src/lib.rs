//! cmapgen core library.
//!
//! This crate turns a colormap catalog into static C++ color tables: one
//! header per map, a name enum, and group tables collected into
//! `all_maps.h` / `all_maps.cpp`.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `source`: Colormap definitions, sampling, and the embedded catalog.
//! - `builder`: Name collection, filtering, grouping, and sampling.
//! - `emit`: C++ text rendering for both output layouts.
//! - `generate`: One generation run, including write/check decisions.
//! - `models`: Catalog file and report structs.
//! - `output`: Human/JSON printers.
//! - `error`: Error type shared across modules.
//! - `utils`: Supporting helpers.
pub mod builder;
pub mod cli;
pub mod config;
pub mod emit;
pub mod error;
pub mod generate;
pub mod models;
pub mod output;
pub mod source;
pub mod utils;
