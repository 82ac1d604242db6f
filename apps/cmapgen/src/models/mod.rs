//! Shared data models for catalog files and generation reports.

pub mod catalog;

use serde::Serialize;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
/// Outcome for one emitted file.
pub struct FileAction {
    pub file: String,
    pub changed: bool,
    pub wrote: bool,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
/// One group's final membership.
pub struct GroupSummary {
    pub name: String,
    pub members: Vec<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
/// Aggregated counts used by printers.
pub struct Summary {
    pub maps: usize,
    pub files: usize,
    pub changed: usize,
    pub wrote: usize,
    pub uncategorized: usize,
}

#[derive(Serialize, Debug, Clone)]
/// Generation results container.
pub struct GenerateReport {
    pub files: Vec<FileAction>,
    pub groups: Vec<GroupSummary>,
    pub uncategorized: Vec<String>,
    pub summary: Summary,
}
