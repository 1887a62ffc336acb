use crate::sbom_generation::domain::{Anomaly, Bom};

/// A project whose evidence could not be turned into a graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFailure {
    pub project: String,
    pub message: String,
}

/// SbomResponse - Internal response DTO from the BOM generation use case
#[derive(Debug, Clone)]
pub struct SbomResponse {
    pub bom: Bom,
    /// Non-fatal inconsistencies found while building and merging
    pub anomalies: Vec<Anomaly>,
    /// Projects left out of the BOM because they failed
    pub failed_projects: Vec<ProjectFailure>,
    /// Components removed by `--exclude-dev`
    pub excluded_dev_count: usize,
    /// Components removed by exclusion patterns
    pub excluded_by_pattern_count: usize,
    pub skipped_test_projects: usize,
}

impl SbomResponse {
    /// True when at least one project failed but a BOM was still assembled
    pub fn is_partial(&self) -> bool {
        !self.failed_projects.is_empty()
    }
}
