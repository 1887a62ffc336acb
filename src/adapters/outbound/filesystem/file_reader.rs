use crate::ports::outbound::EvidenceSource;
use crate::sbom_generation::domain::{ProjectDescriptor, ProjectEvidence};
use crate::shared::error::SbomError;
use crate::shared::security::read_checked_file;
use crate::shared::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// On-disk evidence bundle: the records collected for one or more projects
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct EvidenceBundle {
    #[serde(default)]
    name: Option<String>,
    /// Ecosystem applied to projects that do not name their own
    #[serde(default)]
    ecosystem: Option<String>,
    #[serde(default)]
    projects: Vec<BundledProject>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct BundledProject {
    #[serde(flatten)]
    evidence: ProjectEvidence,
    /// False when the collector could not gather this project's evidence
    #[serde(default = "default_available")]
    available: bool,
    #[serde(default)]
    unavailable_reason: Option<String>,
}

fn default_available() -> bool {
    true
}

/// EvidenceFileSource adapter for pre-collected evidence bundles
///
/// Reads a bundle from JSON (`.json`, also the fallback), YAML (`.yml`,
/// `.yaml`) or TOML (`.toml`). The file is read once, with the same
/// symlink and size checks as every other input file.
#[derive(Debug)]
pub struct EvidenceFileSource {
    path: PathBuf,
    name: Option<String>,
    projects: Vec<BundledProject>,
}

impl EvidenceFileSource {
    /// Opens and parses an evidence bundle
    ///
    /// # Errors
    /// - [`SbomError::EvidenceFileNotFound`] if the file does not exist
    /// - [`SbomError::FileReadError`] if it is a symlink, too large, or unreadable
    /// - [`SbomError::EvidenceParseError`] if it cannot be decoded or lists a
    ///   project twice
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SbomError::EvidenceFileNotFound {
                path: path.to_path_buf(),
                suggestion: "Check the --input path, or run from the directory containing the evidence file".to_string(),
            }
            .into());
        }

        let content =
            read_checked_file(path, "evidence file").map_err(|e| SbomError::FileReadError {
                path: path.to_path_buf(),
                details: e.to_string(),
            })?;

        let bundle = parse_bundle(path, &content).map_err(|details| {
            SbomError::EvidenceParseError {
                path: path.to_path_buf(),
                details,
            }
        })?;

        let mut seen = HashSet::new();
        for project in &bundle.projects {
            if !seen.insert(project.evidence.name.as_str()) {
                return Err(SbomError::EvidenceParseError {
                    path: path.to_path_buf(),
                    details: format!("project '{}' is listed more than once", project.evidence.name),
                }
                .into());
            }
        }

        let default_ecosystem = bundle.ecosystem;
        let projects = bundle
            .projects
            .into_iter()
            .map(|mut project| {
                if project.evidence.ecosystem.is_none() {
                    project.evidence.ecosystem = default_ecosystem.clone();
                }
                project
            })
            .collect();

        Ok(Self {
            path: path.to_path_buf(),
            name: bundle.name,
            projects,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn parse_bundle(path: &Path, content: &str) -> std::result::Result<EvidenceBundle, String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("yml") | Some("yaml") => serde_yaml_ng::from_str(content).map_err(|e| e.to_string()),
        Some("toml") => toml::from_str(content).map_err(|e| e.to_string()),
        _ => serde_json::from_str(content).map_err(|e| e.to_string()),
    }
}

/// Replaces characters a package name cannot hold, so a file stem can name a meta-root
fn sanitize_name(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '-'
            }
        })
        .collect()
}

#[async_trait]
impl EvidenceSource for EvidenceFileSource {
    async fn list_projects(&self) -> Result<Vec<ProjectDescriptor>> {
        Ok(self
            .projects
            .iter()
            .map(|project| project.evidence.descriptor())
            .collect())
    }

    async fn collect_evidence(&self, descriptor: &ProjectDescriptor) -> Result<ProjectEvidence> {
        let project = self
            .projects
            .iter()
            .find(|project| project.evidence.name == descriptor.name)
            .ok_or_else(|| SbomError::SourceUnavailable {
                project: descriptor.name.clone(),
                details: format!("not present in {}", self.path.display()),
            })?;

        if !project.available {
            return Err(SbomError::SourceUnavailable {
                project: descriptor.name.clone(),
                details: project
                    .unavailable_reason
                    .clone()
                    .unwrap_or_else(|| "marked unavailable by the collector".to_string()),
            }
            .into());
        }

        Ok(project.evidence.clone())
    }

    fn source_name(&self) -> Option<String> {
        self.name
            .clone()
            .or_else(|| {
                self.path
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(str::to_string)
            })
            .map(|name| sanitize_name(name.trim()))
            .filter(|name| !name.is_empty())
    }
}
