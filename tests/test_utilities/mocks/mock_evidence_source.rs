use async_trait::async_trait;
use sbom_assembler::prelude::*;
use sbom_assembler::sbom_generation::domain::ProjectDescriptor;
use sbom_assembler::shared::error::SbomError;
use std::collections::BTreeSet;
use std::time::Duration;

/// Mock EvidenceSource serving in-memory projects
///
/// Projects can be marked unavailable, and collection of a project can be
/// delayed to make completion order differ from listing order.
#[derive(Default, Clone)]
pub struct MockEvidenceSource {
    name: Option<String>,
    projects: Vec<ProjectEvidence>,
    unavailable: BTreeSet<String>,
    delays_ms: Vec<(String, u64)>,
}

impl MockEvidenceSource {
    pub fn new(projects: Vec<ProjectEvidence>) -> Self {
        Self {
            projects,
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_unavailable(mut self, project: &str) -> Self {
        self.unavailable.insert(project.to_string());
        self
    }

    pub fn with_delay(mut self, project: &str, millis: u64) -> Self {
        self.delays_ms.push((project.to_string(), millis));
        self
    }
}

#[async_trait]
impl EvidenceSource for MockEvidenceSource {
    async fn list_projects(&self) -> Result<Vec<ProjectDescriptor>> {
        Ok(self.projects.iter().map(ProjectEvidence::descriptor).collect())
    }

    async fn collect_evidence(&self, project: &ProjectDescriptor) -> Result<ProjectEvidence> {
        if let Some((_, millis)) = self.delays_ms.iter().find(|(name, _)| *name == project.name) {
            tokio::time::sleep(Duration::from_millis(*millis)).await;
        }

        if self.unavailable.contains(&project.name) {
            return Err(SbomError::SourceUnavailable {
                project: project.name.clone(),
                details: "assets file not found".to_string(),
            }
            .into());
        }

        self.projects
            .iter()
            .find(|p| p.name == project.name)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("unknown project '{}'", project.name))
    }

    fn source_name(&self) -> Option<String> {
        self.name.clone()
    }
}
