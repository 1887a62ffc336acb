use crate::sbom_generation::domain::{ProjectDescriptor, ProjectEvidence};
use crate::shared::Result;
use async_trait::async_trait;

/// EvidenceSource port for collecting dependency evidence
///
/// This port abstracts whatever gathers manifest, lock file and package
/// metadata observations (a pre-collected evidence bundle, a package manager
/// integration, etc.) and hands them over as normalized records.
///
/// # Async Support
/// Collection is async so that several projects can be gathered concurrently.
/// Implementations must be `Send + Sync` to be shared across worker tasks.
#[async_trait]
pub trait EvidenceSource: Send + Sync {
    /// Lists the projects this source can provide evidence for
    ///
    /// # Errors
    /// Returns an error if the source itself cannot be read
    async fn list_projects(&self) -> Result<Vec<ProjectDescriptor>>;

    /// Collects every evidence record of one project
    ///
    /// # Errors
    /// Returns [`SbomError::SourceUnavailable`](crate::shared::error::SbomError::SourceUnavailable)
    /// when the project's evidence cannot be obtained. The failure is local to
    /// that project.
    async fn collect_evidence(&self, project: &ProjectDescriptor) -> Result<ProjectEvidence>;

    /// Name used for a meta-root when several projects are merged
    fn source_name(&self) -> Option<String> {
        None
    }
}
