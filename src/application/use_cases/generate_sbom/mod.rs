use crate::application::dto::{ProjectFailure, RootOverride, SbomRequest, SbomResponse};
use crate::ports::outbound::{EvidenceSource, ProgressReporter};
use crate::sbom_generation::domain::{
    Anomaly, Bom, Component, ComponentType, DependencyGraph, ProjectDescriptor, ProjectEvidence,
};
use crate::sbom_generation::services::{
    BuiltGraph, ComponentFilter, GraphBuilder, MultiProjectMerger, SbomGenerator,
    ScopePropagator,
};
use crate::shared::error::SbomError;
use crate::shared::Result;
use futures::stream::{self, StreamExt};
use std::sync::Arc;

/// Name of the meta-root when neither the request nor the source names one
const DEFAULT_META_ROOT_NAME: &str = "solution";

/// Outcome of collecting and building one project
type ProjectOutcome = (String, Result<BuiltGraph>);

/// GenerateSbomUseCase - Core use case for BOM assembly
///
/// This use case orchestrates evidence collection, per-project graph
/// construction, multi-project merging and exclusion, using generic
/// dependency injection for the infrastructure it talks to.
///
/// # Type Parameters
/// * `ES` - EvidenceSource implementation
/// * `PR` - ProgressReporter implementation
pub struct GenerateSbomUseCase<ES, PR> {
    evidence_source: Arc<ES>,
    progress_reporter: PR,
}

impl<ES, PR> GenerateSbomUseCase<ES, PR>
where
    ES: EvidenceSource + 'static,
    PR: ProgressReporter,
{
    /// Creates a new GenerateSbomUseCase with injected dependencies
    pub fn new(evidence_source: ES, progress_reporter: PR) -> Self {
        Self {
            evidence_source: Arc::new(evidence_source),
            progress_reporter,
        }
    }

    /// Executes the BOM assembly use case
    ///
    /// # Arguments
    /// * `request` - Exclusion, root and metadata options
    ///
    /// # Returns
    /// SbomResponse containing the BOM, the anomalies found on the way and
    /// the projects that had to be left out
    ///
    /// # Errors
    /// Fails when the source cannot list its projects, when the exclusion
    /// patterns are invalid, or when no project could be built.
    pub async fn execute(&self, request: SbomRequest) -> Result<SbomResponse> {
        // Validate patterns before any evidence is read
        let filter = ComponentFilter::new(request.exclude_patterns.clone())?;

        // Step 1: List projects
        let (projects, skipped_test_projects) = self.list_projects(&request).await?;
        let project_count = projects.len();

        // Step 2: Collect evidence and build one graph per project
        let outcomes = self.build_projects(projects, &request).await;

        // Step 3: Separate failed projects from built graphs
        let (graphs, mut anomalies, failed_projects) = self.split_outcomes(outcomes);
        if graphs.is_empty() {
            return Err(SbomError::AllProjectsFailed {
                count: failed_projects.len(),
            }
            .into());
        }

        // Step 4: Merge under a meta-root when the input had several projects
        let mut built = self.assemble(graphs, &request, project_count)?;
        anomalies.append(&mut built.anomalies);
        let mut graph = built.graph;

        // Step 5: Apply exclusions
        let (excluded_dev_count, excluded_by_pattern_count) =
            self.apply_exclusions(&mut graph, &filter, &request)?;

        // Step 6: Surface anomalies
        for anomaly in &anomalies {
            self.progress_reporter.report_warning(&anomaly.to_string());
        }

        // Step 7: Build the BOM
        let metadata = SbomGenerator::generate_default_metadata(request.metadata);
        let bom = Bom::from_graph(metadata, &graph);

        self.progress_reporter.report_completion(&format!(
            "Assembled {} component(s) with {} dependency relationship(s) from {} project(s)",
            bom.component_count(),
            bom.dependency_count(),
            project_count - failed_projects.len()
        ));

        Ok(SbomResponse {
            bom,
            anomalies,
            failed_projects,
            excluded_dev_count,
            excluded_by_pattern_count,
            skipped_test_projects,
        })
    }

    /// Lists the source's projects, dropping test projects when requested
    ///
    /// # Returns
    /// Tuple of (projects to process, number of skipped test projects)
    async fn list_projects(&self, request: &SbomRequest) -> Result<(Vec<ProjectDescriptor>, usize)> {
        self.progress_reporter.report("📖 Discovering projects...");

        let mut projects = self.evidence_source.list_projects().await?;
        let listed = projects.len();
        if request.exclude_test_projects {
            projects.retain(|project| !project.is_test_project);
        }
        let skipped = listed - projects.len();

        if projects.is_empty() {
            return Err(SbomError::Validation {
                message: if skipped > 0 {
                    format!("All {} project(s) are test projects; nothing to assemble", skipped)
                } else {
                    "The evidence source contains no projects".to_string()
                },
            }
            .into());
        }

        self.progress_reporter
            .report(&format!("✅ Detected {} project(s)", projects.len()));
        if skipped > 0 {
            self.progress_reporter
                .report(&format!("🚫 Skipped {} test project(s)", skipped));
        }

        Ok((projects, skipped))
    }

    /// Collects and builds every project with bounded concurrency
    ///
    /// Outcomes come back in listing order regardless of completion order.
    async fn build_projects(
        &self,
        projects: Vec<ProjectDescriptor>,
        request: &SbomRequest,
    ) -> Vec<ProjectOutcome> {
        let total = projects.len();
        // A lone project takes the root override itself
        let root_override = (total == 1 && !request.root_override.is_empty())
            .then(|| request.root_override.clone());

        self.progress_reporter.report("🔨 Building dependency graphs...");

        let mut pending = stream::iter(projects.into_iter().map(|descriptor| {
            let source = Arc::clone(&self.evidence_source);
            let root_override = root_override.clone();
            async move {
                let outcome = Self::collect_and_build(source, &descriptor, root_override).await;
                (descriptor.name, outcome)
            }
        }))
        .buffered(request.max_concurrency.max(1));

        let mut outcomes = Vec::with_capacity(total);
        while let Some((name, outcome)) = pending.next().await {
            self.progress_reporter
                .report_progress(outcomes.len() + 1, total, Some(&name));
            outcomes.push((name, outcome));
        }
        outcomes
    }

    /// Collects one project's evidence and builds its graph off the async runtime
    async fn collect_and_build(
        source: Arc<ES>,
        descriptor: &ProjectDescriptor,
        root_override: Option<RootOverride>,
    ) -> Result<BuiltGraph> {
        let mut evidence = source.collect_evidence(descriptor).await?;
        if let Some(root_override) = root_override {
            root_override.apply_to(&mut evidence);
        }
        tokio::task::spawn_blocking(move || GraphBuilder::build_project(&evidence))
            .await
            .map_err(|e| {
                anyhow::anyhow!(
                    "Graph construction task failed for '{}': {}",
                    descriptor.name,
                    e
                )
            })?
    }

    /// Splits outcomes into graphs, their anomalies and failed projects,
    /// reporting each failure
    fn split_outcomes(
        &self,
        outcomes: Vec<ProjectOutcome>,
    ) -> (Vec<DependencyGraph>, Vec<Anomaly>, Vec<ProjectFailure>) {
        let mut graphs = Vec::new();
        let mut anomalies = Vec::new();
        let mut failures = Vec::new();

        for (project, outcome) in outcomes {
            match outcome {
                Ok(built) => {
                    anomalies.extend(built.anomalies);
                    graphs.push(built.graph);
                }
                Err(e) => {
                    let message = format!("{:#}", e);
                    self.progress_reporter.report_error(&format!(
                        "Project '{}' was left out of the BOM: {}",
                        project, message
                    ));
                    failures.push(ProjectFailure { project, message });
                }
            }
        }

        (graphs, anomalies, failures)
    }

    /// Produces the single graph the BOM is built from
    ///
    /// A single-project input keeps its own root. Several projects are merged
    /// under a meta-root even when only one of them succeeded, so the shape
    /// of the output does not depend on which projects failed.
    fn assemble(
        &self,
        mut graphs: Vec<DependencyGraph>,
        request: &SbomRequest,
        project_count: usize,
    ) -> Result<BuiltGraph> {
        if project_count == 1 {
            if let Some(graph) = graphs.pop() {
                return Ok(BuiltGraph {
                    graph,
                    anomalies: Vec::new(),
                });
            }
        }

        let meta_root = self.meta_root(request)?;
        self.progress_reporter.report(&format!(
            "🔗 Merging {} project graph(s) under '{}'",
            graphs.len(),
            meta_root.name
        ));
        MultiProjectMerger::merge(meta_root, graphs)
    }

    /// Synthesizes the meta-root component for a multi-project BOM
    fn meta_root(&self, request: &SbomRequest) -> Result<Component> {
        let root_override = &request.root_override;
        let name = root_override
            .name
            .clone()
            .or_else(|| self.evidence_source.source_name())
            .unwrap_or_else(|| DEFAULT_META_ROOT_NAME.to_string());

        let mut evidence = ProjectEvidence::new(&name, root_override.version.as_deref());
        evidence.component_type = Some(
            root_override
                .component_type
                .unwrap_or(ComponentType::Application),
        );
        evidence.root_component()
    }

    /// Applies development pruning and exclusion patterns
    ///
    /// # Returns
    /// Tuple of (components pruned as development-only, components excluded by pattern)
    ///
    /// # Errors
    /// Returns an error if the patterns removed every dependency
    fn apply_exclusions(
        &self,
        graph: &mut DependencyGraph,
        filter: &ComponentFilter,
        request: &SbomRequest,
    ) -> Result<(usize, usize)> {
        let mut excluded_dev = if request.exclude_dev {
            ScopePropagator::prune_excluded(graph)
        } else {
            0
        };

        if filter.is_empty() {
            self.report_dev_exclusions(excluded_dev);
            return Ok((excluded_dev, 0));
        }

        let dependencies_before = graph.component_count() - 1;
        let excluded_by_pattern = filter.apply(graph);
        if excluded_by_pattern > 0 {
            // Unreachable components were already reported when the graph was built
            let _ = ScopePropagator::propagate(graph);
            if request.exclude_dev {
                excluded_dev += ScopePropagator::prune_excluded(graph);
            }
            self.progress_reporter.report(&format!(
                "🚫 Excluded {} component(s) based on filters",
                excluded_by_pattern
            ));
        }
        self.report_dev_exclusions(excluded_dev);

        if dependencies_before > 0 && graph.component_count() == 1 {
            anyhow::bail!(
                "All {} component(s) were excluded by the provided filters. \
                     The BOM would be empty. Please adjust your exclusion patterns.",
                dependencies_before
            );
        }

        for pattern in filter.unmatched_patterns() {
            self.progress_reporter.report_warning(&format!(
                "Exclude pattern '{}' did not match any component.",
                pattern
            ));
        }

        Ok((excluded_dev, excluded_by_pattern))
    }

    fn report_dev_exclusions(&self, excluded_dev: usize) {
        if excluded_dev > 0 {
            self.progress_reporter.report(&format!(
                "🚫 Excluded {} development-only component(s)",
                excluded_dev
            ));
        }
    }
}

#[cfg(test)]
mod tests;
