use super::*;
use crate::application::dto::RootOverride;
use crate::sbom_generation::domain::{ComponentIdentity, EvidenceRecord, Scope, SourceKind};
use crate::sbom_generation::services::MetadataOptions;
use async_trait::async_trait;
use std::sync::Mutex;

// Mock implementations for testing
struct MockEvidenceSource {
    name: Option<String>,
    projects: Vec<ProjectEvidence>,
    unavailable: Vec<String>,
}

impl MockEvidenceSource {
    fn new(projects: Vec<ProjectEvidence>) -> Self {
        Self {
            name: None,
            projects,
            unavailable: Vec::new(),
        }
    }

    fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    fn with_unavailable(mut self, project: &str) -> Self {
        self.unavailable.push(project.to_string());
        self
    }
}

#[async_trait]
impl EvidenceSource for MockEvidenceSource {
    async fn list_projects(&self) -> Result<Vec<ProjectDescriptor>> {
        let mut descriptors: Vec<ProjectDescriptor> =
            self.projects.iter().map(ProjectEvidence::descriptor).collect();
        descriptors.extend(self.unavailable.iter().map(|name| ProjectDescriptor {
            name: name.clone(),
            is_test_project: false,
        }));
        Ok(descriptors)
    }

    async fn collect_evidence(&self, project: &ProjectDescriptor) -> Result<ProjectEvidence> {
        self.projects
            .iter()
            .find(|p| p.name == project.name)
            .cloned()
            .ok_or_else(|| {
                SbomError::SourceUnavailable {
                    project: project.name.clone(),
                    details: "restore output missing".to_string(),
                }
                .into()
            })
    }

    fn source_name(&self) -> Option<String> {
        self.name.clone()
    }
}

#[derive(Clone, Default)]
struct MockProgressReporter {
    messages: Arc<Mutex<Vec<String>>>,
}

impl MockProgressReporter {
    fn push(&self, message: String) {
        self.messages.lock().unwrap().push(message);
    }

    fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    fn contains(&self, needle: &str) -> bool {
        self.messages().iter().any(|m| m.contains(needle))
    }
}

impl ProgressReporter for MockProgressReporter {
    fn report(&self, message: &str) {
        self.push(message.to_string());
    }

    fn report_progress(&self, current: usize, total: usize, message: Option<&str>) {
        self.push(format!("[{}/{}] {}", current, total, message.unwrap_or("")));
    }

    fn report_warning(&self, message: &str) {
        self.push(format!("WARN {}", message));
    }

    fn report_error(&self, message: &str) {
        self.push(format!("ERROR {}", message));
    }

    fn report_completion(&self, message: &str) {
        self.push(format!("DONE {}", message));
    }
}

fn id(value: &str) -> ComponentIdentity {
    ComponentIdentity::from(value)
}

fn reproducible() -> SbomRequest {
    SbomRequest::new().with_metadata(MetadataOptions::reproducible())
}

/// App -> A (required), App -> B (development only)
fn app_project() -> ProjectEvidence {
    ProjectEvidence::new("App", Some("1.0.0"))
        .with_ecosystem("nuget")
        .with_record(EvidenceRecord::new(SourceKind::LockFile, "A", Some("1.0.0")))
        .with_record(
            EvidenceRecord::new(SourceKind::LockFile, "B", Some("2.0.0")).development_only(),
        )
}

fn web_project() -> ProjectEvidence {
    ProjectEvidence::new("Web", Some("1.0.0"))
        .with_ecosystem("nuget")
        .with_record(EvidenceRecord::new(SourceKind::LockFile, "A", Some("1.0.0")))
        .with_record(EvidenceRecord::new(SourceKind::LockFile, "C", Some("3.0.0")))
}

fn new_use_case(
    source: MockEvidenceSource,
) -> (
    GenerateSbomUseCase<MockEvidenceSource, MockProgressReporter>,
    MockProgressReporter,
) {
    let reporter = MockProgressReporter::default();
    (GenerateSbomUseCase::new(source, reporter.clone()), reporter)
}

#[tokio::test]
async fn test_single_project_keeps_its_own_root() {
    let (use_case, reporter) = new_use_case(MockEvidenceSource::new(vec![app_project()]));

    let response = use_case.execute(reproducible()).await.unwrap();
    let bom = &response.bom;

    assert_eq!(bom.root.identity, id("pkg:nuget/app@1.0.0"));
    assert_eq!(bom.component_count(), 2);
    assert_eq!(
        bom.components[&id("pkg:nuget/a@1.0.0")].scope,
        Scope::Required
    );
    assert_eq!(
        bom.components[&id("pkg:nuget/b@2.0.0")].scope,
        Scope::Excluded
    );
    assert!(response.failed_projects.is_empty());
    assert!(!response.is_partial());
    assert!(bom.metadata.timestamp().is_none());
    assert!(bom.metadata.serial_number().is_none());
    assert!(reporter.contains("✅ Detected 1 project(s)"));
    assert!(reporter.contains("[1/1] App"));
}

#[tokio::test]
async fn test_exclude_dev_prunes_development_only_components() {
    let (use_case, _) = new_use_case(MockEvidenceSource::new(vec![app_project()]));

    let response = use_case
        .execute(reproducible().with_exclude_dev(true))
        .await
        .unwrap();

    assert_eq!(response.excluded_dev_count, 1);
    assert!(response.bom.component(&id("pkg:nuget/b@2.0.0")).is_none());
    assert_eq!(
        response.bom.dependencies_of(&id("pkg:nuget/app@1.0.0")),
        vec![&id("pkg:nuget/a@1.0.0")]
    );
}

#[tokio::test]
async fn test_multiple_projects_merge_under_named_meta_root() {
    let source = MockEvidenceSource::new(vec![app_project(), web_project()]).named("shop");
    let (use_case, reporter) = new_use_case(source);

    let response = use_case.execute(reproducible()).await.unwrap();
    let bom = &response.bom;

    assert_eq!(bom.root.identity, id("pkg:generic/shop"));
    assert_eq!(
        bom.dependencies_of(&bom.root.identity),
        vec![&id("pkg:nuget/app@1.0.0"), &id("pkg:nuget/web@1.0.0")]
    );
    // A appears once even though both projects declare it
    assert_eq!(bom.component_count(), 5);
    assert!(reporter.contains("Merging 2 project graph(s) under 'shop'"));
}

#[tokio::test]
async fn test_meta_root_uses_override_then_default_name() {
    let (use_case, _) = new_use_case(MockEvidenceSource::new(vec![app_project(), web_project()]));
    let response = use_case.execute(reproducible()).await.unwrap();
    assert_eq!(response.bom.root.identity, id("pkg:generic/solution"));

    let (use_case, _) = new_use_case(MockEvidenceSource::new(vec![app_project(), web_project()]));
    let request = reproducible().with_root_override(RootOverride {
        name: Some("Platform".to_string()),
        version: Some("5.0.0".to_string()),
        component_type: None,
    });
    let response = use_case.execute(request).await.unwrap();
    assert_eq!(response.bom.root.identity, id("pkg:generic/platform@5.0.0"));
    assert_eq!(response.bom.root.name, "Platform");
    assert_eq!(response.bom.root.component_type, Some(ComponentType::Application));
}

#[tokio::test]
async fn test_root_override_applies_to_single_project() {
    let (use_case, _) = new_use_case(MockEvidenceSource::new(vec![app_project()]));
    let request = reproducible().with_root_override(RootOverride {
        name: Some("Store".to_string()),
        version: Some("2.1.0".to_string()),
        component_type: Some(ComponentType::Framework),
    });

    let response = use_case.execute(request).await.unwrap();

    assert_eq!(response.bom.root.identity, id("pkg:nuget/store@2.1.0"));
    assert_eq!(response.bom.root.component_type, Some(ComponentType::Framework));
    assert_eq!(response.bom.component_count(), 2);
}

#[tokio::test]
async fn test_failed_project_is_reported_and_left_out() {
    let source = MockEvidenceSource::new(vec![app_project()]).with_unavailable("Legacy");
    let (use_case, reporter) = new_use_case(source);

    let response = use_case.execute(reproducible()).await.unwrap();

    assert!(response.is_partial());
    assert_eq!(response.failed_projects.len(), 1);
    assert_eq!(response.failed_projects[0].project, "Legacy");
    assert!(response.failed_projects[0]
        .message
        .contains("restore output missing"));
    // Still merged: the input listed two projects
    assert_eq!(response.bom.root.identity, id("pkg:generic/solution"));
    assert!(response.bom.component(&id("pkg:nuget/a@1.0.0")).is_some());
    assert!(reporter.contains("ERROR Project 'Legacy' was left out of the BOM"));
}

#[tokio::test]
async fn test_all_projects_failed_is_an_error() {
    let source = MockEvidenceSource::new(Vec::new())
        .with_unavailable("Api")
        .with_unavailable("Worker");
    let (use_case, _) = new_use_case(source);

    let error = use_case.execute(reproducible()).await.unwrap_err();

    assert!(matches!(
        error.downcast_ref::<SbomError>(),
        Some(SbomError::AllProjectsFailed { count: 2 })
    ));
}

#[tokio::test]
async fn test_exclude_test_projects() {
    let mut tests_project = ProjectEvidence::new("App.Tests", Some("1.0.0"))
        .with_ecosystem("nuget")
        .with_record(EvidenceRecord::new(SourceKind::LockFile, "xunit", Some("2.4.2")));
    tests_project.test_project = true;
    let (use_case, reporter) = new_use_case(MockEvidenceSource::new(vec![app_project(), tests_project]));

    let response = use_case
        .execute(reproducible().with_exclude_test_projects(true))
        .await
        .unwrap();

    assert_eq!(response.skipped_test_projects, 1);
    // One project left, so no meta-root
    assert_eq!(response.bom.root.identity, id("pkg:nuget/app@1.0.0"));
    assert!(response.bom.component(&id("pkg:nuget/xunit@2.4.2")).is_none());
    assert!(reporter.contains("Skipped 1 test project(s)"));
}

#[tokio::test]
async fn test_only_test_projects_is_an_error() {
    let mut tests_project = ProjectEvidence::new("App.Tests", None);
    tests_project.test_project = true;
    let (use_case, _) = new_use_case(MockEvidenceSource::new(vec![tests_project]));

    let error = use_case
        .execute(reproducible().with_exclude_test_projects(true))
        .await
        .unwrap_err();

    assert!(error.to_string().contains("test projects"));
}

#[tokio::test]
async fn test_exclude_patterns_and_unmatched_warning() {
    let (use_case, reporter) = new_use_case(MockEvidenceSource::new(vec![app_project()]));

    let response = use_case
        .execute(reproducible().with_exclude_patterns(vec!["a".to_string(), "zzz*".to_string()]))
        .await
        .unwrap();

    assert_eq!(response.excluded_by_pattern_count, 1);
    assert!(response.bom.component(&id("pkg:nuget/a@1.0.0")).is_none());
    assert!(reporter.contains("WARN Exclude pattern 'zzz*' did not match any component."));
}

/// App -> A -> C (required), App -> D (development) -> C
fn shared_transitive_project() -> ProjectEvidence {
    ProjectEvidence::new("App", Some("1.0.0"))
        .with_ecosystem("nuget")
        .with_record(EvidenceRecord::new(SourceKind::LockFile, "A", Some("1.0.0")))
        .with_record(
            EvidenceRecord::new(SourceKind::LockFile, "D", Some("1.0.0")).development_only(),
        )
        .with_record(
            EvidenceRecord::new(SourceKind::LockFile, "C", Some("1.0.0"))
                .with_parent("A", Some("1.0.0")),
        )
        .with_record(
            EvidenceRecord::new(SourceKind::LockFile, "C", Some("1.0.0"))
                .with_parent("D", Some("1.0.0")),
        )
}

#[tokio::test]
async fn test_pattern_exclusion_recomputes_scopes() {
    let (use_case, _) = new_use_case(MockEvidenceSource::new(vec![shared_transitive_project()]));

    let response = use_case
        .execute(reproducible().with_exclude_patterns(vec!["a".to_string()]))
        .await
        .unwrap();
    let bom = &response.bom;

    assert!(bom.component(&id("pkg:nuget/a@1.0.0")).is_none());
    assert_eq!(
        bom.components[&id("pkg:nuget/c@1.0.0")].scope,
        Scope::Excluded
    );
    assert_eq!(
        bom.components[&id("pkg:nuget/d@1.0.0")].scope,
        Scope::Excluded
    );
}

#[tokio::test]
async fn test_pattern_exclusion_with_exclude_dev_prunes_rescoped_components() {
    // App -> A -> C (required), App -> B -> C (development)
    let project = ProjectEvidence::new("App", Some("1.0.0"))
        .with_ecosystem("nuget")
        .with_record(EvidenceRecord::new(SourceKind::LockFile, "A", Some("1.0.0")))
        .with_record(EvidenceRecord::new(SourceKind::LockFile, "B", Some("1.0.0")))
        .with_record(
            EvidenceRecord::new(SourceKind::LockFile, "C", Some("1.0.0"))
                .with_parent("A", Some("1.0.0")),
        )
        .with_record(
            EvidenceRecord::new(SourceKind::LockFile, "C", Some("1.0.0"))
                .with_parent("B", Some("1.0.0"))
                .development_only(),
        );
    let (use_case, _) = new_use_case(MockEvidenceSource::new(vec![project]));

    let response = use_case
        .execute(
            reproducible()
                .with_exclude_dev(true)
                .with_exclude_patterns(vec!["a".to_string()]),
        )
        .await
        .unwrap();
    let bom = &response.bom;

    assert!(bom.component(&id("pkg:nuget/a@1.0.0")).is_none());
    assert!(bom.component(&id("pkg:nuget/c@1.0.0")).is_none());
    assert_eq!(bom.component_count(), 1);
    assert_eq!(response.excluded_dev_count, 1);
    assert_eq!(response.excluded_by_pattern_count, 1);
}

#[tokio::test]
async fn test_excluding_everything_is_an_error() {
    let (use_case, _) = new_use_case(MockEvidenceSource::new(vec![app_project()]));

    let error = use_case
        .execute(reproducible().with_exclude_patterns(vec!["*".to_string()]))
        .await
        .unwrap_err();

    assert!(error.to_string().contains("All 2 component(s) were excluded"));
}

#[tokio::test]
async fn test_invalid_pattern_fails_before_collection() {
    let (use_case, reporter) = new_use_case(MockEvidenceSource::new(vec![app_project()]));

    let result = use_case
        .execute(reproducible().with_exclude_patterns(vec!["bad pattern!".to_string()]))
        .await;

    assert!(result.is_err());
    assert!(reporter.messages().is_empty());
}

#[tokio::test]
async fn test_anomalies_are_returned_and_reported() {
    let project = ProjectEvidence::new("App", Some("1.0.0"))
        .with_ecosystem("nuget")
        .with_record(
            EvidenceRecord::new(SourceKind::LockFile, "Y", Some("1.0.0"))
                .with_dependency("Z", Some("1.0.0")),
        );
    let (use_case, reporter) = new_use_case(MockEvidenceSource::new(vec![project]));

    let response = use_case.execute(reproducible()).await.unwrap();

    assert_eq!(response.anomalies.len(), 1);
    assert_eq!(
        response.anomalies[0].kind,
        crate::sbom_generation::domain::AnomalyKind::DanglingEdge
    );
    assert_eq!(response.anomalies[0].project.as_deref(), Some("App"));
    assert!(reporter.contains("WARN [App] dangling edge"));
    assert!(response.bom.component(&id("pkg:nuget/z@1.0.0")).is_none());
}

#[tokio::test]
async fn test_output_does_not_depend_on_listing_order() {
    let forward = MockEvidenceSource::new(vec![app_project(), web_project()]);
    let backward = MockEvidenceSource::new(vec![web_project(), app_project()]);

    let (first, _) = new_use_case(forward);
    let (second, _) = new_use_case(backward);
    let request = reproducible().with_max_concurrency(1);

    let a = first.execute(request.clone()).await.unwrap();
    let b = second.execute(request).await.unwrap();

    assert_eq!(a.bom, b.bom);
}
