use crate::sbom_generation::domain::{ComponentType, ProjectEvidence};
use crate::sbom_generation::services::MetadataOptions;

/// Number of projects collected and built at the same time by default
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Explicit name, version and type for the BOM root
///
/// With a single project the override rewrites that project's own root;
/// with several it describes the meta-root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootOverride {
    pub name: Option<String>,
    pub version: Option<String>,
    pub component_type: Option<ComponentType>,
}

impl RootOverride {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.version.is_none() && self.component_type.is_none()
    }

    pub(crate) fn apply_to(&self, project: &mut ProjectEvidence) {
        if let Some(name) = &self.name {
            project.name = name.clone();
        }
        if let Some(version) = &self.version {
            project.version = Some(version.clone());
        }
        if let Some(component_type) = self.component_type {
            project.component_type = Some(component_type);
        }
    }
}

/// SbomRequest - Internal request DTO for the BOM generation use case
#[derive(Debug, Clone)]
pub struct SbomRequest {
    /// Patterns for excluding components from the BOM
    pub exclude_patterns: Vec<String>,
    /// Drop Excluded (development-only) components instead of keeping them with scope `excluded`
    pub exclude_dev: bool,
    /// Skip projects flagged as test projects
    pub exclude_test_projects: bool,
    pub root_override: RootOverride,
    pub metadata: MetadataOptions,
    /// Upper bound on projects processed concurrently
    pub max_concurrency: usize,
}

impl Default for SbomRequest {
    fn default() -> Self {
        Self {
            exclude_patterns: Vec::new(),
            exclude_dev: false,
            exclude_test_projects: false,
            root_override: RootOverride::default(),
            metadata: MetadataOptions::default(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

impl SbomRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_exclude_patterns(mut self, patterns: Vec<String>) -> Self {
        self.exclude_patterns = patterns;
        self
    }

    pub fn with_exclude_dev(mut self, exclude_dev: bool) -> Self {
        self.exclude_dev = exclude_dev;
        self
    }

    pub fn with_exclude_test_projects(mut self, exclude: bool) -> Self {
        self.exclude_test_projects = exclude;
        self
    }

    pub fn with_root_override(mut self, root_override: RootOverride) -> Self {
        self.root_override = root_override;
        self
    }

    pub fn with_metadata(mut self, metadata: MetadataOptions) -> Self {
        self.metadata = metadata;
        self
    }

    /// Sets the concurrency bound; zero is raised to one
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }
}
