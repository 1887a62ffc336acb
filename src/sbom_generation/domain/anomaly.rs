use std::fmt;

/// Category of a non-fatal inconsistency found while assembling a graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnomalyKind {
    /// An evidence record could not be normalized and was skipped
    MalformedEvidence,
    /// An edge pointed at a component that was never declared
    DanglingEdge,
    /// A component declared a dependency on itself
    SelfReference,
    /// A component is not reachable from the root by any edge
    UnreachableComponent,
}

impl AnomalyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyKind::MalformedEvidence => "malformed evidence",
            AnomalyKind::DanglingEdge => "dangling edge",
            AnomalyKind::SelfReference => "self reference",
            AnomalyKind::UnreachableComponent => "unreachable component",
        }
    }
}

/// Anomaly recorded instead of failing the build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anomaly {
    pub kind: AnomalyKind,
    pub message: String,
    /// Project the anomaly was found in, once known
    pub project: Option<String>,
}

impl Anomaly {
    pub fn new(kind: AnomalyKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            project: None,
        }
    }

    pub fn in_project(mut self, project: &str) -> Self {
        self.project = Some(project.to_string());
        self
    }
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.project {
            Some(project) => write!(f, "[{}] {}: {}", project, self.kind.as_str(), self.message),
            None => write!(f, "{}: {}", self.kind.as_str(), self.message),
        }
    }
}
