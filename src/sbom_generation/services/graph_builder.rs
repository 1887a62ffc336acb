use super::scope_propagator::ScopePropagator;
use crate::sbom_generation::domain::{
    Anomaly, AnomalyKind, Component, ComponentIdentity, DependencyGraph, EdgeKind, EvidenceRecord,
    ProjectEvidence,
};
use crate::shared::error::SbomError;
use crate::shared::Result;

/// A finalized graph together with the anomalies found while building it
#[derive(Debug, Clone)]
pub struct BuiltGraph {
    pub graph: DependencyGraph,
    pub anomalies: Vec<Anomaly>,
}

/// GraphBuilder folds evidence records into a dependency graph.
///
/// Records are applied one at a time; each merge sees the state left by the
/// previous ones. Edges may point at identities that are not declared yet,
/// which is resolved (or reported) by [`GraphBuilder::finalize`].
#[derive(Debug)]
pub struct GraphBuilder {
    graph: DependencyGraph,
    default_ecosystem: String,
    anomalies: Vec<Anomaly>,
}

impl GraphBuilder {
    pub fn new(root: Component, default_ecosystem: &str) -> Self {
        Self {
            graph: DependencyGraph::new(root),
            default_ecosystem: default_ecosystem.to_string(),
            anomalies: Vec::new(),
        }
    }

    /// Creates a builder rooted at the project's own component
    pub fn for_project(project: &ProjectEvidence) -> Result<Self> {
        Ok(Self::new(project.root_component()?, project.ecosystem()))
    }

    /// Builds, finalizes and scopes the graph of one project.
    ///
    /// Records are sorted into their canonical order first, so the result does
    /// not depend on the order the collector produced them in.
    ///
    /// # Errors
    /// Fails when two records carry conflicting hashes for one identity.
    pub fn build_project(project: &ProjectEvidence) -> Result<BuiltGraph> {
        let mut builder = Self::for_project(project)?;

        let mut records: Vec<&EvidenceRecord> = project.records.iter().collect();
        records.sort();
        for record in records {
            builder.ingest(record)?;
        }

        let mut built = builder.finalize();
        let scope_anomalies = ScopePropagator::propagate(&mut built.graph);
        built.anomalies.extend(scope_anomalies);

        for anomaly in &mut built.anomalies {
            anomaly.project = Some(project.name.clone());
        }
        Ok(built)
    }

    pub fn root(&self) -> &ComponentIdentity {
        self.graph.root()
    }

    /// Applies one evidence record.
    ///
    /// A record that cannot be normalized is skipped and reported as
    /// malformed; only an identity collision is an error.
    pub fn ingest(&mut self, record: &EvidenceRecord) -> Result<()> {
        let normalized = match record.normalize(&self.default_ecosystem) {
            Ok(normalized) => normalized,
            Err(reason) => {
                self.anomalies.push(Anomaly::new(
                    AnomalyKind::MalformedEvidence,
                    format!("skipped record '{}': {}", record.name, reason),
                ));
                return Ok(());
            }
        };

        let identity = self.add_or_merge_component(normalized.component)?;
        let parent = normalized
            .parent
            .unwrap_or_else(|| self.graph.root().clone());
        self.add_edge(parent, identity.clone(), normalized.edge_kind);

        for dependency in normalized.dependencies {
            self.add_edge(identity.clone(), dependency, EdgeKind::Required);
        }
        Ok(())
    }

    /// Inserts a component or merges it into the node with the same identity.
    /// Returns the canonical identity of the node.
    pub fn add_or_merge_component(&mut self, component: Component) -> Result<ComponentIdentity> {
        let identity = component.identity.clone();
        let node = match self.graph.component(&identity) {
            Some(existing) => merge_component(existing, &component)?,
            None => {
                ensure_consistent_hashes(&component, &component)?;
                component
            }
        };
        self.graph.insert_component(node);
        Ok(identity)
    }

    /// Adds a directed edge. Adding an existing edge only raises its kind.
    /// Self references are not stored; they are reported instead.
    pub fn add_edge(&mut self, from: ComponentIdentity, to: ComponentIdentity, kind: EdgeKind) -> bool {
        if from == to {
            self.anomalies.push(Anomaly::new(
                AnomalyKind::SelfReference,
                format!("{} declares a dependency on itself", from),
            ));
            return false;
        }
        self.graph.insert_edge(from, to, kind)
    }

    /// Drops every edge whose endpoints are not both declared
    pub fn finalize(mut self) -> BuiltGraph {
        for (from, to) in self.graph.dangling_edges() {
            let missing = if self.graph.contains(&from) { &to } else { &from };
            self.anomalies.push(Anomaly::new(
                AnomalyKind::DanglingEdge,
                format!("dropped edge {} -> {}: {} was never declared", from, to, missing),
            ));
            self.graph.remove_edge(&from, &to);
        }

        BuiltGraph {
            graph: self.graph,
            anomalies: self.anomalies,
        }
    }
}

/// Merges an incoming observation into an existing node with the same identity.
///
/// Existing non-empty values are kept and empty ones are filled from the
/// incoming component. Sets are unioned. Two digests of the same algorithm
/// with different content cannot both be true, so they fail the merge.
pub fn merge_component(existing: &Component, incoming: &Component) -> Result<Component> {
    ensure_consistent_hashes(incoming, incoming)?;
    ensure_consistent_hashes(existing, incoming)?;

    let mut merged = existing.clone();
    merged.hashes.extend(incoming.hashes.iter().cloned());
    merged.licenses.extend(incoming.licenses.iter().cloned());
    merged
        .external_references
        .extend(incoming.external_references.iter().cloned());

    if merged.version.is_none() {
        merged.version = incoming.version.clone();
    }
    if merged.component_type.is_none() {
        merged.component_type = incoming.component_type;
    }
    if merged.publisher.is_none() {
        merged.publisher = incoming.publisher.clone();
    }
    if merged.description.is_none() {
        merged.description = incoming.description.clone();
    }
    if merged.copyright.is_none() {
        merged.copyright = incoming.copyright.clone();
    }
    merged.scope = merged.scope.max(incoming.scope);

    Ok(merged)
}

/// Fails when `incoming` carries a digest whose algorithm `known` already
/// maps to different content. Passing the same component twice checks it
/// against itself.
fn ensure_consistent_hashes(known: &Component, incoming: &Component) -> Result<()> {
    for hash in &incoming.hashes {
        let conflict = known
            .hashes
            .iter()
            .find(|other| other.algorithm == hash.algorithm && other.content != hash.content);
        if let Some(other) = conflict {
            return Err(SbomError::IdentityCollisionConflict {
                identity: known.identity.to_string(),
                field: format!("{} hash", hash.algorithm),
                existing: other.content.clone(),
                incoming: hash.content.clone(),
            }
            .into());
        }
    }
    Ok(())
}
