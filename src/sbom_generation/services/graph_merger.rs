use super::graph_builder::{BuiltGraph, GraphBuilder};
use super::scope_propagator::ScopePropagator;
use crate::sbom_generation::domain::{Component, DependencyGraph, EdgeKind, DEFAULT_ECOSYSTEM};
use crate::shared::Result;

/// MultiProjectMerger unions independently built project graphs under one meta-root.
///
/// Nodes are merged by identity with the same rule as single-project
/// construction, edges are unioned, and every project root becomes a Required
/// dependency of the meta-root. Scope is recomputed on the merged graph.
///
/// A component unreachable in the merged graph was already unreachable in
/// its own project, where the build reported it, so the merge reports no
/// reachability anomalies of its own.
pub struct MultiProjectMerger;

impl MultiProjectMerger {
    /// Merges project graphs. Graphs are reduced in root identity order, with
    /// ties broken by graph content, so the result does not depend on the
    /// order projects were listed or finished in.
    ///
    /// # Errors
    /// Fails when two projects carry conflicting hashes for one identity.
    pub fn merge(meta_root: Component, mut graphs: Vec<DependencyGraph>) -> Result<BuiltGraph> {
        graphs.sort();

        let mut builder = GraphBuilder::new(meta_root, DEFAULT_ECOSYSTEM);
        let meta_identity = builder.root().clone();

        for graph in &graphs {
            for component in graph.components() {
                builder.add_or_merge_component(component.clone())?;
            }
            for component in graph.components() {
                for (to, kind) in graph.dependencies(&component.identity) {
                    builder.add_edge(component.identity.clone(), to.clone(), kind);
                }
            }
            builder.add_edge(meta_identity.clone(), graph.root().clone(), EdgeKind::Required);
        }

        let mut built = builder.finalize();
        let _ = ScopePropagator::propagate(&mut built.graph);
        Ok(built)
    }
}
