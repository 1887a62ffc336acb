use crate::sbom_generation::domain::{
    Anomaly, AnomalyKind, ComponentIdentity, DependencyGraph, EdgeKind, Scope,
};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// ScopePropagator computes each component's effective scope from reachability.
///
/// Pass 1 walks from the root over non-development edges. A Required edge
/// passes its parent's scope on, an Optional edge caps it at Optional, and a
/// component keeps the best scope offered by any path. Pass 2 walks over every
/// edge; whatever it reaches that pass 1 did not is Excluded.
///
/// Both passes use a work queue and a visited table, so cycles and deep
/// chains are safe.
pub struct ScopePropagator;

impl ScopePropagator {
    /// Rewrites the scope of every component. Returns one anomaly per
    /// component that no edge connects to the root.
    pub fn propagate(graph: &mut DependencyGraph) -> Vec<Anomaly> {
        let production = Self::production_scopes(graph);
        let reachable = graph.reachable_from_root(|_| true);

        let identities: Vec<ComponentIdentity> =
            graph.components().map(|c| c.identity.clone()).collect();

        let mut anomalies = Vec::new();
        for identity in identities {
            let scope = match production.get(&identity) {
                Some(scope) => *scope,
                None if reachable.contains(&identity) => Scope::Excluded,
                None => {
                    anomalies.push(Anomaly::new(
                        AnomalyKind::UnreachableComponent,
                        format!("{} is not reachable from the root", identity),
                    ));
                    Scope::Excluded
                }
            };
            if let Some(component) = graph.component_mut(&identity) {
                component.scope = scope;
            }
        }

        let root = graph.root().clone();
        if let Some(component) = graph.component_mut(&root) {
            component.scope = Scope::Required;
        }

        anomalies
    }

    /// Removes every Excluded component and its edges. Returns the number removed.
    pub fn prune_excluded(graph: &mut DependencyGraph) -> usize {
        let excluded: BTreeSet<ComponentIdentity> = graph
            .components()
            .filter(|c| c.scope == Scope::Excluded)
            .map(|c| c.identity.clone())
            .collect();
        graph.remove_components(&excluded)
    }

    /// Best scope offered to each component over non-development paths
    fn production_scopes(graph: &DependencyGraph) -> BTreeMap<ComponentIdentity, Scope> {
        let root = graph.root().clone();
        let mut scopes = BTreeMap::new();
        let mut queue = VecDeque::new();
        scopes.insert(root.clone(), Scope::Required);
        queue.push_back(root);

        while let Some(current) = queue.pop_front() {
            let current_scope = scopes.get(&current).copied().unwrap_or(Scope::Excluded);

            for (next, kind) in graph.dependencies(&current) {
                let offered = match kind {
                    EdgeKind::Development => continue,
                    EdgeKind::Optional => current_scope.min(Scope::Optional),
                    EdgeKind::Required => current_scope,
                };

                let improves = scopes.get(next).map_or(true, |known| offered > *known);
                if improves {
                    scopes.insert(next.clone(), offered);
                    queue.push_back(next.clone());
                }
            }
        }

        scopes
    }
}
