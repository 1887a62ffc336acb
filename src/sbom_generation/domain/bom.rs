use super::component::Component;
use super::dependency_graph::DependencyGraph;
use super::identity::ComponentIdentity;
use super::sbom_metadata::SbomMetadata;
use std::collections::{BTreeMap, BTreeSet};

/// Bom aggregate: the finalized, serializable view of a dependency graph.
///
/// The root lives in the metadata section; `components` holds every other
/// node. `dependencies` has one entry per node that was present when the BOM
/// was built, including nodes without outgoing edges. Edge kinds are not part
/// of the document, so a BOM only records who depends on whom.
#[derive(Debug, Clone, PartialEq)]
pub struct Bom {
    pub metadata: SbomMetadata,
    pub root: Component,
    pub components: BTreeMap<ComponentIdentity, Component>,
    pub dependencies: BTreeMap<ComponentIdentity, BTreeSet<ComponentIdentity>>,
}

impl Bom {
    /// Builds the BOM for a finalized graph
    pub fn from_graph(metadata: SbomMetadata, graph: &DependencyGraph) -> Self {
        let root = with_default_type(graph.root_component());

        let components = graph
            .components()
            .filter(|component| component.identity != root.identity)
            .map(|component| (component.identity.clone(), with_default_type(component)))
            .collect();

        let dependencies = graph
            .components()
            .map(|component| {
                let targets = graph
                    .dependencies(&component.identity)
                    .map(|(to, _)| to.clone())
                    .collect();
                (component.identity.clone(), targets)
            })
            .collect();

        Self {
            metadata,
            root,
            components,
            dependencies,
        }
    }

    /// Component by identity, the root included
    pub fn component(&self, identity: &ComponentIdentity) -> Option<&Component> {
        if self.root.identity == *identity {
            Some(&self.root)
        } else {
            self.components.get(identity)
        }
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn dependency_count(&self) -> usize {
        self.dependencies.values().map(BTreeSet::len).sum()
    }

    /// Direct dependencies of a component; empty when it has no entry
    pub fn dependencies_of(&self, identity: &ComponentIdentity) -> Vec<&ComponentIdentity> {
        self.dependencies
            .get(identity)
            .map(|targets| targets.iter().collect())
            .unwrap_or_default()
    }
}

fn with_default_type(component: &Component) -> Component {
    let mut component = component.clone();
    component.component_type = Some(component.effective_type());
    component
}
