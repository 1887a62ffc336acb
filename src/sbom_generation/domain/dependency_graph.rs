use super::component::{Component, Scope};
use super::identity::ComponentIdentity;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// How a dependency was declared.
///
/// Declared from least to most permissive so that a repeated edge keeps the
/// `max` of its declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeKind {
    /// Development-only (test tooling, analyzers, build-time helpers)
    Development,
    /// Declared optional by its parent
    Optional,
    Required,
}

/// DependencyGraph aggregate: a flat node table keyed by identity plus a
/// separate adjacency table.
///
/// Both tables are ordered maps, so iteration is already the stable total
/// order used for output. Cycles are representable; every traversal carries a
/// visited set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DependencyGraph {
    root: ComponentIdentity,
    components: BTreeMap<ComponentIdentity, Component>,
    edges: BTreeMap<ComponentIdentity, BTreeMap<ComponentIdentity, EdgeKind>>,
}

impl DependencyGraph {
    /// Creates a graph containing only its root. The root is always Required.
    pub fn new(mut root: Component) -> Self {
        root.scope = Scope::Required;
        let root_identity = root.identity.clone();
        let mut components = BTreeMap::new();
        components.insert(root_identity.clone(), root);
        Self {
            root: root_identity,
            components,
            edges: BTreeMap::new(),
        }
    }

    pub fn root(&self) -> &ComponentIdentity {
        &self.root
    }

    pub fn root_component(&self) -> &Component {
        &self.components[&self.root]
    }

    pub fn component(&self, identity: &ComponentIdentity) -> Option<&Component> {
        self.components.get(identity)
    }

    pub fn contains(&self, identity: &ComponentIdentity) -> bool {
        self.components.contains_key(identity)
    }

    /// Components (root included) in identity order
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    /// Direct dependencies of a component in identity order
    pub fn dependencies(
        &self,
        identity: &ComponentIdentity,
    ) -> impl Iterator<Item = (&ComponentIdentity, EdgeKind)> {
        self.edges
            .get(identity)
            .into_iter()
            .flat_map(|targets| targets.iter().map(|(to, kind)| (to, *kind)))
    }

    pub fn edge_kind(&self, from: &ComponentIdentity, to: &ComponentIdentity) -> Option<EdgeKind> {
        self.edges.get(from).and_then(|targets| targets.get(to)).copied()
    }

    /// All components in the stable output order
    pub fn ordered_components(&self) -> Vec<&Component> {
        self.components.values().collect()
    }

    /// All edges as `(from, to)` pairs in the stable output order
    pub fn ordered_edges(&self) -> Vec<(&ComponentIdentity, &ComponentIdentity)> {
        self.edges
            .iter()
            .flat_map(|(from, targets)| targets.keys().map(move |to| (from, to)))
            .collect()
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeMap::len).sum()
    }

    pub fn direct_dependency_count(&self) -> usize {
        self.edges.get(&self.root).map_or(0, BTreeMap::len)
    }

    /// Identities reachable from the root following only edges accepted by `follow`.
    /// The root itself is always included.
    pub fn reachable_from_root(&self, follow: impl Fn(EdgeKind) -> bool) -> BTreeSet<ComponentIdentity> {
        let mut visited = BTreeSet::new();
        let mut queue = VecDeque::new();
        visited.insert(self.root.clone());
        queue.push_back(self.root.clone());

        while let Some(current) = queue.pop_front() {
            for (next, kind) in self.dependencies(&current) {
                if follow(kind) && visited.insert(next.clone()) {
                    queue.push_back(next.clone());
                }
            }
        }

        visited
    }

    pub(crate) fn component_mut(&mut self, identity: &ComponentIdentity) -> Option<&mut Component> {
        self.components.get_mut(identity)
    }

    /// Inserts or replaces a component. Replacing the root keeps it Required.
    pub(crate) fn insert_component(&mut self, mut component: Component) {
        if component.identity == self.root {
            component.scope = Scope::Required;
        }
        self.components.insert(component.identity.clone(), component);
    }

    /// Inserts an edge, keeping the most permissive kind when it already exists.
    /// Returns true when the edge is new.
    pub(crate) fn insert_edge(
        &mut self,
        from: ComponentIdentity,
        to: ComponentIdentity,
        kind: EdgeKind,
    ) -> bool {
        let targets = self.edges.entry(from).or_default();
        match targets.get_mut(&to) {
            Some(existing) => {
                *existing = (*existing).max(kind);
                false
            }
            None => {
                targets.insert(to, kind);
                true
            }
        }
    }

    /// Edges whose endpoints are not both present in the node table
    pub(crate) fn dangling_edges(&self) -> Vec<(ComponentIdentity, ComponentIdentity)> {
        self.ordered_edges()
            .into_iter()
            .filter(|(from, to)| !self.contains(from) || !self.contains(to))
            .map(|(from, to)| (from.clone(), to.clone()))
            .collect()
    }

    pub(crate) fn remove_edge(&mut self, from: &ComponentIdentity, to: &ComponentIdentity) {
        if let Some(targets) = self.edges.get_mut(from) {
            targets.remove(to);
            if targets.is_empty() {
                self.edges.remove(from);
            }
        }
    }

    /// Removes components together with every edge touching them.
    /// The root is never removed. Returns how many components were removed.
    pub(crate) fn remove_components(&mut self, identities: &BTreeSet<ComponentIdentity>) -> usize {
        let mut removed = 0;
        for identity in identities {
            if *identity == self.root {
                continue;
            }
            if self.components.remove(identity).is_some() {
                removed += 1;
            }
            self.edges.remove(identity);
        }

        let root = &self.root;
        for targets in self.edges.values_mut() {
            targets.retain(|to, _| !identities.contains(to) || to == root);
        }
        self.edges.retain(|_, targets| !targets.is_empty());

        removed
    }
}
