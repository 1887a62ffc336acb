pub mod anomaly;
pub mod bom;
pub mod component;
pub mod dependency_graph;
pub mod evidence;
pub mod identity;
pub mod package;
pub mod sbom_metadata;

pub use anomaly::{Anomaly, AnomalyKind};
pub use bom::Bom;
pub use component::{
    Component, ComponentType, ExternalReference, ExternalReferenceKind, HashDigest, License, Scope,
};
pub use dependency_graph::{DependencyGraph, EdgeKind};
pub use evidence::{
    EvidenceRecord, NormalizedEvidence, PackageReference, ProjectDescriptor, ProjectEvidence,
    SourceKind, DEFAULT_ECOSYSTEM,
};
pub use identity::{ComponentIdentity, IdentityResolver};
pub use package::{PackageCoordinate, PackageName, Version};
pub use sbom_metadata::SbomMetadata;
