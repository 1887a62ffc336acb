//! Evidence records: the normalized observations handed over by evidence collectors.
//!
//! Collectors read manifests, lock/assets files and resolved package metadata;
//! each observation arrives here as an [`EvidenceRecord`]. Records are plain
//! data until [`EvidenceRecord::normalize`] turns them into a component
//! candidate plus the edge that introduced it.

use super::component::{
    non_blank, Component, ComponentType, ExternalReference, HashDigest, License,
};
use super::dependency_graph::EdgeKind;
use super::identity::{ComponentIdentity, IdentityResolver};
use super::package::{PackageCoordinate, Version};
use serde::{Deserialize, Serialize};

/// Ecosystem used when neither the record nor its project names one
pub const DEFAULT_ECOSYSTEM: &str = "generic";

/// Where a record was observed.
///
/// Declared from most to least authoritative; canonical record ordering uses
/// this order, so resolved package metadata fills fields first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    PackageMetadata,
    LockFile,
    Manifest,
}

/// Reference to another package by coordinate, used for parents and for
/// dependencies listed by a lock file entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PackageReference {
    #[serde(default)]
    pub namespace: Option<String>,
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
}

/// One observation of a dependency relationship or of component metadata.
///
/// `parent: None` marks a dependency declared by the project root.
/// `depends_on` lists edges from this component that a lock file recorded;
/// their targets are expected to be declared by other records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EvidenceRecord {
    pub source_kind: SourceKind,
    #[serde(default)]
    pub ecosystem: Option<String>,
    #[serde(default)]
    pub namespace: Option<String>,
    pub name: String,
    #[serde(default)]
    pub declared_version: Option<String>,
    #[serde(default)]
    pub resolved_version: Option<String>,
    #[serde(default)]
    pub development_only: bool,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub parent: Option<PackageReference>,
    #[serde(default)]
    pub depends_on: Vec<PackageReference>,
    #[serde(default)]
    pub component_type: Option<ComponentType>,
    #[serde(default)]
    pub hashes: Vec<HashDigest>,
    #[serde(default)]
    pub licenses: Vec<License>,
    #[serde(default)]
    pub external_references: Vec<ExternalReference>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub copyright: Option<String>,
}

impl EvidenceRecord {
    /// Minimal record for a dependency declared by the project root
    pub fn new(source_kind: SourceKind, name: &str, resolved_version: Option<&str>) -> Self {
        Self {
            source_kind,
            ecosystem: None,
            namespace: None,
            name: name.to_string(),
            declared_version: None,
            resolved_version: resolved_version.map(str::to_string),
            development_only: false,
            optional: false,
            parent: None,
            depends_on: Vec::new(),
            component_type: None,
            hashes: Vec::new(),
            licenses: Vec::new(),
            external_references: Vec::new(),
            publisher: None,
            description: None,
            copyright: None,
        }
    }

    pub fn with_parent(mut self, name: &str, version: Option<&str>) -> Self {
        self.parent = Some(PackageReference {
            namespace: None,
            name: name.to_string(),
            version: version.map(str::to_string),
        });
        self
    }

    pub fn with_dependency(mut self, name: &str, version: Option<&str>) -> Self {
        self.depends_on.push(PackageReference {
            namespace: None,
            name: name.to_string(),
            version: version.map(str::to_string),
        });
        self
    }

    pub fn development_only(mut self) -> Self {
        self.development_only = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Kind of the edge from the parent to this record's component.
    /// Development-only wins over optional.
    pub fn edge_kind(&self) -> EdgeKind {
        if self.development_only {
            EdgeKind::Development
        } else if self.optional {
            EdgeKind::Optional
        } else {
            EdgeKind::Required
        }
    }

    /// Version used for identity: the resolved version, or the declared one
    /// when it is an exact version rather than a range.
    fn identity_version(&self) -> Option<&str> {
        non_blank_str(self.resolved_version.as_deref()).or_else(|| {
            non_blank_str(self.declared_version.as_deref()).filter(|v| Version::is_exact(v))
        })
    }

    /// Validates the record and derives its component candidate.
    ///
    /// # Errors
    /// Returns a human-readable reason when the record is malformed; callers
    /// record it as an anomaly and skip the record.
    pub fn normalize(&self, default_ecosystem: &str) -> Result<NormalizedEvidence, String> {
        let ecosystem = non_blank_str(self.ecosystem.as_deref()).unwrap_or(default_ecosystem);
        let coordinate = PackageCoordinate::new(ecosystem, self.namespace.as_deref(), &self.name)
            .map_err(|e| e.to_string())?;

        let version = self
            .identity_version()
            .map(Version::parse)
            .transpose()
            .map_err(|e| e.to_string())?
            .flatten();

        let identity = IdentityResolver::resolve(&coordinate, version.as_ref());

        let parent = self
            .parent
            .as_ref()
            .map(|parent| resolve_reference(parent, ecosystem))
            .transpose()
            .map_err(|e| format!("invalid parent reference: {}", e))?;

        let dependencies = self
            .depends_on
            .iter()
            .map(|dependency| resolve_reference(dependency, ecosystem))
            .collect::<Result<Vec<_>, String>>()
            .map_err(|e| format!("invalid dependency reference: {}", e))?;

        let mut component = Component::new(
            identity,
            coordinate.name().as_str(),
            version.map(|v| v.as_str().to_string()),
            self.component_type,
        );

        for hash in &self.hashes {
            component.hashes.insert(hash.normalized()?);
        }
        for license in &self.licenses {
            component.licenses.insert(license.normalized()?);
        }
        for reference in &self.external_references {
            component.external_references.insert(reference.normalized()?);
        }
        component.publisher = non_blank(self.publisher.as_deref());
        component.description = non_blank(self.description.as_deref());
        component.copyright = non_blank(self.copyright.as_deref());

        Ok(NormalizedEvidence {
            component,
            parent,
            edge_kind: self.edge_kind(),
            dependencies,
        })
    }
}

fn resolve_reference(
    reference: &PackageReference,
    ecosystem: &str,
) -> Result<ComponentIdentity, String> {
    let coordinate =
        PackageCoordinate::new(ecosystem, reference.namespace.as_deref(), &reference.name)
            .map_err(|e| e.to_string())?;
    let version = non_blank_str(reference.version.as_deref())
        .map(Version::parse)
        .transpose()
        .map_err(|e| e.to_string())?
        .flatten();
    Ok(IdentityResolver::resolve(&coordinate, version.as_ref()))
}

fn non_blank_str(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// A validated record: the component it describes and the edge that introduced it
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedEvidence {
    pub component: Component,
    /// `None` when the dependency was declared by the project root
    pub parent: Option<ComponentIdentity>,
    pub edge_kind: EdgeKind,
    /// Targets of the edges this component declares itself
    pub dependencies: Vec<ComponentIdentity>,
}

/// Identifies a scanned project before its evidence is collected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDescriptor {
    pub name: String,
    pub is_test_project: bool,
}

/// Everything collected for one project (or one target framework of a project)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectEvidence {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub ecosystem: Option<String>,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub component_type: Option<ComponentType>,
    #[serde(default)]
    pub test_project: bool,
    #[serde(default)]
    pub records: Vec<EvidenceRecord>,
}

impl ProjectEvidence {
    pub fn new(name: &str, version: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            version: version.map(str::to_string),
            ecosystem: None,
            namespace: None,
            component_type: None,
            test_project: false,
            records: Vec::new(),
        }
    }

    pub fn with_ecosystem(mut self, ecosystem: &str) -> Self {
        self.ecosystem = Some(ecosystem.to_string());
        self
    }

    pub fn with_record(mut self, record: EvidenceRecord) -> Self {
        self.records.push(record);
        self
    }

    pub fn ecosystem(&self) -> &str {
        non_blank_str(self.ecosystem.as_deref()).unwrap_or(DEFAULT_ECOSYSTEM)
    }

    pub fn descriptor(&self) -> ProjectDescriptor {
        ProjectDescriptor {
            name: self.name.clone(),
            is_test_project: self.test_project,
        }
    }

    /// Builds the root component representing the project itself
    pub fn root_component(&self) -> crate::shared::Result<Component> {
        let coordinate =
            PackageCoordinate::new(self.ecosystem(), self.namespace.as_deref(), &self.name)?;
        let version = self
            .version
            .as_deref()
            .map(Version::parse)
            .transpose()?
            .flatten();
        let identity = IdentityResolver::resolve(&coordinate, version.as_ref());

        Ok(Component::new(
            identity,
            coordinate.name().as_str(),
            version.map(|v| v.as_str().to_string()),
            self.component_type.unwrap_or(ComponentType::Application),
        ))
    }
}
