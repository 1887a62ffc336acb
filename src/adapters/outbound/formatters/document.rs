//! Serde model of the CycloneDX document shared by every encoding.
//!
//! Field order in these structs is the field order of the emitted document.
//! Optional fields are skipped when empty and default when absent, so parsing
//! then re-encoding an emitted document reproduces it exactly.

use crate::sbom_generation::domain::{
    Bom, Component, ComponentIdentity, ComponentType, ExternalReference, HashDigest, License,
    SbomMetadata, Scope,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub(super) const BOM_FORMAT: &str = "CycloneDX";
pub(super) const SPEC_VERSION: &str = "1.6";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct BomDocument {
    bom_format: String,
    spec_version: String,
    #[serde(default = "default_document_version")]
    version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    serial_number: Option<String>,
    metadata: MetadataDocument,
    #[serde(default)]
    components: Vec<ComponentDocument>,
    #[serde(default)]
    dependencies: Vec<DependencyDocument>,
}

fn default_document_version() -> u32 {
    1
}

#[derive(Debug, Serialize, Deserialize)]
struct MetadataDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
    #[serde(default)]
    tools: Vec<ToolDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    component: Option<ComponentDocument>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ToolDocument {
    name: String,
    #[serde(default)]
    version: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ComponentDocument {
    #[serde(rename = "bom-ref")]
    bom_ref: String,
    #[serde(rename = "type", default)]
    component_type: ComponentType,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(default)]
    scope: Scope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    copyright: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    hashes: Vec<HashDocument>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    licenses: Vec<LicenseChoice>,
    #[serde(
        rename = "externalReferences",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    external_references: Vec<ExternalReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    purl: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct HashDocument {
    alg: String,
    content: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct LicenseChoice {
    license: License,
}

#[derive(Debug, Serialize, Deserialize)]
struct DependencyDocument {
    #[serde(rename = "ref")]
    bom_ref: String,
    #[serde(rename = "dependsOn", default, skip_serializing_if = "Vec::is_empty")]
    depends_on: Vec<String>,
}

impl BomDocument {
    pub(super) fn from_bom(bom: &Bom) -> Self {
        Self {
            bom_format: BOM_FORMAT.to_string(),
            spec_version: SPEC_VERSION.to_string(),
            version: 1,
            serial_number: bom.metadata.serial_number().map(str::to_string),
            metadata: MetadataDocument {
                timestamp: bom.metadata.timestamp().map(str::to_string),
                tools: vec![ToolDocument {
                    name: bom.metadata.tool_name().to_string(),
                    version: bom.metadata.tool_version().to_string(),
                }],
                component: Some(ComponentDocument::from_component(&bom.root)),
            },
            components: bom
                .components
                .values()
                .map(ComponentDocument::from_component)
                .collect(),
            dependencies: bom
                .dependencies
                .iter()
                .map(|(from, targets)| DependencyDocument {
                    bom_ref: from.to_string(),
                    depends_on: targets.iter().map(ToString::to_string).collect(),
                })
                .collect(),
        }
    }

    /// Converts a parsed document back into a BOM.
    ///
    /// # Errors
    /// Returns a description of the first structural problem: wrong
    /// `bomFormat`, missing root component, duplicate `bom-ref`, or a
    /// dependency that refers to an undeclared component.
    pub(super) fn into_bom(self) -> Result<Bom, String> {
        if self.bom_format != BOM_FORMAT {
            return Err(format!(
                "bomFormat is '{}', expected '{}'",
                self.bom_format, BOM_FORMAT
            ));
        }

        let (tool_name, tool_version) = self
            .metadata
            .tools
            .into_iter()
            .next()
            .map(|tool| (tool.name, tool.version))
            .unwrap_or_default();
        let metadata = SbomMetadata::new(
            self.metadata.timestamp,
            tool_name,
            tool_version,
            self.serial_number,
        );

        let root = self
            .metadata
            .component
            .ok_or_else(|| "metadata.component (the root component) is missing".to_string())?
            .into_component();

        let mut components = BTreeMap::new();
        for document in self.components {
            let component = document.into_component();
            if component.identity == root.identity || components.contains_key(&component.identity)
            {
                return Err(format!("duplicate bom-ref '{}'", component.identity));
            }
            components.insert(component.identity.clone(), component);
        }

        let is_declared =
            |id: &ComponentIdentity| *id == root.identity || components.contains_key(id);

        let mut dependencies: BTreeMap<ComponentIdentity, BTreeSet<ComponentIdentity>> =
            BTreeMap::new();
        for dependency in self.dependencies {
            let from = ComponentIdentity::new(dependency.bom_ref);
            let targets: BTreeSet<ComponentIdentity> = dependency
                .depends_on
                .into_iter()
                .map(ComponentIdentity::new)
                .collect();

            if let Some(unknown) = std::iter::once(&from)
                .chain(targets.iter())
                .find(|id| !is_declared(id))
            {
                return Err(format!(
                    "dependency entry for '{}' refers to undeclared component '{}'",
                    from, unknown
                ));
            }
            dependencies.entry(from).or_default().extend(targets);
        }

        Ok(Bom {
            metadata,
            root,
            components,
            dependencies,
        })
    }
}

impl ComponentDocument {
    fn from_component(component: &Component) -> Self {
        Self {
            bom_ref: component.identity.to_string(),
            component_type: component.effective_type(),
            name: component.name.clone(),
            version: component.version.clone(),
            scope: component.scope,
            publisher: component.publisher.clone(),
            description: component.description.clone(),
            copyright: component.copyright.clone(),
            hashes: component
                .hashes
                .iter()
                .map(|hash| HashDocument {
                    alg: hash.algorithm.clone(),
                    content: hash.content.clone(),
                })
                .collect(),
            licenses: component
                .licenses
                .iter()
                .map(|license| LicenseChoice {
                    license: license.clone(),
                })
                .collect(),
            external_references: component.external_references.iter().cloned().collect(),
            purl: component
                .identity
                .as_str()
                .starts_with("pkg:")
                .then(|| component.identity.to_string()),
        }
    }

    fn into_component(self) -> Component {
        let mut component = Component::new(
            ComponentIdentity::new(self.bom_ref),
            self.name,
            self.version,
            self.component_type,
        );
        component.scope = self.scope;
        component.publisher = self.publisher;
        component.description = self.description;
        component.copyright = self.copyright;
        component.hashes = self
            .hashes
            .into_iter()
            .map(|hash| HashDigest {
                algorithm: hash.alg,
                content: hash.content,
            })
            .collect();
        component.licenses = self.licenses.into_iter().map(|choice| choice.license).collect();
        component.external_references = self.external_references.into_iter().collect();
        component
    }
}
