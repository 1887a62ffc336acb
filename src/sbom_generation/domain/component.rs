use super::identity::ComponentIdentity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Kind of software a component represents (CycloneDX component types)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentType {
    Application,
    Framework,
    #[default]
    Library,
    Container,
    OperatingSystem,
    Device,
    Firmware,
    File,
}

impl ComponentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Application => "application",
            ComponentType::Framework => "framework",
            ComponentType::Library => "library",
            ComponentType::Container => "container",
            ComponentType::OperatingSystem => "operating-system",
            ComponentType::Device => "device",
            ComponentType::Firmware => "firmware",
            ComponentType::File => "file",
        }
    }
}

impl std::str::FromStr for ComponentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "application" => Ok(ComponentType::Application),
            "framework" => Ok(ComponentType::Framework),
            "library" => Ok(ComponentType::Library),
            "container" => Ok(ComponentType::Container),
            "operating-system" => Ok(ComponentType::OperatingSystem),
            "device" => Ok(ComponentType::Device),
            "firmware" => Ok(ComponentType::Firmware),
            "file" => Ok(ComponentType::File),
            _ => Err(format!(
                "Invalid component type: {}. Expected one of application, framework, library, container, operating-system, device, firmware, file",
                s
            )),
        }
    }
}

/// Inclusion classification of a component.
///
/// Variants are declared from least to most permissive so that `Ord::max`
/// picks the winning scope when several paths disagree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Excluded,
    Optional,
    #[default]
    Required,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Excluded => "excluded",
            Scope::Optional => "optional",
            Scope::Required => "required",
        }
    }
}

/// Hash digest of a package artifact
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HashDigest {
    pub algorithm: String,
    pub content: String,
}

impl HashDigest {
    /// Normalizes algorithm spelling and digest casing.
    ///
    /// Returns an error message when the algorithm is unknown or the digest is
    /// not hexadecimal.
    pub fn normalized(&self) -> Result<Self, String> {
        let algorithm = normalize_hash_algorithm(&self.algorithm)
            .ok_or_else(|| format!("unsupported hash algorithm '{}'", self.algorithm))?;

        let content = self.content.trim();
        if content.is_empty() || !content.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!(
                "{} digest '{}' is not a hexadecimal string",
                algorithm, self.content
            ));
        }

        Ok(Self {
            algorithm: algorithm.to_string(),
            content: content.to_lowercase(),
        })
    }
}

fn normalize_hash_algorithm(raw: &str) -> Option<&'static str> {
    let key: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_uppercase();

    match key.as_str() {
        "MD5" => Some("MD5"),
        "SHA1" => Some("SHA-1"),
        "SHA256" => Some("SHA-256"),
        "SHA384" => Some("SHA-384"),
        "SHA512" => Some("SHA-512"),
        "SHA3256" => Some("SHA3-256"),
        "SHA3384" => Some("SHA3-384"),
        "SHA3512" => Some("SHA3-512"),
        "BLAKE2B256" => Some("BLAKE2b-256"),
        "BLAKE2B384" => Some("BLAKE2b-384"),
        "BLAKE2B512" => Some("BLAKE2b-512"),
        "BLAKE3" => Some("BLAKE3"),
        _ => None,
    }
}

/// License entry: an SPDX identifier, a free-form name, or both
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct License {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl License {
    pub fn spdx(id: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            name: None,
            url: None,
        }
    }

    pub fn named(name: &str) -> Self {
        Self {
            id: None,
            name: Some(name.to_string()),
            url: None,
        }
    }

    /// Trims every field and drops blank ones. A license needs an id or a name.
    pub fn normalized(&self) -> Result<Self, String> {
        let license = Self {
            id: non_blank(self.id.as_deref()),
            name: non_blank(self.name.as_deref()),
            url: non_blank(self.url.as_deref()),
        };
        if license.id.is_none() && license.name.is_none() {
            return Err("license entry has neither an id nor a name".to_string());
        }
        Ok(license)
    }
}

/// Kind of an external reference (CycloneDX external reference types)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExternalReferenceKind {
    Website,
    Vcs,
    Distribution,
    IssueTracker,
    Documentation,
    License,
    Other,
}

/// Typed URL attached to a component
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExternalReference {
    #[serde(rename = "type")]
    pub kind: ExternalReferenceKind,
    pub url: String,
}

impl ExternalReference {
    pub fn normalized(&self) -> Result<Self, String> {
        let url = self.url.trim();
        if url.is_empty() || url.chars().any(char::is_whitespace) {
            return Err(format!("external reference url '{}' is invalid", self.url));
        }
        Ok(Self {
            kind: self.kind,
            url: url.to_string(),
        })
    }
}

/// A node of the BOM graph
///
/// List-valued fields are sets so that unions suppress duplicates by content
/// and iterate in a stable order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Component {
    pub identity: ComponentIdentity,
    pub name: String,
    pub version: Option<String>,
    /// `None` until some evidence declares a type; the BOM reports it as a library
    pub component_type: Option<ComponentType>,
    pub scope: Scope,
    pub hashes: BTreeSet<HashDigest>,
    pub licenses: BTreeSet<License>,
    pub external_references: BTreeSet<ExternalReference>,
    pub publisher: Option<String>,
    pub description: Option<String>,
    pub copyright: Option<String>,
}

impl Component {
    /// Creates a Required component with no metadata
    pub fn new(
        identity: ComponentIdentity,
        name: impl Into<String>,
        version: Option<String>,
        component_type: impl Into<Option<ComponentType>>,
    ) -> Self {
        Self {
            identity,
            name: name.into(),
            version,
            component_type: component_type.into(),
            scope: Scope::Required,
            hashes: BTreeSet::new(),
            licenses: BTreeSet::new(),
            external_references: BTreeSet::new(),
            publisher: None,
            description: None,
            copyright: None,
        }
    }

    pub fn identity(&self) -> &ComponentIdentity {
        &self.identity
    }

    /// Declared type, or the library default
    pub fn effective_type(&self) -> ComponentType {
        self.component_type.unwrap_or_default()
    }
}

/// Trims an optional string and maps blank values to `None`
pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_scope_ordering_prefers_required() {
        assert!(Scope::Required > Scope::Optional);
        assert!(Scope::Optional > Scope::Excluded);
        assert_eq!(Scope::Optional.max(Scope::Required), Scope::Required);
    }

    #[test]
    fn test_component_type_from_str() {
        assert_eq!(
            ComponentType::from_str("Operating-System").unwrap(),
            ComponentType::OperatingSystem
        );
        assert!(ComponentType::from_str("widget").is_err());
    }

    #[test]
    fn test_hash_normalizes_algorithm_and_case() {
        let hash = HashDigest {
            algorithm: "sha512".to_string(),
            content: " ABCDEF01 ".to_string(),
        };
        let normalized = hash.normalized().unwrap();
        assert_eq!(normalized.algorithm, "SHA-512");
        assert_eq!(normalized.content, "abcdef01");
    }

    #[test]
    fn test_hash_rejects_unknown_algorithm() {
        let hash = HashDigest {
            algorithm: "crc32".to_string(),
            content: "abcd".to_string(),
        };
        assert!(hash.normalized().unwrap_err().contains("crc32"));
    }

    #[test]
    fn test_hash_rejects_non_hex_content() {
        let hash = HashDigest {
            algorithm: "SHA-256".to_string(),
            content: "not/hex==".to_string(),
        };
        assert!(hash.normalized().is_err());
    }

    #[test]
    fn test_license_requires_id_or_name() {
        let empty = License {
            id: Some("  ".to_string()),
            name: None,
            url: Some("https://example.com".to_string()),
        };
        assert!(empty.normalized().is_err());
        assert_eq!(License::spdx(" MIT ").normalized().unwrap().id.as_deref(), Some("MIT"));
    }

    #[test]
    fn test_external_reference_rejects_blank_url() {
        let reference = ExternalReference {
            kind: ExternalReferenceKind::Vcs,
            url: " ".to_string(),
        };
        assert!(reference.normalized().is_err());
    }

    #[test]
    fn test_component_new_defaults() {
        let component = Component::new(
            ComponentIdentity::from("pkg:nuget/serilog@3.1.1"),
            "Serilog",
            Some("3.1.1".to_string()),
            ComponentType::Library,
        );
        assert_eq!(component.scope, Scope::Required);
        assert!(component.hashes.is_empty());
        assert!(component.publisher.is_none());
    }
}
