use super::package::{PackageCoordinate, Version};

/// Canonical identity of a component within one BOM.
///
/// The identity is a Package URL built from the case-folded coordinate and the
/// normalized version, e.g. `pkg:nuget/newtonsoft.json@13.0.1`. A component
/// whose version is unknown gets a version-less Package URL, which never
/// collides with any versioned identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentIdentity(String);

impl ComponentIdentity {
    /// Wraps an identity string read back from a serialized document.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ComponentIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ComponentIdentity {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// IdentityResolver derives the dedup key for a package reference.
pub struct IdentityResolver;

impl IdentityResolver {
    /// Resolves the canonical identity for a coordinate and an optional version.
    pub fn resolve(coordinate: &PackageCoordinate, version: Option<&Version>) -> ComponentIdentity {
        let mut purl = format!("pkg:{}/", coordinate.ecosystem());

        if let Some(namespace) = coordinate.namespace() {
            for segment in namespace.split('/').filter(|s| !s.is_empty()) {
                purl.push_str(&urlencoding::encode(&segment.to_lowercase()));
                purl.push('/');
            }
        }

        purl.push_str(&urlencoding::encode(&coordinate.name().canonical()));

        if let Some(version) = version {
            purl.push('@');
            purl.push_str(&urlencoding::encode(version.as_str()));
        }

        ComponentIdentity(purl)
    }
}
