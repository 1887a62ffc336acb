use crate::shared::Result;

/// Maximum length for package names (security limit)
const MAX_PACKAGE_NAME_LENGTH: usize = 255;

/// Maximum length for package versions (security limit)
const MAX_VERSION_LENGTH: usize = 100;

/// Maximum length for an ecosystem (Package URL type) identifier
const MAX_ECOSYSTEM_LENGTH: usize = 32;

/// NewType wrapper for package name with validation
///
/// The display casing is preserved as supplied; [`PackageName::canonical`]
/// gives the case-folded form used for identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageName(String);

impl PackageName {
    pub fn new(name: String) -> Result<Self> {
        let name = name.trim().to_string();
        if name.is_empty() {
            anyhow::bail!("Package name cannot be empty");
        }

        if name.len() > MAX_PACKAGE_NAME_LENGTH {
            anyhow::bail!(
                "Package name is too long ({} bytes). Maximum allowed: {} bytes",
                name.len(),
                MAX_PACKAGE_NAME_LENGTH
            );
        }

        if !name.chars().all(|c| {
            c.is_alphanumeric() || c == '-' || c == '_' || c == '.' || c == '[' || c == ']'
        }) {
            anyhow::bail!(
                "Package name '{}' contains invalid characters. Only alphanumeric, hyphens, underscores, dots, and brackets are allowed.",
                name
            );
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-folded name; ecosystems disagree on casing between sources.
    pub fn canonical(&self) -> String {
        self.0.to_lowercase()
    }
}

impl std::fmt::Display for PackageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// NewType wrapper for a resolved package version.
///
/// Holds the normalized form: leading `v` dropped, build metadata removed,
/// numeric releases padded to three components, a zero fourth component
/// removed, lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version(String);

impl Version {
    /// Parses and normalizes a version. Returns `Ok(None)` for blank input.
    pub fn parse(raw: &str) -> Result<Option<Self>> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        if trimmed.len() > MAX_VERSION_LENGTH {
            anyhow::bail!(
                "Package version is too long ({} bytes). Maximum allowed: {} bytes",
                trimmed.len(),
                MAX_VERSION_LENGTH
            );
        }

        if !trimmed
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == '+' || c == '_')
        {
            anyhow::bail!(
                "Package version '{}' contains invalid characters. Only alphanumeric, dots, hyphens, underscores and plus are allowed.",
                trimmed
            );
        }

        let normalized = normalize_version(trimmed);
        if normalized.is_empty() {
            return Ok(None);
        }
        Ok(Some(Self(normalized)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when the input looks like a single exact version rather than
    /// a range or constraint expression.
    pub fn is_exact(raw: &str) -> bool {
        let trimmed = raw.trim();
        !trimmed.is_empty()
            && !trimmed.chars().any(|c| {
                matches!(
                    c,
                    '[' | ']' | '(' | ')' | '<' | '>' | '=' | '^' | '~' | '*' | ',' | '|' | ' '
                )
            })
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn normalize_version(raw: &str) -> String {
    let without_prefix = match raw.strip_prefix(['v', 'V']) {
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_digit()) => rest,
        _ => raw,
    };
    let without_build = without_prefix
        .split_once('+')
        .map_or(without_prefix, |(head, _)| head);

    let (release, prerelease) = match without_build.split_once('-') {
        Some((release, pre)) => (release, Some(pre)),
        None => (without_build, None),
    };

    let numeric: Option<Vec<u64>> = release
        .split('.')
        .map(|part| part.parse::<u64>().ok())
        .collect();

    let release = match numeric {
        Some(mut parts) if !parts.is_empty() && parts.len() <= 4 => {
            if parts.len() == 4 && parts[3] == 0 {
                parts.pop();
            }
            while parts.len() < 3 {
                parts.push(0);
            }
            parts
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(".")
        }
        _ => release.to_string(),
    };

    match prerelease {
        Some(pre) if !pre.is_empty() => format!("{}-{}", release, pre).to_lowercase(),
        _ => release.to_lowercase(),
    }
}

/// Package coordinate: ecosystem (Package URL type), optional namespace and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageCoordinate {
    ecosystem: String,
    namespace: Option<String>,
    name: PackageName,
}

impl PackageCoordinate {
    pub fn new(ecosystem: &str, namespace: Option<&str>, name: &str) -> Result<Self> {
        let ecosystem = ecosystem.trim().to_lowercase();
        if ecosystem.is_empty() || ecosystem.len() > MAX_ECOSYSTEM_LENGTH {
            anyhow::bail!("Ecosystem '{}' must be 1-{} characters", ecosystem, MAX_ECOSYSTEM_LENGTH);
        }
        if !ecosystem
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        {
            anyhow::bail!("Ecosystem '{}' contains invalid characters", ecosystem);
        }

        let namespace = namespace
            .map(str::trim)
            .filter(|ns| !ns.is_empty())
            .map(|ns| {
                if ns.len() > MAX_PACKAGE_NAME_LENGTH || ns.chars().any(char::is_whitespace) {
                    anyhow::bail!("Package namespace '{}' is invalid", ns);
                }
                Ok(ns.to_string())
            })
            .transpose()?;

        Ok(Self {
            ecosystem,
            namespace,
            name: PackageName::new(name.to_string())?,
        })
    }

    pub fn ecosystem(&self) -> &str {
        &self.ecosystem
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn name(&self) -> &PackageName {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_name_new_valid() {
        let name = PackageName::new("Newtonsoft.Json".to_string()).unwrap();
        assert_eq!(name.as_str(), "Newtonsoft.Json");
        assert_eq!(name.canonical(), "newtonsoft.json");
    }

    #[test]
    fn test_package_name_trims_whitespace() {
        let name = PackageName::new("  serde ".to_string()).unwrap();
        assert_eq!(name.as_str(), "serde");
    }

    #[test]
    fn test_package_name_new_empty() {
        assert!(PackageName::new("".to_string()).is_err());
        assert!(PackageName::new("   ".to_string()).is_err());
    }

    #[test]
    fn test_package_name_invalid_characters() {
        let result = PackageName::new("evil;rm -rf".to_string());
        assert!(result.unwrap_err().to_string().contains("invalid characters"));
    }

    #[test]
    fn test_package_name_too_long() {
        assert!(PackageName::new("a".repeat(256)).is_err());
    }

    #[test]
    fn test_version_pads_release() {
        assert_eq!(Version::parse("1.0").unwrap().unwrap().as_str(), "1.0.0");
        assert_eq!(Version::parse("2").unwrap().unwrap().as_str(), "2.0.0");
    }

    #[test]
    fn test_version_drops_zero_fourth_component() {
        assert_eq!(Version::parse("4.5.0.0").unwrap().unwrap().as_str(), "4.5.0");
        assert_eq!(Version::parse("4.5.0.1").unwrap().unwrap().as_str(), "4.5.0.1");
    }

    #[test]
    fn test_version_strips_build_metadata_and_prefix() {
        assert_eq!(
            Version::parse("v1.2.3+sha.5114f85").unwrap().unwrap().as_str(),
            "1.2.3"
        );
    }

    #[test]
    fn test_version_prerelease_is_case_insensitive() {
        let a = Version::parse("1.0.0-Beta.1").unwrap().unwrap();
        let b = Version::parse("1.0-beta.1").unwrap().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "1.0.0-beta.1");
    }

    #[test]
    fn test_version_leading_zeros_collapse() {
        assert_eq!(Version::parse("01.02.03").unwrap().unwrap().as_str(), "1.2.3");
    }

    #[test]
    fn test_version_non_numeric_kept() {
        assert_eq!(Version::parse("2024a1").unwrap().unwrap().as_str(), "2024a1");
    }

    #[test]
    fn test_version_blank_is_none() {
        assert!(Version::parse("").unwrap().is_none());
        assert!(Version::parse("  ").unwrap().is_none());
        assert!(Version::parse("+build").unwrap().is_none());
    }

    #[test]
    fn test_version_rejects_range_characters() {
        assert!(Version::parse("[1.0, 2.0)").is_err());
    }

    #[test]
    fn test_version_is_exact() {
        assert!(Version::is_exact("1.2.3"));
        assert!(!Version::is_exact("[1.0,2.0)"));
        assert!(!Version::is_exact(">= 1.0"));
        assert!(!Version::is_exact("^1.2"));
        assert!(!Version::is_exact(""));
    }

    #[test]
    fn test_coordinate_lowercases_ecosystem() {
        let coordinate = PackageCoordinate::new("NuGet", None, "Serilog").unwrap();
        assert_eq!(coordinate.ecosystem(), "nuget");
        assert_eq!(coordinate.name().as_str(), "Serilog");
        assert!(coordinate.namespace().is_none());
    }

    #[test]
    fn test_coordinate_blank_namespace_is_none() {
        let coordinate = PackageCoordinate::new("npm", Some("  "), "left-pad").unwrap();
        assert!(coordinate.namespace().is_none());
    }

    #[test]
    fn test_coordinate_invalid_ecosystem() {
        assert!(PackageCoordinate::new("", None, "x").is_err());
        assert!(PackageCoordinate::new("nu get", None, "x").is_err());
    }
}
