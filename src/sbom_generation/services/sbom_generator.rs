use crate::sbom_generation::domain::SbomMetadata;
use chrono::Utc;
use uuid::Uuid;

/// Which volatile metadata fields a generated document carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataOptions {
    pub timestamp: bool,
    pub serial_number: bool,
}

impl Default for MetadataOptions {
    fn default() -> Self {
        Self {
            timestamp: true,
            serial_number: true,
        }
    }
}

impl MetadataOptions {
    /// No timestamp and no serial number: identical input gives identical output
    pub fn reproducible() -> Self {
        Self {
            timestamp: false,
            serial_number: false,
        }
    }
}

/// SbomGenerator service for generating BOM metadata
///
/// Creates metadata conforming to the CycloneDX specification.
pub struct SbomGenerator;

impl SbomGenerator {
    /// Generates BOM metadata with the current timestamp and a fresh serial number,
    /// each only when enabled in `options`
    pub fn generate_metadata(
        tool_name: &str,
        tool_version: &str,
        options: MetadataOptions,
    ) -> SbomMetadata {
        let timestamp = options.timestamp.then(|| Utc::now().to_rfc3339());
        let serial_number = options
            .serial_number
            .then(|| format!("urn:uuid:{}", Uuid::new_v4()));

        SbomMetadata::new(
            timestamp,
            tool_name.to_string(),
            tool_version.to_string(),
            serial_number,
        )
    }

    /// Generates BOM metadata with default tool information (sbom-assembler)
    ///
    /// This uses the compile-time version from Cargo.toml
    pub fn generate_default_metadata(options: MetadataOptions) -> SbomMetadata {
        Self::generate_metadata("sbom-assembler", env!("CARGO_PKG_VERSION"), options)
    }
}
