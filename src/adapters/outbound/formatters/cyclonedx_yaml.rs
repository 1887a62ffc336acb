use super::document::BomDocument;
use crate::ports::outbound::SbomFormatter;
use crate::sbom_generation::domain::Bom;
use crate::shared::error::SbomError;
use crate::shared::Result;

/// CycloneDxYamlFormatter adapter for the YAML rendition of the CycloneDX document
///
/// Carries exactly the same fields as the JSON encoding.
pub struct CycloneDxYamlFormatter;

impl CycloneDxYamlFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CycloneDxYamlFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl SbomFormatter for CycloneDxYamlFormatter {
    fn format(&self, bom: &Bom) -> Result<String> {
        let document = BomDocument::from_bom(bom);
        serde_yaml_ng::to_string(&document).map_err(Into::into)
    }

    fn parse(&self, content: &str) -> Result<Bom> {
        let document: BomDocument =
            serde_yaml_ng::from_str(content).map_err(|e| SbomError::SerializationFormat {
                format: self.format_name().to_string(),
                details: e.to_string(),
            })?;

        document.into_bom().map_err(|details| {
            SbomError::SerializationFormat {
                format: self.format_name().to_string(),
                details,
            }
            .into()
        })
    }

    fn format_name(&self) -> &'static str {
        "CycloneDX YAML"
    }
}
