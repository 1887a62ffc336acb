use super::document::BomDocument;
use crate::ports::outbound::SbomFormatter;
use crate::sbom_generation::domain::Bom;
use crate::shared::error::SbomError;
use crate::shared::Result;

/// CycloneDxJsonFormatter adapter for CycloneDX 1.6 JSON
///
/// This adapter implements the SbomFormatter port for CycloneDX JSON.
pub struct CycloneDxJsonFormatter;

impl CycloneDxJsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CycloneDxJsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl SbomFormatter for CycloneDxJsonFormatter {
    fn format(&self, bom: &Bom) -> Result<String> {
        let document = BomDocument::from_bom(bom);
        serde_json::to_string_pretty(&document).map_err(Into::into)
    }

    fn parse(&self, content: &str) -> Result<Bom> {
        let document: BomDocument =
            serde_json::from_str(content).map_err(|e| SbomError::SerializationFormat {
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
        "CycloneDX JSON"
    }
}
