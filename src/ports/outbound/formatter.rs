use crate::sbom_generation::domain::Bom;
use crate::shared::Result;

/// SbomFormatter port for encoding and decoding BOM documents
///
/// Every implementation must round-trip: `parse(format(bom)) == bom`, and
/// re-formatting a parsed document reproduces it byte for byte.
pub trait SbomFormatter {
    /// Encodes a BOM as text
    ///
    /// # Errors
    /// Returns an error if serialization fails
    fn format(&self, bom: &Bom) -> Result<String>;

    /// Decodes a previously emitted document
    ///
    /// # Errors
    /// Returns [`SbomError::SerializationFormat`](crate::shared::error::SbomError::SerializationFormat)
    /// if the document is malformed
    fn parse(&self, content: &str) -> Result<Bom>;

    /// Human-readable format name used in messages
    fn format_name(&self) -> &'static str;
}
