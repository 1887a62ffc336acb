use crate::adapters::outbound::formatters::{CycloneDxJsonFormatter, CycloneDxYamlFormatter};
use crate::application::dto::OutputFormat;
use crate::ports::outbound::SbomFormatter;

/// Factory for creating BOM formatters
///
/// This factory encapsulates the creation logic for different formatter implementations,
/// following the Factory Pattern. It belongs in the application layer as it orchestrates
/// the selection of infrastructure adapters based on application needs.
pub struct FormatterFactory;

impl FormatterFactory {
    /// Creates a formatter instance for the specified output format
    ///
    /// # Examples
    /// ```
    /// use sbom_assembler::application::dto::OutputFormat;
    /// use sbom_assembler::application::factories::FormatterFactory;
    ///
    /// let formatter = FormatterFactory::create(OutputFormat::Yaml);
    /// assert_eq!(formatter.format_name(), "CycloneDX YAML");
    /// ```
    pub fn create(format: OutputFormat) -> Box<dyn SbomFormatter> {
        match format {
            OutputFormat::Json => Box::new(CycloneDxJsonFormatter::new()),
            OutputFormat::Yaml => Box::new(CycloneDxYamlFormatter::new()),
        }
    }

    /// Returns the progress message for the specified output format
    pub fn progress_message(format: OutputFormat) -> &'static str {
        match format {
            OutputFormat::Json => "📝 Generating CycloneDX JSON format output...",
            OutputFormat::Yaml => "📝 Generating CycloneDX YAML format output...",
        }
    }
}
