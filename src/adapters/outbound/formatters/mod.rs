/// Formatter adapters for the supported BOM encodings
mod cyclonedx_json;
mod cyclonedx_yaml;
mod document;

pub use cyclonedx_json::CycloneDxJsonFormatter;
pub use cyclonedx_yaml::CycloneDxYamlFormatter;
