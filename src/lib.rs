//! sbom-assembler - dependency graph construction and BOM assembly
//!
//! This library turns normalized dependency evidence (manifest declarations,
//! lock file entries, resolved package metadata) into a deduplicated,
//! scope-classified dependency graph and serializes it as a CycloneDX
//! document. Several projects can be merged into one BOM under a synthesized
//! root.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`sbom_generation`): Identities, components, graphs and the services that build them
//! - **Application Layer** (`application`): Use cases and DTOs
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use sbom_assembler::prelude::*;
//! use std::path::Path;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<()> {
//! // Create adapters
//! let evidence_source = EvidenceFileSource::open(Path::new("evidence.json"))?;
//! let progress_reporter = StderrProgressReporter::new();
//!
//! // Create use case
//! let use_case = GenerateSbomUseCase::new(evidence_source, progress_reporter);
//!
//! // Execute
//! let request = SbomRequest::new().with_exclude_dev(true);
//! let response = use_case.execute(request).await?;
//!
//! // Format output
//! let formatter = CycloneDxJsonFormatter::new();
//! println!("{}", formatter.format(&response.bom)?);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod ports;
pub mod sbom_generation;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        EvidenceFileSource, FileSystemWriter, StdoutPresenter,
    };
    pub use crate::adapters::outbound::formatters::{
        CycloneDxJsonFormatter, CycloneDxYamlFormatter,
    };
    pub use crate::application::dto::{OutputFormat, RootOverride, SbomRequest, SbomResponse};
    pub use crate::application::use_cases::GenerateSbomUseCase;
    pub use crate::ports::outbound::{
        EvidenceSource, OutputPresenter, ProgressReporter, SbomFormatter,
    };
    pub use crate::sbom_generation::domain::{
        Anomaly, AnomalyKind, Bom, Component, ComponentIdentity, DependencyGraph, EvidenceRecord,
        ProjectEvidence, Scope, SbomMetadata, SourceKind,
    };
    pub use crate::sbom_generation::services::{
        GraphBuilder, MetadataOptions, MultiProjectMerger, SbomGenerator, ScopePropagator,
    };
    pub use crate::shared::Result;
}
