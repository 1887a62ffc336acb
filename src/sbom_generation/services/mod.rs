mod component_filter;
mod graph_builder;
mod graph_merger;
mod sbom_generator;
mod scope_propagator;

pub use component_filter::ComponentFilter;
pub use graph_builder::{merge_component, BuiltGraph, GraphBuilder};
pub use graph_merger::MultiProjectMerger;
pub use sbom_generator::{MetadataOptions, SbomGenerator};
pub use scope_propagator::ScopePropagator;
