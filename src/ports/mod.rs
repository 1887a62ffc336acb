/// Ports module defining interfaces for hexagonal architecture
///
/// The application core drives the evidence source, formatter, presenter and
/// progress reporter only through the traits declared here.
pub mod outbound;
