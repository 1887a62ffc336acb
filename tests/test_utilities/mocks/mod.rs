/// Mock implementations for testing
mod mock_evidence_source;
mod mock_progress_reporter;

pub use mock_evidence_source::MockEvidenceSource;
pub use mock_progress_reporter::MockProgressReporter;
