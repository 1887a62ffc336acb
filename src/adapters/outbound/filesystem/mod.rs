/// Filesystem adapters for file I/O operations
mod file_reader;
mod file_writer;

pub use file_reader::EvidenceFileSource;
pub use file_writer::{output_presenter, FileSystemWriter, StdoutPresenter};
