/// Type alias for Result with anyhow::Error as the error type.
/// Domain failures are `SbomError` values wrapped into `anyhow::Error` so that
/// callers can downcast when the category matters (exit codes, per-project failures).
pub type Result<T> = std::result::Result<T, anyhow::Error>;
