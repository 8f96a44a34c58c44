/// Error types for the termenv library.
///
/// Detection itself never fails; these errors only surface from the
/// parsing helpers (`FromStr` impls) that callers may use directly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TermenvError {
    /// The text does not name a known color space.
    #[error("Unknown color space: {0:?}")]
    InvalidColorSpace(String),

    /// A version string could not be parsed.
    ///
    /// The `kind` field names the versioned thing (e.g. "windows", "teamcity").
    #[error("Invalid {kind} version: {value:?}")]
    InvalidVersion { kind: &'static str, value: String },
}

/// Convenience Result type for termenv operations.
pub type Result<T> = std::result::Result<T, TermenvError>;
