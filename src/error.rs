use thiserror::Error;

/// Errors raised while building an enrollment coordinator or loading its configuration.
///
/// An enrollment run itself never fails with one of these: per-attempt problems are
/// absorbed into the run and the terminal state is reported through
/// [`EnrollmentOutcome`](crate::EnrollmentOutcome).
#[derive(Error, Debug)]
pub enum EnrollError {
    /// A configuration text could not be parsed.
    ///
    /// The associated string names the offending line and what was wrong with it.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A configuration was syntactically valid but describes an unusable setup.
    #[error("Misconfiguration: {0}")]
    Misconfiguration(String),

    /// Reading a configuration file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a single sensor acquisition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// No finger was presented before the device-level timeout elapsed.
    #[error("Capture timed out")]
    Timeout,

    /// The device or its transport reported an error.
    #[error("Device error: {0}")]
    Device(String),

    /// The device reported a completed capture but returned no image data.
    #[error("Capture returned no data")]
    NoData,

    /// The returned image failed the sanity check.
    #[error("Image is not sane: {0}")]
    InsaneImage(String),
}

/// Failure to turn a raw sample into a comparable template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("No features detected")]
    NoFeatures,

    #[error("Extraction backend error: {0}")]
    Backend(String),
}
