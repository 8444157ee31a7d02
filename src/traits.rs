use crate::error::{CaptureError, ExtractError};

/// Similarity between two templates. Higher is better; the scale is the comparator's own.
pub type MatchScore = i32;

/// A blocking biometric sensor.
///
/// `Sample` is whatever the device hands back. The coordinator owns each returned
/// sample exclusively until it is either attached to the outcome or dropped.
pub trait Sensor {
    type Sample;

    /// Blocks until a sample arrives or the device-level timeout elapses.
    fn capture(&mut self, is_first_attempt: bool) -> Result<Self::Sample, CaptureError>;

    /// In-place normalization. Always runs before feature extraction.
    fn standardize(&mut self, sample: &mut Self::Sample);

    /// Short identifier of a sample, used in logs and attempt records.
    fn sample_id(&self, _sample: &Self::Sample) -> Option<String> {
        None
    }
}

/// Turns a standardized sample into a comparable template.
///
/// Extraction reads the sample; the coordinator keeps both afterwards.
pub trait FeatureExtractor<S> {
    type Template;

    fn extract(&mut self, sample: &S) -> Result<Self::Template, ExtractError>;

    /// Quality metric used by the acceptance gate.
    fn feature_count(&self, template: &Self::Template) -> u32;
}

/// Symmetric similarity scoring.
pub trait Comparator<T> {
    fn compare(&self, a: &T, b: &T) -> MatchScore;
}

/// Best-effort user-facing progress channel.
///
/// Implementations must not block and must swallow their own failures.
pub trait Notifier {
    fn notify(&self, message: &str);
}

