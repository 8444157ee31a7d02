#![forbid(unsafe_code)]

//! Multi-capture fingerprint enrollment.
//!
//! An [`EnrollmentCoordinator`] drives a [`Sensor`], a [`FeatureExtractor`] and a
//! [`Comparator`] through up to six capture attempts, keeps the first three samples
//! whose templates carry enough features, and elects the one least involved in the
//! weakest pairwise comparison. The elected template is accepted when at least one
//! of its two comparisons reaches the match threshold.

pub mod config;
pub mod coordinator;
pub mod display;
pub mod error;
pub mod notify;
pub mod output;
pub mod sample;
pub mod sim;
pub mod traits;
pub mod vote;

// Re-exports
pub use config::*;
pub use coordinator::*;
pub use error::*;
pub use notify::*;
pub use output::*;
pub use sample::*;
pub use traits::*;
pub use vote::*;
