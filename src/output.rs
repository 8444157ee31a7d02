use crate::error::{CaptureError, ExtractError};
use crate::vote::{Ballot, PairScores};

/// Terminal result of one enrollment run.
///
/// Ownership of the attached template and sample passes to the caller; everything
/// else captured during the run has been dropped by the time this is returned.
#[derive(Debug)]
pub enum EnrollmentOutcome<S, T> {
    /// Consensus reached. `sample` is the raw capture behind `template`, if requested.
    Completed { template: T, sample: Option<S> },
    /// Samples were collected but no usable consensus. `sample` is the first accepted
    /// capture, kept for diagnostics, if requested.
    Retry { sample: Option<S> },
    /// No usable sample at all.
    Failed,
}

impl<S, T> EnrollmentOutcome<S, T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, EnrollmentOutcome::Completed { .. })
    }

    pub fn is_retry(&self) -> bool {
        matches!(self, EnrollmentOutcome::Retry { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, EnrollmentOutcome::Failed)
    }

    pub fn template(&self) -> Option<&T> {
        match self {
            EnrollmentOutcome::Completed { template, .. } => Some(template),
            _ => None,
        }
    }

    /// The raw sample attached to the outcome, whatever its kind.
    pub fn sample(&self) -> Option<&S> {
        match self {
            EnrollmentOutcome::Completed { sample, .. } | EnrollmentOutcome::Retry { sample } => {
                sample.as_ref()
            }
            EnrollmentOutcome::Failed => None,
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            EnrollmentOutcome::Completed { .. } => OutcomeKind::Completed,
            EnrollmentOutcome::Retry { .. } => OutcomeKind::Retry,
            EnrollmentOutcome::Failed => OutcomeKind::Failed,
        }
    }
}

/// Payload-free discriminant of [`EnrollmentOutcome`], for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Completed,
    Retry,
    Failed,
}

/// Why an attempt did not yield an accepted sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    Capture(CaptureError),
    Extraction(ExtractError),
    LowFeatures { found: u32, required: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptStatus {
    /// Stored in `slot` (0-based) with `features` extracted features.
    Accepted { slot: usize, features: u32 },
    Rejected(RejectReason),
}

/// What happened on one capture call. Records never own samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRecord {
    /// 1-based attempt number.
    pub attempt: usize,
    pub status: AttemptStatus,
    /// Short digest of the captured sample, when one was captured and the sensor
    /// produces [`RawSample`](crate::RawSample)s.
    pub digest: Option<String>,
}

impl AttemptRecord {
    pub fn is_accepted(&self) -> bool {
        matches!(self.status, AttemptStatus::Accepted { .. })
    }
}

/// Why a run ended in [`EnrollmentOutcome::Retry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryReason {
    /// The attempt budget ran out with fewer accepted samples than required.
    NotEnoughSamples { accepted: usize },
    /// Three samples were accepted but the elected one missed the match threshold.
    InconsistentSamples,
}

/// Why a run ended in [`EnrollmentOutcome::Failed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailReason {
    /// Every attempt was rejected.
    NoAcceptedSamples,
    /// The vote could not single out a sample.
    VoteTie,
}

/// Diagnostics of a single run, returned next to the outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollReport {
    /// Capture calls issued.
    pub attempts: usize,
    /// Attempts accepted into a slot.
    pub accepted: usize,
    pub records: Vec<AttemptRecord>,
    /// Pairwise scores, when the vote took place.
    pub scores: Option<PairScores>,
    /// Elected slot and its supporting scores, when the vote produced one.
    pub ballot: Option<Ballot>,
    pub outcome: OutcomeKind,
    pub retry_reason: Option<RetryReason>,
    pub fail_reason: Option<FailReason>,
}

impl EnrollReport {
    pub(crate) fn new() -> Self {
        Self {
            attempts: 0,
            accepted: 0,
            records: Vec::new(),
            scores: None,
            ballot: None,
            outcome: OutcomeKind::Failed,
            retry_reason: None,
            fail_reason: None,
        }
    }

    /// Attempts that were rejected, in order.
    pub fn rejected(&self) -> impl Iterator<Item = &AttemptRecord> {
        self.records.iter().filter(|r| !r.is_accepted())
    }
}
