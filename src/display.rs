use crate::notify::Progress;
use crate::output::{
    AttemptRecord, AttemptStatus, EnrollReport, FailReason, OutcomeKind, RejectReason,
    RetryReason,
};
use crate::vote::PairScores;
use std::fmt;

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Progress::BadSwipe => write!(f, "bad swipe, please try again"),
            Progress::GoodSwipe { collected, required } if collected >= required => {
                write!(f, "{collected} good swipes captured DONE")
            }
            Progress::GoodSwipe { collected, required } => {
                let plural = if *collected == 1 { "" } else { "s" };
                write!(
                    f,
                    "{collected} good swipe{plural} captured {} to go",
                    required - collected
                )
            }
            Progress::Success => write!(f, "Enrollment Success"),
            Progress::NotEnoughSwipes => write!(f, "Enrollment Failure, not enough good swipes"),
            Progress::InconsistentImages => write!(f, "Enrollment Failure, inconsistent images"),
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OutcomeKind::Completed => write!(f, "completed"),
            OutcomeKind::Retry => write!(f, "retry"),
            OutcomeKind::Failed => write!(f, "failed"),
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RejectReason::Capture(err) => write!(f, "capture: {err}"),
            RejectReason::Extraction(err) => write!(f, "extraction: {err}"),
            RejectReason::LowFeatures { found, required } => {
                write!(f, "not enough features, {found}/{required}")
            }
        }
    }
}

impl fmt::Display for RetryReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RetryReason::NotEnoughSamples { accepted } => {
                write!(f, "not enough good samples ({accepted} accepted)")
            }
            RetryReason::InconsistentSamples => write!(f, "inconsistent samples"),
        }
    }
}

impl fmt::Display for FailReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FailReason::NoAcceptedSamples => write!(f, "no sample accepted"),
            FailReason::VoteTie => write!(f, "undecidable vote"),
        }
    }
}

impl fmt::Display for PairScores {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "s01={} s12={} s20={}", self.s01, self.s12, self.s20)
    }
}

impl fmt::Display for AttemptRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{} ", self.attempt)?;
        match &self.status {
            AttemptStatus::Accepted { slot, features } => {
                write!(f, "accepted slot={slot} features={features}")?
            }
            AttemptStatus::Rejected(reason) => write!(f, "rejected ({reason})")?,
        }
        if let Some(digest) = &self.digest {
            write!(f, " sample={digest}")?;
        }
        Ok(())
    }
}

impl fmt::Display for EnrollReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, ".-[ enrollment ]-")?;
        writeln!(f, "|")?;
        writeln!(f, "| outcome  = {}", self.outcome)?;
        writeln!(f, "| attempts = {}", self.attempts)?;
        writeln!(f, "| accepted = {}", self.accepted)?;
        for record in &self.records {
            writeln!(f, "|   {record}")?;
        }
        if let Some(scores) = &self.scores {
            writeln!(f, "| scores   = {scores}")?;
        }
        if let Some(ballot) = &self.ballot {
            writeln!(
                f,
                "| winner   = {} (support {}, {})",
                ballot.winner, ballot.supporting[0], ballot.supporting[1]
            )?;
        }
        if let Some(reason) = &self.retry_reason {
            writeln!(f, "| reason   = {reason}")?;
        }
        if let Some(reason) = &self.fail_reason {
            writeln!(f, "| reason   = {reason}")?;
        }
        writeln!(f, "`----")
    }
}
