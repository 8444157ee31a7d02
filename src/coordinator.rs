//! Multi-capture enrollment.
//!
//! A run moves through an explicit state machine:
//!
//! ```text
//! Collecting --(budget spent or slots full)--> Voting | Rejecting | Finished(Failed)
//! Voting     --(winner passes threshold)-----> Finished(Completed)
//! Voting     --(winner below threshold)------> Rejecting
//! Rejecting  -------------------------------> Finished(Retry)
//! ```
//!
//! `Collecting` issues one capture per step and loops on itself until the attempt
//! budget is spent or every slot is filled.

use crate::config::{EnrollConfig, REQUIRED_GOOD_SAMPLES};
use crate::error::EnrollError;
use crate::notify::Progress;
use crate::output::{
    AttemptRecord, AttemptStatus, EnrollReport, EnrollmentOutcome, FailReason, RejectReason,
    RetryReason,
};
use crate::traits::{Comparator, FeatureExtractor, Notifier, Sensor};
use crate::vote::{elect, PairScores};
use tracing::{debug, error, info, warn};

/// An accepted capture: the sample and the template extracted from it.
struct Slot<S, T> {
    sample: S,
    template: T,
}

enum State<S, T> {
    Collecting,
    Voting,
    Rejecting(RetryReason),
    Finished(EnrollmentOutcome<S, T>),
}

/// Mutable bookkeeping of a single run. Owns every accepted sample and template.
struct Run<S, T> {
    slots: Vec<Slot<S, T>>,
    attempts: usize,
    /// Rejected attempts the user was already told about.
    announced_rejections: usize,
    report: EnrollReport,
}

impl<S, T> Run<S, T> {
    fn new() -> Self {
        Self {
            slots: Vec::with_capacity(REQUIRED_GOOD_SAMPLES),
            attempts: 0,
            announced_rejections: 0,
            report: EnrollReport::new(),
        }
    }

    fn rejected(&self) -> usize {
        self.attempts - self.slots.len()
    }
}

struct Rejection {
    reason: RejectReason,
    digest: Option<String>,
}

/// Drives the sensor, extractor and comparator through one enrollment.
///
/// The collaborators are resolved once, at construction. A coordinator can run any
/// number of enrollments; runs share no state.
pub struct EnrollmentCoordinator<D, E, C, N> {
    sensor: D,
    extractor: E,
    comparator: C,
    notifier: N,
    config: EnrollConfig,
}

impl<D, E, C, N> EnrollmentCoordinator<D, E, C, N>
where
    D: Sensor,
    E: FeatureExtractor<D::Sample>,
    C: Comparator<E::Template>,
    N: Notifier,
{
    /// Creates a coordinator with the default configuration.
    pub fn new(sensor: D, extractor: E, comparator: C, notifier: N) -> Self {
        Self { sensor, extractor, comparator, notifier, config: EnrollConfig::default() }
    }

    /// Creates a coordinator with a custom configuration.
    ///
    /// # Errors
    /// Returns `EnrollError::Misconfiguration` if the configuration cannot reach the vote.
    pub fn with_config(
        sensor: D,
        extractor: E,
        comparator: C,
        notifier: N,
        config: EnrollConfig,
    ) -> Result<Self, EnrollError> {
        config.validate()?;
        Ok(Self { sensor, extractor, comparator, notifier, config })
    }

    pub fn config(&self) -> &EnrollConfig {
        &self.config
    }

    pub fn sensor(&self) -> &D {
        &self.sensor
    }

    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Runs one enrollment.
    pub fn enroll(&mut self) -> EnrollmentOutcome<D::Sample, E::Template> {
        self.enroll_with_report().0
    }

    /// Runs one enrollment and returns its diagnostics alongside the outcome.
    pub fn enroll_with_report(
        &mut self,
    ) -> (EnrollmentOutcome<D::Sample, E::Template>, EnrollReport) {
        let mut run = Run::new();
        let mut state = State::Collecting;

        loop {
            state = match state {
                State::Collecting => self.collect(&mut run),
                State::Voting => self.vote(&mut run),
                State::Rejecting(reason) => self.reject(&mut run, reason),
                State::Finished(outcome) => {
                    run.report.outcome = outcome.kind();
                    info!(
                        "Enrollment {} after {} attempts ({} accepted)",
                        run.report.outcome, run.report.attempts, run.report.accepted
                    );
                    return (outcome, run.report);
                }
            };
        }
    }

    fn notify(&self, progress: Progress) {
        debug!("notify: {:?}", progress);
        self.notifier.notify(&progress.to_string());
    }

    fn collect(
        &mut self,
        run: &mut Run<D::Sample, E::Template>,
    ) -> State<D::Sample, E::Template> {
        if run.attempts >= self.config.max_attempts || run.slots.len() >= REQUIRED_GOOD_SAMPLES {
            return self.finish_collecting(run);
        }

        if run.rejected() > run.announced_rejections {
            self.notify(Progress::BadSwipe);
            run.announced_rejections = run.rejected();
        }

        let is_first_attempt = run.attempts == 0;
        run.attempts += 1;
        run.report.attempts = run.attempts;

        match self.acquire(is_first_attempt) {
            Ok((slot, features, digest)) => {
                let index = run.slots.len();
                debug!(
                    "attempt {} accepted into slot {} ({} features)",
                    run.attempts, index, features
                );
                run.slots.push(slot);
                run.report.accepted = run.slots.len();
                run.report.records.push(AttemptRecord {
                    attempt: run.attempts,
                    status: AttemptStatus::Accepted { slot: index, features },
                    digest,
                });
                self.notify(Progress::GoodSwipe {
                    collected: run.slots.len(),
                    required: REQUIRED_GOOD_SAMPLES,
                });
            }
            Err(rejection) => {
                debug!("attempt {} rejected: {}", run.attempts, rejection.reason);
                run.report.records.push(AttemptRecord {
                    attempt: run.attempts,
                    status: AttemptStatus::Rejected(rejection.reason),
                    digest: rejection.digest,
                });
            }
        }

        State::Collecting
    }

    /// Captures, standardizes and extracts one sample, applying the quality gate.
    ///
    /// Anything produced by a rejected attempt is dropped before returning.
    fn acquire(
        &mut self,
        is_first_attempt: bool,
    ) -> Result<(Slot<D::Sample, E::Template>, u32, Option<String>), Rejection> {
        let mut sample = self
            .sensor
            .capture(is_first_attempt)
            .map_err(|err| Rejection { reason: RejectReason::Capture(err), digest: None })?;

        self.sensor.standardize(&mut sample);
        let digest = self.sensor.sample_id(&sample);

        let template = match self.extractor.extract(&sample) {
            Ok(template) => template,
            Err(err) => {
                return Err(Rejection { reason: RejectReason::Extraction(err), digest });
            }
        };

        let features = self.extractor.feature_count(&template);
        if features < self.config.min_features {
            warn!("not enough features, {}/{}", features, self.config.min_features);
            return Err(Rejection {
                reason: RejectReason::LowFeatures {
                    found: features,
                    required: self.config.min_features,
                },
                digest,
            });
        }

        Ok((Slot { sample, template }, features, digest))
    }

    fn finish_collecting(
        &mut self,
        run: &mut Run<D::Sample, E::Template>,
    ) -> State<D::Sample, E::Template> {
        match run.slots.len() {
            0 => {
                warn!("No acceptable sample in {} attempts", run.attempts);
                run.report.fail_reason = Some(FailReason::NoAcceptedSamples);
                State::Finished(EnrollmentOutcome::Failed)
            }
            accepted if accepted < REQUIRED_GOOD_SAMPLES => {
                State::Rejecting(RetryReason::NotEnoughSamples { accepted })
            }
            _ => State::Voting,
        }
    }

    fn vote(&mut self, run: &mut Run<D::Sample, E::Template>) -> State<D::Sample, E::Template> {
        let scores = {
            let [a, b, c] = [&run.slots[0], &run.slots[1], &run.slots[2]];
            PairScores::new(
                self.comparator.compare(&a.template, &b.template),
                self.comparator.compare(&b.template, &c.template),
                self.comparator.compare(&c.template, &a.template),
            )
        };
        run.report.scores = Some(scores);
        info!("Voting on {}", scores);

        let ballot = match elect(scores) {
            Ok(ballot) => ballot,
            Err(err) => {
                error!("{}", err);
                run.slots.clear();
                run.report.fail_reason = Some(FailReason::VoteTie);
                return State::Finished(EnrollmentOutcome::Failed);
            }
        };
        run.report.ballot = Some(ballot);

        if !ballot.passes(self.config.match_threshold) {
            warn!(
                "Slot {} elected but best support {} is below threshold {}",
                ballot.winner,
                ballot.best_support(),
                self.config.match_threshold
            );
            return State::Rejecting(RetryReason::InconsistentSamples);
        }

        let winner = run.slots.swap_remove(ballot.winner);
        run.slots.clear();

        self.notify(Progress::Success);
        let sample = if self.config.keep_sample { Some(winner.sample) } else { None };
        State::Finished(EnrollmentOutcome::Completed { template: winner.template, sample })
    }

    /// Releases every template and every sample but the first, which is kept for diagnostics.
    fn reject(
        &mut self,
        run: &mut Run<D::Sample, E::Template>,
        reason: RetryReason,
    ) -> State<D::Sample, E::Template> {
        warn!("Enrollment needs a retry: {}", reason);
        run.report.retry_reason = Some(reason);

        self.notify(match reason {
            RetryReason::NotEnoughSamples { .. } => Progress::NotEnoughSwipes,
            RetryReason::InconsistentSamples => Progress::InconsistentImages,
        });

        let mut slots = std::mem::take(&mut run.slots).into_iter();
        let first = slots.next().map(|slot| slot.sample);
        drop(slots);

        let sample = if self.config.keep_sample { first } else { None };
        State::Finished(EnrollmentOutcome::Retry { sample })
    }
}
