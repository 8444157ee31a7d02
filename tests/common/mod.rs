#![allow(dead_code)]

use fprint_enroll::{
    CaptureError, Comparator, ExtractError, FeatureExtractor, MatchScore, Notifier, Sensor,
};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

/// What a scripted attempt does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    CaptureFails,
    ExtractFails,
    Features(u32),
}

pub const GOOD: Step = Step::Features(30);
pub const WEAK: Step = Step::Features(12);

/// Tracks creation and release of every sample and template of a run.
#[derive(Debug, Default)]
pub struct Ledger {
    pub samples_created: Cell<usize>,
    pub templates_created: Cell<usize>,
    pub samples_released: RefCell<Vec<usize>>,
    pub templates_released: RefCell<Vec<usize>>,
}

impl Ledger {
    pub fn samples_released(&self) -> Vec<usize> {
        let mut ids = self.samples_released.borrow().clone();
        ids.sort_unstable();
        ids
    }

    pub fn templates_released(&self) -> Vec<usize> {
        let mut ids = self.templates_released.borrow().clone();
        ids.sort_unstable();
        ids
    }
}

/// A sample identified by the 1-based attempt that captured it.
#[derive(Debug)]
pub struct TrackedSample {
    pub id: usize,
    pub step: Step,
    pub standardized: bool,
    ledger: Rc<Ledger>,
}

impl Drop for TrackedSample {
    fn drop(&mut self) {
        self.ledger.samples_released.borrow_mut().push(self.id);
    }
}

#[derive(Debug)]
pub struct TrackedTemplate {
    pub id: usize,
    pub features: u32,
    ledger: Rc<Ledger>,
}

impl Drop for TrackedTemplate {
    fn drop(&mut self) {
        self.ledger.templates_released.borrow_mut().push(self.id);
    }
}

pub struct MockSensor {
    steps: VecDeque<Step>,
    ledger: Rc<Ledger>,
    pub calls: usize,
    pub first_flags: Vec<bool>,
}

impl MockSensor {
    pub fn new(steps: &[Step], ledger: Rc<Ledger>) -> Self {
        Self { steps: steps.iter().copied().collect(), ledger, calls: 0, first_flags: Vec::new() }
    }
}

impl Sensor for MockSensor {
    type Sample = TrackedSample;

    fn capture(&mut self, is_first_attempt: bool) -> Result<TrackedSample, CaptureError> {
        self.calls += 1;
        self.first_flags.push(is_first_attempt);
        match self.steps.pop_front() {
            None | Some(Step::CaptureFails) => Err(CaptureError::Timeout),
            Some(step) => {
                self.ledger.samples_created.set(self.ledger.samples_created.get() + 1);
                Ok(TrackedSample {
                    id: self.calls,
                    step,
                    standardized: false,
                    ledger: Rc::clone(&self.ledger),
                })
            }
        }
    }

    fn standardize(&mut self, sample: &mut TrackedSample) {
        sample.standardized = true;
    }

    fn sample_id(&self, sample: &TrackedSample) -> Option<String> {
        Some(format!("sample-{}", sample.id))
    }
}

pub struct MockExtractor {
    ledger: Rc<Ledger>,
    pub unstandardized_inputs: usize,
}

impl MockExtractor {
    pub fn new(ledger: Rc<Ledger>) -> Self {
        Self { ledger, unstandardized_inputs: 0 }
    }
}

impl FeatureExtractor<TrackedSample> for MockExtractor {
    type Template = TrackedTemplate;

    fn extract(&mut self, sample: &TrackedSample) -> Result<TrackedTemplate, ExtractError> {
        if !sample.standardized {
            self.unstandardized_inputs += 1;
        }
        match sample.step {
            Step::Features(features) => {
                self.ledger.templates_created.set(self.ledger.templates_created.get() + 1);
                Ok(TrackedTemplate { id: sample.id, features, ledger: Rc::clone(&self.ledger) })
            }
            _ => Err(ExtractError::Backend("mindtct failed".to_string())),
        }
    }

    fn feature_count(&self, template: &TrackedTemplate) -> u32 {
        template.features
    }
}

/// Scores by attempt ids; unknown pairs score 0.
#[derive(Default)]
pub struct TableComparator {
    table: HashMap<(usize, usize), MatchScore>,
    pub calls: Cell<usize>,
}

impl TableComparator {
    pub fn new(entries: &[((usize, usize), MatchScore)]) -> Self {
        let mut table = HashMap::new();
        for &((a, b), score) in entries {
            table.insert((a, b), score);
            table.insert((b, a), score);
        }
        Self { table, calls: Cell::new(0) }
    }
}

impl Comparator<TrackedTemplate> for TableComparator {
    fn compare(&self, a: &TrackedTemplate, b: &TrackedTemplate) -> MatchScore {
        self.calls.set(self.calls.get() + 1);
        self.table.get(&(a.id, b.id)).copied().unwrap_or(0)
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub messages: RefCell<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

pub type MockCoordinator =
    fprint_enroll::EnrollmentCoordinator<MockSensor, MockExtractor, TableComparator, RecordingNotifier>;

pub fn coordinator(
    steps: &[Step],
    scores: &[((usize, usize), MatchScore)],
) -> (MockCoordinator, Rc<Ledger>) {
    let ledger = Rc::new(Ledger::default());
    let coordinator = fprint_enroll::EnrollmentCoordinator::new(
        MockSensor::new(steps, Rc::clone(&ledger)),
        MockExtractor::new(Rc::clone(&ledger)),
        TableComparator::new(scores),
        RecordingNotifier::default(),
    );
    (coordinator, ledger)
}
