//! Deterministic in-memory collaborators.
//!
//! Useful to exercise an enrollment without hardware: a sensor replaying a script of
//! captures, an extractor reading minutiae straight off marker pixels, and a
//! comparator scoring minutiae overlap.

use crate::error::{CaptureError, ExtractError};
use crate::sample::{Minutia, RawSample, Template};
use crate::traits::{Comparator, FeatureExtractor, MatchScore, Sensor};
use std::collections::{HashSet, VecDeque};
use tracing::debug;

/// Background grey level of synthetic prints.
pub const BACKGROUND_LEVEL: u8 = 0x80;

/// Pixel level the [`MinutiaeExtractor`] reads as a minutia by default.
pub const RIDGE_LEVEL: u8 = 0xff;

/// Builds a `width` x `height` print with a marker pixel at each given position.
///
/// Positions outside the frame are ignored.
pub fn synthetic_print(width: u32, height: u32, minutiae: &[(u32, u32)]) -> RawSample {
    let mut data = vec![BACKGROUND_LEVEL; width as usize * height as usize];
    for &(x, y) in minutiae {
        if x < width && y < height {
            data[(y * width + x) as usize] = RIDGE_LEVEL;
        }
    }
    RawSample::new(width, height, data)
}

/// Replays a fixed sequence of capture results.
///
/// Once the script is exhausted every capture times out. A frame without pixel data
/// is reported as [`CaptureError::NoData`], any other malformed frame as
/// [`CaptureError::InsaneImage`].
#[derive(Debug, Default)]
pub struct ScriptedSensor {
    script: VecDeque<Result<RawSample, CaptureError>>,
    captures: usize,
    first_attempt_flags: Vec<bool>,
}

impl ScriptedSensor {
    pub fn new<I>(script: I) -> Self
    where
        I: IntoIterator<Item = Result<RawSample, CaptureError>>,
    {
        Self { script: script.into_iter().collect(), captures: 0, first_attempt_flags: Vec::new() }
    }

    /// Number of capture calls served so far.
    pub fn captures(&self) -> usize {
        self.captures
    }

    /// The `is_first_attempt` argument of every capture call, in order.
    pub fn first_attempt_flags(&self) -> &[bool] {
        &self.first_attempt_flags
    }

    /// Scripted results not yet served.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl Sensor for ScriptedSensor {
    type Sample = RawSample;

    fn capture(&mut self, is_first_attempt: bool) -> Result<RawSample, CaptureError> {
        self.captures += 1;
        self.first_attempt_flags.push(is_first_attempt);

        let sample = self.script.pop_front().unwrap_or(Err(CaptureError::Timeout))?;
        if sample.data.is_empty() {
            return Err(CaptureError::NoData);
        }
        if !sample.is_sane() {
            return Err(CaptureError::InsaneImage(format!(
                "{}x{} frame with {} bytes",
                sample.width,
                sample.height,
                sample.data.len()
            )));
        }
        debug!("{} x {} image returned", sample.width, sample.height);
        Ok(sample)
    }

    fn standardize(&mut self, sample: &mut RawSample) {
        sample.standardize();
    }

    fn sample_id(&self, sample: &RawSample) -> Option<String> {
        Some(sample.digest12())
    }
}

/// Reads a minutia at every pixel at or above `ridge_level`.
#[derive(Debug)]
pub struct MinutiaeExtractor {
    ridge_level: u8,
    next_id: u64,
}

impl MinutiaeExtractor {
    pub fn new(ridge_level: u8) -> Self {
        Self { ridge_level, next_id: 0 }
    }
}

impl Default for MinutiaeExtractor {
    fn default() -> Self {
        Self::new(RIDGE_LEVEL)
    }
}

impl FeatureExtractor<RawSample> for MinutiaeExtractor {
    type Template = Template;

    fn extract(&mut self, sample: &RawSample) -> Result<Template, ExtractError> {
        if sample.width == 0 {
            return Err(ExtractError::Backend("zero-width image".to_string()));
        }

        let minutiae: Vec<Minutia> = sample
            .data
            .iter()
            .enumerate()
            .filter(|(_, px)| **px >= self.ridge_level)
            .map(|(i, _)| {
                let x = (i % sample.width as usize) as u32;
                let y = (i / sample.width as usize) as u32;
                Minutia { x, y, angle: ((x * 7 + y * 13) % 360) as u16 }
            })
            .collect();

        if minutiae.is_empty() {
            return Err(ExtractError::NoFeatures);
        }

        self.next_id += 1;
        Ok(Template { id: self.next_id, minutiae })
    }

    fn feature_count(&self, template: &Template) -> u32 {
        template.feature_count()
    }
}

/// Scores the share of minutia positions two templates have in common, 0 to 100.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlapComparator;

impl Comparator<Template> for OverlapComparator {
    fn compare(&self, a: &Template, b: &Template) -> MatchScore {
        let larger = a.minutiae.len().max(b.minutiae.len());
        if larger == 0 {
            return 0;
        }
        let positions: HashSet<(u32, u32)> = a.minutiae.iter().map(|m| (m.x, m.y)).collect();
        let shared = b.minutiae.iter().filter(|m| positions.contains(&(m.x, m.y))).count();
        (shared * 100 / larger) as MatchScore
    }
}
