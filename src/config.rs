use crate::error::EnrollError;
use crate::traits::MatchScore;
use nom::bytes::complete::{tag, take_while1};
use nom::character::complete::space0;
use nom::combinator::all_consuming;
use nom::sequence::{delimited, separated_pair};
use nom::{IResult, Parser};
use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;
use tracing::trace;

/// Capture attempts allowed per enrollment run.
pub const MAX_ATTEMPTS: usize = 6;

/// Accepted samples needed before the consensus vote. The vote is three-way, so this is fixed.
pub const REQUIRED_GOOD_SAMPLES: usize = 3;

/// Minimum feature count a single-scan enrollment would accept.
pub const BASELINE_MIN_FEATURES: u32 = 10;

/// Minimum feature count for a sample to take part in multi-capture enrollment.
pub const MIN_ACCEPTABLE_FEATURES: u32 = 2 * BASELINE_MIN_FEATURES;

/// Minimum comparator score the winning sample needs on at least one of its pairings.
pub const MATCH_THRESHOLD: MatchScore = 60;

/// Tunables of an enrollment run.
///
/// Configuration files use the same conventions as signature databases: one
/// `key = value` per line, `;` starts a comment, blank lines are ignored.
///
/// ```text
/// ; dry fingers, stricter gate but a lower bar for the vote
/// min_features = 25
/// match_threshold = 55
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollConfig {
    /// Upper bound on capture calls per run.
    pub max_attempts: usize,
    /// Templates with fewer features are rejected.
    pub min_features: u32,
    /// Acceptance threshold on the comparator's score scale.
    pub match_threshold: MatchScore,
    /// Attach the backing raw sample to the outcome.
    pub keep_sample: bool,
}

impl Default for EnrollConfig {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            min_features: MIN_ACCEPTABLE_FEATURES,
            match_threshold: MATCH_THRESHOLD,
            keep_sample: true,
        }
    }
}

impl EnrollConfig {
    /// Checks that a run with this configuration can reach the consensus vote without
    /// loosening the attempt bound or the quality gate.
    ///
    /// `max_attempts` may be lowered down to [`REQUIRED_GOOD_SAMPLES`] but never raised
    /// above [`MAX_ATTEMPTS`]. `min_features` may be raised but never set below
    /// [`MIN_ACCEPTABLE_FEATURES`].
    pub fn validate(&self) -> Result<(), EnrollError> {
        if !(REQUIRED_GOOD_SAMPLES..=MAX_ATTEMPTS).contains(&self.max_attempts) {
            return Err(EnrollError::Misconfiguration(format!(
                "max_attempts must be between {REQUIRED_GOOD_SAMPLES} and {MAX_ATTEMPTS}, got {}",
                self.max_attempts
            )));
        }
        if self.min_features < MIN_ACCEPTABLE_FEATURES {
            return Err(EnrollError::Misconfiguration(format!(
                "min_features must be at least {MIN_ACCEPTABLE_FEATURES}, got {}",
                self.min_features
            )));
        }
        Ok(())
    }

    /// Loads and validates a configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, EnrollError> {
        let text = std::fs::read_to_string(path)?;
        text.parse()
    }
}

fn key(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_').parse(input)
}

fn value(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace()).parse(input)
}

fn parse_named_value(input: &str) -> IResult<&str, (&str, &str)> {
    all_consuming(separated_pair(key, delimited(space0, tag("="), space0), value)).parse(input)
}

fn parse_field<T: FromStr>(line_no: usize, name: &str, raw: &str) -> Result<T, EnrollError>
where
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|err| {
        EnrollError::Parse(format!("line {line_no}: invalid value for `{name}`: {raw} ({err})"))
    })
}

impl FromStr for EnrollConfig {
    type Err = EnrollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut config = EnrollConfig::default();
        let mut seen = HashSet::new();

        for (idx, line) in s.lines().enumerate() {
            let line_no = idx + 1;
            let line = match line.split_once(';') {
                Some((content, _comment)) => content,
                None => line,
            }
            .trim();

            if line.is_empty() {
                continue;
            }

            let (_, (name, raw)) = parse_named_value(line).map_err(|err| {
                EnrollError::Parse(format!("line {line_no}: fail to parse `{line}`: {err}"))
            })?;

            if !seen.insert(name) {
                return Err(EnrollError::Parse(format!("line {line_no}: duplicate key `{name}`")));
            }

            trace!("config `{}` = {}", name, raw);

            match name {
                "max_attempts" => config.max_attempts = parse_field(line_no, name, raw)?,
                "min_features" => config.min_features = parse_field(line_no, name, raw)?,
                "match_threshold" => config.match_threshold = parse_field(line_no, name, raw)?,
                "keep_sample" => config.keep_sample = parse_field(line_no, name, raw)?,
                _ => {
                    return Err(EnrollError::Parse(format!("line {line_no}: unknown key `{name}`")))
                }
            }
        }

        config.validate()?;
        Ok(config)
    }
}
