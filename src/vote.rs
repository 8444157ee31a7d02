//! Three-way consensus vote over pairwise comparison scores.
//!
//! The pair with the lowest score is the most dissimilar one; the sample left out of
//! that pair is taken as the most representative of the three.

use crate::traits::MatchScore;
use thiserror::Error;

/// Pairwise scores between three accepted samples, indexed by slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairScores {
    pub s01: MatchScore,
    pub s12: MatchScore,
    pub s20: MatchScore,
}

impl PairScores {
    pub fn new(s01: MatchScore, s12: MatchScore, s20: MatchScore) -> Self {
        Self { s01, s12, s20 }
    }
}

/// The elected slot and the two scores of the pairs it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ballot {
    pub winner: usize,
    pub supporting: [MatchScore; 2],
}

impl Ballot {
    /// The better of the two supporting scores.
    pub fn best_support(&self) -> MatchScore {
        self.supporting[0].max(self.supporting[1])
    }

    /// A winner is accepted when at least one of its pairings reaches the threshold.
    pub fn passes(&self, threshold: MatchScore) -> bool {
        self.best_support() >= threshold
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteError {
    /// All three scores are equal, so no sample stands out.
    #[error("Undecidable vote, all pairwise scores equal: {0:?}")]
    Tie(PairScores),
}

/// Elects the slot absent from the minimum-scoring pair.
///
/// Candidates are checked in slot order, so a tie between two minimum pairs goes to
/// the lower slot. A tie across all three scores is reported as an error.
pub fn elect(scores: PairScores) -> Result<Ballot, VoteError> {
    let PairScores { s01, s12, s20 } = scores;

    if s01 == s12 && s12 == s20 {
        return Err(VoteError::Tie(scores));
    }

    if s01 >= s12 && s20 >= s12 {
        Ok(Ballot { winner: 0, supporting: [s01, s20] })
    } else if s12 >= s20 && s01 >= s20 {
        Ok(Ballot { winner: 1, supporting: [s12, s01] })
    } else if s20 >= s01 && s12 >= s01 {
        Ok(Ballot { winner: 2, supporting: [s20, s12] })
    } else {
        // unreachable: one of the three scores is always a minimum
        Err(VoteError::Tie(scores))
    }
}
