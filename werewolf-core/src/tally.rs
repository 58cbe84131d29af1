//! Vote aggregation.
//!
//! Used for both the werewolves' night consensus and the day elimination.
//! The tally only counts strings; whether a target is alive is the caller's
//! concern.

/// A single named vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ballot {
    pub voter: String,
    pub target: String,
}

impl Ballot {
    pub fn new(voter: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            voter: voter.into(),
            target: target.into(),
        }
    }
}

/// Vote counts in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    counts: Vec<(String, usize)>,
}

impl Tally {
    /// Count a sequence of vote targets.
    pub fn from_votes<I, S>(votes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for vote in votes {
            let vote = vote.as_ref();
            match counts.iter_mut().find(|(target, _)| target == vote) {
                Some((_, count)) => *count += 1,
                None => counts.push((vote.to_string(), 1)),
            }
        }
        Self { counts }
    }

    /// Count the targets of a sequence of ballots.
    pub fn from_ballots(ballots: &[Ballot]) -> Self {
        Self::from_votes(ballots.iter().map(|b| b.target.as_str()))
    }

    /// The most-voted target.
    ///
    /// Ties go to whichever tied target appeared first in the input.
    /// Returns `None` for an empty tally.
    pub fn winner(&self) -> Option<&str> {
        let mut best: Option<&(String, usize)> = None;
        for entry in &self.counts {
            // Strictly greater keeps the earlier entry on a tie.
            if best.map_or(true, |(_, count)| entry.1 > *count) {
                best = Some(entry);
            }
        }
        best.map(|(target, _)| target.as_str())
    }

    /// Number of votes cast for `target`.
    pub fn count_for(&self, target: &str) -> usize {
        self.counts
            .iter()
            .find(|(t, _)| t == target)
            .map_or(0, |(_, count)| *count)
    }

    /// `(target, count)` pairs in first-seen order.
    pub fn counts(&self) -> &[(String, usize)] {
        &self.counts
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Shorthand for `Tally::from_votes(votes).winner()`.
pub fn winner<I, S>(votes: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Tally::from_votes(votes).winner().map(str::to_string)
}
