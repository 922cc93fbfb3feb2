// ********* Parsed data structures ***********

use std::error::Error;
use std::fmt::Display;

/// One column of a contest.
///
/// Besides the declared candidates, every contest carries the overvotes and
/// undervotes pseudo-candidates, which are ordinary entries here. The index
/// is the 1-based column position declared in the roster region; vote counts
/// are aligned to it.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Candidate {
    pub index: u32,
    pub name: String,
}

/// The tallies of one precinct for one contest.
///
/// Precincts carry one or, in some reports, two 4-digit identifiers.
/// `votes[k]` is the tally for the candidate with index `k + 1`.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PrecinctRecord {
    pub primary_id: Option<String>,
    pub secondary_id: Option<String>,
    pub name: String,
    pub votes: Vec<u64>,
}

/// A fully assembled contest: title, candidates in column order and one row
/// per precinct, in document order.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ContestTable {
    pub title: String,
    pub candidates: Vec<Candidate>,
    pub rows: Vec<PrecinctRecord>,
}

/// Errors that prevent a contest block from being assembled into a table.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ParseErrors {
    /// No "VOTES" marker line within the scan ceiling.
    MissingTitle,
    /// The roster skips an index at or below its size.
    RosterGap { index: u32 },
    /// A vote field did not parse as a non-negative integer.
    MalformedVoteCount { token: String, line: String },
    /// A precinct row carries a different number of votes than the roster
    /// has candidates.
    VoteCountMismatch {
        precinct: String,
        expected: usize,
        actual: usize,
    },
}

impl Error for ParseErrors {}

impl Display for ParseErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseErrors::MissingTitle => {
                write!(f, "no title marker found in the contest block")
            }
            ParseErrors::RosterGap { index } => {
                write!(f, "no candidate declared at column index {}", index)
            }
            ParseErrors::MalformedVoteCount { token, line } => {
                write!(f, "vote field {:?} is not a number in row {:?}", token, line)
            }
            ParseErrors::VoteCountMismatch {
                precinct,
                expected,
                actual,
            } => write!(
                f,
                "precinct {:?} has {} vote fields, the roster has {} candidates",
                precinct, actual, expected
            ),
        }
    }
}
