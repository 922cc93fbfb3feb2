mod model;

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use std::collections::{BTreeMap, HashMap};

pub use crate::model::*;

// A row of two or more '=' characters separates the sections of a report.
static SECTION_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"={2,}").unwrap());

// Roster entries look like "03 = SHERROD BROWN". Names may carry slashes,
// parentheses, periods, apostrophes and hyphens; the match stops at the end
// of the line.
static ROSTER_ENTRY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{2}) = ([A-Za-z/ ().'\-]+)").unwrap());

// The canonical shape of a precinct data row: a 4-digit identifier, an
// optional second identifier, then the start of the precinct name.
static PRECINCT_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}\s\d{0,4}\s?[A-Za-z]").unwrap());

// Fields within a precinct row are separated by wider runs of whitespace.
static FIELD_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());

static PRECINCT_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").unwrap());

static LEADING_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}\s+").unwrap());

/// Upper bound on the forward scans for the title marker and for the first
/// precinct row, so a malformed block cannot turn a search into a walk over
/// an arbitrarily large input.
const SCAN_CEILING: usize = 10_000;

/// Splits a raw canvass report into one block per section.
///
/// The block at position 0 is the report preamble; real contests start at
/// position 1. The position in the returned sequence is the contest number
/// used by every other operation. A trailing empty block (the report ends
/// with a separator row) is dropped.
pub fn split_contests(report: &str) -> Vec<&str> {
    let mut contests: Vec<&str> = SECTION_BREAK.split(report).collect();
    if contests.len() > 1 && contests.last() == Some(&"") {
        contests.pop();
    }
    contests
}

/// Recovers the contest title from a block.
///
/// The title is the line after the first line containing "VOTES". A
/// "vote for not more than N" line two rows below the marker means the title
/// fits on one line; any other content there is a continuation and is joined
/// with a single space. Returns `None` when no marker is found within the
/// scan ceiling.
pub fn contest_title(contest: &str) -> Option<String> {
    let lines: Vec<&str> = contest.lines().collect();
    let marker = lines
        .iter()
        .take(SCAN_CEILING)
        .position(|line| line.to_uppercase().contains("VOTES"))?;
    let title = lines.get(marker + 1)?.trim_end();
    let overflow = lines.get(marker + 2).map(|line| line.trim()).unwrap_or("");
    if overflow.is_empty() || overflow.to_lowercase().contains("vote for not more") {
        Some(title.to_string())
    } else {
        Some(format!("{} {}", title, overflow))
    }
}

/// Collects the roster of a contest, keyed by column index.
///
/// The overvotes and undervotes pseudo-candidates use the same "NN = label"
/// encoding as the candidates and are kept as ordinary entries. A duplicated
/// index keeps the last name seen for it.
pub fn contest_candidates(contest: &str) -> BTreeMap<u32, String> {
    let mut roster: BTreeMap<u32, String> = BTreeMap::new();
    for caps in ROSTER_ENTRY.captures_iter(contest) {
        if let Ok(index) = caps[1].parse::<u32>() {
            roster.insert(index, caps[2].trim_end().to_string());
        }
    }
    debug!("contest_candidates: {:?}", roster);
    roster
}

/// Returns the precinct data region of a block: the first line shaped like a
/// precinct row and everything after it.
///
/// Blocks without a precinct-level breakdown (the report preamble, purely
/// informational sections) yield an empty region.
pub fn precinct_lines(contest: &str) -> Vec<&str> {
    let lines: Vec<&str> = contest.lines().collect();
    match lines
        .iter()
        .take(SCAN_CEILING)
        .position(|line| PRECINCT_START.is_match(line))
    {
        Some(first) => lines[first..].to_vec(),
        None => Vec::new(),
    }
}

/// Parses one precinct row into identifiers, name and vote counts.
///
/// The identifier/name cluster runs through the first field containing a
/// letter: reports are inconsistent about whether the wide gap sits after
/// the identifiers or only before the votes. Every remaining token is a vote
/// count and must parse as a non-negative integer.
pub fn parse_precinct_row(line: &str) -> Result<PrecinctRecord, ParseErrors> {
    let fields: Vec<&str> = FIELD_BREAK.split(line).collect();
    let mut cluster_end = fields.len();
    for (k, field) in fields.iter().enumerate() {
        if field.chars().any(|c| c.is_ascii_alphabetic()) {
            cluster_end = k + 1;
            break;
        }
    }
    let cluster = fields[..cluster_end].join(" ");

    let mut votes: Vec<u64> = Vec::new();
    for field in &fields[cluster_end..] {
        for token in field.split_whitespace() {
            let vote = token
                .parse::<u64>()
                .map_err(|_| ParseErrors::MalformedVoteCount {
                    token: token.to_string(),
                    line: line.to_string(),
                })?;
            votes.push(vote);
        }
    }

    // Some precincts have one identifier, some have two.
    let mut ids = PRECINCT_ID.find_iter(&cluster);
    let primary_id = ids.next().map(|m| m.as_str().to_string());
    let secondary_id = ids.next().map(|m| m.as_str().to_string());

    // The name is whatever remains after the leading identifiers.
    let mut name = cluster.as_str();
    while let Some(m) = LEADING_ID.find(name) {
        name = &name[m.end()..];
    }

    Ok(PrecinctRecord {
        primary_id,
        secondary_id,
        name: name.trim().to_string(),
        votes,
    })
}

/// Assembles one contest block into its exportable table.
///
/// The header is ordered by candidate index and must be contiguous from 1;
/// a gap signals an inconsistent roster. Rows keep document order, and every
/// row must carry exactly one vote per roster entry.
pub fn build_contest_table(contest: &str) -> Result<ContestTable, ParseErrors> {
    let title = contest_title(contest).ok_or(ParseErrors::MissingTitle)?;
    let roster = contest_candidates(contest);

    let mut candidates: Vec<Candidate> = Vec::new();
    for index in 1..=roster.len() as u32 {
        let name = roster.get(&index).ok_or(ParseErrors::RosterGap { index })?;
        candidates.push(Candidate {
            index,
            name: name.clone(),
        });
    }

    let mut rows: Vec<PrecinctRecord> = Vec::new();
    for line in precinct_lines(contest) {
        if line.trim().is_empty() {
            continue;
        }
        let record = parse_precinct_row(line)?;
        if record.votes.len() != candidates.len() {
            return Err(ParseErrors::VoteCountMismatch {
                precinct: record.name,
                expected: candidates.len(),
                actual: record.votes.len(),
            });
        }
        rows.push(record);
    }

    debug!(
        "build_contest_table: {:?}: {} candidates, {} precincts",
        title,
        candidates.len(),
        rows.len()
    );
    Ok(ContestTable {
        title,
        candidates,
        rows,
    })
}

/// Maps every contest title in a report to its contest number.
///
/// The preamble block is skipped. When two contests share a title, the later
/// one is re-keyed as the title with its contest number appended; the
/// earlier entry always keeps the unmodified key.
pub fn contest_directory(report: &str) -> HashMap<String, usize> {
    let contests = split_contests(report);
    let mut directory: HashMap<String, usize> = HashMap::new();
    for (number, contest) in contests.iter().enumerate().skip(1) {
        match contest_title(contest) {
            Some(title) if directory.contains_key(&title) => {
                directory.insert(format!("{}{}", title, number), number);
            }
            Some(title) => {
                directory.insert(title, number);
            }
            None => warn!("contest {}: no title marker, skipping", number),
        }
    }
    directory
}
