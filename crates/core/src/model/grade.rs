use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors that can occur while parsing grading labels.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GradeParseError {
    #[error("invalid grade result: {0}")]
    InvalidResult(String),
    #[error("invalid attempts label: {0}")]
    InvalidAttempts(String),
}

//
// ─── GRADE RESULT ─────────────────────────────────────────────────────────────
//

/// Verdict assigned to an answered question during answer checking.
///
/// Exactly one of the three counters of a stats bucket tracks each verdict:
/// - `Correct`: the answer was right
/// - `Incorrect`: the answer was wrong
/// - `Discuss`: undecided, flagged for discussion (excluded from accuracy)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradeResult {
    Correct,
    Incorrect,
    Discuss,
}

impl GradeResult {
    pub const ALL: [Self; 3] = [Self::Correct, Self::Incorrect, Self::Discuss];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            GradeResult::Correct => "correct",
            GradeResult::Incorrect => "incorrect",
            GradeResult::Discuss => "discuss",
        }
    }
}

impl fmt::Display for GradeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GradeResult {
    type Err = GradeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "correct" => Ok(Self::Correct),
            "incorrect" => Ok(Self::Incorrect),
            "discuss" => Ok(Self::Discuss),
            other => Err(GradeParseError::InvalidResult(other.to_owned())),
        }
    }
}

//
// ─── ATTEMPTS ─────────────────────────────────────────────────────────────────
//

/// How many tries the learner needed for a question.
///
/// Informational only: attempts never feed the stats counters, but a change of
/// attempts counts as a changed check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attempts {
    #[default]
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3+")]
    ThreeOrMore,
}

impl Attempts {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Attempts::One => "1",
            Attempts::Two => "2",
            Attempts::ThreeOrMore => "3+",
        }
    }
}

impl fmt::Display for Attempts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Attempts {
    type Err = GradeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" => Ok(Self::One),
            "2" => Ok(Self::Two),
            "3+" => Ok(Self::ThreeOrMore),
            other => Err(GradeParseError::InvalidAttempts(other.to_owned())),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
