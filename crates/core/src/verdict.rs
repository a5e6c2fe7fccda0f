//! Binary grading verdicts.
//!
//! Every quality gate in the pipeline (document relevance, groundedness,
//! answer relevance) reduces to a yes/no verdict. Anything a classifier
//! returns that is not exactly "yes" is treated as "no" — failing closed
//! keeps every retry loop driven by the fixed budget alone.

use serde::{Deserialize, Serialize};

/// The outcome of one binary classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Yes,
    No,
}

impl Verdict {
    /// Parse a raw classifier score, failing closed.
    ///
    /// Only a trimmed, case-insensitive "yes" maps to `Yes`; everything else
    /// (including "maybe", empty strings, and other malformed output) is `No`.
    pub fn from_raw(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("yes") {
            Verdict::Yes
        } else {
            Verdict::No
        }
    }

    pub fn is_yes(self) -> bool {
        matches!(self, Verdict::Yes)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Yes => write!(f, "yes"),
            Verdict::No => write!(f, "no"),
        }
    }
}
