//! Allocation regimes: the "Active Policy" selector.
//!
//! Exactly one regime is active at a time. The older two-flag form
//! (`use_dividend`, `use_stabilization`) is still accepted through
//! [`Policy::from_flags`], which resolves conflicts with a fixed priority:
//! dividend, then stabilization, then none.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    #[default]
    None,
    NationalDividend,
    StabilizationFund,
}

impl Policy {
    /// Selector options in display order.
    pub const ALL: [Policy; 3] = [
        Policy::None,
        Policy::NationalDividend,
        Policy::StabilizationFund,
    ];

    /// Name shown in the policy selector.
    pub fn name(self) -> &'static str {
        match self {
            Policy::None => "None",
            Policy::NationalDividend => "National Dividend",
            Policy::StabilizationFund => "Stabilization Fund",
        }
    }

    /// Lenient lookup by selector name. Anything unrecognised means no policy.
    pub fn from_name(name: &str) -> Policy {
        match name {
            "National Dividend" => Policy::NationalDividend,
            "Stabilization Fund" => Policy::StabilizationFund,
            _ => Policy::None,
        }
    }

    /// Resolve the legacy flag pair. Dividend wins when both are set.
    pub fn from_flags(use_dividend: bool, use_stabilization: bool) -> Policy {
        if use_dividend {
            Policy::NationalDividend
        } else if use_stabilization {
            Policy::StabilizationFund
        } else {
            Policy::None
        }
    }

    /// `(use_dividend, use_stabilization)` for this policy.
    pub fn flags(self) -> (bool, bool) {
        match self {
            Policy::None => (false, false),
            Policy::NationalDividend => (true, false),
            Policy::StabilizationFund => (false, true),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned by the strict [`FromStr`] parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePolicyError {
    pub input: String,
}

impl fmt::Display for ParsePolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown policy '{}' (expected one of: None, National Dividend, Stabilization Fund)",
            self.input
        )
    }
}

impl std::error::Error for ParsePolicyError {}

impl FromStr for Policy {
    type Err = ParsePolicyError;

    /// Accepts selector names and snake_case identifiers, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match key.as_str() {
            "none" => Ok(Policy::None),
            "national_dividend" | "dividend" => Ok(Policy::NationalDividend),
            "stabilization_fund" | "stabilization" => Ok(Policy::StabilizationFund),
            _ => Err(ParsePolicyError {
                input: s.to_string(),
            }),
        }
    }
}
