//! Accept/reject decision on a p-value

use serde::{Deserialize, Serialize};
use std::fmt;

pub use crate::config::DEFAULT_ALPHA;

/// Outcome of comparing a p-value with a significance threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// `p_value < alpha`: the null hypothesis is rejected
    Reject,
    /// `p_value >= alpha` (or NaN): the null hypothesis stands
    FailToReject,
}

impl Decision {
    /// Report label: `"reject"` or `"fail_to_reject"`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Reject => "reject",
            Self::FailToReject => "fail_to_reject",
        }
    }

    /// Whether the null hypothesis was rejected.
    #[must_use]
    pub const fn is_reject(&self) -> bool {
        matches!(self, Self::Reject)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Classify a p-value against `alpha` (strict inequality).
///
/// ```rust
/// use trueno_ab::decision::{analyze_results, Decision, DEFAULT_ALPHA};
///
/// assert_eq!(analyze_results(0.01, DEFAULT_ALPHA), Decision::Reject);
/// assert_eq!(analyze_results(0.05, DEFAULT_ALPHA), Decision::FailToReject);
/// ```
#[must_use]
pub fn analyze_results(p_value: f64, alpha: f64) -> Decision {
    if p_value < alpha {
        Decision::Reject
    } else {
        Decision::FailToReject
    }
}
