//! Hypothesis report rendering
//!
//! Pure formatting over a borrowed [`ResultStore`]. Rendering the same
//! snapshot twice yields byte-identical output.
//!
//! ```text
//!
//! A/B Hypothesis Testing Report
//! ========================================
//! Hypothesis: No risk difference across provinces
//! P-Value: 0.0194
//! Result: reject
//! ----------------------------------------
//! ```

use crate::results::{HypothesisRecord, ResultStore};
use crate::Result;
use std::fmt;

/// Report title line
pub const REPORT_TITLE: &str = "A/B Hypothesis Testing Report";

/// Width of the header rule and record separators
const RULE_WIDTH: usize = 40;

/// Renders a result store as text or JSON
#[derive(Debug, Clone, Copy)]
pub struct ReportGenerator<'a> {
    results: &'a ResultStore,
}

impl<'a> ReportGenerator<'a> {
    /// Create a generator over a result store.
    #[must_use]
    pub const fn new(results: &'a ResultStore) -> Self {
        Self { results }
    }

    /// Render the text report.
    #[must_use]
    pub fn generate_report(&self) -> String {
        self.to_string()
    }

    /// Render the records as a pretty-printed JSON array, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if serialization fails.
    pub fn generate_json(&self) -> Result<String> {
        let records: &[HypothesisRecord] = self.results.records();
        Ok(serde_json::to_string_pretty(records)?)
    }
}

impl fmt::Display for ReportGenerator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "{REPORT_TITLE}")?;
        writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;

        for record in self.results {
            writeln!(f, "Hypothesis: {}", record.name())?;
            writeln!(f, "P-Value: {}", record.p_value())?;
            writeln!(f, "Result: {}", record.decision())?;
            writeln!(f, "{}", "-".repeat(RULE_WIDTH))?;
        }
        Ok(())
    }
}

/// Render the text report for a result store.
#[must_use]
pub fn generate_report(results: &ResultStore) -> String {
    ReportGenerator::new(results).generate_report()
}
