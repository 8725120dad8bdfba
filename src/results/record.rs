//! Hypothesis Record - one evaluated hypothesis

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decision::Decision;
use crate::engine::TestKind;

/// Hypothesis Record represents the outcome of one hypothesis test.
///
/// Records are immutable once created; the only way to change the store is
/// to append another record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HypothesisRecord {
    name: String,
    subject: Option<String>,
    kind: Option<TestKind>,
    p_value: f64,
    decision: Decision,
    recorded_at: DateTime<Utc>,
}

impl HypothesisRecord {
    /// Create a new hypothesis record.
    ///
    /// # Arguments
    ///
    /// * `name` - Free-text hypothesis name
    /// * `p_value` - p-value produced by the test
    /// * `decision` - Decision derived from the p-value
    ///
    /// # Returns
    ///
    /// A new `HypothesisRecord` with the current timestamp.
    #[must_use]
    pub fn new(name: impl Into<String>, p_value: f64, decision: Decision) -> Self {
        Self::builder(name, p_value, decision).build()
    }

    /// Create a builder for constructing a record with optional fields.
    #[must_use]
    pub fn builder(
        name: impl Into<String>,
        p_value: f64,
        decision: Decision,
    ) -> HypothesisRecordBuilder {
        HypothesisRecordBuilder::new(name, p_value, decision)
    }

    /// Get the hypothesis name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the KPI or feature under test, if recorded.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Get the test kind, if recorded.
    #[must_use]
    pub const fn kind(&self) -> Option<TestKind> {
        self.kind
    }

    /// Get the p-value.
    #[must_use]
    pub const fn p_value(&self) -> f64 {
        self.p_value
    }

    /// Get the decision.
    #[must_use]
    pub const fn decision(&self) -> Decision {
        self.decision
    }

    /// Get the timestamp when the record was created.
    #[must_use]
    pub const fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

/// Builder for `HypothesisRecord`.
#[derive(Debug)]
pub struct HypothesisRecordBuilder {
    name: String,
    subject: Option<String>,
    kind: Option<TestKind>,
    p_value: f64,
    decision: Decision,
    recorded_at: DateTime<Utc>,
}

impl HypothesisRecordBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, p_value: f64, decision: Decision) -> Self {
        Self {
            name: name.into(),
            subject: None,
            kind: None,
            p_value,
            decision,
            recorded_at: Utc::now(),
        }
    }

    /// Set the KPI or feature under test.
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the test kind.
    #[must_use]
    pub const fn kind(mut self, kind: TestKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Set a custom timestamp.
    #[must_use]
    pub const fn recorded_at(mut self, recorded_at: DateTime<Utc>) -> Self {
        self.recorded_at = recorded_at;
        self
    }

    /// Build the `HypothesisRecord`.
    #[must_use]
    pub fn build(self) -> HypothesisRecord {
        HypothesisRecord {
            name: self.name,
            subject: self.subject,
            kind: self.kind,
            p_value: self.p_value,
            decision: self.decision,
            recorded_at: self.recorded_at,
        }
    }
}
