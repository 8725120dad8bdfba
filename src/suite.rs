//! Batch evaluation of hypothesis plans
//!
//! A [`HypothesisSuite`] runs a list of [`HypothesisPlan`]s against one
//! dataset. Plans are independent, so they are evaluated in parallel when
//! the `rayon` feature is enabled. Outcomes are collected in plan order and
//! appended to the [`ResultStore`] by the caller's thread only, which keeps
//! the report order identical to the plan order.
//!
//! A failing plan is reported in its [`SuiteOutcome`] and logged; the
//! remaining plans still run.
//!
//! ## Example
//!
//! ```rust
//! use trueno_ab::dataset::Condition;
//! use trueno_ab::engine::TestKind;
//! use trueno_ab::suite::{HypothesisPlan, HypothesisSuite};
//!
//! let suite = HypothesisSuite::default().with_plan(HypothesisPlan::new(
//!     "No risk difference between Gauteng and Western Cape",
//!     "Province",
//!     Condition::equals("Province", "Gauteng"),
//!     Condition::equals("Province", "Western Cape"),
//!     TestKind::TTest,
//!     "TotalClaims",
//! ));
//! assert_eq!(suite.plans().len(), 1);
//! ```

use crate::config::{validate_alpha, AnalysisConfig};
use crate::dataset::{Condition, Dataset};
use crate::decision::{analyze_results, Decision};
use crate::engine::{HypothesisEngine, TestKind, TestStatistic};
use crate::results::{HypothesisRecord, ResultStore};
use crate::segment::Segmenter;
use crate::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// One hypothesis to evaluate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HypothesisPlan {
    /// Hypothesis name as it appears in the report
    pub name: String,
    /// Feature the two groups are defined on
    pub feature: String,
    /// Rows of group A
    pub condition_a: Condition,
    /// Rows of group B
    pub condition_b: Condition,
    /// Test to run
    pub kind: TestKind,
    /// Tested column: the feature for chi-squared, the KPI for t/z
    pub column: String,
    /// Per-plan significance threshold, overriding the suite's
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
}

impl HypothesisPlan {
    /// Create a plan using the suite's significance threshold.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        feature: impl Into<String>,
        condition_a: Condition,
        condition_b: Condition,
        kind: TestKind,
        column: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            feature: feature.into(),
            condition_a,
            condition_b,
            kind,
            column: column.into(),
            alpha: None,
        }
    }

    /// Override the significance threshold for this plan.
    #[must_use]
    pub const fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }
}

/// Successful evaluation of one plan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Test outcome
    pub statistic: TestStatistic,
    /// Threshold the decision was taken at
    pub alpha: f64,
    /// Decision on the p-value
    pub decision: Decision,
}

/// Outcome of one plan, in plan order
#[derive(Debug)]
pub struct SuiteOutcome {
    name: String,
    result: Result<Evaluation>,
}

impl SuiteOutcome {
    /// Hypothesis name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluation or the error that stopped it.
    #[must_use]
    pub const fn result(&self) -> &Result<Evaluation> {
        &self.result
    }

    /// Whether the plan was evaluated.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Ordered collection of hypothesis plans sharing one configuration
#[derive(Debug, Clone, Default)]
pub struct HypothesisSuite {
    plans: Vec<HypothesisPlan>,
    config: AnalysisConfig,
}

impl HypothesisSuite {
    /// Create an empty suite with the given configuration.
    #[must_use]
    pub const fn new(config: AnalysisConfig) -> Self {
        Self {
            plans: Vec::new(),
            config,
        }
    }

    /// Append a plan.
    #[must_use]
    pub fn with_plan(mut self, plan: HypothesisPlan) -> Self {
        self.plans.push(plan);
        self
    }

    /// Append a plan in place.
    pub fn add_plan(&mut self, plan: HypothesisPlan) {
        self.plans.push(plan);
    }

    /// Plans in evaluation order.
    #[must_use]
    pub fn plans(&self) -> &[HypothesisPlan] {
        &self.plans
    }

    /// Suite configuration.
    #[must_use]
    pub const fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Evaluate every plan and append the successful ones to `store`, in
    /// plan order.
    ///
    /// Returns one outcome per plan, in plan order.
    #[instrument(skip_all, fields(plans = self.plans.len(), rows = dataset.num_rows()))]
    pub fn run(&self, dataset: &Dataset, store: &mut ResultStore) -> Vec<SuiteOutcome> {
        let engine = HypothesisEngine::with_config(&self.config);

        #[cfg(feature = "rayon")]
        let outcomes: Vec<SuiteOutcome> = self
            .plans
            .par_iter()
            .map(|plan| self.evaluate(&engine, dataset, plan))
            .collect();

        #[cfg(not(feature = "rayon"))]
        let outcomes: Vec<SuiteOutcome> = self
            .plans
            .iter()
            .map(|plan| self.evaluate(&engine, dataset, plan))
            .collect();

        for (plan, outcome) in self.plans.iter().zip(&outcomes) {
            match &outcome.result {
                Ok(evaluation) => store.add_record(
                    HypothesisRecord::builder(
                        &plan.name,
                        evaluation.statistic.p_value,
                        evaluation.decision,
                    )
                    .subject(&plan.column)
                    .kind(plan.kind)
                    .build(),
                ),
                Err(e) => warn!(hypothesis = %plan.name, error = %e, "hypothesis skipped"),
            }
        }

        info!(
            evaluated = outcomes.iter().filter(|o| o.is_ok()).count(),
            "suite complete"
        );
        outcomes
    }

    fn evaluate(
        &self,
        engine: &HypothesisEngine,
        dataset: &Dataset,
        plan: &HypothesisPlan,
    ) -> SuiteOutcome {
        SuiteOutcome {
            name: plan.name.clone(),
            result: self.evaluate_plan(engine, dataset, plan),
        }
    }

    fn evaluate_plan(
        &self,
        engine: &HypothesisEngine,
        dataset: &Dataset,
        plan: &HypothesisPlan,
    ) -> Result<Evaluation> {
        let alpha = plan.alpha.unwrap_or(self.config.alpha());
        validate_alpha(alpha)?;

        let (a, b) = Segmenter::new(dataset).segment_by(
            &plan.feature,
            &plan.condition_a,
            &plan.condition_b,
        )?;
        let statistic = engine.run(plan.kind, &a, &b, &plan.column)?;

        Ok(Evaluation {
            statistic,
            alpha,
            decision: analyze_results(statistic.p_value, alpha),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use arrow::array::{Float64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use std::sync::Arc;

    fn create_test_dataset() -> Dataset {
        let schema = Schema::new(vec![
            Field::new("Province", DataType::Utf8, false),
            Field::new("TotalClaims", DataType::Float64, false),
        ]);
        let batch = RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(StringArray::from(vec![
                    "Gauteng",
                    "Western Cape",
                    "Gauteng",
                    "Western Cape",
                ])),
                Arc::new(Float64Array::from(vec![2000.0, 1500.0, 2100.0, 1600.0])),
            ],
        )
        .unwrap();
        Dataset::new(batch).unwrap()
    }

    fn province_plan(name: &str) -> HypothesisPlan {
        HypothesisPlan::new(
            name,
            "Province",
            Condition::equals("Province", "Gauteng"),
            Condition::equals("Province", "Western Cape"),
            TestKind::TTest,
            "TotalClaims",
        )
    }

    #[test]
    fn test_run_appends_in_plan_order() {
        let ds = create_test_dataset();
        let suite = HypothesisSuite::default()
            .with_plan(province_plan("first"))
            .with_plan(province_plan("second").with_alpha(0.01));

        let mut store = ResultStore::new();
        let outcomes = suite.run(&ds, &mut store);

        assert_eq!(outcomes.len(), 2);
        assert_eq!(store.len(), 2);
        assert_eq!(store.records()[0].name(), "first");
        assert_eq!(store.records()[0].decision(), Decision::Reject);
        assert_eq!(store.records()[0].subject(), Some("TotalClaims"));
        assert_eq!(store.records()[0].kind(), Some(TestKind::TTest));
        // p ≈ 0.0194 is not below 0.01
        assert_eq!(store.records()[1].decision(), Decision::FailToReject);
    }

    #[test]
    fn test_failing_plan_does_not_stop_suite() {
        let ds = create_test_dataset();
        let mut missing = province_plan("missing kpi");
        missing.column = "Margin".to_string();

        let suite = HypothesisSuite::default()
            .with_plan(missing)
            .with_plan(province_plan("ok"));

        let mut store = ResultStore::new();
        let outcomes = suite.run(&ds, &mut store);

        assert!(matches!(
            outcomes[0].result(),
            Err(Error::UnknownColumn { column }) if column == "Margin"
        ));
        assert!(outcomes[1].is_ok());
        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].name(), "ok");
    }

    #[test]
    fn test_invalid_plan_alpha() {
        let ds = create_test_dataset();
        let suite = HypothesisSuite::default().with_plan(province_plan("bad").with_alpha(1.5));

        let mut store = ResultStore::new();
        let outcomes = suite.run(&ds, &mut store);

        assert!(matches!(outcomes[0].result(), Err(Error::InvalidInput(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_plan_serde() {
        let plan = province_plan("json");
        let json = serde_json::to_string(&plan).unwrap();
        assert!(json.contains(r#""kind":"t_test""#));
        assert!(!json.contains("alpha"));

        let back: HypothesisPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(back, plan);
    }
}
