//! Hypothesis engine
//!
//! Computes how likely the observed difference between two segments is
//! under the null hypothesis of no difference:
//!
//! - **Chi-squared**: categorical feature, 2 × k contingency table
//! - **Welch's t-test**: numeric KPI, unequal variances, small/moderate n
//! - **z-test**: numeric KPI, large samples (n ≥ 30 per group by convention)
//!
//! The engine never picks a test on its own. [`TestKind::recommend`] encodes
//! the usual policy for callers that want it.
//!
//! Distributions come from `statrs`; nothing here evaluates a CDF by hand.

mod contingency;
mod sample;

pub use contingency::ContingencyTable;
pub use sample::SampleStats;

use crate::config::AnalysisConfig;
use crate::dataset::ColumnKind;
use crate::segment::Segment;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF, Normal, StudentsT};
use std::fmt;
use tracing::{debug, warn};

/// Statistical test family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    /// Pearson's chi-squared test of independence
    ChiSquared,
    /// Welch's two-sample t-test
    TTest,
    /// Large-sample z-test on means
    ZTest,
}

impl TestKind {
    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ChiSquared => "chi_squared",
            Self::TTest => "t_test",
            Self::ZTest => "z_test",
        }
    }

    /// Conventional test choice for a column of `kind` with group sizes
    /// `n_a` and `n_b`: chi-squared for categorical columns, z-test when both
    /// groups reach `z_threshold`, t-test otherwise.
    ///
    /// Returns `None` for temporal and other columns.
    #[must_use]
    pub const fn recommend(
        kind: ColumnKind,
        n_a: usize,
        n_b: usize,
        z_threshold: usize,
    ) -> Option<Self> {
        match kind {
            ColumnKind::Categorical => Some(Self::ChiSquared),
            ColumnKind::Numeric if n_a >= z_threshold && n_b >= z_threshold => Some(Self::ZTest),
            ColumnKind::Numeric => Some(Self::TTest),
            ColumnKind::Temporal | ColumnKind::Other => None,
        }
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Full outcome of one test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestStatistic {
    /// Test that produced the statistic
    pub kind: TestKind,
    /// Chi-squared, t or z statistic
    pub statistic: f64,
    /// Degrees of freedom (`None` for the z-test)
    pub degrees_of_freedom: Option<f64>,
    /// Two-sided p-value
    pub p_value: f64,
}

/// Executes statistical comparisons between two segments
#[derive(Debug, Clone, Copy)]
pub struct HypothesisEngine {
    continuity_correction: bool,
    z_test_min_samples: usize,
}

impl Default for HypothesisEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl HypothesisEngine {
    /// Create an engine with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&AnalysisConfig::default())
    }

    /// Create an engine from a configuration.
    #[must_use]
    pub const fn with_config(config: &AnalysisConfig) -> Self {
        Self {
            continuity_correction: config.continuity_correction(),
            z_test_min_samples: config.z_test_min_samples(),
        }
    }

    /// Run a test of the given kind on `column`.
    ///
    /// For [`TestKind::ZTest`] the returned p-value is two-sided,
    /// `2 * (1 - Φ(|z|))`.
    ///
    /// # Errors
    ///
    /// See the individual tests.
    pub fn run(
        &self,
        kind: TestKind,
        a: &Segment,
        b: &Segment,
        column: &str,
    ) -> Result<TestStatistic> {
        match kind {
            TestKind::ChiSquared => self.chi_squared(a, b, column),
            TestKind::TTest => self.welch_t(a, b, column),
            TestKind::ZTest => self.z_score(a, b, column),
        }
    }

    /// Chi-squared p-value for the association between group membership and
    /// the categories of `feature`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UndefinedStatistic`] if the table degenerates (a
    /// group without values, or a single category overall).
    pub fn chi_squared_test(&self, a: &Segment, b: &Segment, feature: &str) -> Result<f64> {
        Ok(self.chi_squared(a, b, feature)?.p_value)
    }

    /// Welch's t-test p-value comparing the means of `kpi`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UndefinedStatistic`] if either group has fewer than
    /// 2 finite values or both variances are zero.
    pub fn t_test(&self, a: &Segment, b: &Segment, kpi: &str) -> Result<f64> {
        Ok(self.welch_t(a, b, kpi)?.p_value)
    }

    /// z statistic `(mean_a - mean_b) / sqrt(var_a/n_a + var_b/n_b)`.
    ///
    /// The n ≥ 30 normal-approximation rule is not enforced; a warning is
    /// logged below the configured threshold.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UndefinedStatistic`] if either group has fewer than
    /// 2 finite values or a zero standard deviation.
    pub fn z_test(&self, a: &Segment, b: &Segment, kpi: &str) -> Result<f64> {
        Ok(self.z_score(a, b, kpi)?.statistic)
    }

    /// Two-sided p-value `2 * (1 - Φ(|z|))` for the z statistic.
    ///
    /// # Errors
    ///
    /// Same as [`z_test`](Self::z_test).
    pub fn z_test_p_value(&self, a: &Segment, b: &Segment, kpi: &str) -> Result<f64> {
        Ok(self.z_score(a, b, kpi)?.p_value)
    }

    /// Detailed chi-squared outcome.
    ///
    /// # Errors
    ///
    /// See [`chi_squared_test`](Self::chi_squared_test).
    #[allow(clippy::cast_precision_loss)]
    pub fn chi_squared(&self, a: &Segment, b: &Segment, feature: &str) -> Result<TestStatistic> {
        let table = ContingencyTable::from_segments(a, b, feature)?;
        let dof = table.degrees_of_freedom() as f64;
        let statistic = table.chi_squared_statistic(self.continuity_correction);

        let dist = ChiSquared::new(dof).map_err(|e| {
            Error::UndefinedStatistic(format!("chi-squared distribution with dof {dof}: {e}"))
        })?;
        let p_value = dist.sf(statistic).clamp(0.0, 1.0);

        debug!(feature, statistic, dof, p_value, "chi-squared test");
        Ok(TestStatistic {
            kind: TestKind::ChiSquared,
            statistic,
            degrees_of_freedom: Some(dof),
            p_value,
        })
    }

    /// Detailed Welch's t-test outcome.
    ///
    /// # Errors
    ///
    /// See [`t_test`](Self::t_test).
    #[allow(clippy::cast_precision_loss, clippy::unused_self)]
    pub fn welch_t(&self, a: &Segment, b: &Segment, kpi: &str) -> Result<TestStatistic> {
        let sa = SampleStats::from_segment(a, kpi)?;
        let sb = SampleStats::from_segment(b, kpi)?;

        let se_a = sa.squared_standard_error();
        let se_b = sb.squared_standard_error();
        let se = se_a + se_b;
        if se <= 0.0 || !se.is_finite() {
            return Err(Error::UndefinedStatistic(format!(
                "t-test on '{kpi}': both groups have zero variance"
            )));
        }

        let statistic = (sa.mean - sb.mean) / se.sqrt();

        // Welch–Satterthwaite
        let dof = se * se
            / (se_a * se_a / (sa.n as f64 - 1.0) + se_b * se_b / (sb.n as f64 - 1.0));

        let dist = StudentsT::new(0.0, 1.0, dof).map_err(|e| {
            Error::UndefinedStatistic(format!("Student's t distribution with dof {dof}: {e}"))
        })?;
        let p_value = (2.0 * dist.sf(statistic.abs())).clamp(0.0, 1.0);

        debug!(kpi, statistic, dof, p_value, "welch t-test");
        Ok(TestStatistic {
            kind: TestKind::TTest,
            statistic,
            degrees_of_freedom: Some(dof),
            p_value,
        })
    }

    /// Detailed z-test outcome.
    ///
    /// # Errors
    ///
    /// See [`z_test`](Self::z_test).
    pub fn z_score(&self, a: &Segment, b: &Segment, kpi: &str) -> Result<TestStatistic> {
        let sa = SampleStats::from_segment(a, kpi)?;
        let sb = SampleStats::from_segment(b, kpi)?;

        if sa.n < self.z_test_min_samples || sb.n < self.z_test_min_samples {
            warn!(
                kpi,
                n_a = sa.n,
                n_b = sb.n,
                threshold = self.z_test_min_samples,
                "z-test on small samples; normal approximation may not hold"
            );
        }

        if sa.variance <= 0.0 || sb.variance <= 0.0 {
            return Err(Error::UndefinedStatistic(format!(
                "z-test on '{kpi}': zero standard deviation (group A: {}, group B: {})",
                sa.std_dev(),
                sb.std_dev()
            )));
        }

        let denominator = (sa.squared_standard_error() + sb.squared_standard_error()).sqrt();
        let statistic = (sa.mean - sb.mean) / denominator;
        if !statistic.is_finite() {
            return Err(Error::UndefinedStatistic(format!(
                "z-test on '{kpi}': non-finite statistic"
            )));
        }

        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| Error::Other(format!("standard normal distribution: {e}")))?;
        let p_value = (2.0 * normal.sf(statistic.abs())).clamp(0.0, 1.0);

        debug!(kpi, statistic, p_value, "z-test");
        Ok(TestStatistic {
            kind: TestKind::ZTest,
            statistic,
            degrees_of_freedom: None,
            p_value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Condition, Dataset};
    use crate::segment::Segmenter;
    use arrow::array::{Float64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use std::sync::Arc;

    fn segments(groups: &[&str], claims: Vec<f64>, genders: &[&str]) -> (Segment, Segment) {
        let schema = Schema::new(vec![
            Field::new("Group", DataType::Utf8, false),
            Field::new("TotalClaims", DataType::Float64, false),
            Field::new("Gender", DataType::Utf8, false),
        ]);
        let batch = RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(StringArray::from(groups.to_vec())),
                Arc::new(Float64Array::from(claims)),
                Arc::new(StringArray::from(genders.to_vec())),
            ],
        )
        .unwrap();
        let ds = Dataset::new(batch).unwrap();
        Segmenter::new(&ds)
            .segment_by(
                "Group",
                &Condition::equals("Group", "A"),
                &Condition::equals("Group", "B"),
            )
            .unwrap()
    }

    #[test]
    fn test_welch_reference_value() {
        let (a, b) = segments(
            &["A", "A", "B", "B"],
            vec![2000.0, 2100.0, 1500.0, 1600.0],
            &["M", "F", "M", "F"],
        );
        let result = HypothesisEngine::new().welch_t(&a, &b, "TotalClaims").unwrap();

        // t = 500 / sqrt(2500 + 2500) = sqrt(50), dof = 2
        assert!((result.statistic - 50f64.sqrt()).abs() < 1e-9);
        assert!((result.degrees_of_freedom.unwrap() - 2.0).abs() < 1e-9);

        // Closed form for dof = 2: p = 1 - t / sqrt(t^2 + 2)
        let t = result.statistic;
        let expected = 1.0 - t / (t * t + 2.0).sqrt();
        assert!((result.p_value - expected).abs() < 1e-8);
    }

    #[test]
    fn test_zero_variance_t_test_undefined() {
        let (a, b) = segments(
            &["A", "A", "B", "B"],
            vec![1.0, 1.0, 2.0, 2.0],
            &["M", "F", "M", "F"],
        );
        let err = HypothesisEngine::new().t_test(&a, &b, "TotalClaims").unwrap_err();
        assert!(matches!(err, Error::UndefinedStatistic(_)));
    }

    #[test]
    fn test_z_test_zero_std_one_side() {
        let (a, b) = segments(
            &["A", "A", "B", "B"],
            vec![1.0, 1.0, 2.0, 3.0],
            &["M", "F", "M", "F"],
        );
        let err = HypothesisEngine::new().z_test(&a, &b, "TotalClaims").unwrap_err();
        assert!(err.to_string().contains("zero standard deviation"));
    }

    #[test]
    fn test_z_test_statistic_and_p_value() {
        let (a, b) = segments(
            &["A", "A", "B", "B"],
            vec![2000.0, 2100.0, 1500.0, 1600.0],
            &["M", "F", "M", "F"],
        );
        let engine = HypothesisEngine::new();
        let z = engine.z_test(&a, &b, "TotalClaims").unwrap();
        assert!((z - 50f64.sqrt()).abs() < 1e-9);

        let p = engine.z_test_p_value(&a, &b, "TotalClaims").unwrap();
        assert!(p > 0.0 && p < 1e-6);
    }

    #[test]
    fn test_chi_squared_identical_distributions() {
        let (a, b) = segments(
            &["A", "A", "A", "A", "B", "B", "B", "B"],
            vec![0.0; 8],
            &["M", "F", "M", "F", "F", "M", "F", "M"],
        );
        let p = HypothesisEngine::new().chi_squared_test(&a, &b, "Gender").unwrap();
        assert!((p - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_chi_squared_single_category_undefined() {
        let (a, b) = segments(&["A", "B"], vec![0.0, 0.0], &["M", "M"]);
        let err = HypothesisEngine::new().chi_squared_test(&a, &b, "Gender").unwrap_err();
        assert!(matches!(err, Error::UndefinedStatistic(_)));
    }

    #[test]
    fn test_run_dispatch() {
        let (a, b) = segments(
            &["A", "A", "B", "B"],
            vec![2000.0, 2100.0, 1500.0, 1600.0],
            &["M", "F", "M", "M"],
        );
        let engine = HypothesisEngine::new();
        assert_eq!(
            engine.run(TestKind::TTest, &a, &b, "TotalClaims").unwrap().kind,
            TestKind::TTest
        );
        assert_eq!(
            engine.run(TestKind::ChiSquared, &a, &b, "Gender").unwrap().kind,
            TestKind::ChiSquared
        );
        assert!(engine
            .run(TestKind::ZTest, &a, &b, "TotalClaims")
            .unwrap()
            .degrees_of_freedom
            .is_none());
    }

    #[test]
    fn test_recommend() {
        assert_eq!(
            TestKind::recommend(ColumnKind::Categorical, 5, 5, 30),
            Some(TestKind::ChiSquared)
        );
        assert_eq!(
            TestKind::recommend(ColumnKind::Numeric, 30, 40, 30),
            Some(TestKind::ZTest)
        );
        assert_eq!(
            TestKind::recommend(ColumnKind::Numeric, 29, 400, 30),
            Some(TestKind::TTest)
        );
        assert_eq!(TestKind::recommend(ColumnKind::Temporal, 100, 100, 30), None);
    }
}
