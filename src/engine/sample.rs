//! Per-group sample moments

use crate::dataset::values;
use crate::segment::Segment;
use crate::{Error, Result};

/// Count, mean and unbiased variance of a KPI within one segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleStats {
    /// Number of finite observations
    pub n: usize,
    /// Sample mean
    pub mean: f64,
    /// Sample variance (n - 1 denominator)
    pub variance: f64,
}

impl SampleStats {
    /// Compute moments of `kpi` over a segment's finite, non-null values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UndefinedStatistic`] if fewer than 2 finite values
    /// remain, or an error if the column is absent or not numeric.
    pub fn from_segment(segment: &Segment, kpi: &str) -> Result<Self> {
        let values = values::finite_values(kpi, segment.column(kpi)?)?;
        Self::from_values(kpi, &values)
    }

    /// Compute moments of a slice of finite values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UndefinedStatistic`] if `values` has fewer than 2
    /// entries.
    #[allow(clippy::cast_precision_loss)]
    pub fn from_values(kpi: &str, values: &[f64]) -> Result<Self> {
        let n = values.len();
        if n < 2 {
            return Err(Error::UndefinedStatistic(format!(
                "'{kpi}' needs at least 2 finite observations per group, got {n}"
            )));
        }

        let count = n as f64;
        let mean = values.iter().sum::<f64>() / count;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1.0);

        Ok(Self { n, mean, variance })
    }

    /// Sample standard deviation.
    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }

    /// Squared standard error of the mean (`variance / n`).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn squared_standard_error(&self) -> f64 {
        self.variance / self.n as f64
    }
}
