//! Exploratory profiling
//!
//! Descriptive views of a dataset that usually precede hypothesis testing:
//! column kinds, missing-value counts, `describe`-style summaries, and a
//! pairwise-complete Pearson correlation matrix of the numeric columns.
//!
//! Statistics here are descriptive only. Undefined values are reported as
//! NaN rather than raised.

use crate::dataset::{values, ColumnKind, Dataset};
use crate::Result;
use arrow::array::Array;
use serde::{Deserialize, Serialize};

/// Column names paired with their measurement scale, in dataset order.
#[must_use]
pub fn column_kinds(dataset: &Dataset) -> Vec<(String, ColumnKind)> {
    dataset
        .batch()
        .schema()
        .fields()
        .iter()
        .map(|f| (f.name().clone(), ColumnKind::of(f.data_type())))
        .collect()
}

/// Null count per column, in dataset order.
#[must_use]
pub fn missing_values(dataset: &Dataset) -> Vec<(String, usize)> {
    dataset
        .column_names()
        .into_iter()
        .zip(dataset.batch().columns())
        .map(|(name, column)| (name, column.null_count()))
        .collect()
}

/// Summary statistics for one numeric column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    /// Column name
    pub column: String,
    /// Number of finite, non-null values
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Sample standard deviation (n - 1)
    pub std: f64,
    /// Minimum
    pub min: f64,
    /// 25th percentile
    pub q25: f64,
    /// Median
    pub median: f64,
    /// 75th percentile
    pub q75: f64,
    /// Maximum
    pub max: f64,
}

impl ColumnSummary {
    #[allow(clippy::cast_precision_loss)]
    fn from_values(column: &str, mut values: Vec<f64>) -> Self {
        values.sort_by(f64::total_cmp);
        let n = values.len();

        let mean = if n == 0 {
            f64::NAN
        } else {
            values.iter().sum::<f64>() / n as f64
        };
        let std = if n < 2 {
            f64::NAN
        } else {
            (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n as f64 - 1.0)).sqrt()
        };

        Self {
            column: column.to_string(),
            count: n,
            mean,
            std,
            min: values.first().copied().unwrap_or(f64::NAN),
            q25: quantile(&values, 0.25),
            median: quantile(&values, 0.5),
            q75: quantile(&values, 0.75),
            max: values.last().copied().unwrap_or(f64::NAN),
        }
    }
}

/// Linear-interpolation quantile of sorted values.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Summaries of every numeric column, in dataset order.
///
/// # Errors
///
/// Returns error if a numeric column cannot be cast to `f64`.
pub fn describe(dataset: &Dataset) -> Result<Vec<ColumnSummary>> {
    numeric_columns(dataset)
        .into_iter()
        .map(|name| -> Result<ColumnSummary> {
            let values = values::finite_values(&name, dataset.column(&name)?)?;
            Ok(ColumnSummary::from_values(&name, values))
        })
        .collect()
}

/// Pearson correlations between numeric columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    columns: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Column labels (rows and columns share them).
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Correlation between two columns, or `None` if either is not in the
    /// matrix.
    #[must_use]
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }

    /// Row-major matrix values.
    #[must_use]
    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }
}

/// Pairwise-complete Pearson correlation matrix of the numeric columns.
///
/// Each pair uses only the rows where both values are finite. Pairs with
/// fewer than two such rows, or zero variance, are NaN.
///
/// # Errors
///
/// Returns error if a numeric column cannot be cast to `f64`.
pub fn correlation_matrix(dataset: &Dataset) -> Result<CorrelationMatrix> {
    let columns = numeric_columns(dataset);
    let data = columns
        .iter()
        .map(|name| -> Result<Vec<Option<f64>>> {
            values::numeric_values(name, dataset.column(name)?)
        })
        .collect::<Result<Vec<_>>>()?;

    let k = columns.len();
    let mut matrix = vec![vec![f64::NAN; k]; k];
    for i in 0..k {
        for j in i..k {
            let r = pearson(&data[i], &data[j]);
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        columns,
        values: matrix,
    })
}

#[allow(clippy::cast_precision_loss)]
fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| match (a, b) {
            (Some(a), Some(b)) if a.is_finite() && b.is_finite() => Some((*a, *b)),
            _ => None,
        })
        .collect();

    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx <= 0.0 || syy <= 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

fn numeric_columns(dataset: &Dataset) -> Vec<String> {
    column_kinds(dataset)
        .into_iter()
        .filter(|(_, kind)| *kind == ColumnKind::Numeric)
        .map(|(name, _)| name)
        .collect()
}
