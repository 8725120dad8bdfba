//! Two-group contingency tables

use crate::dataset::values;
use crate::segment::Segment;
use crate::{Error, Result};
use rustc_hash::FxHashMap;

/// 2 × k table of category counts: row 0 is group A, row 1 is group B,
/// columns are the category levels observed in either group (sorted).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContingencyTable {
    levels: Vec<String>,
    counts: [Vec<u64>; 2],
}

impl ContingencyTable {
    /// Cross the two segments against the category levels of `feature`.
    /// Null cells are not counted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UndefinedStatistic`] if either group has no non-null
    /// values, or fewer than two levels are observed overall.
    pub fn from_segments(a: &Segment, b: &Segment, feature: &str) -> Result<Self> {
        let mut tally: FxHashMap<String, [u64; 2]> = FxHashMap::default();

        for (row, segment) in [a, b].into_iter().enumerate() {
            let cells = values::text_values(segment.column(feature)?.as_ref())?;
            let mut observed = 0usize;
            for cell in cells.into_iter().flatten() {
                tally.entry(cell).or_default()[row] += 1;
                observed += 1;
            }
            if observed == 0 {
                return Err(Error::UndefinedStatistic(format!(
                    "'{feature}' has no non-null values in group {}",
                    if row == 0 { "A" } else { "B" }
                )));
            }
        }

        if tally.len() < 2 {
            return Err(Error::UndefinedStatistic(format!(
                "'{feature}' has a single category across both groups; \
                 chi-squared needs at least 2"
            )));
        }

        let mut entries: Vec<(String, [u64; 2])> = tally.into_iter().collect();
        entries.sort_by(|x, y| x.0.cmp(&y.0));

        let mut levels = Vec::with_capacity(entries.len());
        let mut counts = [Vec::with_capacity(entries.len()), Vec::with_capacity(entries.len())];
        for (level, [in_a, in_b]) in entries {
            levels.push(level);
            counts[0].push(in_a);
            counts[1].push(in_b);
        }

        Ok(Self { levels, counts })
    }

    /// Category levels (column labels), sorted.
    #[must_use]
    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    /// Counts for group A (`row == 0`) or group B (`row == 1`), or `None`
    /// for any other row.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[u64]> {
        self.counts.get(row).map(Vec::as_slice)
    }

    /// Degrees of freedom: `(rows - 1) * (cols - 1)`.
    #[must_use]
    pub fn degrees_of_freedom(&self) -> usize {
        self.levels.len() - 1
    }

    /// Pearson's chi-squared statistic.
    ///
    /// With `yates` set and one degree of freedom, each observed count is
    /// moved up to 0.5 towards its expected count before squaring.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn chi_squared_statistic(&self, yates: bool) -> f64 {
        let row_totals: [f64; 2] = [
            self.counts[0].iter().sum::<u64>() as f64,
            self.counts[1].iter().sum::<u64>() as f64,
        ];
        let total = row_totals[0] + row_totals[1];
        let correct = yates && self.degrees_of_freedom() == 1;

        let mut statistic = 0.0;
        for col in 0..self.levels.len() {
            let col_total = (self.counts[0][col] + self.counts[1][col]) as f64;
            for (row, row_total) in row_totals.iter().enumerate() {
                let expected = row_total * col_total / total;
                let mut deviation = (self.counts[row][col] as f64 - expected).abs();
                if correct {
                    deviation -= deviation.min(0.5);
                }
                statistic += deviation * deviation / expected;
            }
        }
        statistic
    }
}
