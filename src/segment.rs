//! Two-group segmentation
//!
//! The segmenter splits a [`Dataset`] into group A and group B using two
//! caller-supplied row masks. The masks are not required to be complements;
//! overlap is allowed and left to the caller.

use crate::dataset::{Condition, Dataset};
use crate::{Error, Result};
use arrow::array::{ArrayRef, BooleanArray};
use arrow::compute;
use arrow::record_batch::RecordBatch;
use tracing::debug;

/// One comparison group: the dataset rows selected by a mask.
#[derive(Debug, Clone)]
pub struct Segment {
    feature: String,
    batch: RecordBatch,
}

impl Segment {
    /// Feature the segmentation was performed on.
    #[must_use]
    pub fn feature(&self) -> &str {
        &self.feature
    }

    /// Number of rows in the segment.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    /// Whether the segment has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.batch.num_rows() == 0
    }

    /// Rows of the segment.
    #[must_use]
    pub const fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Column of the segment by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownColumn`] if the column is absent.
    pub fn column(&self, name: &str) -> Result<&ArrayRef> {
        let index = self
            .batch
            .schema()
            .index_of(name)
            .map_err(|_| Error::unknown_column(name))?;
        Ok(self.batch.column(index))
    }
}

/// Splits a dataset into two comparison groups
#[derive(Debug, Clone, Copy)]
pub struct Segmenter<'a> {
    dataset: &'a Dataset,
}

impl<'a> Segmenter<'a> {
    /// Create a segmenter over a dataset.
    #[must_use]
    pub const fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    /// Dataset being segmented.
    #[must_use]
    pub const fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Select the KPI column under test (e.g. `TotalClaims`, `TotalPremium`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownColumn`] naming `kpi` if it is absent.
    pub fn select_kpi(&self, kpi: &str) -> Result<ArrayRef> {
        self.dataset.column(kpi).cloned()
    }

    /// Split the dataset into group A and group B.
    ///
    /// # Arguments
    /// * `feature` - Column the groups are defined on (e.g. `Province`)
    /// * `group_a` - Row mask for group A
    /// * `group_b` - Row mask for group B
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if a mask is not aligned to the
    /// dataset rows, or [`Error::EmptySegment`] if either group is empty.
    pub fn segment(
        &self,
        feature: &str,
        group_a: &BooleanArray,
        group_b: &BooleanArray,
    ) -> Result<(Segment, Segment)> {
        let rows = self.dataset.num_rows();
        for (label, mask) in [("A", group_a), ("B", group_b)] {
            if mask.len() != rows {
                return Err(Error::InvalidInput(format!(
                    "Group {label} mask has {} entries, dataset has {rows} rows",
                    mask.len()
                )));
            }
        }

        let a = compute::filter_record_batch(self.dataset.batch(), group_a)?;
        let b = compute::filter_record_batch(self.dataset.batch(), group_b)?;

        if a.num_rows() == 0 || b.num_rows() == 0 {
            return Err(Error::EmptySegment {
                feature: feature.to_string(),
            });
        }

        debug!(
            feature,
            group_a = a.num_rows(),
            group_b = b.num_rows(),
            "segmented dataset"
        );

        Ok((
            Segment {
                feature: feature.to_string(),
                batch: a,
            },
            Segment {
                feature: feature.to_string(),
                batch: b,
            },
        ))
    }

    /// Evaluate two conditions and split the dataset on them.
    ///
    /// # Errors
    ///
    /// Returns error if a condition cannot be evaluated, or see
    /// [`segment`](Self::segment).
    pub fn segment_by(
        &self,
        feature: &str,
        group_a: &Condition,
        group_b: &Condition,
    ) -> Result<(Segment, Segment)> {
        let mask_a = self.dataset.mask(group_a)?;
        let mask_b = self.dataset.mask(group_b)?;
        self.segment(feature, &mask_a, &mask_b)
    }

    /// All columns available for testing, in dataset order.
    #[must_use]
    pub fn get_testable_features(&self) -> Vec<String> {
        self.dataset.column_names()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use std::sync::Arc;

    fn create_test_dataset() -> Dataset {
        let schema = Schema::new(vec![
            Field::new("Province", DataType::Utf8, false),
            Field::new("TotalClaims", DataType::Int64, false),
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
                Arc::new(Int64Array::from(vec![2000, 1500, 2100, 1600])),
            ],
        )
        .unwrap();
        Dataset::new(batch).unwrap()
    }

    #[test]
    fn test_select_kpi() {
        let ds = create_test_dataset();
        let segmenter = Segmenter::new(&ds);

        let kpi = segmenter.select_kpi("TotalClaims").unwrap();
        assert_eq!(kpi.len(), 4);

        let err = segmenter.select_kpi("InvalidKPI").unwrap_err();
        assert!(err.to_string().contains("InvalidKPI"));
    }

    #[test]
    fn test_segment_by_province() {
        let ds = create_test_dataset();
        let segmenter = Segmenter::new(&ds);

        let (a, b) = segmenter
            .segment_by(
                "Province",
                &Condition::equals("Province", "Gauteng"),
                &Condition::equals("Province", "Western Cape"),
            )
            .unwrap();

        assert_eq!(a.num_rows(), 2);
        assert_eq!(b.num_rows(), 2);
        assert_eq!(a.feature(), "Province");
        assert!(a.column("TotalClaims").is_ok());
    }

    #[test]
    fn test_segment_empty_group() {
        let ds = create_test_dataset();
        let segmenter = Segmenter::new(&ds);

        let err = segmenter
            .segment_by(
                "Province",
                &Condition::equals("Province", "Invalid"),
                &Condition::equals("Province", "Western Cape"),
            )
            .unwrap_err();

        assert!(matches!(err, Error::EmptySegment { ref feature } if feature == "Province"));
    }

    #[test]
    fn test_segment_misaligned_mask() {
        let ds = create_test_dataset();
        let segmenter = Segmenter::new(&ds);

        let short = BooleanArray::from(vec![true, false]);
        let full = BooleanArray::from(vec![true, true, true, true]);
        let err = segmenter.segment("Province", &short, &full).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_overlapping_masks_allowed() {
        let ds = create_test_dataset();
        let segmenter = Segmenter::new(&ds);

        let all = BooleanArray::from(vec![true; 4]);
        let (a, b) = segmenter.segment("Province", &all, &all).unwrap();
        assert_eq!(a.num_rows() + b.num_rows(), 8);
    }

    #[test]
    fn test_get_testable_features_order() {
        let ds = create_test_dataset();
        let segmenter = Segmenter::new(&ds);
        assert_eq!(
            segmenter.get_testable_features(),
            vec!["Province", "TotalClaims"]
        );
    }
}
