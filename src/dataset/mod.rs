//! In-memory dataset (Arrow)
//!
//! **Read-Only Design**:
//! - A `Dataset` wraps exactly one Arrow `RecordBatch`
//! - Nothing mutates it once analysis begins; derived columns produce a new
//!   `Dataset` sharing the existing buffers
//! - Segments are filtered copies, never views that write back
//!
//! Row predicates are expressed either as [`Condition`]s or as closures over
//! one column's values, and always materialize into a `BooleanArray` aligned
//! to the dataset's rows.

mod condition;
mod kind;
pub(crate) mod values;

pub use condition::Condition;
pub use kind::ColumnKind;

use crate::{Error, Result};
use arrow::array::{ArrayRef, BooleanArray, Float64Array};
use arrow::compute;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashSet;
use std::sync::Arc;
use tracing::debug;

/// Name of the derived margin KPI column
pub const MARGIN_COLUMN: &str = "Margin";
/// Premium column the margin is derived from
pub const PREMIUM_COLUMN: &str = "TotalPremium";
/// Claims column the margin is derived from
pub const CLAIMS_COLUMN: &str = "TotalClaims";

/// Immutable, column-typed table of insurance records
#[derive(Debug, Clone)]
pub struct Dataset {
    batch: RecordBatch,
}

impl Dataset {
    /// Wrap a record batch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if two columns share a name.
    pub fn new(batch: RecordBatch) -> Result<Self> {
        let schema = batch.schema();
        let mut seen = FxHashSet::default();
        for field in schema.fields() {
            if !seen.insert(field.name().as_str()) {
                return Err(Error::InvalidInput(format!(
                    "Duplicate column name: {}",
                    field.name()
                )));
            }
        }

        Ok(Self { batch })
    }

    /// Concatenate batches sharing one schema into a single dataset.
    ///
    /// # Errors
    ///
    /// Returns error if `batches` is empty, schemas differ, or a column name
    /// repeats.
    pub fn from_batches(batches: &[RecordBatch]) -> Result<Self> {
        let first = batches
            .first()
            .ok_or_else(|| Error::InvalidInput("No batches provided".to_string()))?;

        let schema = first.schema();
        for batch in &batches[1..] {
            if batch.schema() != schema {
                return Err(Error::StorageError(format!(
                    "Schema mismatch: expected {:?}, got {:?}",
                    schema,
                    batch.schema()
                )));
            }
        }

        if batches.len() == 1 {
            return Self::new(first.clone());
        }

        let combined = compute::concat_batches(&schema, batches)
            .map_err(|e| Error::StorageError(format!("Failed to combine batches: {e}")))?;
        Self::new(combined)
    }

    /// Underlying record batch.
    #[must_use]
    pub const fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Number of rows.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    /// Number of columns.
    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    /// Column names in schema order.
    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    /// Index of a column by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownColumn`] if the column is absent.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.batch
            .schema()
            .index_of(name)
            .map_err(|_| Error::unknown_column(name))
    }

    /// Column by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownColumn`] if the column is absent.
    pub fn column(&self, name: &str) -> Result<&ArrayRef> {
        let index = self.column_index(name)?;
        Ok(self.batch.column(index))
    }

    /// Data type of a column.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownColumn`] if the column is absent.
    pub fn data_type(&self, name: &str) -> Result<&DataType> {
        Ok(self.column(name)?.data_type())
    }

    /// Measurement scale of a column.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownColumn`] if the column is absent.
    pub fn column_kind(&self, name: &str) -> Result<ColumnKind> {
        Ok(ColumnKind::of(self.data_type(name)?))
    }

    /// Evaluate a condition into a row mask.
    ///
    /// # Errors
    ///
    /// Returns error if a referenced column is absent, or a `Between`
    /// condition targets a non-numeric column.
    pub fn mask(&self, condition: &Condition) -> Result<BooleanArray> {
        let mask = match condition {
            Condition::Equals { column, value } => {
                self.mask_where(column, |v| v == value.as_str())?
            }
            Condition::OneOf { column, values } => {
                let accepted: FxHashSet<&str> = values.iter().map(String::as_str).collect();
                self.mask_where(column, |v| accepted.contains(v))?
            }
            Condition::Between { column, min, max } => {
                self.mask_numeric(column, |v| v >= *min && v <= *max)?
            }
            Condition::Not { inner } => compute::not(&self.mask(inner)?)?,
            Condition::All { conditions } => {
                let mut acc = BooleanArray::from(vec![true; self.num_rows()]);
                for c in conditions {
                    acc = compute::and(&acc, &self.mask(c)?)?;
                }
                acc
            }
        };

        debug!(
            matched = mask.true_count(),
            rows = self.num_rows(),
            "evaluated condition"
        );
        Ok(mask)
    }

    /// Build a row mask from a predicate over a column's textual values.
    ///
    /// Null cells produce `false` without calling `predicate`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownColumn`] if the column is absent.
    pub fn mask_where<F>(&self, column: &str, predicate: F) -> Result<BooleanArray>
    where
        F: Fn(&str) -> bool,
    {
        let array = self.column(column)?;
        let cells = values::text_values(array.as_ref())?;
        Ok(cells
            .iter()
            .map(|cell| Some(cell.as_deref().is_some_and(&predicate)))
            .collect())
    }

    /// Build a row mask from a predicate over a numeric column.
    ///
    /// Null cells produce `false` without calling `predicate`.
    ///
    /// # Errors
    ///
    /// Returns error if the column is absent or not numeric.
    pub fn mask_numeric<F>(&self, column: &str, predicate: F) -> Result<BooleanArray>
    where
        F: Fn(f64) -> bool,
    {
        let array = self.column(column)?;
        let cells = values::numeric_values(column, array)?;
        Ok(cells
            .iter()
            .map(|cell| Some(cell.is_some_and(&predicate)))
            .collect())
    }

    /// Return a new dataset with a `Margin = TotalPremium - TotalClaims`
    /// column appended. Nulls in either source column propagate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownColumn`] if a source column is missing, or
    /// [`Error::InvalidInput`] if `Margin` already exists or a source column
    /// is not numeric.
    pub fn with_margin(&self) -> Result<Self> {
        if self.column_index(MARGIN_COLUMN).is_ok() {
            return Err(Error::InvalidInput(format!(
                "Column '{MARGIN_COLUMN}' already exists"
            )));
        }

        let premium = values::numeric_values(PREMIUM_COLUMN, self.column(PREMIUM_COLUMN)?)?;
        let claims = values::numeric_values(CLAIMS_COLUMN, self.column(CLAIMS_COLUMN)?)?;

        let margin: Float64Array = premium
            .iter()
            .zip(&claims)
            .map(|(p, c)| Some((*p)? - (*c)?))
            .collect();

        let schema = self.batch.schema();
        let mut fields: Vec<Field> = schema.fields().iter().map(|f| f.as_ref().clone()).collect();
        fields.push(Field::new(MARGIN_COLUMN, DataType::Float64, true));

        let mut columns = self.batch.columns().to_vec();
        columns.push(Arc::new(margin));

        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?;
        Self::new(batch)
    }
}
