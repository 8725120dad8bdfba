//! Typed value extraction from Arrow columns

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float64Type};
use arrow::util::display::{ArrayFormatter, FormatOptions};

use crate::{Error, Result};

/// Read a numeric column as `f64`, keeping nulls as `None`.
///
/// Integer, unsigned, float and decimal columns are cast through Arrow's
/// cast kernel. Anything else is rejected.
pub(crate) fn numeric_values(column: &str, array: &ArrayRef) -> Result<Vec<Option<f64>>> {
    if !array.data_type().is_numeric() {
        return Err(Error::InvalidInput(format!(
            "Column '{column}' is not numeric (found {:?})",
            array.data_type()
        )));
    }

    let cast = arrow::compute::cast(array, &DataType::Float64)?;
    Ok(cast.as_primitive::<Float64Type>().iter().collect())
}

/// Read the finite, non-null values of a numeric column.
pub(crate) fn finite_values(column: &str, array: &ArrayRef) -> Result<Vec<f64>> {
    Ok(numeric_values(column, array)?
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .collect())
}

/// Render every cell of a column as text, keeping nulls as `None`.
///
/// Categorical comparisons operate on this representation so that string,
/// integer and boolean codes (e.g. zip codes) compare uniformly.
pub(crate) fn text_values(array: &dyn Array) -> Result<Vec<Option<String>>> {
    let options = FormatOptions::default();
    let formatter = ArrayFormatter::try_new(array, &options)?;

    Ok((0..array.len())
        .map(|i| {
            if array.is_null(i) {
                None
            } else {
                Some(formatter.value(i).to_string())
            }
        })
        .collect())
}
