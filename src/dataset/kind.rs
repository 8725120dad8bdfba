//! Measurement scale of a column

use arrow::datatypes::DataType;
use serde::{Deserialize, Serialize};

/// Measurement scale inferred from an Arrow data type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Integers, floats and decimals
    Numeric,
    /// Strings, booleans and dictionary-encoded values
    Categorical,
    /// Dates, times, timestamps, durations and intervals
    Temporal,
    /// Nested or binary data
    Other,
}

impl ColumnKind {
    /// Classify an Arrow data type.
    #[must_use]
    pub fn of(data_type: &DataType) -> Self {
        match data_type {
            dt if dt.is_numeric() => Self::Numeric,
            dt if dt.is_temporal() => Self::Temporal,
            DataType::Utf8
            | DataType::LargeUtf8
            | DataType::Utf8View
            | DataType::Boolean
            | DataType::Dictionary(_, _) => Self::Categorical,
            _ => Self::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::TimeUnit;

    #[test]
    fn test_column_kind_of() {
        assert_eq!(ColumnKind::of(&DataType::Int32), ColumnKind::Numeric);
        assert_eq!(ColumnKind::of(&DataType::Float64), ColumnKind::Numeric);
        assert_eq!(ColumnKind::of(&DataType::Utf8), ColumnKind::Categorical);
        assert_eq!(ColumnKind::of(&DataType::Boolean), ColumnKind::Categorical);
        assert_eq!(
            ColumnKind::of(&DataType::Timestamp(TimeUnit::Millisecond, None)),
            ColumnKind::Temporal
        );
        assert_eq!(ColumnKind::of(&DataType::Date32), ColumnKind::Temporal);
        assert_eq!(ColumnKind::of(&DataType::Binary), ColumnKind::Other);
    }
}
