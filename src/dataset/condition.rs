//! Row predicates over a single column
//!
//! A `Condition` is evaluated once against a [`Dataset`](super::Dataset) to
//! materialize a boolean mask with one entry per row. Null cells never match
//! a leaf condition.

use serde::{Deserialize, Serialize};

/// Declarative row predicate.
///
/// ## Example
///
/// ```rust
/// use trueno_ab::dataset::Condition;
///
/// let gauteng = Condition::equals("Province", "Gauteng");
/// let others = Condition::not(gauteng.clone());
/// let mid_premium = Condition::between("TotalPremium", 1_000.0, 5_000.0);
/// let both = Condition::all(vec![others, mid_premium]);
/// assert_eq!(both.columns(), vec!["Province", "TotalPremium"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Condition {
    /// Cell text equals `value`
    Equals {
        /// Column to test
        column: String,
        /// Expected value, compared on the cell's textual form
        value: String,
    },
    /// Cell text is one of `values`
    OneOf {
        /// Column to test
        column: String,
        /// Accepted values
        values: Vec<String>,
    },
    /// Numeric cell lies in `[min, max]`
    Between {
        /// Column to test (must be numeric)
        column: String,
        /// Inclusive lower bound
        min: f64,
        /// Inclusive upper bound
        max: f64,
    },
    /// Inverts the inner mask
    Not {
        /// Condition to invert
        inner: Box<Condition>,
    },
    /// Every inner condition holds (empty list matches every row)
    All {
        /// Conditions to combine
        conditions: Vec<Condition>,
    },
}

impl Condition {
    /// `column == value`
    #[must_use]
    pub fn equals(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Equals {
            column: column.into(),
            value: value.into(),
        }
    }

    /// `column IN values`
    #[must_use]
    pub fn one_of<I, S>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::OneOf {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// `min <= column <= max`
    #[must_use]
    pub fn between(column: impl Into<String>, min: f64, max: f64) -> Self {
        Self::Between {
            column: column.into(),
            min,
            max,
        }
    }

    /// `NOT inner`
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: Self) -> Self {
        Self::Not {
            inner: Box::new(inner),
        }
    }

    /// `c1 AND c2 AND ...`
    #[must_use]
    pub const fn all(conditions: Vec<Self>) -> Self {
        Self::All { conditions }
    }

    /// Columns referenced by this condition, in first-use order.
    #[must_use]
    pub fn columns(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Equals { column, .. }
            | Self::OneOf { column, .. }
            | Self::Between { column, .. } => {
                if !out.contains(&column.as_str()) {
                    out.push(column);
                }
            }
            Self::Not { inner } => inner.collect_columns(out),
            Self::All { conditions } => {
                for c in conditions {
                    c.collect_columns(out);
                }
            }
        }
    }
}
