//! # Trueno-AB: Segment-Level A/B Hypothesis Testing
//!
//! **Version**: 0.1.0
//!
//! Trueno-AB evaluates hypotheses about insurance risk and margin over an
//! in-memory Arrow dataset: segment the policies into two groups on a
//! feature, compare a KPI between them with a statistical test, decide
//! against a significance threshold, and record the outcome in an ordered
//! store that renders a deterministic report.
//!
//! ## Pipeline
//!
//! ```text
//! Dataset ──> Segmenter ──> (Segment A, Segment B)
//!                                  │
//!                                  v
//!                          HypothesisEngine ──> p-value ──> analyze_results
//!                                                                │
//!                                                                v
//!                          ReportGenerator <── ResultStore <── Decision
//! ```
//!
//! ## Example Usage
//!
//! ```rust
//! use arrow::array::{Float64Array, StringArray};
//! use arrow::datatypes::{DataType, Field, Schema};
//! use arrow::record_batch::RecordBatch;
//! use std::sync::Arc;
//! use trueno_ab::dataset::{Condition, Dataset};
//! use trueno_ab::decision::{analyze_results, DEFAULT_ALPHA};
//! use trueno_ab::engine::HypothesisEngine;
//! use trueno_ab::report::generate_report;
//! use trueno_ab::results::ResultStore;
//! use trueno_ab::segment::Segmenter;
//!
//! let schema = Schema::new(vec![
//!     Field::new("Province", DataType::Utf8, false),
//!     Field::new("TotalClaims", DataType::Float64, false),
//! ]);
//! let batch = RecordBatch::try_new(
//!     Arc::new(schema),
//!     vec![
//!         Arc::new(StringArray::from(vec!["Gauteng", "Western Cape", "Gauteng", "Western Cape"])),
//!         Arc::new(Float64Array::from(vec![2000.0, 1500.0, 2100.0, 1600.0])),
//!     ],
//! )?;
//! let dataset = Dataset::new(batch)?;
//!
//! let (a, b) = Segmenter::new(&dataset).segment_by(
//!     "Province",
//!     &Condition::equals("Province", "Gauteng"),
//!     &Condition::equals("Province", "Western Cape"),
//! )?;
//! let p_value = HypothesisEngine::new().t_test(&a, &b, "TotalClaims")?;
//!
//! let mut store = ResultStore::new();
//! store.add_result(
//!     "No risk difference across provinces",
//!     p_value,
//!     analyze_results(p_value, DEFAULT_ALPHA),
//! );
//! assert!(generate_report(&store).contains("Result: reject"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod config;
pub mod dataset;
pub mod decision;
pub mod engine;
pub mod error;
pub mod profile;
pub mod report;
pub mod results;
pub mod segment;
pub mod suite;

pub use error::{Error, Result};
