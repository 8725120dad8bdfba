//! Hypothesis results
//!
//! ## Schema Overview
//!
//! ```text
//! ResultStore (1) ──< HypothesisRecord (N) [insertion-ordered]
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use trueno_ab::decision::{analyze_results, DEFAULT_ALPHA};
//! use trueno_ab::results::ResultStore;
//!
//! let mut store = ResultStore::new();
//!
//! let p_value = 0.003;
//! let decision = analyze_results(p_value, DEFAULT_ALPHA);
//! store.add_result("No risk difference across provinces", p_value, decision);
//!
//! assert_eq!(store.len(), 1);
//! ```

mod record;
mod store;

pub use record::{HypothesisRecord, HypothesisRecordBuilder};
pub use store::ResultStore;
