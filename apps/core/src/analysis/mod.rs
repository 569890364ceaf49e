//! # Analysis Module
//!
//! Pure, I/O-free pieces of the pipeline.
//!
//! ## Components
//! - `extract`: pulls the JSON object out of free model output
//! - `normalizer`: coerces raw replies into `CanonicalResult`
//! - `stats`: sentiment buckets and chart data

pub mod extract;
pub mod normalizer;
pub mod stats;

pub use extract::extract_json_object;
pub use normalizer::{error_marker, normalize, normalize_value};
pub use stats::{aggregate, chart_from_results};
