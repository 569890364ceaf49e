//! Test Module
//!
//! Component and integration tests for FeelScope core.
//!
//! ## Test Categories
//! - `remote_tests`: JSON extraction, normalization and persistence of remote replies
//! - `router_tests`: Mode dispatch, state updates, chart and history handling
//! - `batch_tests`: Ordering and failure isolation of social batches
//! - `backend_tests`: HTTP backend wire behaviour
//! - `integration_tests`: Full flows over mock HTTP servers


pub mod router_tests;
