//! Multi-query aggregation: run every query, merge, dedup by URL.
//!
//! Any query failure aborts the batch. Nothing gathered before the failure
//! is returned.

pub mod dedup;
pub mod gather;
