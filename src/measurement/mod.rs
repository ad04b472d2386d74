//! Measurement computation and reporting module
//!
//! This module converts contours into physical sizes and shapes the
//! results for callers such as upload handlers and the command line.

pub mod compute;
pub mod report;

pub use compute::{compute_measurements, object_id, MeasuredObject, Measurement, MeasurementSet};
pub use report::{ErrorSummary, MeasurementSummary};
