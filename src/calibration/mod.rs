//! Pixel-to-physical calibration module
//!
//! This module establishes the conversion factor between pixel space and
//! physical units, either from a caller-supplied scale factor or from an
//! in-frame reference object of known width.

pub mod context;
pub mod resolver;

pub use context::CalibrationContext;
pub use resolver::CalibrationPolicy;
