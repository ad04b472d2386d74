//! Segmentation and contour detection module
//!
//! This module turns a loaded image into an ordered set of object
//! boundaries: grayscale reduction, binary segmentation, border following
//! and minimum-area filtering.

pub mod contours;
pub mod filter;
pub mod segmentation;

pub use contours::{
    extract_contours, BorderKind, BoundingBox, Contour, ContourSet, ExtractionOptions, Point,
    PointEncoding, RetrievalMode,
};
pub use filter::filter_by_area;
pub use segmentation::{to_grayscale, BinaryMask, Segmenter};
