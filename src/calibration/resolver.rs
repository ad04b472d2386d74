//! Calibration resolution
//!
//! Turns a [`CalibrationPolicy`] and the extracted contours into a
//! [`CalibrationContext`].
//!
//! Reference calibration only uses the axis-aligned width of the reference
//! contour's bounding box. The reference must lie parallel to the image
//! plane and be unrotated; a tilted reference inflates its width and
//! shrinks every other measurement accordingly.

use serde::{Deserialize, Serialize};

use super::context::{ensure_positive, CalibrationContext};
use crate::detection::ContourSet;
use crate::error::{MeasureError, Result};

/// How an invocation establishes its pixel-to-unit conversion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum CalibrationPolicy {
    /// Constant physical units per pixel
    FixedScale { scale_factor: f64 },

    /// Physical width of the contour at `reference_index`
    ReferenceObject {
        reference_width: f64,
        reference_index: usize,
    },
}

impl CalibrationPolicy {
    /// Check policy parameters before any image work
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::FixedScale { scale_factor } => ensure_positive("scale_factor", scale_factor),
            Self::ReferenceObject {
                reference_width, ..
            } => ensure_positive("reference_width", reference_width),
        }
    }

    /// Resolve the conversion against the extracted contours
    ///
    /// Parameters are expected to have passed [`validate`](Self::validate);
    /// the resulting context still refuses a non-positive or non-finite
    /// scale.
    ///
    /// # Errors
    ///
    /// - `ReferenceNotFoundError` when `reference_index` is past the end of
    ///   `contours`
    /// - `InvalidParameter` when the resolved scale is not positive and finite
    pub fn resolve(&self, contours: &ContourSet) -> Result<CalibrationContext> {
        let context = match *self {
            Self::FixedScale { scale_factor } => CalibrationContext::fixed(scale_factor)?,
            Self::ReferenceObject {
                reference_width,
                reference_index,
            } => {
                let reference = contours.get(reference_index).ok_or(
                    MeasureError::ReferenceNotFoundError {
                        index: reference_index,
                        count: contours.len(),
                    },
                )?;

                let width_px = reference.bounding_box().width as f64;
                CalibrationContext::reference(width_px / reference_width, reference_index)?
            }
        };

        log::debug!("calibration resolved: {:?}", context);
        Ok(context)
    }
}
