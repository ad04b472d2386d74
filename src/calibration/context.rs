//! Resolved pixel-to-physical conversion
//!
//! A [`CalibrationContext`] is the single scalar every measurement of an
//! invocation is converted with. Linear extents scale by the factor, areas
//! by its square.

use serde::{Deserialize, Serialize};

use crate::error::{MeasureError, Result};

/// Pixel-to-physical-unit conversion for one invocation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CalibrationContext {
    /// Caller-supplied physical units per pixel
    Fixed { scale_factor: f64 },

    /// Derived from a reference contour of known physical width
    Reference {
        pixels_per_unit: f64,
        reference_index: usize,
    },
}

impl CalibrationContext {
    /// Fixed scale, rejecting non-positive or non-finite factors
    pub fn fixed(scale_factor: f64) -> Result<Self> {
        ensure_positive("scale_factor", scale_factor)?;
        Ok(Self::Fixed { scale_factor })
    }

    /// Reference calibration, rejecting non-positive or non-finite ratios
    pub fn reference(pixels_per_unit: f64, reference_index: usize) -> Result<Self> {
        ensure_positive("pixels_per_unit", pixels_per_unit)?;
        Ok(Self::Reference {
            pixels_per_unit,
            reference_index,
        })
    }

    /// Identity scale: measurements stay in pixels
    pub fn pixels() -> Self {
        Self::Fixed { scale_factor: 1.0 }
    }

    /// Convert a pixel length to physical units
    pub fn to_units(&self, pixels: f64) -> f64 {
        match *self {
            Self::Fixed { scale_factor } => pixels * scale_factor,
            Self::Reference {
                pixels_per_unit, ..
            } => pixels / pixels_per_unit,
        }
    }

    /// Convert a pixel area to square physical units
    pub fn to_square_units(&self, pixel_area: f64) -> f64 {
        match *self {
            Self::Fixed { scale_factor } => pixel_area * scale_factor.powi(2),
            Self::Reference {
                pixels_per_unit, ..
            } => pixel_area / pixels_per_unit.powi(2),
        }
    }

    /// Position of the reference contour, if any
    pub fn reference_index(&self) -> Option<usize> {
        match *self {
            Self::Fixed { .. } => None,
            Self::Reference {
                reference_index, ..
            } => Some(reference_index),
        }
    }
}

pub(crate) fn ensure_positive(parameter: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(MeasureError::invalid_parameter(parameter, value));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_conversion() {
        let ctx = CalibrationContext::fixed(0.1).unwrap();
        assert!((ctx.to_units(50.0) - 5.0).abs() < 1e-12);
        assert!((ctx.to_square_units(10_000.0) - 100.0).abs() < 1e-9);
        assert_eq!(ctx.reference_index(), None);
    }

    #[test]
    fn test_reference_conversion() {
        let ctx = CalibrationContext::reference(20.0, 2).unwrap();
        assert!((ctx.to_units(50.0) - 2.5).abs() < 1e-12);
        assert!((ctx.to_square_units(800.0) - 2.0).abs() < 1e-12);
        assert_eq!(ctx.reference_index(), Some(2));
    }

    #[test]
    fn test_pixels_is_identity() {
        let ctx = CalibrationContext::pixels();
        assert_eq!(ctx.to_units(17.0), 17.0);
        assert_eq!(ctx.to_square_units(314.5), 314.5);
    }

    #[test]
    fn test_rejects_invalid_scalars() {
        for bad in [0.0, -0.5, f64::NAN, f64::INFINITY] {
            assert!(CalibrationContext::fixed(bad).is_err());
            assert!(CalibrationContext::reference(bad, 0).is_err());
        }
    }
}
