//! Foreground / background segmentation
//!
//! Implements the three interchangeable segmentation strategies:
//! - Fixed binary threshold (bright objects on a dark background)
//! - Otsu automatic threshold, inverted (dark objects on a light background)
//! - Canny edge detection (objects distinguished by outline rather than fill)
//!
//! Every strategy maps a grayscale image to a [`BinaryMask`] holding only
//! `0` (background) and `255` (foreground).

use image::{DynamicImage, GrayImage};
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::morphology::dilate;
use serde::{Deserialize, Serialize};

use crate::constants::segmentation::{
    CANNY_HIGH_THRESHOLD, CANNY_LOW_THRESHOLD, EDGE_DILATION, FIXED_THRESHOLD,
};
use crate::error::{MeasureError, Result};

/// Mask value for foreground pixels
pub const FOREGROUND: u8 = 255;

/// Mask value for background pixels
pub const BACKGROUND: u8 = 0;

/// Collapse an image of any colour type to 8-bit luminance
pub fn to_grayscale(image: &DynamicImage) -> GrayImage {
    image.to_luma8()
}

/// Two-valued image separating foreground from background
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryMask(GrayImage);

impl BinaryMask {
    /// Binarise an image: every non-zero pixel becomes foreground
    pub fn from_nonzero(image: &GrayImage) -> Self {
        Self(threshold(image, BACKGROUND, ThresholdType::Binary))
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    /// Whether the pixel at `(x, y)` is foreground; out-of-bounds is background
    pub fn is_foreground(&self, x: u32, y: u32) -> bool {
        x < self.width() && y < self.height() && self.0.get_pixel(x, y).0[0] == FOREGROUND
    }

    /// Number of foreground pixels
    pub fn foreground_count(&self) -> usize {
        self.0.pixels().filter(|px| px.0[0] == FOREGROUND).count()
    }

    pub fn as_image(&self) -> &GrayImage {
        &self.0
    }

    pub fn into_image(self) -> GrayImage {
        self.0
    }
}

/// Segmentation strategy
///
/// Strategy choice is made by the caller; each measurement mode binds one
/// strategy through its configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Segmenter {
    /// Pixels strictly above `threshold` become foreground
    FixedThreshold { threshold: u8 },

    /// Otsu threshold, inverted: pixels at or below the level become foreground
    AutoThreshold,

    /// Canny edge map, optionally dilated to close small gaps
    EdgeDetector {
        low_threshold: f32,
        high_threshold: f32,
        #[serde(default)]
        dilation: u8,
    },
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::fixed()
    }
}

impl Segmenter {
    /// Fixed threshold at the default level
    pub fn fixed() -> Self {
        Self::FixedThreshold {
            threshold: FIXED_THRESHOLD,
        }
    }

    /// Otsu automatic threshold
    pub fn otsu() -> Self {
        Self::AutoThreshold
    }

    /// Canny edge detector with default hysteresis thresholds
    pub fn edges() -> Self {
        Self::EdgeDetector {
            low_threshold: CANNY_LOW_THRESHOLD,
            high_threshold: CANNY_HIGH_THRESHOLD,
            dilation: EDGE_DILATION,
        }
    }

    /// Check strategy parameters before any image work
    pub fn validate(&self) -> Result<()> {
        if let Segmenter::EdgeDetector {
            low_threshold,
            high_threshold,
            ..
        } = *self
        {
            if !low_threshold.is_finite() || low_threshold < 0.0 {
                return Err(MeasureError::invalid_parameter(
                    "low_threshold",
                    low_threshold,
                ));
            }
            if !high_threshold.is_finite() || high_threshold < low_threshold {
                return Err(MeasureError::invalid_parameter(
                    "high_threshold",
                    high_threshold,
                ));
            }
        }
        Ok(())
    }

    /// Produce a binary mask from a grayscale image
    pub fn segment(&self, gray: &GrayImage) -> BinaryMask {
        let mask = match *self {
            Segmenter::FixedThreshold { threshold: level } => {
                BinaryMask(threshold(gray, level, ThresholdType::Binary))
            }
            Segmenter::AutoThreshold => {
                let level = otsu_level(gray);
                log::debug!("otsu level = {}", level);
                BinaryMask(threshold(gray, level, ThresholdType::BinaryInverted))
            }
            Segmenter::EdgeDetector {
                low_threshold,
                high_threshold,
                dilation,
            } => {
                let edges = canny(gray, low_threshold, high_threshold);
                let edges = if dilation > 0 {
                    dilate(&edges, Norm::LInf, dilation)
                } else {
                    edges
                };
                BinaryMask::from_nonzero(&edges)
            }
        };

        log::debug!(
            "{:?}: {} foreground pixels of {}",
            self,
            mask.foreground_count(),
            gray.width() as usize * gray.height() as usize
        );
        mask
    }
}
