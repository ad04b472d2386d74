//! Measurement pipeline
//!
//! One [`MeasurementPipeline`] value fixes every strategy of an invocation:
//! how the image is segmented, how contours are traced, which contours count
//! as noise, how pixels convert to physical units and what the overlay
//! shows. The three measurement modes are presets built from the matching
//! section of [`MeasureConfig`](crate::config::MeasureConfig).
//!
//! Stages run strictly in order and the first failure aborts the run:
//!
//! 1. Grayscale reduction
//! 2. Segmentation into a binary mask
//! 3. Contour extraction
//! 4. Optional minimum-area filter
//! 5. Calibration
//! 6. Measurement
//! 7. Annotation onto a copy of the input

use image::{DynamicImage, RgbImage};

use crate::annotate::{Annotator, OverlayStyle};
use crate::calibration::CalibrationPolicy;
use crate::config::{MultiObjectConfig, ReferenceConfig, SingleObjectConfig};
use crate::detection::filter::validate_min_area;
use crate::detection::{
    extract_contours, filter_by_area, to_grayscale, ContourSet, ExtractionOptions, Segmenter,
};
use crate::error::Result;
use crate::measurement::{compute_measurements, MeasurementSet};

/// Composition of the strategies used by one measurement run
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementPipeline {
    pub segmenter: Segmenter,
    pub extraction: ExtractionOptions,
    /// Minimum contour area in px²; `None` keeps every contour
    pub min_area: Option<f64>,
    /// Fail with `NoContoursError` instead of returning an empty result
    pub require_contours: bool,
    pub calibration: CalibrationPolicy,
    pub overlay: OverlayStyle,
}

/// Everything a pipeline run produces
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Contours that were measured, in extraction order
    pub contours: ContourSet,
    pub measurements: MeasurementSet,
    /// Overlay drawn on a copy of the input image
    pub annotated: RgbImage,
}

impl MeasurementPipeline {
    /// Single-object preset: fixed threshold, full hierarchy, fixed scale
    pub fn single_object(config: &SingleObjectConfig) -> Self {
        Self {
            segmenter: config.segmenter,
            extraction: config.extraction,
            min_area: (config.min_area > 0.0).then_some(config.min_area),
            require_contours: true,
            calibration: CalibrationPolicy::FixedScale {
                scale_factor: config.scale_factor,
            },
            overlay: OverlayStyle::Outlines,
        }
    }

    /// Multi-object preset: Otsu threshold, outer borders, pixel units
    pub fn multi_object(config: &MultiObjectConfig) -> Self {
        Self {
            segmenter: config.segmenter,
            extraction: config.extraction,
            min_area: Some(config.min_area),
            require_contours: false,
            calibration: CalibrationPolicy::FixedScale { scale_factor: 1.0 },
            overlay: OverlayStyle::PixelAreaBoxes,
        }
    }

    /// Reference preset: edge detection, outer borders, no noise filter
    ///
    /// Reference indices address the unfiltered extraction order.
    pub fn reference(config: &ReferenceConfig) -> Self {
        Self {
            segmenter: config.segmenter,
            extraction: config.extraction,
            min_area: None,
            require_contours: false,
            calibration: CalibrationPolicy::ReferenceObject {
                reference_width: config.reference_width,
                reference_index: config.reference_index,
            },
            overlay: OverlayStyle::DimensionBoxes {
                unit: config.unit.clone(),
            },
        }
    }

    /// Reject invalid parameters before any pixel is touched
    pub fn validate(&self) -> Result<()> {
        self.segmenter.validate()?;
        if let Some(min_area) = self.min_area {
            validate_min_area(min_area)?;
        }
        self.calibration.validate()
    }

    /// Run every stage on `image`
    pub fn run(&self, image: &DynamicImage, annotator: &Annotator) -> Result<PipelineOutput> {
        self.validate()?;

        let gray = to_grayscale(image);
        let mask = self.segmenter.segment(&gray);
        let mut contours = extract_contours(&mask, self.extraction);

        if let Some(min_area) = self.min_area {
            contours = filter_by_area(contours, min_area)?;
        }
        if self.require_contours {
            contours = contours.require_non_empty()?;
        }

        let calibration = self.calibration.resolve(&contours)?;
        let measurements = compute_measurements(&contours, calibration);
        let annotated = annotator.annotate(image, &contours, &measurements, &self.overlay);

        log::info!(
            "measured {} object(s) on {}x{} image (total area {:.3})",
            measurements.len(),
            image.width(),
            image.height(),
            measurements.total_area()
        );

        Ok(PipelineOutput {
            contours,
            measurements,
            annotated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OverlayConfig;
    use crate::error::MeasureError;
    use image::{Luma, Rgb};
    use imageproc::drawing::draw_filled_rect_mut;
    use imageproc::rect::Rect;

    fn annotator() -> Annotator {
        Annotator::from_config(&OverlayConfig::default()).unwrap()
    }

    /// Dark rectangles on a light background
    fn dark_rects() -> DynamicImage {
        let mut img = RgbImage::from_pixel(100, 80, Rgb([255, 255, 255]));
        draw_filled_rect_mut(&mut img, Rect::at(10, 10).of_size(20, 15), Rgb([0, 0, 0]));
        draw_filled_rect_mut(&mut img, Rect::at(50, 40).of_size(30, 20), Rgb([0, 0, 0]));
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_multi_object_preset() {
        let pipeline = MeasurementPipeline::multi_object(&MultiObjectConfig::default());
        let out = pipeline.run(&dark_rects(), &annotator()).unwrap();

        assert_eq!(out.measurements.areas(), vec![266.0, 551.0]);
        assert_eq!(out.contours.len(), 2);
        assert_eq!(out.annotated.dimensions(), (100, 80));
    }

    #[test]
    fn test_noise_filter_applied() {
        let config = MultiObjectConfig {
            min_area: 300.0,
            ..MultiObjectConfig::default()
        };
        let out = MeasurementPipeline::multi_object(&config)
            .run(&dark_rects(), &annotator())
            .unwrap();

        assert_eq!(out.measurements.areas(), vec![551.0]);
        assert_eq!(out.measurements.objects[0].id, "object_0");
    }

    #[test]
    fn test_single_object_requires_contours() {
        let blank = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(40, 40, Luma([0])));
        let pipeline = MeasurementPipeline::single_object(&SingleObjectConfig::default());

        let err = pipeline.run(&blank, &annotator()).unwrap_err();
        assert!(matches!(err, MeasureError::NoContoursError { .. }));
    }

    #[test]
    fn test_reference_index_out_of_range() {
        let config = ReferenceConfig {
            reference_index: 1000,
            ..ReferenceConfig::default()
        };
        let err = MeasurementPipeline::reference(&config)
            .run(&dark_rects(), &annotator())
            .unwrap_err();

        match err {
            MeasureError::ReferenceNotFoundError { index, count } => {
                assert_eq!(index, 1000);
                assert!(count < 1000);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_bad_parameters() {
        let mut pipeline = MeasurementPipeline::single_object(&SingleObjectConfig::default());
        pipeline.calibration = CalibrationPolicy::FixedScale { scale_factor: 0.0 };
        assert!(matches!(
            pipeline.validate(),
            Err(MeasureError::InvalidParameter { .. })
        ));

        let mut pipeline = MeasurementPipeline::multi_object(&MultiObjectConfig::default());
        pipeline.min_area = Some(f64::NAN);
        assert!(pipeline.validate().is_err());
    }

    #[test]
    fn test_single_object_skips_filter_by_default() {
        let pipeline = MeasurementPipeline::single_object(&SingleObjectConfig::default());
        assert_eq!(pipeline.min_area, None);
        assert_eq!(pipeline.overlay, OverlayStyle::Outlines);
    }
}
