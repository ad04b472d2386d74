//! # Scan Sizes
//!
//! A Rust crate for measuring the physical size of objects in photographs.
//!
//! This library turns pixels into real-world sizes by:
//! - Segmenting the image into foreground and background
//! - Tracing object boundaries as contours
//! - Dropping noise regions below a minimum area
//! - Calibrating with a fixed scale factor or an in-frame reference object
//! - Drawing an annotated copy of the input for visual checking
//!
//! Three measurement modes are provided:
//!
//! | Mode | Segmentation | Units |
//! |---|---|---|
//! | [`measure_single_object`] | fixed threshold | scale factor per pixel |
//! | [`measure_multiple_objects`] | Otsu threshold | pixels |
//! | [`measure_with_reference`] | edge detection | reference object width |
//!
//! ## Example
//!
//! ```rust,no_run
//! use scan_sizes::measure_with_reference;
//! use std::path::Path;
//!
//! // A 2.4 cm coin is the top-most object in the photo
//! let result = measure_with_reference(Path::new("desk.jpg"), 2.4, 0)?;
//! for object in result.measurements.iter() {
//!     let size = object.measurement;
//!     println!("{}: {:.1} x {:.1} cm", object.id, size.width, size.height);
//! }
//! # Ok::<(), scan_sizes::MeasureError>(())
//! ```

use image::{DynamicImage, RgbImage};
use std::collections::BTreeMap;
use std::path::Path;

pub mod annotate;
pub mod calibration;
pub mod config;
pub mod constants;
pub mod detection;
pub mod error;
pub mod image_loader;
pub mod measurement;
pub mod pipeline;

pub use annotate::{Annotator, ColorScheme, OverlayStyle};
pub use calibration::{CalibrationContext, CalibrationPolicy};
pub use config::{
    MeasureConfig, MultiObjectConfig, OverlayConfig, ReferenceConfig, Selection,
    SingleObjectConfig,
};
pub use detection::{Contour, ContourSet, Segmenter};
pub use error::{MeasureError, Result};
pub use measurement::{
    ErrorSummary, MeasuredObject, Measurement, MeasurementSet, MeasurementSummary,
};
pub use pipeline::{MeasurementPipeline, PipelineOutput};

/// Result of a single-object measurement
#[derive(Debug, Clone)]
pub struct SingleObjectMeasurement {
    /// Area of the selected contour in square units of the scale factor
    pub area: f64,
    /// Position of the selected contour in `measurements`
    pub selected: usize,
    /// Every contour that was considered
    pub measurements: MeasurementSet,
    /// Input image with all contours outlined
    pub annotated: RgbImage,
}

/// Result of a multi-object measurement
#[derive(Debug, Clone)]
pub struct MultiObjectMeasurement {
    /// Pixel areas of the retained contours, in extraction order
    pub object_sizes: Vec<f64>,
    pub measurements: MeasurementSet,
    /// Input image with boxed and labelled objects
    pub annotated: RgbImage,
}

impl MultiObjectMeasurement {
    /// JSON-ready summary for upload handlers
    pub fn summary(&self) -> MeasurementSummary {
        MeasurementSummary::from_sizes(&self.object_sizes)
    }
}

/// Result of a reference-calibrated measurement
#[derive(Debug, Clone)]
pub struct ReferenceMeasurement {
    /// Every extracted contour, the reference included
    pub measurements: MeasurementSet,
    /// Input image with the reference boxed green and the rest blue
    pub annotated: RgbImage,
}

impl ReferenceMeasurement {
    /// Measurements keyed by object id
    pub fn sizes(&self) -> BTreeMap<String, Measurement> {
        self.measurements
            .iter()
            .map(|o| (o.id.clone(), o.measurement))
            .collect()
    }

    /// Pixels per physical unit derived from the reference
    pub fn pixels_per_unit(&self) -> Option<f64> {
        match self.measurements.calibration {
            CalibrationContext::Reference {
                pixels_per_unit, ..
            } => Some(pixels_per_unit),
            CalibrationContext::Fixed { .. } => None,
        }
    }
}

/// Measure the area of the primary object in an image file
///
/// The image is binarised with a fixed threshold, and the first contour in
/// extraction order (top-most, then left-most) is reported. `scale_factor`
/// is the physical size of one pixel; area scales by its square.
///
/// # Errors
///
/// - `InvalidParameter` if `scale_factor` is not a positive finite number
/// - `ImageLoadError` if the image cannot be read or decoded
/// - `NoContoursError` if nothing is brighter than the threshold
pub fn measure_single_object(
    image_path: &Path,
    scale_factor: f64,
) -> Result<SingleObjectMeasurement> {
    let mut config = MeasureConfig::default();
    config.single.scale_factor = scale_factor;
    measure_single_object_with_config(image_path, &config)
}

/// Single-object measurement with explicit configuration
pub fn measure_single_object_with_config(
    image_path: &Path,
    config: &MeasureConfig,
) -> Result<SingleObjectMeasurement> {
    MeasurementPipeline::single_object(&config.single).validate()?;
    let image = image_loader::load_image(image_path)?;
    measure_single_object_image(&image, config)
}

/// Single-object measurement on an already decoded image
pub fn measure_single_object_image(
    image: &DynamicImage,
    config: &MeasureConfig,
) -> Result<SingleObjectMeasurement> {
    let annotator = Annotator::from_config(&config.overlay)?;
    let output = MeasurementPipeline::single_object(&config.single).run(image, &annotator)?;
    let selected = select(&output.measurements, config.single.selection);
    let area = output.measurements.objects[selected].measurement.area;

    log::debug!(
        "selected {} by {:?}",
        output.measurements.objects[selected].id,
        config.single.selection
    );

    Ok(SingleObjectMeasurement {
        area,
        selected,
        measurements: output.measurements,
        annotated: output.annotated,
    })
}

/// Measure the pixel area of every object in an image file
///
/// Dark objects on a light background are separated with an automatic
/// threshold; regions smaller than `min_area` px² are discarded. An image
/// without objects yields an empty list.
///
/// # Errors
///
/// - `InvalidParameter` if `min_area` is negative or not finite
/// - `ImageLoadError` if the image cannot be read or decoded
pub fn measure_multiple_objects(
    image_path: &Path,
    min_area: f64,
) -> Result<MultiObjectMeasurement> {
    let mut config = MeasureConfig::default();
    config.multi.min_area = min_area;
    measure_multiple_objects_with_config(image_path, &config)
}

/// Multi-object measurement with explicit configuration
pub fn measure_multiple_objects_with_config(
    image_path: &Path,
    config: &MeasureConfig,
) -> Result<MultiObjectMeasurement> {
    MeasurementPipeline::multi_object(&config.multi).validate()?;
    let image = image_loader::load_image(image_path)?;
    measure_multiple_objects_image(&image, config)
}

/// Multi-object measurement on an already decoded image
pub fn measure_multiple_objects_image(
    image: &DynamicImage,
    config: &MeasureConfig,
) -> Result<MultiObjectMeasurement> {
    let annotator = Annotator::from_config(&config.overlay)?;
    let output = MeasurementPipeline::multi_object(&config.multi).run(image, &annotator)?;
    Ok(MultiObjectMeasurement {
        object_sizes: output.measurements.areas(),
        measurements: output.measurements,
        annotated: output.annotated,
    })
}

/// Measure every object relative to a reference object of known width
///
/// Contours are traced from an edge map. The contour at `reference_index`
/// (extraction order, top-most first) defines pixels per unit as its
/// bounding-box width divided by `reference_width`. The reference must be
/// unrotated and parallel to the image plane.
///
/// # Errors
///
/// - `InvalidParameter` if `reference_width` is not a positive finite number
/// - `ImageLoadError` if the image cannot be read or decoded
/// - `ReferenceNotFoundError` if fewer than `reference_index + 1` contours exist
pub fn measure_with_reference(
    image_path: &Path,
    reference_width: f64,
    reference_index: usize,
) -> Result<ReferenceMeasurement> {
    let mut config = MeasureConfig::default();
    config.reference.reference_width = reference_width;
    config.reference.reference_index = reference_index;
    measure_with_reference_with_config(image_path, &config)
}

/// Reference-calibrated measurement with explicit configuration
pub fn measure_with_reference_with_config(
    image_path: &Path,
    config: &MeasureConfig,
) -> Result<ReferenceMeasurement> {
    MeasurementPipeline::reference(&config.reference).validate()?;
    let image = image_loader::load_image(image_path)?;
    measure_with_reference_image(&image, config)
}

/// Reference-calibrated measurement on an already decoded image
pub fn measure_with_reference_image(
    image: &DynamicImage,
    config: &MeasureConfig,
) -> Result<ReferenceMeasurement> {
    let annotator = Annotator::from_config(&config.overlay)?;
    let output = MeasurementPipeline::reference(&config.reference).run(image, &annotator)?;
    Ok(ReferenceMeasurement {
        measurements: output.measurements,
        annotated: output.annotated,
    })
}

/// Index of the object a single-object measurement reports
///
/// `set` is non-empty: the single-object pipeline rejects empty results.
fn select(set: &MeasurementSet, selection: Selection) -> usize {
    match selection {
        Selection::First => 0,
        Selection::LargestArea => {
            let mut best = 0;
            for (i, object) in set.iter().enumerate() {
                if object.pixel_area > set.objects[best].pixel_area {
                    best = i;
                }
            }
            best
        }
    }
}
