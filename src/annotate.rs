//! Annotation overlay
//!
//! Draws contour outlines, bounding boxes and size labels onto a copy of the
//! source image. The source image and the measurements are never modified;
//! colour choices are presentation only and do not affect reported numbers.
//!
//! Labels need a TrueType/OpenType font. Without one configured only the
//! geometry is drawn.

use ab_glyph::{FontVec, PxScale};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{
    draw_hollow_polygon_mut, draw_hollow_rect_mut, draw_line_segment_mut, draw_text_mut,
};
use imageproc::point::Point;
use imageproc::rect::Rect;
use palette::{FromColor, Hsv, Srgb};
use serde::{Deserialize, Serialize};

use crate::config::OverlayConfig;
use crate::constants::overlay::{BLUE, GREEN, LABEL_OFFSET, RED};
use crate::detection::{BoundingBox, ContourSet};
use crate::error::{MeasureError, Result};
use crate::measurement::{MeasuredObject, MeasurementSet};

/// What to draw for each measured object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum OverlayStyle {
    /// Contour outlines only
    Outlines,
    /// Bounding box labelled with the pixel area, e.g. `1257px`
    PixelAreaBoxes,
    /// Bounding box labelled with width x height, reference highlighted
    DimensionBoxes { unit: String },
}

/// Colour assignment for overlays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    /// Green geometry, red area labels, blue non-reference boxes
    #[default]
    Fixed,
    /// One evenly spaced hue per object
    Distinct,
}

/// Renders overlays with a fixed set of drawing parameters
pub struct Annotator {
    outline_thickness: u32,
    box_thickness: u32,
    font_scale: f32,
    color_scheme: ColorScheme,
    font: Option<FontVec>,
}

impl std::fmt::Debug for Annotator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Annotator")
            .field("outline_thickness", &self.outline_thickness)
            .field("box_thickness", &self.box_thickness)
            .field("font_scale", &self.font_scale)
            .field("color_scheme", &self.color_scheme)
            .field("has_font", &self.font.is_some())
            .finish()
    }
}

impl Annotator {
    /// Build an annotator, reading the label font if one is configured
    pub fn from_config(config: &OverlayConfig) -> Result<Self> {
        let font = match &config.font_path {
            Some(path) => {
                let bytes = std::fs::read(path).map_err(|e| {
                    MeasureError::config(format!("Failed to read font: {}", path.display()), e)
                })?;
                let font = FontVec::try_from_vec(bytes).map_err(|e| MeasureError::ConfigError {
                    message: format!("Invalid font {}: {}", path.display(), e),
                    source: None,
                })?;
                Some(font)
            }
            None => None,
        };

        Ok(Self {
            outline_thickness: config.outline_thickness.max(1),
            box_thickness: config.box_thickness.max(1),
            font_scale: config.font_scale,
            color_scheme: config.color_scheme,
            font,
        })
    }

    /// Whether labels will be rendered
    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Draw `style` for every measured object onto a copy of `image`
    pub fn annotate(
        &self,
        image: &DynamicImage,
        contours: &ContourSet,
        measurements: &MeasurementSet,
        style: &OverlayStyle,
    ) -> RgbImage {
        let mut canvas = image.to_rgb8();
        let count = measurements.len();

        for object in measurements.iter() {
            match style {
                OverlayStyle::Outlines => {
                    if let Some(contour) = contours.get(object.index) {
                        let color = self.pick(object.index, count, GREEN);
                        let points: Vec<Point<f32>> = contour
                            .points
                            .iter()
                            .map(|p| Point::new(p.x as f32, p.y as f32))
                            .collect();
                        draw_outline(&mut canvas, &points, color, self.outline_thickness);
                    }
                }
                OverlayStyle::PixelAreaBoxes => {
                    let box_color = self.pick(object.index, count, GREEN);
                    let text_color = self.pick(object.index, count, RED);
                    self.draw_box(&mut canvas, object.bounding_box, box_color);
                    let label = format!("{:.0}px", object.pixel_area);
                    self.draw_label(&mut canvas, object.bounding_box, &label, text_color);
                }
                OverlayStyle::DimensionBoxes { unit } => {
                    let is_reference =
                        measurements.calibration.reference_index() == Some(object.index);
                    let fixed = if is_reference { GREEN } else { BLUE };
                    let color = self.pick(object.index, count, fixed);
                    self.draw_box(&mut canvas, object.bounding_box, color);
                    let label = dimension_label(object, unit);
                    self.draw_label(&mut canvas, object.bounding_box, &label, color);
                }
            }
        }

        canvas
    }

    fn pick(&self, index: usize, count: usize, fixed: [u8; 3]) -> Rgb<u8> {
        match self.color_scheme {
            ColorScheme::Fixed => Rgb(fixed),
            ColorScheme::Distinct => Rgb(distinct_color(index, count)),
        }
    }

    fn draw_box(&self, canvas: &mut RgbImage, bbox: BoundingBox, color: Rgb<u8>) {
        for t in 0..self.box_thickness as i32 {
            let rect = Rect::at(bbox.x - t, bbox.y - t)
                .of_size(bbox.width.max(1) + 2 * t as u32, bbox.height.max(1) + 2 * t as u32);
            draw_hollow_rect_mut(canvas, rect, color);
        }
    }

    fn draw_label(&self, canvas: &mut RgbImage, bbox: BoundingBox, text: &str, color: Rgb<u8>) {
        let Some(font) = &self.font else {
            return;
        };
        let y = (bbox.y - LABEL_OFFSET - self.font_scale.ceil() as i32).max(0);
        draw_text_mut(canvas, color, bbox.x, y, PxScale::from(self.font_scale), font, text);
    }
}

/// Label text for reference-calibrated objects, e.g. `2.5x1.0cm`
pub fn dimension_label(object: &MeasuredObject, unit: &str) -> String {
    format!(
        "{:.1}x{:.1}{}",
        object.measurement.width, object.measurement.height, unit
    )
}

/// Evenly spaced, fully saturated hue for object `index` of `count`
pub fn distinct_color(index: usize, count: usize) -> [u8; 3] {
    let hue = 360.0 * index as f32 / count.max(1) as f32;
    let hsv: Hsv = Hsv::new(hue, 1.0, 1.0);
    let rgb: Srgb<u8> = Srgb::<f32>::from_color(hsv).into_format();
    [rgb.red, rgb.green, rgb.blue]
}

fn draw_outline(canvas: &mut RgbImage, points: &[Point<f32>], color: Rgb<u8>, thickness: u32) {
    if let [p] = points {
        draw_line_segment_mut(canvas, (p.x, p.y), (p.x, p.y), color);
        return;
    }

    let r = (thickness / 2) as i32;
    for dy in -r..=r {
        for dx in -r..=r {
            let shifted: Vec<Point<f32>> = points
                .iter()
                .map(|p| Point::new(p.x + dx as f32, p.y + dy as f32))
                .collect();
            draw_hollow_polygon_mut(canvas, &shifted, color);
        }
    }
}
