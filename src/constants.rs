//! Default parameters for the measurement pipeline
//!
//! These values seed [`crate::config::MeasureConfig`]; the pipeline itself
//! only ever reads parameters from a configuration value.

/// Segmentation defaults
pub mod segmentation {
    /// Fixed binary threshold on a 0-255 scale (pixel > threshold = foreground)
    pub const FIXED_THRESHOLD: u8 = 127;

    /// Canny hysteresis thresholds
    pub const CANNY_LOW_THRESHOLD: f32 = 50.0;
    pub const CANNY_HIGH_THRESHOLD: f32 = 150.0;

    /// Edge dilation radius in pixels (0 = plain edge mask)
    pub const EDGE_DILATION: u8 = 0;
}

/// Noise filter defaults
pub mod filtering {
    /// Minimum contour area in px² for multi-object measurement
    pub const MIN_CONTOUR_AREA: f64 = 100.0;
}

/// Calibration defaults
pub mod calibration {
    /// Physical units per pixel for single-object measurement (cm/px)
    pub const SCALE_FACTOR: f64 = 0.1;

    /// Position of the reference object in extraction order
    pub const REFERENCE_INDEX: usize = 0;

    /// Physical width of the reference object
    pub const REFERENCE_WIDTH: f64 = 1.0;

    /// Unit label used for calibrated measurements
    pub const UNIT: &str = "cm";
}

/// Annotation overlay defaults
pub mod overlay {
    /// Contour outline thickness (single-object mode)
    pub const OUTLINE_THICKNESS: u32 = 3;

    /// Bounding box thickness (multi-object and reference modes)
    pub const BOX_THICKNESS: u32 = 2;

    /// Label height in pixels
    pub const FONT_SCALE: f32 = 18.0;

    /// Vertical gap between a label's baseline and its box
    pub const LABEL_OFFSET: i32 = 10;

    pub const GREEN: [u8; 3] = [0, 255, 0];
    pub const RED: [u8; 3] = [255, 0, 0];
    pub const BLUE: [u8; 3] = [0, 0, 255];
}
