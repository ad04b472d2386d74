//! Configuration structures for the scan_sizes measurement pipeline.
//!
//! Every tunable parameter lives here, grouped per measurement mode, so a
//! run is fully described by one value that can be stored next to its
//! results. Defaults come from [`crate::constants`].
//!
//! # Configuration Loading
//!
//! ```no_run
//! use scan_sizes::MeasureConfig;
//! use std::path::Path;
//!
//! // Load from file (missing fields fall back to defaults)
//! let config = MeasureConfig::from_json_file(Path::new("config.json"))?;
//!
//! // Or use defaults
//! let config = MeasureConfig::default();
//! # Ok::<(), scan_sizes::MeasureError>(())
//! ```
//!
//! # Configuration Sections
//!
//! - [`SingleObjectConfig`]: fixed threshold, fixed scale factor
//! - [`MultiObjectConfig`]: Otsu threshold, noise filter, pixel units
//! - [`ReferenceConfig`]: edge detection, reference-object calibration
//! - [`OverlayConfig`]: annotation drawing parameters

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::annotate::ColorScheme;
use crate::constants::{calibration, filtering, overlay};
use crate::detection::{ExtractionOptions, PointEncoding, RetrievalMode, Segmenter};
use crate::error::{MeasureError, Result};

/// Complete configuration for all measurement modes
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureConfig {
    pub single: SingleObjectConfig,
    pub multi: MultiObjectConfig,
    pub reference: ReferenceConfig,
    pub overlay: OverlayConfig,
}

/// Which contour a single-object measurement reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    /// First contour in extraction order
    #[default]
    First,
    /// Contour with the largest enclosed area (first one wins ties)
    LargestArea,
}

/// Single-object measurement parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SingleObjectConfig {
    pub segmenter: Segmenter,
    pub extraction: ExtractionOptions,
    /// Physical units per pixel
    pub scale_factor: f64,
    /// Contours below this area (px²) are dropped before selection
    pub min_area: f64,
    pub selection: Selection,
}

impl Default for SingleObjectConfig {
    fn default() -> Self {
        Self {
            segmenter: Segmenter::fixed(),
            extraction: ExtractionOptions::new(RetrievalMode::All, PointEncoding::Simple),
            scale_factor: calibration::SCALE_FACTOR,
            min_area: 0.0,
            selection: Selection::First,
        }
    }
}

/// Multi-object measurement parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiObjectConfig {
    pub segmenter: Segmenter,
    pub extraction: ExtractionOptions,
    /// Noise filter threshold in px²
    pub min_area: f64,
}

impl Default for MultiObjectConfig {
    fn default() -> Self {
        Self {
            segmenter: Segmenter::otsu(),
            extraction: ExtractionOptions::new(RetrievalMode::External, PointEncoding::Simple),
            min_area: filtering::MIN_CONTOUR_AREA,
        }
    }
}

/// Reference-calibrated measurement parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    pub segmenter: Segmenter,
    pub extraction: ExtractionOptions,
    /// Physical width of the reference object
    pub reference_width: f64,
    /// Position of the reference object in extraction order
    pub reference_index: usize,
    /// Unit label for annotations and reports
    pub unit: String,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            segmenter: Segmenter::edges(),
            extraction: ExtractionOptions::new(RetrievalMode::External, PointEncoding::Simple),
            reference_width: calibration::REFERENCE_WIDTH,
            reference_index: calibration::REFERENCE_INDEX,
            unit: calibration::UNIT.to_string(),
        }
    }
}

/// Annotation drawing parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub outline_thickness: u32,
    pub box_thickness: u32,
    /// TrueType/OpenType font for labels; labels are skipped without one
    pub font_path: Option<PathBuf>,
    pub font_scale: f32,
    pub color_scheme: ColorScheme,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            outline_thickness: overlay::OUTLINE_THICKNESS,
            box_thickness: overlay::BOX_THICKNESS,
            font_path: None,
            font_scale: overlay::FONT_SCALE,
            color_scheme: ColorScheme::Fixed,
        }
    }
}

impl MeasureConfig {
    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MeasureError::config(format!("Failed to read config: {}", path.display()), e)
        })?;
        Self::from_json_str(&content)
    }

    /// Parse configuration from a JSON string
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| MeasureError::config("Failed to parse config JSON", e))
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| MeasureError::config("Failed to serialize config", e))?;
        std::fs::write(path, json).map_err(|e| {
            MeasureError::config(format!("Failed to write config: {}", path.display()), e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_bindings() {
        let config = MeasureConfig::default();

        assert_eq!(config.single.segmenter, Segmenter::FixedThreshold { threshold: 127 });
        assert_eq!(config.single.extraction.retrieval, RetrievalMode::All);
        assert_eq!(config.single.scale_factor, 0.1);

        assert_eq!(config.multi.segmenter, Segmenter::AutoThreshold);
        assert_eq!(config.multi.extraction.retrieval, RetrievalMode::External);
        assert_eq!(config.multi.min_area, 100.0);

        assert_eq!(
            config.reference.segmenter,
            Segmenter::EdgeDetector {
                low_threshold: 50.0,
                high_threshold: 150.0,
                dilation: 0
            }
        );
        assert_eq!(config.reference.reference_index, 0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = MeasureConfig::from_json_str(r#"{"multi": {"min_area": 50.0}}"#).unwrap();

        assert_eq!(config.multi.min_area, 50.0);
        assert_eq!(config.multi.segmenter, Segmenter::AutoThreshold);
        assert_eq!(config.single, SingleObjectConfig::default());
    }

    #[test]
    fn test_json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = MeasureConfig::default();
        config.reference.unit = "mm".to_string();
        config.overlay.color_scheme = ColorScheme::Distinct;
        config.to_json_file(&path).unwrap();

        let loaded = MeasureConfig::from_json_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_bad_json_is_config_error() {
        let err = MeasureConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, MeasureError::ConfigError { .. }));

        let err = MeasureConfig::from_json_file(Path::new("/nonexistent/config.json")).unwrap_err();
        assert!(matches!(err, MeasureError::ConfigError { .. }));
    }
}
