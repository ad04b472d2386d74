//! Error types for the scan_sizes library

use thiserror::Error;

/// Result type alias for scan_sizes operations
pub type Result<T> = std::result::Result<T, MeasureError>;

/// Error types for the measurement pipeline
///
/// Every error aborts the whole invocation: the pipeline never returns a
/// best-effort subset of measurements.
#[derive(Error, Debug)]
pub enum MeasureError {
    /// Image file could not be opened or decoded
    #[error("Failed to load image: {message}")]
    ImageLoadError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Segmentation produced no usable regions
    #[error("No contours found: {reason}")]
    NoContoursError { reason: String },

    /// Reference index does not address an extracted contour
    #[error("Reference contour {index} not found ({count} contours extracted)")]
    ReferenceNotFoundError { index: usize, count: usize },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// Configuration (or a file it points to) could not be read or written
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Annotated image could not be written
    #[error("Failed to save image: {message}")]
    ImageSaveError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl MeasureError {
    /// Create an image load error with context
    pub fn image_load<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageLoadError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error with context
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ConfigError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an image save error with context
    pub fn image_save<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageSaveError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// Check if the caller can recover by changing the image or arguments
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            MeasureError::NoContoursError { .. }
                | MeasureError::ReferenceNotFoundError { .. }
                | MeasureError::InvalidParameter { .. }
        )
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            MeasureError::ImageLoadError { .. } => {
                "Could not load the image. Please check the file format and try again.".to_string()
            }
            MeasureError::NoContoursError { .. } => {
                "No objects were found. Please use a plain background with good contrast."
                    .to_string()
            }
            MeasureError::ReferenceNotFoundError { index, count } => {
                format!(
                    "Reference object #{} was not found: only {} object(s) detected.",
                    index, count
                )
            }
            MeasureError::InvalidParameter { parameter, value } => {
                format!("Invalid value '{}' for {}.", value, parameter)
            }
            _ => "Measurement failed. Please try with a different image.".to_string(),
        }
    }
}
