//! Serializable summaries for callers outside the pipeline
//!
//! An upload handler answers with either a [`MeasurementSummary`] or an
//! [`ErrorSummary`]; the two shapes never overlap, so clients can tell a
//! failure from an empty result.

use serde::{Deserialize, Serialize};

use crate::error::MeasureError;

/// Success payload for a multi-object measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementSummary {
    pub object_count: usize,
    pub object_sizes: Vec<f64>,
    pub total_area: f64,
}

impl MeasurementSummary {
    pub fn from_sizes(sizes: &[f64]) -> Self {
        Self {
            object_count: sizes.len(),
            object_sizes: sizes.to_vec(),
            total_area: sizes.iter().sum(),
        }
    }
}

/// Failure payload carrying a user-facing message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorSummary {
    pub error: String,
}

impl From<&MeasureError> for ErrorSummary {
    fn from(err: &MeasureError) -> Self {
        Self {
            error: format!("Processing failed: {}", err.user_message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_json_shape() {
        let summary = MeasurementSummary::from_sizes(&[314.0, 1257.5]);
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["object_count"], 2);
        assert_eq!(json["object_sizes"][1], 1257.5);
        assert_eq!(json["total_area"], 1571.5);
    }

    #[test]
    fn test_empty_summary() {
        let summary = MeasurementSummary::from_sizes(&[]);
        assert_eq!(summary.object_count, 0);
        assert_eq!(summary.total_area, 0.0);
    }

    #[test]
    fn test_error_summary() {
        let err = MeasureError::ReferenceNotFoundError { index: 4, count: 1 };
        let summary = ErrorSummary::from(&err);
        let json = serde_json::to_string(&summary).unwrap();

        assert!(json.starts_with(r#"{"error":"Processing failed: "#));
        assert!(!json.contains("object_count"));
    }
}
