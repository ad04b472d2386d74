//! Minimum-area noise filter
//!
//! Segmentation reliably leaves micro-regions behind from sensor and
//! compression noise. The filter uses one absolute px² threshold; it does not
//! adapt to image resolution, so callers pick a value suited to their
//! capture setup.

use super::contours::ContourSet;
use crate::error::{MeasureError, Result};

/// Check a minimum-area threshold
pub fn validate_min_area(min_area: f64) -> Result<()> {
    if !min_area.is_finite() || min_area < 0.0 {
        return Err(MeasureError::invalid_parameter("min_area", min_area));
    }
    Ok(())
}

/// Keep contours whose area is at least `min_area` px², preserving order
pub fn filter_by_area(contours: ContourSet, min_area: f64) -> Result<ContourSet> {
    validate_min_area(min_area)?;

    let before = contours.len();
    let retained = contours.retain_by(|_, c| c.area() >= min_area);
    log::debug!(
        "noise filter (min_area={}): kept {} of {} contours",
        min_area,
        retained.len(),
        before
    );
    Ok(retained)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::contours::{BorderKind, Contour, Point};

    fn square(x: i32, y: i32, side: i32) -> Contour {
        Contour::new(
            vec![
                Point::new(x, y),
                Point::new(x + side, y),
                Point::new(x + side, y + side),
                Point::new(x, y + side),
            ],
            BorderKind::Outer,
            None,
        )
    }

    #[test]
    fn test_threshold_is_inclusive_and_order_preserved() {
        let set = ContourSet::new(vec![square(0, 0, 20), square(30, 0, 5), square(0, 30, 10)])
            .unwrap();
        let kept = filter_by_area(set, 100.0).unwrap();

        let areas: Vec<f64> = kept.iter().map(|c| c.area()).collect();
        assert_eq!(areas, vec![400.0, 100.0]);
    }

    #[test]
    fn test_zero_keeps_everything() {
        let set = ContourSet::new(vec![square(0, 0, 1), square(5, 5, 0)]).unwrap();
        let kept = filter_by_area(set, 0.0).unwrap();
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_invalid_thresholds() {
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            let err = filter_by_area(ContourSet::default(), bad).unwrap_err();
            assert!(matches!(err, MeasureError::InvalidParameter { .. }));
        }
    }
}
