//! Physical measurement of extracted contours
//!
//! Converts each contour's pixel area and bounding box through one
//! [`CalibrationContext`]. Output order always matches contour order, one
//! measurement per contour.

use serde::{Deserialize, Serialize};

use crate::calibration::CalibrationContext;
use crate::detection::{BoundingBox, ContourSet};

/// Size of one object in calibrated units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub width: f64,
    pub height: f64,
    pub area: f64,
}

/// Measurement together with the pixel-space data it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasuredObject {
    /// Stable identifier, `object_{index}`
    pub id: String,
    /// Position in the measured contour set
    pub index: usize,
    pub pixel_area: f64,
    pub bounding_box: BoundingBox,
    pub measurement: Measurement,
}

/// Measurements for every contour of one invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementSet {
    pub objects: Vec<MeasuredObject>,
    pub calibration: CalibrationContext,
}

impl MeasurementSet {
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MeasuredObject> {
        self.objects.iter()
    }

    /// Look up an object by its `object_{i}` identifier
    pub fn get(&self, id: &str) -> Option<&MeasuredObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// The object used as calibration reference, if any
    pub fn reference(&self) -> Option<&MeasuredObject> {
        self.calibration
            .reference_index()
            .and_then(|i| self.objects.get(i))
    }

    /// Calibrated areas in contour order
    pub fn areas(&self) -> Vec<f64> {
        self.objects.iter().map(|o| o.measurement.area).collect()
    }

    pub fn total_area(&self) -> f64 {
        self.objects.iter().map(|o| o.measurement.area).sum()
    }
}

/// Identifier of the contour at `index`
pub fn object_id(index: usize) -> String {
    format!("object_{}", index)
}

/// Measure every contour of `contours` with `calibration`
pub fn compute_measurements(
    contours: &ContourSet,
    calibration: CalibrationContext,
) -> MeasurementSet {
    let objects = contours
        .iter()
        .enumerate()
        .map(|(index, contour)| {
            let bounding_box = contour.bounding_box();
            let pixel_area = contour.area();
            MeasuredObject {
                id: object_id(index),
                index,
                pixel_area,
                bounding_box,
                measurement: Measurement {
                    width: calibration.to_units(bounding_box.width as f64),
                    height: calibration.to_units(bounding_box.height as f64),
                    area: calibration.to_square_units(pixel_area),
                },
            }
        })
        .collect();

    MeasurementSet {
        objects,
        calibration,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{BorderKind, Contour, Point};

    fn rect(x: i32, y: i32, w: i32, h: i32) -> Contour {
        Contour::new(
            vec![
                Point::new(x, y),
                Point::new(x + w - 1, y),
                Point::new(x + w - 1, y + h - 1),
                Point::new(x, y + h - 1),
            ],
            BorderKind::Outer,
            None,
        )
    }

    fn contours() -> ContourSet {
        ContourSet::new(vec![rect(0, 0, 21, 11), rect(40, 0, 41, 21)]).unwrap()
    }

    #[test]
    fn test_fixed_scale_measurements() {
        let set = compute_measurements(&contours(), CalibrationContext::fixed(0.5).unwrap());

        assert_eq!(set.len(), 2);
        let first = set.get("object_0").unwrap();
        assert_eq!(first.pixel_area, 200.0);
        assert_eq!(first.measurement.width, 10.5);
        assert_eq!(first.measurement.height, 5.5);
        assert_eq!(first.measurement.area, 50.0);
        assert!(set.reference().is_none());
    }

    #[test]
    fn test_reference_round_trip() {
        let ppu = 21.0 / 3.0;
        let set = compute_measurements(
            &contours(),
            CalibrationContext::reference(ppu, 0).unwrap(),
        );

        let reference = set.reference().unwrap();
        assert_eq!(reference.id, "object_0");
        assert!((reference.measurement.width - 3.0).abs() < 1e-12);
        assert!((set.objects[1].measurement.width - 41.0 / ppu).abs() < 1e-12);
        assert!((set.objects[1].measurement.area - 800.0 / (ppu * ppu)).abs() < 1e-12);
    }

    #[test]
    fn test_order_and_totals() {
        let set = compute_measurements(&contours(), CalibrationContext::pixels());
        let ids: Vec<&str> = set.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["object_0", "object_1"]);
        assert_eq!(set.areas(), vec![200.0, 800.0]);
        assert_eq!(set.total_area(), 1000.0);
    }

    #[test]
    fn test_empty_contours() {
        let set = compute_measurements(&ContourSet::default(), CalibrationContext::pixels());
        assert!(set.is_empty());
        assert_eq!(set.total_area(), 0.0);
    }
}
