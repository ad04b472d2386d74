//! Contour extraction and hierarchy handling
//!
//! Border following is delegated to `imageproc` (Suzuki-Abe). Contours come
//! out in raster-scan order of each border's first pixel: top to bottom,
//! then left to right. Downstream code addresses contours by this position
//! (the reference object is "contour N"), so the order is part of the API.

use imageproc::contours::{find_contours, BorderType};
use imageproc::geometry::contour_area;
use serde::{Deserialize, Serialize};

use super::segmentation::BinaryMask;
use crate::error::{MeasureError, Result};

/// Integer pixel coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<Point> for imageproc::point::Point<i32> {
    fn from(p: Point) -> Self {
        Self::new(p.x, p.y)
    }
}

/// Axis-aligned bounding box with inclusive pixel extents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    /// Smallest box covering every point; `None` for an empty slice
    pub fn enclosing(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        Some(Self {
            x: min_x,
            y: min_y,
            width: (max_x - min_x + 1) as u32,
            height: (max_y - min_y + 1) as u32,
        })
    }
}

/// Whether a border separates an object from its surroundings or a hole
/// from its object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderKind {
    Outer,
    Hole,
}

/// Which borders to keep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalMode {
    /// Every border, with the full nesting hierarchy
    #[default]
    All,
    /// Outer borders not nested inside another object
    External,
}

/// How boundary points are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointEncoding {
    /// Every boundary pixel
    Full,
    /// Straight horizontal, vertical and diagonal runs reduced to end points
    #[default]
    Simple,
}

/// Contour extraction parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtractionOptions {
    #[serde(default)]
    pub retrieval: RetrievalMode,
    #[serde(default)]
    pub encoding: PointEncoding,
}

impl ExtractionOptions {
    pub fn new(retrieval: RetrievalMode, encoding: PointEncoding) -> Self {
        Self {
            retrieval,
            encoding,
        }
    }
}

/// Closed boundary of a connected foreground region (or of a hole in one)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contour {
    pub points: Vec<Point>,
    pub kind: BorderKind,
    /// Index of the enclosing contour within the same set
    pub parent: Option<usize>,
}

impl Contour {
    pub fn new(points: Vec<Point>, kind: BorderKind, parent: Option<usize>) -> Self {
        Self {
            points,
            kind,
            parent,
        }
    }

    /// Enclosed polygon area in px², through pixel centres
    pub fn area(&self) -> f64 {
        if self.points.len() < 3 {
            return 0.0;
        }
        let polygon: Vec<imageproc::point::Point<i32>> =
            self.points.iter().copied().map(Into::into).collect();
        contour_area(&polygon).abs()
    }

    /// Closed polyline length in pixels
    pub fn perimeter(&self) -> f64 {
        let n = self.points.len();
        if n < 2 {
            return 0.0;
        }

        (0..n)
            .map(|i| {
                let a = self.points[i];
                let b = self.points[(i + 1) % n];
                (((b.x - a.x) as f64).powi(2) + ((b.y - a.y) as f64).powi(2)).sqrt()
            })
            .sum()
    }

    /// Axis-aligned bounding box; a contour always holds at least one point
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::enclosing(&self.points).unwrap_or(BoundingBox {
            x: 0,
            y: 0,
            width: 0,
            height: 0,
        })
    }
}

/// Ordered contours plus their nesting hierarchy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContourSet {
    contours: Vec<Contour>,
}

impl ContourSet {
    /// Build a set, checking that every parent index points at an earlier
    /// position inside the set
    pub fn new(contours: Vec<Contour>) -> Result<Self> {
        for (i, contour) in contours.iter().enumerate() {
            if let Some(parent) = contour.parent {
                if parent >= i {
                    return Err(MeasureError::invalid_parameter(
                        format!("contours[{}].parent", i),
                        parent,
                    ));
                }
            }
        }
        Ok(Self { contours })
    }

    pub fn len(&self) -> usize {
        self.contours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Contour> {
        self.contours.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Contour> {
        self.contours.iter()
    }

    pub fn as_slice(&self) -> &[Contour] {
        &self.contours
    }

    pub fn parent(&self, index: usize) -> Option<usize> {
        self.contours.get(index).and_then(|c| c.parent)
    }

    /// Indices of contours directly nested in `index`
    pub fn children(&self, index: usize) -> Vec<usize> {
        self.contours
            .iter()
            .enumerate()
            .filter(|(_, c)| c.parent == Some(index))
            .map(|(i, _)| i)
            .collect()
    }

    /// Contours without a parent
    pub fn roots(&self) -> Vec<usize> {
        self.contours
            .iter()
            .enumerate()
            .filter(|(_, c)| c.parent.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of enclosing contours
    pub fn depth(&self, index: usize) -> usize {
        let mut depth = 0;
        let mut current = self.parent(index);
        while let Some(p) = current {
            depth += 1;
            current = self.parent(p);
        }
        depth
    }

    /// Fail with `NoContoursError` when the set is empty
    pub fn require_non_empty(self) -> Result<Self> {
        if self.is_empty() {
            return Err(MeasureError::NoContoursError {
                reason: "segmentation produced no foreground regions".to_string(),
            });
        }
        Ok(self)
    }

    /// Keep the contours matching `keep`, preserving order; each survivor's
    /// parent is re-linked to its nearest surviving ancestor
    pub fn retain_by(self, keep: impl Fn(usize, &Contour) -> bool) -> Self {
        let mut remap: Vec<Option<usize>> = vec![None; self.contours.len()];
        let mut next = 0;
        for (i, contour) in self.contours.iter().enumerate() {
            if keep(i, contour) {
                remap[i] = Some(next);
                next += 1;
            }
        }

        let nearest_kept_ancestor = |start: Option<usize>| {
            let mut current = start;
            while let Some(p) = current {
                if let Some(mapped) = remap[p] {
                    return Some(mapped);
                }
                current = self.contours[p].parent;
            }
            None
        };

        let retained = self
            .contours
            .iter()
            .enumerate()
            .filter(|(i, _)| remap[*i].is_some())
            .map(|(_, c)| Contour {
                points: c.points.clone(),
                kind: c.kind,
                parent: nearest_kept_ancestor(c.parent),
            })
            .collect();

        Self {
            contours: retained,
        }
    }
}

impl<'a> IntoIterator for &'a ContourSet {
    type Item = &'a Contour;
    type IntoIter = std::slice::Iter<'a, Contour>;

    fn into_iter(self) -> Self::IntoIter {
        self.contours.iter()
    }
}

/// Extract contours and their hierarchy from a binary mask
pub fn extract_contours(mask: &BinaryMask, options: ExtractionOptions) -> ContourSet {
    let raw = find_contours::<i32>(mask.as_image());

    let contours: Vec<Contour> = raw
        .into_iter()
        .map(|c| {
            let points: Vec<Point> = c.points.iter().map(|p| Point::new(p.x, p.y)).collect();
            let kind = match c.border_type {
                BorderType::Outer => BorderKind::Outer,
                BorderType::Hole => BorderKind::Hole,
            };
            Contour::new(points, kind, c.parent)
        })
        .collect();
    let all = ContourSet { contours };
    let total = all.len();

    let mut set = match options.retrieval {
        RetrievalMode::All => all,
        RetrievalMode::External => {
            let outermost: Vec<bool> = (0..all.len()).map(|i| is_outermost(&all, i)).collect();
            all.retain_by(|i, _| outermost[i])
        }
    };

    if options.encoding == PointEncoding::Simple {
        for contour in &mut set.contours {
            contour.points = compress_runs(&contour.points);
        }
    }

    log::debug!(
        "extracted {} contours ({} borders, {:?})",
        set.len(),
        total,
        options
    );
    set
}

/// Outer border with no outer border among its ancestors
fn is_outermost(set: &ContourSet, index: usize) -> bool {
    if set.contours[index].kind != BorderKind::Outer {
        return false;
    }
    let mut current = set.contours[index].parent;
    while let Some(p) = current {
        if set.contours[p].kind == BorderKind::Outer {
            return false;
        }
        current = set.contours[p].parent;
    }
    true
}

/// Drop every point lying in the middle of a straight run
fn compress_runs(points: &[Point]) -> Vec<Point> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let step = |a: Point, b: Point| ((b.x - a.x).signum(), (b.y - a.y).signum());

    let kept: Vec<Point> = (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let curr = points[i];
            let next = points[(i + 1) % n];
            step(prev, curr) != step(curr, next)
        })
        .map(|i| points[i])
        .collect();

    // A closed loop always bends somewhere, but keep a point just in case
    if kept.is_empty() {
        vec![points[0]]
    } else {
        kept
    }
}
