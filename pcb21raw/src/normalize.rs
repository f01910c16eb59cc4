//!
//! # Joint Coordinate Normalization
//!
//! Maps absolute coordinates from one or more source documents into a shared
//! unit-square space. The bounding box is computed once over the union of
//! every contributing point set, then each point maps independently per axis
//! via `(v - min) / (max - min)` — so pins from an address file and blockage
//! corners from a geometry dump land in one coherent space rather than each
//! being stretched to its own square.
//!

// Crates.io
use serde::{Deserialize, Serialize};

// Local imports
use crate::data::{Block, Net, Point};
use crate::{Axis, BoardError, BoardResult};

/// # Rectangular Bounding Box
///
/// Points `p0` and `p1` represent opposite corners of a bounding rectangle.
/// `p0` is always closest to negative-infinity, in both x and y,
/// and `p1` is always closest to positive-infinity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoundBox {
    pub p0: Point,
    pub p1: Point,
}
impl BoundBox {
    /// Create an empty, otherwise invalid [BoundBox]
    pub fn empty() -> Self {
        Self {
            p0: Point::new(f64::INFINITY, f64::INFINITY),
            p1: Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }
    /// Boolean indication of whether a box is empty
    pub fn is_empty(&self) -> bool {
        self.p0.x > self.p1.x || self.p0.y > self.p1.y
    }
    /// Expand to include [Point] `pt`
    pub fn union_point(&mut self, pt: Point) {
        self.p0.x = self.p0.x.min(pt.x);
        self.p0.y = self.p0.y.min(pt.y);
        self.p1.x = self.p1.x.max(pt.x);
        self.p1.y = self.p1.y.max(pt.y);
    }
    /// Create a [BoundBox] over every point in `points`
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Self {
        let mut bbox = Self::empty();
        for pt in points {
            bbox.union_point(pt);
        }
        bbox
    }
    /// Get the box's size as an (x,y) tuple
    pub fn size(&self) -> (f64, f64) {
        (self.p1.x - self.p0.x, self.p1.y - self.p0.y)
    }
}

/// # Unit-Square Mapper
///
/// Fitted over a joint [BoundBox] and applied point-by-point. Fitting fails
/// with [BoardError::DegenerateRange] when an axis has zero span (or when no
/// points were supplied), rather than dividing by zero later.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct UnitSquare {
    bbox: BoundBox,
}
impl UnitSquare {
    /// Fit a mapper over the union of `points`
    pub fn fit(points: impl IntoIterator<Item = Point>) -> BoardResult<Self> {
        let bbox = BoundBox::from_points(points);
        let (dx, dy) = bbox.size();
        if !(dx > 0.0) {
            return Err(BoardError::DegenerateRange { axis: Axis::X });
        }
        if !(dy > 0.0) {
            return Err(BoardError::DegenerateRange { axis: Axis::Y });
        }
        Ok(Self { bbox })
    }
    /// Get the fitted joint bounding box
    pub fn bbox(&self) -> &BoundBox {
        &self.bbox
    }
    /// Map `pt` into the unit square, independently per axis
    pub fn apply(&self, pt: Point) -> Point {
        let (dx, dy) = self.bbox.size();
        Point::new((pt.x - self.bbox.p0.x) / dx, (pt.y - self.bbox.p0.y) / dy)
    }
}

/// Normalize address-file nets and geometry blocks jointly.
///
/// One bounding box is fitted over every pin coordinate and both corners of
/// every block; new copies of both sets are returned with coordinates mapped
/// into the shared unit square. Pins without coordinates pass through
/// untouched.
pub fn normalize_joint(nets: &[Net], blocks: &[Block]) -> BoardResult<(Vec<Net>, Vec<Block>)> {
    let pin_points = nets
        .iter()
        .flat_map(|n| n.pins.iter())
        .filter_map(|p| p.coord);
    let corner_points = blocks.iter().flat_map(|b| [b.p0, b.p1]);
    let space = UnitSquare::fit(pin_points.chain(corner_points))?;

    let nets = nets
        .iter()
        .map(|net| {
            let mut net = net.clone();
            for pin in net.pins.iter_mut() {
                pin.coord = pin.coord.map(|c| space.apply(c));
            }
            net
        })
        .collect();
    let blocks = blocks
        .iter()
        .map(|b| Block {
            p0: space.apply(b.p0),
            p1: space.apply(b.p1),
            ..b.clone()
        })
        .collect();
    Ok((nets, blocks))
}
