//!
//! # Board Data Model
//!
//! Canonical entities produced by the format parsers. All entities are built
//! during a single parse pass over one document and are immutable thereafter;
//! the only state shared across parse calls is an explicitly passed
//! [`NetRegistry`].
//!

// Std-Lib
use std::collections::HashMap;

// Crates.io
use derive_more::{Add, AddAssign, Sub, SubAssign};
use serde::{Deserialize, Serialize};

/// # Point in two-dimensional board-space
///
/// Coordinates are `f64`-valued, in whatever units the source document uses.
#[derive(
    Debug, Copy, Clone, Default, Add, AddAssign, Sub, SubAssign, Serialize, Deserialize, PartialEq,
)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}
impl Point {
    /// Create a new [Point] from (x,y) coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// # Integer-Valued Grid Point
///
/// Identity key for graph vertices: two records sharing a [GridPoint]
/// describe the same node.
#[derive(
    Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct GridPoint {
    pub x: i64,
    pub y: i64,
}
impl GridPoint {
    /// Create a new [GridPoint] from (x,y) coordinates
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Net identifier.
/// Assigned monotonically in first-seen order by a [NetRegistry].
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NetId(pub usize);

/// # Net-Identity Registry
///
/// Maps net names to stable ids, assigned in first-seen order.
/// Scoped to one parsing session and passed by reference into each parser
/// call; sharing one registry across several documents gives their nets a
/// single consistent id space.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetRegistry {
    /// Names in id order
    names: Vec<String>,
    /// Name => Id Lookup
    ids: HashMap<String, NetId>,
}
impl NetRegistry {
    /// Create a new and empty registry
    pub fn new() -> Self {
        Self::default()
    }
    /// Get the id for `name`, assigning the next id on first sight
    pub fn id_for(&mut self, name: &str) -> NetId {
        if let Some(id) = self.ids.get(name) {
            return *id;
        }
        let id = NetId(self.names.len());
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        id
    }
    /// Get the id for `name`, if it has been seen
    pub fn get(&self, name: &str) -> Option<NetId> {
        self.ids.get(name).copied()
    }
    /// Get the name registered for `id`
    pub fn name(&self, id: NetId) -> Option<&str> {
        self.names.get(id.0).map(String::as_str)
    }
    /// Number of registered nets
    pub fn len(&self) -> usize {
        self.names.len()
    }
    /// Boolean indication of an empty registry
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// # Pin
///
/// Connection point on a component instance.
/// Holds back-references to its component and net, not ownership.
/// The coordinate is absent for formats which do not carry one (the netlist),
/// as is the layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Pin {
    /// Pin Name
    pub name: String,
    /// Owning component-instance name
    pub component: String,
    /// Net back-reference
    pub net: Option<NetId>,
    /// Location, in source units
    pub coord: Option<Point>,
    /// Layer index
    pub layer: Option<i16>,
    /// Trailing attribute field, as carried by the netlist pin form
    pub attr: Option<String>,
}

/// # Net
///
/// Set of electrically connected pins, in discovery order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Net {
    /// Stable id, from the session's [NetRegistry]
    pub id: NetId,
    /// Net Name
    pub name: String,
    /// Member pins, in file order
    pub pins: Vec<Pin>,
}
impl Net {
    /// Create a new, thus far pin-less [Net]
    pub fn new(id: NetId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            pins: Vec::new(),
        }
    }
    /// Append `pin`, stamping our id as its net back-reference
    pub fn add_pin(&mut self, mut pin: Pin) {
        pin.net = Some(self.id);
        self.pins.push(pin);
    }
}

/// # Component
///
/// Identity plus physical origin. Has no lifecycle of its own beyond being
/// referenced by pins and tiles; the origin is known only to formats which
/// carry placement (the tile report), and absent otherwise.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Component {
    /// Component-Instance Name
    pub name: String,
    /// Bottom-left placement origin, where known
    pub origin: Option<Point>,
}
impl Component {
    /// Create a new [Component] named `name`, with unknown origin
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            origin: None,
        }
    }
}

/// # Tile
///
/// Fixed-size grid cell over a component's routing area.
/// Tile width and height are a single global pair per document, carried on
/// [crate::tiles::TileDocument] rather than per-tile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tile {
    /// Row index within the component's tile array
    pub row: usize,
    /// Column index within the component's tile array
    pub col: usize,
    /// Bottom-Left Corner Point
    pub origin: Point,
    /// Z coordinate, as written in the source tuple
    pub z: i16,
    /// Layer index
    pub layer: i16,
    /// Owning component-instance name
    pub component: String,
}

/// # Blockage Rectangle
///
/// Disallowed-routing region, defined by two opposite corners on a layer,
/// tagged with the source datatype.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Block {
    /// Layer Number
    pub layer: i16,
    /// Datatype Tag
    pub datatype: i16,
    /// First Corner Point
    pub p0: Point,
    /// Opposite Corner Point
    pub p1: Point,
}

/// Vertex-Kind Enumeration
///
/// Closed set of graph-node variants, resolved once at parse time.
/// Unknown kinds are rejected by the parser, never defaulted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum VertexKind {
    Plain,
    Pin,
    Tile,
}

/// # Graph Vertex
///
/// Node keyed by its integer coordinate. The `kind` tag reflects the last
/// record seen for the coordinate; payload fields accumulate field-by-field
/// across colliding records, so a node can retain a pin name from one record
/// and a tile type from a later one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vertex {
    /// Identity Coordinate
    pub coord: GridPoint,
    /// Kind tag, last-write-wins
    pub kind: VertexKind,
    /// Pin-Vertex Payload
    pub pin_name: Option<String>,
    /// Tile-Vertex Payload: single-letter tile type
    pub tile_type: Option<char>,
}
