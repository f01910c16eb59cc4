//!
//! # Vertex-JSON Import Module
//!
//! Reader for the routing graph's vertex dump: a JSON array of tagged records,
//! `type` selecting among `VertexProperties` (plain), `PinVertex` (carries
//! `name`), and `TileVertex` (carries a single-letter `tileType`).
//!
//! Vertex identity is the integer `(x, y)` pair. Records sharing a coordinate
//! collapse into one node; later records overwrite earlier ones field-by-field
//! rather than replacing the node wholesale. An unrecognized `type` is a fatal
//! error for the parse, never defaulted to a plain vertex.
//!

// Std-Lib
use std::collections::BTreeMap;
use std::path::Path;

// Crates.io
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// Local imports
use crate::data::{GridPoint, Vertex, VertexKind};
use crate::{BoardError, BoardResult};

/// The closed set of recognized `type` tags
const KNOWN_TAGS: [&str; 3] = ["VertexProperties", "PinVertex", "TileVertex"];

/// # Vertex Graph
///
/// Graph nodes keyed (and ordered) by integer coordinate.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VertexGraph {
    nodes: BTreeMap<GridPoint, Vertex>,
}
impl VertexGraph {
    /// Get the node at `coord`, if present
    pub fn get(&self, coord: GridPoint) -> Option<&Vertex> {
        self.nodes.get(&coord)
    }
    /// Iterate nodes in coordinate order
    pub fn iter(&self) -> impl Iterator<Item = &Vertex> {
        self.nodes.values()
    }
    /// Number of distinct nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    /// Boolean indication of an empty graph
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
    /// Merge `record` into the graph: the kind tag is last-write-wins, and
    /// payload fields accumulate across colliding records.
    fn merge(&mut self, record: VertexRecord) -> BoardResult<()> {
        let coord = match &record {
            VertexRecord::Plain { coordinate }
            | VertexRecord::Pin { coordinate, .. }
            | VertexRecord::Tile { coordinate, .. } => GridPoint::new(coordinate.x, coordinate.y),
        };
        let node = self.nodes.entry(coord).or_insert_with(|| Vertex {
            coord,
            kind: VertexKind::Plain,
            pin_name: None,
            tile_type: None,
        });
        match record {
            VertexRecord::Plain { .. } => node.kind = VertexKind::Plain,
            VertexRecord::Pin { name, .. } => {
                node.kind = VertexKind::Pin;
                if let Some(name) = name {
                    node.pin_name = Some(name);
                }
            }
            VertexRecord::Tile { tile_type, .. } => {
                node.kind = VertexKind::Tile;
                if let Some(t) = tile_type {
                    node.tile_type = Some(single_letter(&t)?);
                }
            }
        }
        Ok(())
    }
}

/// Raw wire record, internally tagged by `type`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
enum VertexRecord {
    #[serde(rename = "VertexProperties")]
    Plain { coordinate: RawCoordinate },
    #[serde(rename = "PinVertex")]
    Pin {
        coordinate: RawCoordinate,
        name: Option<String>,
    },
    #[serde(rename = "TileVertex")]
    Tile {
        coordinate: RawCoordinate,
        #[serde(rename = "tileType")]
        tile_type: Option<String>,
    },
}
#[derive(Debug, Clone, Copy, Deserialize)]
struct RawCoordinate {
    x: i64,
    y: i64,
}

/// Parse vertex-JSON content from file `path`.
/// A missing file is fatal; no partial output is produced.
pub fn parse_file(path: impl AsRef<Path>) -> BoardResult<VertexGraph> {
    let src = crate::read_input(path)?;
    parse_str(&src)
}
/// Parse vertex-JSON content `src` from string
pub fn parse_str(src: &str) -> BoardResult<VertexGraph> {
    let records: Vec<Value> = serde_json::from_str(src)?;
    let mut graph = VertexGraph::default();
    for value in records {
        // Check the tag against the closed set first, so an unknown kind
        // surfaces as [BoardError::UnrecognizedVertexType] rather than a
        // generic deserialization message
        let tag = value.get("type").and_then(Value::as_str).unwrap_or("");
        if !KNOWN_TAGS.contains(&tag) {
            return Err(BoardError::UnrecognizedVertexType {
                found: tag.to_string(),
            });
        }
        let record: VertexRecord = serde_json::from_value(value)?;
        graph.merge(record)?;
    }
    debug!("vertex: {} nodes", graph.len());
    Ok(graph)
}

/// Require a single-letter tile type
fn single_letter(s: &str) -> BoardResult<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => BoardError::fail(format!("tileType must be a single letter, got {s:?}")),
    }
}
