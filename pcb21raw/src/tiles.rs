//!
//! # Tile-Report Import Module
//!
//! Reader for the per-component tile report: `Component Name:` sections listing
//! pin placements and the tile array per layer, plus the document-global tile
//! width/height pair.
//!

// Std-Lib
use std::path::Path;

// Crates.io
use log::{debug, warn};
use serde::{Deserialize, Serialize};

// Local imports
use crate::data::{Component, Pin, Point, Tile};
use crate::{BoardError, BoardResult};

/// # Parsed Tile Report
///
/// Per-component pins and tiles, plus the single global tile-size pair the
/// document declares.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TileDocument {
    pub components: Vec<TileComponent>,
    /// Global tile width, one value per document
    pub tile_width: f64,
    /// Global tile height, one value per document
    pub tile_height: f64,
}

/// One component section of the tile report
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TileComponent {
    /// Identity and placement origin (bottom-left-most tile corner)
    pub component: Component,
    /// Pin placements, in file order
    pub pins: Vec<Pin>,
    /// Tiles, in file order
    pub tiles: Vec<Tile>,
}

/// Parse tile-report content from file `path`.
/// A missing file is fatal; no partial output is produced.
pub fn parse_file(path: impl AsRef<Path>) -> BoardResult<TileDocument> {
    let src = crate::read_input(path)?;
    parse_str(&src)
}
/// Parse tile-report content `src` from string
pub fn parse_str(src: &str) -> BoardResult<TileDocument> {
    TileParser::default().parse(src)
}

/// Per-line classification of the tile report
enum TileLine<'l> {
    Blank,
    ComponentName(&'l str),
    /// `Pins:` / `Tiles:` section markers
    Section,
    LayerHeader(i16),
    PinName {
        name: &'l str,
        x: f64,
        y: f64,
        z: i16,
    },
    TileOrigin {
        row: usize,
        col: usize,
        x: f64,
        y: f64,
        z: i16,
    },
    TileWidth(f64),
    TileHeight(f64),
    Other,
}

/// # Tile-Report Parser
#[derive(Default)]
pub struct TileParser {
    components: Vec<TileComponent>,
    /// Section under construction
    open: Option<TileComponent>,
    /// Layer header in effect for subsequent tiles
    layer: i16,
    tile_width: Option<f64>,
    tile_height: Option<f64>,
}
impl TileParser {
    /// Parse `src`, consuming the parser
    pub fn parse(mut self, src: &str) -> BoardResult<TileDocument> {
        for (lineno, raw) in src.lines().enumerate() {
            match classify(raw) {
                TileLine::Blank | TileLine::Section => (),
                TileLine::ComponentName(name) => {
                    self.finalize();
                    self.layer = 0;
                    self.open = Some(TileComponent {
                        component: Component::new(name),
                        ..Default::default()
                    });
                }
                TileLine::LayerHeader(layer) => self.layer = layer,
                TileLine::PinName { name, x, y, z } => match self.open.as_mut() {
                    Some(section) => section.pins.push(Pin {
                        name: name.to_string(),
                        component: section.component.name.clone(),
                        coord: Some(Point::new(x, y)),
                        layer: Some(z),
                        ..Default::default()
                    }),
                    None => warn!("line {}: pin before any component, skipped", lineno + 1),
                },
                TileLine::TileOrigin { row, col, x, y, z } => {
                    let layer = self.layer;
                    match self.open.as_mut() {
                        Some(section) => section.tiles.push(Tile {
                            row,
                            col,
                            origin: Point::new(x, y),
                            z,
                            layer,
                            component: section.component.name.clone(),
                        }),
                        None => warn!("line {}: tile before any component, skipped", lineno + 1),
                    }
                }
                TileLine::TileWidth(w) => self.tile_width = Some(w),
                TileLine::TileHeight(h) => self.tile_height = Some(h),
                TileLine::Other => {
                    warn!("line {}: unrecognized tile-report line, skipped", lineno + 1)
                }
            }
        }
        self.finalize();
        // The global tile-size pair is required: exactly one per document
        let (Some(tile_width), Some(tile_height)) = (self.tile_width, self.tile_height) else {
            return Err(BoardError::msg("tile report missing global tile width/height"));
        };
        debug!(
            "tiles: {} components, tile size {}x{}",
            self.components.len(),
            tile_width,
            tile_height
        );
        Ok(TileDocument {
            components: self.components,
            tile_width,
            tile_height,
        })
    }
    /// Close the open component section, deriving its placement origin from
    /// the bottom-left-most tile corner
    fn finalize(&mut self) {
        let Some(mut section) = self.open.take() else {
            return;
        };
        section.component.origin = section
            .tiles
            .iter()
            .map(|t| t.origin)
            .reduce(|a, b| Point::new(a.x.min(b.x), a.y.min(b.y)));
        self.components.push(section);
    }
}

/// Classify a single source line
fn classify(raw: &str) -> TileLine {
    let line = raw.trim();
    if line.is_empty() {
        return TileLine::Blank;
    }
    if line == "Pins:" || line == "Tiles:" {
        return TileLine::Section;
    }
    if let Some(name) = line.strip_prefix("Component Name:") {
        let name = name.trim();
        return match name.is_empty() {
            true => TileLine::Other,
            false => TileLine::ComponentName(name),
        };
    }
    if let Some(rest) = line.strip_prefix("Layer ") {
        if let Some(layer) = rest.strip_suffix(':').and_then(|n| n.parse().ok()) {
            return TileLine::LayerHeader(layer);
        }
        return TileLine::Other;
    }
    if let Some(rest) = line.strip_prefix("Pin Name:") {
        let Some((name, tail)) = rest.trim().split_once(" (") else {
            return TileLine::Other;
        };
        let Some((x, y, z)) = triple(tail) else {
            return TileLine::Other;
        };
        return TileLine::PinName { name, x, y, z };
    }
    if let Some(rest) = line.strip_prefix("Tile [") {
        return classify_tile(rest);
    }
    if let Some(rest) = line.strip_prefix("Minimum Non-Zero X Offset(Tile Width):") {
        return match rest.trim().parse() {
            Ok(w) => TileLine::TileWidth(w),
            Err(_) => TileLine::Other,
        };
    }
    if let Some(rest) = line.strip_prefix("Minimum Non-Zero Y Offset(Tile Height):") {
        return match rest.trim().parse() {
            Ok(h) => TileLine::TileHeight(h),
            Err(_) => TileLine::Other,
        };
    }
    TileLine::Other
}

/// Classify the remainder of a `Tile [<row>][<col>] Bottom Left: (<x> <y> <z>)` line,
/// starting just past the first bracket
fn classify_tile(rest: &str) -> TileLine {
    let parsed = (|| {
        let (row, rest) = rest.split_once("][")?;
        let (col, rest) = rest.split_once(']')?;
        let tail = rest.trim().strip_prefix("Bottom Left:")?.trim().strip_prefix('(')?;
        let (x, y, z) = triple(tail)?;
        Some(TileLine::TileOrigin {
            row: row.parse().ok()?,
            col: col.parse().ok()?,
            x,
            y,
            z,
        })
    })();
    parsed.unwrap_or(TileLine::Other)
}

/// Parse the `<x> <y> <z>)` coordinate tail shared by pin and tile lines
fn triple(tail: &str) -> Option<(f64, f64, i16)> {
    let inner = tail.trim().strip_suffix(')')?;
    let mut vals = inner.split_whitespace();
    let x: f64 = vals.next()?.parse().ok()?;
    let y: f64 = vals.next()?.parse().ok()?;
    let z: f64 = vals.next()?.parse().ok()?;
    if vals.next().is_some() {
        return None;
    }
    Some((x, y, z as i16))
}
