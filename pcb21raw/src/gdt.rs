//!
//! # Block-Geometry Import Module
//!
//! Reader for the `.gdt` textual geometry dump, of which only the boundary
//! records `b{<layer> dt<datatype> xy(<x0> <y0> ... <x3> <y3>)}` feed the
//! board model. Everything else in the file (headers, cell wrappers, `t{...}`
//! text records) is skipped, as are structurally malformed `b` records.
//!

// Std-Lib
use std::path::Path;

// Crates.io
use log::debug;

// Local imports
use crate::data::{Block, Point};
use crate::BoardResult;

/// Unit-reconciliation factor between the gdt and address-file coordinate spaces
pub const GDT_UNIT_FACTOR: f64 = 10.0;

/// Layer number marking non-model geometry
const FILTERED_LAYER: i16 = 0;
/// Datatype tag marking non-model geometry
const FILTERED_DATATYPE: i16 = 255;

/// Parse block-geometry content from file `path`.
/// A missing file is fatal; no partial output is produced.
pub fn parse_file(path: impl AsRef<Path>) -> BoardResult<Vec<Block>> {
    let src = crate::read_input(path)?;
    parse_str(&src)
}
/// Parse block-geometry content `src` from string.
/// Returns the surviving [Block]s in file order: records on layer 0 or with
/// datatype 255 are excluded from the geometric model.
pub fn parse_str(src: &str) -> BoardResult<Vec<Block>> {
    let mut blocks = Vec::new();
    let mut filtered = 0usize;
    for line in src.lines() {
        let Some(block) = parse_block(line) else {
            continue;
        };
        if block.layer == FILTERED_LAYER || block.datatype == FILTERED_DATATYPE {
            filtered += 1;
            continue;
        }
        blocks.push(block);
    }
    debug!("gdt: {} blocks kept, {} filtered", blocks.len(), filtered);
    Ok(blocks)
}

/// Extract a [Block] from a single `b{...}` record.
///
/// Corners are taken at positions (0,1) and (4,5) of the flat coordinate
/// list, each coordinate scaled by [GDT_UNIT_FACTOR]. Returns `None` for
/// lines which are not boundary records, or which fail the structural form.
fn parse_block(raw: &str) -> Option<Block> {
    let inner = raw.trim().strip_prefix("b{")?.strip_suffix('}')?;
    let (head, tail) = inner.split_once("xy(")?;
    let coords = tail.strip_suffix(')')?;

    // Head: `<layer> dt<datatype>`, nothing more
    let mut toks = head.split_whitespace();
    let layer: i16 = toks.next()?.parse().ok()?;
    let datatype: i16 = toks.next()?.strip_prefix("dt")?.parse().ok()?;
    if toks.next().is_some() {
        return None;
    }

    let vals: Vec<f64> = coords
        .split_whitespace()
        .map(str::parse)
        .collect::<Result<_, _>>()
        .ok()?;
    if vals.len() < 6 {
        return None;
    }
    Some(Block {
        layer,
        datatype,
        p0: Point::new(vals[0] * GDT_UNIT_FACTOR, vals[1] * GDT_UNIT_FACTOR),
        p1: Point::new(vals[4] * GDT_UNIT_FACTOR, vals[5] * GDT_UNIT_FACTOR),
    })
}
