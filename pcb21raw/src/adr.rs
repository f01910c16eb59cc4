//!
//! # Address-File Import Module
//!
//! Reader for the `.adr` coordinate format: interleaved `<k>-pin nets: <count>`
//! headers and net blocks (`NetName: <name>` followed by `<comp>.<pin> <x>,<y>`
//! coordinate lines). The declared net count on each header is informational
//! and deliberately not verified here.
//!
//! A finalized net files under whichever header was most recently seen when
//! its lines were read, however many nets intervene before the next header.
//!

// Std-Lib
use std::collections::BTreeMap;
use std::path::Path;

// Crates.io
use log::{debug, warn};
use serde::{Deserialize, Serialize};

// Local imports
use crate::categorize::NetCategoryIndex;
use crate::data::{Component, Net, NetRegistry, Pin, Point};
use crate::BoardResult;

/// # Parsed Address Document
///
/// Nets with coordinate-bearing pins, the components those pins referenced,
/// and the header-declared category index.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AdrDocument {
    pub nets: Vec<Net>,
    /// Referenced components, by name. Origins are unknown to this format.
    pub components: BTreeMap<String, Component>,
    pub categories: NetCategoryIndex,
}

/// Parse address-file content from file `path`.
/// A missing file is fatal; no partial output is produced.
pub fn parse_file(path: impl AsRef<Path>, registry: &mut NetRegistry) -> BoardResult<AdrDocument> {
    let src = crate::read_input(path)?;
    parse_str(&src, registry)
}
/// Parse address-file content `src` from string
pub fn parse_str(src: &str, registry: &mut NetRegistry) -> BoardResult<AdrDocument> {
    AdrParser::new(registry).parse(src)
}

/// Per-line classification of the address-file grammar
enum AdrLine<'l> {
    Blank,
    Comment,
    /// `<k>-pin nets: <count>`: declares the current bucket
    Header { pin_count: usize },
    /// `NetName: <name>`: opens a net, implicitly finalizing any open one
    NetName(&'l str),
    /// `<comp>.<pin> <x>,<y>`
    Pin {
        component: &'l str,
        pin: &'l str,
        x: f64,
        y: f64,
    },
    /// `PIN START` / `PIN END` bracket markers, carried over from the
    /// netlist form; skipped here
    Bracket,
    Other,
}

/// # Address-File Parser
pub struct AdrParser<'r> {
    /// Session-scoped net-identity registry
    registry: &'r mut NetRegistry,
}
impl<'r> AdrParser<'r> {
    pub fn new(registry: &'r mut NetRegistry) -> Self {
        Self { registry }
    }
    /// Parse `src`, consuming the parser
    pub fn parse(mut self, src: &str) -> BoardResult<AdrDocument> {
        let mut doc = AdrDocument::default();
        // Bucket declared by the most recently seen header
        let mut bucket: Option<usize> = None;
        let mut open: Option<Net> = None;

        for (lineno, raw) in src.lines().enumerate() {
            match classify(raw) {
                AdrLine::Blank | AdrLine::Comment | AdrLine::Bracket => (),
                AdrLine::Header { pin_count } => {
                    // Finalize under the header in effect while the net's
                    // lines were read, then switch buckets
                    Self::finalize(&mut doc, bucket, open.take());
                    bucket = Some(pin_count);
                }
                AdrLine::NetName(name) => {
                    Self::finalize(&mut doc, bucket, open.take());
                    let id = self.registry.id_for(name);
                    open = Some(Net::new(id, name));
                }
                AdrLine::Pin {
                    component,
                    pin,
                    x,
                    y,
                } => match open.as_mut() {
                    Some(net) => {
                        net.add_pin(Pin {
                            name: pin.to_string(),
                            component: component.to_string(),
                            coord: Some(Point::new(x, y)),
                            ..Default::default()
                        });
                        doc.components
                            .entry(component.to_string())
                            .or_insert_with(|| Component::new(component));
                    }
                    None => warn!("line {}: coordinate line with no open net, skipped", lineno + 1),
                },
                AdrLine::Other => {
                    warn!("line {}: unrecognized address line, skipped", lineno + 1);
                }
            }
        }
        Self::finalize(&mut doc, bucket, open.take());
        debug!(
            "adr: {} nets, {} components, {} buckets",
            doc.nets.len(),
            doc.components.len(),
            doc.categories.num_buckets()
        );
        Ok(doc)
    }
    /// File a finalized net under `bucket`.
    /// Nets finalized with zero pins are dropped; a net closed before any
    /// header has been seen falls back to its observed pin count.
    fn finalize(doc: &mut AdrDocument, bucket: Option<usize>, net: Option<Net>) {
        let Some(net) = net else { return };
        if net.pins.is_empty() {
            return;
        }
        doc.categories
            .insert(bucket.unwrap_or(net.pins.len()), net.id);
        doc.nets.push(net);
    }
}

/// Classify a single source line
fn classify(raw: &str) -> AdrLine {
    let line = raw.trim();
    if line.is_empty() {
        return AdrLine::Blank;
    }
    if line.starts_with('#') {
        return AdrLine::Comment;
    }
    if line == "PIN START" || line == "PIN END" {
        return AdrLine::Bracket;
    }
    if let Some(name) = line.strip_prefix("NetName:") {
        let name = name.trim();
        return match name.is_empty() {
            true => AdrLine::Other,
            false => AdrLine::NetName(name),
        };
    }
    if let Some((k, count)) = line.split_once("-pin nets:") {
        // Both halves must be numeric; the count is informational only
        if let (Ok(pin_count), Ok(_count)) =
            (k.trim().parse::<usize>(), count.trim().parse::<usize>())
        {
            return AdrLine::Header { pin_count };
        }
        return AdrLine::Other;
    }
    classify_pin(line)
}

/// Classify a candidate coordinate line: `<comp>.<pin> <x>,<y>`.
/// Whitespace around the comma is tolerated.
fn classify_pin(line: &str) -> AdrLine {
    let Some((dotted, coords)) = line.split_once(char::is_whitespace) else {
        return AdrLine::Other;
    };
    let Some((component, pin)) = dotted.split_once('.') else {
        return AdrLine::Other;
    };
    if component.is_empty() || pin.is_empty() {
        return AdrLine::Other;
    }
    let joined: String = coords.split_whitespace().collect();
    let Some((x, y)) = joined.split_once(',') else {
        return AdrLine::Other;
    };
    match (x.parse::<f64>(), y.parse::<f64>()) {
        (Ok(x), Ok(y)) => AdrLine::Pin {
            component,
            pin,
            x,
            y,
        },
        _ => AdrLine::Other,
    }
}
