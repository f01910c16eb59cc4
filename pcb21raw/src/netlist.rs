//!
//! # Netlist Import Module
//!
//! Reader for the routing workflow's `.netlist` format: `NetName <name>`
//! directives, `PIN START`/`PIN END` brackets, and pin lines identified by a
//! recognized component-family prefix. Comment (`#`) lines are skipped, as is
//! anything unrecognized inside a bracket.
//!

// Std-Lib
use std::path::Path;

// Crates.io
use log::{debug, warn};
use serde::{Deserialize, Serialize};

// Local imports
use crate::categorize::NetCategoryIndex;
use crate::data::{Net, NetRegistry, Pin};
use crate::BoardResult;

/// Component-family prefixes recognized as pin lines by default
pub const DEFAULT_FAMILIES: [&str; 2] = ["U", "IC"];

/// # Parsed Netlist Document
///
/// One [Net] per pin bracket, in file order, plus the pin-count category
/// index over those nets.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Netlist {
    pub nets: Vec<Net>,
    pub categories: NetCategoryIndex,
}

/// Parse netlist content from file `path`.
/// A missing file is fatal; no partial output is produced.
pub fn parse_file(path: impl AsRef<Path>, registry: &mut NetRegistry) -> BoardResult<Netlist> {
    let src = crate::read_input(path)?;
    parse_str(&src, registry)
}
/// Parse netlist content `src` from string
pub fn parse_str(src: &str, registry: &mut NetRegistry) -> BoardResult<Netlist> {
    NetlistParser::new(registry).parse(src)
}

/// Per-line classification of the netlist grammar
enum NetlistLine<'l> {
    Blank,
    Comment,
    NetName(&'l str),
    PinStart,
    PinEnd,
    Pin {
        component: &'l str,
        pin: &'l str,
        attr: &'l str,
    },
    Other,
}

/// # Netlist Parser
///
/// Line-classification state machine over one document. Nets finalize at each
/// `PIN END`; a bracket yielding zero recognized pins produces no [Net] and no
/// category entry.
pub struct NetlistParser<'r> {
    /// Session-scoped net-identity registry
    registry: &'r mut NetRegistry,
    /// Recognized component-family prefixes
    families: Vec<String>,
}
impl<'r> NetlistParser<'r> {
    /// Create a parser with the default `U`/`IC` component families
    pub fn new(registry: &'r mut NetRegistry) -> Self {
        Self::with_families(registry, &DEFAULT_FAMILIES)
    }
    /// Create a parser recognizing pin lines by the prefixes in `families`
    pub fn with_families(registry: &'r mut NetRegistry, families: &[&str]) -> Self {
        Self {
            registry,
            families: families.iter().map(|f| f.to_string()).collect(),
        }
    }
    /// Parse `src`, consuming the parser
    pub fn parse(mut self, src: &str) -> BoardResult<Netlist> {
        let mut nets: Vec<Net> = Vec::new();
        let mut categories = NetCategoryIndex::default();
        let mut net_name: Option<String> = None;
        let mut in_bracket = false;
        let mut pins: Vec<Pin> = Vec::new();

        for (lineno, raw) in src.lines().enumerate() {
            match self.classify(raw) {
                NetlistLine::Blank | NetlistLine::Comment => (),
                NetlistLine::NetName(name) => {
                    net_name = Some(name.to_string());
                    pins.clear();
                }
                NetlistLine::PinStart => {
                    in_bracket = true;
                    pins.clear();
                }
                NetlistLine::PinEnd => {
                    in_bracket = false;
                    if pins.is_empty() {
                        continue; // Zero recognized pins: no net, no category entry
                    }
                    // The net name stays current across brackets: a second
                    // bracket under one `NetName` yields a second net with the
                    // same name, and the registry hands back the same id.
                    match net_name.clone() {
                        Some(name) => {
                            let id = self.registry.id_for(&name);
                            let mut net = Net::new(id, name);
                            for pin in pins.drain(..) {
                                net.add_pin(pin);
                            }
                            categories.insert(net.pins.len(), id);
                            nets.push(net);
                        }
                        None => {
                            warn!("line {}: pin bracket with no open net, skipped", lineno + 1);
                            pins.clear();
                        }
                    }
                }
                NetlistLine::Pin {
                    component,
                    pin,
                    attr,
                } => {
                    // Pin lines only count inside a bracket
                    if in_bracket {
                        pins.push(Pin {
                            name: pin.to_string(),
                            component: component.to_string(),
                            attr: Some(attr.to_string()),
                            ..Default::default()
                        });
                    }
                }
                NetlistLine::Other => {
                    // Unrecognized lines inside a bracket are silently ignored
                    if !in_bracket {
                        warn!("line {}: unrecognized netlist line, skipped", lineno + 1);
                    }
                }
            }
        }
        debug!(
            "netlist: {} nets across {} buckets",
            nets.len(),
            categories.num_buckets()
        );
        Ok(Netlist { nets, categories })
    }
    /// Classify a single source line
    fn classify<'l>(&self, raw: &'l str) -> NetlistLine<'l> {
        let line = raw.trim();
        if line.is_empty() {
            return NetlistLine::Blank;
        }
        if line.starts_with('#') {
            return NetlistLine::Comment;
        }
        if line.contains("PIN START") {
            return NetlistLine::PinStart;
        }
        if line.contains("PIN END") {
            return NetlistLine::PinEnd;
        }
        if let Some(rest) = line.strip_prefix("NetName") {
            // `NetName <name>`; a nameless directive is malformed
            return match rest.split_whitespace().next() {
                Some(name) => NetlistLine::NetName(name),
                None => NetlistLine::Other,
            };
        }
        self.classify_pin(line)
    }
    /// Classify a candidate pin line: `<Family><inst>.<pin> <attr>`
    fn classify_pin<'l>(&self, line: &'l str) -> NetlistLine<'l> {
        let mut fields = line.split_whitespace();
        let (Some(dotted), Some(attr)) = (fields.next(), fields.next()) else {
            return NetlistLine::Other;
        };
        let Some((component, pin)) = dotted.split_once('.') else {
            return NetlistLine::Other;
        };
        if pin.is_empty() || !self.families.iter().any(|f| component.starts_with(f.as_str())) {
            return NetlistLine::Other;
        }
        NetlistLine::Pin {
            component,
            pin,
            attr,
        }
    }
}
