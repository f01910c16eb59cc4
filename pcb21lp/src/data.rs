//!
//! # Spacing Model Data
//!
//! Configuration, channel measurements, and the solved-value container for
//! the pitch/stagger spacing program.
//!

// Std-Lib
use std::f64::consts::SQRT_2;

// Crates.io
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

// Local imports
use crate::{SpacingError, SpacingResult};

/// Fanout capacity divisor, as a multiple of the stagger divisor:
/// a fanout lane spans two diagonal-via widths
pub const FANOUT_DIVISOR_FACTOR: f64 = 2.0;

/// # Channel Measurements
///
/// Per-layer, per-position source measurements feeding the program:
/// escape wirelength `e`, channel height over the position `ho`, and the
/// diagonal height `hd` (which enters every derived term scaled by √2).
/// All three are `layers x num` matrices of identical shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChannelMeasurements {
    pub escape: Vec<Vec<f64>>,
    pub channel: Vec<Vec<f64>>,
    pub diagonal: Vec<Vec<f64>>,
}
impl ChannelMeasurements {
    /// Create from the three matrices, checking shape agreement
    pub fn new(
        escape: Vec<Vec<f64>>,
        channel: Vec<Vec<f64>>,
        diagonal: Vec<Vec<f64>>,
    ) -> SpacingResult<Self> {
        let shape = |m: &Vec<Vec<f64>>| (m.len(), m.first().map(Vec::len).unwrap_or(0));
        if shape(&escape) != shape(&channel) || shape(&escape) != shape(&diagonal) {
            return Err(SpacingError::shape("measurement matrices disagree in shape"));
        }
        for m in [&escape, &channel, &diagonal] {
            let (_, num) = shape(m);
            if m.iter().any(|row| row.len() != num) {
                return Err(SpacingError::shape("ragged measurement matrix"));
            }
        }
        Ok(Self {
            escape,
            channel,
            diagonal,
        })
    }
    /// Create uniform matrices of `layers x num`, one value per matrix
    pub fn uniform(layers: usize, num: usize, e: f64, ho: f64, hd: f64) -> Self {
        Self {
            escape: vec![vec![e; num]; layers],
            channel: vec![vec![ho; num]; layers],
            diagonal: vec![vec![hd; num]; layers],
        }
    }
    /// Number of layers covered
    pub fn layers(&self) -> usize {
        self.escape.len()
    }
    /// Number of positions per layer
    pub fn positions(&self) -> usize {
        self.escape.first().map(Vec::len).unwrap_or(0)
    }
    /// Fixed per-position length term: `e + ho + sqrt(2) * hd`
    pub fn fixed(&self, k: usize, i: usize) -> f64 {
        self.escape[k][i] + self.channel[k][i] + SQRT_2 * self.diagonal[k][i]
    }
    /// Capacity headroom above a position: `ho + sqrt(2) * hd`
    pub fn headroom(&self, k: usize, i: usize) -> f64 {
        self.channel[k][i] + SQRT_2 * self.diagonal[k][i]
    }
}

/// Spacing-Objective Enumeration
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum SpacingObjective {
    /// Minimize the last position's combined x-offset across layers
    #[default]
    LastOffset,
    /// Minimize the channel-length envelope top `d_max` directly
    MaxLength,
}

/// # Spacing Model Configuration
///
/// Geometry constants and model switches. Defaults follow the routing
/// workflow's two-layer formulation.
#[derive(Debug, Clone, Builder, Serialize, Deserialize, PartialEq)]
#[builder(pattern = "owned", setter(into))]
pub struct SpacingConfig {
    /// Ordered pin positions per layer
    pub num: usize,
    /// Routing layers
    #[builder(default = "2")]
    pub layers: usize,
    /// Minimum pitch between consecutive same-layer positions (`P`)
    #[builder(default = "9.0")]
    pub pitch: f64,
    /// Channel-length budget (`L`): `d_max - d_min` must fit within it
    #[builder(default = "150.0")]
    pub budget: f64,
    /// Diagonal via diameter (`l_dia`)
    #[builder(default = "5.0")]
    pub via_diameter: f64,
    /// Minimum wire width (`MW`)
    #[builder(default = "5.0")]
    pub min_width: f64,
    /// Serpentine height (`h_sna`)
    #[builder(default = "15.0")]
    pub snake_height: f64,
    /// Objective selection
    #[builder(default)]
    pub objective: SpacingObjective,
    /// Model fanout capacity variables alongside stagger
    #[builder(default)]
    pub fanout: bool,
}
impl SpacingConfig {
    /// Start building a config; only `num` is required
    pub fn builder() -> SpacingConfigBuilder {
        SpacingConfigBuilder::default()
    }
    /// Minimum gap between consecutive positions: `P + (2/sqrt(2)) * l_dia`
    pub fn pitch_gap(&self) -> f64 {
        self.pitch + (2.0 / SQRT_2) * self.via_diameter
    }
    /// Stagger capacity divisor: `(4/sqrt(2)) * l_dia + 2 * MW`
    pub fn stagger_divisor(&self) -> f64 {
        (4.0 / SQRT_2) * self.via_diameter + 2.0 * self.min_width
    }
    /// Fanout capacity divisor: the stagger divisor scaled by
    /// [FANOUT_DIVISOR_FACTOR]
    pub fn fanout_divisor(&self) -> f64 {
        FANOUT_DIVISOR_FACTOR * self.stagger_divisor()
    }
    /// Channel-length cost of one unit of stagger:
    /// `4 * (1 - 1/sqrt(2)) * l_dia + 2 * h_sna`
    pub fn stagger_coeff(&self) -> f64 {
        4.0 * (1.0 - 1.0 / SQRT_2) * self.via_diameter + 2.0 * self.snake_height
    }
    /// Channel-length cost of one unit of fanout:
    /// `2 * (1 - 1/sqrt(2)) * l_dia + h_sna`
    pub fn fanout_coeff(&self) -> f64 {
        2.0 * (1.0 - 1.0 / SQRT_2) * self.via_diameter + self.snake_height
    }
}

/// # Solved Spacing Values
///
/// Per-position values read back from the solver, plus the envelope and
/// objective. Shapes match the configuration: `layers x num`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpacingSolution {
    /// Pin x-offsets `x[k][i]`
    pub positions: Vec<Vec<f64>>,
    /// Stagger capacities `s[k][i]`
    pub stagger: Vec<Vec<f64>>,
    /// Fanout capacities `f[k][i]`, when modeled
    pub fanout: Option<Vec<Vec<f64>>>,
    /// Per-position total channel length
    pub totals: Vec<Vec<f64>>,
    /// Envelope top: no position's total exceeds it
    pub d_max: f64,
    /// Envelope bottom: no position's total is below it
    pub d_min: f64,
    /// Achieved objective value
    pub objective: f64,
}
