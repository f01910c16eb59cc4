//!
//! # CSV Emission
//!
//! Comma-joined per-layer emission of solved values: one line per layer.
//!

// Std-Lib
use std::io::Write;

// Local imports
use crate::data::SpacingSolution;
use crate::SpacingResult;

/// Write `rows` as comma-joined lines, one per layer
pub fn write_rows(dest: &mut impl Write, rows: &[Vec<f64>]) -> SpacingResult<()> {
    for row in rows {
        let line = row
            .iter()
            .map(f64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        writeln!(dest, "{}", line)?;
    }
    Ok(())
}

/// Write the solved pin x-offsets, one line per layer
pub fn write_positions(dest: &mut impl Write, solution: &SpacingSolution) -> SpacingResult<()> {
    write_rows(dest, &solution.positions)
}

/// Write the solved stagger capacities, one line per layer
pub fn write_stagger(dest: &mut impl Write, solution: &SpacingSolution) -> SpacingResult<()> {
    write_rows(dest, &solution.stagger)
}
