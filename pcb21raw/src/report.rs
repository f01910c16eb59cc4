//!
//! # Category Report Emission
//!
//! Text emission of the pin-count category report, at the workflow's three
//! verbosity levels: bucket counts alone, counts plus the per-bucket pin
//! occurrence tally, or the full categorized netlist re-emission.
//!

// Std-Lib
use std::collections::HashMap;
use std::io::Write;

// Local imports
use crate::categorize::{pin_occurrences, NetCategoryIndex};
use crate::data::{Net, NetId};
use crate::BoardResult;

/// Report verbosity levels, lowest to highest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Bucket counts only
    #[default]
    Counts,
    /// Counts plus per-bucket pin occurrences
    Occurrences,
    /// Occurrences plus the categorized netlist itself
    Full,
}

/// Write the category report for `nets`/`index` to `dest`.
///
/// Buckets emit in ascending pin-count order; within a bucket, nets keep
/// their discovery order.
pub fn write_report(
    dest: &mut impl Write,
    nets: &[Net],
    index: &NetCategoryIndex,
    verbosity: Verbosity,
) -> BoardResult<()> {
    let by_id: HashMap<NetId, &Net> = nets.iter().map(|n| (n.id, n)).collect();
    let tallies = match verbosity >= Verbosity::Occurrences {
        true => Some(pin_occurrences(index, nets)),
        false => None,
    };
    for (bucket, ids) in index.iter() {
        if verbosity >= Verbosity::Full {
            for id in ids {
                let Some(net) = by_id.get(id) else { continue };
                writeln!(dest, "NetName: {}", net.name)?;
                writeln!(dest, "PIN START")?;
                for pin in &net.pins {
                    match &pin.attr {
                        Some(attr) => {
                            writeln!(dest, "    {}.{} {}", pin.component, pin.name, attr)?
                        }
                        None => writeln!(dest, "    {}.{}", pin.component, pin.name)?,
                    }
                }
                writeln!(dest, "PIN END")?;
            }
        }
        writeln!(dest, "{}-pin nets: {}", bucket, ids.len())?;
        if let Some(tallies) = &tallies {
            writeln!(dest, "Occurrences of each pin:")?;
            if let Some(tally) = tallies.get(&bucket) {
                for (name, count) in tally {
                    writeln!(dest, "{} : {}", name, count)?;
                }
            }
            writeln!(dest)?;
        }
    }
    Ok(())
}
