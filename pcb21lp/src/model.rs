//!
//! # Spacing Model Assembly & Solve
//!
//! Assembles the pitch/stagger program over `layers x num` ordered pin
//! positions and hands it to the external solver. Per layer `k` and position
//! `i`, with measurements `e`/`ho`/`hd` and their fixed term
//! `c = e + ho + sqrt(2)*hd`:
//!
//! - pitch: `x[k][i] - x[k][i-1] >= P + (2/sqrt(2))*l_dia`
//! - capacity bounds: `0 <= s[k][i] <= (ho + sqrt(2)*hd) / divisor`
//!   (and the same for `f[k][i]` at the fanout divisor, when enabled)
//! - total length: `t(k,i) = c + 2*x[k][i] + s[k][i]*stagger_coeff
//!   [+ f[k][i]*fanout_coeff]`
//! - envelope: `d_max >= t(k,i) >= d_min` for all positions, with
//!   `d_max - d_min <= L`
//!

// Crates.io
use good_lp::{
    constraint, default_solver, variable, variables, Expression, ResolutionError, Solution,
    SolverModel, Variable,
};
use log::debug;

// Local imports
use crate::data::{ChannelMeasurements, SpacingConfig, SpacingObjective, SpacingSolution};
use crate::{SpacingError, SpacingResult};

/// Build the spacing program from `config` and `measurements`, solve it, and
/// read back per-position values.
///
/// Infeasible and unbounded solver outcomes return the matching
/// [SpacingError] variants; values are only ever read from a feasible
/// solution.
pub fn solve(
    config: &SpacingConfig,
    measurements: &ChannelMeasurements,
) -> SpacingResult<SpacingSolution> {
    check_shapes(config, measurements)?;
    let (layers, num) = (config.layers, config.num);

    let mut vars = variables!();
    // Pin x-offsets, non-negative
    let x: Vec<Vec<Variable>> = (0..layers)
        .map(|_| (0..num).map(|_| vars.add(variable().min(0.0))).collect())
        .collect();
    // Stagger capacities, bounded by the per-position headroom
    let s: Vec<Vec<Variable>> = (0..layers)
        .map(|k| {
            (0..num)
                .map(|i| {
                    let cap = measurements.headroom(k, i) / config.stagger_divisor();
                    vars.add(variable().min(0.0).max(cap))
                })
                .collect()
        })
        .collect();
    // Fanout capacities, when modeled
    let f: Option<Vec<Vec<Variable>>> = config.fanout.then(|| {
        (0..layers)
            .map(|k| {
                (0..num)
                    .map(|i| {
                        let cap = measurements.headroom(k, i) / config.fanout_divisor();
                        vars.add(variable().min(0.0).max(cap))
                    })
                    .collect()
            })
            .collect()
    });
    // Envelope scalars, free
    let d_max = vars.add(variable());
    let d_min = vars.add(variable());

    let objective: Expression = match config.objective {
        SpacingObjective::LastOffset => x
            .iter()
            .map(|row| Expression::from(row[num - 1]))
            .sum::<Expression>(),
        SpacingObjective::MaxLength => d_max.into(),
    };

    // Per-position total-length expressions
    let lengths: Vec<Vec<Expression>> = (0..layers)
        .map(|k| {
            (0..num)
                .map(|i| {
                    let mut t = x[k][i] * 2.0;
                    t += s[k][i] * config.stagger_coeff();
                    if let Some(f) = &f {
                        t += f[k][i] * config.fanout_coeff();
                    }
                    t += measurements.fixed(k, i);
                    t
                })
                .collect()
        })
        .collect();

    let mut model = vars.minimise(objective).using(default_solver);
    for k in 0..layers {
        for i in 1..num {
            model = model.with(constraint!(x[k][i] - x[k][i - 1] >= config.pitch_gap()));
        }
        for i in 0..num {
            model = model.with(constraint!(d_max >= lengths[k][i].clone()));
            model = model.with(constraint!(d_min <= lengths[k][i].clone()));
        }
    }
    model = model.with(constraint!(d_max - d_min <= config.budget));
    debug!(
        "spacing LP: {} layers x {} positions, fanout={}",
        layers, num, config.fanout
    );

    let solution = model.solve().map_err(|e| match e {
        ResolutionError::Infeasible => SpacingError::Infeasible,
        ResolutionError::Unbounded => SpacingError::Unbounded,
        other => SpacingError::Solver(other.to_string()),
    })?;

    let read = |m: &Vec<Vec<Variable>>| -> Vec<Vec<f64>> {
        m.iter()
            .map(|row| row.iter().map(|v| solution.value(*v)).collect())
            .collect()
    };
    let positions = read(&x);
    let stagger = read(&s);
    let fanout = f.as_ref().map(read);

    // Re-assemble the per-position totals and the achieved objective from the
    // solved values
    let totals: Vec<Vec<f64>> = (0..layers)
        .map(|k| {
            (0..num)
                .map(|i| {
                    let mut t = measurements.fixed(k, i)
                        + 2.0 * positions[k][i]
                        + config.stagger_coeff() * stagger[k][i];
                    if let Some(fanout) = &fanout {
                        t += config.fanout_coeff() * fanout[k][i];
                    }
                    t
                })
                .collect()
        })
        .collect();
    let objective = match config.objective {
        SpacingObjective::LastOffset => positions.iter().map(|row| row[num - 1]).sum(),
        SpacingObjective::MaxLength => solution.value(d_max),
    };
    Ok(SpacingSolution {
        positions,
        stagger,
        fanout,
        totals,
        d_max: solution.value(d_max),
        d_min: solution.value(d_min),
        objective,
    })
}

/// Validate configuration/measurement dimension agreement
fn check_shapes(config: &SpacingConfig, measurements: &ChannelMeasurements) -> SpacingResult<()> {
    if config.num == 0 || config.layers == 0 {
        return Err(SpacingError::shape(
            "spacing model needs at least one layer and one position",
        ));
    }
    if measurements.layers() != config.layers || measurements.positions() != config.num {
        return Err(SpacingError::shape(format!(
            "measurements are {}x{}, config wants {}x{}",
            measurements.layers(),
            measurements.positions(),
            config.layers,
            config.num
        )));
    }
    Ok(())
}
