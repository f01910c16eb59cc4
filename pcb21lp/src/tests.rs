//!
//! # pcb21lp unit tests
//!

use approx::assert_abs_diff_eq;
use std::f64::consts::SQRT_2;

use super::csv;
use super::*;

/// Solver tolerance for read-back values
const EPS: f64 = 1e-5;

fn default_config(num: usize) -> SpacingConfig {
    SpacingConfig::builder().num(num).build().unwrap()
}

#[test]
fn config_builder_defaults() -> SpacingResult<()> {
    let config = SpacingConfig::builder().num(9usize).build()?;
    assert_eq!(config.num, 9);
    assert_eq!(config.layers, 2);
    assert_eq!(config.pitch, 9.0);
    assert_eq!(config.budget, 150.0);
    assert_eq!(config.via_diameter, 5.0);
    assert_eq!(config.min_width, 5.0);
    assert_eq!(config.snake_height, 15.0);
    assert_eq!(config.objective, SpacingObjective::LastOffset);
    assert!(!config.fanout);
    Ok(())
}

#[test]
fn config_builder_requires_num() {
    let err = SpacingConfig::builder().build().unwrap_err();
    assert!(matches!(SpacingError::from(err), SpacingError::Builder(_)));
}

#[test]
fn derived_geometry_constants() {
    let config = default_config(9);
    assert_abs_diff_eq!(config.pitch_gap(), 9.0 + SQRT_2 * 5.0, epsilon = EPS);
    assert_abs_diff_eq!(
        config.stagger_divisor(),
        2.0 * SQRT_2 * 5.0 + 10.0,
        epsilon = EPS
    );
    assert_abs_diff_eq!(
        config.fanout_divisor(),
        2.0 * config.stagger_divisor(),
        epsilon = EPS
    );
    assert_abs_diff_eq!(
        config.stagger_coeff(),
        4.0 * (1.0 - 1.0 / SQRT_2) * 5.0 + 30.0,
        epsilon = EPS
    );
    assert_abs_diff_eq!(
        config.fanout_coeff(),
        2.0 * (1.0 - 1.0 / SQRT_2) * 5.0 + 15.0,
        epsilon = EPS
    );
}

#[test]
fn measurements_fixed_term() -> SpacingResult<()> {
    let m = ChannelMeasurements::new(
        vec![vec![518.76]],
        vec![vec![578.77]],
        vec![vec![38.395]],
    )?;
    assert_abs_diff_eq!(
        m.fixed(0, 0),
        518.76 + 578.77 + SQRT_2 * 38.395,
        epsilon = EPS
    );
    assert_abs_diff_eq!(m.headroom(0, 0), 578.77 + SQRT_2 * 38.395, epsilon = EPS);
    Ok(())
}

#[test]
fn measurements_reject_shape_disagreement() {
    let bad = ChannelMeasurements::new(
        vec![vec![1.0, 2.0]],
        vec![vec![1.0]],
        vec![vec![1.0, 2.0]],
    );
    assert!(matches!(bad, Err(SpacingError::Shape(_))));
    let ragged = ChannelMeasurements::new(
        vec![vec![1.0, 2.0], vec![1.0]],
        vec![vec![1.0, 2.0], vec![1.0]],
        vec![vec![1.0, 2.0], vec![1.0]],
    );
    assert!(matches!(ragged, Err(SpacingError::Shape(_))));
}

#[test]
fn solve_rejects_mismatched_dimensions() {
    let config = default_config(9);
    let m = ChannelMeasurements::uniform(2, 4, 0.0, 1000.0, 0.0);
    assert!(matches!(solve(&config, &m), Err(SpacingError::Shape(_))));
}

#[test]
fn nine_pin_two_layer_scenario_is_feasible() -> SpacingResult<()> {
    // Uniform fixed term c = 1000 with generous stagger headroom
    let config = default_config(9);
    let m = ChannelMeasurements::uniform(2, 9, 0.0, 1000.0, 0.0);
    let solution = solve(&config, &m)?;

    // Budget holds: the envelope fits within L
    assert!(solution.d_max - solution.d_min <= config.budget + EPS);
    // Every position's total length sits within the envelope
    for row in &solution.totals {
        for &t in row {
            assert!(t <= solution.d_max + EPS);
            assert!(t >= solution.d_min - EPS);
        }
    }
    // Pitch holds on every layer
    let gap = config.pitch_gap();
    for row in &solution.positions {
        assert!(row[0] >= -EPS);
        for i in 1..row.len() {
            assert!(row[i] - row[i - 1] >= gap - EPS);
        }
    }
    // Stagger capacities respect their bounds
    let cap = m.headroom(0, 0) / config.stagger_divisor();
    for row in &solution.stagger {
        for &s in row {
            assert!((-EPS..=cap + EPS).contains(&s));
        }
    }
    // The objective is the combined last offset, at its pitch-forced minimum
    let last: f64 = solution.positions.iter().map(|row| row[8]).sum();
    assert_abs_diff_eq!(solution.objective, last, epsilon = 1e-4);
    assert_abs_diff_eq!(last, 2.0 * 8.0 * gap, epsilon = 1e-4);
    assert!(solution.fanout.is_none());
    Ok(())
}

#[test]
fn max_length_objective_minimizes_envelope_top() -> SpacingResult<()> {
    let config = SpacingConfig::builder()
        .num(9usize)
        .objective(SpacingObjective::MaxLength)
        .build()?;
    let m = ChannelMeasurements::uniform(2, 9, 0.0, 1000.0, 0.0);
    let solution = solve(&config, &m)?;
    assert_abs_diff_eq!(solution.objective, solution.d_max, epsilon = 1e-4);
    for row in &solution.totals {
        for &t in row {
            assert!(t <= solution.d_max + EPS);
        }
    }
    // The top cannot beat the pitch-forced longest position
    assert!(solution.d_max >= 1000.0 + 2.0 * 8.0 * config.pitch_gap() - 1e-4);
    Ok(())
}

#[test]
fn zero_headroom_makes_the_budget_infeasible() {
    // No stagger capacity to equalize: the pitch-forced spread of
    // 2 * 8 * pitch_gap ~ 257 cannot fit the 150 budget
    let config = default_config(9);
    let m = ChannelMeasurements::uniform(2, 9, 1000.0, 0.0, 0.0);
    match solve(&config, &m) {
        Err(SpacingError::Infeasible) => (),
        other => panic!("expected Infeasible, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn fanout_variables_appear_when_enabled() -> SpacingResult<()> {
    let config = SpacingConfig::builder()
        .num(9usize)
        .fanout(true)
        .build()?;
    let m = ChannelMeasurements::uniform(2, 9, 0.0, 1000.0, 0.0);
    let solution = solve(&config, &m)?;
    let fanout = solution.fanout.as_ref().expect("fanout values");
    assert_eq!(fanout.len(), 2);
    assert_eq!(fanout[0].len(), 9);
    let cap = m.headroom(0, 0) / config.fanout_divisor();
    for row in fanout {
        for &f in row {
            assert!((-EPS..=cap + EPS).contains(&f));
        }
    }
    Ok(())
}

#[test]
fn csv_rows_are_comma_joined_per_layer() -> SpacingResult<()> {
    let rows = vec![vec![0.0, 16.5, 33.0], vec![1.0, 17.5, 34.0]];
    let mut out = Vec::new();
    csv::write_rows(&mut out, &rows)?;
    assert_eq!(String::from_utf8(out).unwrap(), "0,16.5,33\n1,17.5,34\n");
    Ok(())
}
