//! Tests for the explicit Euler integrator

use sheetsim_core::tests::test_helpers::{approx_eq, four_sheet_config, plasma, slices_approx_eq};
use sheetsim_core::{euler_step, Config, FieldSolver, RankStrategy, State};

#[test]
fn test_first_step_from_rest() {
    let config = four_sheet_config();
    let mut state = State::initial(&config);
    let mut solver = FieldSolver::new(RankStrategy::Binary);

    let derivative = euler_step(&mut state, &config, &mut solver, 0.05);

    // sheets start at rest, so positions do not move on the first step
    assert!(slices_approx_eq(state.positions(), &[-1.1, -0.6, 0.1, 0.6], 1e-12));
    // v += field * dt with field [0.1, 0.1, -0.1, -0.1]
    assert!(slices_approx_eq(
        state.velocities(),
        &[0.005, 0.005, -0.005, -0.005],
        1e-12
    ));
    assert_eq!(derivative.d_position, vec![0.0; 4]);
    assert!(slices_approx_eq(derivative.field(), &[0.1, 0.1, -0.1, -0.1], 1e-12));
}

#[test]
fn test_position_uses_velocity_from_start_of_step() {
    let config = four_sheet_config();
    let mut state = State::initial(&config);
    let mut solver = FieldSolver::new(RankStrategy::Binary);

    euler_step(&mut state, &config, &mut solver, 0.05);
    let velocities = state.velocities().to_vec();
    let positions = state.positions().to_vec();

    let derivative = euler_step(&mut state, &config, &mut solver, 0.05);

    assert_eq!(derivative.d_position, velocities);
    for i in 0..4 {
        assert!(approx_eq(
            state.positions()[i],
            positions[i] + velocities[i] * 0.05,
            1e-15
        ));
        assert!(approx_eq(
            state.velocities()[i],
            velocities[i] + derivative.d_velocity[i] * 0.05,
            1e-15
        ));
    }
}

#[test]
fn test_lengths_preserved_across_steps() {
    let config = Config::new(plasma(10.0, 500, 0.3)).unwrap();
    let mut state = State::initial(&config);
    let mut solver = FieldSolver::new(RankStrategy::Binary);

    for _ in 0..20 {
        let derivative = euler_step(&mut state, &config, &mut solver, 0.05);
        assert_eq!(state.positions().len(), config.resolution());
        assert_eq!(state.velocities().len(), config.resolution());
        assert_eq!(derivative.len(), config.resolution());
    }
}

#[test]
fn test_equilibrium_does_not_drift() {
    let config = Config::new(plasma(10.0, 1000, 0.0)).unwrap();
    let mut state = State::initial(&config);
    let mut solver = FieldSolver::new(RankStrategy::Binary);

    for _ in 0..50 {
        euler_step(&mut state, &config, &mut solver, 0.05);
    }
    for (x, x0) in state.positions().iter().zip(config.lattice()) {
        assert!(approx_eq(*x, *x0, 1e-9));
    }
    assert!(state.velocities().iter().all(|v| v.abs() < 1e-9));
}

#[test]
fn test_displaced_sheets_oscillate_back() {
    // with unit constants the plasma frequency is 1, so after roughly a
    // quarter period (t ≈ π/2) the outward displacement has turned around
    let config = Config::new(plasma(10.0, 2000, 0.3)).unwrap();
    let mut state = State::initial(&config);
    let mut solver = FieldSolver::new(RankStrategy::Binary);

    let probe = 1500; // lattice position 5.0, displaced to 5.3
    let start = state.positions()[probe];
    for _ in 0..32 {
        euler_step(&mut state, &config, &mut solver, 0.05);
    }
    assert!(state.velocities()[probe] < 0.0, "sheet should move back toward the centre");
    assert!(state.positions()[probe] < start);
}
