//! Tests for seeding the state from the lattice

use sheetsim_core::tests::test_helpers::{four_sheet_config, plasma, slices_approx_eq};
use sheetsim_core::{Config, State, StateError};

#[test]
fn test_sheets_displaced_away_from_centre() {
    let config = four_sheet_config();
    let state = State::initial(&config);

    // lattice [-1, -0.5, 0, 0.5]; the sheet at 0 is pushed right
    assert!(slices_approx_eq(state.positions(), &[-1.1, -0.6, 0.1, 0.6], 1e-12));
    assert_eq!(state.velocities(), &[0.0, 0.0, 0.0, 0.0]);
}

#[test]
fn test_zero_displacement_is_the_lattice() {
    let config = Config::new(plasma(2.0, 8, 0.0)).unwrap();
    let state = State::initial(&config);
    assert_eq!(state.positions(), config.lattice());
}

#[test]
fn test_initial_state_is_deterministic() {
    let config = Config::new(plasma(10.0, 1000, 0.3)).unwrap();
    assert_eq!(State::initial(&config), State::initial(&config));
}

#[test]
fn test_lengths_match_resolution() {
    let config = Config::new(plasma(3.0, 17, 0.2)).unwrap();
    let state = State::initial(&config);
    assert_eq!(state.len(), 17);
    assert_eq!(state.positions().len(), state.velocities().len());
}

#[test]
fn test_from_parts_rejects_mismatched_lengths() {
    let result = State::from_parts(vec![0.0, 1.0], vec![0.0]);
    assert_eq!(
        result,
        Err(StateError::LengthMismatch { positions: 2, velocities: 1 })
    );
}
