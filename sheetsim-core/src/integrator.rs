use crate::config::Config;
use crate::field::FieldSolver;
use crate::state::{Derivative, State};

/// Evaluate the derivative of `state`: the current velocity and the field
pub fn derivative(state: &State, config: &Config, solver: &mut FieldSolver) -> Derivative {
    Derivative {
        d_position: state.velocities().to_vec(),
        d_velocity: solver.field(state.positions(), config),
    }
}

/// Step the state forward by dt using explicit (forward) Euler integration.
///
/// Both updates use the derivative taken at the start of the step. Returns
/// that derivative so callers can inspect the field without recomputing it.
pub fn euler_step(
    state: &mut State,
    config: &Config,
    solver: &mut FieldSolver,
    dt: f64,
) -> Derivative {
    let rates = derivative(state, config, solver);
    state.advance(&rates, dt);
    rates
}
