use crate::config::Config;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum StateError {
    #[error("{positions} positions but {velocities} velocities")]
    LengthMismatch { positions: usize, velocities: usize },
}

/// Positions and velocities of every sheet.
///
/// Index `i` identifies the same sheet for the whole run; sheets are never
/// reordered or removed, so both vectors always have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    position: Vec<f64>,
    velocity: Vec<f64>,
}

impl State {
    /// Seed the state from the lattice: every sheet is pushed `d` away from
    /// the centre, with a lattice point sitting exactly on 0 pushed right.
    /// All sheets start at rest.
    pub fn initial(config: &Config) -> Self {
        let d = config.initial_displacement();
        let position = config
            .lattice()
            .iter()
            .map(|&x| {
                let sign = if x < 0.0 { -1.0 } else { 1.0 };
                x + sign * d
            })
            .collect();
        Self {
            position,
            velocity: vec![0.0; config.resolution()],
        }
    }

    pub fn from_parts(position: Vec<f64>, velocity: Vec<f64>) -> Result<Self, StateError> {
        if position.len() != velocity.len() {
            return Err(StateError::LengthMismatch {
                positions: position.len(),
                velocities: velocity.len(),
            });
        }
        Ok(Self { position, velocity })
    }

    pub fn len(&self) -> usize {
        self.position.len()
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_empty()
    }

    pub fn positions(&self) -> &[f64] {
        &self.position
    }

    pub fn velocities(&self) -> &[f64] {
        &self.velocity
    }

    /// True if every position and velocity is finite
    pub fn is_finite(&self) -> bool {
        self.position
            .iter()
            .chain(self.velocity.iter())
            .all(|v| v.is_finite())
    }

    /// `x += dx * dt`, `v += dv * dt` for every sheet
    pub(crate) fn advance(&mut self, derivative: &Derivative, dt: f64) {
        for (x, dx) in self.position.iter_mut().zip(&derivative.d_position) {
            *x += dx * dt;
        }
        for (v, dv) in self.velocity.iter_mut().zip(&derivative.d_velocity) {
            *v += dv * dt;
        }
    }
}

/// Time derivative of a [`State`], index-aligned with it
#[derive(Debug, Clone, PartialEq)]
pub struct Derivative {
    pub d_position: Vec<f64>, // velocity at the start of the step
    pub d_velocity: Vec<f64>, // field-induced acceleration
}

impl Derivative {
    pub fn len(&self) -> usize {
        self.d_position.len()
    }

    pub fn is_empty(&self) -> bool {
        self.d_position.is_empty()
    }

    /// The field acting on each sheet
    pub fn field(&self) -> &[f64] {
        &self.d_velocity
    }
}
