//! Scenario configuration for the sheet model
//!
//! `PlasmaConfig` and `RunConfig` are the plain, deserializable option sets.
//! `Config` is the validated form: it carries the derived lattice spacing,
//! the field coefficient and the lattice itself, all computed once.
//!
//! ```yaml
//! plasma:
//!   xmax: 10.0
//!   resolution: 20000
//!   initial_displacement: 0.3
//!   mass: 1.0
//!   charge: 1.0
//!   density: 1.0
//!   permittivity: 1.0
//! run:
//!   dt: 0.05
//!   steps: 1000
//!   rank_strategy: binary   # or "walk"
//! ```

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while building a configuration or a simulation from one
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("resolution must be at least 1")]
    ZeroResolution,

    #[error("resolution {0} is too large to allocate")]
    ResolutionTooLarge(usize),

    #[error("xmax must be positive and finite, got {0}")]
    InvalidExtent(f64),

    #[error("mass must be non-zero")]
    ZeroMass,

    #[error("permittivity must be non-zero")]
    ZeroPermittivity,

    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("time step must be positive and finite, got {0}")]
    InvalidTimeStep(f64),

    #[error("state holds {actual} sheets but the configuration expects {expected}")]
    StateMismatch { expected: usize, actual: usize },

    #[error("failed to parse scenario: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Physical constants and domain of a run, as written by the user
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PlasmaConfig {
    pub xmax: f64,                 // half width of the domain [-xmax, xmax]
    pub resolution: usize,         // number of sheets
    pub initial_displacement: f64, // offset away from the centre at t = 0
    pub mass: f64,
    pub charge: f64,
    pub density: f64,
    pub permittivity: f64,
}

impl Default for PlasmaConfig {
    fn default() -> Self {
        Self {
            xmax: 10.0,
            resolution: 20_000,
            initial_displacement: 0.3,
            mass: 1.0,
            charge: 1.0,
            density: 1.0,
            permittivity: 1.0,
        }
    }
}

/// How the field solver finds each sheet's rank in the sorted ordering
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankStrategy {
    /// Binary search for every sheet
    #[default]
    #[serde(rename = "binary")]
    Binary,

    /// Binary search for the first sheet, then walk from the previous rank
    #[serde(rename = "walk")]
    Walk,
}

/// Stepping parameters
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    pub dt: f64,      // fixed step size
    pub steps: usize, // step count for headless runs
    pub rank_strategy: RankStrategy,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            dt: 0.05,
            steps: 1000,
            rank_strategy: RankStrategy::Binary,
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(ConfigError::InvalidTimeStep(self.dt));
        }
        Ok(())
    }
}

/// Top-level scenario file
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ScenarioConfig {
    pub plasma: PlasmaConfig,
    pub run: RunConfig,
}

impl ScenarioConfig {
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(source)?)
    }
}

/// Validated configuration with derived quantities
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    plasma: PlasmaConfig,
    width: f64,
    step: f64,
    coeff: f64,
    lattice: Vec<f64>,
}

impl Config {
    /// Validate `plasma` and compute the lattice spacing, field coefficient
    /// and lattice positions
    pub fn new(plasma: PlasmaConfig) -> Result<Self, ConfigError> {
        if plasma.resolution == 0 {
            return Err(ConfigError::ZeroResolution);
        }
        if !(plasma.xmax.is_finite() && plasma.xmax > 0.0) {
            return Err(ConfigError::InvalidExtent(plasma.xmax));
        }
        for (name, value) in [
            ("initial_displacement", plasma.initial_displacement),
            ("mass", plasma.mass),
            ("charge", plasma.charge),
            ("density", plasma.density),
            ("permittivity", plasma.permittivity),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { name, value });
            }
        }
        if plasma.mass == 0.0 {
            return Err(ConfigError::ZeroMass);
        }
        if plasma.permittivity == 0.0 {
            return Err(ConfigError::ZeroPermittivity);
        }

        let width = 2.0 * plasma.xmax;
        let step = width / plasma.resolution as f64;
        let coeff =
            plasma.charge * plasma.charge * plasma.density / (plasma.mass * plasma.permittivity);
        if !coeff.is_finite() {
            return Err(ConfigError::NonFinite { name: "coeff", value: coeff });
        }
        let mut lattice = Vec::new();
        lattice
            .try_reserve_exact(plasma.resolution)
            .map_err(|_| ConfigError::ResolutionTooLarge(plasma.resolution))?;
        lattice.extend((0..plasma.resolution).map(|i| -plasma.xmax + i as f64 * step));

        log::debug!(
            "built lattice of {} sheets over [-{}, {}), step {}, coeff {}",
            plasma.resolution,
            plasma.xmax,
            plasma.xmax,
            step,
            coeff
        );

        Ok(Self {
            plasma,
            width,
            step,
            coeff,
            lattice,
        })
    }

    pub fn plasma(&self) -> &PlasmaConfig {
        &self.plasma
    }

    pub fn xmax(&self) -> f64 {
        self.plasma.xmax
    }

    pub fn resolution(&self) -> usize {
        self.plasma.resolution
    }

    pub fn initial_displacement(&self) -> f64 {
        self.plasma.initial_displacement
    }

    pub fn mass(&self) -> f64 {
        self.plasma.mass
    }

    /// Domain width, `2 * xmax`
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Lattice spacing, `2 * xmax / resolution`
    pub fn step(&self) -> f64 {
        self.step
    }

    /// `charge² · density / (mass · permittivity)`
    pub fn coeff(&self) -> f64 {
        self.coeff
    }

    /// Evenly spaced reference positions spanning `[-xmax, xmax)`
    pub fn lattice(&self) -> &[f64] {
        &self.lattice
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_gives_defaults() {
        let scenario = ScenarioConfig::from_yaml_str("{}").unwrap();
        assert_eq!(scenario, ScenarioConfig::default());
        assert_eq!(scenario.plasma.resolution, 20_000);
        assert_eq!(scenario.run.dt, 0.05);
    }

    #[test]
    fn partial_yaml_keeps_remaining_defaults() {
        let source = "plasma:\n  resolution: 8\nrun:\n  rank_strategy: walk\n";
        let scenario = ScenarioConfig::from_yaml_str(source).unwrap();
        assert_eq!(scenario.plasma.resolution, 8);
        assert_eq!(scenario.plasma.xmax, 10.0);
        assert_eq!(scenario.run.rank_strategy, RankStrategy::Walk);
    }

    #[test]
    fn unknown_strategy_is_a_parse_error() {
        let result = ScenarioConfig::from_yaml_str("run:\n  rank_strategy: tree\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
