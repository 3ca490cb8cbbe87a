use crate::config::{Config, ConfigError, RunConfig, ScenarioConfig};
use crate::field::FieldSolver;
use crate::integrator::euler_step;
use crate::state::{Derivative, State};

/// A named scalar measured on the current state
#[derive(Debug, Clone, PartialEq)]
pub struct Observable {
    pub name: &'static str,
    pub value: f64,
}

/// Owns everything a run needs and advances it one fixed step at a time.
///
/// Whatever drives the run (a timer, a UI frame loop, a test) calls
/// [`SimulationContext::step`] and reads the state between steps.
#[derive(Debug)]
pub struct SimulationContext {
    config: Config,
    run: RunConfig,
    state: State,
    solver: FieldSolver,
    time: f64,
    current_step: usize,
    diverged: bool,
}

impl SimulationContext {
    pub fn new(scenario: ScenarioConfig) -> Result<Self, ConfigError> {
        let config = Config::new(scenario.plasma)?;
        Self::from_parts(config, scenario.run)
    }

    pub fn from_parts(config: Config, run: RunConfig) -> Result<Self, ConfigError> {
        run.validate()?;
        let state = State::initial(&config);
        log::debug!(
            "simulation context ready: {} sheets, dt {}, {:?} ranking",
            state.len(),
            run.dt,
            run.rank_strategy
        );
        Ok(Self {
            solver: FieldSolver::new(run.rank_strategy),
            config,
            run,
            state,
            time: 0.0,
            current_step: 0,
            diverged: false,
        })
    }

    /// Replace the state, keeping the configuration
    pub fn with_state(mut self, state: State) -> Result<Self, ConfigError> {
        if state.len() != self.config.resolution() {
            return Err(ConfigError::StateMismatch {
                expected: self.config.resolution(),
                actual: state.len(),
            });
        }
        self.state = state;
        Ok(self)
    }

    /// Advance one step of `dt` and return the derivative it used
    pub fn step(&mut self) -> Derivative {
        let derivative = euler_step(&mut self.state, &self.config, &mut self.solver, self.run.dt);
        self.time += self.run.dt;
        self.current_step += 1;
        log::trace!("step {} done, t = {}", self.current_step, self.time);

        if !self.diverged && !self.state.is_finite() {
            self.diverged = true;
            log::warn!(
                "state became non-finite at step {} (t = {}); dt {} is likely too large",
                self.current_step,
                self.time,
                self.run.dt
            );
        }
        derivative
    }

    /// Advance `steps` steps, returning the derivative of the last one
    pub fn run(&mut self, steps: usize) -> Option<Derivative> {
        let mut last = None;
        for _ in 0..steps {
            last = Some(self.step());
        }
        last
    }

    /// Back to the initial state at t = 0
    pub fn reset(&mut self) {
        self.state = State::initial(&self.config);
        self.time = 0.0;
        self.current_step = 0;
        self.diverged = false;
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn run_config(&self) -> &RunConfig {
        &self.run
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Measure the current state. `last` adds field statistics when given.
    pub fn observables(&self, last: Option<&Derivative>) -> Vec<Observable> {
        let n = self.state.len().max(1) as f64;
        let kinetic_energy = 0.5
            * self.config.mass()
            * self.state.velocities().iter().map(|v| v * v).sum::<f64>();
        let displacements = self
            .state
            .positions()
            .iter()
            .zip(self.config.lattice())
            .map(|(x, x0)| x - x0);
        let (sum_sq, max_abs) = displacements.fold((0.0, 0.0_f64), |(sum, max), d| {
            (sum + d * d, max.max(d.abs()))
        });

        let mut results = vec![
            Observable { name: "time", value: self.time },
            Observable { name: "kinetic_energy", value: kinetic_energy },
            Observable { name: "rms_displacement", value: (sum_sq / n).sqrt() },
            Observable { name: "max_displacement", value: max_abs },
        ];
        if let Some(derivative) = last {
            let max_field = derivative
                .field()
                .iter()
                .fold(0.0_f64, |max, e| max.max(e.abs()));
            results.push(Observable { name: "max_abs_field", value: max_field });
        }
        results
    }
}

/// Build a context from a YAML scenario and run it for its configured steps
pub fn run_scenario(source: &str) -> Result<(SimulationContext, Vec<Observable>), ConfigError> {
    let scenario = ScenarioConfig::from_yaml_str(source)?;
    let steps = scenario.run.steps;
    let mut ctx = SimulationContext::new(scenario)?;
    let last = ctx.run(steps);
    let observables = ctx.observables(last.as_ref());
    Ok((ctx, observables))
}
