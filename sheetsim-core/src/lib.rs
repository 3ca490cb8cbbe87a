pub mod config;
pub mod field;
pub mod integrator;
pub mod runtime;
pub mod state;

pub use config::{Config, ConfigError, PlasmaConfig, RankStrategy, RunConfig, ScenarioConfig};
pub use field::{rank_of, search_rank, FieldSolver};
pub use integrator::{derivative, euler_step};
pub use runtime::{run_scenario, Observable, SimulationContext};
pub use state::{Derivative, State, StateError};
