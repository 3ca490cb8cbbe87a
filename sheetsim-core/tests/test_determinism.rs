//! Determinism tests - identical inputs produce bit-identical outputs

use sheetsim_core::tests::test_helpers::{plasma, scenario};
use sheetsim_core::{euler_step, Config, FieldSolver, RankStrategy, SimulationContext, State};

#[test]
fn test_step_is_bit_identical() {
    let config = Config::new(plasma(10.0, 1000, 0.3)).unwrap();
    let mut a = State::initial(&config);
    let mut b = State::initial(&config);
    let mut solver_a = FieldSolver::new(RankStrategy::Binary);
    let mut solver_b = FieldSolver::new(RankStrategy::Binary);

    for _ in 0..10 {
        let da = euler_step(&mut a, &config, &mut solver_a, 0.05);
        let db = euler_step(&mut b, &config, &mut solver_b, 0.05);
        assert_eq!(da, db);
        assert_eq!(a, b);
    }
}

#[test]
fn test_multiple_runs_determinism() {
    let runs: Vec<_> = (0..3)
        .map(|_| {
            let mut ctx =
                SimulationContext::new(scenario(plasma(10.0, 800, 0.3), 0.05, RankStrategy::Binary))
                    .expect("valid scenario");
            let last = ctx.run(200);
            (ctx.state().clone(), last)
        })
        .collect();

    for i in 1..runs.len() {
        assert_eq!(runs[0], runs[i], "run {} should match run 0", i);
    }
}

#[test]
fn test_rank_strategies_agree_over_a_run() {
    let mut binary =
        SimulationContext::new(scenario(plasma(10.0, 600, 0.3), 0.05, RankStrategy::Binary))
            .unwrap();
    let mut walk =
        SimulationContext::new(scenario(plasma(10.0, 600, 0.3), 0.05, RankStrategy::Walk))
            .unwrap();

    for _ in 0..150 {
        assert_eq!(binary.step(), walk.step());
    }
    assert_eq!(binary.state(), walk.state());
}
