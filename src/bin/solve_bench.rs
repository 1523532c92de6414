use battle_solver_rust::core::{
    battle_solver::{BattleSolver, SolverConfig},
    tree_search::SearchAlgorithm,
};
use std::time::Instant;

const SCENARIOS: [&str; 6] = [
    "5,3;4,1;A;",
    "1,1,2,3,6,7;5,5,3,1;A;",
    "1,1,2,3,6,7;5,5,10,1;A;",
    "7,3,11,9;2,8,4,10,1,6,5,1;A;",
    "7,3,11,9;2,8,4,10,1,6,5,1;B;",
    "1,10,5,2,3,5;6,7,3,1,13,4;B;",
];

fn main() {
    let configs = [
        (SearchAlgorithm::Minimax, false),
        (SearchAlgorithm::Minimax, true),
        (SearchAlgorithm::AlphaBeta, false),
    ];

    for scenario in SCENARIOS {
        println!("{scenario}");

        for (algorithm, memoize) in configs {
            let solver = BattleSolver::new(SolverConfig {
                algorithm,
                memoize,
                visualize: false,
            });
            let started = Instant::now();
            let result = solver.solve(scenario);
            let elapsed = started.elapsed();

            match result {
                Ok(solution) => println!(
                    "  algorithm={:<10} memo={:<5} value={:+} nodes={} timeSec={:.4}",
                    algorithm,
                    memoize,
                    solution.value,
                    solution.num_nodes_visited,
                    elapsed.as_secs_f64()
                ),
                Err(err) => println!("  algorithm={algorithm} memo={memoize} failed: {err}"),
            }
        }
    }
}
