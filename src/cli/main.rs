mod session;

use battle_solver_rust::core::{
    battle_solver::{BattleSolver, SolverConfig},
    error::SolveError,
    replay::validate_solution,
    tree_search::SearchAlgorithm,
};
use clap::Parser;
use session::Session;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Solves a two-army attack battle, or opens an interactive session when no state is given
#[derive(Parser, Debug)]
#[command(name = "battle_cli")]
struct Args {
    /// Initial state such as `5,3;4,1;A;` (army A pairs; army B pairs; starting player)
    initial_state: Option<String>,

    /// Search with alpha-beta pruning instead of plain minimax
    #[arg(long)]
    alpha_beta: bool,

    /// Use a transposition table (plain minimax only)
    #[arg(long)]
    memoize: bool,

    /// Print every state along the winning line
    #[arg(long, short = 'v')]
    visualize: bool,

    /// JSON solver config; the flags above override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Replay this solution encoding against the initial state instead of solving
    #[arg(long)]
    check: Option<String>,
}

impl Args {
    fn solver_config(&self) -> Result<SolverConfig, String> {
        let mut config = match self.config.as_ref() {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .map_err(|err| format!("failed to read {}: {err}", path.display()))?;
                SolverConfig::from_json_str(&json).map_err(|err| err.to_string())?
            }
            None => SolverConfig::default(),
        };

        if self.alpha_beta {
            config.algorithm = SearchAlgorithm::AlphaBeta;
        }
        config.memoize |= self.memoize;
        config.visualize |= self.visualize;

        Ok(config)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = match args.solver_config() {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    let Some(initial_state) = args.initial_state.as_deref() else {
        println!("program begin");
        let mut session = Session::new(config);
        session.start();
        println!("program end");
        return ExitCode::SUCCESS;
    };

    let result = match args.check.as_deref() {
        Some(solution) => check_once(initial_state, solution),
        None => solve_once(initial_state, config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn solve_once(initial_state: &str, config: SolverConfig) -> Result<(), SolveError> {
    let solution = BattleSolver::new(config).solve(initial_state)?;

    if let Some(trace) = solution.trace.as_ref() {
        println!("{trace}");
    }
    println!("{solution}");

    Ok(())
}

fn check_once(initial_state: &str, solution: &str) -> Result<(), SolveError> {
    let report = validate_solution(initial_state, solution)?;
    println!(
        "valid: utility={} armyAScore={}",
        report.utility, report.army_a_score
    );
    println!("{}", report.final_state.summary(1));

    Ok(())
}
