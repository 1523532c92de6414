use crate::core::{
    attack_action::AttackAction,
    battle_state::BattleState,
    encoding::{format_solution, parse_initial_state},
    error::SolveError,
    search_node::SearchNode,
    tree_search::{SearchAlgorithm, TreeSearch},
};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type BattleNode = SearchNode<AttackAction, BattleState>;
pub type BattleSearch = TreeSearch<AttackAction, BattleState>;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SolverConfig {
    pub algorithm: SearchAlgorithm,
    pub memoize: bool,
    pub visualize: bool,
}

impl SolverConfig {
    pub fn from_json_str(json: &str) -> Result<Self, SolveError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_alpha_beta(use_alpha_beta: bool) -> Self {
        Self {
            algorithm: if use_alpha_beta {
                SearchAlgorithm::AlphaBeta
            } else {
                SearchAlgorithm::Minimax
            },
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug)]
pub struct Solution {
    pub plan: Vec<AttackAction>,
    pub value: i64,
    pub num_nodes_visited: usize,
    pub final_state: BattleState,
    pub trace: Option<String>,
}

/// Result encoding, `<plan>;<value>;<nodesVisited>;`.
impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_solution(&self.plan, self.value, self.num_nodes_visited))
    }
}

#[derive(Clone, Debug, Default)]
pub struct BattleSolver {
    config: SolverConfig,
}

impl BattleSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn solve(&self, initial_state_encoding: &str) -> Result<Solution, SolveError> {
        let state = parse_initial_state(initial_state_encoding)?;
        self.solve_state(&state)
    }

    /// Searches from `state` as given; the state need not be a root, but values stay
    /// relative to its `starting_player`.
    pub fn solve_state(&self, state: &BattleState) -> Result<Solution, SolveError> {
        tracing::debug!(
            algorithm = %self.config.algorithm,
            memoize = self.config.memoize,
            %state,
            "search started"
        );

        let mut num_nodes_visited = 0;
        let outcome = BattleSearch::find_best_line(
            state,
            self.config.algorithm,
            self.config.memoize,
            &mut num_nodes_visited,
        )?;

        tracing::debug!(
            algorithm = %self.config.algorithm,
            value = outcome.value,
            num_nodes_visited,
            "search finished"
        );

        let trace = self
            .config
            .visualize
            .then(|| visualize_line(&outcome.terminal_node));

        Ok(Solution {
            plan: outcome.terminal_node.plan(),
            value: outcome.value,
            num_nodes_visited,
            final_state: outcome.terminal_node.state.clone(),
            trace,
        })
    }
}

/// One-shot entry point returning the result encoding. With `visualize` the trace is
/// written to stdout before returning.
pub fn solve(
    initial_state_encoding: &str,
    use_alpha_beta: bool,
    visualize: bool,
) -> Result<String, SolveError> {
    let config = SolverConfig {
        visualize,
        ..SolverConfig::with_alpha_beta(use_alpha_beta)
    };
    let solution = BattleSolver::new(config).solve(initial_state_encoding)?;

    if let Some(trace) = solution.trace.as_ref() {
        println!("{trace}");
    }

    Ok(solution.to_string())
}

/// Every state from the root down to `terminal_node`, one step per ply.
pub fn visualize_line(terminal_node: &BattleNode) -> String {
    let mut sb = String::from("=== Solution Visualization ===\n");

    for (step, node) in terminal_node.lineage().into_iter().enumerate() {
        sb.push_str(&format!("\nStep {step}:\n"));
        if let Some(action) = node.action.as_ref() {
            sb.push_str(&format!("Action: {action}\n"));
        }
        sb.push_str(&node.state.summary(0));
        sb.push('\n');
    }

    sb.push_str("\n=== End Visualization ===");
    sb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::player::Player;

    #[test]
    fn config_defaults_to_plain_minimax() {
        let config = SolverConfig::default();
        assert_eq!(config.algorithm, SearchAlgorithm::Minimax);
        assert!(!config.memoize);
        assert!(!config.visualize);
    }

    #[test]
    fn config_reads_camel_case_json_with_missing_fields() {
        let config = SolverConfig::from_json_str(r#"{"algorithm":"alphaBeta","visualize":true}"#).unwrap();
        assert_eq!(config.algorithm, SearchAlgorithm::AlphaBeta);
        assert!(!config.memoize);
        assert!(config.visualize);

        assert!(matches!(
            SolverConfig::from_json_str(r#"{"algorithm":"bogo"}"#),
            Err(SolveError::Config(_))
        ));
    }

    #[test]
    fn solve_returns_the_result_encoding() {
        assert_eq!(solve("5,3;4,1;A;", false, false).unwrap(), "A(0,0),B(0,0),A(0,0);4;4;");
        assert_eq!(solve("5,3;4,1;A;", true, false).unwrap(), "A(0,0),B(0,0),A(0,0);4;4;");
    }

    #[test]
    fn b_moving_first_scores_from_b_point_of_view() {
        let solution = BattleSolver::default().solve("5,3;4,1;B;").unwrap();
        assert_eq!(solution.value, -3);
        assert_eq!(solution.final_state.army_a_score(), 3);
        assert_eq!(solution.plan.first().map(|action| action.player), Some(Player::B));
    }

    #[test]
    fn terminal_root_yields_empty_plan() {
        assert_eq!(solve("0,3;4,1;A;", true, false).unwrap(), ";-4;1;");
        assert_eq!(solve("5,3;0,1,0,2;B;", false, false).unwrap(), ";-5;1;");
    }

    #[test]
    fn malformed_input_fails_before_search() {
        assert!(matches!(solve("5,3;4;A;", false, false), Err(SolveError::MalformedInput { .. })));
    }

    #[test]
    fn visualization_snapshot() {
        let config = SolverConfig {
            visualize: true,
            ..SolverConfig::default()
        };
        let solution = BattleSolver::new(config).solve("5,3;4,1;A;").unwrap();
        assert_eq!(
            solution.trace.as_deref().unwrap(),
            concat!(
                "=== Solution Visualization ===\n",
                "\nStep 0:\n",
                "Army A: [H:5 D:3]\n",
                "Army B: [H:4 D:1]\n",
                "Current Player: A\n",
                "Total Health A: 5\n",
                "Total Health B: 4\n",
                "\nStep 1:\n",
                "Action: A(0,0)\n",
                "Army A: [H:5 D:3]\n",
                "Army B: [H:1 D:1]\n",
                "Current Player: B\n",
                "Total Health A: 5\n",
                "Total Health B: 1\n",
                "\nStep 2:\n",
                "Action: B(0,0)\n",
                "Army A: [H:4 D:3]\n",
                "Army B: [H:1 D:1]\n",
                "Current Player: A\n",
                "Total Health A: 4\n",
                "Total Health B: 1\n",
                "\nStep 3:\n",
                "Action: A(0,0)\n",
                "Army A: [H:4 D:3]\n",
                "Army B: [H:0 D:1]\n",
                "Current Player: B\n",
                "Total Health A: 4\n",
                "Total Health B: 0\n",
                "\n=== End Visualization ==="
            )
        );
    }

    #[test]
    fn visualization_does_not_change_the_result() {
        let plain = BattleSolver::default().solve("1,1,2,3,6,7;5,5,3,1;A;").unwrap();
        let config = SolverConfig {
            visualize: true,
            ..SolverConfig::default()
        };
        let visualized = BattleSolver::new(config).solve("1,1,2,3,6,7;5,5,3,1;A;").unwrap();
        assert_eq!(plain.to_string(), visualized.to_string());
        assert!(plain.trace.is_none());
    }
}
