use serde::Serialize;
use std::rc::Rc;
use tsify::Tsify;
use wasm_bindgen::prelude::*;

pub mod core;

use crate::core::{
    attack_action::{AttackAction, actions_to_plan_string},
    battle_solver::{BattleNode, BattleSolver, SolverConfig},
    encoding::parse_initial_state,
    error::SolveError,
    replay::validate_solution,
    search_node::SearchNode,
};

fn to_js_error(err: SolveError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[derive(Serialize, Tsify)]
#[serde(rename_all = "camelCase")]
struct SolveReport {
    plan: Vec<String>,
    value: i64,
    num_nodes_visited: usize,
    encoded: String,
    trace: Option<String>,
}

#[wasm_bindgen(js_name = "solve")]
pub fn solve_encoded(
    initial_state_encoding: &str,
    use_alpha_beta: bool,
    visualize: bool,
) -> Result<String, JsValue> {
    let config = SolverConfig {
        visualize,
        ..SolverConfig::with_alpha_beta(use_alpha_beta)
    };
    BattleSolver::new(config)
        .solve(initial_state_encoding)
        .map(|solution| solution.to_string())
        .map_err(to_js_error)
}

#[wasm_bindgen(js_name = "solveReport")]
pub fn solve_report(initial_state_encoding: &str, config_json: &str) -> Result<JsValue, JsValue> {
    let config = if config_json.trim().is_empty() {
        SolverConfig::default()
    } else {
        SolverConfig::from_json_str(config_json).map_err(to_js_error)?
    };
    let solution = BattleSolver::new(config)
        .solve(initial_state_encoding)
        .map_err(to_js_error)?;

    let report = SolveReport {
        plan: solution.plan.iter().map(|action| action.to_string()).collect(),
        value: solution.value,
        num_nodes_visited: solution.num_nodes_visited,
        encoded: solution.to_string(),
        trace: solution.trace,
    };

    serde_wasm_bindgen::to_value(&report).map_err(|err| JsValue::from_str(&err.to_string()))
}

/// Empty string when the solution replays to its claimed value, otherwise the reason it does not.
#[wasm_bindgen(js_name = "validateSolution")]
pub fn validate_solution_encoded(initial_state_encoding: &str, solution_encoding: &str) -> String {
    match validate_solution(initial_state_encoding, solution_encoding) {
        Ok(_) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// A battle being played out move by move; the search-node chain doubles as undo history.
#[wasm_bindgen]
pub struct BattleHandle {
    node: Rc<BattleNode>,
}

#[wasm_bindgen]
impl BattleHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(initial_state_encoding: &str) -> Result<BattleHandle, JsValue> {
        let state = parse_initial_state(initial_state_encoding).map_err(to_js_error)?;
        Ok(BattleHandle {
            node: SearchNode::root(state),
        })
    }

    pub fn summary(&self, indentation_level: usize) -> String {
        self.node.state.summary(indentation_level)
    }

    #[wasm_bindgen(js_name = "legalActions")]
    pub fn legal_actions(&self) -> Vec<String> {
        self.node
            .state
            .legal_actions()
            .iter()
            .map(|action| action.to_string())
            .collect()
    }

    /// Empty string on success, otherwise why the action was refused.
    #[wasm_bindgen(js_name = "applyAction")]
    pub fn apply_action(&mut self, action_text: &str) -> String {
        let applied = action_text
            .parse::<AttackAction>()
            .and_then(|action| {
                let next_state = self.node.state.after_action(&action)?;
                Ok(SearchNode::child(&self.node, action, next_state))
            });

        match applied {
            Ok(child) => {
                self.node = child;
                String::new()
            }
            Err(err) => err.to_string(),
        }
    }

    #[wasm_bindgen(js_name = "undoLastAction")]
    pub fn undo_last_action(&mut self) -> bool {
        let Some(parent) = self.node.parent.clone() else {
            return false;
        };
        self.node = parent;
        true
    }

    #[wasm_bindgen(js_name = "isTerminal")]
    pub fn is_terminal(&self) -> bool {
        self.node.state.is_terminal()
    }

    pub fn utility(&self) -> i64 {
        self.node.state.utility()
    }

    #[wasm_bindgen(js_name = "actionHistory")]
    pub fn action_history(&self) -> String {
        actions_to_plan_string(&self.node.plan())
    }

    /// Best continuation from the current position as a comma-joined plan.
    #[wasm_bindgen(js_name = "bestPlan")]
    pub fn best_plan(&self, use_alpha_beta: bool) -> Result<String, JsValue> {
        let solution = BattleSolver::new(SolverConfig::with_alpha_beta(use_alpha_beta))
            .solve_state(&self.node.state)
            .map_err(to_js_error)?;
        Ok(actions_to_plan_string(&solution.plan))
    }

    #[wasm_bindgen(js_name = "armiesJson")]
    pub fn armies_json(&self) -> String {
        serde_json::to_string(&self.node.state).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_plays_undoes_and_reports_history() {
        let mut handle = BattleHandle::new("5,3;4,1;A;").unwrap();
        assert_eq!(handle.legal_actions(), vec!["A(0,0)"]);

        assert_eq!(handle.apply_action("A(0,0)"), "");
        assert_eq!(handle.action_history(), "A(0,0)");
        assert!(handle.apply_action("A(0,0)").contains("it is B's turn"));
        assert!(handle.apply_action("nonsense").contains("malformed action"));

        assert!(handle.undo_last_action());
        assert!(!handle.undo_last_action());
        assert_eq!(handle.action_history(), "");
    }

    #[test]
    fn handle_suggests_the_solver_line() {
        let handle = BattleHandle::new("1,1,2,3,6,7;5,5,3,1;A;").unwrap();
        let minimax = handle.best_plan(false).unwrap();
        let alpha_beta = handle.best_plan(true).unwrap();
        assert!(!minimax.is_empty());
        assert!(validate_solution_encoded("1,1,2,3,6,7;5,5,3,1;A;", &format!("{minimax};8;0;")).is_empty());
        assert!(validate_solution_encoded("1,1,2,3,6,7;5,5,3,1;A;", &format!("{alpha_beta};8;0;")).is_empty());
    }

    #[test]
    fn armies_json_uses_camel_case_fields() {
        let handle = BattleHandle::new("5,3;4,1;B;").unwrap();
        assert_eq!(
            handle.armies_json(),
            r#"{"armyA":[{"health":5,"damage":3}],"armyB":[{"health":4,"damage":1}],"currentPlayer":"B","startingPlayer":"B"}"#
        );
    }

    #[test]
    fn validate_solution_reports_problems_as_text() {
        assert_eq!(validate_solution_encoded("5,3;4,1;A;", "A(0,0),B(0,0),A(0,0);4;4;"), "");
        assert_eq!(
            validate_solution_encoded("5,3;4,1;A;", "A(0,0),B(0,0),A(0,0);5;4;"),
            "solution claims value 5 but replay scores 4"
        );
    }
}
