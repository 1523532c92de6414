use crate::core::error::SolveError;

pub trait GameState<TAction>: Clone {
    fn is_terminal(&self) -> bool;
    fn utility(&self) -> i64;
    fn heuristic_score(&self) -> i64;
    fn is_maximizing_turn(&self) -> bool;
    fn possible_actions(&self) -> Vec<TAction>;
    fn after_action(&self, action: &TAction) -> Result<Self, SolveError>;
}
