use thiserror::Error;

#[derive(Debug, Error)]
pub enum SolveError {
    #[error("malformed initial state '{input}': {reason}")]
    MalformedInput { input: String, reason: String },

    #[error("initial state '{input}' never terminates: both armies field a living zero-damage unit")]
    NonTerminating { input: String },

    #[error("malformed action '{0}'")]
    MalformedAction(String),

    #[error("illegal action {action} in state {state}: {reason}")]
    IllegalAction {
        action: String,
        state: String,
        reason: String,
    },

    #[error("non-terminal state {0} has no legal actions")]
    NoLegalActions(String),

    #[error("malformed solution '{0}'")]
    MalformedSolution(String),

    #[error("plan rejected at step {step}: {reason}")]
    PlanRejected { step: usize, reason: String },

    #[error("solution claims value {claimed} but replay scores {replayed}")]
    ValueMismatch { claimed: i64, replayed: i64 },

    #[error("invalid solver config: {0}")]
    Config(#[from] serde_json::Error),
}

impl SolveError {
    pub fn malformed_input(input: &str, reason: impl Into<String>) -> Self {
        SolveError::MalformedInput {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SolveError>;
