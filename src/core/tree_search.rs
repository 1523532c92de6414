use crate::core::error::SolveError;
use crate::core::game_state::GameState;
use crate::core::search_node::SearchNode;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::rc::Rc;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchAlgorithm {
    #[default]
    Minimax,
    AlphaBeta,
}

impl fmt::Display for SearchAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchAlgorithm::Minimax => f.pad("minimax"),
            SearchAlgorithm::AlphaBeta => f.pad("alpha-beta"),
        }
    }
}

/// Value of a searched position together with the terminal node ending its principal line.
pub struct SearchOutcome<TAction, TGameState> {
    pub value: i64,
    pub terminal_node: Rc<SearchNode<TAction, TGameState>>,
}

struct MemoEntry<TAction> {
    value: i64,
    continuation: Vec<TAction>,
}

type TranspositionTable<TAction, TGameState> = HashMap<TGameState, MemoEntry<TAction>>;

pub struct TreeSearch<TAction, TGameState> {
    _phantom: PhantomData<(TAction, TGameState)>,
}

impl<TAction, TGameState> TreeSearch<TAction, TGameState>
where
    TAction: Clone,
    TGameState: GameState<TAction> + Eq + Hash + fmt::Display,
{
    pub const ALPHA_INITIAL: i64 = i64::MIN;
    pub const BETA_INITIAL: i64 = i64::MAX;

    /// Searches the whole tree below `state`. `memoize` only applies to plain minimax;
    /// alpha-beta always runs as a fresh traversal.
    pub fn find_best_line(
        state: &TGameState,
        algorithm: SearchAlgorithm,
        memoize: bool,
        num_nodes_visited: &mut usize,
    ) -> Result<SearchOutcome<TAction, TGameState>, SolveError> {
        *num_nodes_visited = 0;

        let root = SearchNode::root(state.clone());
        let maximizing = state.is_maximizing_turn();

        match algorithm {
            SearchAlgorithm::Minimax => {
                let mut memo = memoize.then(TranspositionTable::new);
                Self::minimax(root, maximizing, &mut memo, num_nodes_visited)
            }
            SearchAlgorithm::AlphaBeta => {
                if memoize {
                    tracing::warn!("memoization requested for alpha-beta search; ignoring it");
                }

                Self::alpha_beta(
                    root,
                    Self::ALPHA_INITIAL,
                    Self::BETA_INITIAL,
                    maximizing,
                    num_nodes_visited,
                )
            }
        }
    }

    fn minimax(
        node: Rc<SearchNode<TAction, TGameState>>,
        maximizing: bool,
        memo: &mut Option<TranspositionTable<TAction, TGameState>>,
        num_nodes_visited: &mut usize,
    ) -> Result<SearchOutcome<TAction, TGameState>, SolveError> {
        *num_nodes_visited += 1;

        if let Some(entry) = memo.as_ref().and_then(|table| table.get(&node.state)) {
            tracing::trace!(depth = node.depth, value = entry.value, "transposition hit");
            return Self::replay_continuation(node, entry);
        }

        let outcome = if node.state.is_terminal() {
            SearchOutcome {
                value: node.state.utility(),
                terminal_node: Rc::clone(&node),
            }
        } else {
            let mut best_outcome: Option<SearchOutcome<TAction, TGameState>> = None;

            for child in Self::expand(&node)? {
                let hypo_outcome = Self::minimax(child, !maximizing, memo, num_nodes_visited)?;

                if best_outcome
                    .as_ref()
                    .is_none_or(|best| improves(hypo_outcome.value, best.value, maximizing))
                {
                    best_outcome = Some(hypo_outcome);
                }
            }

            best_outcome.ok_or_else(|| SolveError::NoLegalActions(node.state.to_string()))?
        };

        if let Some(table) = memo.as_mut() {
            table.insert(
                node.state.clone(),
                MemoEntry {
                    value: outcome.value,
                    continuation: outcome.terminal_node.actions_since(node.depth),
                },
            );
        }

        Ok(outcome)
    }

    fn alpha_beta(
        node: Rc<SearchNode<TAction, TGameState>>,
        alpha: i64,
        beta: i64,
        maximizing: bool,
        num_nodes_visited: &mut usize,
    ) -> Result<SearchOutcome<TAction, TGameState>, SolveError> {
        *num_nodes_visited += 1;

        if node.state.is_terminal() {
            return Ok(SearchOutcome {
                value: node.state.utility(),
                terminal_node: node,
            });
        }

        let mut children = Self::expand(&node)?;
        children.sort_by(|a, b| {
            compare_scores(
                a.state.heuristic_score(),
                b.state.heuristic_score(),
                !maximizing,
            )
        });

        let mut best_outcome: Option<SearchOutcome<TAction, TGameState>> = None;
        let mut alpha = alpha;
        let mut beta = beta;

        for child in children {
            let hypo_outcome =
                Self::alpha_beta(child, alpha, beta, !maximizing, num_nodes_visited)?;

            if best_outcome
                .as_ref()
                .is_none_or(|best| improves(hypo_outcome.value, best.value, maximizing))
            {
                best_outcome = Some(hypo_outcome);
            }

            if let Some(best) = best_outcome.as_ref() {
                if maximizing {
                    alpha = alpha.max(best.value);
                } else {
                    beta = beta.min(best.value);
                }
            }

            if beta <= alpha {
                break;
            }
        }

        best_outcome.ok_or_else(|| SolveError::NoLegalActions(node.state.to_string()))
    }

    fn expand(
        node: &Rc<SearchNode<TAction, TGameState>>,
    ) -> Result<Vec<Rc<SearchNode<TAction, TGameState>>>, SolveError> {
        node.state
            .possible_actions()
            .into_iter()
            .map(|action| {
                let child_state = node.state.after_action(&action)?;
                Ok(SearchNode::child(node, action, child_state))
            })
            .collect()
    }

    /// Rebuilds a cached principal line below `node` so the terminal node's ancestry is
    /// the current path rather than wherever the entry was first recorded.
    fn replay_continuation(
        node: Rc<SearchNode<TAction, TGameState>>,
        entry: &MemoEntry<TAction>,
    ) -> Result<SearchOutcome<TAction, TGameState>, SolveError> {
        let mut terminal_node = node;

        for action in &entry.continuation {
            let next_state = terminal_node.state.after_action(action)?;
            terminal_node = SearchNode::child(&terminal_node, action.clone(), next_state);
        }

        Ok(SearchOutcome {
            value: entry.value,
            terminal_node,
        })
    }
}

// Strict comparison keeps the leftmost child among equally good ones.
fn improves(candidate: i64, incumbent: i64, maximizing: bool) -> bool {
    if maximizing {
        candidate > incumbent
    } else {
        candidate < incumbent
    }
}

fn compare_scores(a: i64, b: i64, sort_ascending: bool) -> Ordering {
    if sort_ascending { a.cmp(&b) } else { b.cmp(&a) }
}
