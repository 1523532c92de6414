pub mod attack_action;
pub mod battle_solver;
pub mod battle_state;
pub mod encoding;
pub mod error;
pub mod game_state;
pub mod player;
pub mod replay;
pub mod search_node;
pub mod tree_search;
pub mod unit;
