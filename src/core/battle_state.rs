use crate::core::{
    attack_action::AttackAction,
    error::SolveError,
    game_state::GameState,
    player::Player,
    unit::{Army, Unit, alive_indices, army_text, total_health},
};
use itertools::iproduct;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// One configuration of the battle. Every state owns its own copy of both armies;
/// successors are built by [`BattleState::after_action`] and never share unit storage.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
#[readonly::make]
pub struct BattleState {
    pub army_a: Army,
    pub army_b: Army,
    pub current_player: Player,
    pub starting_player: Player,
}

impl BattleState {
    pub fn new(army_a: Army, army_b: Army, starting_player: Player) -> Self {
        Self {
            army_a,
            army_b,
            current_player: starting_player,
            starting_player,
        }
    }

    /// Copy of this state with `player` to move; `starting_player` is kept.
    pub fn with_current_player(&self, player: Player) -> Self {
        Self {
            current_player: player,
            ..self.clone()
        }
    }

    pub fn army(&self, player: Player) -> &[Unit] {
        match player {
            Player::A => &self.army_a,
            Player::B => &self.army_b,
        }
    }

    fn army_mut(&mut self, player: Player) -> &mut Army {
        match player {
            Player::A => &mut self.army_a,
            Player::B => &mut self.army_b,
        }
    }

    pub fn total_health(&self, player: Player) -> i64 {
        total_health(self.army(player))
    }

    pub fn is_terminal(&self) -> bool {
        self.total_health(Player::A) == 0 || self.total_health(Player::B) == 0
    }

    /// Terminal score from the starting player's point of view: their remaining health
    /// if the opponent is wiped out, minus the opponent's remaining health if they are.
    /// Both armies empty scores 0, as does any non-terminal state.
    pub fn utility(&self) -> i64 {
        let own_health = self.total_health(self.starting_player);
        let enemy_health = self.total_health(self.starting_player.opponent());

        if enemy_health == 0 {
            own_health
        } else if own_health == 0 {
            -enemy_health
        } else {
            0
        }
    }

    /// Same measure as [`BattleState::utility`] but always from army A's point of view.
    pub fn army_a_score(&self) -> i64 {
        if self.starting_player == Player::A {
            self.utility()
        } else {
            -self.utility()
        }
    }

    /// Health advantage of the starting player; larger is better for the maximizing side.
    pub fn heuristic_score(&self) -> i64 {
        self.total_health(self.starting_player) - self.total_health(self.starting_player.opponent())
    }

    pub fn is_maximizing_turn(&self) -> bool {
        self.current_player == self.starting_player
    }

    /// Alive attackers of the current player against alive targets, attacker-major,
    /// both in ascending index order.
    pub fn legal_actions(&self) -> Vec<AttackAction> {
        let player = self.current_player;
        let attackers = alive_indices(self.army(player)).collect::<Vec<_>>();
        let targets = alive_indices(self.army(player.opponent())).collect::<Vec<_>>();

        iproduct!(attackers, targets)
            .map(|(attacker_idx, target_idx)| AttackAction::new(player, attacker_idx, target_idx))
            .collect()
    }

    pub fn check_action(&self, action: &AttackAction) -> Result<(), SolveError> {
        let reason = if action.player != self.current_player {
            Some(format!("it is {}'s turn", self.current_player))
        } else {
            match (
                self.army(action.player).get(action.attacker_idx),
                self.army(action.player.opponent()).get(action.target_idx),
            ) {
                (None, _) => Some(format!("no attacker at index {}", action.attacker_idx)),
                (_, None) => Some(format!("no target at index {}", action.target_idx)),
                (Some(attacker), _) if !attacker.is_alive() => {
                    Some(format!("attacker {} is dead", action.attacker_idx))
                }
                (_, Some(target)) if !target.is_alive() => {
                    Some(format!("target {} is dead", action.target_idx))
                }
                _ => None,
            }
        };

        match reason {
            Some(reason) => Err(SolveError::IllegalAction {
                action: action.to_string(),
                state: self.to_string(),
                reason,
            }),
            None => Ok(()),
        }
    }

    pub fn after_action(&self, action: &AttackAction) -> Result<Self, SolveError> {
        self.check_action(action)?;

        let mut new_state = self.clone();
        let damage = self.army(action.player)[action.attacker_idx].damage;
        let target = &mut new_state.army_mut(action.player.opponent())[action.target_idx];
        *target = target.wounded(damage);
        new_state.current_player = self.current_player.opponent();

        Ok(new_state)
    }

    /// True when both sides still field a living unit that deals no damage, which lets
    /// the players trade no-op attacks forever.
    pub fn allows_endless_play(&self) -> bool {
        Player::ALL.iter().all(|player| {
            self.army(*player)
                .iter()
                .any(|unit| unit.is_alive() && unit.damage == 0)
        })
    }

    pub fn summary(&self, indentation_level: usize) -> String {
        self.state_summary(&" ".repeat(indentation_level))
    }

    pub fn state_summary(&self, leading_text: &str) -> String {
        let mut sb = String::new();
        sb.push_str(&format!("{leading_text}Army A: {}", army_text(&self.army_a)));
        sb.push_str(&format!("\n{leading_text}Army B: {}", army_text(&self.army_b)));
        sb.push_str(&format!("\n{leading_text}Current Player: {}", self.current_player));
        sb.push_str(&format!(
            "\n{leading_text}Total Health A: {}",
            self.total_health(Player::A)
        ));
        sb.push_str(&format!(
            "\n{leading_text}Total Health B: {}",
            self.total_health(Player::B)
        ));
        sb
    }
}

impl fmt::Display for BattleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let compact = |army: &[Unit]| {
            army.iter()
                .map(|unit| format!("{}/{}", unit.health, unit.damage))
                .collect::<Vec<_>>()
                .join(",")
        };
        write!(
            f,
            "A[{}] B[{}] {}>{}",
            compact(&self.army_a),
            compact(&self.army_b),
            self.starting_player,
            self.current_player
        )
    }
}

// Memoization equivalence; `starting_player` is not compared, so a table must never
// outlive the search of a single root.
impl PartialEq for BattleState {
    fn eq(&self, other: &Self) -> bool {
        self.current_player == other.current_player
            && self.army_a == other.army_a
            && self.army_b == other.army_b
    }
}

impl Eq for BattleState {}

impl Hash for BattleState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.current_player.hash(state);
        self.army_a.hash(state);
        self.army_b.hash(state);
    }
}

impl GameState<AttackAction> for BattleState {
    fn is_terminal(&self) -> bool {
        BattleState::is_terminal(self)
    }

    fn utility(&self) -> i64 {
        BattleState::utility(self)
    }

    fn heuristic_score(&self) -> i64 {
        BattleState::heuristic_score(self)
    }

    fn is_maximizing_turn(&self) -> bool {
        BattleState::is_maximizing_turn(self)
    }

    fn possible_actions(&self) -> Vec<AttackAction> {
        self.legal_actions()
    }

    fn after_action(&self, action: &AttackAction) -> Result<Self, SolveError> {
        BattleState::after_action(self, action)
    }
}
