use crate::core::{error::SolveError, player::Player};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One attack, written `P(attacker,target)`: a unit of `player` strikes a unit of the opponent.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
#[readonly::make]
pub struct AttackAction {
    pub player: Player,
    pub attacker_idx: usize,
    pub target_idx: usize,
}

impl AttackAction {
    pub fn new(player: Player, attacker_idx: usize, target_idx: usize) -> Self {
        Self {
            player,
            attacker_idx,
            target_idx,
        }
    }
}

impl fmt::Display for AttackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({},{})", self.player, self.attacker_idx, self.target_idx)
    }
}

impl FromStr for AttackAction {
    type Err = SolveError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let malformed = || SolveError::MalformedAction(text.to_string());
        let trimmed = text.trim();
        let (player_text, rest) = trimmed.split_at_checked(1).ok_or_else(malformed)?;
        let player = Player::parse(player_text).ok_or_else(malformed)?;
        let inner = rest
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(malformed)?;
        let (attacker_text, target_text) = inner.split_once(',').ok_or_else(malformed)?;
        let attacker_idx = attacker_text.trim().parse::<usize>().map_err(|_| malformed())?;
        let target_idx = target_text.trim().parse::<usize>().map_err(|_| malformed())?;

        Ok(Self::new(player, attacker_idx, target_idx))
    }
}

pub fn actions_to_plan_string<'a>(actions: impl IntoIterator<Item = &'a AttackAction>) -> String {
    actions.into_iter().join(",")
}

/// Splits a comma-joined plan such as `A(0,1),B(1,0)`; the commas inside parentheses
/// belong to the actions.
pub fn parse_plan(plan_text: &str) -> Result<Vec<AttackAction>, SolveError> {
    let plan_text = plan_text.trim();
    if plan_text.is_empty() {
        return Ok(Vec::new());
    }

    let mut actions = Vec::new();
    let mut remaining = plan_text;

    while !remaining.is_empty() {
        let close_idx = remaining
            .find(')')
            .ok_or_else(|| SolveError::MalformedAction(remaining.to_string()))?;
        let (token, rest) = remaining.split_at(close_idx + 1);
        actions.push(token.parse::<AttackAction>()?);

        remaining = rest.trim_start();
        if let Some(after_comma) = remaining.strip_prefix(',') {
            remaining = after_comma.trim_start();
            if remaining.is_empty() {
                return Err(SolveError::MalformedAction(plan_text.to_string()));
            }
        } else if !remaining.is_empty() {
            return Err(SolveError::MalformedAction(remaining.to_string()));
        }
    }

    Ok(actions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_player_prefix_and_indices() {
        assert_eq!(AttackAction::new(Player::A, 0, 1).to_string(), "A(0,1)");
        assert_eq!(AttackAction::new(Player::B, 12, 3).to_string(), "B(12,3)");
    }

    #[test]
    fn from_str_reads_display_output() {
        let action = "B(2,0)".parse::<AttackAction>().unwrap();
        assert_eq!(action, AttackAction::new(Player::B, 2, 0));
        assert_eq!(
            " A( 1 , 4 ) ".parse::<AttackAction>().unwrap(),
            AttackAction::new(Player::A, 1, 4)
        );
    }

    #[test]
    fn from_str_rejects_bad_tokens() {
        for text in ["", "C(0,1)", "A0,1", "A(0,1", "A(0;1)", "A(-1,0)", "A(x,0)", "AB(0,1)"] {
            assert!(
                matches!(text.parse::<AttackAction>(), Err(SolveError::MalformedAction(_))),
                "expected '{text}' to be rejected"
            );
        }
    }

    #[test]
    fn plan_string_is_comma_joined() {
        let plan = vec![
            AttackAction::new(Player::A, 0, 0),
            AttackAction::new(Player::B, 0, 0),
            AttackAction::new(Player::A, 0, 0),
        ];
        assert_eq!(actions_to_plan_string(&plan), "A(0,0),B(0,0),A(0,0)");
        assert_eq!(actions_to_plan_string(&[]), "");
    }

    #[test]
    fn parse_plan_splits_between_actions_only() {
        let plan = parse_plan("A(0,1),B(1,0), A(2,3)").unwrap();
        assert_eq!(
            plan,
            vec![
                AttackAction::new(Player::A, 0, 1),
                AttackAction::new(Player::B, 1, 0),
                AttackAction::new(Player::A, 2, 3),
            ]
        );
        assert!(parse_plan("").unwrap().is_empty());
        assert!(parse_plan("A(0,1),").is_err());
        assert!(parse_plan("A(0,1)B(0,0)").is_err());
        assert!(parse_plan("A(0,1),junk").is_err());
    }
}
