use crate::core::{
    attack_action::{AttackAction, actions_to_plan_string, parse_plan},
    battle_state::BattleState,
    error::SolveError,
    player::Player,
    unit::{Army, Unit},
};
use itertools::Itertools;

/// Parses `h,d,h,d,...;h,d,...;P;` into a root state with the starting player to move.
/// The trailing `;` is optional; anything after the player field must be empty.
pub fn parse_initial_state(input: &str) -> Result<BattleState, SolveError> {
    let fields = input.trim().split(';').collect::<Vec<_>>();
    if fields.len() < 3 {
        return Err(SolveError::malformed_input(
            input,
            "expected army A, army B and the starting player separated by ';'",
        ));
    }

    if fields[3..].iter().any(|field| !field.trim().is_empty()) {
        return Err(SolveError::malformed_input(input, "unexpected fields after the starting player"));
    }

    let army_a = parse_army(input, fields[0], Player::A)?;
    let army_b = parse_army(input, fields[1], Player::B)?;
    let starting_player = Player::parse(fields[2]).ok_or_else(|| {
        SolveError::malformed_input(input, format!("starting player '{}' is not A or B", fields[2].trim()))
    })?;

    let state = BattleState::new(army_a, army_b, starting_player);
    if state.allows_endless_play() {
        return Err(SolveError::NonTerminating {
            input: input.to_string(),
        });
    }

    Ok(state)
}

fn parse_army(input: &str, field: &str, player: Player) -> Result<Army, SolveError> {
    if field.trim().is_empty() {
        return Err(SolveError::malformed_input(input, format!("army {player} has no units")));
    }

    let numbers = field
        .split(',')
        .map(|token| {
            token.trim().parse::<u32>().map_err(|_| {
                SolveError::malformed_input(
                    input,
                    format!("army {player} value '{}' is not a non-negative integer", token.trim()),
                )
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if numbers.len() % 2 != 0 {
        return Err(SolveError::malformed_input(
            input,
            format!("army {player} has an odd number of fields"),
        ));
    }

    Ok(numbers
        .into_iter()
        .tuples()
        .map(|(health, damage)| Unit::new(health, damage))
        .collect())
}

/// Inverse of [`parse_initial_state`] for a root state.
pub fn format_initial_state(state: &BattleState) -> String {
    let flatten = |army: &[Unit]| {
        army.iter()
            .flat_map(|unit| [unit.health, unit.damage])
            .join(",")
    };
    format!(
        "{};{};{};",
        flatten(&state.army_a),
        flatten(&state.army_b),
        state.starting_player
    )
}

/// `<plan>;<value>;<nodesVisited>;`
pub fn format_solution(plan: &[AttackAction], value: i64, num_nodes_visited: usize) -> String {
    format!("{};{value};{num_nodes_visited};", actions_to_plan_string(plan))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedSolution {
    pub plan: Vec<AttackAction>,
    pub value: i64,
    pub num_nodes_visited: usize,
}

pub fn parse_solution(text: &str) -> Result<EncodedSolution, SolveError> {
    let malformed = || SolveError::MalformedSolution(text.to_string());
    let fields = text.trim().split(';').collect::<Vec<_>>();

    if fields.len() < 3 || fields[3..].iter().any(|field| !field.trim().is_empty()) {
        return Err(malformed());
    }

    let plan = parse_plan(fields[0])?;
    let value = fields[1].trim().parse::<i64>().map_err(|_| malformed())?;
    let num_nodes_visited = fields[2].trim().parse::<usize>().map_err(|_| malformed())?;

    Ok(EncodedSolution {
        plan,
        value,
        num_nodes_visited,
    })
}
