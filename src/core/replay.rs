use crate::core::{
    attack_action::AttackAction,
    battle_state::BattleState,
    encoding::{parse_initial_state, parse_solution},
    error::SolveError,
};

#[derive(Clone, Debug)]
pub struct ReplayReport {
    pub final_state: BattleState,
    pub utility: i64,
    pub army_a_score: i64,
}

/// Plays `plan` from `initial` without consulting the search, requiring every action
/// to be among that step's legal actions.
pub fn replay_plan(initial: &BattleState, plan: &[AttackAction]) -> Result<BattleState, SolveError> {
    let mut state = initial.clone();

    for (step, action) in plan.iter().enumerate() {
        if state.is_terminal() {
            return Err(SolveError::PlanRejected {
                step,
                reason: format!("{action} played after the battle ended"),
            });
        }

        if !state.legal_actions().contains(action) {
            let reason = match state.check_action(action) {
                Err(err) => err.to_string(),
                Ok(()) => format!("{action} is not a legal action"),
            };
            return Err(SolveError::PlanRejected { step, reason });
        }

        state = state.after_action(action)?;
    }

    Ok(state)
}

/// Checks a `<plan>;<value>;<nodesVisited>;` result against the initial-state encoding
/// it claims to solve.
pub fn validate_solution(
    initial_state_encoding: &str,
    solution_encoding: &str,
) -> Result<ReplayReport, SolveError> {
    let initial = parse_initial_state(initial_state_encoding)?;
    let solution = parse_solution(solution_encoding)?;
    let final_state = replay_plan(&initial, &solution.plan)?;

    if !final_state.is_terminal() {
        return Err(SolveError::PlanRejected {
            step: solution.plan.len(),
            reason: format!("plan ends in non-terminal state {final_state}"),
        });
    }

    let utility = final_state.utility();
    if utility != solution.value {
        return Err(SolveError::ValueMismatch {
            claimed: solution.value,
            replayed: utility,
        });
    }

    Ok(ReplayReport {
        army_a_score: final_state.army_a_score(),
        utility,
        final_state,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attack_action::parse_plan;

    #[test]
    fn validates_a_correct_solution() {
        let report = validate_solution("5,3;4,1;B;", "B(0,0),A(0,0),B(0,0),A(0,0);-3;5;").unwrap();
        assert_eq!(report.utility, -3);
        assert_eq!(report.army_a_score, 3);
        assert!(report.final_state.is_terminal());
    }

    #[test]
    fn rejects_wrong_actor_with_its_step() {
        let err = validate_solution("5,3;4,1;A;", "A(0,0),A(0,0);4;4;").unwrap_err();
        assert!(matches!(err, SolveError::PlanRejected { step: 1, .. }), "{err}");
    }

    #[test]
    fn rejects_dead_targets_and_moves_after_the_end() {
        let initial = parse_initial_state("9,1,1,1;3,5,1,1;A;").unwrap();
        let plan = parse_plan("A(0,1),B(0,1),A(0,1)").unwrap();
        assert!(matches!(
            replay_plan(&initial, &plan),
            Err(SolveError::PlanRejected { step: 2, .. })
        ));

        let finished = parse_initial_state("5,3;4,1;A;").unwrap();
        let plan = parse_plan("A(0,0),B(0,0),A(0,0),B(0,0)").unwrap();
        assert!(matches!(
            replay_plan(&finished, &plan),
            Err(SolveError::PlanRejected { step: 3, .. })
        ));
    }

    #[test]
    fn rejects_unfinished_plans_and_wrong_values() {
        assert!(matches!(
            validate_solution("5,3;4,1;A;", "A(0,0);4;4;"),
            Err(SolveError::PlanRejected { step: 1, .. })
        ));
        assert!(matches!(
            validate_solution("5,3;4,1;A;", "A(0,0),B(0,0),A(0,0);5;4;"),
            Err(SolveError::ValueMismatch {
                claimed: 5,
                replayed: 4
            })
        ));
    }

    #[test]
    fn empty_plan_is_valid_only_for_terminal_roots() {
        let report = validate_solution("0,3;4,1;A;", ";-4;1;").unwrap();
        assert_eq!(report.utility, -4);
        assert!(validate_solution("5,3;4,1;A;", ";0;1;").is_err());
    }
}
