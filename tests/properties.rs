use battle_solver_rust::core::{
    battle_solver::{BattleSolver, Solution, SolverConfig},
    battle_state::BattleState,
    player::Player,
    replay::replay_plan,
    tree_search::SearchAlgorithm,
    unit::{Army, Unit},
};
use proptest::prelude::*;

fn army_strategy() -> impl Strategy<Value = Army> {
    prop::collection::vec((1u32..=3, 2u32..=4), 1..=2).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(health, damage)| Unit::new(health, damage))
            .collect()
    })
}

fn state_strategy() -> impl Strategy<Value = BattleState> {
    (army_strategy(), army_strategy(), prop::sample::select(Player::ALL.to_vec()))
        .prop_map(|(army_a, army_b, starting_player)| BattleState::new(army_a, army_b, starting_player))
}

fn solve_state(state: &BattleState, algorithm: SearchAlgorithm, memoize: bool) -> Solution {
    BattleSolver::new(SolverConfig {
        algorithm,
        memoize,
        visualize: false,
    })
    .solve_state(state)
    .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn algorithms_agree_on_value(state in state_strategy()) {
        let minimax = solve_state(&state, SearchAlgorithm::Minimax, false);
        let alpha_beta = solve_state(&state, SearchAlgorithm::AlphaBeta, false);
        let memoized = solve_state(&state, SearchAlgorithm::Minimax, true);

        prop_assert_eq!(minimax.value, alpha_beta.value);
        prop_assert_eq!(minimax.value, memoized.value);
    }

    #[test]
    fn alpha_beta_never_visits_more_nodes(state in state_strategy()) {
        let minimax = solve_state(&state, SearchAlgorithm::Minimax, false);
        let alpha_beta = solve_state(&state, SearchAlgorithm::AlphaBeta, false);

        prop_assert!(alpha_beta.num_nodes_visited <= minimax.num_nodes_visited);
    }

    #[test]
    fn every_plan_replays_to_its_value(state in state_strategy()) {
        for (algorithm, memoize) in [
            (SearchAlgorithm::Minimax, false),
            (SearchAlgorithm::Minimax, true),
            (SearchAlgorithm::AlphaBeta, false),
        ] {
            let solution = solve_state(&state, algorithm, memoize);
            let end_state = replay_plan(&state, &solution.plan).unwrap();

            prop_assert!(end_state.is_terminal());
            prop_assert_eq!(end_state.utility(), solution.value);
        }
    }

    #[test]
    fn value_is_bounded_by_starting_health(state in state_strategy()) {
        let bound = state.total_health(Player::A).max(state.total_health(Player::B));
        let solution = solve_state(&state, SearchAlgorithm::AlphaBeta, false);

        prop_assert!(solution.value.abs() <= bound);
    }

    #[test]
    fn solving_is_deterministic(state in state_strategy()) {
        for algorithm in [SearchAlgorithm::Minimax, SearchAlgorithm::AlphaBeta] {
            let first = solve_state(&state, algorithm, false);
            let second = solve_state(&state, algorithm, false);

            prop_assert_eq!(first.to_string(), second.to_string());
        }
    }
}
