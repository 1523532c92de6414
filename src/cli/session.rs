use battle_solver_rust::core::{
    attack_action::{AttackAction, actions_to_plan_string, parse_plan},
    battle_solver::{BattleNode, BattleSolver, SolverConfig},
    battle_state::BattleState,
    encoding::{format_initial_state, parse_initial_state},
    player::Player,
    search_node::SearchNode,
    tree_search::SearchAlgorithm,
    unit::Unit,
};
use crossterm::style::Stylize;
use std::io::{self, Write};
use std::rc::Rc;
use std::time::Instant;

pub struct Session {
    config: SolverConfig,
    root_state: BattleState,
    node: Rc<BattleNode>,
    should_quit: bool,
    recent_suggested_action: Option<AttackAction>,
}

fn default_initial_state() -> BattleState {
    BattleState::new(
        vec![Unit::new(1, 1), Unit::new(2, 3), Unit::new(6, 7)],
        vec![Unit::new(5, 5), Unit::new(3, 1)],
        Player::A,
    )
}

impl Session {
    pub fn new(config: SolverConfig) -> Self {
        let root_state = default_initial_state();
        Self {
            config,
            node: SearchNode::root(root_state.clone()),
            root_state,
            should_quit: false,
            recent_suggested_action: None,
        }
    }

    pub fn start(&mut self) {
        self.print_settings();
        println!("{}", self.node.state.summary(1));
        self.interpretation_loop();
    }

    fn interpretation_loop(&mut self) {
        let stdin = io::stdin();

        loop {
            print!("{}", self.user_prompt_text().bold());
            let _ = io::stdout().flush();

            let mut line = String::new();
            match stdin.read_line(&mut line) {
                Ok(0) => return,
                Ok(_) => {
                    // `;` belongs to the state encoding, so directives are separated by `|`
                    for subline in line.trim_end_matches(['\r', '\n']).split('|') {
                        self.interpret_directive(subline);
                        if self.should_quit {
                            return;
                        }
                    }
                }
                Err(_) => return,
            }
        }
    }

    fn without_comments(directive: &str) -> &str {
        directive
            .split_once('#')
            .map_or(directive, |(before, _)| before)
    }

    fn interpret_directive(&mut self, directive: &str) {
        const TAG_QUIT: &str = "q";
        const TAG_SET_STATE: &str = "s";
        const TAG_DISPLAY: &str = "d";
        const TAG_RESET: &str = "r";
        const TAG_REPEAT: &str = "x";
        const TAG_HISTORY: &str = "h";
        const TAG_UNDO: &str = "u";
        const TAG_ALPHA_BETA: &str = "a";
        const TAG_MINIMAX: &str = "m";
        const TAG_COMPARE: &str = "c";
        const TAG_EXECUTE_ANALYSIS: &str = "e";
        const TAG_EXECUTE_PREVIOUS_ANALYSIS: &str = "ep";
        const TAG_VISUALIZE: &str = "v";
        const TAG_MEMOIZE: &str = "memo";

        let directive = Self::without_comments(directive);
        let tokens = directive
            .split_whitespace()
            .map(|token| token.to_string())
            .collect::<Vec<_>>();
        let Some(first_token) = tokens.first() else {
            return;
        };
        let directive_tag = first_token.to_lowercase();

        if first_token.contains('(') {
            self.do_action_tokens(&tokens);
        } else if directive_tag == TAG_QUIT {
            self.should_quit = true;
        } else if directive_tag == TAG_SET_STATE {
            self.set_state(&tokens[1..].concat());
        } else if directive_tag == TAG_DISPLAY {
            self.print_settings();
            println!("{}", self.node.state.summary(1));
        } else if directive_tag == TAG_RESET {
            println!("(RESET)");
            self.node = SearchNode::root(self.root_state.clone());
            self.recent_suggested_action = None;
            println!("{}", self.node.state.summary(1));
        } else if directive_tag == TAG_UNDO {
            println!("(UNDO)");
            if let Some(parent) = self.node.parent.clone() {
                self.node = parent;
                self.recent_suggested_action = None;
            }
            println!("{}", self.node.state.summary(1));
        } else if directive_tag == TAG_REPEAT {
            match tokens.get(1).and_then(|token| token.parse::<usize>().ok()) {
                Some(num_repeats) if tokens.len() > 2 => {
                    let directive_text = tokens[2..].join(" ");
                    println!("(REPEAT {num_repeats}: {directive_text})");
                    for _ in 0..num_repeats {
                        self.interpret_directive(&directive_text);
                    }
                }
                _ => println!("directive {directive_tag} needs repetition count and directive to repeat"),
            }
        } else if directive_tag == TAG_HISTORY {
            println!(
                "{TAG_SET_STATE} {} | {}",
                format_initial_state(&self.root_state),
                actions_to_plan_string(&self.node.plan())
            );
        } else if directive_tag == TAG_ALPHA_BETA {
            self.analyze(SearchAlgorithm::AlphaBeta, false);
        } else if directive_tag == TAG_MINIMAX {
            self.analyze(SearchAlgorithm::Minimax, false);
        } else if directive_tag == TAG_COMPARE {
            self.analyze(SearchAlgorithm::Minimax, false);
            self.analyze(SearchAlgorithm::AlphaBeta, false);
        } else if directive_tag == TAG_EXECUTE_ANALYSIS {
            self.analyze(self.config.algorithm, true);
        } else if directive_tag == TAG_EXECUTE_PREVIOUS_ANALYSIS {
            if let Some(action) = self.recent_suggested_action {
                self.do_action(action);
            } else {
                println!("no recent analyzed action");
            }
        } else if directive_tag == TAG_VISUALIZE {
            self.config.visualize = Self::toggled(tokens.get(1), self.config.visualize);
            self.print_settings();
        } else if directive_tag == TAG_MEMOIZE {
            self.config.memoize = Self::toggled(tokens.get(1), self.config.memoize);
            self.print_settings();
        } else {
            let mut explanations = vec![
                "a       | solve with alpha-beta",
                "c       | solve with both algorithms and compare",
                "d       | display settings and state",
                "e       | solve then execute the first suggested action",
                "ep      | execute last suggested action",
                "h       | display state and actions so far",
                "m       | solve with plain minimax",
                "memo [bool] | set or toggle memoization (minimax only)",
                "q       | quit",
                "r       | reset to the initial state",
                "s [state] | set initial state, e.g. s 5,3;4,1;A;",
                "u       | undo last action",
                "v [bool] | set or toggle solution visualization",
                "x [n] [cmd] | repeat [cmd] n times",
                "[P(i,j)] [...] | play those actions",
            ];
            explanations.sort();
            println!("  {}", format!("unrecognized directive '{}'", directive.trim()).red());
            for explanation in explanations {
                println!("  {explanation}");
            }
        }
    }

    fn toggled(token: Option<&String>, current: bool) -> bool {
        token
            .and_then(|token| token.parse::<bool>().ok())
            .unwrap_or(!current)
    }

    fn set_state(&mut self, encoding: &str) {
        match parse_initial_state(encoding) {
            Ok(state) => {
                self.root_state = state;
                self.node = SearchNode::root(self.root_state.clone());
                self.recent_suggested_action = None;
                println!("{}", self.node.state.summary(1));
            }
            Err(err) => println!("  {}", err.to_string().red()),
        }
    }

    fn print_settings(&self) {
        println!("  Algorithm(e):  {}", self.config.algorithm);
        println!("  Memoize(memo): {}", self.config.memoize);
        println!("  Visualize(v):  {}", self.config.visualize);
        println!("  InitialState:  {}", format_initial_state(&self.root_state));
    }

    fn analyze(&mut self, algorithm: SearchAlgorithm, do_suggested_action: bool) {
        let config = SolverConfig {
            algorithm,
            ..self.config
        };

        let watch = Instant::now();
        let solution = match BattleSolver::new(config).solve_state(&self.node.state) {
            Ok(solution) => solution,
            Err(err) => {
                println!("  {}", format!("search failed: {err}").red());
                return;
            }
        };
        let elapsed = watch.elapsed();

        if let Some(trace) = solution.trace.as_ref() {
            println!("{trace}");
        }

        println!(
            "algorithm={:<10} value={:+} nodes={} timeSec={:.3} plan={}",
            algorithm,
            solution.value,
            solution.num_nodes_visited,
            elapsed.as_secs_f64(),
            actions_to_plan_string(&solution.plan)
        );

        self.recent_suggested_action = solution.plan.first().copied();

        if do_suggested_action {
            if let Some(action) = self.recent_suggested_action {
                self.do_action(action);
            }
        }
    }

    fn do_action_tokens(&mut self, tokens: &[String]) {
        let mut actions = Vec::new();

        for token in tokens {
            match parse_plan(token) {
                Ok(parsed) => actions.extend(parsed),
                Err(err) => {
                    println!("  {}", err.to_string().red());
                    return;
                }
            }
        }

        for action in actions {
            if !self.do_action(action) {
                return;
            }
        }
    }

    fn do_action(&mut self, action: AttackAction) -> bool {
        self.recent_suggested_action = None;

        if self.node.state.is_terminal() {
            println!("  battle is over; actions not accepted");
            return false;
        }

        match self.node.state.after_action(&action) {
            Ok(next_state) => {
                self.node = SearchNode::child(&self.node, action, next_state);
                println!("{}", self.node.state.summary(1));
                true
            }
            Err(err) => {
                println!("  {}", format!("invalid action: {err}").red());
                false
            }
        }
    }

    fn user_prompt_text(&self) -> String {
        let state = &self.node.state;

        if !state.is_terminal() {
            return format!("{}> ", state.current_player);
        }

        let survivors = Player::ALL
            .iter()
            .filter(|player| state.total_health(**player) > 0)
            .collect::<Vec<_>>();
        match survivors.as_slice() {
            [winner] => format!("{winner} WON ({:+})> ", state.utility()),
            _ => "DRAW> ".to_string(),
        }
    }
}
