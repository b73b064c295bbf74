use vrbench_challenges::{vehicle_routing::SolveFn, ChallengeError};

pub mod better_random_solver;
pub mod prop_select;
pub mod random_solver;
pub mod random_solver_boosted;
pub mod random_solver_even_more_boosted;
pub mod rsb2;
pub mod spicy_tsp;
mod utils;

pub const MAX_ALGORITHM_NAME_LEN: usize = 20;

/// Registered algorithms, by the name they are selected with.
pub const ALGORITHMS: &[(&str, SolveFn)] = &[
    ("RandomSolver", random_solver::solve_challenge),
    ("RandomSolverBoosted", random_solver_boosted::solve_challenge),
    (
        "RandomSolverEvenMoreBoosted",
        random_solver_even_more_boosted::solve_challenge,
    ),
    ("BetterRandomSolver", better_random_solver::solve_challenge),
    ("RSB2", rsb2::solve_challenge),
    ("PropSelect", prop_select::solve_challenge),
    ("SpicyTSP", spicy_tsp::solve_challenge),
];

pub fn algorithm_exists(name: &str) -> bool {
    get_algorithm(name).is_some()
}

pub fn get_algorithm(name: &str) -> Option<SolveFn> {
    ALGORITHMS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, solve)| solve)
}

pub fn try_get_algorithm(name: &str) -> Result<SolveFn, ChallengeError> {
    get_algorithm(name).ok_or_else(|| ChallengeError::UnknownAlgorithm {
        name: name.to_string(),
    })
}

pub fn algorithm_names() -> impl Iterator<Item = &'static str> {
    ALGORITHMS.iter().map(|&(name, _)| name)
}

/// Names of newly submitted algorithms must be at most 20 ASCII alphanumerics.
pub fn is_valid_algorithm_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_ALGORITHM_NAME_LEN
        && name.chars().all(|c| c.is_ascii_alphanumeric())
}
