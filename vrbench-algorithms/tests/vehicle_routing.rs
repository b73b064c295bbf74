use vrbench_algorithms::vehicle_routing::*;
use vrbench_challenges::vehicle_routing::{Challenge, Difficulty, Solution};
use vrbench_challenges::ChallengeError;

fn generate(num_nodes: i64, min_percent_shorter: i64, seed: u64) -> Challenge {
    Difficulty::new(num_nodes, min_percent_shorter)
        .unwrap()
        .generate_challenge(seed)
        .unwrap()
}

fn tiny_challenge() -> Challenge {
    Challenge {
        seed: 0,
        difficulty: Difficulty::new(4, 0).unwrap(),
        demands: vec![0, 45, 55, 12],
        distance_matrix: vec![
            vec![0, 175, 217, 257],
            vec![175, 0, 96, 424],
            vec![217, 96, 0, 216],
            vec![257, 424, 216, 0],
        ],
        baseline_total_distance: 1161,
        max_total_distance: 1161,
    }
}

fn identifiers(solution: &Solution) -> Vec<i32> {
    solution
        .state_updates
        .chunks_exact(4)
        .map(|b| i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}

#[test]
fn test_registry() {
    let names: Vec<&str> = algorithm_names().collect();
    assert_eq!(
        names,
        vec![
            "RandomSolver",
            "RandomSolverBoosted",
            "RandomSolverEvenMoreBoosted",
            "BetterRandomSolver",
            "RSB2",
            "PropSelect",
            "SpicyTSP",
        ]
    );
    for name in names {
        assert!(algorithm_exists(name));
    }
    assert!(!algorithm_exists("randomsolver"));
    assert!(get_algorithm("Nope").is_none());
    assert_eq!(
        try_get_algorithm("Nope").err(),
        Some(ChallengeError::UnknownAlgorithm {
            name: "Nope".to_string()
        })
    );
}

#[test]
fn test_algorithm_name_rules() {
    assert!(is_valid_algorithm_name("RSB2"));
    assert!(is_valid_algorithm_name("BetterRandomSolver"));
    assert!(is_valid_algorithm_name(&"a".repeat(20)));
    assert!(!is_valid_algorithm_name(&"a".repeat(21)));
    assert!(!is_valid_algorithm_name(""));
    assert!(!is_valid_algorithm_name("Spicy_TSP"));
    assert!(!is_valid_algorithm_name("Prop Select"));
}

#[test]
fn test_every_algorithm_is_deterministic_and_replays() {
    let challenge = generate(12, 0, 42);
    for name in algorithm_names() {
        let algorithm = get_algorithm(name).unwrap();
        let a = challenge.solve(algorithm, None, false).unwrap();
        let b = challenge.solve(algorithm, None, false).unwrap();
        assert_eq!(a, b, "{} is not deterministic", name);
        assert_eq!(a.is_solution, challenge.is_challenge_solution(&a.solution.routes));
        if !a.solution.routes.is_empty() {
            assert_ne!(challenge.evaluate_total_distance(&a.solution.routes), -1, "{}", name);
        }
        assert!(
            a.solution
                .verify_method_only(&challenge, algorithm, None)
                .unwrap(),
            "{} failed to replay its own stream",
            name
        );
    }
}

#[test]
fn test_replay_with_other_algorithm_is_rejected() {
    let challenge = generate(20, 0, 7);
    let random_solver = get_algorithm("RandomSolver").unwrap();
    let rsb2 = get_algorithm("RSB2").unwrap();
    let result = challenge.solve(random_solver, None, false).unwrap();
    assert!(!result
        .solution
        .verify_method_only(&challenge, rsb2, None)
        .unwrap());
    assert!(!result
        .solution
        .verify_solution_and_method(&challenge, rsb2, None)
        .unwrap());
}

#[test]
fn test_single_route_when_everything_fits() {
    // four customers demand at most 96 in total
    let challenge = generate(5, 0, 3);
    let random_solver = get_algorithm("RandomSolver").unwrap();
    let result = challenge.solve(random_solver, None, false).unwrap();
    assert!(result.is_solution);
    assert_eq!(result.solution.routes.len(), 1);
    let mut nodes = result.solution.routes[0].clone();
    nodes.sort();
    assert_eq!(nodes, vec![1, 2, 3, 4]);
}

#[test]
fn test_concession_on_unreachable_threshold() {
    let challenge = generate(15, 2000, 11);
    assert!(challenge.max_total_distance < 0);
    let attempt_budgets = [
        ("RandomSolver", 1000),
        ("RandomSolverBoosted", 500),
        ("RandomSolverEvenMoreBoosted", 400),
        ("RSB2", 500),
        ("PropSelect", 600),
    ];
    for (name, budget) in attempt_budgets {
        let algorithm = get_algorithm(name).unwrap();
        let result = challenge.solve(algorithm, None, false).unwrap();
        assert!(!result.is_solution);
        assert!(result.solution.routes.is_empty());
        assert_eq!(result.solution.num_identifiers(), budget, "{}", name);
        assert!(result
            .solution
            .verify_method_only(&challenge, algorithm, None)
            .unwrap());
    }
}

#[test]
fn test_extreme_percent_shorter_is_never_solved() {
    for seed in 0..5u64 {
        let challenge = generate(60, i32::MAX as i64, seed);
        assert!(challenge.max_total_distance < 0);
        for name in ["RSB2", "SpicyTSP"] {
            let algorithm = get_algorithm(name).unwrap();
            let result = challenge.solve(algorithm, None, false).unwrap();
            assert!(!result.is_solution, "{} seed {}", name, seed);
        }
    }
}

#[test]
fn test_depot_only_instance_concedes() {
    let challenge = generate(1, 0, 0);
    for name in algorithm_names() {
        let algorithm = get_algorithm(name).unwrap();
        let result = challenge.solve(algorithm, None, false).unwrap();
        assert!(!result.is_solution, "{}", name);
        assert!(result.solution.routes.is_empty(), "{}", name);
    }
}

#[test]
fn test_tampered_stream_is_rejected() {
    let challenge = generate(12, 0, 5);
    let algorithm = get_algorithm("PropSelect").unwrap();
    let result = challenge.solve(algorithm, None, false).unwrap();
    let solution = result.solution;
    assert!(solution.num_identifiers() > 0);

    let mut flipped = solution.clone();
    let last = flipped.state_updates.len() - 1;
    flipped.state_updates[last] ^= 0x01;
    assert!(!flipped.verify_method_only(&challenge, algorithm, None).unwrap());

    let mut trailing = solution.clone();
    trailing.state_updates.extend_from_slice(&[0, 0, 0, 0]);
    assert!(!trailing.verify_method_only(&challenge, algorithm, None).unwrap());

    let mut short = solution.clone();
    short.state_updates.truncate(short.state_updates.len() - 4);
    assert!(!short.verify_method_only(&challenge, algorithm, None).unwrap());

    // routes are not part of the replay
    let mut rerouted = solution.clone();
    rerouted.routes.reverse();
    assert!(rerouted.verify_method_only(&challenge, algorithm, None).unwrap());
}

#[test]
fn test_timeout_propagates() {
    let challenge = generate(12, 0, 9);
    let algorithm = get_algorithm("RandomSolverBoosted").unwrap();
    let err = challenge.solve(algorithm, Some(0.0), false).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ChallengeError>(),
        Some(ChallengeError::Timeout { .. })
    ));

    let result = challenge.solve(algorithm, None, false).unwrap();
    let err = result
        .solution
        .verify_method_only(&challenge, algorithm, Some(0.0))
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ChallengeError>(),
        Some(ChallengeError::Timeout { .. })
    ));
}

#[test]
fn test_spicy_tsp_on_tiny_instance() {
    let challenge = tiny_challenge();
    let algorithm = get_algorithm("SpicyTSP").unwrap();
    let result = challenge.solve(algorithm, None, false).unwrap();
    assert!(result.is_solution);
    assert_eq!(result.solution.routes, vec![vec![1, 2], vec![3]]);
    // one identifier per pass: [1, 2] sums to 3, then 3 * 3
    assert_eq!(identifiers(&result.solution), vec![3, 9]);
    assert_eq!(challenge.evaluate_total_distance(&result.solution.routes), 1002);
}

#[test]
fn test_spicy_tsp_places_lone_node() {
    let challenge = Challenge::new(
        0,
        Difficulty::new(2, 0).unwrap(),
        vec![0, 20],
        vec![vec![0, 30], vec![30, 0]],
    )
    .unwrap();
    assert_eq!(challenge.max_total_distance, 60);
    let algorithm = get_algorithm("SpicyTSP").unwrap();
    let result = challenge.solve(algorithm, None, false).unwrap();
    assert!(result.is_solution);
    assert_eq!(result.solution.routes, vec![vec![1]]);
    assert_eq!(identifiers(&result.solution), vec![1]);
}

#[test]
fn test_spicy_tsp_concedes_when_stalled() {
    // the only pair is too heavy and no node is ever alone
    let challenge = Challenge::new(
        0,
        Difficulty::new(3, 0).unwrap(),
        vec![0, 60, 60],
        vec![vec![0, 10, 10], vec![10, 0, 5], vec![10, 5, 0]],
    )
    .unwrap();
    let algorithm = get_algorithm("SpicyTSP").unwrap();
    let result = challenge.solve(algorithm, None, false).unwrap();
    assert!(!result.is_solution);
    assert!(result.solution.routes.is_empty());
    assert_eq!(identifiers(&result.solution), vec![1]);
}

#[test]
fn test_prop_select_takes_only_candidate() {
    let challenge = Challenge::new(
        0,
        Difficulty::new(2, 0).unwrap(),
        vec![0, 20],
        vec![vec![0, 30], vec![30, 0]],
    )
    .unwrap();
    let algorithm = get_algorithm("PropSelect").unwrap();
    let result = challenge.solve(algorithm, None, false).unwrap();
    assert!(result.is_solution);
    assert_eq!(result.solution.routes, vec![vec![1]]);
    assert_eq!(identifiers(&result.solution), vec![1]);
}

#[test]
fn test_rsb2_repeats_the_same_construction() {
    let challenge = generate(15, 2000, 4);
    let algorithm = get_algorithm("RSB2").unwrap();
    let result = challenge.solve(algorithm, None, false).unwrap();
    let ids = identifiers(&result.solution);
    assert_eq!(ids.len(), 500);
    assert!(ids.iter().all(|&id| id == ids[0]));
}

#[test]
fn test_first_route_identifier_policy() {
    // one customer per route: next() / 3 * routes[0][0] never wraps
    let challenge = Challenge::new(
        0,
        Difficulty::new(4, 2000).unwrap(),
        vec![0, 90, 90, 90],
        vec![vec![0, 10, 20, 30], vec![10, 0, 10, 20], vec![20, 10, 0, 10], vec![30, 20, 10, 0]],
    )
    .unwrap();
    let algorithm = get_algorithm("RandomSolver").unwrap();
    let result = challenge.solve(algorithm, None, false).unwrap();
    let ids = identifiers(&result.solution);
    assert_eq!(ids.len(), 1000);
    assert!(ids.iter().all(|&id| id >= 0));
}
