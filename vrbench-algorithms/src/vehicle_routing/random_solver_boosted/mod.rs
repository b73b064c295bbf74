//! Like RandomSolver, but draws among the closest third of the eligible
//! nodes and gives up after fewer attempts.

use super::utils::{build_routes_top_fraction, route_sums_product, solve_by_attempts};
use anyhow::Result;
use vrbench_challenges::vehicle_routing::*;

pub const MAX_ATTEMPTS: usize = 500;

pub fn solve_challenge(
    ctx: &mut SolverContext,
    demands: Vec<i32>,
    distance_matrix: Vec<Vec<i32>>,
    vehicle_capacity: i32,
    _max_distance: i32,
) -> Result<Routes> {
    solve_by_attempts(
        ctx,
        "RandomSolverBoosted",
        MAX_ATTEMPTS,
        |ctx| build_routes_top_fraction(ctx, &demands, &distance_matrix, vehicle_capacity, 3),
        |_, routes| route_sums_product(routes),
    )
}
