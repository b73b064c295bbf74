//! Randomized nearest-neighbour construction: every step picks uniformly
//! among the closer half of the nodes that still fit the vehicle.

use super::utils::{build_routes_top_fraction, route_sum, solve_by_attempts};
use anyhow::Result;
use vrbench_challenges::vehicle_routing::*;

pub const MAX_ATTEMPTS: usize = 1000;

pub fn solve_challenge(
    ctx: &mut SolverContext,
    demands: Vec<i32>,
    distance_matrix: Vec<Vec<i32>>,
    vehicle_capacity: i32,
    _max_distance: i32,
) -> Result<Routes> {
    solve_by_attempts(
        ctx,
        "RandomSolver",
        MAX_ATTEMPTS,
        |ctx| build_routes_top_fraction(ctx, &demands, &distance_matrix, vehicle_capacity, 2),
        calc_identifier,
    )
}

/// `next() / routes.len() * sum(routes[0])`, with integer division.
fn calc_identifier(ctx: &mut SolverContext, routes: &Routes) -> i32 {
    let draw = ctx.next();
    match routes.first() {
        Some(first) => (draw / routes.len() as i32).wrapping_mul(route_sum(first)),
        None => draw,
    }
}
