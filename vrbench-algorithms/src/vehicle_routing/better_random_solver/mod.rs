//! RandomSolver with ten times the attempt budget, for machines where the
//! bottleneck is not CPU.

use super::utils::{build_routes_top_fraction, solve_by_attempts};
use anyhow::Result;
use vrbench_challenges::vehicle_routing::*;

pub const MAX_ATTEMPTS: usize = 10000;

pub fn solve_challenge(
    ctx: &mut SolverContext,
    demands: Vec<i32>,
    distance_matrix: Vec<Vec<i32>>,
    vehicle_capacity: i32,
    _max_distance: i32,
) -> Result<Routes> {
    let num_nodes = demands.len();
    solve_by_attempts(
        ctx,
        "BetterRandomSolver",
        MAX_ATTEMPTS,
        |ctx| build_routes_top_fraction(ctx, &demands, &distance_matrix, vehicle_capacity, 2),
        |_, routes| calc_identifier(num_nodes, routes),
    )
}

/// Wrapping product of every index set in the "opens a route" bit vector.
fn calc_identifier(num_nodes: usize, routes: &Routes) -> i32 {
    let mut opens_route = vec![false; num_nodes];
    for route in routes {
        if let Some(&first) = route.first() {
            opens_route[first] = true;
        }
    }
    opens_route
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, &set)| set)
        .fold(1i32, |acc, (i, _)| acc.wrapping_mul(i as i32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calc_identifier() {
        assert_eq!(calc_identifier(8, &vec![]), 1);
        assert_eq!(calc_identifier(8, &vec![vec![3, 1], vec![5], vec![7, 2]]), 3 * 5 * 7);
    }
}
