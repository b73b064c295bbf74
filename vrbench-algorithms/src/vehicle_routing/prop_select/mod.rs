//! Fitness proportional selection over the eligible nodes, ranked by their
//! Clarke-Wright savings relative to the current node.

use super::utils::{calc_savings_matrix, eligible_nodes, route_sums_product, solve_by_attempts};
use anyhow::Result;
use vrbench_challenges::vehicle_routing::*;

pub const MAX_ATTEMPTS: usize = 600;

pub fn solve_challenge(
    ctx: &mut SolverContext,
    demands: Vec<i32>,
    distance_matrix: Vec<Vec<i32>>,
    vehicle_capacity: i32,
    _max_distance: i32,
) -> Result<Routes> {
    let savings = calc_savings_matrix(&distance_matrix);
    solve_by_attempts(
        ctx,
        "PropSelect",
        MAX_ATTEMPTS,
        |ctx| build_routes(ctx, &demands, &distance_matrix, &savings, vehicle_capacity),
        |_, routes| route_sums_product(routes),
    )
}

fn build_routes(
    ctx: &mut SolverContext,
    demands: &[i32],
    distance_matrix: &[Vec<i32>],
    savings: &[Vec<i32>],
    vehicle_capacity: i32,
) -> Routes {
    let mut routes = Vec::new();
    let mut not_visited: Vec<usize> = (1..demands.len()).collect();
    while !not_visited.is_empty() {
        let mut route = Vec::new();
        let mut current_node = 0;
        let mut capacity = vehicle_capacity;

        while capacity > 0 && !not_visited.is_empty() {
            let mut eligible = eligible_nodes(&not_visited, demands, capacity);
            if eligible.is_empty() {
                break;
            }
            // descending savings, equal savings in reverse not_visited order
            eligible.sort_by_key(|&(_, node)| savings[current_node][node]);
            eligible.reverse();

            let choice = if eligible.len() == 1 {
                0
            } else {
                let distances: Vec<i32> = eligible
                    .iter()
                    .map(|&(_, node)| distance_matrix[current_node][node])
                    .collect();
                select_proportional(ctx, &distances)
            };
            let (idx, node) = eligible[choice];
            capacity -= demands[node];
            route.push(node);
            not_visited.remove(idx);
            current_node = node;
        }

        if route.is_empty() {
            break;
        }
        routes.push(route);
    }
    routes
}

/// Picks an index of `distances` (at least two) with shorter edges weighted
/// higher.
fn select_proportional(ctx: &mut SolverContext, distances: &[i32]) -> usize {
    let weights = proportional_weights(distances);
    let r = ctx.next_below(weights[0]);
    pick_weighted(&weights, r)
}

/// `total - cumulative_distance[i]` for every index.
fn proportional_weights(distances: &[i32]) -> Vec<i32> {
    let mut weights = Vec::with_capacity(distances.len());
    let mut running_total = 0i32;
    for &distance in distances {
        running_total = running_total.wrapping_add(distance);
        weights.push(running_total);
    }
    for weight in weights.iter_mut() {
        *weight = running_total.wrapping_sub(*weight);
    }
    weights
}

/// First index `i >= 1` whose weight `r` exceeds, else the last index.
/// Index 0 is only reachable as the fallback of a single weight.
fn pick_weighted(weights: &[i32], r: i32) -> usize {
    (1..weights.len())
        .find(|&i| r > weights[i])
        .unwrap_or(weights.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proportional_weights() {
        assert_eq!(proportional_weights(&[10, 20, 30, 40]), vec![90, 70, 40, 0]);
        assert_eq!(proportional_weights(&[5, 5]), vec![5, 0]);
        assert_eq!(proportional_weights(&[0, 0, 0]), vec![0, 0, 0]);
    }

    #[test]
    fn test_pick_weighted() {
        let weights = [90, 70, 40, 0];
        // any draw above w_1 lands on index 1, never on index 0
        assert_eq!(pick_weighted(&weights, 89), 1);
        assert_eq!(pick_weighted(&weights, 71), 1);
        assert_eq!(pick_weighted(&weights, 70), 2);
        assert_eq!(pick_weighted(&weights, 41), 2);
        assert_eq!(pick_weighted(&weights, 40), 3);
        assert_eq!(pick_weighted(&weights, 0), 3);
        for r in 0..90 {
            assert_ne!(pick_weighted(&weights, r), 0);
        }
    }

    #[test]
    fn test_zero_first_weight_falls_back_to_last() {
        let mut write = |_: i32| -> anyhow::Result<()> { Ok(()) };
        let is_routes_solution = |_: &[Vec<usize>]| false;
        let evaluate_total_distance = |_: &[Vec<usize>]| -1i32;
        let mut ctx = SolverContext::new(
            3,
            &mut write,
            &is_routes_solution,
            &evaluate_total_distance,
            false,
        );
        // all candidates at distance 0 give w_0 = 0, so the draw is 0
        assert_eq!(select_proportional(&mut ctx, &[0, 0, 0]), 2);
        // only the closest candidate is away from the current node
        assert_eq!(proportional_weights(&[5, 0, 0]), vec![0, 0, 0]);
        assert_eq!(select_proportional(&mut ctx, &[5, 0, 0]), 2);
    }
}
