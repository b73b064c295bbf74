//! Greedy path construction: each route sorts the eligible nodes by distance
//! from the depot once, then walks that order taking every node that still
//! fits the vehicle.

use super::utils::{eligible_nodes, route_sums_product, solve_by_attempts};
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
        "RSB2",
        MAX_ATTEMPTS,
        |_| build_routes(&demands, &distance_matrix, vehicle_capacity),
        |_, routes| route_sums_product(routes),
    )
}

fn build_routes(demands: &[i32], distance_matrix: &[Vec<i32>], vehicle_capacity: i32) -> Routes {
    let mut routes = Vec::new();
    let mut not_visited: Vec<usize> = (1..demands.len()).collect();
    while !not_visited.is_empty() {
        let mut capacity = vehicle_capacity;
        let mut ordered: Vec<usize> = eligible_nodes(&not_visited, demands, capacity)
            .into_iter()
            .map(|(_, node)| node)
            .collect();
        ordered.sort_by_key(|&node| distance_matrix[0][node]);

        let mut route = Vec::new();
        for node in ordered {
            if demands[node] <= capacity {
                capacity -= demands[node];
                route.push(node);
            }
        }
        if route.is_empty() {
            break;
        }
        not_visited.retain(|node| !route.contains(node));
        routes.push(route);
    }
    routes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_nodes_that_no_longer_fit() {
        // distances from the depot order the nodes 1, 2, 3, 4
        let distance_matrix = vec![
            vec![0, 10, 20, 30, 40],
            vec![10, 0, 10, 20, 30],
            vec![20, 10, 0, 10, 20],
            vec![30, 20, 10, 0, 10],
            vec![40, 30, 20, 10, 0],
        ];
        let demands = vec![0, 50, 40, 30, 10];
        let routes = build_routes(&demands, &distance_matrix, 100);
        assert_eq!(routes, vec![vec![1, 2, 4], vec![3]]);
    }
}
