//! Deterministic Clarke-Wright savings construction under a shared distance
//! budget.
//!
//! Every pass scans the savings list from its best entry and chains pairs of
//! unvisited nodes into one route while the pair's demand fits the vehicle
//! and the extra distance fits what is left of `max_distance`. Used pairs are
//! dropped from the list before the next pass. The solver concedes as soon as
//! a pass makes no progress with nodes still unvisited.

use super::utils::{calc_savings_matrix, route_sums_product};
use crate::{seeded_hasher, HashSet};
use anyhow::Result;
use tracing::debug;
use vrbench_challenges::vehicle_routing::*;

pub const MAX_PASSES: usize = 100_000_000;

#[derive(Debug, Clone, Copy)]
struct Saving {
    i: usize,
    j: usize,
    saving: i32,
    demand: i32,
}

pub fn solve_challenge(
    ctx: &mut SolverContext,
    demands: Vec<i32>,
    distance_matrix: Vec<Vec<i32>>,
    vehicle_capacity: i32,
    max_distance: i32,
) -> Result<Routes> {
    let num_nodes = demands.len();
    let mut unvisited: HashSet<usize> = HashSet::with_hasher(seeded_hasher(ctx.seed()));
    unvisited.extend(1..num_nodes);

    let mut savings = calc_savings_list(&demands, &distance_matrix);
    let mut routes: Routes = Vec::new();
    let mut remaining_distance = max_distance;
    let mut pass = 0;

    while !unvisited.is_empty() && remaining_distance > 0 {
        if pass >= MAX_PASSES {
            return Ok(Vec::new());
        }
        pass += 1;
        if ctx.debug_mode() && pass % 200 == 0 {
            debug!("SpicyTSP: number of passes: {}", pass);
        }

        let mut capacity = vehicle_capacity;
        let mut route = Vec::new();
        let mut used = vec![false; savings.len()];
        let mut prev = 0;

        for (idx, s) in savings.iter().enumerate() {
            take_lone_node(
                &mut unvisited,
                &mut route,
                &demands,
                &distance_matrix,
                prev,
                capacity,
                remaining_distance,
            );
            if capacity <= 0 || remaining_distance <= 0 {
                break;
            }

            let dist = distance_matrix[s.i][s.j];
            let approach = distance_matrix[prev][s.i];
            let fits_distance =
                dist + approach <= remaining_distance || (prev == 0 && dist <= remaining_distance);
            if s.demand <= capacity
                && fits_distance
                && unvisited.contains(&s.i)
                && unvisited.contains(&s.j)
            {
                route.push(s.i);
                route.push(s.j);
                unvisited.remove(&s.i);
                unvisited.remove(&s.j);
                used[idx] = true;
                capacity -= s.demand;
                remaining_distance -= dist + distance_matrix[s.j][s.i];
                prev = s.j;
            }
        }
        // an exhausted or empty savings list still has to place the last node
        take_lone_node(
            &mut unvisited,
            &mut route,
            &demands,
            &distance_matrix,
            prev,
            capacity,
            remaining_distance,
        );

        let progressed = !route.is_empty();
        if progressed {
            routes.push(route);
        }
        let mut used = used.into_iter();
        savings.retain(|_| !used.next().unwrap_or(false));

        ctx.write_identifier(route_sums_product(&routes))?;
        if !progressed {
            break;
        }
    }

    if !unvisited.is_empty() {
        return Ok(Vec::new());
    }
    Ok(routes)
}

/// Pairs `(i, j)` of non-depot nodes with `i < j`, best savings first.
fn calc_savings_list(demands: &[i32], distance_matrix: &[Vec<i32>]) -> Vec<Saving> {
    let savings_matrix = calc_savings_matrix(distance_matrix);
    let num_nodes = demands.len();
    let mut savings = Vec::new();
    for i in 1..num_nodes {
        for j in (i + 1)..num_nodes {
            savings.push(Saving {
                i,
                j,
                saving: savings_matrix[i][j],
                demand: demands[i] + demands[j],
            });
        }
    }
    savings.sort_by_key(|s| s.saving);
    savings.reverse();
    savings
}

/// Appends the single remaining unvisited node to `route` if it fits.
fn take_lone_node(
    unvisited: &mut HashSet<usize>,
    route: &mut Vec<usize>,
    demands: &[i32],
    distance_matrix: &[Vec<i32>],
    prev: usize,
    capacity: i32,
    remaining_distance: i32,
) {
    if unvisited.len() != 1 {
        return;
    }
    if let Some(&node) = unvisited.iter().next() {
        if demands[node] <= capacity && distance_matrix[prev][node] <= remaining_distance {
            route.push(node);
            unvisited.remove(&node);
        }
    }
}
