use anyhow::Result;
use vrbench_challenges::vehicle_routing::{Routes, SolverContext};

pub const LOG_EVERY_ATTEMPTS: usize = 200;

/// Nodes of `not_visited` whose demand fits `capacity`, as
/// `(position in not_visited, node)`, in `not_visited` order.
pub fn eligible_nodes(not_visited: &[usize], demands: &[i32], capacity: i32) -> Vec<(usize, usize)> {
    not_visited
        .iter()
        .enumerate()
        .filter(|(_, &node)| demands[node] <= capacity)
        .map(|(idx, &node)| (idx, node))
        .collect()
}

/// Nearest-neighbour construction where every step draws uniformly among the
/// closest `ceil(n / divisor)` of the `n` eligible nodes.
pub fn build_routes_top_fraction(
    ctx: &mut SolverContext,
    demands: &[i32],
    distance_matrix: &[Vec<i32>],
    vehicle_capacity: i32,
    divisor: usize,
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
            // stable: equal distances keep ascending node order
            eligible.sort_by_key(|&(_, node)| distance_matrix[current_node][node]);
            let pool = pool_size(eligible.len(), divisor);
            let (idx, node) = eligible[ctx.next_below(pool as i32) as usize];
            capacity -= demands[node];
            route.push(node);
            not_visited.remove(idx);
            current_node = node;
        }

        // nothing fits an empty vehicle, the remaining nodes cannot be routed
        if route.is_empty() {
            break;
        }
        routes.push(route);
    }
    routes
}

/// Number of closest candidates drawn from: `ceil(num_eligible / divisor)`.
pub fn pool_size(num_eligible: usize, divisor: usize) -> usize {
    num_eligible.div_ceil(divisor)
}

pub fn route_sum(route: &[usize]) -> i32 {
    route
        .iter()
        .fold(0i32, |acc, &node| acc.wrapping_add(node as i32))
}

/// Wrapping product of the per-route node sums.
pub fn route_sums_product(routes: &[Vec<usize>]) -> i32 {
    routes
        .iter()
        .fold(1i32, |acc, route| acc.wrapping_mul(route_sum(route)))
}

pub const SAVINGS_TOMBSTONE: i32 = -500;

/// Clarke-Wright savings `d(0, i) + d(0, j) - d(i, j)` for every pair, with
/// [`SAVINGS_TOMBSTONE`] on the diagonal. Row and column 0 are all zero apart
/// from their diagonal entry.
pub fn calc_savings_matrix(distance_matrix: &[Vec<i32>]) -> Vec<Vec<i32>> {
    let num_nodes = distance_matrix.len();
    let mut savings = vec![vec![0; num_nodes]; num_nodes];
    for i in 0..num_nodes {
        for j in (i + 1)..num_nodes {
            let saving = distance_matrix[0][i] + distance_matrix[0][j] - distance_matrix[i][j];
            savings[i][j] = saving;
            savings[j][i] = saving;
        }
        savings[i][i] = SAVINGS_TOMBSTONE;
    }
    savings
}

pub fn log_attempt(ctx: &SolverContext, name: &str, attempt: usize) {
    if ctx.debug_mode() && attempt % LOG_EVERY_ATTEMPTS == 0 {
        tracing::debug!("{}: number of attempts: {}", name, attempt);
    }
}

/// Shared attempt loop: build, emit one identifier, return the first routes
/// that solve the challenge, concede after `max_attempts`.
pub fn solve_by_attempts(
    ctx: &mut SolverContext,
    name: &str,
    max_attempts: usize,
    mut attempt_fn: impl FnMut(&mut SolverContext) -> Routes,
    identifier_fn: impl Fn(&mut SolverContext, &Routes) -> i32,
) -> Result<Routes> {
    for attempt in 1..=max_attempts {
        log_attempt(ctx, name, attempt);
        let routes = attempt_fn(ctx);
        let identifier = identifier_fn(ctx, &routes);
        ctx.write_identifier(identifier)?;
        if ctx.is_routes_solution(&routes) {
            return Ok(routes);
        }
    }
    Ok(Vec::new())
}
