mod baselines;
mod solution;
mod solver;
pub use solution::*;
pub use solver::*;

use crate::{ChallengeError, ChallengeResult};
use anyhow::{anyhow, bail, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;
use vrbench_utils::Int32Writer;

pub const DEPOT_POSITION: (i32, i32) = (250, 250);
pub const GRID_SIZE: i32 = 501;
pub const SEED_OFFSET: u64 = 1337;

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct Difficulty {
    pub num_nodes: usize,
    // fixed point with 1/1000 scaling, i.e. 12.5% is stored as 125
    pub min_percent_shorter: u32,
}

impl Difficulty {
    pub const MIN_NODE_DEMAND: i32 = 10;
    // exclusive
    pub const MAX_NODE_DEMAND: i32 = 25;
    pub const VEHICLE_CAPACITY: i32 = 100;

    pub fn new(num_nodes: i64, min_percent_shorter: i64) -> ChallengeResult<Self> {
        if num_nodes < 1 || num_nodes > i32::MAX as i64 {
            return Err(ChallengeError::InvalidDifficulty {
                field: "num_nodes",
                value: num_nodes,
            });
        }
        if min_percent_shorter < 0 || min_percent_shorter > i32::MAX as i64 {
            return Err(ChallengeError::InvalidDifficulty {
                field: "min_percent_shorter",
                value: min_percent_shorter,
            });
        }
        Ok(Self {
            num_nodes: num_nodes as usize,
            min_percent_shorter: min_percent_shorter as u32,
        })
    }

    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> ChallengeResult<Self> {
        if fields.len() != 2 {
            return Err(ChallengeError::InvalidEncoding {
                reason: format!("Difficulty expects 2 fields, got {}", fields.len()),
            });
        }
        let parse = |name: &str, field: &S| {
            field
                .as_ref()
                .trim()
                .parse::<i64>()
                .map_err(|e| ChallengeError::InvalidEncoding {
                    reason: format!("Difficulty.{} '{}': {}", name, field.as_ref(), e),
                })
        };
        Self::new(
            parse("num_nodes", &fields[0])?,
            parse("min_percent_shorter", &fields[1])?,
        )
    }

    pub fn fields(&self) -> [String; 2] {
        [
            self.num_nodes.to_string(),
            self.min_percent_shorter.to_string(),
        ]
    }

    pub fn generate_challenge(&self, seed: u64) -> Result<Challenge> {
        Challenge::generate_instance(seed, self)
    }
}

impl TryFrom<Vec<i32>> for Difficulty {
    type Error = ChallengeError;

    fn try_from(arr: Vec<i32>) -> ChallengeResult<Self> {
        match arr.as_slice() {
            &[num_nodes, min_percent_shorter] => {
                Self::new(num_nodes as i64, min_percent_shorter as i64)
            }
            _ => Err(ChallengeError::InvalidEncoding {
                reason: format!("Difficulty expects 2 values, got {}", arr.len()),
            }),
        }
    }
}

impl From<Difficulty> for Vec<i32> {
    fn from(difficulty: Difficulty) -> Self {
        vec![
            difficulty.num_nodes as i32,
            difficulty.min_percent_shorter as i32,
        ]
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SolveResult {
    pub is_solution: bool,
    pub solution: Solution,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub seed: u64,
    pub difficulty: Difficulty,
    pub demands: Vec<i32>,
    pub distance_matrix: Vec<Vec<i32>>,
    pub baseline_total_distance: i32,
    pub max_total_distance: i32,
}

impl Challenge {
    pub fn generate_instance(seed: u64, difficulty: &Difficulty) -> Result<Self> {
        let num_nodes = difficulty.num_nodes;
        if num_nodes < 1 {
            return Err(ChallengeError::InvalidDifficulty {
                field: "num_nodes",
                value: num_nodes as i64,
            }
            .into());
        }
        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(SEED_OFFSET));

        let mut demands = vec![0; num_nodes];
        let mut node_positions = vec![DEPOT_POSITION; num_nodes];
        // draw order (demand, x, y) per node is part of the instance identity
        for node in 1..num_nodes {
            demands[node] =
                rng.gen_range(Difficulty::MIN_NODE_DEMAND..Difficulty::MAX_NODE_DEMAND);
            node_positions[node] = (rng.gen_range(0..GRID_SIZE), rng.gen_range(0..GRID_SIZE));
        }

        let mut distance_matrix = vec![vec![0; num_nodes]; num_nodes];
        for i in 0..num_nodes {
            for j in (i + 1)..num_nodes {
                let dx = (node_positions[i].0 - node_positions[j].0) as f64;
                let dy = (node_positions[i].1 - node_positions[j].1) as f64;
                let distance = dx.hypot(dy).floor() as i32;
                distance_matrix[i][j] = distance;
                distance_matrix[j][i] = distance;
            }
        }

        Self::new(seed, *difficulty, demands, distance_matrix)
    }

    /// Builds a challenge from explicit data and derives its acceptance
    /// threshold from the nearest-neighbour baseline.
    pub fn new(
        seed: u64,
        difficulty: Difficulty,
        demands: Vec<i32>,
        distance_matrix: Vec<Vec<i32>>,
    ) -> Result<Self> {
        let num_nodes = difficulty.num_nodes;
        if demands.len() != num_nodes {
            bail!(
                "Expected {} demands, got {}",
                num_nodes,
                demands.len()
            );
        }
        if distance_matrix.len() != num_nodes
            || distance_matrix.iter().any(|row| row.len() != num_nodes)
        {
            bail!("Distance matrix must be {}x{}", num_nodes, num_nodes);
        }

        let mut c = Challenge {
            seed,
            difficulty,
            demands,
            distance_matrix,
            baseline_total_distance: 0,
            max_total_distance: 0,
        };

        let baseline_routes = c.compute_baseline_routes();
        // only a depot-only instance has nothing to route
        c.baseline_total_distance = if baseline_routes.is_empty() {
            0
        } else {
            c.calc_routes_total_distance(&baseline_routes)
                .map_err(|e| anyhow!("Baseline routes are invalid: {}", e))?
        };
        c.max_total_distance = c.calc_max_total_distance();
        Ok(c)
    }

    pub fn num_nodes(&self) -> usize {
        self.difficulty.num_nodes
    }

    pub fn vehicle_capacity(&self) -> i32 {
        Difficulty::VEHICLE_CAPACITY
    }

    /// `floor((1 - min_percent_shorter / 1000) * baseline_total_distance)`,
    /// saturated to the `i32` range.
    fn calc_max_total_distance(&self) -> i32 {
        let scaled = self.baseline_total_distance as i64
            * (1000 - self.difficulty.min_percent_shorter as i64);
        scaled
            .div_euclid(1000)
            .clamp(i32::MIN as i64, i32::MAX as i64) as i32
    }

    conditional_pub!(
        fn compute_baseline_routes(&self) -> Routes {
            baselines::nearest_neighbour::solve_challenge(self)
        }
    );

    /// Total distance of `routes`, or the reason they are invalid.
    ///
    /// The capacity of a route is checked after each node except its last
    /// one, so an overrun caused by the final node alone is not detected.
    pub fn calc_routes_total_distance(&self, routes: &[Vec<usize>]) -> Result<i32> {
        let num_nodes = self.num_nodes();
        if routes.is_empty() {
            bail!("At least one route is required");
        }
        if routes.iter().any(|route| route.is_empty()) {
            bail!("Each route must visit at least one non-depot node");
        }
        if let Some(node) = routes
            .iter()
            .flatten()
            .find(|&&node| node == 0 || node >= num_nodes)
        {
            bail!("Node '{}' is outside of [1, {})", node, num_nodes);
        }

        let mut total_distance = 0;
        let mut visited = vec![false; num_nodes];
        visited[0] = true;

        for route in routes {
            total_distance += self.distance_matrix[0][route[0]];
            let mut capacity = self.vehicle_capacity();
            for pair in route.windows(2) {
                let (node, next_node) = (pair[0], pair[1]);
                total_distance += self.distance_matrix[node][next_node];
                capacity -= self.demands[node];
                if capacity < 0 {
                    bail!("The total demand on each route must not exceed vehicle capacity");
                }
                if visited[node] {
                    bail!("The same non-depot node cannot be visited more than once");
                }
                visited[node] = true;
            }
            let last_node = route[route.len() - 1];
            if visited[last_node] {
                bail!("The same non-depot node cannot be visited more than once");
            }
            visited[last_node] = true;
            total_distance += self.distance_matrix[last_node][0];
        }

        if visited.iter().any(|&v| !v) {
            bail!("All nodes must be visited");
        }

        Ok(total_distance)
    }

    /// Returns -1 if `routes` is invalid.
    pub fn evaluate_total_distance(&self, routes: &[Vec<usize>]) -> i32 {
        self.calc_routes_total_distance(routes).unwrap_or(-1)
    }

    pub fn is_challenge_solution(&self, routes: &[Vec<usize>]) -> bool {
        let total_distance = self.evaluate_total_distance(routes);
        total_distance != -1 && total_distance <= self.max_total_distance
    }

    /// Runs `algorithm` against copies of this challenge's data, recording
    /// every identifier it emits. `max_seconds = None` means no time limit.
    pub fn solve(
        &self,
        algorithm: SolveFn,
        max_seconds: Option<f64>,
        debug_mode: bool,
    ) -> Result<SolveResult> {
        let start = Instant::now();
        let mut writer = Int32Writer::new();
        let mut write_identifier = |identifier: i32| -> Result<()> {
            check_time_budget(start, max_seconds)?;
            writer.write_i32(identifier);
            Ok(())
        };

        let routes = self.run_solver(algorithm, &mut write_identifier, debug_mode)?;
        let is_solution = self.is_challenge_solution(&routes);
        let state_updates = writer.into_bytes();
        debug!(
            "seed {} solved in {:.3}s: is_solution={}, num_identifiers={}",
            self.seed,
            start.elapsed().as_secs_f64(),
            is_solution,
            state_updates.len() / 4
        );

        Ok(SolveResult {
            is_solution,
            solution: Solution::new(routes, state_updates),
        })
    }

    pub(crate) fn run_solver(
        &self,
        algorithm: SolveFn,
        write_identifier: &mut dyn FnMut(i32) -> Result<()>,
        debug_mode: bool,
    ) -> Result<Routes> {
        let is_routes_solution = |routes: &[Vec<usize>]| self.is_challenge_solution(routes);
        let evaluate_total_distance = |routes: &[Vec<usize>]| self.evaluate_total_distance(routes);
        let mut ctx = SolverContext::new(
            self.seed,
            write_identifier,
            &is_routes_solution,
            &evaluate_total_distance,
            debug_mode,
        );
        algorithm(
            &mut ctx,
            self.demands.clone(),
            self.distance_matrix.clone(),
            self.vehicle_capacity(),
            self.max_total_distance,
        )
    }
}
