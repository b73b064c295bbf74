use crate::vehicle_routing::{Challenge, Routes};

/// Deterministic nearest-neighbour construction. Each route greedily extends
/// to the closest unvisited node whose demand still fits; ties go to the
/// lowest node index.
pub fn solve_challenge(challenge: &Challenge) -> Routes {
    let demands = &challenge.demands;
    let distance_matrix = &challenge.distance_matrix;
    let mut routes = Vec::new();

    // kept in ascending order so that min_by_key breaks ties on the lowest index
    let mut not_visited: Vec<usize> = (1..challenge.num_nodes()).collect();
    while !not_visited.is_empty() {
        let mut route = Vec::new();
        let mut current_node = 0;
        let mut capacity = challenge.vehicle_capacity();

        while capacity > 0 && !not_visited.is_empty() {
            let closest = not_visited
                .iter()
                .enumerate()
                .filter(|(_, &node)| demands[node] <= capacity)
                .min_by_key(|(_, &node)| distance_matrix[current_node][node]);
            match closest {
                Some((idx, &node)) => {
                    capacity -= demands[node];
                    route.push(node);
                    not_visited.remove(idx);
                    current_node = node;
                }
                None => break,
            }
        }

        // a node that fits no empty vehicle can never be routed
        if route.is_empty() {
            break;
        }
        routes.push(route);
    }

    routes
}
