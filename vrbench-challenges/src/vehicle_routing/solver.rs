use crate::ChallengeError;
use anyhow::Result;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::time::Instant;

/// Routes without the depot: every route implicitly starts and ends at node 0.
pub type Routes = Vec<Vec<usize>>;

/// Signature every solver implements. The vectors are owned copies of the
/// challenge data, so a solver is free to mutate them.
///
/// Return `Ok(Vec::new())` to concede. Errors raised by
/// [`SolverContext::write_identifier`] must be propagated with `?`.
pub type SolveFn = fn(
    ctx: &mut SolverContext,
    demands: Vec<i32>,
    distance_matrix: Vec<Vec<i32>>,
    vehicle_capacity: i32,
    max_distance: i32,
) -> Result<Routes>;

/// Everything a solver may touch besides its inputs. A context is built fresh
/// for every solve, which makes solvers single-use.
pub struct SolverContext<'a> {
    seed: u64,
    debug_mode: bool,
    rng: StdRng,
    write_identifier: &'a mut (dyn FnMut(i32) -> Result<()> + 'a),
    is_routes_solution: &'a (dyn Fn(&[Vec<usize>]) -> bool + 'a),
    evaluate_total_distance: &'a (dyn Fn(&[Vec<usize>]) -> i32 + 'a),
}

impl<'a> SolverContext<'a> {
    pub fn new(
        seed: u64,
        write_identifier: &'a mut (dyn FnMut(i32) -> Result<()> + 'a),
        is_routes_solution: &'a (dyn Fn(&[Vec<usize>]) -> bool + 'a),
        evaluate_total_distance: &'a (dyn Fn(&[Vec<usize>]) -> i32 + 'a),
        debug_mode: bool,
    ) -> Self {
        Self {
            seed,
            debug_mode,
            rng: StdRng::seed_from_u64(seed),
            write_identifier,
            is_routes_solution,
            evaluate_total_distance,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn debug_mode(&self) -> bool {
        self.debug_mode
    }

    /// Records an integer that cannot be guessed without running the
    /// algorithm. Fails once the time budget is spent, or during replay when
    /// the value differs from the recorded one.
    pub fn write_identifier(&mut self, identifier: i32) -> Result<()> {
        (self.write_identifier)(identifier)
    }

    pub fn is_routes_solution(&self, routes: &[Vec<usize>]) -> bool {
        (self.is_routes_solution)(routes)
    }

    /// Returns -1 if `routes` is invalid.
    pub fn evaluate_total_distance(&self, routes: &[Vec<usize>]) -> i32 {
        (self.evaluate_total_distance)(routes)
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Uniform in `[0, i32::MAX)`.
    pub fn next(&mut self) -> i32 {
        self.rng.gen_range(0..i32::MAX)
    }

    /// Uniform in `[0, bound)`, or 0 when `bound <= 0`.
    pub fn next_below(&mut self, bound: i32) -> i32 {
        if bound <= 0 {
            0
        } else {
            self.rng.gen_range(0..bound)
        }
    }

    /// Uniform in `[low, high)`, or `low` when the range is empty.
    pub fn next_range(&mut self, low: i32, high: i32) -> i32 {
        if high <= low {
            low
        } else {
            self.rng.gen_range(low..high)
        }
    }
}

pub(crate) fn check_time_budget(start: Instant, max_seconds: Option<f64>) -> Result<()> {
    match max_seconds {
        Some(max_seconds) if start.elapsed().as_secs_f64() >= max_seconds => {
            Err(ChallengeError::Timeout { max_seconds }.into())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_context<T>(seed: u64, f: impl FnOnce(&mut SolverContext) -> T) -> (T, Vec<i32>) {
        let mut written = Vec::new();
        let mut write = |v: i32| -> Result<()> {
            written.push(v);
            Ok(())
        };
        let is_solution = |_: &[Vec<usize>]| false;
        let evaluate = |_: &[Vec<usize>]| -1;
        let out = {
            let mut ctx = SolverContext::new(seed, &mut write, &is_solution, &evaluate, false);
            f(&mut ctx)
        };
        (out, written)
    }

    fn draw(ctx: &mut SolverContext) -> Vec<i32> {
        (0..32)
            .map(|i| ctx.next() ^ ctx.next_below(i + 1) ^ ctx.next_range(-5, i))
            .collect()
    }

    #[test]
    fn test_same_seed_same_draws() {
        let (a, _) = with_context(42, draw);
        let (b, _) = with_context(42, draw);
        let (c, _) = with_context(43, draw);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_degenerate_bounds() {
        let (values, _) = with_context(7, |ctx| {
            (
                ctx.next_below(0),
                ctx.next_below(-3),
                ctx.next_below(1),
                ctx.next_range(4, 4),
                ctx.next_range(9, 2),
            )
        });
        assert_eq!(values, (0, 0, 0, 4, 9));
    }

    #[test]
    fn test_identifiers_reach_sink() {
        let (_, written) = with_context(1, |ctx| {
            ctx.write_identifier(3).unwrap();
            ctx.write_identifier(-8).unwrap();
            assert!(!ctx.is_routes_solution(&[vec![1]]));
            assert_eq!(ctx.evaluate_total_distance(&[vec![1]]), -1);
        });
        assert_eq!(written, vec![3, -8]);
    }

    #[test]
    fn test_time_budget() {
        let start = Instant::now();
        assert!(check_time_budget(start, None).is_ok());
        assert!(check_time_budget(start, Some(f64::MAX)).is_ok());
        let err = check_time_budget(start, Some(0.0)).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ChallengeError>(),
            Some(&ChallengeError::Timeout { max_seconds: 0.0 })
        );
    }
}
