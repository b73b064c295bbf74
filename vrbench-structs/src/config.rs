use crate::serializable_struct_with_getters;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

serializable_struct_with_getters! {
    RunnerConfig {
        #[serde(default = "default_master_seed")]
        master_seed: u64,
        // half-open [min, max)
        #[serde(default = "default_num_nodes_range")]
        num_nodes_range: [i64; 2],
        #[serde(default = "default_min_percent_shorter_range")]
        min_percent_shorter_range: [i64; 2],
        max_seconds: Option<f64>,
    }
}

fn default_master_seed() -> u64 {
    1337
}

fn default_num_nodes_range() -> [i64; 2] {
    [20, 50]
}

fn default_min_percent_shorter_range() -> [i64; 2] {
    [100, 200]
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            master_seed: default_master_seed(),
            num_nodes_range: default_num_nodes_range(),
            min_percent_shorter_range: default_min_percent_shorter_range(),
            max_seconds: None,
        }
    }
}

impl RunnerConfig {
    pub fn validate(&self) -> Result<()> {
        // upper bounds are exclusive, so every draw fits an i32
        let max_bound = i32::MAX as i64 + 1;
        let [min_nodes, max_nodes] = self.num_nodes_range;
        if min_nodes < 1 || max_nodes <= min_nodes || max_nodes > max_bound {
            return Err(anyhow!(
                "num_nodes_range must be a non-empty range within [1, {}], got [{}, {})",
                max_bound,
                min_nodes,
                max_nodes
            ));
        }
        let [min_pct, max_pct] = self.min_percent_shorter_range;
        if min_pct < 0 || max_pct <= min_pct || max_pct > max_bound {
            return Err(anyhow!(
                "min_percent_shorter_range must be a non-empty range within [0, {}], got [{}, {})",
                max_bound,
                min_pct,
                max_pct
            ));
        }
        if let Some(max_seconds) = self.max_seconds {
            if !(max_seconds > 0.0) {
                return Err(anyhow!("max_seconds must be positive, got {}", max_seconds));
            }
        }
        Ok(())
    }
}
