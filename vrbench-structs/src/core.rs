use crate::serializable_struct_with_getters;
use serde::{Deserialize, Serialize};
use vrbench_utils::jsonify;

serializable_struct_with_getters! {
    BenchmarkSettings {
        algorithm_id: String,
        // [num_nodes, min_percent_shorter]
        difficulty: Vec<i32>,
        seed: u64,
    }
}
impl BenchmarkSettings {
    /// Canonical JSON (sorted keys), identical for equal settings.
    pub fn to_json(&self) -> String {
        jsonify(self).unwrap_or_default()
    }
}

serializable_struct_with_getters! {
    OutputData {
        settings: BenchmarkSettings,
        is_solution: bool,
        elapsed_seconds: f64,
        // base64 of the binary solution layout
        solution: String,
    }
}
impl OutputData {
    pub fn file_name(&self) -> String {
        format!("{}.json", self.settings.seed)
    }
}
