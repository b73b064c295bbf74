use anyhow::{anyhow, Result};
use clap::{arg, ArgAction, Command};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{fs, path::PathBuf, time::Instant};
use tracing::{info, warn};
use vrbench_algorithms::vehicle_routing::{algorithm_names, try_get_algorithm};
use vrbench_challenges::{
    vehicle_routing::{Difficulty, Solution, SolveFn},
    ChallengeError,
};
use vrbench_structs::{
    config::RunnerConfig,
    core::{BenchmarkSettings, OutputData},
};
use vrbench_utils::{dejsonify, jsonify};

fn cli() -> Command {
    Command::new("vrbench-runner")
        .about("Solves random vehicle routing challenges and prints one CSV line per run")
        .arg(
            arg!([ALGORITHM] "Name of the algorithm to run")
                .default_value("RandomSolver")
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            arg!([DEBUG] "Log solver progress")
                .default_value("false")
                .value_parser(clap::value_parser!(bool)),
        )
        .arg(
            arg!([NUM_RUNS] "Number of challenges to solve")
                .default_value("2147483647")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            arg!(--config [CONFIG] "Path to a runner config json file")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            arg!(--"max-seconds" [MAX_SECONDS] "Time budget per solve, overrides the config")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            arg!(--verify "Replay every solution through the method verifier")
                .action(ArgAction::SetTrue),
        )
        .arg(
            arg!(--output [OUTPUT_DIR] "If set, output data for each run is saved as <seed>.json in this directory")
                .value_parser(clap::value_parser!(PathBuf)),
        )
}

fn main() {
    let matches = cli().get_matches();
    let debug_mode = *matches.get_one::<bool>("DEBUG").unwrap();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if debug_mode {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    if let Err(e) = run_benchmarks(
        matches.get_one::<String>("ALGORITHM").unwrap().clone(),
        debug_mode,
        *matches.get_one::<u32>("NUM_RUNS").unwrap(),
        matches.get_one::<PathBuf>("config").cloned(),
        matches.get_one::<f64>("max-seconds").cloned(),
        matches.get_flag("verify"),
        matches.get_one::<PathBuf>("output").cloned(),
    ) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

pub fn run_benchmarks(
    algorithm_id: String,
    debug_mode: bool,
    num_runs: u32,
    config_path: Option<PathBuf>,
    max_seconds: Option<f64>,
    verify: bool,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    if max_seconds.is_some() {
        config.max_seconds = max_seconds;
    }
    config.validate()?;

    let algorithm = try_get_algorithm(&algorithm_id).map_err(|e| {
        anyhow!(
            "{}. Available: {}",
            e,
            algorithm_names().collect::<Vec<_>>().join(", ")
        )
    })?;
    if let Some(dir) = &output_dir {
        fs::create_dir_all(dir)
            .map_err(|e| anyhow!("Failed to create output dir {:?}: {}", dir, e))?;
    }

    info!(
        "running {} for {} runs with master seed {}",
        algorithm_id, num_runs, config.master_seed
    );
    let mut rng = StdRng::seed_from_u64(config.master_seed);
    for _ in 0..num_runs {
        let settings = BenchmarkSettings {
            algorithm_id: algorithm_id.clone(),
            difficulty: vec![
                rng.gen_range(config.num_nodes_range[0]..config.num_nodes_range[1]) as i32,
                rng.gen_range(
                    config.min_percent_shorter_range[0]..config.min_percent_shorter_range[1],
                ) as i32,
            ],
            seed: rng.gen::<u32>() as u64,
        };
        let output_data = run_once(&settings, algorithm, &config, debug_mode, verify)?;

        println!(
            "VehicleRouting, {}, {}, {}, {}, {}, {}",
            settings.algorithm_id,
            settings.seed,
            settings.difficulty[0],
            settings.difficulty[1],
            output_data.is_solution,
            output_data.elapsed_seconds
        );

        if let Some(dir) = &output_dir {
            let path = dir.join(output_data.file_name());
            fs::write(&path, jsonify(&output_data)?)
                .map_err(|e| anyhow!("Failed to write output data to {:?}: {}", path, e))?;
        }
    }
    Ok(())
}

fn run_once(
    settings: &BenchmarkSettings,
    algorithm: SolveFn,
    config: &RunnerConfig,
    debug_mode: bool,
    verify: bool,
) -> Result<OutputData> {
    let start = Instant::now();
    let difficulty = Difficulty::try_from(settings.difficulty.clone())?;
    let challenge = difficulty.generate_challenge(settings.seed)?;

    let result = match challenge.solve(algorithm, config.max_seconds, debug_mode) {
        Ok(result) => result,
        Err(e) => match e.downcast_ref::<ChallengeError>() {
            Some(timeout @ ChallengeError::Timeout { .. }) => {
                warn!("seed {}: {}", settings.seed, timeout);
                return Ok(timed_out_output(settings, start.elapsed().as_secs_f64()));
            }
            _ => return Err(e),
        },
    };
    let elapsed_seconds = start.elapsed().as_secs_f64();

    if verify {
        match result
            .solution
            .verify_method_only(&challenge, algorithm, config.max_seconds)
        {
            Ok(true) => {}
            Ok(false) => warn!("seed {}: replay did not match the recorded stream", settings.seed),
            Err(e) => warn!("seed {}: replay failed: {}", settings.seed, e),
        }
    }

    Ok(OutputData {
        settings: settings.clone(),
        is_solution: result.is_solution,
        elapsed_seconds,
        solution: result.solution.to_base64(),
    })
}

/// Output for a run whose solve timed out: an empty, decodable solution.
fn timed_out_output(settings: &BenchmarkSettings, elapsed_seconds: f64) -> OutputData {
    OutputData {
        settings: settings.clone(),
        is_solution: false,
        elapsed_seconds,
        solution: Solution::default().to_base64(),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<RunnerConfig> {
    match path {
        None => Ok(RunnerConfig::default()),
        Some(path) => {
            let config = fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read config file {:?}: {}", path, e))?;
            dejsonify::<RunnerConfig>(&config)
                .map_err(|e| anyhow!("Failed to parse config file {:?}: {}", path, e))
        }
    }
}
