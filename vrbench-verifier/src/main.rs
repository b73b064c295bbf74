use anyhow::{anyhow, Result};
use clap::{arg, Command};
use std::{fs, io::Read};
use tracing::debug;
use vrbench_algorithms::vehicle_routing::try_get_algorithm;
use vrbench_challenges::vehicle_routing::{Challenge, Difficulty, Solution};
use vrbench_structs::core::{BenchmarkSettings, OutputData};
use vrbench_utils::dejsonify;

fn cli() -> Command {
    Command::new("vrbench-verifier")
        .about("Verifies a solution or the algorithm that produced it")
        .arg_required_else_help(true)
        .arg(arg!(--debug "Log verification progress"))
        .subcommand(
            Command::new("verify_solution")
                .about("Checks that the routes are a valid solution")
                .arg(
                    arg!(<SETTINGS> "Settings json string or path to json file")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(<SOLUTION> "Base64 solution, path to a .bin or output .json file, or '-' for stdin")
                        .value_parser(clap::value_parser!(String)),
                ),
        )
        .subcommand(
            Command::new("verify_method")
                .about("Replays the algorithm and checks it emits the recorded identifiers")
                .arg(
                    arg!(<SETTINGS> "Settings json string or path to json file")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(<SOLUTION> "Base64 solution, path to a .bin or output .json file, or '-' for stdin")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--"max-seconds" [MAX_SECONDS] "Time budget for the replay")
                        .value_parser(clap::value_parser!(f64)),
                ),
        )
}

fn main() {
    let matches = cli().get_matches();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if matches.get_flag("debug") {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let verdict = match matches.subcommand() {
        Some(("verify_solution", sub_m)) => verify_solution(
            sub_m.get_one::<String>("SETTINGS").unwrap(),
            sub_m.get_one::<String>("SOLUTION").unwrap(),
        ),
        Some(("verify_method", sub_m)) => verify_method(
            sub_m.get_one::<String>("SETTINGS").unwrap(),
            sub_m.get_one::<String>("SOLUTION").unwrap(),
            sub_m.get_one::<f64>("max-seconds").cloned(),
        ),
        _ => Err(anyhow!("Invalid subcommand")),
    };

    match verdict {
        Ok(None) => println!("Solution is valid"),
        Ok(Some(err_msg)) => {
            eprintln!("Verification error: {}", err_msg);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// `Ok(Some(reason))` when the routes are rejected.
pub fn verify_solution(settings: &str, solution: &str) -> Result<Option<String>> {
    let settings = load_settings(settings)?;
    let solution = load_solution(solution)?;
    let challenge = generate_challenge(&settings)?;

    Ok(match challenge.calc_routes_total_distance(&solution.routes) {
        Err(e) => Some(format!("Invalid solution: {}", e)),
        Ok(total_distance) if total_distance > challenge.max_total_distance => Some(format!(
            "Total distance {} exceeds the maximum of {}",
            total_distance, challenge.max_total_distance
        )),
        Ok(total_distance) => {
            debug!(
                "total distance {} within maximum {}",
                total_distance, challenge.max_total_distance
            );
            None
        }
    })
}

/// `Ok(Some(reason))` when the replay does not reproduce the recorded stream.
pub fn verify_method(
    settings: &str,
    solution: &str,
    max_seconds: Option<f64>,
) -> Result<Option<String>> {
    let settings = load_settings(settings)?;
    let solution = load_solution(solution)?;
    let challenge = generate_challenge(&settings)?;
    let algorithm = try_get_algorithm(&settings.algorithm_id)?;

    debug!(
        "replaying {} identifiers of {}",
        solution.num_identifiers(),
        settings.algorithm_id
    );
    Ok(
        match solution.verify_method_only(&challenge, algorithm, max_seconds)? {
            true => None,
            false => Some(format!(
                "Recorded identifiers were not produced by {}",
                settings.algorithm_id
            )),
        },
    )
}

fn generate_challenge(settings: &BenchmarkSettings) -> Result<Challenge> {
    let difficulty = Difficulty::try_from(settings.difficulty.clone())?;
    difficulty.generate_challenge(settings.seed)
}

fn load_settings(settings: &str) -> Result<BenchmarkSettings> {
    let settings = if settings.ends_with(".json") {
        fs::read_to_string(settings)
            .map_err(|e| anyhow!("Failed to read settings file {}: {}", settings, e))?
    } else {
        settings.to_string()
    };

    dejsonify::<BenchmarkSettings>(&settings).map_err(|e| anyhow!("Failed to parse settings: {}", e))
}

fn load_solution(solution: &str) -> Result<Solution> {
    if solution == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow!("Failed to read solution from stdin: {}", e))?;
        Solution::from_base64(&buffer)
    } else if solution.ends_with(".bin") {
        let bytes = fs::read(solution)
            .map_err(|e| anyhow!("Failed to read solution file {}: {}", solution, e))?;
        Solution::from_bytes(&bytes)
    } else if solution.ends_with(".json") {
        let output_data = fs::read_to_string(solution)
            .map_err(|e| anyhow!("Failed to read solution file {}: {}", solution, e))?;
        let output_data = dejsonify::<OutputData>(&output_data)
            .map_err(|e| anyhow!("Failed to parse output data: {}", e))?;
        Solution::from_base64(&output_data.solution)
    } else {
        Solution::from_base64(solution)
    }
}
