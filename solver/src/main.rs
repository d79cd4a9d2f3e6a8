use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use edgeperm::config::{LeftoverPolicy, SolveConfig};
use edgeperm::{input, Solver, SolverFailure};
use itertools::Itertools;
use strum::VariantArray;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Looked up in the working directory unless `--config` names another file.
const DEFAULT_CONFIG_FILE: &str = "solver.toml";

fn usage() -> String {
    format!(
        "usage: solver [--config <file>] [--leftover-edges <{}>] < puzzle.txt",
        LeftoverPolicy::VARIANTS.iter().join("|"),
    )
}

#[derive(Debug, Default, Eq, PartialEq)]
struct Options {
    // None means the default file, which may be absent
    config_file: Option<PathBuf>,
    leftover_edges: Option<LeftoverPolicy>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Options, String> {
    let mut options = Options::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                options.config_file = Some(args.next().ok_or_else(usage)?.into());
            }
            "--leftover-edges" => {
                let value = args.next().ok_or_else(usage)?;
                options.leftover_edges = Some(LeftoverPolicy::from_str(&value).map_err(|_| usage())?);
            }
            _ => return Err(usage()),
        }
    }
    Ok(options)
}

fn load_config(options: &Options) -> Result<SolveConfig, String> {
    let config = match &options.config_file {
        Some(path) => SolveConfig::load(path).map_err(|e| format!("{}: {e}", path.display()))?,
        None => match SolveConfig::load(DEFAULT_CONFIG_FILE) {
            Ok(config) => {
                info!(event = "config_loaded", path = DEFAULT_CONFIG_FILE);
                config
            }
            Err(edgeperm::config::ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                info!(event = "config_defaults", path = DEFAULT_CONFIG_FILE, "no config file in the working directory");
                SolveConfig::default()
            }
            Err(e) => return Err(format!("{DEFAULT_CONFIG_FILE}: {e}")),
        },
    };

    Ok(match options.leftover_edges {
        Some(policy) => config.with_leftover_edges(policy),
        None => config,
    })
}

fn run() -> Result<(), String> {
    let options = parse_args(std::env::args().skip(1))?;
    let config = load_config(&options)?;

    let mut text = String::new();
    io::stdin().read_to_string(&mut text).map_err(|e| format!("could not read stdin: {e}"))?;
    let puzzle = input::parse(&text).map_err(|e| e.to_string())?;

    let (start, final_vertex) = puzzle.secret_vertices();
    info!(
        event = "puzzle_loaded",
        vertices = puzzle.num_vertices(),
        edges = puzzle.num_edges(),
        leftover_policy = %config.leftover_edges,
    );
    let solver = Solver::with_config(&puzzle, config);
    println!("vertices: {}", puzzle.num_vertices());
    println!("edges: {}", puzzle.num_edges());
    println!("available weights: {}", puzzle.available_weights().iter().join(" "));
    println!("leftover edges: {}", solver.leftover_edges().iter().map(|pair| format!("({}, {})", pair.0, pair.1)).join(" "));
    println!("secret vertices: {start} {final_vertex}");

    let stats = solver
        .solve(|solution| {
            println!("===== found solution =====");
            print!("{solution}");
        })
        .map_err(|e| match e {
            SolverFailure::UnsupportedConfiguration { ref unfilled_edges } => format!(
                "{e}: {}",
                unfilled_edges.iter().map(|pair| format!("({}, {})", pair.0, pair.1)).join(" "),
            ),
        })?;

    info!(
        event = "solve_complete",
        solutions = stats.solutions,
        frames = stats.frames,
        candidates = stats.candidates,
    );
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("edgeperm=info,solver=info")))
        .with_writer(io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|arg| arg.to_string()).collect_vec()
    }

    #[test]
    fn no_arguments() {
        assert_eq!(parse_args(args(&[])).unwrap(), Options::default());
    }

    #[test]
    fn config_file_and_policy() {
        let options = parse_args(args(&["--config", "puzzles/reject.toml", "--leftover-edges", "reject"])).unwrap();
        assert_eq!(options.config_file, Some(PathBuf::from("puzzles/reject.toml")));
        assert_eq!(options.leftover_edges, Some(LeftoverPolicy::Reject));
    }

    #[test]
    fn bad_arguments() {
        assert!(parse_args(args(&["--config"])).is_err());
        assert!(parse_args(args(&["--leftover-edges", "guess"])).is_err());
        assert!(parse_args(args(&["puzzle.txt"])).is_err());
    }

    #[test]
    fn sample_config_by_path() {
        let options = Options {
            config_file: Some(PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/solver.toml"))),
            leftover_edges: None,
        };
        assert_eq!(load_config(&options).unwrap(), SolveConfig::default());

        let options = Options { leftover_edges: Some(LeftoverPolicy::Reject), ..options };
        assert_eq!(load_config(&options).unwrap().leftover_edges, LeftoverPolicy::Reject);
    }

    #[test]
    fn named_config_must_exist() {
        let options = Options {
            config_file: Some(PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/no-such.toml"))),
            leftover_edges: None,
        };
        assert!(load_config(&options).is_err());
    }
}
