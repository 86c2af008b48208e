use clap::{arg, Arg, ArgMatches, Command};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tsp_evolve::aco::{AcoConfig, AcoRunner};
use tsp_evolve::ga::{GaConfig, GaRunner};
use tsp_evolve::geometry::DistanceMatrix;
use tsp_evolve::sa::{SaConfig, SaRunner};
use tsp_evolve::{tsplib, Result, TspError};

/// Subcommand names. A binary installed under one of these names runs
/// that solver without the subcommand being spelled out.
const SOLVERS: [&str; 3] = ["genetic", "annealing", "aco"];
const DEFAULT_SOLVER: &str = "genetic";

#[derive(Debug, Clone, PartialEq)]
enum Solver {
    Genetic(GaConfig),
    Annealing(SaConfig),
    Aco(AcoConfig),
}

fn input_arg() -> Arg {
    arg!(--input <FILE> "TSPLIB file with NODE_COORD_SECTION coordinates")
        .value_parser(clap::value_parser!(PathBuf))
        .required(true)
}

fn seed_arg() -> Arg {
    arg!(--seed [SEED] "Random seed").value_parser(clap::value_parser!(u64))
}

fn sequential_arg() -> Arg {
    arg!(--sequential "Run on a single thread")
}

fn genetic_cmd() -> Command {
    Command::new("genetic")
        .about("Genetic algorithm with a shared LRU fitness cache")
        .arg(input_arg())
        .arg(
            arg!(--pop [POP] "Population size")
                .default_value("1000")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            arg!(--gens [GENS] "Number of generations")
                .default_value("2000")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            arg!(--tournament [SIZE] "Tournament size")
                .default_value("10")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("mut")
                .long("mut")
                .value_name("RATE")
                .help("Mutation rate")
                .default_value("0.1")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            arg!(--elite [COUNT] "Elite population size")
                .default_value("10")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            arg!(--cache [CAPACITY] "LRU cache size")
                .default_value("10000")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(seed_arg())
        .arg(sequential_arg())
}

fn annealing_cmd() -> Command {
    Command::new("annealing")
        .about("Simulated annealing over segment reversals")
        .arg(input_arg())
        .arg(
            arg!(--temp [TEMP] "Initial temperature")
                .default_value("100000")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            arg!(--cooling [RATE] "Cooling rate")
                .default_value("0.9999")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            arg!(--iters [ITERS] "Number of iterations")
                .default_value("500000")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(seed_arg())
}

fn aco_cmd() -> Command {
    Command::new("aco")
        .about("Ant colony optimization")
        .arg(input_arg())
        .arg(
            arg!(--ants [ANTS] "Number of ants")
                .default_value("50")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            arg!(--alpha [ALPHA] "Pheromone exponent")
                .default_value("1")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            arg!(--beta [BETA] "Heuristic exponent")
                .default_value("2")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            arg!(--rho [RHO] "Evaporation rate")
                .default_value("0.1")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            arg!(--q [Q] "Pheromone quantity")
                .default_value("100")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            arg!(--iters [ITERS] "ACO iterations")
                .default_value("100")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            arg!(--elite [COUNT] "Number of elite ants")
                .default_value("50")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(seed_arg())
        .arg(sequential_arg())
}

fn cli() -> Command {
    Command::new("tsp-evolve")
        .about("Heuristic TSP solvers: genetic algorithm, simulated annealing, ant colony")
        .subcommand_required(true)
        .subcommand(genetic_cmd())
        .subcommand(annealing_cmd())
        .subcommand(aco_cmd())
}

/// Rewrites a command line into the form [`cli`] parses.
///
/// - Single-dash long flags (`-input`, `-pop`) become `--input`, `--pop`.
///   `-h` and negative numbers are left alone.
/// - Without a subcommand, the binary's own name picks the solver when it
///   is one of [`SOLVERS`], and the genetic algorithm otherwise.
fn normalize_args<I, S>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut args = args.into_iter().map(Into::into);
    let program = args.next().unwrap_or_else(|| "tsp-evolve".to_string());
    let rest: Vec<String> = args
        .map(|arg| {
            let mut chars = arg.chars();
            let single_dash_word = chars.next() == Some('-')
                && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
                && arg != "-h";
            if single_dash_word {
                format!("-{arg}")
            } else {
                arg
            }
        })
        .collect();

    let mut normalized = vec![program.clone()];
    let names_subcommand = rest
        .first()
        .is_some_and(|first| SOLVERS.contains(&first.as_str()) || first == "help");
    let asks_for_help = rest
        .first()
        .is_some_and(|first| first == "-h" || first == "--help");
    if !names_subcommand && !asks_for_help {
        let stem = Path::new(&program)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        let solver = SOLVERS
            .iter()
            .find(|&&name| name == stem)
            .copied()
            .unwrap_or(DEFAULT_SOLVER);
        normalized.push(solver.to_string());
    }
    normalized.extend(rest);
    normalized
}

fn value<T: Clone + Send + Sync + 'static>(matches: &ArgMatches, name: &str) -> Result<T> {
    matches
        .get_one::<T>(name)
        .cloned()
        .ok_or_else(|| TspError::Config(format!("missing --{name}")))
}

fn genetic_config(matches: &ArgMatches) -> Result<GaConfig> {
    let rate: f64 = value(matches, "mut")?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(TspError::Config(format!("--mut must be within [0, 1], got {rate}")));
    }

    let mut config = GaConfig::default()
        .with_population_size(value(matches, "pop")?)
        .with_max_generations(value(matches, "gens")?)
        .with_tournament_size(value(matches, "tournament")?)
        .with_mutation_rate(rate)
        .with_elite_count(value(matches, "elite")?)
        .with_cache_capacity(value(matches, "cache")?)
        .with_parallel(!matches.get_flag("sequential"));
    if let Some(&seed) = matches.get_one::<u64>("seed") {
        config = config.with_seed(seed);
    }
    config.validate()?;
    Ok(config)
}

fn annealing_config(matches: &ArgMatches) -> Result<SaConfig> {
    let mut config = SaConfig::default()
        .with_initial_temperature(value(matches, "temp")?)
        .with_cooling_rate(value(matches, "cooling")?)
        .with_max_iterations(value(matches, "iters")?);
    if let Some(&seed) = matches.get_one::<u64>("seed") {
        config = config.with_seed(seed);
    }
    config.validate()?;
    Ok(config)
}

fn aco_config(matches: &ArgMatches) -> Result<AcoConfig> {
    let rho: f64 = value(matches, "rho")?;
    if !(0.0..=1.0).contains(&rho) {
        return Err(TspError::Config(format!("--rho must be within [0, 1], got {rho}")));
    }

    let mut config = AcoConfig::default()
        .with_ants(value(matches, "ants")?)
        .with_alpha(value(matches, "alpha")?)
        .with_beta(value(matches, "beta")?)
        .with_evaporation(rho)
        .with_deposit(value(matches, "q")?)
        .with_max_iterations(value(matches, "iters")?)
        .with_elite_ants(value(matches, "elite")?)
        .with_parallel(!matches.get_flag("sequential"));
    if let Some(&seed) = matches.get_one::<u64>("seed") {
        config = config.with_seed(seed);
    }
    config.validate()?;
    Ok(config)
}

/// Picks the solver and builds its validated configuration.
fn solver_from(matches: &ArgMatches) -> Result<(Solver, PathBuf)> {
    let (name, sub) = matches
        .subcommand()
        .ok_or_else(|| TspError::Config("missing solver".into()))?;
    let solver = match name {
        "genetic" => Solver::Genetic(genetic_config(sub)?),
        "annealing" => Solver::Annealing(annealing_config(sub)?),
        "aco" => Solver::Aco(aco_config(sub)?),
        other => return Err(TspError::Config(format!("unknown solver {other}"))),
    };
    let input: PathBuf = value(sub, "input")?;
    Ok((solver, input))
}

fn run(matches: &ArgMatches) -> Result<()> {
    let start = Instant::now();
    let (solver, input) = solver_from(matches)?;

    let points = tsplib::read_tsplib(&input)?;
    if points.is_empty() {
        return Err(TspError::NoCities);
    }
    info!("Loaded {} cities from {}", points.len(), input.display());
    let matrix = DistanceMatrix::from_points(&points);

    let best_length = match &solver {
        Solver::Genetic(config) => GaRunner::run(&matrix, config)?.best_length,
        Solver::Annealing(config) => SaRunner::run(&matrix, config)?.best_length,
        Solver::Aco(config) => AcoRunner::run(&matrix, config)?.best_length,
    };

    println!("\nBest route distance: {:.2}", best_length);
    println!("Execution time: {:?}", start.elapsed());
    Ok(())
}

fn main() -> ExitCode {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tsp_evolve=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let matches = cli().get_matches_from(normalize_args(std::env::args()));
    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
