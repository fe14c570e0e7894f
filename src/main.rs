use std::error::Error;
use std::process;

use clap::{App, Arg, ArgMatches};
use log::debug;
use prettytable::{Cell, Row, Table};
use separator::Separatable;

use sokoban_search::config::{DistanceMode, Method, SolverConfig, METHODS};
use sokoban_search::level::Level;
use sokoban_search::{LoadLevel, Solve};

fn main() {
    env_logger::init();

    let matches = App::new("sokoban-search")
        .version("0.1")
        .arg(
            Arg::with_name("method")
                .short("m")
                .long("method")
                .takes_value(true)
                .possible_values(&["bfs", "dfs", "astar", "all"])
                .default_value("astar")
                .help("search strategy, all compares them"),
        )
        .arg(
            Arg::with_name("distance")
                .short("d")
                .long("distance")
                .takes_value(true)
                .default_value("manhattan")
                .help("distance used by the heuristic: manhattan or euclidean"),
        )
        .arg(
            Arg::with_name("max-depth")
                .long("max-depth")
                .takes_value(true)
                .help("maximum path length explored by dfs (default 1000)"),
        )
        .arg(
            Arg::with_name("longest-match-weight")
                .long("longest-match-weight")
                .takes_value(true)
                .help("weight of the longest box-goal distance in the heuristic (default 0.2)"),
        )
        .arg(
            Arg::with_name("nearest-box-weight")
                .long("nearest-box-weight")
                .takes_value(true)
                .help("weight of the player-box distance in the heuristic (default 0.5)"),
        )
        .arg(
            Arg::with_name("no-prune")
                .long("no-prune")
                .help("don't discard deadlocked states"),
        )
        .arg(
            Arg::with_name("steps")
                .short("s")
                .long("steps")
                .help("print the state after every move, not just pushes"),
        )
        .arg(
            Arg::with_name("status")
                .long("status")
                .help("print progress while searching"),
        )
        .arg(Arg::with_name("file").required(true))
        .get_matches();

    if let Err(err) = run(&matches) {
        eprintln!("{}", err);
        process::exit(1);
    }
}

fn run(matches: &ArgMatches<'_>) -> Result<(), Box<dyn Error>> {
    let config = parse_config(matches)?;
    debug!("Using {:?}", config);

    // both have defaults or are required
    let method = matches.value_of("method").unwrap_or("astar");
    let path = matches.value_of("file").unwrap_or_default();
    let include_steps = matches.is_present("steps");
    let print_status = matches.is_present("status");

    let level = path
        .load_level()
        .map_err(|err| format!("Can't load level {}: {}", path, err))?;

    if method == "all" {
        compare_methods(&level, &config, print_status);
        return Ok(());
    }

    let method: Method = method.parse()?;
    println!("Solving {} using {}...", path, method);
    let solver_ok = level.solve(method, &config, print_status);
    println!("{}", solver_ok.stats);

    match solver_ok.moves {
        Some(ref moves) => {
            let formatter = level
                .format_solution(moves, include_steps)
                .ok_or("Found solution can't be replayed")?;
            println!("Found solution:");
            print!("{}", formatter);
            println!("{}", moves);
            println!("Moves: {}", moves.move_cnt());
            println!("Pushes: {}", moves.push_cnt());
        }
        None => println!("No solution"),
    }

    Ok(())
}

fn parse_config(matches: &ArgMatches<'_>) -> Result<SolverConfig, Box<dyn Error>> {
    let mut config = SolverConfig::default();

    if let Some(distance) = matches.value_of("distance") {
        config.distance = distance.parse::<DistanceMode>()?;
    }
    if let Some(max_depth) = matches.value_of("max-depth") {
        config.max_depth = max_depth
            .parse()
            .map_err(|err| format!("Invalid max depth {}: {}", max_depth, err))?;
    }
    if let Some(weight) = matches.value_of("longest-match-weight") {
        config.weights.longest_match = parse_weight(weight)?;
    }
    if let Some(weight) = matches.value_of("nearest-box-weight") {
        config.weights.nearest_box = parse_weight(weight)?;
    }
    config.weights.validate()?;
    config.prune_deadlocks = !matches.is_present("no-prune");

    Ok(config)
}

fn parse_weight(weight: &str) -> Result<f64, Box<dyn Error>> {
    let parsed = weight
        .parse()
        .map_err(|err| format!("Invalid weight {}: {}", weight, err))?;
    Ok(parsed)
}

fn compare_methods(level: &Level, config: &SolverConfig, print_status: bool) {
    let mut table = Table::new();
    table.set_titles(Row::new(vec![
        Cell::new("Method"),
        Cell::new("Moves"),
        Cell::new("Pushes"),
        Cell::new("Explored"),
        Cell::new("Time (ms)"),
    ]));

    for &method in &METHODS {
        let solver_ok = level.solve(method, config, print_status);
        let (moves, pushes) = match solver_ok.moves {
            Some(ref moves) => (moves.move_cnt().to_string(), moves.push_cnt().to_string()),
            None => ("No solution".to_string(), "-".to_string()),
        };
        table.add_row(Row::new(vec![
            Cell::new(&method.to_string()),
            Cell::new(&moves),
            Cell::new(&pushes),
            Cell::new(&solver_ok.stats.explored_nodes().separated_string()),
            Cell::new(&(solver_ok.stats.execution_time.as_millis() as u64).separated_string()),
        ]));
    }

    table.printstd();
}
