// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Command-line enumeration of tatami layouts.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tatami_search::{build_model, Completion, Room, SearchConfig, Solutions};

/// Enumerate the tatami layouts of an XMAX by YMAX room.
#[derive(Parser, Debug)]
#[command(name = "tatami", version, about, long_about = None)]
struct Args {
    /// Room width
    #[arg(default_value_t = 4, value_parser = clap::value_parser!(u32).range(1..))]
    xmax: u32,

    /// Room height
    #[arg(default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    ymax: u32,

    /// Stop after this many solutions
    #[arg(long, value_name = "N")]
    limit: Option<usize>,

    /// Stop after this many search steps
    #[arg(long, value_name = "N")]
    max_nodes: Option<u64>,

    /// Stop after this many seconds
    #[arg(long, value_name = "SECONDS", value_parser = parse_seconds)]
    timeout: Option<Duration>,

    /// Print only the number of solutions
    #[arg(long)]
    count: bool,

    /// Log more (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn config(&self) -> SearchConfig {
        SearchConfig {
            node_limit: self.max_nodes,
            timeout: self.timeout,
            solution_limit: self.limit,
        }
    }
}

/// Parse a non-negative number of seconds that fits in a `Duration`.
fn parse_seconds(arg: &str) -> Result<Duration, String> {
    let secs: f64 = arg.parse().map_err(|err| format!("{}", err))?;
    Duration::try_from_secs_f64(secs).map_err(|err| format!("{}", err))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let room = Room::new(args.xmax, args.ymax);
    let tatami = match build_model(room) {
        Ok(tatami) => tatami,
        Err(err) => {
            eprintln!("error: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let mut solutions = Solutions::with_config(tatami.model(), &args.config());
    let mut found = 0usize;
    for solution in solutions.by_ref() {
        found += 1;
        if args.count {
            continue;
        }
        println!("{}", solution);
        for tile in solution.tiles() {
            println!("  {}", tile);
        }
    }

    if args.count {
        println!("{}", found);
    } else {
        println!("{} solution(s) for room {}", found, room);
    }
    match solutions.completion() {
        Some(Completion::Cancelled) => {
            println!("note: search cancelled, the list above is incomplete");
        }
        Some(Completion::Stopped) => {
            println!("note: solution limit reached, more solutions may exist");
        }
        _ => {}
    }
    ExitCode::SUCCESS
}
