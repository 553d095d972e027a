//! hitline-replay: run projectile scenarios headless and print the events.
//!
//! Usage:
//!   hitline-replay run scenario.json [--quiet]
//!   hitline-replay demo [--quiet]
//!
//! Events go to stdout as JSON lines; logs go to stderr
//! (`RUST_LOG` filters, `LOG_FORMAT=json` switches format).

mod scenario;

use std::path::PathBuf;
use std::process;

use serde::Serialize;

use hitline_core::events::CombatEvent;

use crate::scenario::Scenario;

fn main() {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let quiet = args.iter().any(|a| a == "--quiet");
    match args[1].as_str() {
        "run" => cmd_run(&args[2..], quiet),
        "demo" => cmd_demo(quiet),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
            .init();
    }
}

fn print_usage() {
    eprintln!(
        "hitline-replay: headless projectile scenario runner\n\
         \n\
         Commands:\n\
         \n\
         run <path>   Run a JSON scenario file\n\
         demo         Run the built-in demo scenario\n\
         \n\
         Options:\n\
         \n\
           --quiet    Print only the final summary\n\
         \n\
         Examples:\n\
         \n\
           hitline-replay run scenarios/crossfire.json\n\
           RUST_LOG=hitline_sim=debug hitline-replay demo\n"
    );
}

fn cmd_run(args: &[String], quiet: bool) {
    let Some(path) = args.iter().find(|a| !a.starts_with("--")).map(PathBuf::from) else {
        eprintln!("Error: scenario path is required");
        process::exit(1);
    };

    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error reading {}: {e}", path.display());
            process::exit(1);
        }
    };
    match Scenario::from_json(&text) {
        Ok(scenario) => replay(&scenario, quiet),
        Err(e) => {
            eprintln!("Error in {}: {e}", path.display());
            process::exit(1);
        }
    }
}

fn cmd_demo(quiet: bool) {
    match scenario::demo() {
        Ok(scenario) => replay(&scenario, quiet),
        Err(e) => {
            eprintln!("Error in demo scenario: {e}");
            process::exit(1);
        }
    }
}

#[derive(Serialize)]
struct EventLine<'a> {
    at_ms: f64,
    #[serde(flatten)]
    event: &'a CombatEvent,
}

fn replay(scenario: &Scenario, quiet: bool) {
    let summary = scenario.run(|at_ms, event| {
        if quiet {
            return;
        }
        match serde_json::to_string(&EventLine { at_ms, event }) {
            Ok(line) => println!("{line}"),
            Err(e) => eprintln!("Error encoding event: {e}"),
        }
    });

    match serde_json::to_string_pretty(&summary) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("Error encoding summary: {e}");
            process::exit(1);
        }
    }
}
