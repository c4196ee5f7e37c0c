//! Skirmish console driver.
//!
//! Plays the shipped level catalog as one session and prints the combat
//! transcript.
//!
//! Usage:
//!   cargo run -- [--seed N] [--json]
//!
//! `--seed N` makes unit stat rolls reproducible; `--json` additionally
//! writes the full session report to a timestamped file. Set `RUST_LOG`
//! (e.g. `RUST_LOG=skirmish=debug`) for engine-level diagnostics.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use skirmish::build_info;
use skirmish::game::{GameSession, LevelCatalog};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let seed = parse_seed(&args);
    let write_json = args.iter().any(|arg| arg == "--json");

    println!("SKIRMISH - combat encounter engine");
    println!(
        "Build: {} ({})",
        build_info::BUILD_COMMIT,
        build_info::BUILD_DATE
    );
    if let Some(seed) = seed {
        println!("Seed:  {seed}");
    }
    println!();

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let catalog = LevelCatalog::standard(&mut rng);
    let mut session = GameSession::new(catalog);
    let report = session.play();

    println!("{}", report.to_text());

    if write_json {
        let filename = format!(
            "skirmish_report_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        match serde_json::to_string_pretty(&report) {
            Ok(json) => match std::fs::write(&filename, json) {
                Ok(()) => println!("JSON report saved to: {filename}"),
                Err(err) => eprintln!("Failed to write {filename}: {err}"),
            },
            Err(err) => eprintln!("Failed to serialize report: {err}"),
        }
    }
}

fn parse_seed(args: &[String]) -> Option<u64> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--seed" || arg == "-s" {
            return iter.next().and_then(|value| value.parse().ok());
        }
    }
    None
}
