//! Werewolf game runner.
//!
//! Deals a table from the config file, runs one game with LLM players and
//! prints the narrated event stream.
//!
//! ```bash
//! cargo run -p werewolf -- --config game_config.toml --god-mode
//! ```

mod viewer;

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use viewer::Viewer;
use werewolf_core::{new_game, GameConfig, OpenRouterGenerator};

#[derive(Debug)]
struct Args {
    config: PathBuf,
    god_mode: bool,
    json: bool,
    seed: Option<u64>,
    help: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            config: PathBuf::from("game_config.toml"),
            god_mode: false,
            json: false,
            seed: None,
            help: false,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let args = parse_args(&args)?;

    if args.help {
        print_help();
        return Ok(());
    }

    if std::env::var("OPENROUTER_API_KEY").is_err() {
        eprintln!("Error: OPENROUTER_API_KEY environment variable not set.");
        eprintln!("Please set it in .env file or with: export OPENROUTER_API_KEY=your_key_here");
        std::process::exit(1);
    }

    let config = GameConfig::load(&args.config)?;
    let generator =
        Arc::new(OpenRouterGenerator::from_env()?.with_streaming(config.enable_streaming));
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let (game, mut events) = new_game(config, generator, &mut rng)?;
    let mut viewer = Viewer::new(args.god_mode, game.narrator().name()).with_roles(game.role_mapping());

    if !args.json {
        println!("=== Werewolf Arena ===");
        println!("{}", game.intro());
        if args.god_mode {
            println!();
            println!("Roles:");
            for (name, role) in game.role_mapping() {
                let model = game.participant(&name).map(|p| p.model()).unwrap_or("");
                println!("  {name:<10} {:<10} {model}", role.name());
            }
        }
        println!();
    }

    let handle = game.start();

    while let Some(event) = events.recv().await {
        if args.json {
            println!("{}", event.to_json());
        } else if let Some(text) = viewer.handle(&event) {
            println!("{text}");
        }
    }
    for text in viewer.flush() {
        println!("{text}");
    }

    let outcome = handle.await?;
    info!(winner = %outcome.winner, rounds = outcome.rounds, "game finished");
    Ok(())
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut parsed = Args::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                let path = args.get(i + 1).ok_or("--config requires a path")?;
                parsed.config = PathBuf::from(path);
                i += 1;
            }
            "--seed" => {
                let seed = args.get(i + 1).ok_or("--seed requires a number")?;
                parsed.seed = Some(
                    seed.parse()
                        .map_err(|_| format!("invalid seed: {seed}"))?,
                );
                i += 1;
            }
            "--god-mode" => parsed.god_mode = true,
            "--json" => parsed.json = true,
            "--help" | "-h" => parsed.help = true,
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    Ok(parsed)
}

fn print_help() {
    println!("Werewolf Arena - LLM players in a game of Werewolf");
    println!();
    println!("USAGE:");
    println!("  werewolf [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -h, --help          Show this help message");
    println!("  --config <PATH>     Config file (default: game_config.toml)");
    println!("  --god-mode          Show every player's true role");
    println!("  --json              Print raw events as JSON, one per line");
    println!("  --seed <N>          Seed role assignment for a repeatable table");
    println!();
    println!("ENVIRONMENT:");
    println!("  OPENROUTER_API_KEY  Required. May be set in a .env file");
    println!("  RUST_LOG            Log filter (default: warn)");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("werewolf")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_defaults() {
        let parsed = parse_args(&args(&[])).unwrap();
        assert_eq!(parsed.config, PathBuf::from("game_config.toml"));
        assert!(!parsed.god_mode);
        assert_eq!(parsed.seed, None);
    }

    #[test]
    fn test_parse_all_flags() {
        let parsed = parse_args(&args(&[
            "--config", "custom.toml", "--god-mode", "--json", "--seed", "42",
        ]))
        .unwrap();
        assert_eq!(parsed.config, PathBuf::from("custom.toml"));
        assert!(parsed.god_mode);
        assert!(parsed.json);
        assert_eq!(parsed.seed, Some(42));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse_args(&args(&["--seed", "abc"])).is_err());
        assert!(parse_args(&args(&["--config"])).is_err());
        assert!(parse_args(&args(&["--bogus"])).is_err());
    }
}
