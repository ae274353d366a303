//! Rollout CLI.
//!
//! Evaluate a scripted policy over seeded episodes, or watch one episode in
//! the terminal.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                        # 100 gap-follower episodes
//!   cargo run --bin simulate -- -n 20 -p random     # 20 random-policy episodes
//!   cargo run --bin simulate -- --seed 42 --json report.json
//!   cargo run --bin simulate -- --watch             # Watch one episode
//!
//! Logging is controlled with RUST_LOG, e.g. RUST_LOG=flappy_env=debug.

use flappy_env::rollout::{run_rollouts, RolloutConfig};
use flappy_env::{EnvConfig, EnvError, GameSimulator, RenderMode};
use std::env;
use std::fs;
use std::process;
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const WATCH_FRAME: Duration = Duration::from_millis(33);

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(msg) => {
            eprintln!("error: {msg}");
            eprintln!("run with --help for usage");
            process::exit(2);
        }
    };

    let result = if options.watch {
        watch(&options.config)
    } else {
        evaluate(&options)
    };
    if let Err(err) = result {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

struct Options {
    config: RolloutConfig,
    json_path: Option<String>,
    watch: bool,
}

fn evaluate(options: &Options) -> Result<(), EnvError> {
    let config = &options.config;
    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║                  FLAPPY-ENV ROLLOUT                           ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Episodes:       {}", config.episodes);
    println!("  Policy:         {}", config.policy);
    println!("  Max Ticks:      {}", config.max_ticks);
    if let Some(limit) = config.env.score_limit {
        println!("  Score Limit:    {}", limit);
    }
    if let Some(seed) = config.base_seed {
        println!("  Base Seed:      {}", seed);
    }
    println!();

    let report = run_rollouts(config)?;
    println!("{}", report.to_text());

    if let Some(path) = &options.json_path {
        fs::write(path, report.to_json()).map_err(|e| EnvError::ConfigIo(format!("{path}: {e}")))?;
        println!("JSON report saved to: {}", path);
    }
    Ok(())
}

/// Play a single episode with live terminal rendering.
fn watch(config: &RolloutConfig) -> Result<(), EnvError> {
    let env_config = config.env_config().with_render_mode(RenderMode::Human);
    let seed = config.base_seed.unwrap_or(0);
    let mut policy = config.policy.build(&env_config, seed)?;
    let mut sim = GameSimulator::new(env_config)?;

    let (mut observation, _) = sim.reset(Some(seed))?;
    sim.render()?;
    let info = loop {
        thread::sleep(WATCH_FRAME);
        let result = sim.step(policy.act(&observation))?;
        sim.render()?;
        if result.done() {
            break result.info;
        }
        observation = result.observation;
    };
    thread::sleep(WATCH_FRAME * 30);
    sim.close()?;

    println!(
        "score {} after {} ticks ({})",
        info.score,
        info.tick,
        info.end_cause
            .map(|c| c.to_string())
            .unwrap_or_else(|| "unfinished".to_string())
    );
    Ok(())
}

fn parse_value<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> Result<T, String> {
    args.get(i + 1)
        .ok_or_else(|| format!("{flag} needs a value"))?
        .parse()
        .map_err(|_| format!("invalid value for {flag}: {}", args[i + 1]))
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut config = RolloutConfig::default();
    let mut json_path = None;
    let mut watch = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-n" | "--episodes" => {
                config.episodes = parse_value(args, i, "--episodes")?;
                i += 1;
            }
            "-s" | "--seed" => {
                config.base_seed = Some(parse_value(args, i, "--seed")?);
                i += 1;
            }
            "-p" | "--policy" => {
                config.policy = parse_value(args, i, "--policy")?;
                i += 1;
            }
            "-t" | "--ticks" => {
                config.max_ticks = parse_value(args, i, "--ticks")?;
                i += 1;
            }
            "--score-limit" => {
                config.env.score_limit = Some(parse_value(args, i, "--score-limit")?);
                i += 1;
            }
            "-c" | "--config" => {
                let path: String = parse_value(args, i, "--config")?;
                config.env = EnvConfig::from_json_file(&path).map_err(|e| e.to_string())?;
                i += 1;
            }
            "--json" => {
                json_path = Some(parse_value(args, i, "--json")?);
                i += 1;
            }
            "--watch" => {
                watch = true;
            }
            "--quick" => {
                config = RolloutConfig::quick();
            }
            "-h" | "--help" => {
                print_help();
                process::exit(0);
            }
            other => return Err(format!("unknown argument '{other}'")),
        }
        i += 1;
    }

    Ok(Options {
        config,
        json_path,
        watch,
    })
}

fn print_help() {
    println!("flappy-env rollout simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin simulate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -n, --episodes <N>    Number of episodes (default: 100)");
    println!("    -s, --seed <S>        Base seed; episode i uses S + i");
    println!("    -p, --policy <P>      noop, random or gap_follower (default)");
    println!("    -t, --ticks <T>       Max ticks per episode (default: 10,000)");
    println!("    --score-limit <N>     Truncate episodes at this score");
    println!("    -c, --config <FILE>   Environment config (JSON)");
    println!("    --json <FILE>         Save the report as JSON");
    println!("    --watch               Watch one episode in the terminal");
    println!("    --quick               10 seeded episodes, 2,000 tick cap");
    println!("    -h, --help            Show this help");
}
