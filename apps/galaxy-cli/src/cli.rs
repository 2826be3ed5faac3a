//! Command-line interface for `galaxy`.
//!
//! The `Cli` struct is the top-level argument parser; each [`Commands`]
//! variant maps to a handler function below. All command logic lives
//! here in the library crate so it can be exercised without spawning
//! the binary.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use galaxy_driver::{Engine, HttpRemote, Remote, RemoteError};
use galaxy_engine::{demodulate, modulate, parse, unparse, View};

use crate::error::CliError;

#[derive(Parser)]
#[command(name = "galaxy")]
#[command(about = "A combinator-calculus interpreter and interaction driver")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Drive an interact loop locally, reading `x,y` click events from
    /// stdin, one per line. Errors if the program ever needs a remote
    /// exchange — pass `interact` with `--endpoint` for that.
    Run {
        /// Path to a `name = tokens...` definitions file.
        #[arg(long)]
        defs: PathBuf,
    },

    /// Parse and evaluate a single expression, printing its normal form.
    Eval {
        #[arg(long)]
        defs: PathBuf,
        /// The expression, in "ap"-prefix textual form.
        expression: String,
        /// Print reduction step/lookup counts to stderr, for diagnosing
        /// divergent or unexpectedly expensive programs.
        #[arg(long)]
        trace: bool,
    },

    /// Read a textual value from stdin, print its modulated bit-string.
    Modulate,

    /// Read a modulated bit-string from stdin, print the decoded value.
    Demodulate,

    /// Drive a full interact loop against a real remote, reading `x,y`
    /// click events from stdin, one per line.
    Interact {
        #[arg(long)]
        defs: PathBuf,
        /// The alien proxy endpoint to exchange modulated data with.
        #[arg(long)]
        endpoint: String,
        /// Falls back to the `GALAXY_API_KEY` environment variable.
        #[arg(long)]
        api_key: Option<String>,
    },
}

pub fn run_cli() -> Result<(), CliError> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run { defs } => run_local(&defs),
        Commands::Eval {
            defs,
            expression,
            trace,
        } => eval(&defs, &expression, trace),
        Commands::Modulate => modulate_filter(),
        Commands::Demodulate => demodulate_filter(),
        Commands::Interact {
            defs,
            endpoint,
            api_key,
        } => interact_remote(&defs, &endpoint, api_key),
    }
}

fn eval(defs: &PathBuf, expression: &str, trace: bool) -> Result<(), CliError> {
    let engine_env = galaxy_engine::load_definitions(&std::fs::read_to_string(defs)?)?;
    let expr = parse(expression)?;
    if trace {
        let (result, stats) = galaxy_engine::evaluate_with_stats(&engine_env, &expr)?;
        eprintln!(
            "{} step(s), {} environment lookup(s)",
            stats.steps, stats.env_lookups
        );
        println!("{}", unparse(&result));
    } else {
        let result = galaxy_engine::evaluate(&engine_env, &expr)?;
        println!("{}", unparse(&result));
    }
    Ok(())
}

fn modulate_filter() -> Result<(), CliError> {
    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let expr = parse(line.trim())?;
        println!("{}", modulate(&expr)?);
    }
    Ok(())
}

fn demodulate_filter() -> Result<(), CliError> {
    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let expr = demodulate(line.trim())?;
        println!("{}", unparse(&expr));
    }
    Ok(())
}

fn run_local(defs: &PathBuf) -> Result<(), CliError> {
    let engine = Engine::new(defs)?;
    let mut remote = NoRemote;
    drive(&engine, &mut remote)
}

fn interact_remote(defs: &PathBuf, endpoint: &str, api_key: Option<String>) -> Result<(), CliError> {
    let api_key = api_key
        .or_else(|| std::env::var("GALAXY_API_KEY").ok())
        .ok_or_else(|| {
            CliError::Usage("no API key: pass --api-key or set GALAXY_API_KEY".to_string())
        })?;
    let engine = Engine::new(defs)?;
    let mut remote = HttpRemote::new(endpoint, api_key);
    drive(&engine, &mut remote)
}

/// Shared stdin-driven loop for `run` and `interact`: each line is an
/// `x,y` click event; the state threads from one line to the next.
fn drive(engine: &Engine, remote: &mut dyn Remote) -> Result<(), CliError> {
    let mut state = View::Nil;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event = parse_click(line.trim())?;
        let (new_state, images) = engine.interact(state, event, remote)?;
        writeln!(out, "{}", images)?;
        state = new_state;
    }
    Ok(())
}

fn parse_click(line: &str) -> Result<View, CliError> {
    let (x, y) = line
        .split_once(',')
        .ok_or_else(|| CliError::Usage(format!("expected \"x,y\", got {:?}", line)))?;
    let x: i64 = x
        .trim()
        .parse()
        .map_err(|_| CliError::Usage(format!("not an integer: {:?}", x)))?;
    let y: i64 = y
        .trim()
        .parse()
        .map_err(|_| CliError::Usage(format!("not an integer: {:?}", y)))?;
    Ok(View::pair(View::int(x), View::int(y)))
}

/// Stands in for a remote in `run`: `run` has no `--endpoint`, so a
/// program that actually needs one fails loudly instead of hanging.
struct NoRemote;

impl Remote for NoRemote {
    fn exchange(&mut self, _bits: &str) -> Result<String, RemoteError> {
        Err(RemoteError::Network(
            "this program requires a remote exchange; use `galaxy interact --endpoint`"
                .to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_click_reads_a_coordinate_pair() {
        assert_eq!(
            parse_click("3,-4").unwrap(),
            View::pair(View::int(3), View::int(-4))
        );
    }

    #[test]
    fn parse_click_rejects_missing_comma() {
        assert!(parse_click("no comma here").is_err());
    }

    #[test]
    fn parse_click_rejects_non_integer_components() {
        assert!(parse_click("x,y").is_err());
    }

    #[test]
    fn no_remote_always_refuses_to_exchange() {
        let mut remote = NoRemote;
        assert!(remote.exchange("010").is_err());
    }
}
