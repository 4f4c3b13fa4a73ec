//! `friendstore` command-line entry point.
//!
//! # Responsibility
//! - Open the configured record store and run one handler per invocation.
//! - Print the handler response as `{"status": ..., "payload": ...}` JSON.
//!
//! Exit code is 0 for 2xx responses and 1 otherwise.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use friendstore_core::{
    handlers, ApiResponse, Backend, RecordSource, StoreConfig, UserService,
};
use log::debug;
use serde_json::Value;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

/// User records with a friends graph, stored in JSON or SQLite.
#[derive(Parser)]
#[command(name = "friendstore", version, about, long_about = None)]
struct Cli {
    /// Record file (JSON document or SQLite database).
    #[arg(
        long,
        global = true,
        env = "FRIENDSTORE_DATA",
        default_value = "database.json"
    )]
    data: PathBuf,

    /// Persistence backend: json | sqlite | memory.
    #[arg(long, global = true, env = "FRIENDSTORE_BACKEND", default_value = "json")]
    backend: Backend,

    /// Log level: trace | debug | info | warn | error.
    #[arg(long, global = true, env = "FRIENDSTORE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, global = true, env = "FRIENDSTORE_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check that the core library is linked.
    Ping,
    /// Print every record.
    List,
    /// Print one record.
    Get { id: String },
    /// Create a record from a JSON body (`-` reads stdin).
    Create { body: String },
    /// Replace a record with a JSON body (`-` reads stdin).
    Update { id: String, body: String },
    /// Delete a record and unlink it from every friends list.
    Delete { id: String },
    /// List records within DEPTH hops of ID.
    Graph {
        id: String,
        #[arg(allow_negative_numbers = true)]
        depth: i64,
    },
}

impl Cli {
    fn store_config(&self) -> StoreConfig {
        let defaults = StoreConfig::default();
        StoreConfig {
            data_path: self.data.clone(),
            backend: self.backend,
            log_level: self.log_level.clone().unwrap_or(defaults.log_level),
            log_dir: self.log_dir.clone(),
        }
    }
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = cli.store_config();
    config
        .init_logging()
        .map_err(anyhow::Error::msg)
        .context("failed to initialize logging")?;
    debug!(
        "event=cli_start module=cli status=ok backend={} data={}",
        config.backend,
        config.data_path.display()
    );

    let response = match &cli.command {
        Command::Ping => {
            println!("friendstore_core ping={}", friendstore_core::ping());
            println!("friendstore_core version={}", friendstore_core::core_version());
            return Ok(ExitCode::SUCCESS);
        }
        Command::List => handlers::get_all(&open_service(&config)?),
        Command::Get { id } => handlers::get_one(&open_service(&config)?, id),
        Command::Create { body } => {
            let body = parse_body(body)?;
            handlers::post(&mut open_service(&config)?, Some(&body))
        }
        Command::Update { id, body } => {
            let body = parse_body(body)?;
            handlers::put(&mut open_service(&config)?, id, Some(&body))
        }
        Command::Delete { id } => handlers::delete(&mut open_service(&config)?, id),
        Command::Graph { id, depth } => {
            handlers::graph_search(&open_service(&config)?, id, *depth)
        }
    };

    print_response(&response)
}

fn open_service(config: &StoreConfig) -> Result<UserService<Box<dyn RecordSource>>> {
    config
        .open_service()
        .with_context(|| format!("failed to open `{}`", config.data_path.display()))
}

fn parse_body(arg: &str) -> Result<Value> {
    let text = if arg == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read body from stdin")?;
        buffer
    } else {
        arg.to_string()
    };
    serde_json::from_str(&text).context("body is not valid JSON")
}

fn print_response(response: &ApiResponse) -> Result<ExitCode> {
    println!("{}", serde_json::to_string_pretty(response)?);
    Ok(if response.status.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
