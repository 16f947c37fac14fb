//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::error::PapertradeError;
use crate::ports::config_port::ConfigPort;

#[derive(Parser, Debug)]
#[command(name = "papertrade", about = "Stock-trading simulator web server")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the web server
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Create the database schema
    InitDb {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Output an argon2 hash for a password
    HashPassword,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Serve { config } => run_serve(&config),
        Command::InitDb { config } => run_init_db(&config),
        Command::HashPassword => run_hash_password(),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = PapertradeError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn run_serve(config_path: &PathBuf) -> ExitCode {
    use crate::adapters::iex_quote::IexQuoteClient;
    use crate::adapters::sqlite_store::SqliteStore;
    use crate::adapters::web::{build_router, AppState};
    use std::net::SocketAddr;
    use std::sync::Arc;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // The quote provider is unusable without a key; refuse to start.
    let api_key = match std::env::var("API_KEY") {
        Ok(key) if !key.is_empty() => key,
        _ => {
            eprintln!("error: API_KEY not set");
            return ExitCode::from(2);
        }
    };

    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let store = match SqliteStore::from_config(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if let Err(e) = store.initialize_schema() {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let quotes = match IexQuoteClient::from_config(&config, api_key) {
        Ok(q) => q,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let addr: SocketAddr = config
        .get_string("web", "listen")
        .unwrap_or_else(|| "127.0.0.1:8080".to_string())
        .parse()
        .unwrap_or_else(|_| "127.0.0.1:8080".parse().unwrap());

    let state = AppState {
        store: Arc::new(store),
        quotes: Arc::new(quotes),
        config: Arc::new(config),
    };

    let router = match build_router(state) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("Starting web server on {addr}");

    tokio::runtime::Runtime::new().unwrap().block_on(async {
        let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
        axum::serve(listener, router).await.unwrap();
    });

    ExitCode::SUCCESS
}

fn run_init_db(config_path: &PathBuf) -> ExitCode {
    use crate::adapters::sqlite_store::SqliteStore;

    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let store = match SqliteStore::from_config(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match store.initialize_schema() {
        Ok(()) => {
            eprintln!("Database schema initialized");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_hash_password() -> ExitCode {
    use crate::adapters::web::hash_password;
    use std::io::{self, BufRead};

    eprintln!("Enter password to hash:");
    let stdin = io::stdin();
    let password = stdin
        .lock()
        .lines()
        .next()
        .unwrap_or(Ok(String::new()))
        .unwrap_or_default();

    match hash_password(&password) {
        Ok(hash) => {
            println!("{hash}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
