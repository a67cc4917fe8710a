//! taskdb CLI
//!
//! Runs one store operation against a data directory and prints the
//! result as JSON.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use taskdb::command::{parse_fields, Command, Response, Status};
use taskdb::{Config, Filter, RecordStore, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// taskdb CLI
#[derive(Parser, Debug)]
#[command(name = "taskdb")]
#[command(about = "JSON-file record store for tasks")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./taskdb_data")]
    data_dir: String,

    /// Write the store file indented
    #[arg(long)]
    pretty: bool,

    /// Skip fsync before replacing the store file
    #[arg(long)]
    no_sync: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List records, optionally filtered
    List {
        /// Collection name
        #[arg(default_value = "tasks")]
        collection: String,

        /// field=term; records matching any clause are listed
        #[arg(short, long = "filter")]
        filters: Vec<String>,
    },

    /// Show one record
    Get {
        /// Record id
        id: String,

        #[arg(short, long, default_value = "tasks")]
        collection: String,
    },

    /// Create a record
    Insert {
        /// Collection name
        #[arg(default_value = "tasks")]
        collection: String,

        /// key=value; JSON values are kept typed
        #[arg(short, long = "field")]
        fields: Vec<String>,
    },

    /// Merge fields into a record
    Update {
        /// Record id
        id: String,

        #[arg(short, long, default_value = "tasks")]
        collection: String,

        /// key=value; JSON values are kept typed
        #[arg(short, long = "field")]
        fields: Vec<String>,
    },

    /// Remove a record
    Delete {
        /// Record id
        id: String,

        #[arg(short, long, default_value = "tasks")]
        collection: String,
    },

    /// Mark a record completed
    Complete {
        /// Record id
        id: String,

        #[arg(short, long, default_value = "tasks")]
        collection: String,
    },
}

impl Commands {
    fn into_command(self) -> Result<Command> {
        Ok(match self {
            Commands::List { collection, filters } => {
                let filter = if filters.is_empty() {
                    None
                } else {
                    Some(
                        filters
                            .iter()
                            .map(|pair| Filter::parse_clause(pair))
                            .collect::<Result<Filter>>()?,
                    )
                };
                Command::Select { collection, filter }
            }
            Commands::Get { id, collection } => Command::Get { collection, id },
            Commands::Insert { collection, fields } => Command::Insert {
                collection,
                fields: parse_fields(&fields)?,
            },
            Commands::Update { id, collection, fields } => Command::Update {
                collection,
                id,
                fields: parse_fields(&fields)?,
            },
            Commands::Delete { id, collection } => Command::Delete { collection, id },
            Commands::Complete { id, collection } => Command::Complete { collection, id },
        })
    }
}

fn main() -> ExitCode {
    // Logs go to stderr so stdout stays valid JSON
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,taskdb=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    tracing::debug!("taskdb v{}", taskdb::VERSION);

    let config = Config::builder()
        .data_dir(&args.data_dir)
        .pretty(args.pretty)
        .sync_on_write(!args.no_sync)
        .build();

    let store = match RecordStore::open(config) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to open store: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let response = Response::from_result(
        args.command
            .into_command()
            .and_then(|command| store.execute(command)),
    );

    if let Err(e) = store.close() {
        tracing::error!("Failed to close store: {}", e);
        return ExitCode::FAILURE;
    }

    if let Some(payload) = &response.payload {
        match serde_json::to_string_pretty(payload) {
            Ok(text) if response.is_success() => println!("{}", text),
            Ok(text) => eprintln!("{}", text),
            Err(e) => tracing::error!("Failed to render response: {}", e),
        }
    }

    match response.status {
        Status::Ok | Status::Created => ExitCode::SUCCESS,
        Status::NotFound => ExitCode::from(2),
        Status::Error => ExitCode::FAILURE,
    }
}
