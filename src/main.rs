use anaphora_rs::config::{AppConfig, ConfigLoader, DatabaseBackend, DatabaseConfig};
use anaphora_rs::logging::init_logging;
use anaphora_rs::storage::{PostgresStore, SqliteStore};
use anaphora_rs::{
    extract_places, AnaphoraResolver, Gazetteer, HistoryStore, StructuredInput, User, Utterance,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Parser)]
#[command(name = "anaphora-rs", version, about = "Pronoun resolution and place extraction")]
struct Cli {
    /// Configuration file (defaults to anaphora-rs.toml)
    #[arg(short, long, env = "ANAPHORA_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the tokens and stems of a sentence
    Tokenize { text: String },
    /// Extract known places from a sentence
    Places { text: String },
    /// Resolve pronouns of a structured input (JSON) against a user's history
    Resolve {
        /// User whose history is searched
        #[arg(long)]
        user: Option<u64>,
        /// JSON file with the structured input; stdin when omitted
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Print the route of a user's most recent message
    LastRoute {
        #[arg(long)]
        user: u64,
    },
    /// Print a sample configuration file
    SampleConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Command::SampleConfig = cli.command {
        print!("{}", AppConfig::sample_toml()?);
        return Ok(());
    }

    let config = ConfigLoader::new()
        .load_from_file(cli.config)
        .load_from_env()
        .build()?;
    let _guard = init_logging(&config.logging)?;

    match cli.command {
        Command::Tokenize { text } => {
            let utterance = Utterance::parse(text);
            print_json(&json!({
                "tokens": utterance.tokens(),
                "stems": utterance.stems(),
            }))?;
        }
        Command::Places { text } => {
            let (_, gazetteer) = open_store(&config.database).await?;
            let utterance = Utterance::parse(text);
            let places = extract_places(
                &utterance,
                gazetteer.as_ref(),
                &config.gazetteer.country_code,
            )
            .await?;
            print_json(&places)?;
        }
        Command::Resolve { user, input } => {
            let mut structured_input = read_input(input)?;
            let (history, _) = open_store(&config.database).await?;
            let resolver = AnaphoraResolver::new(history);
            let user = user.map(User::new);

            if let Err(e) = resolver.resolve(user.as_ref(), &mut structured_input).await {
                if !e.is_recoverable() {
                    return Err(e.into());
                }
                warn!(error = %e, "resolution incomplete");
            }
            print_json(&structured_input)?;
        }
        Command::LastRoute { user } => {
            let (history, _) = open_store(&config.database).await?;
            let route = history.last_route(user).await?;
            print_json(&json!({ "user": user, "route": route }))?;
        }
        Command::SampleConfig => print!("{}", AppConfig::sample_toml()?),
    }

    Ok(())
}

async fn open_store(
    config: &DatabaseConfig,
) -> Result<(Arc<dyn HistoryStore>, Arc<dyn Gazetteer>)> {
    match config.backend()? {
        DatabaseBackend::Sqlite => {
            let store = Arc::new(SqliteStore::connect(config).await?);
            let history: Arc<dyn HistoryStore> = store.clone();
            let gazetteer: Arc<dyn Gazetteer> = store;
            Ok((history, gazetteer))
        }
        DatabaseBackend::Postgres => {
            let store = Arc::new(PostgresStore::connect(config).await?);
            let history: Arc<dyn HistoryStore> = store.clone();
            let gazetteer: Arc<dyn Gazetteer> = store;
            Ok((history, gazetteer))
        }
    }
}

fn read_input(path: Option<PathBuf>) -> Result<StructuredInput> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => std::io::read_to_string(std::io::stdin()).context("reading stdin")?,
    };
    serde_json::from_str(&raw).context("parsing structured input")
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
