mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use ollama_db_agent::AgentOptions;
use ollama_db_core::{
    DEFAULT_CSV_FILE, DEFAULT_MAX_ITERATIONS, DEFAULT_SQL_TOP_K, DbConfig, EMPLOYEES_COLLECTION,
    OllamaConfig,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ollama-db")]
#[command(
    about = "Ask natural-language questions about an employees database with a local Ollama model",
    long_about = None
)]
struct Cli {
    /// PostgreSQL URL; overrides the DB_* variables
    #[arg(long, global = true, env = "DATABASE_URL", hide_env_values = true)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database, load the CSV and print the table
    Ingest {
        #[arg(long, default_value = DEFAULT_CSV_FILE)]
        csv: PathBuf,
    },
    /// Print every row of the employees table
    Validate,
    /// Embed all employees into a vector collection
    Index {
        #[arg(long, default_value = EMPLOYEES_COLLECTION)]
        collection: String,
    },
    /// Answer questions by generating SQL
    SqlAgent {
        /// Questions to ask; defaults to the built-in examples
        questions: Vec<String>,
        #[command(flatten)]
        agent: AgentArgs,
    },
    /// Answer questions with SQL tools plus vector retrieval
    Hybrid {
        questions: Vec<String>,
        #[arg(long, default_value = EMPLOYEES_COLLECTION)]
        collection: String,
        #[command(flatten)]
        agent: AgentArgs,
    },
}

#[derive(Args)]
struct AgentArgs {
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    max_iterations: usize,
    /// Fail on malformed model output instead of asking the model to retry
    #[arg(long)]
    no_handle_parsing_errors: bool,
    /// Row limit suggested to the model for SQL queries
    #[arg(long, default_value_t = DEFAULT_SQL_TOP_K)]
    top_k: usize,
}

impl AgentArgs {
    fn options(&self) -> AgentOptions {
        AgentOptions {
            max_iterations: self.max_iterations,
            handle_parsing_errors: !self.no_handle_parsing_errors,
            top_k: self.top_k,
            ..AgentOptions::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let db = DbConfig::from_env().with_url(cli.database_url);

    match cli.command {
        Commands::Ingest { csv } => commands::ingest::run_ingest(&db, &csv).await,
        Commands::Validate => commands::ingest::run_validate(&db).await,
        Commands::Index { collection } => {
            commands::index::run_index(&db, &OllamaConfig::from_env(), &collection).await
        },
        Commands::SqlAgent { questions, agent } => {
            commands::ask::run_sql_agent(&db, &OllamaConfig::from_env(), questions, agent.options())
                .await
        },
        Commands::Hybrid { questions, collection, agent } => {
            commands::ask::run_hybrid(
                &db,
                &OllamaConfig::from_env(),
                questions,
                agent.options(),
                &collection,
            )
            .await
        },
    }
}
