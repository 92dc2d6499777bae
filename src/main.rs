//! Instafake entrypoint: serve the HTTP API (default), engineer training
//! datasets with the serving-time feature definition, or run one prediction.

use clap::{Parser, Subcommand};
use instafake::{
    api::{create_router, AppState},
    config::AppConfig,
    features::{dataset, RawAccountFeatures},
    fetcher::{AccountFetcher, InstagramFetcher},
    logging::{PredictionRecord, StructuredLogger},
    model::ModelStore,
    predictor::Predictor,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Instagram fake account detector
#[derive(Parser, Debug)]
#[command(name = "instafake", version)]
struct Cli {
    /// JSON config file (default: $INSTAFAKE_CONFIG_PATH or ./config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP API
    Serve,
    /// Append ratio features to labelled account datasets
    Engineer {
        /// JSON arrays of account rows (e.g. real and fake samples)
        #[arg(long = "input", required = true)]
        inputs: Vec<PathBuf>,
        /// Engineered rows output
        #[arg(long)]
        out: PathBuf,
        /// Feature-column order output (for the model manifest)
        #[arg(long)]
        columns_out: Option<PathBuf>,
    },
    /// Classify one account and print the result as JSON
    Predict {
        /// RawAccountFeatures JSON object
        #[arg(long, conflicts_with = "username", required_unless_present = "username")]
        features: Option<String>,
        /// Look the account up by username
        #[arg(long)]
        username: Option<String>,
    },
}

fn load_predictor(config: &AppConfig) -> Result<Predictor, BoxError> {
    let store = ModelStore::load(&config.model.manifest_path, &config.model)?;
    Ok(Predictor::new(Arc::new(store)))
}

async fn serve(config: AppConfig) -> Result<(), BoxError> {
    let predictor = load_predictor(&config)?;
    let fetcher: Arc<dyn AccountFetcher> = Arc::new(InstagramFetcher::new(&config.fetcher)?);
    let state = AppState::new(predictor, fetcher, &config.fetcher);
    let app = create_router(state, &config.server);

    let listener = tokio::net::TcpListener::bind(config.server.bind_addr.as_str()).await?;
    info!(
        addr = %config.server.bind_addr,
        origins = ?config.server.cors_origins,
        "listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;
    info!("instafake stopping");
    Ok(())
}

fn engineer(inputs: &[PathBuf], out: &Path, columns_out: Option<&Path>) -> Result<(), BoxError> {
    let mut rows = Vec::new();
    for path in inputs {
        let part = dataset::load_rows(path)?;
        info!(path = %path.display(), rows = part.len(), "dataset loaded");
        rows.extend(part);
    }
    let ds = dataset::engineer_dataset(rows)?;

    std::fs::write(out, serde_json::to_vec_pretty(&ds.rows)?)?;
    if let Some(path) = columns_out {
        std::fs::write(path, serde_json::to_vec_pretty(&ds.columns)?)?;
    }
    info!(
        rows = ds.rows.len(),
        columns = ds.columns.len(),
        out = %out.display(),
        "engineered dataset written"
    );
    println!("{}", serde_json::to_string(&ds.columns)?);
    Ok(())
}

async fn predict(config: AppConfig, features: Option<String>, username: Option<String>) -> Result<(), BoxError> {
    let predictor = load_predictor(&config)?;
    let raw: RawAccountFeatures = match (&features, &username) {
        (Some(json), _) => serde_json::from_str(json)?,
        (None, Some(name)) => {
            let fetcher = InstagramFetcher::new(&config.fetcher)?;
            tokio::time::timeout(config.fetcher.lookup_timeout(), fetcher.fetch(name))
                .await
                .map_err(|_| instafake::FetchError::Timeout)??
        }
        (None, None) => return Err("either --features or --username is required".into()),
    };

    let prediction = predictor.score(&raw)?;
    let source = if username.is_some() { "username" } else { "features" };
    let record = PredictionRecord::new(source, username.as_deref(), &prediction);
    StructuredLogger::emit_json(&record, &mut std::io::stdout().lock())?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();
    let config_path = AppConfig::resolve_path(cli.config);
    let config = AppConfig::load(&config_path)?;

    let command = cli.command.unwrap_or(Command::Serve);
    // one-shot commands print their result on stdout
    if matches!(command, Command::Serve) {
        StructuredLogger::init(config.log.json, &config.log.level, std::io::stdout);
    } else {
        StructuredLogger::init(config.log.json, &config.log.level, std::io::stderr);
    }
    info!(config = %config_path.display(), "instafake starting");

    match command {
        Command::Serve => serve(config).await,
        Command::Engineer {
            inputs,
            out,
            columns_out,
        } => engineer(&inputs, &out, columns_out.as_deref()),
        Command::Predict { features, username } => predict(config, features, username).await,
    }
}
