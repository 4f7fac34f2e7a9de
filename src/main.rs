use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use livelaunch_admin::{
    adapters::{find_endpoint, Payload, RequestOptions, Session, Uploader, ENDPOINTS},
    application::dto::{auth_dto::LoginForm, upload_dto::UploadResource},
    domain::models::attachment::{AttachmentFile, RawFile},
    services::S3PostStorage,
    ClientConfig,
};
use serde::Serialize;
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "livelaunch-admin")]
#[command(about = "Command-line client for the LiveLaunch admin API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every known backend operation
    Operations,
    /// Invoke an operation by name and print the normalized response
    Call {
        operation: String,
        /// JSON payload; path parameters are taken from it
        #[arg(long)]
        data: Option<String>,
        /// JSON object of extra query parameters
        #[arg(long)]
        query: Option<String>,
    },
    /// Upload local files straight to storage
    Upload {
        #[arg(short, long, default_value = "brand")]
        resource: String,
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Sign in and print the issued token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Print the cache key for an operation and parameters
    QueryKey {
        operation: String,
        /// Each parameter as JSON; anything unparsable is taken as a string
        params: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Operations => {
            for endpoint in ENDPOINTS {
                println!("{:<28} {}", endpoint.name, endpoint.route);
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Call {
            operation,
            data,
            query,
        } => call(&operation, data.as_deref(), query.as_deref()).await,
        Commands::Upload { resource, paths } => {
            upload(resource.parse()?, paths).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Login { email, password } => {
            let session = Session::from_config(&ClientConfig::from_env()?)?;
            let response = session.login(&LoginForm { email, password }).await?;
            print_json(&response)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::QueryKey { operation, params } => {
            let params: Vec<Value> = params.iter().map(|raw| parse_loose(raw)).collect();
            print_json(&find_endpoint(&operation)?.query_key(&params))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

async fn call(operation: &str, data: Option<&str>, query: Option<&str>) -> Result<ExitCode> {
    let endpoint = find_endpoint(operation)?;
    let session = Session::from_config(&ClientConfig::from_env()?)?;

    let payload = match data {
        Some(raw) => Payload::Json(serde_json::from_str(raw).context("--data is not valid JSON")?),
        None => Payload::Empty,
    };
    let mut options = RequestOptions::default();
    if let Some(raw) = query {
        options.params = serde_json::from_str(raw).context("--query must be a JSON object")?;
    }

    match session.client().invoke::<Value>(endpoint, payload, &options).await {
        Ok(response) => {
            print_json(&response)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            print_json(&e.envelope())?;
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn upload(resource: UploadResource, paths: Vec<PathBuf>) -> Result<()> {
    let config = ClientConfig::from_env()?;
    let session = Session::from_config(&config)?;
    let storage = Arc::new(S3PostStorage::new(session.client().http().clone()));
    let uploader = Uploader::new(session.client().clone(), storage, &config);

    let mut files = Vec::with_capacity(paths.len());
    for path in &paths {
        let content = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        files.push(AttachmentFile::Raw(RawFile::guessed(content, file_name)));
    }

    info!("Uploading {} files as {}", files.len(), resource);
    let attachments = uploader.upload_files(files, resource).await?;
    print_json(&attachments)
}

fn parse_loose(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
