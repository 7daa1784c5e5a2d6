//! Estuary CLI
//!
//! Command-line interface for uploading to and querying an Estuary pinning service.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use estuary_client::{ClientConfig, PinningServiceClient};
use estuary_core::constants::{
    DEFAULT_PRIMARY_ENDPOINT, DEFAULT_TIMEOUT_SECONDS, DEFAULT_UPLOAD_ENDPOINT, ENV_API_TOKEN,
    ENV_API_URL, ENV_SHUTTLE_URL, ENV_TIMEOUT_SECS,
};
use estuary_core::{Collection, ContentDigest, EstuaryError, PinningService};

/// Estuary - upload, organize, and look up pinned content
#[derive(Parser)]
#[command(name = "estuary")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ConnectionArgs {
    /// Primary API endpoint
    #[arg(long, global = true, env = ENV_API_URL, default_value = DEFAULT_PRIMARY_ENDPOINT)]
    api_url: String,

    /// Shuttle (upload) endpoint
    #[arg(long, global = true, env = ENV_SHUTTLE_URL, default_value = DEFAULT_UPLOAD_ENDPOINT)]
    shuttle_url: String,

    /// API token
    #[arg(long, global = true, env = ENV_API_TOKEN, hide_env_values = true)]
    token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = ENV_TIMEOUT_SECS, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    timeout: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a file into a collection
    AddFile {
        /// File to upload
        path: PathBuf,
        /// Collection id
        #[arg(short, long)]
        collection: String,
        /// Path of the file inside the collection (defaults to "/<file name>")
        #[arg(long)]
        collection_path: Option<String>,
    },

    /// Upload raw content (use "-" to read stdin)
    Add {
        /// File to read, or "-" for stdin
        input: String,
        /// Name for the upload (defaults to the content's SHA-256 digest)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Create a collection
    CreateCollection {
        /// Collection name
        name: String,
        /// Collection description
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Look up content by CID
    GetCid {
        /// Content identifier
        cid: String,
    },

    /// Look up a pin by name
    GetName {
        /// Pin name
        name: String,
    },

    /// Print the SHA-256 digest used to name raw uploads (no network)
    Digest {
        /// File to hash, or "-" for stdin
        input: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "estuary=debug,estuary_client=debug,info"
    } else {
        "estuary=info,estuary_client=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let conn = &cli.connection;
    match cli.command {
        Commands::AddFile {
            path,
            collection,
            collection_path,
        } => cmd_add_file(&build_client(conn)?, &path, &collection, collection_path).await,
        Commands::Add { input, name } => {
            cmd_add(&build_client(conn)?, &input, name.as_deref()).await
        }
        Commands::CreateCollection { name, description } => {
            cmd_create_collection(&build_client(conn)?, &name, &description).await
        }
        Commands::GetCid { cid } => cmd_get_cid(&build_client(conn)?, &cid).await,
        Commands::GetName { name } => cmd_get_name(&build_client(conn)?, &name).await,
        Commands::Digest { input } => cmd_digest(&input),
    }
}

fn build_client(args: &ConnectionArgs) -> Result<PinningServiceClient> {
    let token = args
        .token
        .clone()
        .with_context(|| format!("No API token: pass --token or set {}", ENV_API_TOKEN))?;

    let config = ClientConfig::new(&args.api_url, &args.shuttle_url, token).with_timeout(args.timeout);
    PinningServiceClient::with_config(config).context("Invalid client configuration")
}

fn spinner(message: impl Into<String>) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

fn read_input(input: &str) -> Result<Vec<u8>> {
    if input == "-" {
        let mut data = Vec::new();
        std::io::stdin()
            .read_to_end(&mut data)
            .context("Failed to read stdin")?;
        Ok(data)
    } else {
        std::fs::read(input).with_context(|| format!("Failed to read {}", input))
    }
}

/// Wraps an error with the stage that failed, e.g. "not found error".
fn staged(err: EstuaryError) -> anyhow::Error {
    let stage = err.stage();
    anyhow::Error::new(err).context(format!("{} error", stage))
}

/// Upload a file into a collection
async fn cmd_add_file(
    client: &PinningServiceClient,
    path: &Path,
    collection: &str,
    collection_path: Option<String>,
) -> Result<()> {
    let collection_path = match collection_path {
        Some(p) => p,
        None => {
            let file_name = path
                .file_name()
                .with_context(|| format!("{} has no file name", path.display()))?;
            format!("/{}", file_name.to_string_lossy())
        }
    };

    println!(
        "{} {} → {}:{}",
        "📤 Uploading".cyan().bold(),
        path.display(),
        collection,
        collection_path
    );

    let pb = spinner("Uploading...")?;
    let result = client
        .upload_file_to_collection(path, collection, &collection_path)
        .await;
    pb.finish_and_clear();

    let body = result.map_err(staged)?;
    println!("{}", "✅ Uploaded".green().bold());
    print_body(&body)?;
    Ok(())
}

/// Upload raw content
async fn cmd_add(client: &PinningServiceClient, input: &str, name: Option<&str>) -> Result<()> {
    let data = read_input(input)?;
    let digest = ContentDigest::of(&data);

    println!(
        "{} {} bytes ({} {})",
        "📤 Uploading".cyan().bold(),
        data.len(),
        "sha256".dimmed(),
        digest
    );

    let pb = spinner("Uploading...")?;
    let result = client.upload_content_named(&data, name).await;
    pb.finish_and_clear();

    let uploaded = result.map_err(staged)?;
    println!("\n{}", "✅ Uploaded:".green().bold());
    println!("   {} {}", "CID:".yellow(), uploaded.cid);
    if let Some(url) = &uploaded.retrieval_url {
        println!("   {} {}", "Retrieval URL:".dimmed(), url);
    }
    if let Some(id) = uploaded.estuary_id {
        println!("   {} {}", "Estuary id:".dimmed(), id);
    }
    Ok(())
}

/// Create a collection
async fn cmd_create_collection(
    client: &PinningServiceClient,
    name: &str,
    description: &str,
) -> Result<()> {
    println!("{} {}", "📁 Creating collection:".cyan().bold(), name);

    let service: &dyn PinningService = client;
    let body = service
        .create_collection(name, description)
        .await
        .map_err(staged)?;

    match Collection::from_body(&body) {
        Ok(collection) => {
            println!("\n{}", "✅ Collection created:".green().bold());
            println!("   {} {}", "Id:".yellow(), collection.uuid);
            println!("   {} {}", "Name:".dimmed(), collection.name);
        }
        Err(_) => print_body(&body)?,
    }
    Ok(())
}

/// Look up content by CID
async fn cmd_get_cid(client: &PinningServiceClient, cid: &str) -> Result<()> {
    println!("{} {}", "🔍 Looking up CID:".cyan().bold(), cid);

    let element = client.get_content_by_identifier(cid).await.map_err(staged)?;
    println!("{}", serde_json::to_string_pretty(&element)?);
    Ok(())
}

/// Look up a pin by name
async fn cmd_get_name(client: &PinningServiceClient, name: &str) -> Result<()> {
    println!("{} {}", "🔍 Looking up pin:".cyan().bold(), name);

    let pin = client.get_content_by_name(name).await.map_err(staged)?;
    println!("{}", serde_json::to_string_pretty(&pin)?);
    Ok(())
}

/// Print the digest used as a raw upload's name
fn cmd_digest(input: &str) -> Result<()> {
    let data = read_input(input)?;
    println!("{}", ContentDigest::of(&data));
    Ok(())
}

/// Pretty-prints a raw body if it is JSON, otherwise prints it as-is.
fn print_body(body: &str) -> Result<()> {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        Err(_) => println!("{}", body),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add_file() {
        let cli = Cli::try_parse_from([
            "estuary",
            "--token",
            "tok",
            "add-file",
            "notes.txt",
            "--collection",
            "coll-1",
        ])
        .unwrap();
        assert_eq!(cli.connection.token.as_deref(), Some("tok"));
        match cli.command {
            Commands::AddFile {
                path,
                collection,
                collection_path,
            } => {
                assert_eq!(path, PathBuf::from("notes.txt"));
                assert_eq!(collection, "coll-1");
                assert!(collection_path.is_none());
            }
            _ => panic!("expected add-file"),
        }
    }

    #[test]
    fn test_build_client_requires_token() {
        let args = ConnectionArgs {
            api_url: DEFAULT_PRIMARY_ENDPOINT.into(),
            shuttle_url: DEFAULT_UPLOAD_ENDPOINT.into(),
            token: None,
            timeout: DEFAULT_TIMEOUT_SECONDS,
        };
        assert!(build_client(&args).is_err());
    }

    #[test]
    fn test_staged_error_names_stage() {
        let err = staged(EstuaryError::PinNotFound("foo".into()));
        let rendered = format!("{:#}", err);
        assert!(rendered.starts_with("not found error"));
        assert!(rendered.contains("foo"));
    }
}
