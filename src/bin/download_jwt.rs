//! # box-download-jwt
//!
//! Downloads the `.zip` and `.isx` files of a Box folder, authenticating as
//! the service account described by a JWT credential bundle.
//!
//! ```bash
//! export BOX_CONFIG_PATH=/path/to/box_config.json
//! export BOX_FOLDER_URL=https://yourcompany.box.com/folder/123456
//! export DOWNLOAD_DIR=./downloads
//! box-download-jwt
//! ```

mod common;

use box_sync::config::{self, DownloadSettings};
use box_sync::{extract_folder_id, BoxClient, Credentials, Downloader, Endpoints, JwtConfig};
use clap::Parser;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "box-download-jwt")]
#[command(version, about = "Download files from a Box folder using JWT authentication")]
struct Cli {
    /// Path to the Box JWT configuration JSON file
    #[arg(short, long, env = "BOX_CONFIG_PATH")]
    config: Option<String>,

    /// Box folder URL to download from
    #[arg(short, long, env = "BOX_FOLDER_URL")]
    url: Option<String>,

    /// Local directory to save downloaded files
    #[arg(short, long, env = "DOWNLOAD_DIR")]
    download_dir: Option<String>,

    /// Comma-separated file suffixes to download (default: .zip,.isx)
    #[arg(short, long, env = "DOWNLOAD_EXTENSIONS", value_delimiter = ',')]
    extensions: Vec<String>,

    /// Enable verbose logging (can also use RUST_LOG env var)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    box_sync::logging::init_tracing(verbose);
    common::finish(run(cli).await, verbose)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = config::require(cli.config, config::BOX_CONFIG_PATH)?;
    let settings = DownloadSettings::resolve(cli.url, cli.download_dir, cli.extensions)?;

    let downloader = Downloader::with_extensions(&settings.download_dir, &settings.extensions);
    downloader.prepare().await?;

    let folder_id = extract_folder_id(&settings.folder_url)?;
    println!("Detected folder ID: {folder_id}");

    let jwt = JwtConfig::load(&config_path)?;
    let client = BoxClient::connect(Credentials::Jwt(jwt), Endpoints::default()).await?;

    downloader.run(&client, &folder_id).await?;
    Ok(())
}
