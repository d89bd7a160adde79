//! # box-download-token
//!
//! Downloads the `.zip` and `.isx` files of a Box folder using a short-lived
//! developer token.
//!
//! ```bash
//! export BOX_DEVELOPER_TOKEN=...
//! export BOX_FOLDER_URL=https://yourcompany.box.com/folder/123456
//! export DOWNLOAD_DIR=./downloads
//! box-download-token
//! ```

mod common;

use box_sync::config::{self, DownloadSettings};
use box_sync::{extract_folder_id, BoxClient, Credentials, Downloader, Endpoints};
use clap::Parser;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "box-download-token")]
#[command(version, about = "Download files from a Box folder using a developer token")]
struct Cli {
    /// Box developer token
    #[arg(short, long, env = "BOX_DEVELOPER_TOKEN", hide_env_values = true)]
    token: Option<String>,

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
    let token = config::require(cli.token, config::BOX_DEVELOPER_TOKEN)?;
    let settings = DownloadSettings::resolve(cli.url, cli.download_dir, cli.extensions)?;

    let downloader = Downloader::with_extensions(&settings.download_dir, &settings.extensions);
    downloader.prepare().await?;

    let folder_id = extract_folder_id(&settings.folder_url)?;
    println!("Detected folder ID: {folder_id}");

    let client =
        BoxClient::connect(Credentials::DeveloperToken(token), Endpoints::default()).await?;

    downloader.run(&client, &folder_id).await?;
    Ok(())
}
