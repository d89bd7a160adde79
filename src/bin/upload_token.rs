//! # box-upload-token
//!
//! Uploads a file, or mirrors a whole directory tree, into a Box folder using
//! a short-lived developer token. Subfolders are reused when they already
//! exist remotely and created otherwise.
//!
//! ```bash
//! export BOX_DEVELOPER_TOKEN=...
//! export BOX_FOLDER_URL=https://yourcompany.box.com/folder/123456
//! export LOCAL_DIR=./outbox
//! box-upload-token
//! ```

mod common;

use box_sync::{
    config, extract_folder_id, BoxClient, BoxError, Credentials, Endpoints, TreeUploader,
};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "box-upload-token")]
#[command(version, about = "Upload files and directories to a Box folder using a developer token")]
struct Cli {
    /// Box developer token
    #[arg(short, long, env = "BOX_DEVELOPER_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Box folder URL to upload to
    #[arg(short, long, env = "BOX_FOLDER_URL")]
    url: Option<String>,

    /// Local directory or file to upload
    #[arg(short, long, env = "LOCAL_DIR")]
    local_dir: Option<String>,

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
    let folder_url = config::require(cli.url, config::BOX_FOLDER_URL)?;
    let local_path = PathBuf::from(config::require(cli.local_dir, config::LOCAL_DIR)?);

    if !local_path.exists() {
        return Err(BoxError::LocalPathNotFound(local_path).into());
    }

    let folder_id = extract_folder_id(&folder_url)?;
    println!("Detected Box folder ID: {folder_id}");

    let client =
        BoxClient::connect(Credentials::DeveloperToken(token), Endpoints::default()).await?;

    TreeUploader::new(folder_id).run(&client, &local_path).await?;
    Ok(())
}
