//! # box-upload-jwt
//!
//! Uploads a `.zip` file, or every `.zip` directly inside a directory, to a
//! Box folder using JWT authentication.
//!
//! ## Usage
//!
//! ```bash
//! # Upload with overwrite mode (default)
//! box-upload-jwt -c config.json -u https://box.com/folder/123 -d /path/to/files
//!
//! # Upload only new files
//! box-upload-jwt -c config.json -u https://box.com/folder/123 -d file.zip --mode upload
//!
//! # Update existing files with new versions
//! box-upload-jwt -c config.json -u https://box.com/folder/123 -d /path/to/files --mode update
//! ```

mod common;

use box_sync::{
    extract_folder_id, BoxClient, BoxError, Credentials, Endpoints, JwtConfig, UploadMode,
    ZipUploader,
};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "box-upload-jwt")]
#[command(version, about = "Upload ZIP files to Box using JWT authentication")]
#[command(
    long_about = "Upload ZIP files to a Box folder using JWT authentication.\n\n\
Upload modes:\n\
  upload     only upload new files, skip existing ones\n\
  overwrite  delete the existing file, then upload\n\
  update     upload as a new version of the existing file"
)]
struct Cli {
    /// Path to Box JWT configuration JSON file
    #[arg(short, long)]
    config: PathBuf,

    /// Box folder URL to upload to
    #[arg(short, long)]
    url: String,

    /// Local ZIP file or directory containing ZIP files
    #[arg(short = 'd', long)]
    local_path: PathBuf,

    /// How to handle files that already exist in the folder
    #[arg(long, value_enum, default_value_t = UploadMode::Overwrite)]
    mode: UploadMode,

    /// Enable verbose logging and print the full error chain on failure
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
    if !cli.config.is_file() {
        return Err(BoxError::ConfigNotFound(cli.config).into());
    }
    if !cli.local_path.exists() {
        return Err(BoxError::LocalPathNotFound(cli.local_path).into());
    }

    let folder_id = extract_folder_id(&cli.url)?;
    let jwt = JwtConfig::load(&cli.config)?;
    let client = BoxClient::connect(Credentials::Jwt(jwt), Endpoints::default()).await?;

    ZipUploader::new(folder_id, cli.mode).run(&client, &cli.local_path).await?;
    Ok(())
}
