//! Resolution of the settings each tool needs before it touches the network.

use crate::error::{BoxError, Result};

/// A setting that can come from a flag or from the named environment variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Setting {
    pub var: &'static str,
    pub example: &'static str,
}

pub const BOX_CONFIG_PATH: Setting = Setting {
    var: "BOX_CONFIG_PATH",
    example: "/path/to/box_config.json",
};

pub const BOX_DEVELOPER_TOKEN: Setting = Setting {
    var: "BOX_DEVELOPER_TOKEN",
    example: "your_token_here",
};

pub const BOX_FOLDER_URL: Setting = Setting {
    var: "BOX_FOLDER_URL",
    example: "https://yourcompany.box.com/folder/123456",
};

pub const DOWNLOAD_DIR: Setting = Setting {
    var: "DOWNLOAD_DIR",
    example: "/path/to/download/directory",
};

pub const LOCAL_DIR: Setting = Setting {
    var: "LOCAL_DIR",
    example: "/path/to/local/directory",
};

/// Returns the value, or `MissingSetting` when it is absent or blank.
pub fn require(value: Option<String>, setting: Setting) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(BoxError::MissingSetting {
            var: setting.var,
            example: setting.example,
        }),
    }
}

/// Fully resolved settings for the download tools.
#[derive(Debug, Clone)]
pub struct DownloadSettings {
    pub folder_url: String,
    pub download_dir: String,
    pub extensions: Vec<String>,
}

impl DownloadSettings {
    /// Checks the settings in the order the tools report them.
    pub fn resolve(
        folder_url: Option<String>,
        download_dir: Option<String>,
        extensions: Vec<String>,
    ) -> Result<Self> {
        Ok(Self {
            folder_url: require(folder_url, BOX_FOLDER_URL)?,
            download_dir: require(download_dir, DOWNLOAD_DIR)?,
            extensions,
        })
    }
}
