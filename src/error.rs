use std::path::PathBuf;

// --- ERROR HANDLING ---

#[derive(Debug, thiserror::Error)]
pub enum BoxError {
    #[error("Could not extract folder ID from URL: {0}")]
    InvalidFolderUrl(String),

    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Malformed configuration: {0}")]
    MalformedConfig(String),

    #[error("{var} environment variable is required")]
    MissingSetting {
        var: &'static str,
        example: &'static str,
    },

    #[error("Local path not found: {}", .0.display())]
    LocalPathNotFound(PathBuf),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Private key error: {0}")]
    Key(String),

    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl BoxError {
    /// Corrective hint printed under a fatal error, if there is one.
    pub fn hint(&self) -> Option<String> {
        match self {
            BoxError::MissingSetting { var, example } => {
                Some(format!("Set it with: export {var}='{example}'"))
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, BoxError>;
