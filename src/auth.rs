//! Credentials accepted by the tools and the JWT grant used to turn a
//! credential bundle into an access token.

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::debug;

use crate::error::{BoxError, Result};

const JWT_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME: Duration = Duration::from_secs(30);

// --- CREDENTIAL BUNDLE ---

/// The JSON file downloaded from the developer console for a JWT app.
#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    #[serde(rename = "boxAppSettings")]
    pub app_settings: AppSettings,
    #[serde(rename = "enterpriseID", default)]
    pub enterprise_id: Option<String>,
}

#[derive(Deserialize, Clone)]
pub struct AppSettings {
    #[serde(rename = "clientID")]
    pub client_id: String,
    #[serde(rename = "clientSecret")]
    pub client_secret: String,
    #[serde(rename = "appAuth")]
    pub app_auth: AppAuth,
}

#[derive(Deserialize, Clone)]
pub struct AppAuth {
    #[serde(rename = "publicKeyID")]
    pub public_key_id: String,
    #[serde(rename = "privateKey")]
    pub private_key: String,
    pub passphrase: String,
}

impl JwtConfig {
    /// Reads and parses a credential bundle.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(BoxError::ConfigNotFound(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| BoxError::MalformedConfig(e.to_string()))
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("client_id", &self.app_settings.client_id)
            .field("public_key_id", &self.app_settings.app_auth.public_key_id)
            .field("enterprise_id", &self.enterprise_id)
            .finish_non_exhaustive()
    }
}

/// How a client authenticates. Fixed for the lifetime of the process.
#[derive(Clone)]
pub enum Credentials {
    DeveloperToken(String),
    Jwt(JwtConfig),
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::DeveloperToken(_) => f.write_str("DeveloperToken(<redacted>)"),
            Credentials::Jwt(cfg) => f.debug_tuple("Jwt").field(cfg).finish(),
        }
    }
}

// --- JWT GRANT ---

#[derive(Serialize)]
struct GrantClaims<'a> {
    iss: &'a str,
    sub: &'a str,
    box_sub_type: &'static str,
    aud: &'a str,
    jti: String,
    exp: u64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize, Default)]
struct TokenErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// Loads the RSA signing key, decrypting it with the passphrase when the PEM
/// is an encrypted PKCS#8 document.
fn signing_key(auth: &AppAuth) -> Result<EncodingKey> {
    if !auth.private_key.contains("BEGIN ENCRYPTED PRIVATE KEY") {
        return Ok(EncodingKey::from_rsa_pem(auth.private_key.as_bytes())?);
    }

    let (_, document) =
        pkcs8::Document::from_pem(&auth.private_key).map_err(|e| BoxError::Key(e.to_string()))?;
    let encrypted = pkcs8::EncryptedPrivateKeyInfo::try_from(document.as_bytes())
        .map_err(|e| BoxError::Key(e.to_string()))?;
    let decrypted = encrypted
        .decrypt(auth.passphrase.as_bytes())
        .map_err(|e| BoxError::Key(format!("could not decrypt private key: {e}")))?;
    let info = pkcs8::PrivateKeyInfo::try_from(decrypted.as_bytes())
        .map_err(|e| BoxError::Key(e.to_string()))?;

    // PKCS#8 wraps the PKCS#1 RSAPrivateKey, which is what the signer expects.
    Ok(EncodingKey::from_rsa_der(info.private_key))
}

/// Builds the signed assertion for an enterprise service account.
pub fn build_assertion(config: &JwtConfig, audience: &str) -> Result<String> {
    let enterprise_id = config
        .enterprise_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| BoxError::Auth("credential bundle has no enterpriseID".to_string()))?;

    let exp = (SystemTime::now() + ASSERTION_LIFETIME)
        .duration_since(UNIX_EPOCH)
        .map_err(|e| BoxError::Auth(e.to_string()))?
        .as_secs();

    let claims = GrantClaims {
        iss: &config.app_settings.client_id,
        sub: enterprise_id,
        box_sub_type: "enterprise",
        aud: audience,
        jti: uuid::Uuid::new_v4().to_string(),
        exp,
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(config.app_settings.app_auth.public_key_id.clone());

    let key = signing_key(&config.app_settings.app_auth)?;
    Ok(jsonwebtoken::encode(&header, &claims, &key)?)
}

/// Exchanges a signed assertion for an access token at `token_url`.
pub async fn request_access_token(
    http: &Client,
    token_url: &str,
    config: &JwtConfig,
) -> Result<String> {
    let assertion = build_assertion(config, token_url)?;
    let params = [
        ("grant_type", JWT_GRANT_TYPE),
        ("assertion", assertion.as_str()),
        ("client_id", config.app_settings.client_id.as_str()),
        ("client_secret", config.app_settings.client_secret.as_str()),
    ];

    debug!(token_url, "requesting access token with JWT grant");
    let response = http.post(token_url).form(&params).send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let err: TokenErrorResponse = serde_json::from_str(&body).unwrap_or_default();
        let reason = err
            .error_description
            .or(err.error)
            .unwrap_or_else(|| format!("token endpoint returned {status}"));
        return Err(BoxError::Auth(reason));
    }

    let token: TokenResponse = serde_json::from_str(&body)?;
    Ok(token.access_token)
}
