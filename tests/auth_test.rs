use box_sync::auth::build_assertion;
use box_sync::{BoxError, JwtConfig};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tempfile::TempDir;

const AUDIENCE: &str = "https://api.box.com/oauth2/token";

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn fixture_config() -> JwtConfig {
    JwtConfig::load(fixture("box_config.json")).expect("fixture config should parse")
}

#[derive(Debug, Deserialize)]
struct Claims {
    iss: String,
    sub: String,
    box_sub_type: String,
    aud: String,
    jti: String,
    exp: u64,
}

#[test]
fn assertion_is_signed_with_the_decrypted_key() {
    let config = fixture_config();
    let token = build_assertion(&config, AUDIENCE).unwrap();

    let header = decode_header(&token).unwrap();
    assert_eq!(header.alg, Algorithm::RS256);
    assert_eq!(header.kid.as_deref(), Some("fixture-key-id"));

    let public_pem = std::fs::read(fixture("box_public_key.pem")).unwrap();
    let key = DecodingKey::from_rsa_pem(&public_pem).unwrap();
    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&[AUDIENCE]);

    let claims = decode::<Claims>(&token, &key, &validation).unwrap().claims;
    assert_eq!(claims.iss, "fixture-client-id");
    assert_eq!(claims.sub, "123456");
    assert_eq!(claims.box_sub_type, "enterprise");
    assert_eq!(claims.aud, AUDIENCE);
    assert!(!claims.jti.is_empty());

    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs();
    assert!(claims.exp > now && claims.exp <= now + 31);
}

#[test]
fn each_assertion_gets_a_fresh_jti() {
    let config = fixture_config();
    let first = build_assertion(&config, AUDIENCE).unwrap();
    let second = build_assertion(&config, AUDIENCE).unwrap();
    assert_ne!(first, second);
}

#[test]
fn wrong_passphrase_is_a_key_error() {
    let mut config = fixture_config();
    config.app_settings.app_auth.passphrase = "not-the-passphrase".to_string();

    let err = build_assertion(&config, AUDIENCE).unwrap_err();
    assert!(matches!(err, BoxError::Key(_)), "got {err:?}");
}

#[test]
fn missing_enterprise_id_is_an_auth_error() {
    let mut config = fixture_config();
    config.enterprise_id = None;

    let err = build_assertion(&config, AUDIENCE).unwrap_err();
    assert!(matches!(err, BoxError::Auth(_)));
}

#[test]
fn missing_config_file_is_reported_by_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.json");

    match JwtConfig::load(&path) {
        Err(BoxError::ConfigNotFound(reported)) => assert_eq!(reported, path),
        other => panic!("Expected ConfigNotFound, got {other:?}"),
    }
}

#[test]
fn config_without_app_auth_is_malformed() {
    let raw = r#"{ "boxAppSettings": { "clientID": "a", "clientSecret": "b" } }"#;
    let err = JwtConfig::from_json(raw).unwrap_err();
    assert!(matches!(err, BoxError::MalformedConfig(_)));
}

#[test]
fn debug_output_hides_secrets() {
    let rendered = format!("{:?}", fixture_config());
    assert!(rendered.contains("fixture-client-id"));
    assert!(!rendered.contains("fixture-client-secret"));
    assert!(!rendered.contains("fixture-pass"));
}
