use std::collections::HashMap;

use spotyswipe::config::{
    Config, ConfigError, DEFAULT_API_URL, DEFAULT_SCOPE, DEFAULT_SERVER_ADDRESS,
};

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

const REQUIRED: [(&str, &str); 3] = [
    ("SPOTIFY_API_AUTH_CLIENT_ID", "client-id"),
    ("SPOTIFY_API_AUTH_CLIENT_SECRET", "client-secret"),
    ("SESSION_SECRET", "0123456789abcdef"),
];

#[test]
fn test_defaults() {
    let config = Config::from_lookup(lookup(&REQUIRED)).unwrap();

    assert_eq!(config.server_addr, DEFAULT_SERVER_ADDRESS);
    assert_eq!(config.public_url, None);
    assert_eq!(config.spotify.client_id, "client-id");
    assert_eq!(config.spotify.client_secret, "client-secret");
    assert_eq!(config.spotify.scope, DEFAULT_SCOPE);
    assert_eq!(config.spotify.api_url, DEFAULT_API_URL);
}

#[test]
fn test_overrides() {
    let mut vars = REQUIRED.to_vec();
    vars.push(("SERVER_ADDRESS", "0.0.0.0:8080"));
    vars.push(("PUBLIC_URL", "https://swipe.example/"));
    vars.push(("SPOTIFY_API_URL", "http://localhost:9000/v1/"));

    let config = Config::from_lookup(lookup(&vars)).unwrap();

    assert_eq!(config.server_addr, "0.0.0.0:8080");
    assert_eq!(config.public_url.as_deref(), Some("https://swipe.example"));
    assert_eq!(config.spotify.api_url, "http://localhost:9000/v1");
}

#[test]
fn test_missing_credentials() {
    let vars = [("SESSION_SECRET", "0123456789abcdef")];

    let err = Config::from_lookup(lookup(&vars)).unwrap_err();

    assert_eq!(err, ConfigError::Missing("SPOTIFY_API_AUTH_CLIENT_ID"));
    assert_eq!(err.to_string(), "SPOTIFY_API_AUTH_CLIENT_ID must be set");
}

#[test]
fn test_empty_value_counts_as_missing() {
    let mut vars = REQUIRED.to_vec();
    vars[1] = ("SPOTIFY_API_AUTH_CLIENT_SECRET", "  ");

    let err = Config::from_lookup(lookup(&vars)).unwrap_err();

    assert_eq!(err, ConfigError::Missing("SPOTIFY_API_AUTH_CLIENT_SECRET"));
}

#[test]
fn test_session_secret_is_required_and_long_enough() {
    let err = Config::from_lookup(lookup(&REQUIRED[..2])).unwrap_err();
    assert_eq!(err, ConfigError::Missing("SESSION_SECRET"));

    let mut vars = REQUIRED.to_vec();
    vars[2] = ("SESSION_SECRET", "short");
    let err = Config::from_lookup(lookup(&vars)).unwrap_err();
    assert_eq!(err, ConfigError::WeakSessionSecret);
}
