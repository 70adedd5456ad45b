//! pub.dev registry credentials

use crate::actions::{HostOs, RunnerEnv};
use crate::error::{Error, Result};
use crate::types::RegistryCredentials;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// OAuth scopes the pub client expects in its credentials file
pub const SCOPES: [&str; 2] = ["openid", "https://www.googleapis.com/auth/userinfo.email"];

/// File name of the credentials file inside the pub cache
const CREDENTIALS_FILE: &str = "credentials.json";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CredentialsFile<'a> {
    access_token: &'a str,
    refresh_token: &'a str,
    id_token: &'a str,
    token_endpoint: &'a str,
    scopes: [&'static str; 2],
    expiration: i64,
}

/// Pub cache directory for this runner
///
/// `PUB_CACHE` wins; otherwise `%APPDATA%/Pub/Cache` on Windows and
/// `$HOME/.pub-cache` elsewhere.
pub fn pub_cache_dir(env: &RunnerEnv) -> Result<PathBuf> {
    if let Some(dir) = env.path("PUB_CACHE") {
        return Ok(dir);
    }
    match env.os() {
        HostOs::Windows => env
            .path("APPDATA")
            .map(|appdata| appdata.join("Pub").join("Cache"))
            .ok_or_else(|| Error::Config("APPDATA is not set".to_string())),
        HostOs::MacOs | HostOs::Linux => env
            .home_dir()
            .map(|home| home.join(".pub-cache"))
            .ok_or_else(|| Error::Config("HOME is not set".to_string())),
    }
}

/// Path of the credentials file
pub fn credentials_path(env: &RunnerEnv) -> Result<PathBuf> {
    Ok(pub_cache_dir(env)?.join(CREDENTIALS_FILE))
}

/// Serialize the credentials in the pub client format
pub fn credentials_json(credentials: &RegistryCredentials) -> Result<String> {
    Ok(serde_json::to_string(&CredentialsFile {
        access_token: &credentials.access_token,
        refresh_token: &credentials.refresh_token,
        id_token: &credentials.id_token,
        token_endpoint: &credentials.token_endpoint,
        scopes: SCOPES,
        expiration: credentials.expiration,
    })?)
}

/// Write the credentials file, creating the cache directory when needed
pub fn write_credentials(env: &RunnerEnv, credentials: &RegistryCredentials) -> Result<PathBuf> {
    let dir = pub_cache_dir(env)?;
    if !dir.exists() {
        fs::create_dir_all(&dir)?;
    }
    let path = dir.join(CREDENTIALS_FILE);
    fs::write(&path, credentials_json(credentials)?)?;
    debug!(path = %path.display(), "wrote registry credentials");
    Ok(path)
}
