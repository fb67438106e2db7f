// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Authorize with a running launcher, write "Hello, World!" and read it back
//!
//! The launcher URL comes from `SAFE_LAUNCHER_URL`. When `SAFE_SESSION_FILE`
//! is set the session is loaded from and saved to that file.

use anyhow::{Context, Result};
use safe_launcher_client::nfs::{CreateFileInfo, GetFileInfo, WriteFileInfo};
use safe_launcher_client::version::get_version_string;
use safe_launcher_client::{
    AppInfo, ClientConfig, GatewayClient, PersistedSession, SAFE_DRIVE_ACCESS,
};
use std::path::PathBuf;
use tracing::info;

const FILE_PATH: &str = "/myfile.txt";
const CONTENTS: &str = "Hello, World!";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();
    info!("{}", get_version_string());

    let config = ClientConfig::from_env();
    let session_file = std::env::var_os("SAFE_SESSION_FILE").map(PathBuf::from);

    let client = match &session_file {
        Some(path) => {
            let persisted = PersistedSession::load(path)?;
            GatewayClient::from_persisted(config, &persisted)?
        }
        None => GatewayClient::new(config)?,
    };

    let app = AppInfo::new(
        "Simple Read/Write",
        "simple.read.write",
        env!("CARGO_PKG_VERSION"),
        "safe-launcher-client",
    );
    info!("Please confirm the authorization request in the launcher");
    client
        .ensure_authenticated(&app, &[SAFE_DRIVE_ACCESS.to_string()])
        .await
        .context("Launcher authorization failed")?;

    if let Some(path) = &session_file {
        client.persisted().await.save(path)?;
        info!("Session saved to {}", path.display());
    }

    client
        .create_file(&CreateFileInfo {
            file_path: FILE_PATH.to_string(),
            ..Default::default()
        })
        .await
        .context("Unable to create file")?;
    client
        .write_file(&WriteFileInfo {
            file_path: FILE_PATH.to_string(),
            contents: CONTENTS.as_bytes().to_vec(),
            ..Default::default()
        })
        .await
        .context("Unable to write file")?;

    let contents = client
        .get_file(&GetFileInfo {
            file_path: FILE_PATH.to_string(),
            ..Default::default()
        })
        .await
        .context("Unable to read file")?;

    println!("{}", String::from_utf8_lossy(&contents));
    Ok(())
}
