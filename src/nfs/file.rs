// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! File operations

use super::entry_path;
use crate::client::{ClientError, GatewayClient, LogicalRequest};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateFileInfo {
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "isPathShared")]
    pub shared: bool,
    pub metadata: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MoveFileInfo {
    #[serde(rename = "srcPath")]
    pub src_path: String,
    #[serde(rename = "isSrcPathShared")]
    pub src_shared: bool,
    #[serde(rename = "destPath")]
    pub dest_path: String,
    #[serde(rename = "isDestPathShared")]
    pub dest_shared: bool,
    #[serde(rename = "retainSource")]
    pub retain_source: bool,
}

/// Rename and/or change metadata; empty fields are left untouched
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChangeFileInfo {
    #[serde(skip)]
    pub file_path: String,
    #[serde(skip)]
    pub shared: bool,
    #[serde(rename = "name", skip_serializing_if = "String::is_empty")]
    pub new_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub metadata: String,
}

#[derive(Debug, Clone, Default)]
pub struct WriteFileInfo {
    pub file_path: String,
    pub shared: bool,
    pub contents: Vec<u8>,
    pub offset: u64,
}

#[derive(Debug, Clone, Default)]
pub struct GetFileInfo {
    pub file_path: String,
    pub shared: bool,
    pub offset: u64,
    /// 0 reads to the end
    pub length: u64,
}

impl GatewayClient {
    pub async fn create_file(&self, info: &CreateFileInfo) -> Result<(), ClientError> {
        self.execute(LogicalRequest::post("/nfs/file").json(info)?)
            .await?;
        Ok(())
    }

    pub async fn move_file(&self, info: &MoveFileInfo) -> Result<(), ClientError> {
        self.execute(LogicalRequest::post("/nfs/movefile").json(info)?)
            .await?;
        Ok(())
    }

    pub async fn delete_file(&self, file_path: &str, shared: bool) -> Result<(), ClientError> {
        self.execute(LogicalRequest::delete(entry_path("/nfs/file", file_path, shared)))
            .await?;
        Ok(())
    }

    pub async fn change_file(&self, info: &ChangeFileInfo) -> Result<(), ClientError> {
        if info.new_name.is_empty() && info.metadata.is_empty() {
            return Err(ClientError::InvalidRequest(
                "Must provide name or metadata".to_string(),
            ));
        }
        let path = entry_path("/nfs/file/metadata", &info.file_path, info.shared);
        self.execute(LogicalRequest::put(path).json(info)?).await?;
        Ok(())
    }

    /// Write `contents` at `offset`; the body is the base64 of the contents
    pub async fn write_file(&self, info: &WriteFileInfo) -> Result<(), ClientError> {
        debug!(
            "Writing {} bytes to {} at offset {}",
            info.contents.len(),
            info.file_path,
            info.offset
        );
        let request = LogicalRequest::put(entry_path("/nfs/file", &info.file_path, info.shared))
            .raw(STANDARD.encode(&info.contents).into_bytes())
            .query("offset", info.offset.to_string());
        self.execute(request).await?;
        Ok(())
    }

    /// Read file contents, optionally a byte range
    pub async fn get_file(&self, info: &GetFileInfo) -> Result<Vec<u8>, ClientError> {
        let mut request =
            LogicalRequest::get(entry_path("/nfs/file", &info.file_path, info.shared))
                .query("offset", info.offset.to_string());
        if info.length > 0 {
            request = request.query("length", info.length.to_string());
        }

        let response = self.execute(request).await?;
        STANDARD.decode(&response.body).map_err(|e| {
            ClientError::InvalidRequest(format!("Unable to decode file output: {}", e))
        })
    }
}
