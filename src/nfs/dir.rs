// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Directory operations

use super::{entry_path, DirResponse};
use crate::client::{ClientError, GatewayClient, LogicalRequest};
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateDirInfo {
    #[serde(rename = "dirPath")]
    pub dir_path: String,
    #[serde(rename = "isPrivate")]
    pub private: bool,
    #[serde(rename = "isVersioned")]
    pub versioned: bool,
    pub metadata: String,
    #[serde(rename = "isPathShared")]
    pub shared: bool,
}

/// One of `new_name` or `metadata` must be set
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChangeDirInfo {
    #[serde(skip)]
    pub dir_path: String,
    #[serde(skip)]
    pub shared: bool,
    #[serde(rename = "name", skip_serializing_if = "String::is_empty")]
    pub new_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub metadata: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MoveDirInfo {
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

impl GatewayClient {
    pub async fn create_dir(&self, info: &CreateDirInfo) -> Result<(), ClientError> {
        self.execute(LogicalRequest::post("/nfs/directory").json(info)?)
            .await?;
        Ok(())
    }

    pub async fn get_dir(&self, dir_path: &str, shared: bool) -> Result<DirResponse, ClientError> {
        let request = LogicalRequest::get(entry_path("/nfs/directory", dir_path, shared));
        Ok(self.execute_json(request).await?.unwrap_or_default())
    }

    pub async fn delete_dir(&self, dir_path: &str, shared: bool) -> Result<(), ClientError> {
        self.execute(LogicalRequest::delete(entry_path("/nfs/directory", dir_path, shared)))
            .await?;
        Ok(())
    }

    pub async fn change_dir(&self, info: &ChangeDirInfo) -> Result<(), ClientError> {
        if info.new_name.is_empty() && info.metadata.is_empty() {
            return Err(ClientError::InvalidRequest(
                "Must provide name or metadata".to_string(),
            ));
        }
        let path = entry_path("/nfs/directory", &info.dir_path, info.shared);
        self.execute(LogicalRequest::put(path).json(info)?).await?;
        Ok(())
    }

    pub async fn move_dir(&self, info: &MoveDirInfo) -> Result<(), ClientError> {
        self.execute(LogicalRequest::post("/nfs/movedir").json(info)?)
            .await?;
        Ok(())
    }
}
