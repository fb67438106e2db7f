// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! NFS operations on the launcher's file store
//!
//! Thin callers of [`GatewayClient::execute`](crate::client::GatewayClient::execute);
//! all encryption happens in the transport layer. Paths embedded in URLs are
//! escaped as one segment, so `/docs/my file.txt` travels as
//! `%2Fdocs%2Fmy%20file.txt`.

pub mod dir;
pub mod file;

pub use dir::{ChangeDirInfo, CreateDirInfo, MoveDirInfo};
pub use file::{ChangeFileInfo, CreateFileInfo, GetFileInfo, MoveFileInfo, WriteFileInfo};

use crate::client::request::escape_segment;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Milliseconds since the Unix epoch, as the launcher reports times
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SafeTime(pub i64);

impl SafeTime {
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.0).single()
    }
}

/// Directory listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirResponse {
    pub info: DirInfo,
    #[serde(default)]
    pub files: Vec<FileInfo>,
    #[serde(rename = "subDirectories", default)]
    pub sub_dirs: Vec<DirInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirInfo {
    pub name: String,
    #[serde(rename = "isPrivate", default)]
    pub private: bool,
    #[serde(rename = "isVersioned", default)]
    pub versioned: bool,
    #[serde(rename = "createdOn", default)]
    pub created_on: SafeTime,
    #[serde(rename = "modifiedOn", default)]
    pub modified_on: SafeTime,
    #[serde(default)]
    pub metadata: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub name: String,
    #[serde(default)]
    pub size: i64,
    #[serde(rename = "createdOn", default)]
    pub created_on: SafeTime,
    #[serde(rename = "modifiedOn", default)]
    pub modified_on: SafeTime,
    #[serde(default)]
    pub metadata: String,
}

/// `{prefix}/{escaped path}/{shared}`
pub(crate) fn entry_path(prefix: &str, path: &str, shared: bool) -> String {
    format!("{}/{}/{}", prefix, escape_segment(path), shared)
}
