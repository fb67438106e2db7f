// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Client configuration and persisted session state

pub mod client;
pub mod persisted;

pub use client::{ClientConfig, DEFAULT_LAUNCHER_URL};
pub use persisted::PersistedSession;
