// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

/// Errors that can occur while building or sending an ingestion request
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Missing workspace configuration")]
    MissingCredentials,

    #[error("Invalid shared key: {0}")]
    InvalidSharedKey(#[from] base64::DecodeError),

    #[error("Failed to serialize event: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid request header: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Error posting to Log Analytics: {0}")]
    Transport(#[from] reqwest::Error),
}
