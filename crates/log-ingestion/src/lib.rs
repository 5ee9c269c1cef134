// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Core contract of the telemetry pipeline: classify an inbound event record
//! into a destination log stream, then build and send the signed ingestion
//! request that delivers it to an Azure Log Analytics workspace.

pub mod classify;
pub mod config;
pub mod error;
pub mod log_analytics;

pub use classify::{classify, LogType};
pub use config::Config;
pub use error::IngestError;
pub use log_analytics::{LogAnalyticsClient, SignedRequest};
