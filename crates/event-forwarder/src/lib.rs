// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! HTTP ingress for the telemetry pipeline. Exposes the unauthenticated
//! log-handler endpoints, stamps default fields on each inbound record, and
//! forwards it to Log Analytics through the signed ingestion client.

pub mod forwarder;
pub mod handlers;
pub mod http_utils;

pub use forwarder::Forwarder;
