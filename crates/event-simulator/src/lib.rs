// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Mock event generators for the telemetry pipeline.
//!
//! Produces Salesforce and MuleSoft telemetry records bound to the fixed
//! schemas the downstream dashboards expect, sends them to a running
//! forwarder, and drives timed simulations and deployment validation probes.

pub mod mulesoft;
pub mod salesforce;
pub mod sender;
pub mod simulation;
pub mod util;
pub mod validation;

pub use sender::EventSender;
pub use simulation::{SimulationConfig, SimulationReport};
