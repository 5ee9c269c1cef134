// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use std::{env, process, sync::Arc, time::Duration};

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use event_forwarder::Forwarder;
use event_simulator::{
    simulation::{self, SimulationConfig},
    validation, EventSender,
};
use log_ingestion::Config;

#[derive(Parser)]
#[command(
    name = "telemetry-pipeline",
    about = "Run, exercise and validate the SaaS telemetry ingestion pipeline"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the event forwarder
    Serve,
    /// Generate a timed stream of mock Salesforce and MuleSoft events
    Simulate {
        /// Base URL of a running forwarder
        #[arg(long)]
        base_url: String,
        /// Simulation length in minutes
        #[arg(long, default_value_t = 3)]
        duration_minutes: u64,
        #[arg(long, default_value_t = 8)]
        events_per_minute: u32,
    },
    /// Probe a deployed forwarder and check that events flow through
    Validate {
        /// Base URL of a running forwarder
        #[arg(long)]
        base_url: String,
    },
}

#[tokio::main]
pub async fn main() {
    let log_level = env::var("LOG_LEVEL")
        .map(|val| val.to_lowercase())
        .unwrap_or("info".to_string());

    let env_filter = format!("h2=off,hyper=off,rustls=off,{}", log_level);

    #[allow(clippy::expect_used)]
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_new(env_filter).expect("could not parse log level in configuration"),
        )
        .with_level(true)
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true)
        .without_time()
        .finish();

    #[allow(clippy::expect_used)]
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let cli = Cli::parse();
    match cli.command {
        Command::Serve => serve().await,
        Command::Simulate {
            base_url,
            duration_minutes,
            events_per_minute,
        } => {
            let config = SimulationConfig {
                base_url,
                duration: Duration::from_secs(duration_minutes * 60),
                events_per_minute,
            };
            simulation::run(&config).await;
        }
        Command::Validate { base_url } => {
            if !validate(&base_url).await {
                process::exit(1);
            }
        }
    }
}

async fn serve() {
    let config = Arc::new(Config::from_env());
    let forwarder = Forwarder::new(Arc::clone(&config));
    info!(
        "Starting event forwarder on port {}",
        config.forwarder_port
    );
    if let Err(e) = forwarder.start().await {
        error!("Error when starting event forwarder: {e:?}");
        process::exit(1);
    }
}

async fn validate(base_url: &str) -> bool {
    info!("Validating telemetry pipeline deployment at {base_url}");
    let sender = EventSender::new(base_url);

    let probes = validation::probe_endpoints(&sender).await;
    let passed = probes.iter().filter(|probe| probe.passed()).count();
    info!("Endpoint probes passed: {}/{}", passed, probes.len());

    let (delivered, total) = validation::data_flow_check(&sender).await;
    let data_flow_ok =
        delivered as f64 / total as f64 * 100.0 >= validation::DATA_FLOW_PASS_THRESHOLD;

    let all_ok = passed == probes.len() && data_flow_ok;
    if all_ok {
        info!("All endpoints are working correctly");
    } else {
        error!("Some endpoints failed, check the forwarder logs");
    }
    all_ok
}
