// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Shared helpers for the event generators.

use chrono::{SecondsFormat, Utc};
use rand::rngs::ThreadRng;
use rand::seq::IndexedRandom;
use rand::Rng;
use uuid::Uuid;

/// ISO-8601 UTC timestamp with a `Z` suffix, the format every generated
/// event carries.
pub fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn event_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn random_ip(rng: &mut ThreadRng) -> String {
    format!(
        "{}.{}.{}.{}",
        rng.random_range(1..=255),
        rng.random_range(1..=255),
        rng.random_range(1..=255),
        rng.random_range(1..=255)
    )
}

/// Uniform pick from a non-empty constant slice.
pub fn pick<'a, T>(rng: &mut ThreadRng, items: &'a [T]) -> &'a T {
    #[allow(clippy::expect_used)]
    items.choose(rng).expect("generator tables are non-empty")
}

/// Weighted pick over `(value, weight)` pairs.
pub fn weighted<'a, T>(rng: &mut ThreadRng, items: &'a [(T, u32)]) -> &'a T {
    #[allow(clippy::expect_used)]
    let (value, _) = items
        .choose_weighted(rng, |(_, weight)| *weight)
        .expect("generator weights are static and non-zero");
    value
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
