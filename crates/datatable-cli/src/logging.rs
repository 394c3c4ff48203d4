// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Stderr logging through `tracing-subscriber`.
//!
//! `DATATABLE_LOG` wins when set (full `EnvFilter` syntax). Otherwise the
//! configured level applies to the datatable crates, raised one step per `-v`.

use std::io;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV: &str = "DATATABLE_LOG";

pub fn raise(level: Level, verbosity: u8) -> Level {
    let ladder = [
        Level::ERROR,
        Level::WARN,
        Level::INFO,
        Level::DEBUG,
        Level::TRACE,
    ];
    let start = ladder
        .iter()
        .position(|candidate| *candidate == level)
        .unwrap_or(1);
    ladder[(start + usize::from(verbosity)).min(ladder.len() - 1)]
}

fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        let level = level.as_str().to_lowercase();
        EnvFilter::new(format!(
            "warn,datatable={level},datatable_app={level},datatable_testkit={level}"
        ))
    })
}

/// Installs the global subscriber. Call once, before the first command.
pub fn init(level: Level) {
    let layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .without_time();
    // A second init (tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(build_env_filter(level))
        .with(layer)
        .try_init();
}
