// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! # Tracing configuration setup.
//!
//! Resolution diagnostics are emitted through Rust's `tracing` framework. Without a subscriber
//! they go nowhere, so embedding servers that already configure `tracing` need nothing more.
//!
//! Calling the `init` function will initialize a global tracing subscriber based on the value of
//! the `EXO_LOG` environment variable, which follows the same conventions as `RUST_LOG`. This
//! provides console logging, and defaults to the `WARN` level. Local mode diagnostics are logged
//! at `INFO`, so use `EXO_LOG=info` (or `EXO_LOG=client_ip=info`) to see them.

use thiserror::Error;
use tracing_subscriber::{EnvFilter, filter::LevelFilter, prelude::*};

use crate::env_const::EXO_LOG;

/// Initialize the global tracing subscriber with a compact console layer.
pub fn init() -> Result<(), LoggingError> {
    let fmt_layer = tracing_subscriber::fmt::layer().compact();
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .with_env_var(EXO_LOG)
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Could not install the tracing subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}
