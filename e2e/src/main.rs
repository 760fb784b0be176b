// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
pub mod common;
pub mod serving_e2e;

use clap::{Parser, ValueEnum};
use common::Error;
use serving_e2e::admission_e2e_test;
use tracing::*;

#[derive(Clone, Debug, ValueEnum)]
enum Suite {
    /// Admission rejects an invalid request and a valid one is derived correctly.
    Admission,
}

#[derive(Debug, Parser)]
struct Cli {
    #[arg(value_enum)]
    suite: Suite,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match Cli::parse().suite {
        Suite::Admission => {
            info!("Running serving admission end-to-end test");
            admission_e2e_test().await
        }
    }
}
