// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Bounds of the eventual-consistency wait on derived objects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckerConfig {
    pub timeout: Duration,
    pub interval: Duration,
}

impl CheckerConfig {
    /// For controllers running against a local API server.
    pub fn integration() -> CheckerConfig {
        CheckerConfig {
            timeout: Duration::from_secs(30),
            interval: Duration::from_millis(250),
        }
    }

    /// For real clusters, where images are pulled and pods scheduled.
    pub fn e2e() -> CheckerConfig {
        CheckerConfig {
            timeout: Duration::from_secs(300),
            interval: Duration::from_secs(1),
        }
    }
}

impl Default for CheckerConfig {
    fn default() -> Self {
        CheckerConfig::integration()
    }
}

#[derive(Debug, Parser)]
#[command(name = "serving_admission_controller", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the custom resource definitions as YAML.
    Export,
    /// Serve the mutating and validating admission webhooks over HTTPS.
    Run(WebhookArgs),
    /// Wait until the workload derived from a serving request corresponds to it.
    Check(CheckArgs),
}

#[derive(Debug, Args)]
pub struct WebhookArgs {
    #[arg(long, default_value = "/certs/tls.crt")]
    pub cert_path: PathBuf,
    #[arg(long, default_value = "/certs/tls.key")]
    pub key_path: PathBuf,
    #[arg(long, default_value_t = 8443)]
    pub port: u16,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "default")]
    pub namespace: String,
    #[arg(long, default_value_t = 300)]
    pub timeout_secs: u64,
    #[arg(long, default_value_t = 1000)]
    pub interval_millis: u64,
}

impl CheckArgs {
    pub fn checker_config(&self) -> CheckerConfig {
        CheckerConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            interval: Duration::from_millis(self.interval_millis),
        }
    }
}
