// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::config::*;
use clap::Parser;
use std::time::Duration;

#[test]
pub fn test_default_checker_config() {
    let config = CheckerConfig::default();
    assert_eq!(config, CheckerConfig::integration());
    assert!(config.interval < config.timeout);
    assert!(CheckerConfig::e2e().timeout > config.timeout);
}

#[test]
pub fn test_parse_run() {
    let cli = Cli::try_parse_from(["serving_admission_controller", "run", "--port", "9443"]).unwrap();
    match cli.command {
        Command::Run(args) => {
            assert_eq!(args.port, 9443);
            assert_eq!(args.cert_path.to_str(), Some("/certs/tls.crt"));
            assert_eq!(args.key_path.to_str(), Some("/certs/tls.key"));
        }
        other => panic!("unexpected command {:?}", other),
    }
}

#[test]
pub fn test_parse_check() {
    let cli = Cli::try_parse_from([
        "serving_admission_controller",
        "check",
        "--name",
        "playground-llama3-8b",
        "--timeout-secs",
        "10",
    ])
    .unwrap();
    match cli.command {
        Command::Check(args) => {
            assert_eq!(args.name, "playground-llama3-8b");
            assert_eq!(args.namespace, "default");
            assert_eq!(
                args.checker_config(),
                CheckerConfig {
                    timeout: Duration::from_secs(10),
                    interval: Duration::from_millis(1000),
                }
            );
        }
        other => panic!("unexpected command {:?}", other),
    }
}

#[test]
pub fn test_unknown_command_is_rejected() {
    assert!(Cli::try_parse_from(["serving_admission_controller", "serve"]).is_err());
}
