// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use anyhow::{Context, Result};
use clap::Parser;
use kube::{api::Api, Client, CustomResourceExt};
use serving_admission::admission::webhook::routes;
use serving_admission::config::{CheckArgs, Cli, Command, WebhookArgs};
use serving_admission::correspondence::{wait_for_derivation, KubeStore};
use serving_admission::crds::{OpenModel, ServingRequest, ServingWorkload};
use tracing::*;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match Cli::parse().command {
        Command::Export => {
            info!("exporting custom resource definitions");
            println!("{}", serde_yaml::to_string(&ServingRequest::crd())?);
            println!("---");
            println!("{}", serde_yaml::to_string(&OpenModel::crd())?);
            println!("---");
            println!("{}", serde_yaml::to_string(&ServingWorkload::crd())?);
            Ok(())
        }
        Command::Run(args) => run_webhook(args).await,
        Command::Check(args) => check(args).await,
    }
}

async fn run_webhook(args: WebhookArgs) -> Result<()> {
    info!("serving admission webhooks on port {}", args.port);
    warp::serve(routes())
        .tls()
        .cert_path(&args.cert_path)
        .key_path(&args.key_path)
        .run(([0, 0, 0, 0], args.port))
        .await;
    info!("admission webhook terminated");
    Ok(())
}

async fn check(args: CheckArgs) -> Result<()> {
    let client = Client::try_default().await?;
    let request = Api::<ServingRequest>::namespaced(client.clone(), &args.namespace)
        .get(&args.name)
        .await
        .with_context(|| format!("failed to get ServingRequest {}/{}", args.namespace, args.name))?;

    wait_for_derivation(&KubeStore::new(client), &request, &args.checker_config()).await?;
    info!("ServingRequest {}/{} is correctly derived", args.namespace, args.name);
    Ok(())
}
