// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::common::*;
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::{api::Api, discovery::Discovery, Client};
use serving_admission::config::CheckerConfig;
use serving_admission::correspondence::{wait_for_derivation, KubeStore};
use serving_admission::crds::ServingRequest;
use serving_admission::testkit::{SAMPLE_MODEL_NAME, SAMPLE_REQUEST_NAME};
use tracing::*;

const NAMESPACE: &str = "default";

pub fn open_model() -> String {
    format!(
        "
    apiVersion: inference.serving.dev/v1alpha1
    kind: OpenModel
    metadata:
      name: {}
      namespace: {}
    spec:
      familyName: llama3
      source:
        modelHub:
          name: Huggingface
          modelID: meta-llama/Meta-Llama-3-8B
    ",
        SAMPLE_MODEL_NAME, NAMESPACE
    )
}

pub fn serving_request() -> String {
    format!(
        "
    apiVersion: inference.serving.dev/v1alpha1
    kind: ServingRequest
    metadata:
      name: {}
      namespace: {}
    spec:
      replicas: 1
      modelClaim:
        modelName: {}
      backendConfig:
        args:
        - --max-model-len=4096
    ",
        SAMPLE_REQUEST_NAME, NAMESPACE, SAMPLE_MODEL_NAME
    )
}

pub fn invalid_serving_request() -> String {
    format!(
        "
    apiVersion: inference.serving.dev/v1alpha1
    kind: ServingRequest
    metadata:
      name: speculative-sglang
      namespace: {}
    spec:
      replicas: 1
      multiModelsClaim:
        inferenceMode: SpeculativeDecoding
        modelNames:
        - {}
      backendConfig:
        name: sglang
    ",
        NAMESPACE, SAMPLE_MODEL_NAME
    )
}

async fn check_crds(client: Client) -> Result<(), Error> {
    let crd_api: Api<CustomResourceDefinition> = Api::all(client);
    for crd in [
        "servingrequests.inference.serving.dev",
        "openmodels.inference.serving.dev",
        "servingworkloads.inference.serving.dev",
    ] {
        crd_api
            .get(crd)
            .await
            .map_err(|err| Error::CRDGetFailed(crd.to_string(), err))?;
    }
    info!("CRDs found, continue to run the e2e test.");
    Ok(())
}

pub async fn admission_e2e_test() -> Result<(), Error> {
    let client = Client::try_default().await?;
    check_crds(client.clone()).await?;
    let discovery = Discovery::new(client.clone()).run().await?;

    match apply(&invalid_serving_request(), client.clone(), &discovery).await {
        Ok(name) => return Err(Error::AdmissionNotEnforced(name)),
        Err(err) => info!("invalid ServingRequest rejected: {}", err),
    }

    apply(&open_model(), client.clone(), &discovery).await?;
    let name = apply(&serving_request(), client.clone(), &discovery).await?;

    // Read back the stored object so the check sees the defaulted labels.
    let request = Api::<ServingRequest>::namespaced(client.clone(), NAMESPACE)
        .get(&name)
        .await?;
    wait_for_derivation(&KubeStore::new(client), &request, &CheckerConfig::e2e()).await?;

    info!("E2e test passed.");
    Ok(())
}
