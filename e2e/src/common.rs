// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use kube::{
    api::{Api, DynamicObject, Patch, PatchParams, ResourceExt},
    core::GroupVersionKind,
    discovery::{ApiCapabilities, ApiResource, Discovery, Scope},
    Client,
};
use serving_admission::correspondence::CorrespondenceError;
use thiserror::Error;
use tracing::*;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to get kube client: {0}")]
    ClientGetFailed(#[from] kube::Error),

    #[error("Failed to apply yaml: {0}")]
    ApplyFailed(String),

    #[error("Failed to parse the yaml file!")]
    ParseYamlFailed(#[from] serde_yaml::Error),

    #[error("Failed to parse the json format!")]
    ParseJsonFailed(#[from] serde_json::Error),

    #[error("Failed to get CRD {0}: {1}")]
    CRDGetFailed(String, #[source] kube::Error),

    #[error("Admission webhook accepted an invalid ServingRequest {0}")]
    AdmissionNotEnforced(String),

    #[error("Derived workload does not correspond to its ServingRequest: {0}")]
    DerivationFailed(#[from] CorrespondenceError),
}

/// Server-side applies one YAML document and returns the object's name.
pub async fn apply(yaml: &str, client: Client, discovery: &Discovery) -> Result<String, Error> {
    let ssapply = PatchParams::apply("serving-e2e").force();
    let obj: DynamicObject = serde_yaml::from_str(yaml)?;
    let namespace = obj.metadata.namespace.as_deref();
    let gvk = match &obj.types {
        Some(tm) => GroupVersionKind::try_from(tm)
            .map_err(|err| Error::ApplyFailed(err.to_string()))?,
        None => return Err(Error::ApplyFailed(format!("object without TypeMeta {:?}", obj))),
    };
    let name = obj.name_any();
    let (ar, caps) = discovery
        .resolve_gvk(&gvk)
        .ok_or_else(|| Error::ApplyFailed(format!("unknown {:?}", gvk)))?;

    let api = dynamic_api(ar, caps, client, namespace);
    info!("Applying {} {}", gvk.kind, name);
    let data: serde_json::Value = serde_json::to_value(&obj)?;
    api.patch(&name, &ssapply, &Patch::Apply(data)).await?;
    info!("applied {} {}", gvk.kind, name);
    Ok(name)
}

fn dynamic_api(
    ar: ApiResource,
    caps: ApiCapabilities,
    client: Client,
    ns: Option<&str>,
) -> Api<DynamicObject> {
    if caps.scope == Scope::Cluster {
        Api::all_with(client, &ar)
    } else if let Some(namespace) = ns {
        Api::namespaced_with(client, namespace, &ar)
    } else {
        Api::default_namespaced_with(client, &ar)
    }
}
