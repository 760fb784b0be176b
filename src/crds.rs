// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::backend::BackendName;
use crate::model_claim::{Claim, ModelClaim, MultiModelsClaim};
use k8s_openapi::api::core::v1::{Container, PodTemplateSpec};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Condition;
use std::collections::BTreeMap;

/// Label carrying the primary model of a serving request.
pub const MODEL_NAME_LABEL_KEY: &str = "inference.serving.dev/model-name";

/// Name of the container running the model inside every derived workload.
pub const MODEL_RUNNER_CONTAINER_NAME: &str = "model-runner";

#[derive(
    kube::CustomResource,
    Default,
    Debug,
    Clone,
    serde::Deserialize,
    serde::Serialize,
    schemars::JsonSchema,
    PartialEq,
)]
#[kube(
    group = "inference.serving.dev",
    version = "v1alpha1",
    kind = "ServingRequest"
)]
#[kube(shortname = "sr", namespaced, derive = "PartialEq")]
#[kube(status = "ServingRequestStatus")]
pub struct ServingRequestSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,
    #[serde(rename = "modelClaim", skip_serializing_if = "Option::is_none")]
    pub model_claim: Option<ModelClaim>,
    #[serde(rename = "multiModelsClaim", skip_serializing_if = "Option::is_none")]
    pub multi_models_claim: Option<MultiModelsClaim>,
    #[serde(rename = "backendConfig", skip_serializing_if = "Option::is_none")]
    pub backend_config: Option<BackendConfig>,
}

impl ServingRequestSpec {
    /// Returns the claim this request targets. A single-model claim wins when both are set.
    pub fn claim(&self) -> Option<Claim<'_>> {
        match (&self.model_claim, &self.multi_models_claim) {
            (Some(single), _) => Some(Claim::Single(single)),
            (None, Some(multi)) => Some(Claim::Multi(multi)),
            (None, None) => None,
        }
    }

    pub fn backend_name(&self) -> BackendName {
        self.backend_config
            .as_ref()
            .and_then(|config| config.name)
            .unwrap_or_default()
    }
}

#[derive(
    Clone, Debug, Default, serde::Deserialize, serde::Serialize, schemars::JsonSchema, PartialEq,
)]
pub struct ServingRequestStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<Condition>>,
}

impl Default for ServingRequest {
    fn default() -> Self {
        Self {
            metadata: k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta::default(),
            spec: ServingRequestSpec::default(),
            status: None,
        }
    }
}

#[derive(
    Clone, Debug, Default, serde::Deserialize, serde::Serialize, schemars::JsonSchema, PartialEq,
)]
pub struct BackendConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<BackendName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub envs: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceRequirements>,
}

#[derive(
    Clone, Debug, Default, serde::Deserialize, serde::Serialize, schemars::JsonSchema, PartialEq,
)]
pub struct ResourceRequirements {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limits: Option<BTreeMap<String, Quantity>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requests: Option<BTreeMap<String, Quantity>>,
}

#[derive(
    kube::CustomResource,
    Default,
    Debug,
    Clone,
    serde::Deserialize,
    serde::Serialize,
    schemars::JsonSchema,
    PartialEq,
)]
#[kube(group = "inference.serving.dev", version = "v1alpha1", kind = "OpenModel")]
#[kube(shortname = "om", namespaced, derive = "PartialEq")]
pub struct OpenModelSpec {
    #[serde(rename = "familyName")]
    pub family_name: String,
    pub source: ModelSource,
}

impl Default for OpenModel {
    fn default() -> Self {
        Self {
            metadata: k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta::default(),
            spec: OpenModelSpec::default(),
        }
    }
}

#[derive(
    Clone, Debug, Default, serde::Deserialize, serde::Serialize, schemars::JsonSchema, PartialEq,
)]
pub struct ModelSource {
    #[serde(rename = "modelHub", skip_serializing_if = "Option::is_none")]
    pub model_hub: Option<ModelHub>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

#[derive(
    Clone, Debug, Default, serde::Deserialize, serde::Serialize, schemars::JsonSchema, PartialEq,
)]
pub struct ModelHub {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "modelID")]
    pub model_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
}

#[derive(
    kube::CustomResource,
    Default,
    Debug,
    Clone,
    serde::Deserialize,
    serde::Serialize,
    schemars::JsonSchema,
    PartialEq,
)]
#[kube(
    group = "inference.serving.dev",
    version = "v1alpha1",
    kind = "ServingWorkload"
)]
#[kube(shortname = "sw", namespaced, derive = "PartialEq")]
pub struct ServingWorkloadSpec {
    #[serde(rename = "multiModelsClaim")]
    pub multi_models_claim: MultiModelsClaim,
    #[serde(rename = "workloadTemplate")]
    pub workload_template: WorkloadTemplate,
}

impl Default for ServingWorkload {
    fn default() -> Self {
        Self {
            metadata: k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta::default(),
            spec: ServingWorkloadSpec::default(),
        }
    }
}

impl ServingWorkload {
    /// The first container of the worker template, which hosts the model runner.
    pub fn runner_container(&self) -> Option<&Container> {
        self.spec
            .workload_template
            .leader_worker_template
            .worker_template
            .spec
            .as_ref()
            .and_then(|pod_spec| pod_spec.containers.first())
    }
}

#[derive(
    Clone, Debug, Default, serde::Deserialize, serde::Serialize, schemars::JsonSchema, PartialEq,
)]
pub struct WorkloadTemplate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,
    #[serde(rename = "leaderWorkerTemplate")]
    pub leader_worker_template: LeaderWorkerTemplate,
}

#[derive(
    Clone, Debug, Default, serde::Deserialize, serde::Serialize, schemars::JsonSchema, PartialEq,
)]
pub struct LeaderWorkerTemplate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i32>,
    #[serde(rename = "leaderTemplate", skip_serializing_if = "Option::is_none")]
    pub leader_template: Option<PodTemplateSpec>,
    #[serde(rename = "workerTemplate")]
    pub worker_template: PodTemplateSpec,
}
