// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use super::{commands, resource_list, BackendName, InferenceBackend};
use crate::crds::ResourceRequirements;

const VLLM_IMAGE_REGISTRY: &str = "vllm/vllm-openai";
const VLLM_DEFAULT_VERSION: &str = "v0.6.0";

/// The OpenAI-compatible vLLM server; the default backend.
pub struct Vllm;

impl InferenceBackend for Vllm {
    fn name(&self) -> BackendName {
        BackendName::Vllm
    }

    fn default_commands(&self) -> Vec<String> {
        commands(&["python3", "-m", "vllm.entrypoints.openai.api_server"])
    }

    fn default_version(&self) -> String {
        VLLM_DEFAULT_VERSION.to_string()
    }

    fn image(&self, version: &str) -> String {
        format!("{}:{}", VLLM_IMAGE_REGISTRY, version)
    }

    fn default_resources(&self) -> ResourceRequirements {
        ResourceRequirements {
            limits: Some(resource_list(&[("cpu", "4"), ("memory", "16Gi")])),
            requests: Some(resource_list(&[("cpu", "4"), ("memory", "16Gi")])),
        }
    }
}
