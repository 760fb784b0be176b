// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use super::{commands, resource_list, BackendName, InferenceBackend};
use crate::crds::ResourceRequirements;

const LLAMACPP_IMAGE_REGISTRY: &str = "ghcr.io/ggerganov/llama.cpp";
const LLAMACPP_DEFAULT_VERSION: &str = "server";

/// llama.cpp's HTTP server, meant for CPU-only or small GPU footprints.
pub struct LlamaCpp;

impl InferenceBackend for LlamaCpp {
    fn name(&self) -> BackendName {
        BackendName::LlamaCpp
    }

    fn default_commands(&self) -> Vec<String> {
        commands(&["./llama-server"])
    }

    fn default_version(&self) -> String {
        LLAMACPP_DEFAULT_VERSION.to_string()
    }

    fn image(&self, version: &str) -> String {
        format!("{}:{}", LLAMACPP_IMAGE_REGISTRY, version)
    }

    fn default_resources(&self) -> ResourceRequirements {
        ResourceRequirements {
            limits: Some(resource_list(&[("cpu", "2"), ("memory", "4Gi")])),
            requests: Some(resource_list(&[("cpu", "2"), ("memory", "4Gi")])),
        }
    }
}
