// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use super::{commands, resource_list, BackendName, InferenceBackend};
use crate::crds::ResourceRequirements;

const TGI_IMAGE_REGISTRY: &str = "ghcr.io/huggingface/text-generation-inference";
const TGI_DEFAULT_VERSION: &str = "2.3.1";

/// Hugging Face Text Generation Inference.
pub struct Tgi;

impl InferenceBackend for Tgi {
    fn name(&self) -> BackendName {
        BackendName::Tgi
    }

    fn default_commands(&self) -> Vec<String> {
        commands(&["text-generation-launcher"])
    }

    fn default_version(&self) -> String {
        TGI_DEFAULT_VERSION.to_string()
    }

    fn image(&self, version: &str) -> String {
        format!("{}:{}", TGI_IMAGE_REGISTRY, version)
    }

    fn default_resources(&self) -> ResourceRequirements {
        ResourceRequirements {
            limits: Some(resource_list(&[("cpu", "4"), ("memory", "16Gi")])),
            requests: Some(resource_list(&[("cpu", "4"), ("memory", "16Gi")])),
        }
    }
}
