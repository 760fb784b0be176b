// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use super::{commands, resource_list, BackendName, InferenceBackend};
use crate::crds::ResourceRequirements;

const SGLANG_IMAGE_REGISTRY: &str = "lmsysorg/sglang";
const SGLANG_DEFAULT_VERSION: &str = "v0.2.10";

pub struct SgLang;

impl InferenceBackend for SgLang {
    fn name(&self) -> BackendName {
        BackendName::SgLang
    }

    fn default_commands(&self) -> Vec<String> {
        commands(&["python3", "-m", "sglang.launch_server"])
    }

    fn default_version(&self) -> String {
        SGLANG_DEFAULT_VERSION.to_string()
    }

    fn image(&self, version: &str) -> String {
        format!("{}:{}", SGLANG_IMAGE_REGISTRY, version)
    }

    fn default_resources(&self) -> ResourceRequirements {
        ResourceRequirements {
            limits: Some(resource_list(&[("cpu", "4"), ("memory", "16Gi")])),
            requests: Some(resource_list(&[("cpu", "4"), ("memory", "16Gi")])),
        }
    }
}
