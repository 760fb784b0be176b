// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
pub mod llamacpp;
pub mod sglang;
pub mod tgi;
pub mod vllm;

use crate::crds::ResourceRequirements;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub use llamacpp::LlamaCpp;
pub use sglang::SgLang;
pub use tgi::Tgi;
pub use vllm::Vllm;

/// Identifier of a runner implementation, as written in `spec.backendConfig.name`.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq, Hash,
)]
pub enum BackendName {
    #[default]
    #[serde(rename = "vllm")]
    Vllm,
    #[serde(rename = "sglang")]
    SgLang,
    #[serde(rename = "llamacpp")]
    LlamaCpp,
    #[serde(rename = "tgi")]
    Tgi,
}

impl BackendName {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendName::Vllm => "vllm",
            BackendName::SgLang => "sglang",
            BackendName::LlamaCpp => "llamacpp",
            BackendName::Tgi => "tgi",
        }
    }

    /// Only vLLM is able to run a draft model next to the target model.
    pub fn supports_speculative_decoding(&self) -> bool {
        *self == BackendName::Vllm
    }
}

impl fmt::Display for BackendName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default tables a runner contributes to every derived workload.
pub trait InferenceBackend: Send + Sync {
    fn name(&self) -> BackendName;

    fn default_commands(&self) -> Vec<String>;

    fn default_version(&self) -> String;

    fn image(&self, version: &str) -> String;

    fn default_resources(&self) -> ResourceRequirements;
}

pub fn switch_backend(name: BackendName) -> &'static dyn InferenceBackend {
    match name {
        BackendName::Vllm => &Vllm,
        BackendName::SgLang => &SgLang,
        BackendName::LlamaCpp => &LlamaCpp,
        BackendName::Tgi => &Tgi,
    }
}

pub(crate) fn commands(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|part| part.to_string()).collect()
}

pub(crate) fn resource_list(entries: &[(&str, &str)]) -> BTreeMap<String, Quantity> {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), Quantity(value.to_string())))
        .collect()
}
