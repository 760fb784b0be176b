// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How the models of a multi-model claim cooperate at inference time.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub enum InferenceMode {
    #[default]
    Standard,
    /// A draft model proposes tokens that the target model verifies.
    /// Requires exactly two models, the target model first.
    SpeculativeDecoding,
}

/// A reference to a single model.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
pub struct ModelClaim {
    #[serde(rename = "modelName")]
    pub model_name: String,
    #[serde(rename = "inferenceFlavors", skip_serializing_if = "Option::is_none")]
    pub inference_flavors: Option<Vec<String>>,
}

/// A reference to several models served together.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
pub struct MultiModelsClaim {
    #[serde(rename = "inferenceMode", default)]
    pub inference_mode: InferenceMode,
    #[serde(rename = "modelNames")]
    pub model_names: Vec<String>,
    #[serde(rename = "inferenceFlavors", skip_serializing_if = "Option::is_none")]
    pub inference_flavors: Option<Vec<String>>,
}

/// Borrowed view over whichever claim a serving request carries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Claim<'a> {
    Single(&'a ModelClaim),
    Multi(&'a MultiModelsClaim),
}

impl<'a> Claim<'a> {
    /// The model that identifies the request. For multi-model claims the first entry
    /// is the main model; `None` only for a multi-model claim without entries.
    pub fn primary_model_name(&self) -> Option<&'a str> {
        match self {
            Claim::Single(claim) => Some(claim.model_name.as_str()),
            Claim::Multi(claim) => claim.model_names.first().map(String::as_str),
        }
    }

    pub fn model_names(&self) -> Vec<&'a str> {
        match self {
            Claim::Single(claim) => vec![claim.model_name.as_str()],
            Claim::Multi(claim) => claim.model_names.iter().map(String::as_str).collect(),
        }
    }

    /// Flavors in declaration order; an absent list and an empty list are the same.
    pub fn inference_flavors(&self) -> &'a [String] {
        let flavors = match self {
            Claim::Single(claim) => &claim.inference_flavors,
            Claim::Multi(claim) => &claim.inference_flavors,
        };
        flavors.as_deref().unwrap_or_default()
    }

    pub fn inference_mode(&self) -> InferenceMode {
        match self {
            Claim::Single(_) => InferenceMode::Standard,
            Claim::Multi(claim) => claim.inference_mode,
        }
    }
}

impl MultiModelsClaim {
    pub fn inference_flavors(&self) -> &[String] {
        self.inference_flavors.as_deref().unwrap_or_default()
    }
}
