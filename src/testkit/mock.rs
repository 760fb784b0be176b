// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::crds::{OpenModel, ServingRequest, ServingWorkload, MODEL_NAME_LABEL_KEY};
use crate::testkit::wrapper::*;

pub const SAMPLE_MODEL_NAME: &str = "llama3-8b";
pub const SAMPLE_REQUEST_NAME: &str = "playground-llama3-8b";

pub fn mock_sample_model(namespace: &str) -> OpenModel {
    OpenModelWrapper::new(SAMPLE_MODEL_NAME, namespace)
        .family_name("llama3")
        .model_hub("Huggingface", "meta-llama/Meta-Llama-3-8B")
        .obj()
}

pub fn mock_sample_serving_request(namespace: &str) -> ServingRequest {
    ServingRequestWrapper::new(SAMPLE_REQUEST_NAME, namespace)
        .model_claim(SAMPLE_MODEL_NAME, &[])
        .label(MODEL_NAME_LABEL_KEY, SAMPLE_MODEL_NAME)
        .replicas(1)
        .obj()
}

pub fn mock_sample_workload(namespace: &str) -> ServingWorkload {
    ServingWorkloadWrapper::derived_from(&mock_sample_serving_request(namespace)).obj()
}
