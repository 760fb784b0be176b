// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::admission::apply_defaults;
use crate::crds::MODEL_NAME_LABEL_KEY;
use crate::model_claim::InferenceMode;
use crate::testkit::*;
use kube::ResourceExt;

#[test]
pub fn test_model_claim_sets_label() {
    let mut request = ServingRequestWrapper::new("playground", "default")
        .model_claim("llama3-8b", &[])
        .obj();
    apply_defaults(&mut request);
    assert_eq!(
        request.labels().get(MODEL_NAME_LABEL_KEY),
        Some(&"llama3-8b".to_string())
    );
}

#[test]
pub fn test_multi_models_claim_uses_first_model() {
    let mut request = ServingRequestWrapper::new("playground", "default")
        .multi_models_claim(&["a", "b"], InferenceMode::SpeculativeDecoding, &[])
        .obj();
    apply_defaults(&mut request);
    assert_eq!(
        request.labels().get(MODEL_NAME_LABEL_KEY),
        Some(&"a".to_string())
    );
}

#[test]
pub fn test_overwrites_existing_label() {
    let mut request = ServingRequestWrapper::new("playground", "default")
        .model_claim("llama3-8b", &[])
        .label(MODEL_NAME_LABEL_KEY, "stale")
        .label("team", "inference")
        .obj();
    apply_defaults(&mut request);
    assert_eq!(request.labels()[MODEL_NAME_LABEL_KEY], "llama3-8b");
    assert_eq!(request.labels()["team"], "inference");
}

#[test]
pub fn test_idempotent() {
    let mut once = ServingRequestWrapper::new("playground", "default")
        .multi_models_claim(&["qwen2-7b", "qwen2-0.5b"], InferenceMode::Standard, &[])
        .obj();
    apply_defaults(&mut once);
    let mut twice = once.clone();
    apply_defaults(&mut twice);
    assert_eq!(once, twice);
}

#[test]
pub fn test_only_labels_are_touched() {
    let original = ServingRequestWrapper::new("playground", "default")
        .model_claim("llama3-8b", &["a100"])
        .replicas(2)
        .backend_args(&["--foo"])
        .obj();
    let mut defaulted = original.clone();
    apply_defaults(&mut defaulted);
    assert_eq!(original.spec, defaulted.spec);
    assert_eq!(original.metadata.name, defaulted.metadata.name);
}

#[test]
pub fn test_no_claim_sets_empty_label() {
    let mut request = ServingRequestWrapper::new("playground", "default").obj();
    apply_defaults(&mut request);
    assert_eq!(request.labels()[MODEL_NAME_LABEL_KEY], "");
}

#[test]
pub fn test_single_claim_wins_over_multi_claim() {
    let mut request = ServingRequestWrapper::new("playground", "default")
        .model_claim("single", &[])
        .multi_models_claim(&["multi"], InferenceMode::Standard, &[])
        .obj();
    apply_defaults(&mut request);
    assert_eq!(request.labels()[MODEL_NAME_LABEL_KEY], "single");
}
