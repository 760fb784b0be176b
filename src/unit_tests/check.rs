// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::backend::{switch_backend, BackendName};
use crate::correspondence::{check_derivation, CorrespondenceError};
use crate::crds::{MODEL_NAME_LABEL_KEY, MODEL_RUNNER_CONTAINER_NAME};
use crate::model_claim::InferenceMode;
use crate::testkit::*;

const NS: &str = "default";

fn sample_request() -> ServingRequestWrapper {
    ServingRequestWrapper::new(SAMPLE_REQUEST_NAME, NS)
        .model_claim(SAMPLE_MODEL_NAME, &[])
        .label(MODEL_NAME_LABEL_KEY, SAMPLE_MODEL_NAME)
        .replicas(1)
}

#[test]
pub fn test_default_backend_derivation_is_accepted() {
    let request = sample_request().obj();
    let backend = switch_backend(BackendName::Vllm);
    let workload = ServingWorkloadWrapper::new(SAMPLE_REQUEST_NAME, NS)
        .models_claim(&[SAMPLE_MODEL_NAME], InferenceMode::Standard, &[])
        .replicas(1)
        .command(backend.default_commands())
        .image(&backend.image(&backend.default_version()))
        .limit("cpu", "4")
        .limit("memory", "16Gi")
        .request("cpu", "4000m")
        .request("memory", "17179869184")
        .obj();
    let model = mock_sample_model(NS);

    assert!(check_derivation(&request, &workload, &model).is_ok());
}

#[test]
pub fn test_derived_fixtures_are_accepted() {
    let model = mock_sample_model(NS);
    let requests = vec![
        sample_request().obj(),
        sample_request()
            .backend(BackendName::SgLang)
            .backend_version("v0.3.0")
            .backend_args(&["--tp", "2"])
            .backend_env("HF_TOKEN", "secret")
            .backend_limit("nvidia.com/gpu", "1")
            .obj(),
        ServingRequestWrapper::new(SAMPLE_REQUEST_NAME, NS)
            .multi_models_claim(
                &[SAMPLE_MODEL_NAME, "llama3-1b"],
                InferenceMode::SpeculativeDecoding,
                &["a100"],
            )
            .label(MODEL_NAME_LABEL_KEY, SAMPLE_MODEL_NAME)
            .replicas(3)
            .obj(),
    ];
    for request in requests {
        let workload = ServingWorkloadWrapper::derived_from(&request).obj();
        let result = check_derivation(&request, &workload, &model);
        assert!(result.is_ok(), "{:?}", result);
    }
}

#[test]
pub fn test_args_are_a_subset() {
    let request = sample_request().backend_args(&["--foo"]).obj();
    let model = mock_sample_model(NS);

    let workload = ServingWorkloadWrapper::derived_from(&request)
        .args(&["--bar", "--foo"])
        .obj();
    assert!(check_derivation(&request, &workload, &model).is_ok());

    let workload = ServingWorkloadWrapper::derived_from(&request)
        .args(&["--bar"])
        .obj();
    assert!(matches!(
        check_derivation(&request, &workload, &model),
        Err(CorrespondenceError::MissingArg(arg)) if arg == "--foo"
    ));
}

#[test]
pub fn test_model_name_mismatch() {
    let request = sample_request().obj();
    let workload = ServingWorkloadWrapper::derived_from(&request)
        .models_claim(&["qwen2-7b"], InferenceMode::Standard, &[])
        .obj();
    assert!(matches!(
        check_derivation(&request, &workload, &mock_sample_model(NS)),
        Err(CorrespondenceError::ModelNameMismatch { .. })
    ));
}

#[test]
pub fn test_model_names_must_match_in_order() {
    let request = ServingRequestWrapper::new(SAMPLE_REQUEST_NAME, NS)
        .multi_models_claim(&[SAMPLE_MODEL_NAME, "llama3-1b"], InferenceMode::Standard, &[])
        .label(MODEL_NAME_LABEL_KEY, SAMPLE_MODEL_NAME)
        .replicas(1)
        .obj();
    let workload = ServingWorkloadWrapper::derived_from(&request)
        .models_claim(&["llama3-1b", SAMPLE_MODEL_NAME], InferenceMode::Standard, &[])
        .obj();
    assert!(matches!(
        check_derivation(&request, &workload, &mock_sample_model(NS)),
        Err(CorrespondenceError::ModelNamesMismatch { .. })
    ));
}

#[test]
pub fn test_flavors_mismatch() {
    let request = sample_request().model_claim(SAMPLE_MODEL_NAME, &["a100", "h100"]).obj();
    let workload = ServingWorkloadWrapper::derived_from(&request)
        .models_claim(&[SAMPLE_MODEL_NAME], InferenceMode::Standard, &["h100", "a100"])
        .obj();
    assert!(matches!(
        check_derivation(&request, &workload, &mock_sample_model(NS)),
        Err(CorrespondenceError::FlavorsMismatch { .. })
    ));
}

#[test]
pub fn test_label_must_name_the_model() {
    let request = sample_request().label(MODEL_NAME_LABEL_KEY, "other").obj();
    let workload = ServingWorkloadWrapper::derived_from(&request).obj();
    assert!(matches!(
        check_derivation(&request, &workload, &mock_sample_model(NS)),
        Err(CorrespondenceError::ModelLabelMismatch { .. })
    ));
}

#[test]
pub fn test_replicas() {
    let request = sample_request().obj();
    let model = mock_sample_model(NS);

    let workload = ServingWorkloadWrapper::derived_from(&request).replicas(2).obj();
    assert!(matches!(
        check_derivation(&request, &workload, &model),
        Err(CorrespondenceError::ReplicasMismatch { want: 1, got: 2 })
    ));

    let mut unset = request.clone();
    unset.spec.replicas = None;
    assert!(matches!(
        check_derivation(&unset, &workload, &model),
        Err(CorrespondenceError::MissingReplicas(_))
    ));
}

#[test]
pub fn test_container_name_and_command() {
    let request = sample_request().obj();
    let model = mock_sample_model(NS);

    let workload = ServingWorkloadWrapper::derived_from(&request)
        .container_name("sidecar")
        .obj();
    assert!(matches!(
        check_derivation(&request, &workload, &model),
        Err(CorrespondenceError::ContainerNameMismatch { .. })
    ));

    let workload = ServingWorkloadWrapper::derived_from(&request)
        .command(vec!["python3".to_string()])
        .obj();
    assert!(matches!(
        check_derivation(&request, &workload, &model),
        Err(CorrespondenceError::CommandMismatch { .. })
    ));
}

#[test]
pub fn test_runner_container_name() {
    let request = sample_request().obj();
    let workload = ServingWorkloadWrapper::derived_from(&request).obj();
    let container = workload.runner_container().unwrap();
    assert_eq!(container.name, MODEL_RUNNER_CONTAINER_NAME);
    assert_eq!(container.name, "model-runner");
}

#[test]
pub fn test_mismatch_names_the_backend() {
    let request = sample_request().backend(BackendName::SgLang).obj();
    let model = mock_sample_model(NS);

    let workload = ServingWorkloadWrapper::derived_from(&request)
        .command(vec!["python3".to_string()])
        .obj();
    let err = check_derivation(&request, &workload, &model).unwrap_err();
    assert!(matches!(
        err,
        CorrespondenceError::CommandMismatch { backend: BackendName::SgLang, .. }
    ));
    assert!(err.to_string().contains("backend sglang"));

    let workload = ServingWorkloadWrapper::derived_from(&request)
        .image("lmsysorg/sglang:latest")
        .obj();
    let err = check_derivation(&request, &workload, &model).unwrap_err();
    assert!(matches!(
        err,
        CorrespondenceError::ImageMismatch { backend: BackendName::SgLang, .. }
    ));
}

#[test]
pub fn test_image_follows_explicit_version() {
    let request = sample_request().backend_version("v0.6.3").obj();
    let model = mock_sample_model(NS);
    let backend = switch_backend(BackendName::Vllm);

    let workload = ServingWorkloadWrapper::derived_from(&request).obj();
    assert!(check_derivation(&request, &workload, &model).is_ok());

    let workload = ServingWorkloadWrapper::derived_from(&request)
        .image(&backend.image(&backend.default_version()))
        .obj();
    assert!(matches!(
        check_derivation(&request, &workload, &model),
        Err(CorrespondenceError::ImageMismatch { .. })
    ));
}

#[test]
pub fn test_envs_must_match_exactly() {
    let request = sample_request().backend_env("FOO", "bar").obj();
    let model = mock_sample_model(NS);

    let workload = ServingWorkloadWrapper::derived_from(&request)
        .env("EXTRA", "1")
        .obj();
    assert!(matches!(
        check_derivation(&request, &workload, &model),
        Err(CorrespondenceError::EnvMismatch { .. })
    ));

    let without_envs = sample_request().backend_args(&["--foo"]).obj();
    let workload = ServingWorkloadWrapper::derived_from(&without_envs)
        .env("EXTRA", "1")
        .obj();
    assert!(check_derivation(&without_envs, &workload, &model).is_ok());
}

#[test]
pub fn test_explicit_resources_checked_per_key() {
    let request = sample_request().backend_limit("cpu", "8").obj();
    let model = mock_sample_model(NS);

    let workload = ServingWorkloadWrapper::derived_from(&request)
        .limit("memory", "1Gi")
        .obj();
    assert!(check_derivation(&request, &workload, &model).is_ok());

    let workload = ServingWorkloadWrapper::derived_from(&request)
        .limit("cpu", "4")
        .obj();
    assert!(matches!(
        check_derivation(&request, &workload, &model),
        Err(CorrespondenceError::ResourceMismatch { kind: "limit", .. })
    ));
}

#[test]
pub fn test_default_resources_checked_without_explicit_ones() {
    let request = sample_request().backend_args(&["--foo"]).obj();
    let workload = ServingWorkloadWrapper::derived_from(&request)
        .request("memory", "8Gi")
        .obj();
    assert!(matches!(
        check_derivation(&request, &workload, &mock_sample_model(NS)),
        Err(CorrespondenceError::ResourceMismatch { kind: "request", .. })
    ));
}

#[test]
pub fn test_resources_ignored_without_backend_config() {
    let request = sample_request().obj();
    assert!(request.spec.backend_config.is_none());
    let model = mock_sample_model(NS);

    let mut workload = ServingWorkloadWrapper::derived_from(&request).obj();
    if let Some(pod_spec) = workload
        .spec
        .workload_template
        .leader_worker_template
        .worker_template
        .spec
        .as_mut()
    {
        pod_spec.containers[0].resources = None;
    }
    assert!(check_derivation(&request, &workload, &model).is_ok());

    let workload = ServingWorkloadWrapper::derived_from(&request)
        .request("memory", "8Gi")
        .limit("cpu", "1")
        .obj();
    assert!(check_derivation(&request, &workload, &model).is_ok());
}

#[test]
pub fn test_missing_runner_container() {
    let request = sample_request().obj();
    let mut workload = ServingWorkloadWrapper::derived_from(&request).obj();
    workload
        .spec
        .workload_template
        .leader_worker_template
        .worker_template
        .spec = None;
    assert!(matches!(
        check_derivation(&request, &workload, &mock_sample_model(NS)),
        Err(CorrespondenceError::MissingRunnerContainer)
    ));
}
