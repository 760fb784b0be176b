// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::backend::switch_backend;
use crate::correspondence::CorrespondenceError;
use crate::crds::{
    OpenModel, ServingRequest, ServingWorkload, MODEL_NAME_LABEL_KEY,
    MODEL_RUNNER_CONTAINER_NAME,
};
use crate::model_claim::Claim;
use crate::quantity::quantities_equal;
use k8s_openapi::api::core::v1::EnvVar;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use kube::ResourceExt;
use std::collections::BTreeMap;

/// Verifies that `workload` is what the reconciler must derive from `request`, given the
/// already resolved primary `model`.
///
/// Checks run in a fixed order and stop at the first mismatch:
/// claim, model label, replicas, runner container name and command, image, and finally
/// args, envs and resources. The last three are only checked when the request carries a
/// `backendConfig`: explicit args only need to be present in the derived args, explicit envs
/// must match exactly, and explicit resources are compared key by key, falling back to the
/// backend's default resources when none are given.
pub fn check_derivation(
    request: &ServingRequest,
    workload: &ServingWorkload,
    model: &OpenModel,
) -> Result<(), CorrespondenceError> {
    let claim = request.spec.claim().ok_or(CorrespondenceError::MissingClaim)?;
    check_claim(claim, workload)?;

    let model_name = model.name_any();
    let label = request.labels().get(MODEL_NAME_LABEL_KEY);
    if label != Some(&model_name) {
        return Err(CorrespondenceError::ModelLabelMismatch {
            want: model_name,
            got: label.cloned(),
        });
    }

    let want_replicas = request
        .spec
        .replicas
        .ok_or(CorrespondenceError::MissingReplicas("serving request"))?;
    let got_replicas = workload
        .spec
        .workload_template
        .replicas
        .ok_or(CorrespondenceError::MissingReplicas("derived workload"))?;
    if want_replicas != got_replicas {
        return Err(CorrespondenceError::ReplicasMismatch {
            want: want_replicas,
            got: got_replicas,
        });
    }

    let backend = switch_backend(request.spec.backend_name());
    let backend_config = request.spec.backend_config.as_ref();

    let container = workload
        .runner_container()
        .ok_or(CorrespondenceError::MissingRunnerContainer)?;
    if container.name != MODEL_RUNNER_CONTAINER_NAME {
        return Err(CorrespondenceError::ContainerNameMismatch {
            want: MODEL_RUNNER_CONTAINER_NAME.to_string(),
            got: container.name.clone(),
        });
    }
    let command = container.command.clone().unwrap_or_default();
    if command != backend.default_commands() {
        return Err(CorrespondenceError::CommandMismatch {
            backend: backend.name(),
            want: backend.default_commands(),
            got: command,
        });
    }

    let version = backend_config
        .and_then(|config| config.version.clone())
        .unwrap_or_else(|| backend.default_version());
    let image = backend.image(&version);
    if container.image.as_deref() != Some(image.as_str()) {
        return Err(CorrespondenceError::ImageMismatch {
            backend: backend.name(),
            want: image,
            got: container.image.clone(),
        });
    }

    if let Some(config) = backend_config {
        let derived_args = container.args.as_deref().unwrap_or_default();
        for arg in config.args.iter().flatten() {
            if !derived_args.contains(arg) {
                return Err(CorrespondenceError::MissingArg(arg.clone()));
            }
        }

        if let Some(envs) = config.envs.as_ref().filter(|envs| !envs.is_empty()) {
            check_envs(envs, container.env.as_deref().unwrap_or_default())?;
        }

        let derived_resources = container.resources.clone().unwrap_or_default();
        let expected_resources = match config.resources.clone() {
            Some(explicit) => explicit,
            None => backend.default_resources(),
        };
        check_resource_list(
            "limit",
            expected_resources.limits.as_ref(),
            derived_resources.limits.as_ref(),
        )?;
        check_resource_list(
            "request",
            expected_resources.requests.as_ref(),
            derived_resources.requests.as_ref(),
        )?;
    }

    Ok(())
}

fn check_claim(claim: Claim<'_>, workload: &ServingWorkload) -> Result<(), CorrespondenceError> {
    let derived = &workload.spec.multi_models_claim;
    match claim {
        Claim::Single(single) => {
            let got = derived.model_names.first();
            if got != Some(&single.model_name) {
                return Err(CorrespondenceError::ModelNameMismatch {
                    want: single.model_name.clone(),
                    got: got.cloned(),
                });
            }
        }
        Claim::Multi(multi) => {
            if multi.model_names != derived.model_names {
                return Err(CorrespondenceError::ModelNamesMismatch {
                    want: multi.model_names.clone(),
                    got: derived.model_names.clone(),
                });
            }
        }
    }

    if claim.inference_flavors() != derived.inference_flavors() {
        return Err(CorrespondenceError::FlavorsMismatch {
            want: claim.inference_flavors().to_vec(),
            got: derived.inference_flavors().to_vec(),
        });
    }
    Ok(())
}

fn check_envs(
    want: &BTreeMap<String, String>,
    derived: &[EnvVar],
) -> Result<(), CorrespondenceError> {
    let got: BTreeMap<String, String> = derived
        .iter()
        .map(|env| (env.name.clone(), env.value.clone().unwrap_or_default()))
        .collect();
    let sourced = derived.iter().any(|env| env.value_from.is_some());
    if sourced || got.len() != derived.len() || &got != want {
        return Err(CorrespondenceError::EnvMismatch {
            want: want.clone(),
            got,
        });
    }
    Ok(())
}

fn check_resource_list(
    kind: &'static str,
    want: Option<&BTreeMap<String, Quantity>>,
    derived: Option<&BTreeMap<String, Quantity>>,
) -> Result<(), CorrespondenceError> {
    for (resource, quantity) in want.into_iter().flatten() {
        let got = derived.and_then(|list| list.get(resource));
        if !got.is_some_and(|got| quantities_equal(quantity, got)) {
            return Err(CorrespondenceError::ResourceMismatch {
                kind,
                resource: resource.clone(),
                want: quantity.0.clone(),
                got: got.map(|got| got.0.clone()),
            });
        }
    }
    Ok(())
}
