// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::backend::{switch_backend, BackendName};
use crate::crds::*;
use crate::model_claim::{InferenceMode, ModelClaim, MultiModelsClaim};
use k8s_openapi::api::core::v1::{self as corev1, Container, EnvVar, PodSpec, PodTemplateSpec};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{Condition, ObjectMeta, Time};
use std::collections::BTreeMap;

fn object_meta(name: &str, namespace: &str) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        namespace: Some(namespace.to_string()),
        ..ObjectMeta::default()
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn flavors(values: &[&str]) -> Option<Vec<String>> {
    (!values.is_empty()).then(|| strings(values))
}

pub struct ServingRequestWrapper(ServingRequest);

impl ServingRequestWrapper {
    pub fn new(name: &str, namespace: &str) -> ServingRequestWrapper {
        ServingRequestWrapper(ServingRequest {
            metadata: object_meta(name, namespace),
            ..ServingRequest::default()
        })
    }

    pub fn obj(self) -> ServingRequest {
        self.0
    }

    pub fn label(mut self, key: &str, value: &str) -> Self {
        self.0
            .metadata
            .labels
            .get_or_insert_with(BTreeMap::new)
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn replicas(mut self, replicas: i32) -> Self {
        self.0.spec.replicas = Some(replicas);
        self
    }

    pub fn model_claim(mut self, model_name: &str, flavor_names: &[&str]) -> Self {
        self.0.spec.model_claim = Some(ModelClaim {
            model_name: model_name.to_string(),
            inference_flavors: flavors(flavor_names),
        });
        self
    }

    pub fn multi_models_claim(
        mut self,
        model_names: &[&str],
        mode: InferenceMode,
        flavor_names: &[&str],
    ) -> Self {
        self.0.spec.multi_models_claim = Some(MultiModelsClaim {
            inference_mode: mode,
            model_names: strings(model_names),
            inference_flavors: flavors(flavor_names),
        });
        self
    }

    fn backend_config(&mut self) -> &mut BackendConfig {
        self.0
            .spec
            .backend_config
            .get_or_insert_with(BackendConfig::default)
    }

    pub fn backend(mut self, name: BackendName) -> Self {
        self.backend_config().name = Some(name);
        self
    }

    pub fn backend_version(mut self, version: &str) -> Self {
        self.backend_config().version = Some(version.to_string());
        self
    }

    pub fn backend_args(mut self, args: &[&str]) -> Self {
        self.backend_config().args = Some(strings(args));
        self
    }

    pub fn backend_env(mut self, name: &str, value: &str) -> Self {
        self.backend_config()
            .envs
            .get_or_insert_with(BTreeMap::new)
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn backend_request(mut self, resource: &str, quantity: &str) -> Self {
        self.backend_config()
            .resources
            .get_or_insert_with(ResourceRequirements::default)
            .requests
            .get_or_insert_with(BTreeMap::new)
            .insert(resource.to_string(), Quantity(quantity.to_string()));
        self
    }

    pub fn backend_limit(mut self, resource: &str, quantity: &str) -> Self {
        self.backend_config()
            .resources
            .get_or_insert_with(ResourceRequirements::default)
            .limits
            .get_or_insert_with(BTreeMap::new)
            .insert(resource.to_string(), Quantity(quantity.to_string()));
        self
    }

    pub fn condition(mut self, condition_type: &str, reason: &str, status: &str) -> Self {
        self.0
            .status
            .get_or_insert_with(ServingRequestStatus::default)
            .conditions
            .get_or_insert_with(Vec::new)
            .push(Condition {
                type_: condition_type.to_string(),
                reason: reason.to_string(),
                status: status.to_string(),
                message: String::new(),
                last_transition_time: Time(Default::default()),
                observed_generation: None,
            });
        self
    }
}

pub struct ServingWorkloadWrapper(ServingWorkload);

impl ServingWorkloadWrapper {
    /// A workload whose worker template holds one empty runner container.
    pub fn new(name: &str, namespace: &str) -> ServingWorkloadWrapper {
        let mut workload = ServingWorkload {
            metadata: object_meta(name, namespace),
            ..ServingWorkload::default()
        };
        workload
            .spec
            .workload_template
            .leader_worker_template
            .worker_template = PodTemplateSpec {
            metadata: None,
            spec: Some(PodSpec {
                containers: vec![Container {
                    name: MODEL_RUNNER_CONTAINER_NAME.to_string(),
                    ..Container::default()
                }],
                ..PodSpec::default()
            }),
        };
        ServingWorkloadWrapper(workload)
    }

    /// The workload a conforming reconciler derives from `request`: backend defaults with
    /// the request's overrides merged in, resources overridden key by key.
    pub fn derived_from(request: &ServingRequest) -> ServingWorkloadWrapper {
        let name = request.metadata.name.clone().unwrap_or_default();
        let namespace = request.metadata.namespace.clone().unwrap_or_default();
        let backend = switch_backend(request.spec.backend_name());
        let config = request.spec.backend_config.clone().unwrap_or_default();

        let mut wrapper = ServingWorkloadWrapper::new(&name, &namespace)
            .command(backend.default_commands())
            .image(&backend.image(
                &config.version.clone().unwrap_or_else(|| backend.default_version()),
            ));
        if let Some(claim) = request.spec.claim() {
            wrapper.0.spec.multi_models_claim = MultiModelsClaim {
                inference_mode: claim.inference_mode(),
                model_names: claim.model_names().iter().map(|n| n.to_string()).collect(),
                inference_flavors: Some(claim.inference_flavors().to_vec())
                    .filter(|flavors| !flavors.is_empty()),
            };
        }
        if let Some(replicas) = request.spec.replicas {
            wrapper = wrapper.replicas(replicas);
        }
        for arg in config.args.iter().flatten() {
            wrapper = wrapper.arg(arg);
        }
        for (env_name, value) in config.envs.iter().flatten() {
            wrapper = wrapper.env(env_name, value);
        }

        let defaults = backend.default_resources();
        let explicit = config.resources.unwrap_or_default();
        for (resource, quantity) in merge(defaults.limits, explicit.limits) {
            wrapper = wrapper.limit(&resource, &quantity.0);
        }
        for (resource, quantity) in merge(defaults.requests, explicit.requests) {
            wrapper = wrapper.request(&resource, &quantity.0);
        }
        wrapper
    }

    pub fn obj(self) -> ServingWorkload {
        self.0
    }

    pub fn models_claim(mut self, model_names: &[&str], mode: InferenceMode, flavor_names: &[&str]) -> Self {
        self.0.spec.multi_models_claim = MultiModelsClaim {
            inference_mode: mode,
            model_names: strings(model_names),
            inference_flavors: flavors(flavor_names),
        };
        self
    }

    pub fn replicas(mut self, replicas: i32) -> Self {
        self.0.spec.workload_template.replicas = Some(replicas);
        self
    }

    fn runner(&mut self) -> &mut Container {
        let pod_spec = self
            .0
            .spec
            .workload_template
            .leader_worker_template
            .worker_template
            .spec
            .get_or_insert_with(PodSpec::default);
        if pod_spec.containers.is_empty() {
            pod_spec.containers.push(Container::default());
        }
        &mut pod_spec.containers[0]
    }

    pub fn container_name(mut self, name: &str) -> Self {
        self.runner().name = name.to_string();
        self
    }

    pub fn command(mut self, command: Vec<String>) -> Self {
        self.runner().command = Some(command);
        self
    }

    pub fn image(mut self, image: &str) -> Self {
        self.runner().image = Some(image.to_string());
        self
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.runner().args = Some(strings(args));
        self
    }

    pub fn arg(mut self, arg: &str) -> Self {
        self.runner()
            .args
            .get_or_insert_with(Vec::new)
            .push(arg.to_string());
        self
    }

    pub fn env(mut self, name: &str, value: &str) -> Self {
        self.runner().env.get_or_insert_with(Vec::new).push(EnvVar {
            name: name.to_string(),
            value: Some(value.to_string()),
            ..EnvVar::default()
        });
        self
    }

    pub fn limit(mut self, resource: &str, quantity: &str) -> Self {
        self.runner()
            .resources
            .get_or_insert_with(corev1::ResourceRequirements::default)
            .limits
            .get_or_insert_with(BTreeMap::new)
            .insert(resource.to_string(), Quantity(quantity.to_string()));
        self
    }

    pub fn request(mut self, resource: &str, quantity: &str) -> Self {
        self.runner()
            .resources
            .get_or_insert_with(corev1::ResourceRequirements::default)
            .requests
            .get_or_insert_with(BTreeMap::new)
            .insert(resource.to_string(), Quantity(quantity.to_string()));
        self
    }
}

fn merge(
    defaults: Option<BTreeMap<String, Quantity>>,
    overrides: Option<BTreeMap<String, Quantity>>,
) -> BTreeMap<String, Quantity> {
    let mut merged = defaults.unwrap_or_default();
    merged.extend(overrides.unwrap_or_default());
    merged
}

pub struct OpenModelWrapper(OpenModel);

impl OpenModelWrapper {
    pub fn new(name: &str, namespace: &str) -> OpenModelWrapper {
        OpenModelWrapper(OpenModel {
            metadata: object_meta(name, namespace),
            ..OpenModel::default()
        })
    }

    pub fn obj(self) -> OpenModel {
        self.0
    }

    pub fn family_name(mut self, family_name: &str) -> Self {
        self.0.spec.family_name = family_name.to_string();
        self
    }

    pub fn model_hub(mut self, hub: &str, model_id: &str) -> Self {
        self.0.spec.source.model_hub = Some(ModelHub {
            name: Some(hub.to_string()),
            model_id: model_id.to_string(),
            revision: None,
        });
        self
    }
}
