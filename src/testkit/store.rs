// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::correspondence::{ModelRegistry, StoreError, WorkloadStore};
use crate::crds::{OpenModel, ServingRequest, ServingWorkload};
use async_trait::async_trait;
use kube::ResourceExt;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

type ObjectKey = (String, String);

fn key_of<K: ResourceExt>(obj: &K) -> ObjectKey {
    (obj.namespace().unwrap_or_default(), obj.name_any())
}

fn lookup<K: Clone>(
    objects: &BTreeMap<ObjectKey, K>,
    kind: &'static str,
    name: &str,
    namespace: &str,
) -> Result<K, StoreError> {
    objects
        .get(&(namespace.to_string(), name.to_string()))
        .cloned()
        .ok_or_else(|| StoreError::NotFound {
            kind,
            namespace: namespace.to_string(),
            name: name.to_string(),
        })
}

/// Store backed by maps, standing in for the API server in tests.
/// Objects can be written while a checker is polling.
#[derive(Default)]
pub struct InMemoryStore {
    models: RwLock<BTreeMap<ObjectKey, OpenModel>>,
    workloads: RwLock<BTreeMap<ObjectKey, ServingWorkload>>,
    requests: RwLock<BTreeMap<ObjectKey, ServingRequest>>,
}

impl InMemoryStore {
    pub fn new() -> InMemoryStore {
        InMemoryStore::default()
    }

    pub async fn put_model(&self, model: OpenModel) {
        self.models.write().await.insert(key_of(&model), model);
    }

    pub async fn put_workload(&self, workload: ServingWorkload) {
        self.workloads.write().await.insert(key_of(&workload), workload);
    }

    pub async fn put_serving_request(&self, request: ServingRequest) {
        self.requests.write().await.insert(key_of(&request), request);
    }
}

#[async_trait]
impl ModelRegistry for InMemoryStore {
    async fn get_model(&self, name: &str, namespace: &str) -> Result<OpenModel, StoreError> {
        lookup(&*self.models.read().await, "OpenModel", name, namespace)
    }
}

#[async_trait]
impl WorkloadStore for InMemoryStore {
    async fn get_workload(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<ServingWorkload, StoreError> {
        lookup(&*self.workloads.read().await, "ServingWorkload", name, namespace)
    }

    async fn get_serving_request(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<ServingRequest, StoreError> {
        lookup(&*self.requests.read().await, "ServingRequest", name, namespace)
    }
}
