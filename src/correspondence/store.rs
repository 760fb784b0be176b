// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::crds::{OpenModel, ServingRequest, ServingWorkload};
use async_trait::async_trait;
use kube::{
    api::Api,
    core::{ErrorResponse, NamespaceResourceScope},
    Client, Resource,
};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} {namespace}/{name} not found")]
    NotFound {
        kind: &'static str,
        namespace: String,
        name: String,
    },

    #[error("Failed to get {kind} {namespace}/{name}: {source}")]
    Api {
        kind: &'static str,
        namespace: String,
        name: String,
        #[source]
        source: kube::Error,
    },
}

/// Lookup of persisted model records.
#[async_trait]
pub trait ModelRegistry: Send + Sync {
    async fn get_model(&self, name: &str, namespace: &str) -> Result<OpenModel, StoreError>;
}

/// Read access to serving requests and the workloads derived from them.
#[async_trait]
pub trait WorkloadStore: Send + Sync {
    async fn get_workload(&self, name: &str, namespace: &str)
        -> Result<ServingWorkload, StoreError>;

    async fn get_serving_request(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<ServingRequest, StoreError>;
}

/// Reads objects straight from the Kubernetes API server.
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
}

impl KubeStore {
    pub fn new(client: Client) -> KubeStore {
        KubeStore { client }
    }

    async fn get_namespaced<K>(
        &self,
        kind: &'static str,
        name: &str,
        namespace: &str,
    ) -> Result<K, StoreError>
    where
        K: Resource<Scope = NamespaceResourceScope, DynamicType = ()>
            + Clone
            + DeserializeOwned
            + Debug,
    {
        let api = Api::<K>::namespaced(self.client.clone(), namespace);
        match api.get(name).await {
            Ok(obj) => Ok(obj),
            Err(kube::Error::Api(ErrorResponse { reason, .. })) if reason == "NotFound" => {
                Err(StoreError::NotFound {
                    kind,
                    namespace: namespace.to_string(),
                    name: name.to_string(),
                })
            }
            Err(source) => Err(StoreError::Api {
                kind,
                namespace: namespace.to_string(),
                name: name.to_string(),
                source,
            }),
        }
    }
}

#[async_trait]
impl ModelRegistry for KubeStore {
    async fn get_model(&self, name: &str, namespace: &str) -> Result<OpenModel, StoreError> {
        self.get_namespaced("OpenModel", name, namespace).await
    }
}

#[async_trait]
impl WorkloadStore for KubeStore {
    async fn get_workload(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<ServingWorkload, StoreError> {
        self.get_namespaced("ServingWorkload", name, namespace).await
    }

    async fn get_serving_request(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<ServingRequest, StoreError> {
        self.get_namespaced("ServingRequest", name, namespace).await
    }
}
