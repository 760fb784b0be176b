// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
pub mod check;
pub mod store;
pub mod wait;

pub use check::check_derivation;
pub use store::{KubeStore, ModelRegistry, StoreError, WorkloadStore};
pub use wait::{wait_for_condition, wait_for_derivation};

use crate::backend::BackendName;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// Why a derived workload does not (yet) correspond to its serving request.
/// Each variant names the first mismatched field.
#[derive(Debug, Error)]
pub enum CorrespondenceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("MissingObjectKey: {0}")]
    MissingObjectKey(&'static str),

    #[error("serving request claims no model")]
    MissingClaim,

    #[error("expected modelName {want}, got {got:?}")]
    ModelNameMismatch { want: String, got: Option<String> },

    #[error("expected modelNames {want:?}, got {got:?}")]
    ModelNamesMismatch { want: Vec<String>, got: Vec<String> },

    #[error("unexpected flavors, want {want:?}, got {got:?}")]
    FlavorsMismatch { want: Vec<String>, got: Vec<String> },

    #[error("unexpected model name label value, want {want}, got {got:?}")]
    ModelLabelMismatch { want: String, got: Option<String> },

    #[error("replicas of {0} are not set")]
    MissingReplicas(&'static str),

    #[error("expected replicas: {want}, got {got}")]
    ReplicasMismatch { want: i32, got: i32 },

    #[error("derived workload has no runner container")]
    MissingRunnerContainer,

    #[error("container name not right, want {want}, got {got}")]
    ContainerNameMismatch { want: String, got: String },

    #[error("command not right for backend {backend}, want {want:?}, got {got:?}")]
    CommandMismatch {
        backend: BackendName,
        want: Vec<String>,
        got: Vec<String>,
    },

    #[error("expected container image {want} for backend {backend}, got {got:?}")]
    ImageMismatch {
        backend: BackendName,
        want: String,
        got: Option<String>,
    },

    #[error("didn't contain arg: {0}")]
    MissingArg(String),

    #[error("unexpected envs, want {want:?}, got {got:?}")]
    EnvMismatch {
        want: BTreeMap<String, String>,
        got: BTreeMap<String, String>,
    },

    #[error("unexpected {kind} for {resource}, want {want}, got {got:?}")]
    ResourceMismatch {
        kind: &'static str,
        resource: String,
        want: String,
        got: Option<String>,
    },

    #[error("condition {0} not found")]
    ConditionNotFound(String),

    #[error("expected reason {want_reason:?} and status {want_status:?} on condition {condition_type}, got reason {got_reason:?} and status {got_status:?}")]
    ConditionMismatch {
        condition_type: String,
        want_reason: String,
        want_status: String,
        got_reason: String,
        got_status: String,
    },

    #[error("timed out after {timeout:?}: {last}")]
    Timeout {
        timeout: Duration,
        #[source]
        last: Box<CorrespondenceError>,
    },
}
