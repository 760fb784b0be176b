// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::config::CheckerConfig;
use crate::correspondence::check::check_derivation;
use crate::correspondence::store::{ModelRegistry, WorkloadStore};
use crate::correspondence::CorrespondenceError;
use crate::crds::ServingRequest;
use std::future::Future;
use tokio::time::{sleep, Instant};
use tracing::*;

/// Polls until the workload derived from `request` corresponds to it.
///
/// Missing objects and unconverged fields are retried alike; once `config.timeout` has
/// elapsed the last observed failure is returned inside [`CorrespondenceError::Timeout`].
pub async fn wait_for_derivation<S>(
    store: &S,
    request: &ServingRequest,
    config: &CheckerConfig,
) -> Result<(), CorrespondenceError>
where
    S: ModelRegistry + WorkloadStore + ?Sized,
{
    let (name, namespace) = object_key(request)?;
    poll(config, &format!("ServingWorkload {}/{}", namespace, name), || {
        observe_derivation(store, request, name, namespace)
    })
    .await
}

/// Polls until the stored request reports condition `condition_type` with the given
/// reason and status.
pub async fn wait_for_condition<S>(
    store: &S,
    request: &ServingRequest,
    condition_type: &str,
    reason: &str,
    status: &str,
    config: &CheckerConfig,
) -> Result<(), CorrespondenceError>
where
    S: WorkloadStore + ?Sized,
{
    let (name, namespace) = object_key(request)?;
    poll(config, &format!("ServingRequest {}/{}", namespace, name), || {
        observe_condition(store, name, namespace, condition_type, reason, status)
    })
    .await
}

async fn observe_derivation<S>(
    store: &S,
    request: &ServingRequest,
    name: &str,
    namespace: &str,
) -> Result<(), CorrespondenceError>
where
    S: ModelRegistry + WorkloadStore + ?Sized,
{
    let workload = store.get_workload(name, namespace).await?;
    let model_name = request
        .spec
        .claim()
        .and_then(|claim| claim.primary_model_name())
        .ok_or(CorrespondenceError::MissingClaim)?;
    let model = store.get_model(model_name, namespace).await?;
    check_derivation(request, &workload, &model)
}

async fn poll<F, Fut>(config: &CheckerConfig, target: &str, mut attempt: F) -> Result<(), CorrespondenceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), CorrespondenceError>>,
{
    let start = Instant::now();
    loop {
        match attempt().await {
            Ok(()) => {
                info!("{} converged after {:?}", target, start.elapsed());
                return Ok(());
            }
            Err(err) if start.elapsed() >= config.timeout => {
                error!("Time out waiting for {}: {}", target, err);
                return Err(CorrespondenceError::Timeout {
                    timeout: config.timeout,
                    last: Box::new(err),
                });
            }
            Err(err) => {
                info!("{} not converged yet: {}", target, err);
            }
        }
        sleep(config.interval).await;
    }
}

async fn observe_condition<S>(
    store: &S,
    name: &str,
    namespace: &str,
    condition_type: &str,
    reason: &str,
    status: &str,
) -> Result<(), CorrespondenceError>
where
    S: WorkloadStore + ?Sized,
{
    let current = store.get_serving_request(name, namespace).await?;
    let condition = current
        .status
        .as_ref()
        .and_then(|observed| observed.conditions.as_ref())
        .and_then(|conditions| conditions.iter().find(|c| c.type_ == condition_type))
        .ok_or_else(|| CorrespondenceError::ConditionNotFound(condition_type.to_string()))?;
    if condition.reason != reason || condition.status != status {
        return Err(CorrespondenceError::ConditionMismatch {
            condition_type: condition_type.to_string(),
            want_reason: reason.to_string(),
            want_status: status.to_string(),
            got_reason: condition.reason.clone(),
            got_status: condition.status.clone(),
        });
    }
    Ok(())
}

fn object_key(request: &ServingRequest) -> Result<(&str, &str), CorrespondenceError> {
    let name = request
        .metadata
        .name
        .as_deref()
        .ok_or(CorrespondenceError::MissingObjectKey(".metadata.name"))?;
    let namespace = request
        .metadata
        .namespace
        .as_deref()
        .ok_or(CorrespondenceError::MissingObjectKey(".metadata.namespace"))?;
    Ok((name, namespace))
}
