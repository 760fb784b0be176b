// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::admission::defaulter::apply_defaults;
use crate::admission::validator;
use crate::crds::ServingRequest;
use kube::core::{
    admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation},
    DynamicObject, ResourceExt,
};
use std::convert::Infallible;
use tracing::*;
use warp::{reply, Filter, Rejection, Reply};

/// `POST /mutate` and `POST /validate`, both taking an `AdmissionReview`.
pub fn routes() -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let mutate = warp::path("mutate")
        .and(warp::body::json())
        .and_then(mutate_handler);
    let validate = warp::path("validate")
        .and(warp::body::json())
        .and_then(validate_handler);

    warp::post()
        .and(mutate.or(validate))
        .with(warp::trace::request())
}

pub async fn mutate_handler(
    body: AdmissionReview<DynamicObject>,
) -> Result<impl Reply, Infallible> {
    let req: AdmissionRequest<_> = match body.try_into() {
        Ok(req) => req,
        Err(err) => {
            error!("invalid request: {}", err.to_string());
            return Ok(reply::json(
                &AdmissionResponse::invalid(err.to_string()).into_review(),
            ));
        }
    };
    Ok(reply::json(&mutate(&req).into_review()))
}

pub async fn validate_handler(
    body: AdmissionReview<DynamicObject>,
) -> Result<impl Reply, Infallible> {
    let req: AdmissionRequest<_> = match body.try_into() {
        Ok(req) => req,
        Err(err) => {
            error!("invalid request: {}", err.to_string());
            return Ok(reply::json(
                &AdmissionResponse::invalid(err.to_string()).into_review(),
            ));
        }
    };
    Ok(reply::json(&validate(&req).into_review()))
}

/// Applies the defaults to the incoming object and answers with the resulting JSON patch.
pub fn mutate(req: &AdmissionRequest<DynamicObject>) -> AdmissionResponse {
    let res = AdmissionResponse::from(req);
    let obj = match (&req.operation, &req.object) {
        (Operation::Create | Operation::Update, Some(obj)) => obj,
        _ => return res,
    };
    let name = obj.name_any();

    let original = match decode(obj) {
        Ok(request) => request,
        Err(err) => {
            warn!("denied: {:?} on {} ({})", req.operation, name, err);
            return res.deny(format!("failed to decode ServingRequest: {}", err));
        }
    };
    let mut defaulted = original.clone();
    apply_defaults(&mut defaulted);

    let patch = match defaults_patch(&original, &defaulted) {
        Ok(patch) => patch,
        Err(err) => return res.deny(err.to_string()),
    };
    match res.clone().with_patch(patch) {
        Ok(res) => {
            info!("defaulted: {:?} on resource {}", req.operation, name);
            res
        }
        Err(err) => {
            error!("failed to attach patch for {}: {}", name, err);
            res.deny(err.to_string())
        }
    }
}

/// Runs the validation rules matching the request's operation. Deletes are always allowed.
/// Updates are judged on the new object alone, so `oldObject` is never decoded.
pub fn validate(req: &AdmissionRequest<DynamicObject>) -> AdmissionResponse {
    let res = AdmissionResponse::from(req);
    let obj = match (&req.operation, &req.object) {
        (Operation::Create | Operation::Update, Some(obj)) => obj,
        _ => return res,
    };
    let name = obj.name_any();

    let request = match decode(obj) {
        Ok(request) => request,
        Err(err) => {
            warn!("denied: {:?} on {} ({})", req.operation, name, err);
            return res.deny(format!("failed to decode ServingRequest: {}", err));
        }
    };

    let result = match req.operation {
        Operation::Create => validator::validate_create(&request),
        _ => validator::validate_spec(&request).into_aggregate(),
    };
    match result {
        Ok(()) => {
            info!("accepted: {:?} on resource {}", req.operation, name);
            res
        }
        Err(err) => {
            warn!("denied: {:?} on {} ({})", req.operation, name, err);
            res.deny(err.to_string())
        }
    }
}

fn decode(obj: &DynamicObject) -> Result<ServingRequest, serde_json::Error> {
    serde_json::to_value(obj).and_then(serde_json::from_value)
}

fn defaults_patch(
    original: &ServingRequest,
    defaulted: &ServingRequest,
) -> Result<json_patch::Patch, serde_json::Error> {
    Ok(json_patch::diff(
        &serde_json::to_value(original)?,
        &serde_json::to_value(defaulted)?,
    ))
}
