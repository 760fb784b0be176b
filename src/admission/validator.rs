// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::admission::dns::is_dns1123_label;
use crate::admission::field::{AggregateError, FieldPath, Violation, ViolationList};
use crate::crds::ServingRequest;
use crate::model_claim::InferenceMode;

/// Validates a serving request on admission. `old` is the stored object for updates and
/// `None` for creates; updates are judged on the new object alone.
pub fn validate(request: &ServingRequest, old: Option<&ServingRequest>) -> Result<(), AggregateError> {
    match old {
        None => validate_create(request),
        Some(old) => validate_update(old, request),
    }
}

pub fn validate_create(request: &ServingRequest) -> Result<(), AggregateError> {
    let mut violations = validate_spec(request);
    violations.extend(validate_name(request));
    violations.into_aggregate()
}

pub fn validate_update(_old: &ServingRequest, new: &ServingRequest) -> Result<(), AggregateError> {
    validate_spec(new).into_aggregate()
}

pub fn validate_delete(_request: &ServingRequest) -> Result<(), AggregateError> {
    Ok(())
}

/// Rules shared by create and update. Every rule runs; violations keep rule order.
pub fn validate_spec(request: &ServingRequest) -> ViolationList {
    let spec_path = FieldPath::new("spec");
    let spec = &request.spec;
    let mut violations = ViolationList::new();

    if spec.model_claim.is_none() && spec.multi_models_claim.is_none() {
        violations.push(Violation::forbidden(
            &spec_path,
            "modelClaim and multiModelsClaim couldn't be both nil",
        ));
    }

    if let Some(claim) = &spec.multi_models_claim {
        if claim.inference_mode == InferenceMode::SpeculativeDecoding {
            let explicit_backend = spec.backend_config.as_ref().and_then(|config| config.name);
            if let Some(backend) = explicit_backend.filter(|name| !name.supports_speculative_decoding()) {
                violations.push(Violation::forbidden(
                    &spec_path.child("multiModelsClaim").child("inferenceMode"),
                    format!("only vLLM supports speculativeDecoding mode, got {}", backend),
                ));
            }
            if claim.model_names.len() != 2 {
                violations.push(Violation::forbidden(
                    &spec_path.child("multiModelsClaim").child("modelNames"),
                    "only two models are allowed in speculativeDecoding mode",
                ));
            }
        }
    }

    violations
}

fn validate_name(request: &ServingRequest) -> ViolationList {
    let name_path = FieldPath::new("metadata").child("name");
    let name = request.metadata.name.as_deref().unwrap_or_default();
    let mut violations = ViolationList::new();
    for err in is_dns1123_label(name) {
        violations.push(Violation::invalid(&name_path, name, err));
    }
    violations
}
