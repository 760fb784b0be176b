// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use crate::crds::{ServingRequest, MODEL_NAME_LABEL_KEY};
use tracing::*;

/// Labels the request with its primary model, overwriting any earlier value.
///
/// The primary model is the claimed model of a single-model claim, or the first entry of a
/// multi-model claim. A request without a resolvable model gets an empty label value and
/// is rejected later by validation.
pub fn apply_defaults(request: &mut ServingRequest) {
    let model_name = request
        .spec
        .claim()
        .and_then(|claim| claim.primary_model_name())
        .unwrap_or_default()
        .to_string();

    debug!(
        "defaulting {} label to {:?} on {:?}",
        MODEL_NAME_LABEL_KEY, model_name, request.metadata.name
    );
    request
        .metadata
        .labels
        .get_or_insert_with(Default::default)
        .insert(MODEL_NAME_LABEL_KEY.to_string(), model_name);
}
