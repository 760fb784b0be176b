// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
pub mod defaulter;
pub mod dns;
pub mod field;
pub mod validator;
pub mod webhook;

pub use defaulter::apply_defaults;
pub use field::{AggregateError, FieldPath, Violation, ViolationKind, ViolationList};
pub use validator::{validate, validate_create, validate_delete, validate_spec, validate_update};
