// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use std::fmt;
use thiserror::Error;

/// Dotted path to the field a violation is about, e.g. `spec.multiModelsClaim.modelNames`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    pub fn new(root: &str) -> FieldPath {
        FieldPath(vec![root.to_string()])
    }

    pub fn child(&self, segment: &str) -> FieldPath {
        let mut segments = self.0.clone();
        segments.push(segment.to_string());
        FieldPath(segments)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViolationKind {
    /// The field is well-formed but not allowed in this combination.
    Forbidden,
    /// The field value is malformed; carries the offending value.
    Invalid(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub kind: ViolationKind,
    pub detail: String,
}

impl Violation {
    pub fn forbidden(path: &FieldPath, detail: impl Into<String>) -> Violation {
        Violation {
            field: path.to_string(),
            kind: ViolationKind::Forbidden,
            detail: detail.into(),
        }
    }

    pub fn invalid(path: &FieldPath, value: impl Into<String>, detail: impl Into<String>) -> Violation {
        Violation {
            field: path.to_string(),
            kind: ViolationKind::Invalid(value.into()),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViolationKind::Forbidden => write!(f, "{}: Forbidden: {}", self.field, self.detail),
            ViolationKind::Invalid(value) => {
                write!(f, "{}: Invalid value: {:?}: {}", self.field, value, self.detail)
            }
        }
    }
}

/// Ordered list of violations collected by independent rules.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViolationList(Vec<Violation>);

impl ViolationList {
    pub fn new() -> ViolationList {
        ViolationList(Vec::new())
    }

    pub fn push(&mut self, violation: Violation) {
        self.0.push(violation);
    }

    pub fn extend(&mut self, other: ViolationList) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.0.iter().any(|violation| violation.field == field)
    }

    /// Ok when nothing was collected, otherwise one error carrying every violation.
    pub fn into_aggregate(self) -> Result<(), AggregateError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(AggregateError(self.0))
        }
    }
}

/// Rejection of an admission request, reporting every violation at once.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{}", render(.0))]
pub struct AggregateError(Vec<Violation>);

impl AggregateError {
    pub fn violations(&self) -> &[Violation] {
        &self.0
    }
}

fn render(violations: &[Violation]) -> String {
    let rendered: Vec<String> = violations.iter().map(Violation::to_string).collect();
    if rendered.len() == 1 {
        rendered.join("")
    } else {
        format!("[{}]", rendered.join(", "))
    }
}
