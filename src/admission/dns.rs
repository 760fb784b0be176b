// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use regex::Regex;
use std::sync::LazyLock;

pub const DNS1123_LABEL_MAX_LENGTH: usize = 63;

const DNS1123_LABEL_FMT: &str = "[a-z0-9]([-a-z0-9]*[a-z0-9])?";
const DNS1123_LABEL_ERR_MSG: &str = "a lowercase RFC 1123 label must consist of lower case alphanumeric characters or '-', and must start and end with an alphanumeric character";

static DNS1123_LABEL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^{}$", DNS1123_LABEL_FMT)).expect("DNS-1123 label pattern is valid")
});

/// Checks `value` against RFC 1123 label syntax, returning one message per failed rule.
pub fn is_dns1123_label(value: &str) -> Vec<String> {
    let mut errs = Vec::new();
    if value.len() > DNS1123_LABEL_MAX_LENGTH {
        errs.push(format!(
            "must be no more than {} characters",
            DNS1123_LABEL_MAX_LENGTH
        ));
    }
    if !DNS1123_LABEL_REGEX.is_match(value) {
        errs.push(format!(
            "{} (e.g. 'my-name', or '123-abc', regex used for validation is '{}')",
            DNS1123_LABEL_ERR_MSG, DNS1123_LABEL_FMT
        ));
    }
    errs
}
