// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
pub mod admission;
pub mod backend;
pub mod config;
pub mod correspondence;
pub mod crds;
pub mod model_claim;
pub mod quantity;
#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
#[cfg(test)]
pub mod unit_tests;
