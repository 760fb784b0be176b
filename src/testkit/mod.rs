// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
//! Fixtures shared by unit tests and the end-to-end runner.
//!
//! Compiled for `cfg(test)` or with the `testkit` feature.
pub mod mock;
pub mod store;
pub mod wrapper;

pub use mock::*;
pub use store::InMemoryStore;
pub use wrapper::*;
