// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Network interfaces and the interface table

pub mod iftable;
pub mod interface;
