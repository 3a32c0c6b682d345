// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Circular calendar-queue packet scheduler and per-flow rate memory.
//!
//! Models a per-flow leaky-bucket pacer backed by a ring of time slots,
//! pacing many thousands of flows at nanosecond resolution. Has no
//! knowledge of file formats or CLI surfaces; those live in `dcqcn-io` and
//! `dcqcn-sim` respectively.

pub mod calendar;
pub mod config;
pub mod error;
pub mod flow;
pub mod occupancy;
pub mod rate;

pub use calendar::Scheduler;
pub use config::Config;
pub use error::Error;
pub use flow::{generate_flows, Flow, FlowId, FlowTable};
pub use occupancy::Occupancy;
