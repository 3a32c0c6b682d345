// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! DCQCN reaction-point and notification-point rate controller simulation.
//!
//! This crate models the Reaction Point (RP) and Notification Point (NP)
//! halves of a DCQCN congestion-control loop as a discrete-tick simulation.
//! It has no knowledge of file formats or CLI surfaces; those live in
//! `dcqcn-io` and `dcqcn-sim` respectively.

pub mod config;
pub mod driver;
pub mod history;
pub mod notification_point;
pub mod reaction_point;
pub mod time;
pub mod types;
pub mod workload;

pub use config::{Config, ConfigError};
pub use driver::Driver;
pub use notification_point::NotificationPoint;
pub use reaction_point::ReactionPoint;
pub use time::Tick;
pub use types::{Departure, Packet, WorkloadChangePoint};
pub use workload::RateSeries;
