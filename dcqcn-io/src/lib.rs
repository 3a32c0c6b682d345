// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Parsers for the workload, packet, and flow-group file formats.
//!
//! No simulation logic lives here: each function turns one external file
//! format into the plain values `dcqcn-core` and `dcqcn-scheduler` expect,
//! or a descriptive [`Error`] naming the offending file and line.

pub mod error;
pub mod flow_group_csv;
pub mod packet_csv;
pub mod rate_file;

pub use error::Error;
pub use flow_group_csv::parse_flow_group_csv;
pub use packet_csv::parse_packet_csv;
pub use rate_file::{parse_scheduler_rate_trace, parse_workload_rate_file};
