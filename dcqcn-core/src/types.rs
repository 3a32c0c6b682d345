// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::time::Tick;

/// A byte delivery in flight from the reaction point to the notification
/// point, dated for arrival at `deliver_tick`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Departure {
    pub deliver_tick: Tick,
    pub bytes: f64,
}

/// A single piecewise-constant application arrival rate sample.
///
/// A sorted sequence of these forms the rate-driven workload; the first
/// sample's tick must be zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkloadChangePoint {
    pub tick: Tick,
    pub rate: f64,
}

/// An immutable unit of application traffic, consumed exactly once by the
/// packet-driven reaction point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packet {
    pub arrival_tick: Tick,
    pub size_bytes: u64,
    pub seq_number: u64,
}
