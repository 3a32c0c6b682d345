// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use serde::Deserialize;

/// Configuration for the calendar-queue scheduler and flow rate memory.
///
/// Defaults reproduce `original_source/software_models/scheduling_algorithm/scheduler_constants.py`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Packet size used for every send, in bits.
    pub mtu_size_bits: u32,
    /// Width of one calendar slot, in nanoseconds.
    pub calendar_interval_ns: u64,
    /// Total span of the calendar wheel, in nanoseconds.
    pub calendar_window_ns: u64,
    /// Multiplicative probing step applied to a flow's rate every send.
    pub active_increase_factor: f64,
    /// Probability that an over-threshold probe draws a stochastic decrease.
    pub cnp_occurrence_prob: f64,
    /// Mean of the Gaussian decrease, as a fraction of the flow's initial rate.
    pub cnp_mean_decrease: f64,
    /// Standard deviation of the Gaussian decrease, as a fraction of the
    /// flow's initial rate.
    pub cnp_std_dev: f64,
    /// Multiple of a flow's initial rate above which a probe is "congested".
    pub congestion_threshold: f64,
    /// Floor below which a flow's rate is never decreased, in bits/sec.
    pub min_rate: f64,
    /// Number of flow groups in a synthetic workload.
    pub num_groups: usize,
    /// Number of flows per group in a synthetic workload.
    pub num_flows_per_group: usize,
    /// Out-of-range calendar offset policy: `true` aborts with
    /// `Error::OffsetOutOfRange`, `false` saturates to `slots() - 1`.
    pub strict: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mtu_size_bits: 12_000,
            calendar_interval_ns: 500,
            calendar_window_ns: 60_000_000,
            active_increase_factor: 0.03,
            cnp_occurrence_prob: 0.7,
            cnp_mean_decrease: 0.3,
            cnp_std_dev: 0.1,
            congestion_threshold: 1.3,
            min_rate: 220_000.0,
            num_groups: 256,
            num_flows_per_group: 1000,
            strict: false,
        }
    }
}

impl Config {
    /// Number of slots in the calendar wheel.
    pub fn slots(&self) -> u64 {
        self.calendar_window_ns / self.calendar_interval_ns
    }
}
