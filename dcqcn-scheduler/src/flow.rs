// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::collections::VecDeque;
use std::num::NonZeroU32;

/// A dense, 1-based flow identifier. Flow ids are assigned contiguously from
/// 1, so a `Vec`-backed flow table can index by `id.get() - 1` with no
/// `Option` needed for "no flow".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlowId(NonZeroU32);

impl FlowId {
    pub fn new(id: u32) -> Option<Self> {
        NonZeroU32::new(id).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    pub(crate) fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

/// A single flow as read from a flow-group CSV row: one row becomes
/// `num_flows_per_group` flows, all starting at that row's rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flow {
    pub id: FlowId,
    pub rate: f64,
    pub group_id: u32,
}

/// Per-flow state, indexed densely by `FlowId`. Kept as flat `Vec`s rather
/// than a `HashMap<FlowId, _>`: hundreds of thousands of flows are looked up
/// every slot, and dense ids make that a plain index.
#[derive(Debug, Clone, Default)]
pub struct FlowTable {
    rc_memory: Vec<f64>,
    init_rates: Vec<f64>,
    cnp_thresholds: Vec<f64>,
    group_ids: Vec<u32>,
}

impl FlowTable {
    /// Builds a table from `flows`, which must be sorted by dense id
    /// starting at 1 with no gaps (the order `generate_flows` produces).
    pub fn new(flows: &[Flow], congestion_threshold: f64) -> Self {
        let mut table = Self {
            rc_memory: Vec::with_capacity(flows.len()),
            init_rates: Vec::with_capacity(flows.len()),
            cnp_thresholds: Vec::with_capacity(flows.len()),
            group_ids: Vec::with_capacity(flows.len()),
        };
        for (position, flow) in flows.iter().enumerate() {
            debug_assert_eq!(
                flow.id.index(),
                position,
                "flows must be dense and sorted by id starting at 1"
            );
            table.rc_memory.push(flow.rate);
            table.init_rates.push(flow.rate);
            table.cnp_thresholds.push(flow.rate * congestion_threshold);
            table.group_ids.push(flow.group_id);
        }
        table
    }

    pub fn len(&self) -> usize {
        self.rc_memory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rc_memory.is_empty()
    }

    pub fn rate(&self, id: FlowId) -> f64 {
        self.rc_memory[id.index()]
    }

    pub fn set_rate(&mut self, id: FlowId, rate: f64) {
        self.rc_memory[id.index()] = rate;
    }

    pub fn init_rate(&self, id: FlowId) -> f64 {
        self.init_rates[id.index()]
    }

    pub fn cnp_threshold(&self, id: FlowId) -> f64 {
        self.cnp_thresholds[id.index()]
    }

    pub fn group_id(&self, id: FlowId) -> u32 {
        self.group_ids[id.index()]
    }
}

/// Expands `(group_id, rate)` pairs into `num_flows_per_group` flows each,
/// and interleaves the admission order round-robin across groups: the first
/// flow of every group, then the second flow of every group, and so on.
///
/// Grounded on `original_source/software_models/scheduling_algorithm/scheduler_optimized.py`'s
/// `generate_flows`, which builds the flow list group-major and then slices
/// it `[i::num_flows_per_group]` for each `i`, equivalent to, for a fixed
/// per-group offset `i`, visiting every group in order.
pub fn generate_flows(
    flow_groups: &[(u32, f64)],
    num_flows_per_group: usize,
) -> (VecDeque<Flow>, Vec<Flow>) {
    let mut by_group = Vec::with_capacity(flow_groups.len() * num_flows_per_group);
    let mut next_id = 1u32;
    for &(group_id, rate) in flow_groups {
        for _ in 0..num_flows_per_group {
            let id = FlowId::new(next_id).expect("flow ids start at 1 and fit in u32");
            by_group.push(Flow { id, rate, group_id });
            next_id += 1;
        }
    }

    let mut admission = VecDeque::with_capacity(by_group.len());
    for offset in 0..num_flows_per_group {
        for group_index in 0..flow_groups.len() {
            admission.push_back(by_group[group_index * num_flows_per_group + offset]);
        }
    }

    (admission, by_group)
}
