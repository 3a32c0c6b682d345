// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::collections::VecDeque;

use crate::{
    config::Config,
    notification_point::NotificationPoint,
    reaction_point::ReactionPoint,
    time::Tick,
    types::{Packet, WorkloadChangePoint},
    workload::RateSeries,
};

enum Source {
    Rate(RateSeries),
    Packets(VecDeque<Packet>),
}

/// Ties the workload source, reaction point, and notification point
/// together and advances them one tick at a time in the load-bearing order:
/// workload update, RP input step, NP tick, RP rate update.
pub struct Driver {
    rp: ReactionPoint,
    np: NotificationPoint,
    source: Source,
}

impl Driver {
    pub fn new_rate_driven(config: Config, points: Vec<WorkloadChangePoint>) -> Self {
        Self {
            rp: ReactionPoint::new_rate_driven(config),
            np: NotificationPoint::new(config),
            source: Source::Rate(RateSeries::new(points)),
        }
    }

    pub fn new_packet_driven(config: Config, packets: VecDeque<Packet>) -> Self {
        Self {
            rp: ReactionPoint::new_packet_driven(config),
            np: NotificationPoint::new(config),
            source: Source::Packets(packets),
        }
    }

    /// Advances the simulation by exactly one tick.
    pub fn step(&mut self, t: Tick) {
        match &mut self.source {
            Source::Rate(series) => {
                let app_rate = series.rate_at(t);
                let departure = self.rp.process_input(t, app_rate);
                self.rp.record_tick(t, app_rate);
                self.np.enqueue_transmission(departure);
            }
            Source::Packets(packets) => {
                self.rp.admit_packets(t, packets);
                let departed_bytes = match self.rp.transfer_packet(t) {
                    Some(departure) => {
                        let bytes = departure.bytes;
                        self.np.enqueue_transmission(departure);
                        bytes
                    }
                    None => 0.0,
                };
                self.rp.record_tick(t, departed_bytes);
            }
        }

        let event_flag = self.np.tick(t);
        self.rp.update(event_flag);
    }

    /// Runs the simulation from tick zero up to (excluding) `end_of_time`.
    pub fn run(&mut self, end_of_time: Tick) {
        for t in Tick::ZERO.range_to(end_of_time) {
            self.step(t);
        }
    }

    pub fn reaction_point(&self) -> &ReactionPoint {
        &self.rp
    }

    pub fn notification_point(&self) -> &NotificationPoint {
        &self.np
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_saturation_triggers_a_cnp_and_halves_rc() {
        let config = Config {
            rc_init: 135.0,
            output_rate: 129.0,
            cnp_threshold: 2000.0,
            ..Config::default()
        };
        let mut driver = Driver::new_rate_driven(
            config,
            vec![WorkloadChangePoint {
                tick: Tick::new(0),
                rate: 200.0,
            }],
        );

        let rc_before = driver.reaction_point().rc();
        driver.run(Tick::new(config.end_of_time));

        assert!(!driver.notification_point().history().cnp_events.is_empty());
        assert!(driver.reaction_point().rc() < rc_before);
        assert!(driver.notification_point().output_buffer() >= 0.0);
    }

    #[test]
    fn step_up_then_down_produces_a_single_cnp_episode() {
        let config = Config::default();
        let mut driver = Driver::new_rate_driven(
            config,
            vec![
                WorkloadChangePoint {
                    tick: Tick::new(0),
                    rate: 50.0,
                },
                WorkloadChangePoint {
                    tick: Tick::new(500),
                    rate: 300.0,
                },
                WorkloadChangePoint {
                    tick: Tick::new(1500),
                    rate: 50.0,
                },
            ],
        );

        driver.run(Tick::new(3000));

        let events = &driver.notification_point().history().cnp_events;
        assert!(!events.is_empty(), "the 300-rate phase should congest");
        assert!(
            events.iter().all(|&(t, _)| (500..1500).contains(&t)),
            "CNPs should be confined to the saturated phase, got {:?}",
            events
        );
    }

    #[test]
    fn packet_driven_history_stays_aligned_on_ticks_with_no_departure() {
        let config = Config {
            rc_init: 1.0, // a tiny Rc spreads packets across many ticks
            ..Config::default()
        };
        let packets = VecDeque::from(vec![
            Packet {
                arrival_tick: Tick::new(0),
                size_bytes: 1000,
                seq_number: 1,
            },
            Packet {
                arrival_tick: Tick::new(0),
                size_bytes: 1000,
                seq_number: 2,
            },
        ]);
        let mut driver = Driver::new_packet_driven(config, packets);

        driver.run(Tick::new(50));

        let rp_history = driver.reaction_point().history();
        // One sample per tick in every history vector, even on ticks where
        // no packet departed (the common case once a packet's IPG exceeds
        // one tick).
        assert_eq!(rp_history.tick.len(), 50);
        assert_eq!(rp_history.app_rate.len(), 50);
        assert_eq!(rp_history.rc.len(), 50);
        assert_eq!(rp_history.tick, (0..50u64).collect::<Vec<_>>());
        // Not every tick sees a departure, so most app_rate samples must be
        // zero; misaligned recording would instead compress all nonzero
        // samples into the first few ticks.
        assert!(rp_history.app_rate.iter().any(|&rate| rate == 0.0));
    }
}
