// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::collections::VecDeque;

use crate::{
    config::Config,
    history::RpHistory,
    time::Tick,
    types::{Departure, Packet},
};

/// How the reaction point receives application traffic.
///
/// Both forms are driven by the same timer/recovery state machine
/// (`update`); only the shape of the input buffer and the admission method
/// differ. The scalar model holds a byte count, not a queue; the
/// packet-driven variant holds an ordered sequence of `Packet`s instead.
#[derive(Debug, Clone, PartialEq)]
enum Input {
    /// The byte-count model: `process_input` credits a rate sample directly.
    Rate { buffer: f64 },
    /// The packet model: packets are admitted from an external stream into
    /// `buffer`, then paced out one at a time according to `Rc`.
    Packets {
        buffer: VecDeque<Packet>,
        ready_at: Tick,
    },
}

/// The DCQCN Reaction Point: the sender-side rate controller.
///
/// Owns `Rc`, `Rt`, `alpha`, the three recovery timers, and the input
/// buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactionPoint {
    rc: f64,
    rt: f64,
    alpha: f64,
    fr_timer: u64,
    f_cnt: u32,
    alpha_timer: u64,
    input: Input,
    config: Config,
    history: RpHistory,
}

impl ReactionPoint {
    /// Creates a reaction point fed by piecewise-constant application rate
    /// samples (the scalar input-buffer model).
    pub fn new_rate_driven(config: Config) -> Self {
        Self::new(config, Input::Rate { buffer: 0.0 })
    }

    /// Creates a reaction point fed by an ordered packet stream (the
    /// queue input-buffer model). `ready_at` starts at tick zero so the
    /// first admitted packet may depart immediately.
    pub fn new_packet_driven(config: Config) -> Self {
        Self::new(
            config,
            Input::Packets {
                buffer: VecDeque::new(),
                ready_at: Tick::ZERO,
            },
        )
    }

    fn new(config: Config, input: Input) -> Self {
        Self {
            rc: config.rc_init,
            rt: config.rc_init,
            alpha: config.alpha_init,
            fr_timer: 1,
            f_cnt: 1,
            alpha_timer: 1,
            input,
            config,
            history: RpHistory::default(),
        }
    }

    /// Scalar-mode input step: credits `app_rate` bytes to the input
    /// buffer, debits `min(Rc, input_buffer)`, and returns the resulting
    /// departure dated `t + TX_DELAY`.
    ///
    /// Panics (debug-only) if this reaction point was built in packet mode;
    /// mixing input modes on one instance is a programming error, not a
    /// runtime condition.
    pub fn process_input(&mut self, t: Tick, app_rate: f64) -> Departure {
        let buffer = match &mut self.input {
            Input::Rate { buffer } => buffer,
            Input::Packets { .. } => {
                panic!("process_input called on a packet-driven ReactionPoint")
            }
        };

        *buffer += app_rate;
        let data_to_transfer = self.rc.min(*buffer);
        *buffer -= data_to_transfer;

        Departure {
            deliver_tick: t + self.config.tx_delay,
            bytes: data_to_transfer,
        }
    }

    /// Packet-mode admission: pulls every packet from `source` whose
    /// arrival tick is exactly `t` into the reaction point's own buffer.
    /// `source` is ordered ascending by arrival tick, so draining the front
    /// run preserves FIFO order.
    pub fn admit_packets(&mut self, t: Tick, source: &mut VecDeque<Packet>) {
        let buffer = match &mut self.input {
            Input::Packets { buffer, .. } => buffer,
            Input::Rate { .. } => panic!("admit_packets called on a rate-driven ReactionPoint"),
        };

        while matches!(source.front(), Some(packet) if packet.arrival_tick == t) {
            buffer.push_back(source.pop_front().expect("front() just matched"));
        }
    }

    /// Packet-mode pacing: if the previous packet's inter-packet gap has
    /// elapsed, pops and departs the next buffered packet, paced by the
    /// current `Rc` (bytes/tick). Returns `None` if the buffer is empty or
    /// the gap has not yet elapsed.
    pub fn transfer_packet(&mut self, t: Tick) -> Option<Departure> {
        let (buffer, ready_at) = match &mut self.input {
            Input::Packets { buffer, ready_at } => (buffer, ready_at),
            Input::Rate { .. } => panic!("transfer_packet called on a rate-driven ReactionPoint"),
        };

        if *ready_at > t {
            return None;
        }

        let packet = buffer.pop_front()?;

        let ipg_ticks = (packet.size_bytes as f64 / self.rc).max(1.0).round() as u64;
        *ready_at = t + ipg_ticks;

        Some(Departure {
            deliver_tick: t + self.config.tx_delay,
            bytes: packet.size_bytes as f64,
        })
    }

    /// Records this tick's `(tick, app_rate)` history sample. Called
    /// exactly once per tick by the driver, regardless of input mode: in
    /// rate mode `app_rate` is the workload sample credited this tick; in
    /// packet mode it is the size of the packet that departed this tick, or
    /// zero if none did. Keeping this a single per-tick call (rather than
    /// one folded into `process_input`/`transfer_packet`) keeps `tick`/
    /// `app_rate` aligned index-for-index with `rc`/`alpha`/`input_buffer`,
    /// which `update` always appends to once per tick regardless of
    /// whether a packet happened to transfer.
    pub fn record_tick(&mut self, t: Tick, app_rate: f64) {
        self.history.record_input(t.get(), app_rate);
    }

    /// The rate/recovery update, run once per tick after the notification
    /// point has reported whether a CNP was delivered this tick.
    ///
    /// Ordering tie-break: a CNP arriving the same tick a timer would fire
    /// resets both timers to 1 first, so the modulo checks below are false
    /// for that tick.
    pub fn update(&mut self, event_flag: bool) {
        if event_flag {
            self.alpha = (1.0 - self.config.g) * self.alpha + self.config.g;
            self.rt = self.rc;
            self.rc *= 1.0 - self.alpha / 2.0;
            self.fr_timer = 1;
            self.f_cnt = 1;
            self.alpha_timer = 1;
        }

        if self.alpha_timer % self.config.k == 0 {
            self.alpha = (1.0 - self.config.g) * self.alpha;
        }

        if self.fr_timer % self.config.k == 0 {
            if self.f_cnt <= self.config.f {
                self.rc = (self.rt + self.rc) / 2.0;
                self.f_cnt += 1;
            } else {
                self.rt += self.config.r_ai;
                self.rc = (self.rt + self.rc) / 2.0;
            }
        }

        self.fr_timer += 1;
        self.alpha_timer += 1;

        debug_assert!(self.rc >= 0.0, "Rc went negative: {}", self.rc);
        debug_assert!(
            (0.0..=1.0).contains(&self.alpha),
            "alpha left [0, 1]: {}",
            self.alpha
        );

        self.history
            .record_update(self.rc.max(0.0), self.alpha, self.input_buffer_size());
    }

    /// Current transmit rate. Clamped to zero for callers; internal state
    /// stays monotone enough to remain non-negative given a validated
    /// config.
    pub fn rc(&self) -> f64 {
        self.rc.max(0.0)
    }

    pub fn rt(&self) -> f64 {
        self.rt
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn input_buffer_size(&self) -> f64 {
        match &self.input {
            Input::Rate { buffer } => *buffer,
            Input::Packets { buffer, .. } => {
                buffer.iter().map(|packet| packet.size_bytes as f64).sum()
            }
        }
    }

    pub fn history(&self) -> &RpHistory {
        &self.history
    }
}
