// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::collections::VecDeque;

use crate::{config::Config, history::NpHistory, time::Tick, types::Departure};
use tracing::trace;

/// The DCQCN Notification Point: a receiver/switch-side congestion
/// detector.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationPoint {
    output_buffer: f64,
    /// Rolls over in `[1, N]`. Starts at 1: resetting to 1 and gating on
    /// `cnp_timer == 1` only makes sense together if 1 is also the initial
    /// value.
    cnp_timer: u64,
    cnp_timer_ena: bool,
    transmission_queue: VecDeque<Departure>,
    cnp_queue: VecDeque<Tick>,
    config: Config,
    history: NpHistory,
}

impl NotificationPoint {
    pub fn new(config: Config) -> Self {
        Self {
            output_buffer: 0.0,
            cnp_timer: 1,
            cnp_timer_ena: false,
            transmission_queue: VecDeque::new(),
            cnp_queue: VecDeque::new(),
            config,
            history: NpHistory::default(),
        }
    }

    /// Enqueues a byte delivery dated for the reaction point's chosen
    /// `deliver_tick`. Producers always append a delivery tick that is
    /// monotone non-decreasing, so no re-ordering on insert is needed.
    pub fn enqueue_transmission(&mut self, departure: Departure) {
        debug_assert!(
            self.transmission_queue
                .back()
                .map_or(true, |prev| prev.deliver_tick <= departure.deliver_tick),
            "transmission queue must stay ordered by deliver_tick"
        );
        self.transmission_queue.push_back(departure);
    }

    /// Advances the notification point by one tick. Returns `true` iff a
    /// CNP is delivered to the reaction point this tick.
    ///
    /// Steps, in order: deliver arrivals, drain, detect congestion, deliver
    /// a due CNP, advance the rate-limit timer.
    pub fn tick(&mut self, t: Tick) -> bool {
        while matches!(self.transmission_queue.front(), Some(d) if d.deliver_tick <= t) {
            let departure = self
                .transmission_queue
                .pop_front()
                .expect("front() just matched");
            self.output_buffer += departure.bytes;
        }

        self.output_buffer = (self.output_buffer - self.config.output_rate).max(0.0);

        if self.output_buffer > self.config.cnp_threshold
            && !self.cnp_timer_ena
            && self.cnp_timer == 1
        {
            self.cnp_timer_ena = true;
            self.history.record_cnp_event(t.get(), self.output_buffer);
            let deliver_at = t + self.config.cnp_delay + 1;
            trace!(tick = t.get(), deliver_at = deliver_at.get(), "cnp detected");
            self.cnp_queue.push_back(deliver_at);
        }

        let event_flag = matches!(self.cnp_queue.front(), Some(&due) if due == t);
        if event_flag {
            self.cnp_queue.pop_front();
        }

        if self.cnp_timer_ena {
            self.cnp_timer += 1;
            if self.cnp_timer == self.config.n {
                self.cnp_timer = 1;
                self.cnp_timer_ena = false;
            }
        }

        self.history.record_tick(self.output_buffer);
        event_flag
    }

    pub fn output_buffer(&self) -> f64 {
        self.output_buffer
    }

    pub fn history(&self) -> &NpHistory {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            cnp_threshold: 100.0,
            output_rate: 1.0,
            n: 10,
            cnp_delay: 3,
            ..Config::default()
        }
    }

    #[test]
    fn cnp_delivered_exactly_cnp_delay_plus_one_ticks_after_detection() {
        let mut np = NotificationPoint::new(config());
        np.enqueue_transmission(Departure {
            deliver_tick: Tick::new(0),
            bytes: 500.0,
        });

        let mut detection_tick = None;
        let mut delivery_tick = None;
        for t in 0..30u64 {
            let before = np.output_buffer();
            let event = np.tick(Tick::new(t));
            if detection_tick.is_none() && before <= config().cnp_threshold && np.output_buffer() > config().cnp_threshold
            {
                detection_tick = Some(t);
            }
            if event {
                delivery_tick = Some(t);
            }
        }

        let detection_tick = detection_tick.expect("buffer must exceed threshold");
        let delivery_tick = delivery_tick.expect("a CNP must be delivered");
        assert_eq!(delivery_tick, detection_tick + config().cnp_delay + 1);
    }

    #[test]
    fn at_most_one_cnp_per_n_tick_window() {
        let mut np = NotificationPoint::new(config());
        // Keep crediting the queue every tick so the buffer stays over
        // threshold indefinitely.
        let mut events = Vec::new();
        for t in 0..500u64 {
            np.enqueue_transmission(Departure {
                deliver_tick: Tick::new(t),
                bytes: 50.0,
            });
            if np.tick(Tick::new(t)) {
                events.push(t);
            }
        }

        for pair in events.windows(2) {
            assert!(
                pair[1] - pair[0] >= config().n,
                "events {:?} violate the N-tick rate limit",
                pair
            );
        }
    }

    #[test]
    fn output_buffer_never_negative() {
        let mut np = NotificationPoint::new(config());
        for t in 0..50u64 {
            np.tick(Tick::new(t));
            assert!(np.output_buffer() >= 0.0);
        }
    }
}
