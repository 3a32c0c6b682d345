// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

/// Per-tick recordings of reaction-point state.
///
/// At DCQCN simulation scale (`END_OF_TIME` on the order of a few thousand
/// ticks) recording the full trajectory as columnar vectors is cheap; this
/// does not generalize to the scheduler's flow-count scale, where only
/// explicitly tracked flows get a history (see `dcqcn-scheduler`).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RpHistory {
    pub tick: Vec<u64>,
    pub app_rate: Vec<f64>,
    pub rc: Vec<f64>,
    pub alpha: Vec<f64>,
    pub input_buffer: Vec<f64>,
}

impl RpHistory {
    pub(crate) fn record_input(&mut self, tick: u64, app_rate: f64) {
        self.tick.push(tick);
        self.app_rate.push(app_rate);
    }

    pub(crate) fn record_update(&mut self, rc: f64, alpha: f64, input_buffer: f64) {
        self.rc.push(rc);
        self.alpha.push(alpha);
        self.input_buffer.push(input_buffer);
    }
}

/// Per-tick recordings of notification-point state.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct NpHistory {
    pub output_buffer: Vec<f64>,
    pub cnp_events: Vec<(u64, f64)>,
}

impl NpHistory {
    pub(crate) fn record_tick(&mut self, output_buffer: f64) {
        self.output_buffer.push(output_buffer);
    }

    pub(crate) fn record_cnp_event(&mut self, tick: u64, output_buffer: f64) {
        self.cnp_events.push((tick, output_buffer));
    }
}
