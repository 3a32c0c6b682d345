// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::{
    config::Config,
    flow::{FlowId, FlowTable},
};

/// Per-send rate update for one flow: a multiplicative probing step, then,
/// only once the probed rate clears the flow's congestion threshold and
/// only with probability `cnp_occurrence_prob`, a Gaussian stochastic
/// decrease, floored at `min_rate`.
///
/// Takes the PRNG explicitly rather than drawing from a thread-local one,
/// so a scheduler run is reproducible end to end from one seed.
pub fn update_rate<R: Rng + ?Sized>(
    flows: &mut FlowTable,
    id: FlowId,
    config: &Config,
    rng: &mut R,
) -> f64 {
    let mut rate = flows.rate(id) * (1.0 + config.active_increase_factor);

    if rate > flows.cnp_threshold(id) && rng.gen::<f64>() < config.cnp_occurrence_prob {
        let init_rate = flows.init_rate(id);
        let normal = Normal::new(
            config.cnp_mean_decrease * init_rate,
            config.cnp_std_dev * init_rate,
        )
        .expect("cnp_mean_decrease/cnp_std_dev must yield a finite distribution");
        let decrease = normal.sample(rng).max(0.0);
        rate -= decrease;
    }

    rate = rate.max(config.min_rate);
    flows.set_rate(id, rate);
    rate
}
