// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use serde::Deserialize;
use thiserror::Error;

/// Configuration for the reaction point / notification point pair.
///
/// Defaults reproduce `original_source/software_models/dcqcn_rp/dcqcn_constants.py`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Max CNP arrival frequency, in ticks.
    pub n: u64,
    /// Reduction-factor / recovery-step period, in ticks.
    pub k: u64,
    /// Fast-recovery iterations before switching to active increase.
    pub f: u32,
    /// Initial value of `alpha`.
    pub alpha_init: f64,
    /// EWMA weight applied to `alpha` on a CNP.
    pub g: f64,
    /// Additive-increase step applied to `Rt` during active increase, in
    /// bytes/tick.
    pub r_ai: f64,
    /// Ticks from congestion detection to CNP delivery (exclusive of the
    /// mandatory +1).
    pub cnp_delay: u64,
    /// Ticks from RP departure to NP arrival.
    pub tx_delay: u64,
    /// Output-buffer occupancy, in bytes, above which congestion is
    /// signaled.
    pub cnp_threshold: f64,
    /// Initial value of `Rc` and `Rt`.
    pub rc_init: f64,
    /// NP drain rate, in bytes/tick.
    pub output_rate: f64,
    /// Simulation horizon, in ticks.
    pub end_of_time: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            n: 50,
            k: 55,
            f: 5,
            alpha_init: 0.5,
            g: 0.3,
            r_ai: 2.0,
            cnp_delay: 6,
            tx_delay: 7,
            cnp_threshold: 2000.0,
            rc_init: 135.0,
            output_rate: 129.0,
            end_of_time: 3000,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("G must be in (0, 1), got {0}")]
    InvalidAlphaWeight(f64),
    #[error("K must be nonzero")]
    ZeroReductionPeriod,
    #[error("N must be at least 1")]
    ZeroCnpWindow,
    #[error("RC_INIT must be positive, got {0}")]
    NonPositiveInitialRate(f64),
}

impl Config {
    /// Validates the invariants the reaction point / notification point
    /// algorithms assume but never check at runtime: a rate update dividing
    /// by zero, or alpha decaying outside `(0, 1)`, is a programming error
    /// in the caller, not a runtime condition this crate recovers from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.g > 0.0 && self.g < 1.0) {
            return Err(ConfigError::InvalidAlphaWeight(self.g));
        }
        if self.k == 0 {
            return Err(ConfigError::ZeroReductionPeriod);
        }
        if self.n == 0 {
            return Err(ConfigError::ZeroCnpWindow);
        }
        if self.rc_init <= 0.0 {
            return Err(ConfigError::NonPositiveInitialRate(self.rc_init));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_reference_constants() {
        let config = Config::default();
        assert_eq!(config.n, 50);
        assert_eq!(config.k, 55);
        assert_eq!(config.f, 5);
        assert_eq!(config.cnp_threshold, 2000.0);
        assert_eq!(config.rc_init, 135.0);
        assert_eq!(config.output_rate, 129.0);
        config.validate().expect("reference defaults must validate");
    }

    #[test]
    fn rejects_out_of_range_alpha_weight() {
        let config = Config {
            g: 1.5,
            ..Config::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidAlphaWeight(1.5))
        );
    }
}
