// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use anyhow::Context;
use dcqcn_core::{Config, Driver, Tick};
use serde::Serialize;
use structopt::StructOpt;

use crate::output;

/// Runs the reaction-point / notification-point simulation.
#[derive(Debug, StructOpt)]
pub struct Rp {
    /// Path to a TOML file overriding `dcqcn_core::Config` defaults.
    #[structopt(long)]
    config: Option<PathBuf>,

    /// Rate-change workload file (`<tick> <rate>`, integers).
    #[structopt(long)]
    workload: Option<PathBuf>,

    /// Packet-trace workload file (CSV). Mutually exclusive with
    /// `--workload`; supplying both is an error.
    #[structopt(long)]
    packets: Option<PathBuf>,

    /// Overrides `END_OF_TIME` from the loaded config.
    #[structopt(long = "end-of-time")]
    end_of_time: Option<u64>,

    /// Writes newline-delimited JSON records here instead of stdout.
    #[structopt(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct TickRecord {
    tick: u64,
    app_rate: f64,
    rc: f64,
    alpha: f64,
    input_buffer: f64,
    output_buffer: f64,
}

#[derive(Debug, Serialize)]
struct Summary {
    cnp_events: Vec<(u64, f64)>,
}

impl Rp {
    pub fn run(&self) -> anyhow::Result<()> {
        let config = self.load_config()?;

        let mut driver = if let Some(packets_path) = &self.packets {
            if self.workload.is_some() {
                anyhow::bail!("--workload and --packets are mutually exclusive for `rp`");
            }
            let packets = dcqcn_io::parse_packet_csv(packets_path)
                .with_context(|| format!("failed to parse packet trace {}", packets_path.display()))?;
            Driver::new_packet_driven(config, packets)
        } else if let Some(workload_path) = &self.workload {
            let points = dcqcn_io::parse_workload_rate_file(workload_path)
                .with_context(|| format!("failed to parse workload file {}", workload_path.display()))?;
            Driver::new_rate_driven(config, points)
        } else {
            Driver::new_rate_driven(config, vec![dcqcn_core::WorkloadChangePoint {
                tick: Tick::new(0),
                rate: 0.0,
            }])
        };

        let end_of_time = Tick::new(self.end_of_time.unwrap_or(config.end_of_time));
        driver.run(end_of_time);

        let mut out = output::sink(self.output.as_deref())?;
        let rp_history = &driver.reaction_point().history();
        let np_history = &driver.notification_point().history();
        for i in 0..rp_history.tick.len() {
            output::write_record(
                &mut *out,
                &TickRecord {
                    tick: rp_history.tick[i],
                    app_rate: rp_history.app_rate[i],
                    rc: rp_history.rc[i],
                    alpha: rp_history.alpha[i],
                    input_buffer: rp_history.input_buffer[i],
                    output_buffer: np_history.output_buffer[i],
                },
            )?;
        }
        output::write_record(
            &mut *out,
            &Summary {
                cnp_events: np_history.cnp_events.clone(),
            },
        )?;

        Ok(())
    }

    fn load_config(&self) -> anyhow::Result<Config> {
        let config = match &self.config {
            Some(path) => {
                let contents = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                toml::from_str(&contents)
                    .with_context(|| format!("failed to parse config file {}", path.display()))?
            }
            None => Config::default(),
        };
        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}
