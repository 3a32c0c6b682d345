// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use anyhow::Context;
use dcqcn_scheduler::{generate_flows, Config, FlowId, FlowTable, Scheduler};
use serde::Serialize;
use structopt::StructOpt;

use crate::output;

/// Runs the calendar-queue scheduler simulation.
#[derive(Debug, StructOpt)]
pub struct SchedulerArgs {
    /// Path to a TOML file overriding `dcqcn_scheduler::Config` defaults.
    #[structopt(long)]
    config: Option<PathBuf>,

    /// Flow-group CSV (`group_id,rate`). Required: the scheduler has no
    /// synthetic flow-group generator of its own (out of scope, see
    /// DESIGN.md).
    #[structopt(long)]
    flow_groups: PathBuf,

    /// PRNG seed for the stochastic congestion-decrease law.
    #[structopt(long, default_value = "0")]
    seed: u64,

    /// Number of slot-steps to run.
    #[structopt(long)]
    steps: u64,

    /// Abort on an out-of-range calendar offset instead of saturating it.
    /// Overrides `strict` from `--config` when passed.
    #[structopt(long)]
    strict: bool,

    /// Flow id to record a per-slot rate trace for.
    #[structopt(long)]
    track: Option<u32>,

    /// Writes a newline-delimited JSON summary here instead of stdout.
    #[structopt(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct Summary {
    total_slot_steps: u64,
    total_sends: u64,
    occupancy: Vec<u64>,
    empty_slot_ratio: f64,
    max_occupied: usize,
    tracked_flow: Option<u32>,
    tracked_rate_history: Vec<(u64, f64)>,
}

impl SchedulerArgs {
    pub fn run(&self) -> anyhow::Result<()> {
        let mut config = self.load_config()?;
        if self.strict {
            config.strict = true;
        }

        let flow_groups = dcqcn_io::parse_flow_group_csv(&self.flow_groups).with_context(|| {
            format!(
                "failed to parse flow-group CSV {}",
                self.flow_groups.display()
            )
        })?;

        // `num_groups` has no generator of its own to keep in sync (flow-group
        // generation is out of scope, see DESIGN.md); it only describes the
        // population the rest of `Config` (e.g. occupancy expectations) was
        // tuned for, so a CSV with a different number of groups is a
        // configuration mismatch worth catching up front rather than a
        // silently-accepted difference.
        if flow_groups.len() != config.num_groups {
            anyhow::bail!(
                "flow-group CSV {} has {} groups, but config.num_groups is {}",
                self.flow_groups.display(),
                flow_groups.len(),
                config.num_groups
            );
        }

        let (admission, flows) = generate_flows(&flow_groups, config.num_flows_per_group);
        let table = FlowTable::new(&flows, config.congestion_threshold);
        let mut scheduler = Scheduler::new(config, admission, table, self.seed);

        if let Some(track) = self.track {
            let id = FlowId::new(track)
                .with_context(|| format!("--track flow id {} must be nonzero", track))?;
            scheduler.track(id);
        }

        scheduler
            .run(self.steps)
            .context("scheduler run aborted on an out-of-range calendar offset")?;

        let occupancy = scheduler.occupancy();
        let counts = occupancy.counts();
        let total_slots = occupancy.total_slots();
        let empty_slot_ratio = if total_slots == 0 {
            0.0
        } else {
            counts.first().copied().unwrap_or(0) as f64 / total_slots as f64
        };

        let mut out = output::sink(self.output.as_deref())?;
        output::write_record(
            &mut *out,
            &Summary {
                total_slot_steps: total_slots,
                total_sends: occupancy.total_sends(),
                occupancy: counts.to_vec(),
                empty_slot_ratio,
                max_occupied: counts.len().saturating_sub(1),
                tracked_flow: self.track,
                tracked_rate_history: scheduler.tracked_history().to_vec(),
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
        Ok(config)
    }
}
