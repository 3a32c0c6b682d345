// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Command-line driver for the DCQCN reaction-point / notification-point
//! simulation and the calendar-queue scheduler simulation.
//!
//! Each subsystem lives in its own library crate (`dcqcn-core`,
//! `dcqcn-scheduler`) with no knowledge of file formats or a CLI surface;
//! this binary is the only place those are wired together.

use structopt::StructOpt;

mod output;
mod rp;
mod scheduler;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    Arguments::from_args().exec()
}

#[derive(Debug, StructOpt)]
#[structopt(about = "DCQCN reaction-point and calendar-queue scheduler simulations")]
enum Arguments {
    /// Runs the reaction-point / notification-point simulation.
    Rp(rp::Rp),
    /// Runs the calendar-queue scheduler simulation.
    Scheduler(scheduler::SchedulerArgs),
}

impl Arguments {
    fn exec(&self) -> anyhow::Result<()> {
        match self {
            Self::Rp(args) => args.run(),
            Self::Scheduler(args) => args.run(),
        }
    }
}
