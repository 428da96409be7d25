use crate::{
    render::grid::render_map,
    sim::{
        config::SimConfig,
        workload::{Action, Workload},
    },
    space::{error::Denial, shared::SharedAllocator},
};
use anyhow::{Context, Result};
use serde::Serialize;
use std::{io::Write, time::Duration};
use tracing::{info, info_span};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct SimReport {
    pub days: u64,
    pub granted: u64,
    pub denied_empty: u64,
    pub denied_oversized: u64,
    pub denied_fragmented: u64,
    pub releases: u64,
    pub noop_releases: u64,
    pub idle_days: u64,
}

/// Day loop: draw an action, apply it, render, advance time.
pub struct Simulation {
    config: SimConfig,
    space: SharedAllocator,
    workload: Workload,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate().context("invalid simulation config")?;
        let space = SharedAllocator::new(config.capacity)?;
        let workload = Workload::new(&config)?;
        Ok(Simulation {
            config,
            space,
            workload,
        })
    }

    pub fn space(&self) -> &SharedAllocator {
        &self.space
    }

    /// Apply one action to the space and record its outcome.
    pub fn apply(&self, action: &Action, report: &mut SimReport) {
        match action {
            Action::Build { owner, length } => match self.space.allocate(*length, owner) {
                Ok(_) => report.granted += 1,
                Err(Denial::Fragmented { .. }) => report.denied_fragmented += 1,
                Err(Denial::Oversized { .. }) => report.denied_oversized += 1,
                Err(Denial::Empty) => report.denied_empty += 1,
            },
            Action::Release { owner } => {
                if self.space.release(owner).is_empty() {
                    report.noop_releases += 1;
                } else {
                    report.releases += 1;
                }
            }
            Action::Idle => report.idle_days += 1,
        }
    }

    /// Run every configured day, writing one map per day to `out`.
    pub async fn run<W: Write>(&mut self, out: &mut W) -> Result<SimReport> {
        let mut report = SimReport::default();
        let pace = Duration::from_millis(self.config.pace_ms);
        info!(
            capacity = self.config.capacity,
            days = self.config.days,
            "starting simulation"
        );

        for day in 0..self.config.days {
            self.step(day, &mut report, out)?;
            if !pace.is_zero() {
                tokio::time::sleep(pace).await;
            }
        }

        info!(?report, "simulation complete");
        Ok(report)
    }

    fn step<W: Write>(&mut self, day: u64, report: &mut SimReport, out: &mut W) -> Result<()> {
        let span = info_span!("day", day = day + 1);
        let _enter = span.enter();

        let action = self.workload.next_action();
        info!(?action, "morning");
        self.apply(&action, report);

        let (now, live) = self.space.snapshot_now();
        let map = render_map(now, self.config.capacity, self.config.row_width, &live);
        out.write_all(map.as_bytes())
            .context("writing address space map")?;
        out.flush().context("flushing output")?;

        self.space.advance_day();
        report.days += 1;
        Ok(())
    }
}
