mod input;
mod output;


use anyhow::{bail, Context};
use log::info;
use vliw_backend::{schedule_loop, schedule_pipelined, SchedulerConfig};
use vliw_common::bundle::Schedule;
use vliw_common::Driver;

pub use input::{parse_program, read_program};
pub use output::{render, write_schedules};

/// Both schedules of one program.
#[derive(Debug)]
pub struct Schedules {
    pub list: Schedule,
    pub pipelined: Schedule,
}

/// Parse, analyse and schedule a program given as one string per instruction.
/// Diagnostics go to the driver, and either both schedules are produced or
/// none is.
pub fn schedule(
    driver: &mut impl Driver,
    file: usize,
    lines: &[String],
    config: &SchedulerConfig,
) -> anyhow::Result<Schedules> {
    let Some(insts) = vliw_frontend::parse(driver, file, lines) else {
        bail!("aborting due to previous errors");
    };

    info!("scheduling {} instructions", insts.len());

    let analysis = vliw_midend::analyze(&insts);

    let list = schedule_loop(&insts, &analysis).context("could not produce the loop schedule")?;
    let pipelined = schedule_pipelined(&insts, &analysis, config)
        .context("could not produce the loop.pip schedule")?;

    driver.report_schedule("loop", &list);
    driver.report_schedule("loop.pip", &pipelined);

    Ok(Schedules { list, pipelined })
}
