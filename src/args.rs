use std::path::PathBuf;

use clap::{ArgAction, Parser};
use log::LevelFilter;
use vliw_backend::SchedulerConfig;

/// a static instruction scheduler for a small VLIW machine.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Arguments {
    /// A JSON array of instructions to schedule.
    pub input: PathBuf,

    /// Where to write the schedule using the `loop` instruction.
    pub loop_output: PathBuf,

    /// Where to write the software pipelined schedule using `loop.pip`.
    pub pip_output: PathBuf,

    /// Give up pipelining the loop beyond this initiation interval.
    #[arg(long)]
    pub max_ii: Option<usize>,

    /// Indent the written JSON.
    #[arg(long, action = ArgAction::SetTrue)]
    pub pretty: bool,

    /// Log more about what the scheduler does. Can be repeated.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Arguments {
    pub fn config(&self) -> SchedulerConfig {
        SchedulerConfig::new(self.max_ii)
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
